// Format detection: decide which layout a file uses

use super::descriptor::ModelId;
use super::registry::{list_layouts, match_token};
use std::fmt;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DetectError {
    #[error("Unknown format: {filename} does not match any supported radio layout")]
    UnknownFormat { filename: String },
}

pub type Result<T> = std::result::Result<T, DetectError>;

/// Which piece of evidence identified the layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectedBy {
    Filename,
    Metadata,
    Signature,
}

impl fmt::Display for DetectedBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DetectedBy::Filename => "file name",
            DetectedBy::Metadata => "image metadata",
            DetectedBy::Signature => "image contents",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detection {
    pub model: ModelId,
    pub by: DetectedBy,
}

/// Detect the layout of an image from its file name and contents
pub fn detect(filename: &str, image: &[u8]) -> Result<ModelId> {
    detect_with_metadata(filename, image, None).map(|d| d.model)
}

/// Detect the layout, also consulting the model name from a CHIRP trailer
///
/// Evidence is checked in order: file name tokens, metadata model, then
/// content signatures of each layout in registry order.
pub fn detect_with_metadata(
    filename: &str,
    image: &[u8],
    metadata_model: Option<&str>,
) -> Result<Detection> {
    let base = Path::new(filename)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.to_string());

    let detection = if let Some(layout) = match_token(&base) {
        Some(Detection {
            model: layout.model,
            by: DetectedBy::Filename,
        })
    } else if let Some(layout) = metadata_model
        .filter(|model| !model.trim().is_empty())
        .and_then(match_token)
    {
        Some(Detection {
            model: layout.model,
            by: DetectedBy::Metadata,
        })
    } else {
        list_layouts()
            .into_iter()
            .find(|layout| layout.matches_signature(image))
            .map(|layout| Detection {
                model: layout.model,
                by: DetectedBy::Signature,
            })
    };

    match detection {
        Some(detection) => {
            tracing::debug!(
                "{}: detected {} from {}",
                filename,
                detection.model,
                detection.by
            );
            Ok(detection)
        }
        None => Err(DetectError::UnknownFormat {
            filename: filename.to_string(),
        }),
    }
}
