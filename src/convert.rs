// Conversion pipeline: load an image, detect its layout, decode and export
//
// Every failure here is file-level; a batch keeps going and reports each
// file's outcome.

use crate::core::Channel;
use crate::decoder::{decode_all, DecodeError};
use crate::formats::{export_csv, load_img, CsvError, ImgError, Metadata};
use crate::layouts::{detect_with_metadata, get_layout, DetectError, DetectedBy, LayoutDescriptor};
use crate::memmap::MemoryMap;
use rayon::prelude::*;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error(transparent)]
    Img(#[from] ImgError),

    #[error(transparent)]
    Detect(#[from] DetectError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Csv(#[from] CsvError),

    #[error("Output {} is already written by {}", .output.display(), .other.display())]
    OutputCollision { output: PathBuf, other: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConvertError>;

/// A fully decoded image
#[derive(Debug, Clone)]
pub struct Decoded {
    pub layout: &'static LayoutDescriptor,
    /// `None` when the layout was forced by the caller
    pub detected_by: Option<DetectedBy>,
    pub metadata: Metadata,
    pub image: MemoryMap,
    pub channels: Vec<Channel>,
}

impl Decoded {
    /// Number of non-empty channels
    pub fn programmed(&self) -> usize {
        self.channels.iter().filter(|ch| !ch.empty).count()
    }
}

/// Result of converting one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    pub model: &'static str,
    /// Rows written, empty slots included
    pub rows: usize,
    pub programmed: usize,
}

/// Load and decode an image, detecting its layout unless one is forced
pub fn decode_file(
    path: impl AsRef<Path>,
    forced: Option<&'static LayoutDescriptor>,
) -> Result<Decoded> {
    let path = path.as_ref();
    let (image, metadata) = load_img(path)?;

    let (layout, detected_by) = match forced {
        Some(layout) => (layout, None),
        None => {
            let filename = path.to_string_lossy();
            let detection =
                detect_with_metadata(&filename, image.get_packed(), metadata.model_hint())?;
            let layout = get_layout(detection.model).ok_or_else(|| DetectError::UnknownFormat {
                filename: filename.to_string(),
            })?;
            (layout, Some(detection.by))
        }
    };

    let channels: Vec<Channel> = decode_all(&image, layout)?.collect();

    let decoded = Decoded {
        layout,
        detected_by,
        metadata,
        image,
        channels,
    };
    tracing::info!(
        "{}: {} with {} of {} slots programmed",
        path.display(),
        layout.full_name(),
        decoded.programmed(),
        decoded.channels.len()
    );

    Ok(decoded)
}

/// Convert one image into a CSV file
pub fn convert_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    forced: Option<&'static LayoutDescriptor>,
) -> Result<ConvertSummary> {
    let (input, output) = (input.as_ref(), output.as_ref());
    let decoded = decode_file(input, forced)?;

    let rows = export_csv(output, &decoded.channels, decoded.layout.precision())?;

    Ok(ConvertSummary {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        model: decoded.layout.model.as_str(),
        rows,
        programmed: decoded.programmed(),
    })
}

/// `radio.img` -> `radio.csv`
pub fn default_output_path(input: impl AsRef<Path>) -> PathBuf {
    input.as_ref().with_extension("csv")
}

/// All `*.img` files (any case) directly inside `dir`, sorted by path
pub fn find_images(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let mut images = Vec::new();

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_img = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("img"));
        if is_img && path.is_file() {
            images.push(path);
        }
    }

    images.sort();
    Ok(images)
}

/// Outcome for one file of a batch
#[derive(Debug)]
pub struct FileOutcome {
    pub input: PathBuf,
    pub result: Result<ConvertSummary>,
}

/// Per-file outcomes of a batch, in input order
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }
}

/// `out_dir/<stem>.csv` for one image of a batch
pub fn batch_output_path(out_dir: impl AsRef<Path>, input: impl AsRef<Path>) -> PathBuf {
    let stem = input.as_ref().file_stem().unwrap_or_default().to_string_lossy();
    out_dir.as_ref().join(format!("{}.csv", stem))
}

/// Convert every image in `dir` into `out_dir/<stem>.csv`
///
/// Files are decoded in parallel. A file that fails is reported in its
/// outcome and never stops the others. Images sharing a stem (`radio.img`,
/// `radio.IMG`) would write the same CSV; only the first in path order is
/// converted, the others fail with `OutputCollision`.
pub fn convert_all(
    dir: impl AsRef<Path>,
    out_dir: impl AsRef<Path>,
    forced: Option<&'static LayoutDescriptor>,
) -> Result<BatchReport> {
    let out_dir = out_dir.as_ref();
    let images = find_images(dir)?;
    if images.is_empty() {
        return Ok(BatchReport::default());
    }

    fs::create_dir_all(out_dir)?;
    tracing::info!("Converting {} images into {}", images.len(), out_dir.display());

    let mut claimed: HashMap<PathBuf, &PathBuf> = HashMap::new();
    let jobs: Vec<(&PathBuf, Result<PathBuf>)> = images
        .iter()
        .map(|input| {
            let output = batch_output_path(out_dir, input);
            match claimed.entry(output.clone()) {
                Entry::Occupied(first) => {
                    let other = first.get().to_path_buf();
                    (input, Err(ConvertError::OutputCollision { output, other }))
                }
                Entry::Vacant(slot) => {
                    slot.insert(input);
                    (input, Ok(output))
                }
            }
        })
        .collect();

    let outcomes: Vec<FileOutcome> = jobs
        .into_par_iter()
        .map(|(input, output)| {
            let result = output.and_then(|output| convert_file(input, &output, forced));
            if let Err(e) = &result {
                tracing::warn!("Skipping {}: {}", input.display(), e);
            }
            FileOutcome {
                input: input.clone(),
                result,
            }
        })
        .collect();

    Ok(BatchReport { outcomes })
}
