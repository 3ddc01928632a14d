// .img file loader compatible with Python CHIRP
// Reference: chirp/chirp_common.py lines 1560-1629

use super::metadata::Metadata;
use crate::memmap::MemoryMap;
use base64::Engine;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImgError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode metadata: {0}")]
    MetadataDecode(String),

    #[error("Failed to parse metadata JSON: {0}")]
    MetadataJson(#[from] serde_json::Error),

    #[error("Failed to decode base64 metadata: {0}")]
    Base64Decode(String),
}

pub type Result<T> = std::result::Result<T, ImgError>;

/// Magic bytes that separate binary data from metadata in .img files
/// This must match Python CHIRP exactly: b'\x00\xffchirp\xeeimg\x00\x01'
pub const MAGIC: &[u8] = b"\x00\xffchirp\xeeimg\x00\x01";

/// Load a .img file and return the memory map and metadata
///
/// Files without a metadata trailer are treated as raw images.
pub fn load_img(filename: impl AsRef<Path>) -> Result<(MemoryMap, Metadata)> {
    let data = fs::read(filename.as_ref())?;
    tracing::trace!("Read {} bytes from {}", data.len(), filename.as_ref().display());
    split_image(data)
}

/// Split file contents into the image and its metadata trailer
pub fn split_image(mut data: Vec<u8>) -> Result<(MemoryMap, Metadata)> {
    match find_magic(&data) {
        Some(idx) => {
            let metadata = decode_metadata(&data[idx + MAGIC.len()..])?;
            data.truncate(idx);
            Ok((MemoryMap::new(data), metadata))
        }
        None => Ok((MemoryMap::new(data), Metadata::default())),
    }
}

/// Find the position of MAGIC in the data
fn find_magic(data: &[u8]) -> Option<usize> {
    data.windows(MAGIC.len()).position(|window| window == MAGIC)
}

/// Decode base64-encoded JSON metadata
fn decode_metadata(encoded: &[u8]) -> Result<Metadata> {
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(encoded.trim_ascii())
        .map_err(|e| ImgError::Base64Decode(e.to_string()))?;

    let json_str =
        String::from_utf8(decoded).map_err(|e| ImgError::MetadataDecode(e.to_string()))?;

    Metadata::from_json(&json_str).map_err(ImgError::MetadataJson)
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_magic_finding() {
        let data = b"hello\x00\xffchirp\xeeimg\x00\x01world";
        assert_eq!(find_magic(data), Some(5));

        let data = b"no magic here";
        assert_eq!(find_magic(data), None);
    }

    #[test]
    fn test_load_raw_binary() -> Result<()> {
        let mut tempfile = NamedTempFile::new().unwrap();
        tempfile.write_all(&[1, 2, 3, 4, 5]).unwrap();

        let (mmap, metadata) = load_img(tempfile.path())?;

        assert_eq!(mmap.get_packed(), &[1, 2, 3, 4, 5]);
        assert!(metadata.is_empty());

        Ok(())
    }

    #[test]
    fn test_python_compatibility() -> Result<()> {
        // <binary_data><MAGIC><base64(json)>
        let mut tempfile = NamedTempFile::new().unwrap();
        tempfile.write_all(&[0x50, 0xBB, 0xFF, 0x20]).unwrap();
        tempfile.write_all(MAGIC).unwrap();

        let metadata_json = r#"{"rclass":"BaofengUV5R","vendor":"Baofeng","model":"UV-5R","chirp_version":"py3-20231001"}"#;
        tempfile
            .write_all(STANDARD.encode(metadata_json).as_bytes())
            .unwrap();
        tempfile.write_all(b"\n").unwrap();
        tempfile.flush().unwrap();

        let (mmap, metadata) = load_img(tempfile.path())?;

        assert_eq!(mmap.get_packed(), &[0x50, 0xBB, 0xFF, 0x20]);
        assert_eq!(metadata.vendor, "Baofeng");
        assert_eq!(metadata.model_hint(), Some("UV-5R"));

        Ok(())
    }

    #[test]
    fn test_bad_trailer() {
        let mut data = vec![0u8; 8];
        data.extend_from_slice(MAGIC);
        data.extend_from_slice(b"!!not base64!!");
        assert!(matches!(split_image(data), Err(ImgError::Base64Decode(_))));

        let mut data = vec![0u8; 8];
        data.extend_from_slice(MAGIC);
        data.extend_from_slice(STANDARD.encode("{not json").as_bytes());
        assert!(matches!(split_image(data), Err(ImgError::MetadataJson(_))));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_img(dir.path().join("absent.img")),
            Err(ImgError::Io(_))
        ));
    }
}
