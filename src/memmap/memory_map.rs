// Read-only byte image of a radio's memory
// Reference: chirp/memmap.py

use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryMapError {
    #[error("Range {start}..{end} is outside the {size}-byte image")]
    OutOfBounds {
        start: usize,
        end: usize,
        size: usize,
    },
}

pub type Result<T> = std::result::Result<T, MemoryMapError>;

/// Memory image loaded from a file
///
/// The decoder only ever reads from it, so the image is immutable once
/// loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryMap {
    data: Vec<u8>,
}

impl MemoryMap {
    /// Create a new memory map from bytes
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Size of the image in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get `length` bytes starting at `start`
    /// If length is None, returns all data from `start` to end
    pub fn get(&self, start: usize, length: Option<usize>) -> Result<&[u8]> {
        let end = match length {
            Some(len) => start.checked_add(len).unwrap_or(usize::MAX),
            None => self.data.len(),
        };

        self.data
            .get(start..end)
            .ok_or(MemoryMapError::OutOfBounds {
                start,
                end,
                size: self.data.len(),
            })
    }

    /// The whole image as raw bytes
    pub fn get_packed(&self) -> &[u8] {
        &self.data
    }

    /// Hex dump of a byte range, clamped to the image
    pub fn printable(&self, start: Option<usize>, end: Option<usize>) -> String {
        let end = end.unwrap_or(self.data.len()).min(self.data.len());
        let start = start.unwrap_or(0).min(end);

        hexdump(&self.data[start..end], start)
    }
}

impl From<Vec<u8>> for MemoryMap {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl From<&[u8]> for MemoryMap {
    fn from(data: &[u8]) -> Self {
        Self::new(data.to_vec())
    }
}

impl AsRef<[u8]> for MemoryMap {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl fmt::Display for MemoryMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MemoryMap({} bytes)", self.data.len())
    }
}

/// Create a hex dump of bytes (similar to hexdump -C), labelled from `base`
fn hexdump(data: &[u8], base: usize) -> String {
    let mut output = String::new();

    for (i, chunk) in data.chunks(16).enumerate() {
        output.push_str(&format!("{:08x}  ", base + i * 16));

        for j in 0..16 {
            if j == 8 {
                output.push(' ');
            }
            match chunk.get(j) {
                Some(byte) => output.push_str(&format!("{:02x} ", byte)),
                None => output.push_str("   "),
            }
        }

        output.push_str(" |");
        output.extend(chunk.iter().map(|&b| {
            if (0x20..=0x7e).contains(&b) {
                b as char
            } else {
                '.'
            }
        }));
        output.push_str("|\n");
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_map_creation() {
        let mmap = MemoryMap::new(vec![1, 2, 3, 4, 5]);
        assert_eq!(mmap.len(), 5);
        assert!(!mmap.is_empty());
        assert!(MemoryMap::new(Vec::new()).is_empty());

        let from_slice = MemoryMap::from(&[9u8, 8][..]);
        assert_eq!(from_slice.get_packed(), &[9, 8]);
    }

    #[test]
    fn test_get() {
        let mmap = MemoryMap::new(vec![0, 1, 2, 3, 4]);
        assert_eq!(mmap.get(1, Some(3)).unwrap(), &[1, 2, 3]);
        assert_eq!(mmap.get(3, None).unwrap(), &[3, 4]);
        assert_eq!(mmap.get(5, Some(0)).unwrap(), &[] as &[u8]);
    }

    #[test]
    fn test_bounds_checking() {
        let mmap = MemoryMap::new(vec![1, 2, 3]);

        assert_eq!(
            mmap.get(2, Some(5)),
            Err(MemoryMapError::OutOfBounds {
                start: 2,
                end: 7,
                size: 3
            })
        );
        assert!(mmap.get(5, Some(1)).is_err());
        assert!(mmap.get(4, None).is_err());
        assert!(mmap.get(usize::MAX, Some(2)).is_err());
    }

    #[test]
    fn test_hexdump() {
        let mut data = vec![
            0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d,
            0x0e, 0x0f,
        ];
        data.extend_from_slice(b"ABC");
        let mmap = MemoryMap::new(data);

        let dump = mmap.printable(None, None);
        assert!(dump.contains("00 01 02 03"));
        assert!(dump.contains("41 42 43"));
        assert!(dump.contains("|ABC|"));

        let tail = mmap.printable(Some(16), None);
        assert!(tail.starts_with("00000010  41 42 43"));
    }
}
