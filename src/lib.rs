// RADIO-IMG: decode radio memory images into normalized channels
// Copyright 2024 - Licensed under GPLv3

pub mod bitwise;
pub mod convert;
pub mod core;
pub mod decoder;
pub mod formats;
pub mod layouts;
pub mod memmap;

// Re-export commonly used types
pub use bitwise::{bcd_to_freq, bcd_to_int, freq_to_bcd, int_to_bcd, BcdError, DigitOrder};
pub use convert::{convert_all, convert_file, decode_file, ConvertError};
pub use self::core::{Channel, Frequency, PowerLevel, ToneDescriptor, ToneEncoding};
pub use decoder::{decode_all, DecodeError};
pub use formats::{export_csv, load_img, Metadata};
pub use layouts::{detect, get_layout, list_layouts, LayoutDescriptor, ModelId};
pub use memmap::MemoryMap;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
