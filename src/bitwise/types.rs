// Common type definitions for binary parsing

use serde::{Deserialize, Serialize};

/// Order in which decimal digits are packed into a multi-byte BCD field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DigitOrder {
    /// Most significant byte first, high nibble holds the first digit
    #[default]
    BigEndian,
    /// Least significant byte first (Baofeng `lbcd`)
    LittleEndian,
    /// Most significant byte first, low nibble holds the first digit
    NibbleSwapped,
}

impl DigitOrder {
    pub fn reverses_bytes(&self) -> bool {
        matches!(self, DigitOrder::LittleEndian)
    }

    pub fn swaps_nibbles(&self) -> bool {
        matches!(self, DigitOrder::NibbleSwapped)
    }
}
