// Power level enumeration shared by all layouts

use serde::{Deserialize, Serialize};
use std::fmt;

/// Transmit power setting of a channel
///
/// Radios only store a small code; each layout maps its codes onto these
/// levels. Codes a layout does not know are kept as `Unknown` so the raw value
/// is still visible when inspecting an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PowerLevel {
    Low,
    Medium,
    High,
    Unknown(u8),
}

impl PowerLevel {
    /// Display label used in CSV output
    pub fn label(&self) -> &'static str {
        match self {
            PowerLevel::Low => "Low",
            PowerLevel::Medium => "Medium",
            PowerLevel::High => "High",
            PowerLevel::Unknown(_) => "Unknown",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, PowerLevel::Unknown(_))
    }

    /// Look up a raw code in a layout's code table
    pub fn from_code(code: u8, table: &[(u8, PowerLevel)]) -> Self {
        table
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, level)| *level)
            .unwrap_or(PowerLevel::Unknown(code))
    }
}

impl fmt::Display for PowerLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PowerLevel::Unknown(code) => write!(f, "Unknown({:#04x})", code),
            level => write!(f, "{}", level.label()),
        }
    }
}
