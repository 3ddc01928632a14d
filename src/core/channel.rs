// Normalized channel model produced by the record decoder

use super::power::PowerLevel;
use super::tone::ToneDescriptor;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A radio frequency, stored in hertz
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Frequency(u64);

impl Frequency {
    pub const fn from_hz(hz: u64) -> Self {
        Self(hz)
    }

    pub fn hz(&self) -> u64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Format in MHz with a fixed number of decimals (at most 6)
    ///
    /// Digits below the requested precision are truncated, never rounded, and
    /// the output never uses scientific notation: 446006250 Hz at 5 decimals
    /// is `446.00625`.
    pub fn format_mhz(&self, decimals: usize) -> String {
        let decimals = decimals.min(6);
        let mhz = self.0 / 1_000_000;
        if decimals == 0 {
            return mhz.to_string();
        }
        let frac = (self.0 % 1_000_000) / 10u64.pow((6 - decimals) as u32);
        format!("{}.{:0width$}", mhz, frac, width = decimals)
    }

    pub fn checked_add(&self, offset: Frequency) -> Option<Frequency> {
        self.0.checked_add(offset.0).map(Frequency)
    }

    pub fn checked_sub(&self, offset: Frequency) -> Option<Frequency> {
        self.0.checked_sub(offset.0).map(Frequency)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} MHz", self.format_mhz(6))
    }
}

/// One memory slot of a radio image
///
/// Blank slots are kept (with `empty` set and every other field absent) so
/// the channel numbering of the image is preserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    /// Channel number as shown by the radio (0- or 1-based per layout)
    pub index: u32,

    /// Whether the slot is unprogrammed
    pub empty: bool,

    /// Channel name, `None` when the layout has no names or the slot has none
    pub name: Option<String>,

    /// Receive frequency
    pub rx: Option<Frequency>,

    /// Transmit frequency
    pub tx: Option<Frequency>,

    pub power: Option<PowerLevel>,

    pub tone: ToneDescriptor,
}

impl Channel {
    /// Create an unprogrammed channel
    pub fn new_empty(index: u32) -> Self {
        Self {
            index,
            empty: true,
            name: None,
            rx: None,
            tx: None,
            power: None,
            tone: ToneDescriptor::None,
        }
    }

    /// CSV column schema
    pub const CSV_HEADER: &'static [&'static str] = &[
        "index",
        "name",
        "rx_frequency_mhz",
        "tx_frequency_mhz",
        "power",
        "tone_kind",
        "tone_value",
    ];

    /// Render as CSV cells; absent values become empty cells
    pub fn to_csv(&self, precision: usize) -> Vec<String> {
        vec![
            self.index.to_string(),
            self.name.clone().unwrap_or_default(),
            self.rx.map(|f| f.format_mhz(precision)).unwrap_or_default(),
            self.tx.map(|f| f.format_mhz(precision)).unwrap_or_default(),
            self.power
                .map(|p| p.label().to_string())
                .unwrap_or_default(),
            self.tone.kind().unwrap_or_default().to_string(),
            self.tone.value_string().unwrap_or_default(),
        ]
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.empty {
            return write!(f, "Channel {}: <empty>", self.index);
        }

        let freq = |freq: Option<Frequency>| freq.map(|f| f.format_mhz(5)).unwrap_or_default();
        write!(
            f,
            "Channel {}: {}/{} {} tone={} ({})",
            self.index,
            freq(self.rx),
            freq(self.tx),
            self.power.map(|p| p.to_string()).unwrap_or_default(),
            self.tone,
            self.name.as_deref().unwrap_or("")
        )
    }
}
