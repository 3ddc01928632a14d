// Tone squelch (CTCSS/DCS) decoding
//
// Layouts pack tone settings in one of a few 16-bit encodings. Decoding is
// best-effort: anything unrecognized becomes `ToneDescriptor::None`.

use super::constants::{is_octal_code, is_standard_tone, DTCS_CODES};
use crate::bitwise::{bcd_to_int, DigitOrder};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Decoded tone setting of a channel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ToneDescriptor {
    #[default]
    None,
    /// CTCSS tone in tenths of a hertz (88.5 Hz is 885)
    Ctcss { tenths_hz: u16 },
    /// DCS code written as its three octal digits (D023 is 23)
    Dcs { code: u16, inverted: bool },
}

impl ToneDescriptor {
    pub fn is_none(&self) -> bool {
        matches!(self, ToneDescriptor::None)
    }

    /// Kind column for CSV output, absent when no tone is set
    pub fn kind(&self) -> Option<&'static str> {
        match self {
            ToneDescriptor::None => None,
            ToneDescriptor::Ctcss { .. } => Some("CTCSS"),
            ToneDescriptor::Dcs { .. } => Some("DCS"),
        }
    }

    /// Value column for CSV output: `88.5` for CTCSS, `023N`/`023I` for DCS
    pub fn value_string(&self) -> Option<String> {
        match self {
            ToneDescriptor::None => None,
            ToneDescriptor::Ctcss { tenths_hz } => {
                Some(format!("{}.{}", tenths_hz / 10, tenths_hz % 10))
            }
            ToneDescriptor::Dcs { code, inverted } => {
                Some(format!("{:03}{}", code, if *inverted { 'I' } else { 'N' }))
            }
        }
    }
}

impl fmt::Display for ToneDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind(), self.value_string()) {
            (Some(kind), Some(value)) => write!(f, "{} {}", kind, value),
            _ => write!(f, "none"),
        }
    }
}

/// How a layout packs a 16-bit tone field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToneEncoding {
    /// BCD value with mode flags in the top bits: bit 15 = DCS,
    /// bit 14 = inverted polarity. `0x0885` is CTCSS 88.5 Hz, `0x8023` is D023N.
    FlaggedBcd,
    /// Binary tenths of a hertz; any value present is CTCSS
    CtcssOnly,
    /// Binary tenths of a hertz at or above `0x0258`, otherwise a 1-based
    /// index into the DCS code table (offset by `0x69` when inverted)
    Indexed,
}

/// Raw values radios use for "no tone"
const TONE_OFF: [u16; 2] = [0x0000, 0xFFFF];

const DCS_FLAG: u16 = 0x8000;
const INVERT_FLAG: u16 = 0x4000;

/// Values at or above this are CTCSS in the indexed encoding
const INDEXED_CTCSS_THRESHOLD: u16 = 0x0258;

/// Offset added to the DCS index for inverted polarity in the indexed encoding
const INDEXED_INVERT_OFFSET: u16 = 0x69;

/// Decode a single raw tone field
pub fn decode_raw(encoding: ToneEncoding, raw: u16) -> ToneDescriptor {
    if TONE_OFF.contains(&raw) {
        return ToneDescriptor::None;
    }

    let tone = match encoding {
        ToneEncoding::FlaggedBcd => decode_flagged_bcd(raw),
        ToneEncoding::CtcssOnly => Some(ToneDescriptor::Ctcss { tenths_hz: raw }),
        ToneEncoding::Indexed => decode_indexed(raw),
    };

    match tone {
        Some(tone) => {
            if let ToneDescriptor::Ctcss { tenths_hz } = tone {
                if !is_standard_tone(tenths_hz) {
                    tracing::trace!("Non-standard CTCSS tone {} in {:?}", tenths_hz, encoding);
                }
            }
            tone
        }
        None => {
            tracing::debug!("Unrecognized tone code {:#06x} for {:?}", raw, encoding);
            ToneDescriptor::None
        }
    }
}

/// Decode a channel's tone from its transmit and optional receive fields
///
/// The transmit tone wins; the receive tone is only reported when nothing is
/// transmitted.
pub fn decode(encoding: ToneEncoding, tx_raw: u16, rx_raw: Option<u16>) -> ToneDescriptor {
    match decode_raw(encoding, tx_raw) {
        ToneDescriptor::None => rx_raw
            .map(|raw| decode_raw(encoding, raw))
            .unwrap_or(ToneDescriptor::None),
        tone => tone,
    }
}

fn bcd_value(raw: u16) -> Option<u16> {
    bcd_to_int(&raw.to_be_bytes(), DigitOrder::BigEndian)
        .ok()
        .map(|v| v as u16)
}

fn decode_flagged_bcd(raw: u16) -> Option<ToneDescriptor> {
    let dcs = raw & DCS_FLAG != 0;
    let inverted = raw & INVERT_FLAG != 0;

    if dcs {
        // Only the low three nibbles carry the code
        if raw & 0x3000 != 0 {
            return None;
        }
        let code = bcd_value(raw & 0x0FFF)?;
        return is_octal_code(code).then_some(ToneDescriptor::Dcs { code, inverted });
    }

    if inverted {
        return None;
    }

    match bcd_value(raw)? {
        0 => None,
        tenths_hz => Some(ToneDescriptor::Ctcss { tenths_hz }),
    }
}

fn decode_indexed(raw: u16) -> Option<ToneDescriptor> {
    if raw >= INDEXED_CTCSS_THRESHOLD {
        return Some(ToneDescriptor::Ctcss { tenths_hz: raw });
    }

    let (index, inverted) = if raw > INDEXED_INVERT_OFFSET {
        (raw - INDEXED_INVERT_OFFSET - 1, true)
    } else {
        (raw - 1, false)
    };

    DTCS_CODES
        .get(index as usize)
        .map(|&code| ToneDescriptor::Dcs { code, inverted })
}
