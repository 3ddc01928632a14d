// Layout descriptors: the byte-level description of one radio model's image
//
// The decoder never hard-codes offsets; everything it needs to know about a
// model lives in one of these values.

use crate::bitwise::{
    bcd_to_freq, field_at, freq_to_bcd, le_u16_at, parse_fill_terminated, BcdError, DigitOrder,
};
use crate::core::{tone, Frequency, PowerLevel, ToneDescriptor, ToneEncoding};
use serde::Serialize;
use std::fmt;
use std::ops::Range;
use thiserror::Error;

/// Identifier of a supported radio model (e.g. `UV-5R`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ModelId(pub &'static str);

impl ModelId {
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Slot-level decoding problems; these never abort a file
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error(transparent)]
    Bcd(#[from] BcdError),

    #[error("Field at offset {offset} ({width} bytes) lies outside the record")]
    OutOfRecord { offset: usize, width: usize },
}

/// A BCD frequency field inside a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreqField {
    pub offset: usize,
    pub width: usize,
    pub order: DigitOrder,
    /// Hertz represented by one count of the stored value
    pub scale_hz: u64,
}

impl FreqField {
    /// Raw bytes of the field within a record
    pub fn raw<'a>(&self, record: &'a [u8]) -> Result<&'a [u8], FieldError> {
        field_at(record, self.offset, self.width)
            .map(|(_, bytes)| bytes)
            .map_err(|_| FieldError::OutOfRecord {
                offset: self.offset,
                width: self.width,
            })
    }

    pub fn decode(&self, record: &[u8]) -> Result<Frequency, FieldError> {
        let bytes = self.raw(record)?;
        let hz = bcd_to_freq(bytes, self.order, self.scale_hz)?;
        Ok(Frequency::from_hz(hz))
    }

    /// Inverse of `decode`, used to verify round trips
    pub fn encode(&self, freq: Frequency) -> Result<Vec<u8>, BcdError> {
        freq_to_bcd(freq.hz(), self.width, self.order, self.scale_hz)
    }

    /// MHz decimals matching the field resolution (10 Hz -> 5)
    pub fn precision(&self) -> usize {
        let mut decimals = 6;
        let mut scale = self.scale_hz;
        while decimals > 0 && scale >= 10 && scale % 10 == 0 {
            scale /= 10;
            decimals -= 1;
        }
        decimals
    }

    fn end(&self) -> usize {
        self.offset + self.width
    }
}

/// A masked bit range within one byte of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitField {
    pub offset: usize,
    pub mask: u8,
    pub shift: u8,
}

impl BitField {
    pub fn extract(&self, record: &[u8]) -> Option<u8> {
        record.get(self.offset).map(|b| (b & self.mask) >> self.shift)
    }
}

/// Direction of a repeater offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Duplex {
    Simplex,
    Plus,
    Minus,
}

/// How the transmit frequency is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxField {
    /// TX frequency stored as its own BCD field
    Direct(FreqField),
    /// Offset from RX with a separate direction code
    Offset {
        field: FreqField,
        direction: BitField,
        directions: &'static [(u8, Duplex)],
    },
}

impl TxField {
    /// Decode the transmit frequency
    ///
    /// `None` when the stored value can't be read back as a frequency: a
    /// blank, malformed or zero direct field (transmit inhibited), an
    /// unreadable offset or an unrecognized direction code.
    pub fn decode(&self, record: &[u8], rx: Frequency) -> Option<Frequency> {
        match self {
            TxField::Direct(field) => match field.decode(record) {
                Ok(tx) if !tx.is_zero() => Some(tx),
                Ok(_) => None,
                Err(e) => {
                    tracing::debug!("Unreadable TX frequency ({}), leaving TX blank", e);
                    None
                }
            },
            TxField::Offset {
                field,
                direction,
                directions,
            } => {
                let offset = match field.decode(record) {
                    Ok(offset) => offset,
                    Err(e) => {
                        tracing::debug!("Unreadable TX offset ({}), leaving TX blank", e);
                        return None;
                    }
                };

                let code = direction.extract(record);
                let duplex = directions
                    .iter()
                    .find(|(c, _)| Some(*c) == code)
                    .map(|(_, d)| *d);

                match duplex {
                    Some(Duplex::Plus) => rx.checked_add(offset),
                    Some(Duplex::Minus) => rx.checked_sub(offset),
                    Some(Duplex::Simplex) => Some(rx),
                    None => {
                        tracing::debug!("Unrecognized duplex code {:?}, leaving TX blank", code);
                        None
                    }
                }
            }
        }
    }

    fn end(&self) -> usize {
        match self {
            TxField::Direct(field) => field.end(),
            TxField::Offset {
                field, direction, ..
            } => field.end().max(direction.offset + 1),
        }
    }
}

/// Power code location and its code -> level table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerField {
    pub bits: BitField,
    pub levels: &'static [(u8, PowerLevel)],
}

impl PowerField {
    pub fn decode(&self, record: &[u8]) -> PowerLevel {
        match self.bits.extract(record) {
            Some(code) => {
                let level = PowerLevel::from_code(code, self.levels);
                if !level.is_known() {
                    tracing::debug!("Unrecognized power code {:#04x}", code);
                }
                level
            }
            None => PowerLevel::Unknown(0),
        }
    }
}

/// Tone field locations (16-bit little-endian) and their encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToneField {
    pub encoding: ToneEncoding,
    pub tx_offset: usize,
    pub rx_offset: Option<usize>,
}

impl ToneField {
    pub fn decode(&self, record: &[u8]) -> ToneDescriptor {
        let read = |offset: usize| le_u16_at(record, offset).ok().map(|(_, v)| v);

        let tx_raw = read(self.tx_offset).unwrap_or(0);
        let rx_raw = self.rx_offset.and_then(read);
        tone::decode(self.encoding, tx_raw, rx_raw)
    }

    fn end(&self) -> usize {
        let tx_end = self.tx_offset + 2;
        self.rx_offset.map_or(tx_end, |rx| tx_end.max(rx + 2))
    }
}

/// Where channel names are stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameLocation {
    /// Inside each channel record
    InRecord { offset: usize },
    /// In a separate table parallel to the channel table
    Table { base: usize, stride: usize },
}

/// Fixed-width, fill-padded channel name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameField {
    pub location: NameLocation,
    pub width: usize,
    pub fill: &'static [u8],
}

impl NameField {
    /// Decode name bytes (already sliced to `width`)
    pub fn decode(&self, bytes: &[u8]) -> Option<String> {
        parse_fill_terminated(bytes, self.width, self.fill)
            .ok()
            .and_then(|(_, name)| name)
    }
}

/// A rule recognizing a layout from image contents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signature {
    /// Exact bytes at a fixed offset
    Magic {
        offset: usize,
        bytes: &'static [u8],
    },
    /// Any of the needles somewhere in a fixed leading region
    Contains {
        start: usize,
        end: usize,
        needles: &'static [&'static [u8]],
    },
}

impl Signature {
    pub fn matches(&self, image: &[u8]) -> bool {
        match *self {
            Signature::Magic { offset, bytes } => image
                .get(offset..offset + bytes.len())
                .is_some_and(|region| region == bytes),
            Signature::Contains {
                start,
                end,
                needles,
            } => {
                let end = end.min(image.len());
                let Some(region) = image.get(start..end) else {
                    return false;
                };
                needles.iter().any(|needle| {
                    !needle.is_empty() && region.windows(needle.len()).any(|w| w == *needle)
                })
            }
        }
    }
}

/// Complete description of one model's memory image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutDescriptor {
    pub model: ModelId,
    pub vendor: &'static str,
    pub description: &'static str,
    /// Model names as they appear in file names; `-` matches `-`, `_`, space or nothing
    pub filename_tokens: &'static [&'static str],
    pub signatures: &'static [Signature],
    pub table_offset: usize,
    pub record_stride: usize,
    pub slot_count: usize,
    /// Channel number of slot 0
    pub first_index: u32,
    pub rx: FreqField,
    pub tx: TxField,
    pub name: Option<NameField>,
    pub power: PowerField,
    pub tone: ToneField,
}

impl LayoutDescriptor {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.vendor, self.model)
    }

    /// Size of the channel table in bytes
    pub fn table_len(&self) -> usize {
        self.record_stride * self.slot_count
    }

    pub fn table_end(&self) -> usize {
        self.table_offset + self.table_len()
    }

    /// Byte range of a slot's record within the image
    pub fn record_range(&self, slot: usize) -> Option<Range<usize>> {
        (slot < self.slot_count).then(|| {
            let start = self.table_offset + slot * self.record_stride;
            start..start + self.record_stride
        })
    }

    /// Base offset and length of a separate name table, if the layout has one
    pub fn name_table(&self) -> Option<(usize, usize)> {
        match self.name {
            Some(NameField {
                location: NameLocation::Table { base, stride },
                width,
                ..
            }) if self.slot_count > 0 => Some((base, stride * (self.slot_count - 1) + width)),
            _ => None,
        }
    }

    /// Minimum image length for every slot to be readable
    pub fn required_len(&self) -> usize {
        let names_end = self.name_table().map_or(0, |(base, len)| base + len);
        self.table_end().max(names_end)
    }

    /// Slot position of a channel number
    pub fn slot_for(&self, number: u32) -> Option<usize> {
        let slot = number.checked_sub(self.first_index)? as usize;
        (slot < self.slot_count).then_some(slot)
    }

    /// MHz decimals used when rendering this layout's frequencies
    pub fn precision(&self) -> usize {
        self.rx.precision()
    }

    pub fn matches_signature(&self, image: &[u8]) -> bool {
        self.signatures.iter().any(|sig| sig.matches(image))
    }

    /// Check that every in-record field fits inside the record stride
    pub fn check(&self) -> Result<(), String> {
        let mut ends = vec![
            ("rx", self.rx.end()),
            ("tx", self.tx.end()),
            ("power", self.power.bits.offset + 1),
            ("tone", self.tone.end()),
        ];
        if let Some(NameField {
            location: NameLocation::InRecord { offset },
            width,
            ..
        }) = self.name
        {
            ends.push(("name", offset + width));
        }

        for (field, end) in ends {
            if end > self.record_stride {
                return Err(format!(
                    "{}: {} field ends at byte {} of a {}-byte record",
                    self.model, field, end, self.record_stride
                ));
            }
        }

        if let Some(NameField {
            location: NameLocation::Table { stride, .. },
            width,
            ..
        }) = self.name
        {
            if width > stride {
                return Err(format!(
                    "{}: name width {} exceeds name stride {}",
                    self.model, width, stride
                ));
            }
        }

        Ok(())
    }
}
