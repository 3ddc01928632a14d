// Baofeng BF-888S memory layout
// Reference: chirp/drivers/h777.py
//
// 16 channels of 16 bytes starting at 0x0010:
// - Bytes 0-3:   rxfreq (little-endian BCD, 10 Hz units)
// - Bytes 4-7:   txfreq (little-endian BCD)
// - Bytes 8-9:   rxtone (little-endian BCD, bit 15 = DCS, bit 14 = inverted)
// - Bytes 10-11: txtone (same encoding)
// - Byte 12:     skip:1 highpower:1 narrow:1 beatshift:1 bcl:1 in bits 4..0
//
// The radio has no channel names and its images carry no ident bytes, so the
// layout is only picked up by file name or metadata.

use super::descriptor::{
    BitField, FreqField, LayoutDescriptor, ModelId, PowerField, ToneField, TxField,
};
use crate::bitwise::DigitOrder;
use crate::core::{PowerLevel, ToneEncoding};

const MEMORY_BASE: usize = 0x0010;
const MEMORY_SIZE: usize = 16;
const NUM_MEMORIES: usize = 16;

const POWER_LEVELS: &[(u8, PowerLevel)] = &[(1, PowerLevel::High), (0, PowerLevel::Low)];

pub static LAYOUT: LayoutDescriptor = LayoutDescriptor {
    model: ModelId("BF-888S"),
    vendor: "Baofeng",
    description: "16-channel UHF handheld",
    filename_tokens: &["BF-888", "H-777"],
    signatures: &[],
    table_offset: MEMORY_BASE,
    record_stride: MEMORY_SIZE,
    slot_count: NUM_MEMORIES,
    first_index: 1,
    rx: FreqField {
        offset: 0,
        width: 4,
        order: DigitOrder::LittleEndian,
        scale_hz: 10,
    },
    tx: TxField::Direct(FreqField {
        offset: 4,
        width: 4,
        order: DigitOrder::LittleEndian,
        scale_hz: 10,
    }),
    name: None,
    power: PowerField {
        bits: BitField {
            offset: 12,
            mask: 0x08,
            shift: 3,
        },
        levels: POWER_LEVELS,
    },
    tone: ToneField {
        encoding: ToneEncoding::FlaggedBcd,
        tx_offset: 10,
        rx_offset: Some(8),
    },
};
