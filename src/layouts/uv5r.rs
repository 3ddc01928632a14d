// Baofeng UV-5R memory layout
// Reference: chirp/drivers/uv5r.py
//
// Raw channel record (16 bytes per channel, table at 0x0008):
// - Bytes 0-3:   rxfreq (4-byte little-endian BCD, 10 Hz units)
// - Bytes 4-7:   txfreq (4-byte little-endian BCD) or 0xFFFFFFFF if TX inhibited
// - Bytes 8-9:   rxtone (u16 little-endian): 0=off, >= 0x0258=CTCSS, otherwise DTCS index
// - Bytes 10-11: txtone (u16 little-endian): same encoding as rxtone
// - Byte 14:     lowpower:2 (0=High, 1=Low, 2=Mid on tri-power variants)
//
// Names live in a parallel table at 0x1008 (16 bytes per name, first 7 used).

use super::descriptor::{
    BitField, FreqField, LayoutDescriptor, ModelId, NameField, NameLocation, PowerField,
    Signature, ToneField, TxField,
};
use crate::bitwise::DigitOrder;
use crate::core::{PowerLevel, ToneEncoding};

/// UV-5R memory map size: 6152 bytes
pub const MEMSIZE: usize = 0x1808;

/// Memory block base address
const MEMORY_BASE: usize = 0x0008;

/// Memory size (16 bytes per channel)
const MEMORY_SIZE: usize = 16;

const NUM_MEMORIES: usize = 128;

/// Names block base address
const NAME_BASE: usize = 0x1008;

/// Name storage size (16 bytes per name, only first 7 used)
const NAME_SIZE: usize = 16;
const NAME_LENGTH: usize = 7;

/// Leading bytes shared by every UV-5R model ident (`50 BB FF 20 12 07 25`,
/// `50 BB FF 01 25 98 4D`, ...)
const IDENT_PREFIX: &[u8] = b"\x50\xBB\xFF";

const POWER_LEVELS: &[(u8, PowerLevel)] = &[
    (0, PowerLevel::High),
    (1, PowerLevel::Low),
    (2, PowerLevel::Medium),
];

pub static LAYOUT: LayoutDescriptor = LayoutDescriptor {
    model: ModelId("UV-5R"),
    vendor: "Baofeng",
    description: "Dual-band VHF/UHF handheld",
    filename_tokens: &["UV-5R", "UV-82", "BF-F8"],
    signatures: &[Signature::Magic {
        offset: 0,
        bytes: IDENT_PREFIX,
    }],
    table_offset: MEMORY_BASE,
    record_stride: MEMORY_SIZE,
    slot_count: NUM_MEMORIES,
    first_index: 0,
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
    name: Some(NameField {
        location: NameLocation::Table {
            base: NAME_BASE,
            stride: NAME_SIZE,
        },
        width: NAME_LENGTH,
        fill: &[0xFF, 0x00],
    }),
    power: PowerField {
        bits: BitField {
            offset: 14,
            mask: 0x03,
            shift: 0,
        },
        levels: POWER_LEVELS,
    },
    tone: ToneField {
        encoding: ToneEncoding::Indexed,
        tx_offset: 10,
        rx_offset: Some(8),
    },
};
