// Abbree AR-5RM memory layout
//
// 32-byte records from the start of the image:
// - Bytes 0-3:   rxfreq (little-endian BCD, 10 Hz units)
// - Bytes 4-7:   txfreq (little-endian BCD)
// - Bytes 8-9:   tone (little-endian, BCD value with DCS/inverted flags)
// - Byte 14:     power bits (mask 0x05)
// - Bytes 16-31: name, padded with 0xFF or 0x00

use super::descriptor::{
    BitField, FreqField, LayoutDescriptor, ModelId, NameField, NameLocation, PowerField,
    Signature, ToneField, TxField,
};
use crate::bitwise::DigitOrder;
use crate::core::{PowerLevel, ToneEncoding};

const MEMORY_SIZE: usize = 32;
const NUM_MEMORIES: usize = 128;

/// Factory channel names found near the start of stock images
const FACTORY_NAMES: &[&[u8]] = &[b"FRS", b"GMRS"];

const POWER_LEVELS: &[(u8, PowerLevel)] = &[
    (0x00, PowerLevel::Low),
    (0x01, PowerLevel::High),
    (0x04, PowerLevel::High),
    (0x05, PowerLevel::High),
];

pub static LAYOUT: LayoutDescriptor = LayoutDescriptor {
    model: ModelId("AR-5RM"),
    vendor: "Abbree",
    description: "Multi-band handheld",
    filename_tokens: &["AR-5RM"],
    signatures: &[Signature::Contains {
        start: 0,
        end: 100,
        needles: FACTORY_NAMES,
    }],
    table_offset: 0,
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
    name: Some(NameField {
        location: NameLocation::InRecord { offset: 16 },
        width: 16,
        fill: &[0xFF, 0x00],
    }),
    power: PowerField {
        bits: BitField {
            offset: 14,
            mask: 0x05,
            shift: 0,
        },
        levels: POWER_LEVELS,
    },
    tone: ToneField {
        encoding: ToneEncoding::FlaggedBcd,
        tx_offset: 8,
        rx_offset: None,
    },
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry() {
        assert_eq!(LAYOUT.check(), Ok(()));
        assert_eq!(LAYOUT.record_range(2), Some(64..96));
        assert_eq!(LAYOUT.required_len(), 4096);
        assert_eq!(LAYOUT.slot_for(1), Some(0));
    }

    #[test]
    fn test_power_codes() {
        let mut record = [0u8; MEMORY_SIZE];
        for (byte, level) in [
            (0x00, PowerLevel::Low),
            (0x01, PowerLevel::High),
            (0x04, PowerLevel::High),
            (0xFF, PowerLevel::High),
            (0xFA, PowerLevel::Low),
        ] {
            record[14] = byte;
            assert_eq!(LAYOUT.power.decode(&record), level, "byte {:#04x}", byte);
        }
    }

    #[test]
    fn test_factory_name_signature() {
        let mut image = vec![0u8; 4096];
        image[16..22].copy_from_slice(b"GMRS 1");
        assert!(LAYOUT.matches_signature(&image));

        let mut late = vec![0u8; 4096];
        late[200..203].copy_from_slice(b"FRS");
        assert!(!LAYOUT.matches_signature(&late));
    }
}
