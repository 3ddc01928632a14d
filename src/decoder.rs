// Channel record decoder
//
// Walks a layout's channel table slot by slot and produces one normalized
// `Channel` per slot, blank slots included.

use crate::core::Channel;
use crate::layouts::{LayoutDescriptor, ModelId, NameLocation};
use crate::memmap::MemoryMap;
use std::iter::FusedIterator;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Truncated image: {model} needs {needed} bytes but only {available} are present")]
    TruncatedImage {
        model: ModelId,
        needed: usize,
        available: usize,
    },
}

pub type Result<T> = std::result::Result<T, DecodeError>;

/// Decode every slot of `image` using `layout`
///
/// The whole channel table (and name table) must fit in the image; no
/// channel is produced from a truncated image. Slot-level problems never
/// fail: an unreadable or zero RX frequency yields an empty channel.
pub fn decode_all<'a>(image: &'a MemoryMap, layout: &'a LayoutDescriptor) -> Result<ChannelIter<'a>> {
    let truncated = DecodeError::TruncatedImage {
        model: layout.model,
        needed: layout.required_len(),
        available: image.len(),
    };

    if image.len() < layout.required_len() {
        return Err(truncated);
    }

    let table = image
        .get(layout.table_offset, Some(layout.table_len()))
        .map_err(|_| truncated.clone())?;

    let names = match layout.name_table() {
        Some((base, len)) => Some(image.get(base, Some(len)).map_err(|_| truncated)?),
        None => None,
    };

    tracing::trace!(
        "Decoding {} slots of {} from {} bytes",
        layout.slot_count,
        layout.model,
        image.len()
    );

    Ok(ChannelIter {
        layout,
        table,
        names,
        slot: 0,
    })
}

/// Channels of one image, in increasing slot order
#[derive(Debug, Clone)]
pub struct ChannelIter<'a> {
    layout: &'a LayoutDescriptor,
    table: &'a [u8],
    names: Option<&'a [u8]>,
    slot: usize,
}

impl<'a> ChannelIter<'a> {
    pub fn layout(&self) -> &'a LayoutDescriptor {
        self.layout
    }

    fn name_bytes(&self, slot: usize, record: &'a [u8]) -> Option<&'a [u8]> {
        let field = self.layout.name.as_ref()?;
        match field.location {
            NameLocation::InRecord { offset } => record.get(offset..offset + field.width),
            NameLocation::Table { stride, .. } => {
                let start = slot * stride;
                self.names?.get(start..start + field.width)
            }
        }
    }
}

impl Iterator for ChannelIter<'_> {
    type Item = Channel;

    fn next(&mut self) -> Option<Channel> {
        if self.slot >= self.layout.slot_count {
            return None;
        }
        let slot = self.slot;
        self.slot += 1;

        let stride = self.layout.record_stride;
        let record = self.table.get(slot * stride..(slot + 1) * stride)?;
        let name = self.name_bytes(slot, record);

        Some(decode_record(self.layout, slot, record, name))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.layout.slot_count.saturating_sub(self.slot);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ChannelIter<'_> {}

impl FusedIterator for ChannelIter<'_> {}

/// Decode one channel record
fn decode_record(
    layout: &LayoutDescriptor,
    slot: usize,
    record: &[u8],
    name_bytes: Option<&[u8]>,
) -> Channel {
    let index = layout.first_index + slot as u32;

    let rx = match layout.rx.decode(record) {
        Ok(rx) if !rx.is_zero() => rx,
        Ok(_) => return Channel::new_empty(index),
        Err(e) => {
            tracing::debug!("{} channel {}: {}, treating as empty", layout.model, index, e);
            return Channel::new_empty(index);
        }
    };

    let name = match (layout.name.as_ref(), name_bytes) {
        (Some(field), Some(bytes)) => field.decode(bytes),
        _ => None,
    };

    Channel {
        index,
        empty: false,
        name,
        rx: Some(rx),
        tx: layout.tx.decode(record, rx),
        power: Some(layout.power.decode(record)),
        tone: layout.tone.decode(record),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Frequency, PowerLevel, ToneDescriptor};
    use crate::bitwise::DigitOrder;
    use crate::layouts::{ar5rm, bf888, list_layouts, uv5r, BitField, Duplex, FreqField, TxField};

    /// Blank image of exactly the layout's required size
    fn blank_image(layout: &LayoutDescriptor) -> Vec<u8> {
        vec![0xFF; layout.required_len()]
    }

    fn write_record(image: &mut [u8], layout: &LayoutDescriptor, slot: usize, bytes: &[u8]) {
        let range = layout.record_range(slot).unwrap();
        image[range.start..range.start + bytes.len()].copy_from_slice(bytes);
    }

    /// UV-5R record: 446.00625 MHz simplex, high power, TX tone 88.5 Hz
    const UV5R_GMRS: [u8; 16] = [
        0x25, 0x06, 0x60, 0x44, // rxfreq
        0x25, 0x06, 0x60, 0x44, // txfreq
        0x00, 0x00, // rxtone off
        0x75, 0x03, // txtone 885
        0x00, 0x00, 0x00, 0x00, // flags, lowpower = 0
    ];

    #[test]
    fn test_uv5r_sample_image() {
        let layout = &uv5r::LAYOUT;
        let mut image = blank_image(layout);
        write_record(&mut image, layout, 0, &UV5R_GMRS);
        let mmap = MemoryMap::new(image);

        let channels: Vec<Channel> = decode_all(&mmap, layout).unwrap().collect();
        assert_eq!(channels.len(), 128);

        let first = &channels[0];
        assert_eq!(first.index, 0);
        assert!(!first.empty);
        assert_eq!(first.rx, Some(Frequency::from_hz(446_006_250)));
        assert_eq!(first.rx.unwrap().format_mhz(layout.precision()), "446.00625");
        assert_eq!(first.tx, first.rx);
        assert_eq!(first.power, Some(PowerLevel::High));
        assert_eq!(first.tone, ToneDescriptor::Ctcss { tenths_hz: 885 });
        assert_eq!(first.name, None);

        for (i, ch) in channels.iter().enumerate().skip(1) {
            assert_eq!(ch, &Channel::new_empty(i as u32));
        }
    }

    #[test]
    fn test_slot_count_and_order() {
        for layout in list_layouts() {
            let mmap = MemoryMap::new(blank_image(layout));
            let iter = decode_all(&mmap, layout).unwrap();
            assert_eq!(iter.len(), layout.slot_count);

            let indices: Vec<u32> = iter.map(|ch| ch.index).collect();
            assert_eq!(indices.len(), layout.slot_count);
            assert_eq!(indices[0], layout.first_index);
            assert!(indices.windows(2).all(|w| w[0] < w[1]), "{}", layout.model);
        }
    }

    #[test]
    fn test_zero_rx_is_empty() {
        let layout = &bf888::LAYOUT;
        let mmap = MemoryMap::new(vec![0x00; layout.required_len()]);

        let channels: Vec<Channel> = decode_all(&mmap, layout).unwrap().collect();
        assert!(channels.iter().all(|ch| ch.empty && ch.rx.is_none()));
    }

    #[test]
    fn test_malformed_rx_is_empty() {
        let layout = &bf888::LAYOUT;
        let mut image = vec![0x00; layout.required_len()];
        write_record(&mut image, layout, 3, &[0x00, 0x5A, 0x62, 0x46]);
        let mmap = MemoryMap::new(image);

        let ch = decode_all(&mmap, layout).unwrap().nth(3).unwrap();
        assert_eq!(ch, Channel::new_empty(4));
    }

    #[test]
    fn test_truncated_image() {
        let layout = &uv5r::LAYOUT;
        let short = MemoryMap::new(vec![0xFF; layout.required_len() - 1]);
        assert_eq!(
            decode_all(&short, layout).unwrap_err(),
            DecodeError::TruncatedImage {
                model: layout.model,
                needed: layout.required_len(),
                available: layout.required_len() - 1,
            }
        );

        // Not even one record
        let tiny = MemoryMap::new(vec![0xFF; layout.table_offset + layout.record_stride - 1]);
        assert!(matches!(
            decode_all(&tiny, layout),
            Err(DecodeError::TruncatedImage { .. })
        ));
    }

    #[test]
    fn test_frequency_fields_reencode() {
        let layout = &uv5r::LAYOUT;
        let mut image = blank_image(layout);
        let mut record = UV5R_GMRS;
        record[4..8].copy_from_slice(&[0x00, 0x00, 0x65, 0x14]);
        write_record(&mut image, layout, 5, &record);
        let mmap = MemoryMap::new(image);

        let ch = decode_all(&mmap, layout).unwrap().nth(5).unwrap();
        assert_eq!(ch.tx, Some(Frequency::from_hz(146_500_000)));

        let TxField::Direct(tx_field) = layout.tx else {
            panic!("UV-5R stores TX directly");
        };
        assert_eq!(layout.rx.encode(ch.rx.unwrap()).unwrap(), &record[0..4]);
        assert_eq!(tx_field.encode(ch.tx.unwrap()).unwrap(), &record[4..8]);
    }

    /// Simplex, split and transmit-inhibited records in the first three slots
    fn sample_image(layout: &LayoutDescriptor) -> Vec<u8> {
        let TxField::Direct(tx_field) = layout.tx else {
            panic!("{} stores TX directly", layout.model);
        };
        let mut image = blank_image(layout);
        let records: [(&[u8; 4], &[u8; 4]); 3] = [
            (&[0x50, 0x62, 0x25, 0x46], &[0x50, 0x62, 0x25, 0x46]),
            (&[0x00, 0x40, 0x69, 0x14], &[0x00, 0x40, 0x63, 0x14]),
            (&[0x25, 0x06, 0x60, 0x44], &[0xFF, 0xFF, 0xFF, 0xFF]),
        ];
        for (slot, (rx, tx)) in records.iter().enumerate() {
            let start = layout.record_range(slot).unwrap().start;
            let rx_at = start + layout.rx.offset;
            let tx_at = start + tx_field.offset;
            image[rx_at..rx_at + 4].copy_from_slice(*rx);
            image[tx_at..tx_at + 4].copy_from_slice(*tx);
        }
        image
    }

    #[test]
    fn test_programmed_frequencies_reencode_for_every_layout() {
        for layout in list_layouts() {
            let TxField::Direct(tx_field) = layout.tx else {
                panic!("{} stores TX directly", layout.model);
            };
            let image = sample_image(layout);
            let mmap = MemoryMap::new(image.clone());

            let channels: Vec<Channel> = decode_all(&mmap, layout).unwrap().collect();
            assert_eq!(channels.iter().filter(|ch| !ch.empty).count(), 3);

            for (slot, ch) in channels.iter().enumerate().filter(|(_, ch)| !ch.empty) {
                let record = &image[layout.record_range(slot).unwrap()];
                let rx = ch.rx.unwrap();
                assert_eq!(layout.rx.encode(rx).unwrap(), layout.rx.raw(record).unwrap());
                if let Some(tx) = ch.tx {
                    assert_eq!(tx_field.encode(tx).unwrap(), tx_field.raw(record).unwrap());
                }
            }

            assert_eq!(channels[1].tx, Some(Frequency::from_hz(146_340_000)));
            assert_eq!(channels[2].rx, Some(Frequency::from_hz(446_006_250)));
            assert_eq!(channels[2].tx, None, "{}", layout.model);
        }
    }

    #[test]
    fn test_decoding_is_deterministic() {
        let layout = &uv5r::LAYOUT;
        let mut image = blank_image(layout);
        write_record(&mut image, layout, 0, &UV5R_GMRS);
        write_record(&mut image, layout, 7, &UV5R_GMRS);
        let mmap = MemoryMap::new(image);

        let first: Vec<Channel> = decode_all(&mmap, layout).unwrap().collect();
        let second: Vec<Channel> = decode_all(&mmap, layout).unwrap().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_uv5r_name_table_and_power() {
        let layout = &uv5r::LAYOUT;
        let mut image = blank_image(layout);
        let mut record = UV5R_GMRS;
        record[14] = 0x03;
        write_record(&mut image, layout, 2, &record);
        image[0x1008 + 2 * 16..0x1008 + 2 * 16 + 7].copy_from_slice(b"CALL\xFF\xFF\xFF");
        let mmap = MemoryMap::new(image);

        let ch = decode_all(&mmap, layout).unwrap().nth(2).unwrap();
        assert_eq!(ch.name.as_deref(), Some("CALL"));
        assert_eq!(ch.power, Some(PowerLevel::Unknown(3)));
    }

    #[test]
    fn test_ar5rm_names_and_dcs() {
        let layout = &ar5rm::LAYOUT;
        let mut image = blank_image(layout);

        let mut record = [0xFFu8; 32];
        record[0..4].copy_from_slice(&[0x50, 0x62, 0x25, 0x46]);
        record[8..10].copy_from_slice(&[0x23, 0x80]);
        record[14] = 0x04;
        record[16..22].copy_from_slice(b"GMRS 1");
        write_record(&mut image, layout, 0, &record);

        let mut blank_name = record;
        blank_name[16..22].copy_from_slice(b"      ");
        write_record(&mut image, layout, 1, &blank_name);

        let mut inverted = record;
        inverted[8..10].copy_from_slice(&[0x23, 0xC0]);
        inverted[14] = 0x00;
        inverted[16..32].copy_from_slice(&[0x00; 16]);
        write_record(&mut image, layout, 2, &inverted);

        let mmap = MemoryMap::new(image);
        let channels: Vec<Channel> = decode_all(&mmap, layout).unwrap().take(3).collect();

        let gmrs = &channels[0];
        assert_eq!(gmrs.index, 1);
        assert_eq!(gmrs.name.as_deref(), Some("GMRS 1"));
        assert_eq!(gmrs.rx, Some(Frequency::from_hz(462_562_500)));
        assert_eq!(gmrs.tx, None);
        assert_eq!(gmrs.power, Some(PowerLevel::High));
        assert_eq!(
            gmrs.tone,
            ToneDescriptor::Dcs {
                code: 23,
                inverted: false
            }
        );

        assert_eq!(channels[1].name.as_deref(), Some(""));

        assert_eq!(channels[2].name, None);
        assert_eq!(channels[2].power, Some(PowerLevel::Low));
        assert_eq!(
            channels[2].tone,
            ToneDescriptor::Dcs {
                code: 23,
                inverted: true
            }
        );
    }

    #[test]
    fn test_offset_mode_layout() {
        const DIRECTIONS: &[(u8, Duplex)] = &[
            (0, Duplex::Simplex),
            (1, Duplex::Plus),
            (2, Duplex::Minus),
        ];
        let layout = LayoutDescriptor {
            tx: TxField::Offset {
                field: FreqField {
                    offset: 4,
                    width: 4,
                    order: DigitOrder::LittleEndian,
                    scale_hz: 10,
                },
                direction: BitField {
                    offset: 15,
                    mask: 0x03,
                    shift: 0,
                },
                directions: DIRECTIONS,
            },
            ..uv5r::LAYOUT
        };
        assert_eq!(layout.check(), Ok(()));

        let mut image = blank_image(&layout);
        let mut record = [0u8; 16];
        record[0..4].copy_from_slice(&[0x00, 0x40, 0x69, 0x14]); // 146.940
        record[4..8].copy_from_slice(&[0x00, 0x00, 0x06, 0x00]); // 0.600
        record[15] = 0x02;
        write_record(&mut image, &layout, 0, &record);

        let mmap = MemoryMap::new(image);
        let ch = decode_all(&mmap, &layout).unwrap().next().unwrap();
        assert_eq!(ch.rx, Some(Frequency::from_hz(146_940_000)));
        assert_eq!(ch.tx, Some(Frequency::from_hz(146_340_000)));
    }
}
