// Binary-Coded Decimal (BCD) encoding/decoding
// Frequencies in radio images are packed two decimal digits per byte

use super::types::DigitOrder;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BcdError {
    #[error("Malformed BCD byte: {0:#04x}")]
    MalformedBcd(u8),

    #[error("Value {value} does not fit in a {width}-byte BCD field")]
    ValueTooLarge { value: u64, width: usize },

    #[error("Frequency {hz} Hz is not a multiple of the {scale_hz} Hz field resolution")]
    Unrepresentable { hz: u64, scale_hz: u64 },
}

pub type Result<T> = std::result::Result<T, BcdError>;

/// Convert a BCD byte to its two decimal digits (tens, ones)
/// Example: 0x12 -> (1, 2), 0x95 -> (9, 5)
pub fn bcd_byte_to_digits(byte: u8) -> Result<(u8, u8)> {
    let tens = (byte & 0xF0) >> 4;
    let ones = byte & 0x0F;

    if tens > 9 || ones > 9 {
        return Err(BcdError::MalformedBcd(byte));
    }

    Ok((tens, ones))
}

/// Convert two decimal digits to a BCD byte
pub fn digits_to_bcd_byte(tens: u8, ones: u8) -> Result<u8> {
    if tens > 9 || ones > 9 {
        return Err(BcdError::MalformedBcd((tens << 4) | (ones & 0x0F)));
    }

    Ok((tens << 4) | ones)
}

/// Digits of one byte in significance order, honouring the nibble order
fn byte_digits(byte: u8, order: DigitOrder) -> Result<(u8, u8)> {
    let (hi, lo) = bcd_byte_to_digits(byte)?;
    if order.swaps_nibbles() {
        Ok((lo, hi))
    } else {
        Ok((hi, lo))
    }
}

/// Convert a BCD field to an integer
///
/// Examples:
/// - `[0x12, 0x34, 0x56]` big-endian -> 123456
/// - `[0x56, 0x34, 0x12]` little-endian -> 123456
/// - `[0x21, 0x43, 0x65]` nibble-swapped -> 123456
pub fn bcd_to_int(bytes: &[u8], order: DigitOrder) -> Result<u64> {
    let accumulate = |value: u64, &byte: &u8| -> Result<u64> {
        let (first, second) = byte_digits(byte, order)?;
        value
            .checked_mul(100)
            .and_then(|v| v.checked_add((first * 10 + second) as u64))
            .ok_or(BcdError::ValueTooLarge {
                value,
                width: bytes.len(),
            })
    };

    if order.reverses_bytes() {
        bytes.iter().rev().try_fold(0u64, accumulate)
    } else {
        bytes.iter().try_fold(0u64, accumulate)
    }
}

/// Convert an integer to a BCD field of `width` bytes
pub fn int_to_bcd(value: u64, width: usize, order: DigitOrder) -> Result<Vec<u8>> {
    let mut result = vec![0u8; width];
    let mut remaining = value;

    // Fill least significant pair first, then place by byte order
    for i in 0..width {
        let pair = (remaining % 100) as u8;
        remaining /= 100;

        let (tens, ones) = (pair / 10, pair % 10);
        let byte = if order.swaps_nibbles() {
            digits_to_bcd_byte(ones, tens)?
        } else {
            digits_to_bcd_byte(tens, ones)?
        };

        let pos = if order.reverses_bytes() { i } else { width - 1 - i };
        result[pos] = byte;
    }

    if remaining > 0 {
        return Err(BcdError::ValueTooLarge { value, width });
    }

    Ok(result)
}

/// Decode a BCD frequency field into hertz
///
/// `scale_hz` is the resolution of one count in the field; Baofeng-style
/// radios store frequencies in 10 Hz units, so `50 62 25 46` (little-endian)
/// is 46256250 × 10 Hz = 462.5625 MHz.
pub fn bcd_to_freq(bytes: &[u8], order: DigitOrder, scale_hz: u64) -> Result<u64> {
    let counts = bcd_to_int(bytes, order)?;
    counts
        .checked_mul(scale_hz)
        .ok_or(BcdError::ValueTooLarge {
            value: counts,
            width: bytes.len(),
        })
}

/// Encode a frequency in hertz into a BCD field
pub fn freq_to_bcd(hz: u64, width: usize, order: DigitOrder, scale_hz: u64) -> Result<Vec<u8>> {
    if scale_hz == 0 || hz % scale_hz != 0 {
        return Err(BcdError::Unrepresentable { hz, scale_hz });
    }
    int_to_bcd(hz / scale_hz, width, order)
}

/// Check that every nibble of a field is a decimal digit
pub fn is_valid_bcd(bytes: &[u8]) -> bool {
    bytes.iter().all(|&b| bcd_byte_to_digits(b).is_ok())
}
