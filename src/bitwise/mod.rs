// Binary parsing helpers for radio memory images

pub mod bcd;
pub mod parser;
pub mod types;

pub use bcd::{bcd_to_freq, bcd_to_int, freq_to_bcd, int_to_bcd, BcdError};
pub use parser::{field_at, le_u16_at, parse_fill_terminated};
pub use types::DigitOrder;
