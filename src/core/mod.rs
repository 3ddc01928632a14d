// Core module containing the normalized channel model
pub mod channel;
pub mod constants;
pub mod power;
pub mod tone;

// Re-export commonly used types
pub use channel::{Channel, Frequency};
pub use constants::*;
pub use power::PowerLevel;
pub use tone::{ToneDescriptor, ToneEncoding};
