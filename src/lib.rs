mod decoder;
mod record;

// Dummy, timestamp 1234ms (LE), ID 0x1234 (LE), length 8, 8 data bytes
// 00 D2 04 00 00 34 12 08 11 22 33 44 55 66 77 88

/// Size of one on-disk capture record.
pub const RECORD_SIZE: usize = 16;

/// Size of the data area stored in every record, independent of the
/// declared frame length.
pub const PAYLOAD_SIZE: usize = 8;

pub use decoder::*;
pub use record::*;

pub use embedded_can::{Id, StandardId};
