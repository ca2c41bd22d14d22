use core::fmt;

use embedded_can::StandardId;

use crate::{PAYLOAD_SIZE, RECORD_SIZE};

/// A single CAN frame as captured by the logger.
///
/// The logger writes every frame it sees as one fixed 16-byte record: a
/// reserved byte, a millisecond timestamp, the message ID, the declared data
/// length and the full 8-byte data area. The data area is stored in full
/// even when the declared length is shorter, so all 8 captured bytes are
/// available regardless of what the length byte claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogRecord {
    // Reserved byte, carried through untouched so a record re-encodes
    // byte-for-byte, but never interpreted.
    dummy: u8,
    timestamp_ms: u32,
    id: u16,
    length: u8,
    payload: [u8; PAYLOAD_SIZE],
}

impl LogRecord {
    /// Creates a record from decoded field values (reserved byte zeroed).
    pub fn new(timestamp_ms: u32, id: u16, length: u8, payload: [u8; PAYLOAD_SIZE]) -> Self {
        Self {
            dummy: 0,
            timestamp_ms,
            id,
            length,
            payload,
        }
    }

    /// Decodes one on-disk record.
    ///
    /// Every field is taken as stored: the timestamp from bytes 1..=4 and
    /// the ID from bytes 5..=6, both little-endian, the length byte as-is
    /// with no range check, and the full data area from bytes 8..=15.
    pub fn from_bytes(buffer: &[u8; RECORD_SIZE]) -> Self {
        Self {
            dummy: buffer[0],
            timestamp_ms: u32::from_le_bytes([buffer[1], buffer[2], buffer[3], buffer[4]]),
            id: u16::from_le_bytes([buffer[5], buffer[6]]),
            length: buffer[7],
            payload: buffer[8..].try_into().unwrap(),
        }
    }

    /// Re-encodes the record into its 16-byte on-disk form.
    pub fn as_bytes(&self) -> [u8; RECORD_SIZE] {
        let mut buffer = [0u8; RECORD_SIZE];

        buffer[0] = self.dummy;
        buffer[1..5].copy_from_slice(&self.timestamp_ms.to_le_bytes());
        buffer[5..7].copy_from_slice(&self.id.to_le_bytes());
        buffer[7] = self.length;
        buffer[8..].copy_from_slice(&self.payload);

        buffer
    }

    /// Milliseconds since the logger started capturing.
    pub fn timestamp_ms(&self) -> u32 {
        self.timestamp_ms
    }

    /// The message ID exactly as stored in the record.
    pub fn id(&self) -> u16 {
        self.id
    }

    /// The stored ID as a typed standard CAN ID, or `None` if the stored
    /// value falls outside the 11-bit range.
    pub fn standard_id(&self) -> Option<StandardId> {
        StandardId::new(self.id)
    }

    /// The declared data length, exactly as stored (the capture format does
    /// not guarantee it is in 0..=8).
    pub fn length(&self) -> u8 {
        self.length
    }

    /// The full 8-byte data area of the record.
    pub fn payload(&self) -> &[u8; PAYLOAD_SIZE] {
        &self.payload
    }

    /// The data bytes covered by the declared length. Will return `None` if
    /// the declared length exceeds the 8-byte data area.
    pub fn declared_data(&self) -> Option<&[u8]> {
        self.payload.get(..self.length as usize)
    }
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:8}ms   ID: {:03x} | Length: {} || ",
            self.timestamp_ms, self.id, self.length
        )?;

        for byte in &self.payload {
            write!(f, " {:02x}", byte)?;
        }

        Ok(())
    }
}
