//! Packet types.

use chrono::{DateTime, Utc};

/// One framed packet and what was decoded from its head.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// Raw bytes, checksum footer and terminator included. Written verbatim.
    pub raw: Vec<u8>,
    /// Byte position of the packet in its (possibly spliced) file buffer.
    pub at: usize,
    /// Milliseconds since the first timestamped packet of the batch.
    pub offset_ms: Option<i64>,
    pub date: Option<DateTime<Utc>>,
    /// `$` plus uppercase letters, e.g. `$SOM`; empty if none.
    pub signature: String,
}

impl Packet {
    pub fn is_sequenced(&self) -> bool {
        self.offset_ms.is_some() || self.date.is_some()
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

/// The head of a packet cut off at the end of a chunked capture file. It
/// moves to the next file of the batch, where the rest of the packet is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialPacket(Vec<u8>);

impl PartialPacket {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
