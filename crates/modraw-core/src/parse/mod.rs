//! Capture file parsing.
//!
//! A [`Parser`] owns one file's bytes and walks them in three steps:
//! [`read_header`](Parser::read_header), then one
//! [`next_packet`](Parser::next_packet) per packet until it returns `None`.
//! Time decoding goes through a [`Timeline`] that belongs to the batch, not
//! the file, so offsets stay continuous across files.

pub mod cursor;
pub mod decode;
pub mod framer;
pub mod header;

pub use cursor::ByteCursor;
pub use decode::{decode_stamp, Stamp, Timeline};
pub use header::{read_header, Header};

use crate::packet::{Packet, PartialPacket};
use modraw_common::Result;

#[derive(Debug, Clone)]
pub struct Parser {
    cursor: ByteCursor,
}

impl Parser {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            cursor: ByteCursor::new(data),
        }
    }

    pub fn cursor(&self) -> &ByteCursor {
        &self.cursor
    }

    pub fn read_header(&mut self) -> Result<Header> {
        read_header(&mut self.cursor)
    }

    /// Frame and decode the next packet; `None` at the end of usable data.
    pub fn next_packet(&mut self, timeline: &mut Timeline) -> Option<Packet> {
        let at = self.cursor.position();
        let raw = framer::next_frame(&mut self.cursor)?;
        Some(timeline.sequence(raw, at))
    }

    pub fn extract_partial_end_packet(&mut self) -> Option<PartialPacket> {
        framer::extract_partial_end_packet(&mut self.cursor)
    }

    pub fn insert_partial_end_packet(&mut self, partial: PartialPacket) {
        framer::insert_partial_end_packet(&mut self.cursor, partial)
    }

    pub fn progress(&self) -> f64 {
        self.cursor.progress()
    }

    pub fn remaining(&self) -> usize {
        self.cursor.remaining()
    }
}
