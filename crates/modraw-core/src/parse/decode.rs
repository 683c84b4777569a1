//! Timestamp and signature decoding.
//!
//! A sequenced packet starts `T<ticks>$<SIGNATURE>`; ticks are hundredths of
//! a second on the instrument's counter. The [`Timeline`] turns ticks into a
//! millisecond offset from the first tick of the batch and, given the header's
//! `OFFSET_TIME`, into an absolute date.

use chrono::{DateTime, TimeDelta, Utc};
use tracing::debug;

use modraw_common::format::{MS_PER_TICK, RECORD_SEPARATOR, TIME_MARKER};
use modraw_config::DateMode;

use crate::packet::Packet;

/// Tokens found at the head of a packet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Stamp {
    /// Tick count, present only when the digit run ends with `$`.
    pub ticks: Option<u64>,
    /// `$` plus the uppercase letters after it, or empty.
    pub signature: String,
}

/// Scan the time and signature tokens of one packet.
pub fn decode_stamp(raw: &[u8]) -> Stamp {
    let mut stamp = Stamp::default();
    let mut at = 0;

    if raw.first() == Some(&TIME_MARKER) {
        at = 1;
        let mut ticks: u64 = 0;
        while let Some(digit) = raw.get(at).filter(|b| b.is_ascii_digit()) {
            ticks = ticks.saturating_mul(10).saturating_add(u64::from(digit - b'0'));
            at += 1;
        }
        if raw.get(at) == Some(&RECORD_SEPARATOR) {
            stamp.ticks = Some(ticks);
        }
    }

    if raw.get(at) == Some(&RECORD_SEPARATOR) {
        stamp.signature.push(RECORD_SEPARATOR as char);
        stamp.signature.extend(
            raw[at + 1..]
                .iter()
                .take_while(|b| b.is_ascii_uppercase())
                .map(|&b| b as char),
        );
    }
    stamp
}

/// Batch-wide time reference.
///
/// The anchor is the first valid tick seen in the batch and is never reset.
/// The year offset is replaced by each file's header.
#[derive(Debug, Clone)]
pub struct Timeline {
    mode: DateMode,
    anchor: Option<u64>,
    year_offset: Option<i64>,
}

impl Timeline {
    pub fn new(mode: DateMode) -> Self {
        Self {
            mode,
            anchor: None,
            year_offset: None,
        }
    }

    /// A timeline whose anchor is already fixed.
    pub fn with_anchor(mode: DateMode, anchor: u64) -> Self {
        Self {
            anchor: Some(anchor),
            ..Self::new(mode)
        }
    }

    pub fn mode(&self) -> DateMode {
        self.mode
    }

    pub fn anchor(&self) -> Option<u64> {
        self.anchor
    }

    pub fn year_offset(&self) -> Option<i64> {
        self.year_offset
    }

    pub fn set_year_offset(&mut self, seconds: i64) {
        self.year_offset = Some(seconds);
    }

    /// Milliseconds since the anchor, fixing the anchor on first use. `None`
    /// when the distance does not fit in an `i64` of milliseconds.
    pub fn offset_ms(&mut self, ticks: u64) -> Option<i64> {
        let anchor = *self.anchor.get_or_insert_with(|| {
            debug!(ticks, "anchoring timeline");
            ticks
        });
        i64::try_from(ticks)
            .ok()?
            .checked_sub(i64::try_from(anchor).ok()?)?
            .checked_mul(MS_PER_TICK)
    }

    /// Absolute instant of `ticks`: year offset plus ticks, when dates are on.
    pub fn date(&self, ticks: u64) -> Option<DateTime<Utc>> {
        if self.mode != DateMode::Absolute {
            return None;
        }
        let base = DateTime::from_timestamp(self.year_offset?, 0)?;
        let since = TimeDelta::try_milliseconds(i64::try_from(ticks).ok()?.checked_mul(MS_PER_TICK)?)?;
        base.checked_add_signed(since)
    }

    /// Decode a framed packet. `at` is its byte position in the file.
    pub fn sequence(&mut self, raw: Vec<u8>, at: usize) -> Packet {
        let stamp = decode_stamp(&raw);
        let (offset_ms, date) = match stamp.ticks {
            Some(ticks) => (self.offset_ms(ticks), self.date(ticks)),
            None => (None, None),
        };
        Packet {
            raw,
            at,
            offset_ms,
            date,
            signature: stamp.signature,
        }
    }
}
