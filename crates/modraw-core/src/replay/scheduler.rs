//! Per-file replay state machine and pacing loop.

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info};

use modraw_common::format::START_OF_MISSION;
use modraw_common::{Error, Result};
use modraw_config::{DateMode, ReplayConfig};

use super::progress::ProgressReporter;
use crate::batch::BatchState;
use crate::clock::Clock;
use crate::packet::Packet;
use crate::parse::framer::closes_abruptly;
use crate::parse::Parser;
use crate::sink::PacketSink;

/// Where a file replay stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplayPhase {
    AwaitingHeader,
    AwaitingStartPacket,
    Replaying,
    Done,
}

impl ReplayPhase {
    pub fn name(self) -> &'static str {
        match self {
            ReplayPhase::AwaitingHeader => "awaiting_header",
            ReplayPhase::AwaitingStartPacket => "awaiting_start_packet",
            ReplayPhase::Replaying => "replaying",
            ReplayPhase::Done => "done",
        }
    }
}

/// Counters for one replayed file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReplayStats {
    pub header_bytes: usize,
    /// Packets written, start-of-mission packet included.
    pub packets: usize,
    pub bytes_written: usize,
    /// Packets that were already behind schedule and went out without waiting.
    pub late_packets: usize,
    /// Size of the previous file's partial packet spliced into this one.
    pub spliced_in: usize,
    /// Bytes too short to form a packet at the end of the file, dropped.
    pub trailing_stub: usize,
}

/// Replays one capture file into a sink.
pub struct FileReplay<'a, C: Clock, S: PacketSink> {
    parser: Parser,
    sink: &'a mut S,
    clock: &'a C,
    state: &'a mut BatchState,
    config: &'a ReplayConfig,
    phase: ReplayPhase,
    stats: ReplayStats,
    progress: ProgressReporter,
}

impl<'a, C: Clock, S: PacketSink> FileReplay<'a, C, S> {
    pub fn new(
        parser: Parser,
        sink: &'a mut S,
        clock: &'a C,
        state: &'a mut BatchState,
        config: &'a ReplayConfig,
    ) -> Self {
        Self {
            parser,
            sink,
            clock,
            state,
            config,
            phase: ReplayPhase::AwaitingHeader,
            stats: ReplayStats::default(),
            progress: ProgressReporter::new(config.verbose),
        }
    }

    pub fn phase(&self) -> ReplayPhase {
        self.phase
    }

    pub fn stats(&self) -> &ReplayStats {
        &self.stats
    }

    /// Run every remaining phase.
    pub fn run(mut self) -> Result<ReplayStats> {
        while self.phase != ReplayPhase::Done {
            self.step()?;
        }
        self.progress.finish();
        Ok(self.stats)
    }

    /// Advance by one header, start packet, or packet. Returns the new phase.
    pub fn step(&mut self) -> Result<ReplayPhase> {
        let next = match self.phase {
            ReplayPhase::AwaitingHeader => self.replay_header()?,
            ReplayPhase::AwaitingStartPacket => self.replay_start_packet()?,
            ReplayPhase::Replaying => self.replay_next_packet()?,
            ReplayPhase::Done => ReplayPhase::Done,
        };
        if next != self.phase {
            debug!(from = self.phase.name(), to = next.name(), "phase change");
        }
        self.phase = next;
        Ok(next)
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.sink.write_chunk(bytes)?;
        self.stats.bytes_written += bytes.len();
        Ok(())
    }

    fn replay_header(&mut self) -> Result<ReplayPhase> {
        let header = self.parser.read_header()?;
        match header.year_offset {
            Some(seconds) => self.state.timeline.set_year_offset(seconds),
            None if self.state.timeline.mode() == DateMode::Absolute => {
                return Err(Error::MalformedHeader {
                    line: header.line_count,
                    reason: "no OFFSET_TIME line; needed for absolute dates".to_string(),
                });
            }
            None => {}
        }
        self.write(&header.text)?;
        self.stats.header_bytes = header.text.len();
        debug!(lines = header.line_count, year_offset = header.year_offset, "header written");
        Ok(ReplayPhase::AwaitingStartPacket)
    }

    fn replay_start_packet(&mut self) -> Result<ReplayPhase> {
        let packet = self
            .parser
            .next_packet(&mut self.state.timeline)
            .ok_or_else(|| Error::MissingStartPacket("no packet after the header".to_string()))?;
        if packet.is_sequenced() {
            return Err(Error::MissingStartPacket(format!(
                "first packet at byte {} carries a timestamp",
                packet.at
            )));
        }
        if packet.signature.as_bytes() != START_OF_MISSION {
            return Err(Error::MissingStartPacket(format!(
                "first packet at byte {} has signature '{}'",
                packet.at, packet.signature
            )));
        }
        // Without the abrupt footer the continuation bytes were framed into
        // the start packet, and splicing would glue them to the wrong packet.
        if self.state.partial.is_some() && !closes_abruptly(&packet.raw) {
            return Err(Error::MissingStartPacket(format!(
                "start packet at byte {} has no '$ENDSOM' footer but a cut packet \
                 from the previous file needs its continuation",
                packet.at
            )));
        }
        self.write(&packet.raw)?;
        self.stats.packets += 1;

        // The continuation of the previous file's cut packet follows the
        // start-of-mission packet.
        if let Some(partial) = self.state.partial.take() {
            self.stats.spliced_in = partial.len();
            self.parser.insert_partial_end_packet(partial);
        }

        if self.state.origin.is_none() {
            self.state.origin = Some(self.clock.now());
            info!("replay clock started");
        }
        Ok(ReplayPhase::Replaying)
    }

    fn replay_next_packet(&mut self) -> Result<ReplayPhase> {
        let remaining = self.parser.remaining();
        let Some(packet) = self.parser.next_packet(&mut self.state.timeline) else {
            self.stats.trailing_stub = remaining;
            if remaining > 0 {
                debug!(bytes = remaining, "dropped trailing stub");
            }
            return Ok(ReplayPhase::Done);
        };
        if !packet.is_sequenced() {
            return Err(Error::UnsequencedPacket { offset: packet.at });
        }

        self.pace(&packet);
        self.write(&packet.raw)?;
        self.stats.packets += 1;
        self.progress.packet(self.parser.progress(), &packet);
        Ok(ReplayPhase::Replaying)
    }

    /// Wait until `packet` is due. Late packets go out immediately.
    fn pace(&mut self, packet: &Packet) {
        let Some(offset_ms) = packet.offset_ms else {
            return;
        };
        let now = self.clock.now();
        let origin = *self.state.origin.get_or_insert(now);
        let elapsed = now.saturating_duration_since(origin);
        let scheduled = Duration::from_millis(offset_ms.max(0).unsigned_abs());

        if scheduled > elapsed {
            // Float-to-int `as` saturates, so a huge gap can't wrap.
            let nanos = ((scheduled - elapsed).as_nanos() as f64 / self.config.speed).round();
            self.clock.sleep(Duration::from_nanos(nanos as u64));
        } else if scheduled < elapsed {
            self.stats.late_packets += 1;
        }
    }
}
