//! Human-readable replay progress.
//!
//! Verbose runs log one line per packet with its reconstructed time; quiet
//! runs redraw a single progress line on stderr when it is a terminal.
//! Nothing here affects pacing.

use std::io::{IsTerminal, Write};

use chrono::{DateTime, Utc};
use tracing::info;

use crate::packet::Packet;

/// `2023/01/01 01:00:00.50`, centisecond resolution like the tick counter.
fn format_date(date: &DateTime<Utc>) -> String {
    format!(
        "{}.{:02}",
        date.format("%Y/%m/%d %H:%M:%S"),
        date.timestamp_subsec_millis() / 10
    )
}

/// One verbose progress line: `12.5% - T2023/01/01 01:00:00.50 $EFE`.
/// Without an absolute date the relative offset is shown instead.
pub fn format_packet_line(progress: f64, packet: &Packet) -> String {
    let time = match (&packet.date, packet.offset_ms) {
        (Some(date), _) => format!("T{}", format_date(date)),
        (None, Some(offset)) => format!("+{offset}ms"),
        (None, None) => "-".to_string(),
    };
    format!("{progress:.1}% - {time} {}", packet.signature)
}

#[derive(Debug)]
pub struct ProgressReporter {
    verbose: bool,
    draw_line: bool,
    last_drawn: Option<f64>,
}

impl ProgressReporter {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            draw_line: !verbose && std::io::stderr().is_terminal(),
            last_drawn: None,
        }
    }

    /// Report a packet that was just written.
    pub fn packet(&mut self, progress: f64, packet: &Packet) {
        if self.verbose {
            info!(
                progress,
                offset_ms = packet.offset_ms,
                "{}",
                format_packet_line(progress, packet)
            );
        } else if self.draw_line && self.last_drawn != Some(progress) {
            self.last_drawn = Some(progress);
            let mut stderr = std::io::stderr().lock();
            // Progress output is best effort.
            let _ = write!(stderr, "\r Progress: {progress:.1}% ");
            let _ = stderr.flush();
        }
    }

    /// End the redrawn progress line, if one was drawn.
    pub fn finish(&mut self) {
        if self.last_drawn.take().is_some() {
            let _ = writeln!(std::io::stderr());
        }
    }
}
