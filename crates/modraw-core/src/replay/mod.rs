//! Real-time replay of one capture file.
//!
//! Each file goes through a fixed sequence of phases:
//!
//! ```text
//! AwaitingHeader ──▶ AwaitingStartPacket ──▶ Replaying ──▶ Done
//!       │                    │                   │
//!       ▼                    ▼                   ▼
//! MalformedHeader    MissingStartPacket   UnsequencedPacket
//! ```
//!
//! Every failure is fatal for the whole batch. Packets are written in input
//! order, each one after waiting until its offset from the batch's first
//! timestamp has elapsed on the wall clock (scaled by the speed multiplier).
//!
//! ```ignore
//! use modraw_core::clock::SystemClock;
//! use modraw_core::replay::FileReplay;
//!
//! let stats = FileReplay::new(parser, &mut sink, &SystemClock, &mut state, &config).run()?;
//! println!("{} packets, {} late", stats.packets, stats.late_packets);
//! ```

pub mod progress;
pub mod scheduler;

pub use progress::{format_packet_line, ProgressReporter};
pub use scheduler::{FileReplay, ReplayPhase, ReplayStats};
