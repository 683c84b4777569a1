//! modraw-sim: real-time replay of `.modraw` telemetry captures.
//!
//! A capture is a text header followed by a stream of packets, each stamped
//! with the instrument's tick counter. Replay copies every byte to an output
//! file, but releases each packet only once its recorded offset has elapsed
//! on the wall clock, so downstream consumers see the recorded timing.
//!
//! # Modules
//!
//! - [`parse`]: byte cursor, header reader, packet framer, timestamp decoding
//! - [`replay`]: per-file phase machine and pacing loop
//! - [`batch`]: ordered multi-file replay with cross-file packet stitching
//! - [`sink`], [`clock`]: output and time seams
//! - [`cli`], [`logging`], [`exit_codes`]: the `modraw-sim` binary

pub mod batch;
pub mod cli;
pub mod clock;
pub mod exit_codes;
pub mod logging;
pub mod packet;
pub mod parse;
pub mod replay;
pub mod sink;

pub use batch::{run_batch, BatchReport, BatchState, FileReport};
pub use clock::{Clock, ManualClock, SystemClock};
pub use modraw_common::{Error, Result};
pub use packet::{Packet, PartialPacket};
pub use parse::{Parser, Timeline};
pub use replay::{FileReplay, ReplayPhase, ReplayStats};
pub use sink::{FileSink, PacketSink};
