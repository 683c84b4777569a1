//! Batch replay: every job in order, one shared timeline.
//!
//! Files of a chunked recording are pieces of one stream. The timeline anchor,
//! the wall-clock origin, and a packet cut at the end of one file all carry
//! over to the next file, so the batch replays as if it had never been split.

use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;
use tracing::{info, info_span};

use modraw_common::{Error, Result};
use modraw_config::{DateMode, FileJob, ReplayConfig};

use crate::clock::Clock;
use crate::packet::PartialPacket;
use crate::parse::{Parser, Timeline};
use crate::replay::{FileReplay, ReplayStats};
use crate::sink::{remove_stale_output, FileSink};

/// State that outlives a single file.
#[derive(Debug)]
pub struct BatchState {
    pub timeline: Timeline,
    /// Head of the packet cut at the end of the previous file.
    pub partial: Option<PartialPacket>,
    /// Wall-clock instant matching offset zero.
    pub origin: Option<Instant>,
}

impl BatchState {
    pub fn new(mode: DateMode) -> Self {
        Self {
            timeline: Timeline::new(mode),
            partial: None,
            origin: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub input: PathBuf,
    pub output: PathBuf,
    #[serde(flatten)]
    pub stats: ReplayStats,
    /// Bytes of a cut packet handed to the next file.
    pub carried_out: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub files: Vec<FileReport>,
}

impl BatchReport {
    pub fn total_packets(&self) -> usize {
        self.files.iter().map(|f| f.stats.packets).sum()
    }

    pub fn total_bytes(&self) -> usize {
        self.files.iter().map(|f| f.stats.bytes_written).sum()
    }

    pub fn late_packets(&self) -> usize {
        self.files.iter().map(|f| f.stats.late_packets).sum()
    }
}

/// Replay every job in order. The first failure stops the batch; outputs of
/// files already finished stay on disk.
pub fn run_batch<C: Clock>(
    jobs: &[FileJob],
    config: &ReplayConfig,
    clock: &C,
) -> Result<BatchReport> {
    let mut state = BatchState::new(config.date_mode);
    let mut report = BatchReport::default();

    for (index, job) in jobs.iter().enumerate() {
        let span = info_span!("file", index, input = %job.input.display());
        let _guard = span.enter();

        let last = index + 1 == jobs.len();
        let file =
            run_job(job, last, config, clock, &mut state).map_err(|e| e.in_file(&job.input))?;
        info!(
            packets = file.stats.packets,
            bytes = file.stats.bytes_written,
            late = file.stats.late_packets,
            output = %file.output.display(),
            "file replayed"
        );
        report.files.push(file);
    }

    Ok(report)
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| Error::io(path, e))
}

/// The last job keeps a cut packet at its end: no file follows to complete it.
fn run_job<C: Clock>(
    job: &FileJob,
    last: bool,
    config: &ReplayConfig,
    clock: &C,
    state: &mut BatchState,
) -> Result<FileReport> {
    // Read before clearing the output, which may be the input itself.
    let mut parser = Parser::new(read_input(&job.input)?);
    remove_stale_output(&job.output)?;

    // Detached now so the cut bytes are never replayed from this file.
    let outgoing = if last {
        None
    } else {
        parser.extract_partial_end_packet()
    };

    let mut sink = FileSink::new(&job.output);
    let stats = FileReplay::new(parser, &mut sink, clock, state, config).run()?;

    let carried_out = outgoing.as_ref().map_or(0, PartialPacket::len);
    state.partial = outgoing;
    Ok(FileReport {
        input: job.input.clone(),
        output: job.output.clone(),
        stats,
        carried_out,
    })
}
