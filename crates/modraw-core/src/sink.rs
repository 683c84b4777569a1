//! Output sinks.

use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use modraw_common::{Error, Result};

/// Append-only destination for header and packet bytes.
pub trait PacketSink {
    /// Write all of `bytes` or fail; partial chunks are never left behind by
    /// a successful call.
    fn write_chunk(&mut self, bytes: &[u8]) -> Result<()>;
}

impl PacketSink for Vec<u8> {
    fn write_chunk(&mut self, bytes: &[u8]) -> Result<()> {
        self.extend_from_slice(bytes);
        Ok(())
    }
}

/// Replay output file.
///
/// The file is created on the first write, so a run that fails before
/// anything is written leaves no file. Each chunk is flushed before the call
/// returns: killing the process mid-replay leaves the output cut at a packet
/// boundary.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    file: Option<File>,
    bytes_written: u64,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file: None,
            bytes_written: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    fn open(&mut self) -> Result<&mut File> {
        if self.file.is_none() {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)
                .map_err(|e| Error::io(&self.path, e))?;
            debug!(path = %self.path.display(), "opened output");
            self.file = Some(file);
        }
        self.file
            .as_mut()
            .ok_or_else(|| Error::io(&self.path, ErrorKind::NotFound.into()))
    }
}

impl PacketSink for FileSink {
    fn write_chunk(&mut self, bytes: &[u8]) -> Result<()> {
        let path = self.path.clone();
        let file = self.open()?;
        file.write_all(bytes)
            .and_then(|()| file.flush())
            .map_err(|e| Error::io(path, e))?;
        self.bytes_written += bytes.len() as u64;
        Ok(())
    }
}

/// Delete a previous replay output. Returns whether a file was removed.
pub fn remove_stale_output(path: &Path) -> Result<bool> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            debug!(path = %path.display(), "removed stale output");
            Ok(true)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::io(path, e)),
    }
}
