// SPDX-License-Identifier: MIT

//! Write-ahead log: every committed [`spaces_core::Event`], in order.
//!
//! The WAL is the durability primitive underneath the Persistence Layer: a
//! batch is durable the moment its events are appended and flushed here,
//! before [`crate::state::MaterializedState`] is ever touched. Snapshots
//! (see [`crate::snapshot`]) let recovery skip replaying the whole file by
//! starting from a known `processed_seq` instead of zero.

use crate::backup::rotate_bak_path;
use serde::{Deserialize, Serialize};
use spaces_core::Event;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Flush once this many entries have been appended without a flush.
const FLUSH_THRESHOLD: usize = 100;
/// Flush once this long has elapsed since the last flush, even under threshold.
const FLUSH_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum WalError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One committed event, tagged with its position in the log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalEntry {
    pub seq: u64,
    pub event: Event,
}

/// Append-only, JSON-lines write-ahead log.
pub struct Wal {
    path: PathBuf,
    writer: BufWriter<File>,
    entries: Vec<WalEntry>,
    write_seq: u64,
    processed_seq: u64,
    read_cursor: u64,
    unflushed: usize,
    last_flush: Instant,
    #[cfg(any(test, feature = "test-support"))]
    fail_next_append: bool,
    #[cfg(test)]
    fail_on_nth_append: Option<usize>,
}

impl Wal {
    /// Open (creating if absent) the log at `path`, seeding `processed_seq`
    /// (and the read cursor) from `start_seq` — the sequence number a
    /// snapshot was taken at, or 0 for a fresh log.
    ///
    /// A trailing corrupt line (partial write from a crash mid-append) is
    /// not fatal: valid entries up to the corruption point are kept, the
    /// original file is rotated to `.bak`, and a clean file is rewritten
    /// with just those entries.
    pub fn open(path: &Path, start_seq: u64) -> Result<Self, WalError> {
        let raw = std::fs::read_to_string(path).unwrap_or_default();
        let mut entries = Vec::new();
        let mut corrupt = false;
        for line in raw.lines() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<WalEntry>(line) {
                Ok(entry) => entries.push(entry),
                Err(_) => {
                    corrupt = true;
                    break;
                }
            }
        }

        if corrupt && path.exists() {
            let bak = rotate_bak_path(path);
            std::fs::rename(path, &bak)?;
        }

        let write_seq = entries.last().map(|e| e.seq).unwrap_or(0).max(start_seq);

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(true)
            .truncate(false)
            .open(path)?;
        let mut writer = BufWriter::new(file);

        if corrupt {
            // Rewrite a clean copy of the salvaged entries.
            for entry in &entries {
                let line = serde_json::to_string(entry)?;
                writeln!(writer, "{line}")?;
            }
            writer.flush()?;
        }

        Ok(Self {
            path: path.to_path_buf(),
            writer,
            entries,
            write_seq,
            processed_seq: start_seq,
            read_cursor: start_seq,
            unflushed: 0,
            last_flush: Instant::now(),
            #[cfg(any(test, feature = "test-support"))]
            fail_next_append: false,
            #[cfg(test)]
            fail_on_nth_append: None,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Highest sequence number ever appended.
    pub fn write_seq(&self) -> u64 {
        self.write_seq
    }

    /// Highest sequence number the caller has told us is durably applied
    /// to `MaterializedState` (via [`Wal::mark_processed`]).
    pub fn processed_seq(&self) -> u64 {
        self.processed_seq
    }

    /// Make the next call to [`Wal::append`] fail without touching the
    /// file, as if the underlying write syscall had failed. One-shot:
    /// clears itself the moment it fires. For tests exercising storage
    /// failure propagation without relying on a real full disk.
    #[cfg(any(test, feature = "test-support"))]
    pub fn fail_next_append(&mut self) {
        self.fail_next_append = true;
    }

    /// Make the `n`th call to [`Wal::append`] from now fail (`n = 1` is
    /// the very next call), leaving every call before it to succeed. For
    /// exercising a WAL failure partway through a multi-event batch rather
    /// than on the first event.
    #[cfg(test)]
    pub fn fail_on_nth_append(&mut self, n: usize) {
        self.fail_on_nth_append = Some(n);
    }

    /// Append one event, returning its assigned sequence number. Buffered;
    /// call [`Wal::flush`] (or rely on [`Wal::needs_flush`]) to make it
    /// durable.
    pub fn append(&mut self, event: &Event) -> Result<u64, WalError> {
        #[cfg(any(test, feature = "test-support"))]
        if self.fail_next_append {
            self.fail_next_append = false;
            return Err(WalError::Io(std::io::Error::other("injected write failure")));
        }

        #[cfg(test)]
        if let Some(n) = self.fail_on_nth_append {
            if n <= 1 {
                self.fail_on_nth_append = None;
                return Err(WalError::Io(std::io::Error::other("injected write failure")));
            }
            self.fail_on_nth_append = Some(n - 1);
        }

        self.write_seq += 1;
        let entry = WalEntry { seq: self.write_seq, event: event.clone() };
        let line = serde_json::to_string(&entry)?;
        writeln!(self.writer, "{line}")?;
        self.entries.push(entry);
        self.unflushed += 1;
        Ok(self.write_seq)
    }

    /// Flush the buffered writer to the OS.
    pub fn flush(&mut self) -> Result<(), WalError> {
        self.writer.flush()?;
        self.unflushed = 0;
        self.last_flush = Instant::now();
        Ok(())
    }

    /// Whether a flush is due: either the unflushed-entry count or the
    /// time-since-last-flush threshold has been crossed.
    pub fn needs_flush(&self) -> bool {
        self.unflushed >= FLUSH_THRESHOLD || self.last_flush.elapsed() >= FLUSH_INTERVAL
    }

    /// The next entry past the read cursor, advancing it. Distinct from
    /// `processed_seq`: this is a pure iteration cursor, while
    /// `processed_seq` is only moved by an explicit [`Wal::mark_processed`]
    /// call from the caller once the entry is durably applied.
    pub fn next_unprocessed(&mut self) -> Result<Option<WalEntry>, WalError> {
        let next = self
            .entries
            .iter()
            .find(|e| e.seq > self.read_cursor)
            .cloned();
        if let Some(entry) = &next {
            self.read_cursor = entry.seq;
        }
        Ok(next)
    }

    /// Record that replay has durably applied up through `seq`.
    pub fn mark_processed(&mut self, seq: u64) {
        self.processed_seq = seq;
    }

    /// All entries strictly after `seq`, in order.
    pub fn entries_after(&self, seq: u64) -> Result<Vec<WalEntry>, WalError> {
        Ok(self.entries.iter().filter(|e| e.seq > seq).cloned().collect())
    }

    /// Drop entries with `seq < keep_from` and rewrite the file, typically
    /// called right after a snapshot checkpoint makes them redundant.
    pub fn truncate_before(&mut self, keep_from: u64) -> Result<(), WalError> {
        self.entries.retain(|e| e.seq >= keep_from);

        let file = OpenOptions::new().create(true).write(true).truncate(true).open(&self.path)?;
        let mut writer = BufWriter::new(file);
        for entry in &self.entries {
            let line = serde_json::to_string(entry)?;
            writeln!(writer, "{line}")?;
        }
        writer.flush()?;
        self.writer = writer;
        self.unflushed = 0;
        self.last_flush = Instant::now();
        Ok(())
    }
}

#[cfg(test)]
#[path = "wal_tests.rs"]
mod tests;
