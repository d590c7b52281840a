//! Durable challenge state - the per-user rotation record
//!
//! A single-line file, `"<machineId> <nonce>\n"`. The record is opened once
//! per attempt in combined read/write mode under an exclusive advisory lock
//! spanning load, verify and commit, so only one attempt per user can be in
//! flight at a time. The machine id is read from storage and never
//! regenerated; only the nonce rotates, and only on a successful attempt.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::debug;

use crate::error::StateError;
use crate::model::Challenge;

/// Handle to the durable rotation record, locked for the attempt's lifetime
///
/// The lock is released on drop on every exit path. A second concurrent
/// attempt fails fast rather than blocking.
#[derive(Debug)]
pub struct ChallengeState {
    file: File,
    path: PathBuf,
    current: Challenge,
}

impl ChallengeState {
    /// Open the record read/write, lock it, and parse the current challenge
    pub fn open(path: &Path) -> Result<Self, StateError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|source| StateError::Unavailable {
                path: path.display().to_string(),
                source,
            })?;

        file.try_lock_exclusive().map_err(|source| {
            if source.kind() == fs2::lock_contended_error().kind() {
                StateError::Busy {
                    path: path.display().to_string(),
                }
            } else {
                StateError::Unavailable {
                    path: path.display().to_string(),
                    source,
                }
            }
        })?;

        let mut contents = String::new();
        (&file)
            .read_to_string(&mut contents)
            .map_err(|source| StateError::Unavailable {
                path: path.display().to_string(),
                source,
            })?;
        let first_line = contents.lines().next().unwrap_or("");
        let current = Challenge::parse(first_line)?;

        debug!(path = %path.display(), "challenge state loaded");
        Ok(Self {
            file,
            path: path.to_path_buf(),
            current,
        })
    }

    /// The outstanding challenge the medium's signature must cover
    pub fn current(&self) -> &Challenge {
        &self.current
    }

    /// A fresh candidate for the next rotation
    ///
    /// Computed once per attempt regardless of outcome; a rejected attempt
    /// discards it without touching the record.
    pub fn next_candidate(&self) -> Challenge {
        self.current.advance()
    }

    /// Persist a rotated challenge - the terminal step of a successful
    /// attempt
    ///
    /// The whole record is rewritten and flushed, never appended, so a
    /// concurrent reader can never observe truncated garbage.
    pub fn commit(&mut self, candidate: &Challenge) -> Result<(), StateError> {
        let write = |file: &mut File| -> std::io::Result<()> {
            file.seek(SeekFrom::Start(0))?;
            file.set_len(0)?;
            file.write_all(format!("{candidate}\n").as_bytes())?;
            file.sync_all()
        };
        write(&mut self.file).map_err(|source| StateError::Persist { source })?;

        debug!(path = %self.path.display(), "challenge rotated");
        self.current = candidate.clone();
        Ok(())
    }
}

impl Drop for ChallengeState {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}
