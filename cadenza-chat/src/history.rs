//! Chat history: the ordered turn log and its on-disk artifacts.
//!
//! `export` writes two files into a directory: `transcript.json` with the
//! per-turn records and `combined.wav` with the spliced audio track. Write
//! failures come back as [`WriteError`] values, so a caller exporting
//! several sessions can report one failure and continue with the rest.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use cadenza_core::codec::{self, SaveOptions};
use cadenza_core::error::WriteError;
use cadenza_core::transcript::{self, TranscriptRecord, Turn};
use tracing::info;

const RECORDS_FILE: &str = "transcript.json";
const COMBINED_FILE: &str = "combined.wav";

/// Ordered log of chat turns. The history owns its turns; assembly and
/// export read them without mutation.
#[derive(Debug, Default)]
pub struct ChatHistory {
    turns: Vec<Turn>,
}

/// Paths written by [`ChatHistory::export`].
#[derive(Debug, Clone)]
pub struct ExportedHistory {
    pub records_path: PathBuf,
    pub combined_path: PathBuf,
}

impl ChatHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Assemble the combined track and write it with the transcript
    /// records into `dir`.
    pub fn export(
        &self,
        dir: impl AsRef<Path>,
        role_map: Option<&dyn Fn(&str) -> String>,
    ) -> Result<ExportedHistory, WriteError> {
        let dir = dir.as_ref();
        let (combined, records) = transcript::assemble(&self.turns, role_map);

        fs::create_dir_all(dir).map_err(|source| WriteError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;

        let records_path = dir.join(RECORDS_FILE);
        let json = serde_json::to_vec_pretty(&records)
            .map_err(|e| WriteError::Encoder(e.to_string()))?;
        fs::write(&records_path, json)?;

        let combined_path = dir.join(COMBINED_FILE);
        codec::save(&combined_path, &combined, &SaveOptions::default())?;

        info!(
            turns = self.turns.len(),
            dir = %dir.display(),
            "exported chat history"
        );
        Ok(ExportedHistory {
            records_path,
            combined_path,
        })
    }

    /// Reload transcript records written by [`export`]. Audio is not
    /// restored onto turns — the records are the persistence format.
    pub fn load_records(dir: impl AsRef<Path>) -> io::Result<Vec<TranscriptRecord>> {
        let raw = fs::read(dir.as_ref().join(RECORDS_FILE))?;
        serde_json::from_slice(&raw).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}
