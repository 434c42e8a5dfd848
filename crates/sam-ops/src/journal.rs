//! JSONL mutation journal.
//!
//! Every write samops makes against platform data is appended to a per-run
//! `{journal_dir}/{run_id}.jsonl` file, one entry per row touched, so a repair
//! can be reviewed (or undone by hand) after the fact.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::OpsError;

/// What happened to one attempted mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Applied { rows: usize },
    Failed { error: String },
}

/// One line in the journal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub ts: DateTime<Utc>,
    pub run_id: String,
    /// `update`, `insert`, `delete`, `webhook`, `workflow_update`.
    pub action: String,
    pub table: String,
    /// Row id, batch label, or workflow id.
    pub target: String,
    pub changes: Value,
    pub outcome: Outcome,
}

/// Run id for a journal file, e.g. `run-20251014T093000-4711`.
#[must_use]
pub fn new_run_id(now: DateTime<Utc>) -> String {
    format!("run-{}-{}", now.format("%Y%m%dT%H%M%S"), std::process::id())
}

/// Appends journal entries for one run.
#[derive(Debug, Clone)]
pub struct JournalWriter {
    dir: PathBuf,
    run_id: String,
    enabled: bool,
}

impl JournalWriter {
    /// Writer for a fresh run under `dir`, creating the directory.
    ///
    /// # Errors
    ///
    /// Returns [`OpsError::Journal`] if the directory cannot be created.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, OpsError> {
        Self::with_run_id(dir, new_run_id(Utc::now()))
    }

    /// # Errors
    ///
    /// Returns [`OpsError::Journal`] if the directory cannot be created.
    pub fn with_run_id(dir: impl Into<PathBuf>, run_id: impl Into<String>) -> Result<Self, OpsError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            run_id: run_id.into(),
            enabled: true,
        })
    }

    /// A writer that records nothing.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            dir: PathBuf::new(),
            run_id: String::new(),
            enabled: false,
        }
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// `{dir}/{run_id}.jsonl`, or `None` when disabled.
    #[must_use]
    pub fn path(&self) -> Option<PathBuf> {
        self.enabled
            .then(|| self.dir.join(format!("{}.jsonl", self.run_id)))
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Append one entry.
    ///
    /// # Errors
    ///
    /// Returns [`OpsError::Journal`] if the file write fails.
    pub fn append(&self, entry: &JournalEntry) -> Result<(), OpsError> {
        let Some(path) = self.path() else {
            return Ok(());
        };
        serde_jsonlines::append_json_lines(&path, [entry])?;
        Ok(())
    }

    /// Build an entry stamped with this run and now, then append it.
    ///
    /// # Errors
    ///
    /// Returns [`OpsError::Journal`] if the file write fails.
    pub fn record(
        &self,
        action: &str,
        table: &str,
        target: &str,
        changes: Value,
        outcome: Outcome,
    ) -> Result<(), OpsError> {
        self.append(&JournalEntry {
            ts: Utc::now(),
            run_id: self.run_id.clone(),
            action: action.to_string(),
            table: table.to_string(),
            target: target.to_string(),
            changes,
            outcome,
        })
    }

    /// Every entry written so far in this run.
    ///
    /// # Errors
    ///
    /// Returns [`OpsError::Journal`] if the file exists but cannot be read.
    pub fn entries(&self) -> Result<Vec<JournalEntry>, OpsError> {
        let Some(path) = self.path() else {
            return Ok(Vec::new());
        };
        if !path.exists() {
            return Ok(Vec::new());
        }
        let entries: Vec<JournalEntry> =
            serde_jsonlines::json_lines(&path)?.collect::<std::io::Result<_>>()?;
        Ok(entries)
    }
}
