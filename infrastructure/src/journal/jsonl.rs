//! JSONL file journal
//!
//! Each [`JournalEntry`] is serialized as a single JSON line and appended
//! to the file. Entries already in the file are loaded on open.

use conductor_application::{JournalEntry, JournalError, TransactionJournal};
use conductor_domain::{ExecutionResult, RiskRuleEvaluation, SimulationRequest};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

struct JournalState {
    writer: BufWriter<File>,
    entries: Vec<JournalEntry>,
}

/// Append-only journal backed by a JSONL file.
///
/// Thread-safe via `Mutex`. Every record is flushed before `record` returns.
pub struct JsonlTransactionJournal {
    state: Mutex<JournalState>,
    path: PathBuf,
}

impl JsonlTransactionJournal {
    /// Open (or create) the journal at `path`, creating parent directories.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, JournalError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let entries = if path.exists() {
            Self::read_entries(path)?
        } else {
            Vec::new()
        };

        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            state: Mutex::new(JournalState {
                writer: BufWriter::new(file),
                entries,
            }),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(path: &Path) -> Result<Vec<JournalEntry>, JournalError> {
        let reader = BufReader::new(File::open(path)?);
        let mut entries = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<JournalEntry>(&line) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!(
                    path = %path.display(),
                    line = index + 1,
                    error = %e,
                    "Skipping unreadable journal line"
                ),
            }
        }
        Ok(entries)
    }
}

impl TransactionJournal for JsonlTransactionJournal {
    fn record(
        &self,
        request: &SimulationRequest,
        result: &ExecutionResult,
        violations: &[RiskRuleEvaluation],
    ) -> Result<JournalEntry, JournalError> {
        let entry = JournalEntry::new(request.clone(), result.clone(), violations.to_vec());
        let line = serde_json::to_string(&entry)?;

        let mut state = self
            .state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        writeln!(state.writer, "{}", line)?;
        state.writer.flush()?;
        state.entries.push(entry.clone());
        Ok(entry)
    }

    fn list(&self) -> Vec<JournalEntry> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .entries
            .clone()
    }
}

impl Drop for JsonlTransactionJournal {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.lock() {
            let _ = state.writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conductor_domain::{Severity, SimulationResult};

    fn result() -> ExecutionResult {
        ExecutionResult::from(SimulationResult {
            success: true,
            gas_used: 55_000,
            warnings: vec![],
            return_data: Some("abc".to_string()),
        })
    }

    #[test]
    fn test_writes_one_line_per_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("journal").join("tx.jsonl");
        let journal = JsonlTransactionJournal::open(&path).unwrap();
        let request = SimulationRequest::new("0xa", "0xb").with_slippage_bps(10);

        journal.record(&request, &result(), &[]).unwrap();
        journal
            .record(
                &request,
                &ExecutionResult::policy_rejection(),
                &[RiskRuleEvaluation::fail("allowlist", Severity::Critical, "blocked")],
            )
            .unwrap();
        drop(journal);

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.trim().lines().collect();
        assert_eq!(lines.len(), 2);

        let value: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(value["request"]["slippageBps"], 10);
        assert_eq!(value["violations"][0]["rule"], "allowlist");
    }

    #[test]
    fn test_reopen_loads_previous_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tx.jsonl");
        let request = SimulationRequest::new("0xa", "0xb");

        let first_id = {
            let journal = JsonlTransactionJournal::open(&path).unwrap();
            journal.record(&request, &result(), &[]).unwrap().id
        };

        let journal = JsonlTransactionJournal::open(&path).unwrap();
        journal.record(&request, &result(), &[]).unwrap();

        let entries = journal.list();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, first_id);
        assert_eq!(entries[0].result.gas_used, 55_000);
    }

    #[test]
    fn test_skips_corrupt_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tx.jsonl");
        std::fs::write(&path, "not json\n\n").unwrap();

        let journal = JsonlTransactionJournal::open(&path).unwrap();
        assert!(journal.list().is_empty());
    }
}
