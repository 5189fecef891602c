// Audit trail of workflow transitions
//
// One entry per successful transition, append-only.

use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::workflows::TransitionRecord;

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Corrupted audit log {path} at line {line}: {reason}")]
    CorruptedLog {
        path: String,
        line: usize,
        reason: String,
    },

    #[error("Lock acquisition failed: {reason}")]
    LockError { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: Uuid,
    /// Links the entry to the log lines of the same transition
    pub correlation_id: String,
    pub record: TransitionRecord,
}

impl AuditEntry {
    pub fn new(correlation_id: impl Into<String>, record: TransitionRecord) -> Self {
        Self {
            id: Uuid::new_v4(),
            correlation_id: correlation_id.into(),
            record,
        }
    }
}

pub trait AuditSink {
    fn append(&self, entry: &AuditEntry) -> Result<(), AuditError>;

    /// Entries for one document, oldest first
    fn history(&self, document_id: Uuid) -> Result<Vec<AuditEntry>, AuditError>;
}

fn lock_error<T>(e: std::sync::PoisonError<T>) -> AuditError {
    AuditError::LockError {
        reason: e.to_string(),
    }
}

#[derive(Debug, Default)]
pub struct InMemoryAuditLog {
    entries: Mutex<Vec<AuditEntry>>,
}

impl InMemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Result<Vec<AuditEntry>, AuditError> {
        Ok(self.entries.lock().map_err(lock_error)?.clone())
    }
}

impl AuditSink for InMemoryAuditLog {
    fn append(&self, entry: &AuditEntry) -> Result<(), AuditError> {
        self.entries.lock().map_err(lock_error)?.push(entry.clone());
        Ok(())
    }

    fn history(&self, document_id: Uuid) -> Result<Vec<AuditEntry>, AuditError> {
        let entries = self.entries.lock().map_err(lock_error)?;
        Ok(entries
            .iter()
            .filter(|entry| entry.record.document_id == document_id)
            .cloned()
            .collect())
    }
}

/// Append-only JSON Lines file, one `AuditEntry` per line
#[derive(Debug)]
pub struct JsonlAuditLog {
    path: PathBuf,
    writer: Mutex<File>,
}

impl JsonlAuditLog {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, AuditError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        info!(path = %path.display(), "Opened audit log");

        Ok(Self {
            path,
            writer: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read_all(&self) -> Result<Vec<AuditEntry>, AuditError> {
        let file = File::open(&self.path)?;
        let mut entries = Vec::new();

        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let entry = serde_json::from_str(&line).map_err(|e| AuditError::CorruptedLog {
                path: self.path.display().to_string(),
                line: index + 1,
                reason: e.to_string(),
            })?;
            entries.push(entry);
        }

        Ok(entries)
    }
}

impl AuditSink for JsonlAuditLog {
    fn append(&self, entry: &AuditEntry) -> Result<(), AuditError> {
        let mut line = serde_json::to_string(entry)?;
        line.push('\n');

        let mut writer = self.writer.lock().map_err(lock_error)?;
        writer.write_all(line.as_bytes())?;
        writer.flush()?;

        debug!(
            entry_id = %entry.id,
            document_id = %entry.record.document_id,
            "Appended audit entry"
        );
        Ok(())
    }

    fn history(&self, document_id: Uuid) -> Result<Vec<AuditEntry>, AuditError> {
        // Hold the writer lock so a concurrent append is not read half-written
        let _guard = self.writer.lock().map_err(lock_error)?;
        Ok(self
            .read_all()?
            .into_iter()
            .filter(|entry| entry.record.document_id == document_id)
            .collect())
    }
}

impl<A: AuditSink + ?Sized> AuditSink for &A {
    fn append(&self, entry: &AuditEntry) -> Result<(), AuditError> {
        (**self).append(entry)
    }

    fn history(&self, document_id: Uuid) -> Result<Vec<AuditEntry>, AuditError> {
        (**self).history(document_id)
    }
}
