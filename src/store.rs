// Document status store with optimistic, status-conditioned updates

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::workflows::{DocumentType, TransitionRecord, WorkflowStatus};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Document {0} not found")]
    NotFound(Uuid),

    #[error("Document {0} already exists")]
    AlreadyExists(Uuid),

    #[error("Status of document {document_id} changed concurrently: expected '{expected}', found '{actual}'")]
    StatusConflict {
        document_id: Uuid,
        expected: WorkflowStatus,
        actual: WorkflowStatus,
    },

    #[error("Transition record does not match document {document_id}: {reason}")]
    RecordMismatch { document_id: Uuid, reason: String },

    #[error("Lock acquisition failed: {reason}")]
    LockError { reason: String },
}

/// Stored workflow state of one document. Content lives elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: Uuid,
    pub document_type: DocumentType,
    pub status: WorkflowStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_transition: Option<TransitionRecord>,
}

impl DocumentRecord {
    /// A fresh document in the initial status
    pub fn new(document_type: DocumentType, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_type,
            status: WorkflowStatus::INITIAL,
            created_at,
            updated_at: created_at,
            last_transition: None,
        }
    }
}

pub trait DocumentStore {
    fn insert(&self, document: DocumentRecord) -> Result<(), StoreError>;

    fn get(&self, id: Uuid) -> Result<Option<DocumentRecord>, StoreError>;

    /// Write `record.to` only if the stored status still equals `expected`.
    ///
    /// Returns the updated document.
    fn update_status(
        &self,
        id: Uuid,
        expected: WorkflowStatus,
        record: &TransitionRecord,
    ) -> Result<DocumentRecord, StoreError>;
}

impl<S: DocumentStore + ?Sized> DocumentStore for &S {
    fn insert(&self, document: DocumentRecord) -> Result<(), StoreError> {
        (**self).insert(document)
    }

    fn get(&self, id: Uuid) -> Result<Option<DocumentRecord>, StoreError> {
        (**self).get(id)
    }

    fn update_status(
        &self,
        id: Uuid,
        expected: WorkflowStatus,
        record: &TransitionRecord,
    ) -> Result<DocumentRecord, StoreError> {
        (**self).update_status(id, expected, record)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    documents: RwLock<HashMap<Uuid, DocumentRecord>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.documents.read().map(|docs| docs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn lock_error<T>(e: std::sync::PoisonError<T>) -> StoreError {
    StoreError::LockError {
        reason: e.to_string(),
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn insert(&self, document: DocumentRecord) -> Result<(), StoreError> {
        let mut documents = self.documents.write().map_err(lock_error)?;
        if documents.contains_key(&document.id) {
            return Err(StoreError::AlreadyExists(document.id));
        }
        debug!(document_id = %document.id, document_type = %document.document_type, "Stored new document");
        documents.insert(document.id, document);
        Ok(())
    }

    fn get(&self, id: Uuid) -> Result<Option<DocumentRecord>, StoreError> {
        let documents = self.documents.read().map_err(lock_error)?;
        Ok(documents.get(&id).cloned())
    }

    fn update_status(
        &self,
        id: Uuid,
        expected: WorkflowStatus,
        record: &TransitionRecord,
    ) -> Result<DocumentRecord, StoreError> {
        if record.document_id != id || record.from != expected {
            return Err(StoreError::RecordMismatch {
                document_id: id,
                reason: format!(
                    "record is for {} starting at '{}'",
                    record.document_id, record.from
                ),
            });
        }

        let mut documents = self.documents.write().map_err(lock_error)?;
        let document = documents.get_mut(&id).ok_or(StoreError::NotFound(id))?;

        if document.status != expected {
            return Err(StoreError::StatusConflict {
                document_id: id,
                expected,
                actual: document.status,
            });
        }

        document.status = record.to;
        document.updated_at = record.transitioned_at;
        document.last_transition = Some(record.clone());
        Ok(document.clone())
    }
}
