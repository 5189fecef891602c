// Workflow service: the caller side of the engine
//
// Reads the document, asks the engine, stamps the outcome, writes it back
// conditioned on the status that was read, then records an audit entry.

use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::audit::{AuditEntry, AuditError, AuditSink};
use crate::store::{DocumentRecord, DocumentStore, StoreError};
use crate::telemetry::{create_transition_span, generate_correlation_id};
use crate::workflows::{
    replay, Actor, Clock, DocumentType, ReplayError, SystemClock, TransitionOutcome,
    TransitionRecord, WorkflowAction, WorkflowEngine, WorkflowError, WorkflowStatus,
};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Document {0} not found")]
    DocumentNotFound(Uuid),

    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Audit error: {0}")]
    Audit(#[from] AuditError),

    #[error("History replay failed: {0}")]
    Replay(#[from] ReplayError),

    #[error("Document {document_id} is stored as '{stored}' but its history replays to '{replayed}'")]
    HistoryMismatch {
        document_id: Uuid,
        stored: WorkflowStatus,
        replayed: WorkflowStatus,
    },
}

impl ServiceError {
    /// True when the engine refused the action, as opposed to an infrastructure failure
    pub fn is_workflow_refusal(&self) -> bool {
        matches!(self, ServiceError::Workflow(_))
    }
}

pub struct WorkflowService<S, A, C = SystemClock> {
    engine: WorkflowEngine,
    store: S,
    audit: A,
    clock: C,
}

impl<S, A> WorkflowService<S, A, SystemClock>
where
    S: DocumentStore,
    A: AuditSink,
{
    pub fn with_system_clock(engine: WorkflowEngine, store: S, audit: A) -> Self {
        Self::new(engine, store, audit, SystemClock)
    }
}

impl<S, A, C> WorkflowService<S, A, C>
where
    S: DocumentStore,
    A: AuditSink,
    C: Clock,
{
    pub fn new(engine: WorkflowEngine, store: S, audit: A, clock: C) -> Self {
        Self {
            engine,
            store,
            audit,
            clock,
        }
    }

    pub fn engine(&self) -> &WorkflowEngine {
        &self.engine
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn audit(&self) -> &A {
        &self.audit
    }

    pub fn create_document(&self, document_type: DocumentType) -> Result<DocumentRecord, ServiceError> {
        let document = DocumentRecord::new(document_type, self.clock.now());
        self.store.insert(document.clone())?;
        info!(document_id = %document.id, document_type = %document_type, "Created document in draft");
        Ok(document)
    }

    pub fn document(&self, document_id: Uuid) -> Result<DocumentRecord, ServiceError> {
        self.store
            .get(document_id)?
            .ok_or(ServiceError::DocumentNotFound(document_id))
    }

    pub fn available_actions(
        &self,
        document_id: Uuid,
        actor: &Actor,
    ) -> Result<Vec<WorkflowAction>, ServiceError> {
        let document = self.document(document_id)?;
        Ok(self
            .engine
            .available_actions(document.document_type, document.status, &actor.role))
    }

    /// Ask the engine without writing anything
    pub fn preview(
        &self,
        document_id: Uuid,
        actor: &Actor,
        action: WorkflowAction,
        comment: Option<&str>,
    ) -> Result<TransitionOutcome, ServiceError> {
        let document = self.document(document_id)?;
        Ok(self.engine.perform_action(
            document.document_type,
            document.status,
            &actor.role,
            action,
            comment,
        )?)
    }

    pub fn transition(
        &self,
        document_id: Uuid,
        actor: &Actor,
        action: WorkflowAction,
        comment: Option<&str>,
    ) -> Result<TransitionRecord, ServiceError> {
        let document = self.document(document_id)?;
        let correlation_id = generate_correlation_id();
        let span = create_transition_span(
            document_id,
            document.document_type,
            action,
            &actor.id,
            &correlation_id,
        );
        let _entered = span.enter();

        let outcome = self
            .engine
            .perform_action(
                document.document_type,
                document.status,
                &actor.role,
                action,
                comment,
            )
            .inspect_err(|e| {
                warn!(
                    status = %document.status,
                    role = %actor.role,
                    kind = ?e.kind(),
                    error = %e,
                    "Transition refused"
                );
            })?;

        let record = outcome.stamp(document_id, &actor.id, self.clock.now());
        self.store
            .update_status(document_id, document.status, &record)
            .inspect_err(|e| warn!(error = %e, "Conditional status update failed"))?;
        self.audit
            .append(&AuditEntry::new(correlation_id.as_str(), record.clone()))?;

        info!(
            from = %record.from,
            to = %record.to,
            role = %record.actor_role,
            "Document transitioned"
        );
        Ok(record)
    }

    pub fn history(&self, document_id: Uuid) -> Result<Vec<AuditEntry>, ServiceError> {
        Ok(self.audit.history(document_id)?)
    }

    /// Replay the audit history and check it lands on the stored status
    pub fn verify(&self, document_id: Uuid) -> Result<WorkflowStatus, ServiceError> {
        let document = self.document(document_id)?;
        let records: Vec<TransitionRecord> = self
            .history(document_id)?
            .into_iter()
            .map(|entry| entry.record)
            .collect();

        let replayed = replay(document_id, document.document_type, &records)?;
        if replayed != document.status {
            return Err(ServiceError::HistoryMismatch {
                document_id,
                stored: document.status,
                replayed,
            });
        }
        Ok(replayed)
    }
}
