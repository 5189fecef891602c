// ERP document approval workflow
// Pure permission engine plus the stamping, storage and audit plumbing around it

pub mod workflows;
pub mod store;
pub mod audit;
pub mod service;
pub mod config;
pub mod telemetry;
pub mod cli;

// Re-export key types for easy access
pub use workflows::{
    ActionResponse, Actor, Clock, DocumentType, ErrorKind, FixedClock, PermissionConfig,
    PermissionRule, PermissionTable, Role, SystemClock, TableError, TransitionOutcome,
    TransitionRecord, WorkflowAction, WorkflowEngine, WorkflowError, WorkflowStatus,
};
pub use store::{DocumentRecord, DocumentStore, InMemoryDocumentStore, StoreError};
pub use audit::{AuditEntry, AuditError, AuditSink, InMemoryAuditLog, JsonlAuditLog};
pub use service::{ServiceError, WorkflowService};
pub use crate::config::{config, WorkflowConfig};
pub use telemetry::{create_transition_span, generate_correlation_id, init_telemetry};
