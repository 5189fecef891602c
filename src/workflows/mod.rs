// Document approval workflow: vocabulary, permission table, engine
//
// The engine is pure; record stamping and lifecycle replay sit on top of it
// for callers that persist transitions.

pub mod types;
pub mod permissions;
pub mod errors;
pub mod engine;
pub mod record;
pub mod lifecycle;

pub use types::{DocumentType, ParseError, Role, WorkflowAction, WorkflowStatus};
pub use permissions::{PermissionConfig, PermissionRule, PermissionTable, TableError};
pub use errors::{ActionResponse, ErrorKind, WorkflowError};
pub use engine::{TransitionOutcome, WorkflowEngine};
pub use record::{Actor, Clock, FixedClock, SystemClock, TransitionRecord};
pub use lifecycle::{replay, DocumentLifecycle, ReplayError};
