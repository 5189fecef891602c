// Property-Based Testing for the workflow engine
// Random walks of (role, action, comment) requests must stay on the transition graph

use erp_workflow::workflows::replay;
use erp_workflow::{
    Actor, DocumentType, ErrorKind, InMemoryAuditLog, InMemoryDocumentStore, Role,
    WorkflowAction, WorkflowEngine, WorkflowService, WorkflowStatus,
};
use proptest::prelude::*;

fn document_type_strategy() -> impl Strategy<Value = DocumentType> {
    prop::sample::select(DocumentType::ALL.to_vec())
}

fn status_strategy() -> impl Strategy<Value = WorkflowStatus> {
    prop::sample::select(WorkflowStatus::ALL.to_vec())
}

fn action_strategy() -> impl Strategy<Value = WorkflowAction> {
    prop::sample::select(WorkflowAction::ALL.to_vec())
}

fn role_strategy() -> impl Strategy<Value = Role> {
    prop_oneof![
        Just(Role::ops()),
        Just(Role::finance_manager()),
        Just(Role::administration()),
        Just(Role::owner()),
        Just(Role::director()),
        "[a-z_]{1,12}".prop_map(|name| Role::new(name).unwrap()),
    ]
}

fn comment_strategy() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some(String::new())),
        Just(Some("   ".to_string())),
        "[a-zA-Z ]{1,30}".prop_map(Some),
    ]
}

proptest! {
    #[test]
    fn perform_action_agrees_with_available_actions(
        dt in document_type_strategy(),
        status in status_strategy(),
        role in role_strategy(),
        action in action_strategy(),
        comment in comment_strategy(),
    ) {
        let engine = WorkflowEngine::standard();
        let offered = engine.available_actions(dt, status, &role);
        let result = engine.perform_action(dt, status, &role, action, comment.as_deref());

        match result {
            Ok(outcome) => {
                prop_assert!(offered.contains(&action));
                prop_assert_eq!(Some(outcome.new_status), action.next_status(status));
                prop_assert_eq!(outcome.previous_status, status);
            }
            Err(e) => match e.kind() {
                ErrorKind::PermissionDenied => {
                    prop_assert!(!offered.contains(&action));
                }
                ErrorKind::ValidationError => {
                    prop_assert_eq!(action, WorkflowAction::Reject);
                    prop_assert!(comment.as_deref().map_or(true, |c| c.trim().is_empty()));
                }
                ErrorKind::InvalidTransition => {
                    prop_assert!(false, "standard table offered an undefined edge");
                }
            },
        }
    }

    #[test]
    fn random_walk_stays_on_the_graph(
        dt in document_type_strategy(),
        steps in prop::collection::vec((role_strategy(), action_strategy(), comment_strategy()), 0..20),
    ) {
        let service = WorkflowService::with_system_clock(
            WorkflowEngine::standard(),
            InMemoryDocumentStore::new(),
            InMemoryAuditLog::new(),
        );
        let doc = service.create_document(dt).unwrap();

        let mut status = WorkflowStatus::Draft;
        for (index, (role, action, comment)) in steps.into_iter().enumerate() {
            let actor = Actor::new(format!("u-{index}"), role);
            match service.transition(doc.id, &actor, action, comment.as_deref()) {
                Ok(record) => {
                    prop_assert!(!status.is_terminal());
                    prop_assert_eq!(record.from, status);
                    prop_assert_eq!(Some(record.to), action.next_status(status));
                    status = record.to;
                }
                Err(e) => {
                    prop_assert!(e.is_workflow_refusal());
                }
            }
        }

        prop_assert_eq!(service.document(doc.id).unwrap().status, status);
        let records: Vec<_> = service
            .history(doc.id)
            .unwrap()
            .into_iter()
            .map(|entry| entry.record)
            .collect();
        prop_assert_eq!(replay(doc.id, dt, &records).unwrap(), status);
    }
}
