//! End-to-end tests for the policy update flow through the public API
//!
//! These exercise the fetch → merge → confirm → persist sequence with a
//! scripted adapter, covering the observable contract of the `set` command.

use async_trait::async_trait;
use ltr_policy_cli::adapter::{AdapterError, SqlManagementAdapter};
use ltr_policy_cli::command::{set_policy, show_policy};
use ltr_policy_cli::confirm::PresetDecision;
use ltr_policy_cli::{DatabaseIdentity, LongTermRetentionPolicy};
use std::sync::Mutex;

/// Adapter with a scripted fetch outcome and recorded update calls
struct ScriptedAdapter {
    get_result: Mutex<Option<Result<LongTermRetentionPolicy, AdapterError>>>,
    set_calls: Mutex<Vec<LongTermRetentionPolicy>>,
    set_error: Mutex<Option<AdapterError>>,
}

impl ScriptedAdapter {
    fn new(get_result: Result<LongTermRetentionPolicy, AdapterError>) -> Self {
        Self {
            get_result: Mutex::new(Some(get_result)),
            set_calls: Mutex::new(Vec::new()),
            set_error: Mutex::new(None),
        }
    }

    fn failing_set(self, error: AdapterError) -> Self {
        *self.set_error.lock().unwrap() = Some(error);
        self
    }
}

#[async_trait]
impl SqlManagementAdapter for ScriptedAdapter {
    async fn get_long_term_retention_policy(
        &self,
        _target: &DatabaseIdentity,
    ) -> Result<LongTermRetentionPolicy, AdapterError> {
        self.get_result
            .lock()
            .unwrap()
            .take()
            .expect("fetch invoked more than once")
    }

    async fn set_long_term_retention_policy(
        &self,
        _target: &DatabaseIdentity,
        policy: &LongTermRetentionPolicy,
    ) -> Result<LongTermRetentionPolicy, AdapterError> {
        if let Some(error) = self.set_error.lock().unwrap().take() {
            return Err(error);
        }
        self.set_calls.lock().unwrap().push(policy.clone());
        Ok(policy.clone())
    }
}

fn target() -> DatabaseIdentity {
    DatabaseIdentity {
        resource_group: "my-rg".to_string(),
        server: "my-server".to_string(),
        database: "my-db".to_string(),
    }
}

fn stored() -> LongTermRetentionPolicy {
    LongTermRetentionPolicy {
        state: "Disabled".to_string(),
        recovery_services_backup_policy_resource_id: "old-id".to_string(),
        location: "westus".to_string(),
    }
}

fn request() -> set_policy::SetPolicyRequest {
    set_policy::SetPolicyRequest {
        state: "Enabled".to_string(),
        resource_id: "new-id".to_string(),
    }
}

#[tokio::test]
async fn confirmed_update_persists_merged_record() {
    let adapter = ScriptedAdapter::new(Ok(stored()));

    let result = set_policy::run(&adapter, &PresetDecision(true), &target(), &request())
        .await
        .unwrap();

    let calls = adapter.set_calls.lock().unwrap().clone();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0],
        LongTermRetentionPolicy {
            state: "Enabled".to_string(),
            recovery_services_backup_policy_resource_id: "new-id".to_string(),
            location: "westus".to_string(),
        }
    );
    assert_eq!(result, Some(calls[0].clone()));
}

#[tokio::test]
async fn declined_update_is_a_silent_no_op() {
    let adapter = ScriptedAdapter::new(Ok(stored()));

    let result = set_policy::run(&adapter, &PresetDecision(false), &target(), &request())
        .await
        .unwrap();

    assert_eq!(result, None);
    assert!(adapter.set_calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn fetch_not_found_propagates_and_skips_update() {
    let adapter = ScriptedAdapter::new(Err(AdapterError::PolicyNotFound {
        server: "my-server".to_string(),
        database: "my-db".to_string(),
    }));

    let err = set_policy::run(&adapter, &PresetDecision(true), &target(), &request())
        .await
        .unwrap_err();

    assert!(matches!(err, AdapterError::PolicyNotFound { .. }));
    assert!(adapter.set_calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn update_validation_error_propagates_unchanged() {
    let adapter = ScriptedAdapter::new(Ok(stored()))
        .failing_set(AdapterError::Validation("unrecognized state 'On'".to_string()));

    let err = set_policy::run(&adapter, &PresetDecision(true), &target(), &request())
        .await
        .unwrap_err();

    match err {
        AdapterError::Validation(message) => assert_eq!(message, "unrecognized state 'On'"),
        other => panic!("Expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn show_returns_the_stored_policy() {
    let adapter = ScriptedAdapter::new(Ok(stored()));

    let policy = show_policy::run(&adapter, &target()).await.unwrap();
    assert_eq!(policy, stored());
}
