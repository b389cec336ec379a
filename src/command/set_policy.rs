//! # Set Policy Command
//!
//! Creates or updates the long-term retention policy of a database.
//!
//! ## Flow
//!
//! 1. Fetch the currently stored policy from the adapter
//! 2. Build a brand-new record from caller input, copying only `location`
//!    from the fetched record
//! 3. If the confirmation gate approves, persist the merged record and
//!    return the service's response; otherwise return `None` without any
//!    API call
//!
//! A fetch failure means steps 2 and 3 never run. Adapter errors are
//! propagated unchanged; there is no retry or local recovery.

use crate::adapter::{AdapterError, SqlManagementAdapter};
use crate::confirm::ConfirmationGate;
use crate::{DatabaseIdentity, LongTermRetentionPolicy};
use tracing::info;

/// Caller-supplied fields of a policy update.
///
/// Both values pass through to the service exactly as given; the literal
/// set accepted for `state` is validated by the service, not here.
#[derive(Debug, Clone)]
pub struct SetPolicyRequest {
    /// Desired policy state, `"Enabled"` or `"Disabled"`
    pub state: String,
    /// Resource id of the Recovery Services backup policy to associate
    pub resource_id: String,
}

/// Build the record to persist from caller input and the stored policy.
///
/// Every field of the stored policy is discarded except `location`, which
/// is server-assigned and carried forward unchanged.
pub fn apply_user_input(
    current: &LongTermRetentionPolicy,
    request: &SetPolicyRequest,
) -> LongTermRetentionPolicy {
    LongTermRetentionPolicy {
        state: request.state.clone(),
        recovery_services_backup_policy_resource_id: request.resource_id.clone(),
        location: current.location.clone(),
    }
}

/// Run the policy update.
///
/// Returns `Ok(Some(policy))` with the stored result on success, or
/// `Ok(None)` when the confirmation gate declines (no API call is made).
///
/// # Errors
/// Propagates adapter errors from the fetch and update calls unchanged.
pub async fn run(
    adapter: &dyn SqlManagementAdapter,
    gate: &dyn ConfirmationGate,
    target: &DatabaseIdentity,
    request: &SetPolicyRequest,
) -> Result<Option<LongTermRetentionPolicy>, AdapterError> {
    let current = adapter.get_long_term_retention_policy(target).await?;
    let merged = apply_user_input(&current, request);

    if !gate.should_proceed(&target.database) {
        info!(
            "Policy update for database '{}' declined, nothing changed",
            target.database
        );
        return Ok(None);
    }

    let stored = adapter
        .set_long_term_retention_policy(target, &merged)
        .await?;
    Ok(Some(stored))
}
