//! # Show Policy Command
//!
//! Read-only fetch of the stored long-term retention policy.

use crate::adapter::{AdapterError, SqlManagementAdapter};
use crate::{DatabaseIdentity, LongTermRetentionPolicy};

/// Fetch the stored policy for a database.
///
/// # Errors
/// Propagates adapter errors unchanged, including `PolicyNotFound`.
pub async fn run(
    adapter: &dyn SqlManagementAdapter,
    target: &DatabaseIdentity,
) -> Result<LongTermRetentionPolicy, AdapterError> {
    adapter.get_long_term_retention_policy(target).await
}
