//! # Management Adapter
//!
//! Adapter trait for the SQL management service, plus its error taxonomy.
//!
//! The adapter is the only side-effecting collaborator of the policy
//! commands: everything between the fetch and the update call is pure data
//! transformation. Implementations:
//!
//! - `arm::ArmSqlClient` — Azure Resource Manager REST client

use async_trait::async_trait;
use thiserror::Error;

use crate::{DatabaseIdentity, LongTermRetentionPolicy};

pub mod arm;

// Re-export for convenience
pub use arm::{ArmAuth, ArmSqlClient};

/// Errors surfaced by a management adapter.
///
/// None of these are retried or transformed; they bubble to the caller
/// unchanged.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// The database or its long-term retention policy does not exist.
    /// ARM guarantees at most one policy per database, so a zero-result
    /// fetch is reported as this named error rather than an empty list.
    #[error("long-term retention policy not found for database '{database}' on server '{server}'")]
    PolicyNotFound { server: String, database: String },

    /// The service rejected the request payload, e.g. an unrecognized
    /// `state` literal or a malformed backup policy resource id.
    #[error("management service rejected the request: {0}")]
    Validation(String),

    /// Network, authentication, or unexpected-status failures.
    #[error("management request failed: {0}")]
    Transport(#[from] anyhow::Error),
}

/// Adapter trait for the SQL management service.
///
/// `get` fails (with `PolicyNotFound`) rather than returning an absent
/// value: every database that exists has exactly one stored policy.
#[async_trait]
pub trait SqlManagementAdapter: Send + Sync {
    /// Fetch the stored long-term retention policy for a database
    async fn get_long_term_retention_policy(
        &self,
        target: &DatabaseIdentity,
    ) -> Result<LongTermRetentionPolicy, AdapterError>;

    /// Create or replace the long-term retention policy for a database,
    /// returning the policy as stored by the service
    async fn set_long_term_retention_policy(
        &self,
        target: &DatabaseIdentity,
        policy: &LongTermRetentionPolicy,
    ) -> Result<LongTermRetentionPolicy, AdapterError>;
}
