//! # LTR Policy CLI Library
//!
//! Core functionality for `ltrctl`, a command-line tool that manages the
//! long-term retention backup policy of an Azure SQL Database through the
//! Azure Resource Manager REST API.
//!
//! The policy update flow is:
//!
//! 1. **Fetch** the currently stored policy for the target database
//! 2. **Apply** caller input onto a fresh record, carrying the
//!    server-reported `location` forward unchanged
//! 3. **Persist** the merged record, gated by a confirmation check
//!
//! Tests are included in the module files (e.g. `command/set_policy.rs`).

use serde::{Deserialize, Serialize};

pub mod adapter;
pub mod cli;
pub mod command;
pub mod confirm;
pub mod constants;

/// Identifies one Azure SQL Database within a subscription.
///
/// The subscription id itself is client-level configuration (it scopes the
/// ARM client), so it is not part of the identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseIdentity {
    /// Name of the resource group containing the server
    pub resource_group: String,
    /// Name of the Azure SQL server
    pub server: String,
    /// Name of the database
    pub database: String,
}

impl std::fmt::Display for DatabaseIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.resource_group, self.server, self.database
        )
    }
}

/// Long-term retention backup policy for one database.
///
/// `state` is kept as a plain string: the accepted literals are
/// `"Enabled"` and `"Disabled"`, but the literal set is validated by the
/// management service, not locally. `location` is always server-assigned
/// and is never accepted from the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LongTermRetentionPolicy {
    /// Policy state, `"Enabled"` or `"Disabled"`
    pub state: String,
    /// Resource id of the Recovery Services backup policy to associate
    pub recovery_services_backup_policy_resource_id: String,
    /// Azure region of the database, as reported by the service
    pub location: String,
}
