//! # Constants
//!
//! Shared constants used throughout the CLI.
//!
//! These values represent the public Azure cloud defaults and can be
//! overridden via CLI flags where applicable.

/// Default Azure Resource Manager endpoint (public cloud)
pub const DEFAULT_ARM_ENDPOINT: &str = "https://management.azure.com";

/// Token scope for Azure Resource Manager requests
pub const ARM_TOKEN_SCOPE: &str = "https://management.azure.com/.default";

/// ARM api-version for the `backupLongTermRetentionPolicies` resource type
pub const LTR_POLICY_API_VERSION: &str = "2014-04-01";

/// Name of the singleton policy resource under a database.
/// ARM exposes exactly one long-term retention policy per database.
pub const LTR_POLICY_RESOURCE_NAME: &str = "Default";

/// Environment variable consulted for the subscription id when
/// `--subscription` is not passed
pub const SUBSCRIPTION_ENV_VAR: &str = "AZURE_SUBSCRIPTION_ID";
