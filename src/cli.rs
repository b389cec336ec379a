//! # LTRCTL CLI
//!
//! Command-line interface for managing Azure SQL Database long-term
//! retention backup policies.
//!
//! ## Usage
//!
//! ```bash
//! # Show the stored policy for a database
//! ltrctl show -g my-rg -s my-server -d my-db
//!
//! # Enable the policy with a Recovery Services backup policy
//! ltrctl set -g my-rg -s my-server -d my-db \
//!     --state Enabled \
//!     --resource-id /subscriptions/.../backupPolicies/my-policy
//!
//! # Same, skipping the confirmation prompt
//! ltrctl set -g my-rg -s my-server -d my-db \
//!     --state Disabled --resource-id ... --yes
//! ```

use crate::adapter::{ArmAuth, ArmSqlClient, SqlManagementAdapter};
use crate::command::{set_policy, show_policy};
use crate::confirm::StdinConfirmation;
use crate::constants::SUBSCRIPTION_ENV_VAR;
use crate::{DatabaseIdentity, LongTermRetentionPolicy};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};

/// Azure SQL long-term retention policy CLI
#[derive(Parser, Debug)]
#[command(name = "ltrctl")]
#[command(
    about = "Manage Azure SQL Database long-term retention backup policies",
    long_about = None,
    after_help = "\
Examples:
  ltrctl show -g my-rg -s my-server -d my-db
  ltrctl set -g my-rg -s my-server -d my-db --state Enabled --resource-id <ID>
  ltrctl set -g my-rg -s my-server -d my-db --state Disabled --resource-id <ID> --yes
"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Azure subscription id
    #[arg(long, global = true, env = SUBSCRIPTION_ENV_VAR)]
    subscription: Option<String>,

    /// Authentication method for the management API
    #[arg(long, global = true, value_enum, default_value_t = AuthMethod::AzureCli)]
    auth: AuthMethod,

    /// Client id for workload identity authentication
    #[arg(long, global = true)]
    client_id: Option<String>,

    /// Management endpoint override, e.g. for sovereign clouds
    #[arg(long, global = true, hide = true)]
    endpoint: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create or update the long-term retention policy for a database
    Set {
        #[command(flatten)]
        target: TargetArgs,

        /// The state of the long-term retention backup policy,
        /// 'Enabled' or 'Disabled'
        #[arg(long, value_name = "STATE")]
        state: String,

        /// The resource id of the Recovery Services backup policy to
        /// associate with the database
        #[arg(long, visible_alias = "id", value_name = "RESOURCE_ID")]
        resource_id: String,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Show the stored long-term retention policy for a database
    Show {
        #[command(flatten)]
        target: TargetArgs,
    },
}

/// Flags identifying the target database
#[derive(Args, Debug)]
struct TargetArgs {
    /// Name of the resource group
    #[arg(short = 'g', long, value_name = "NAME")]
    resource_group: String,

    /// Name of the Azure SQL server
    #[arg(short = 's', long, value_name = "NAME")]
    server: String,

    /// Name of the database
    #[arg(short = 'd', long, value_name = "NAME")]
    database: String,
}

impl From<TargetArgs> for DatabaseIdentity {
    fn from(args: TargetArgs) -> Self {
        Self {
            resource_group: args.resource_group,
            server: args.server,
            database: args.database,
        }
    }
}

/// Authentication methods supported by ltrctl
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum AuthMethod {
    /// Token from the local `az` login
    AzureCli,
    /// Managed Identity (Azure environments)
    ManagedIdentity,
    /// Workload Identity, requires --client-id
    WorkloadIdentity,
}

/// Execute a parsed CLI invocation
///
/// # Errors
/// Returns an error on missing configuration or any adapter failure.
pub async fn execute(cli: Cli) -> Result<()> {
    let subscription = cli.subscription.clone().with_context(|| {
        format!("Subscription id is required. Pass --subscription or set {SUBSCRIPTION_ENV_VAR}.")
    })?;

    let auth = resolve_auth(cli.auth, cli.client_id.as_deref())?;
    let mut client = ArmSqlClient::new(&subscription, &auth)
        .context("Failed to create Azure Resource Manager client")?;
    if let Some(endpoint) = &cli.endpoint {
        client = client.with_endpoint(endpoint);
    }

    match cli.command {
        Commands::Set {
            target,
            state,
            resource_id,
            yes,
        } => {
            let target = DatabaseIdentity::from(target);
            let request = set_policy::SetPolicyRequest { state, resource_id };
            let gate = StdinConfirmation { force: yes };
            set_command(&client, &gate, &target, &request).await
        }
        Commands::Show { target } => show_command(&client, &DatabaseIdentity::from(target)).await,
    }
}

fn resolve_auth(method: AuthMethod, client_id: Option<&str>) -> Result<ArmAuth> {
    match method {
        AuthMethod::AzureCli => Ok(ArmAuth::AzureCli),
        AuthMethod::ManagedIdentity => Ok(ArmAuth::ManagedIdentity),
        AuthMethod::WorkloadIdentity => {
            let client_id = client_id
                .context("--client-id is required with --auth workload-identity")?;
            Ok(ArmAuth::WorkloadIdentity {
                client_id: client_id.to_string(),
            })
        }
    }
}

/// Update the policy, printing the stored result or a skip notice
async fn set_command(
    adapter: &dyn SqlManagementAdapter,
    gate: &StdinConfirmation,
    target: &DatabaseIdentity,
    request: &set_policy::SetPolicyRequest,
) -> Result<()> {
    match set_policy::run(adapter, gate, target, request).await? {
        Some(stored) => {
            println!("✅ Long-term retention policy updated");
            println!("   Database: {target}");
            print_policy(&stored);
        }
        None => {
            println!("⏸️  Update declined, policy unchanged");
        }
    }
    Ok(())
}

/// Print the stored policy for a database
async fn show_command(adapter: &dyn SqlManagementAdapter, target: &DatabaseIdentity) -> Result<()> {
    let policy = show_policy::run(adapter, target).await?;
    println!("📋 Long-term retention policy");
    println!("   Database: {target}");
    print_policy(&policy);
    Ok(())
}

fn print_policy(policy: &LongTermRetentionPolicy) {
    println!("   Location: {}", policy.location);
    println!("   State: {}", policy.state);
    println!(
        "   Backup Policy Resource Id: {}",
        policy.recovery_services_backup_policy_resource_id
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_parses_identity_and_policy_flags() {
        let cli = Cli::try_parse_from([
            "ltrctl",
            "--subscription",
            "00000000-0000-0000-0000-000000000000",
            "set",
            "-g",
            "my-rg",
            "-s",
            "my-server",
            "-d",
            "my-db",
            "--state",
            "Enabled",
            "--id",
            "policy-resource-id",
            "--yes",
        ])
        .unwrap();

        match cli.command {
            Commands::Set {
                target,
                state,
                resource_id,
                yes,
            } => {
                assert_eq!(target.database, "my-db");
                assert_eq!(state, "Enabled");
                assert_eq!(resource_id, "policy-resource-id");
                assert!(yes);
            }
            Commands::Show { .. } => panic!("Expected set subcommand"),
        }
    }

    #[test]
    fn test_state_and_resource_id_are_required() {
        let result = Cli::try_parse_from([
            "ltrctl", "set", "-g", "rg", "-s", "srv", "-d", "db", "--state", "Enabled",
        ]);
        assert!(result.is_err());

        let result = Cli::try_parse_from([
            "ltrctl", "set", "-g", "rg", "-s", "srv", "-d", "db", "--resource-id", "id",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_workload_identity_requires_client_id() {
        assert!(resolve_auth(AuthMethod::WorkloadIdentity, None).is_err());
        assert!(matches!(
            resolve_auth(AuthMethod::WorkloadIdentity, Some("cid")).unwrap(),
            ArmAuth::WorkloadIdentity { client_id } if client_id == "cid"
        ));
    }
}
