//! # ARM SQL Client
//!
//! Client for the Azure Resource Manager REST API, scoped to the
//! `backupLongTermRetentionPolicies` resource type under a SQL database.
//!
//! This module provides functionality to:
//! - Fetch the stored long-term retention policy for a database
//! - Create or replace that policy
//! - Support Azure CLI, Managed Identity, and Workload Identity authentication
//!
//! ARM exposes exactly one policy per database, addressed as the singleton
//! resource `.../backupLongTermRetentionPolicies/Default`.

use crate::adapter::{AdapterError, SqlManagementAdapter};
use crate::constants::{
    ARM_TOKEN_SCOPE, DEFAULT_ARM_ENDPOINT, LTR_POLICY_API_VERSION, LTR_POLICY_RESOURCE_NAME,
};
use crate::{DatabaseIdentity, LongTermRetentionPolicy};
use anyhow::{Context, Result};
use async_trait::async_trait;
use azure_core::credentials::{TokenCredential, TokenRequestOptions};
use azure_identity::{AzureCliCredential, ManagedIdentityCredential, WorkloadIdentityCredential};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, info_span, Instrument};

/// Authentication method for the ARM client
#[derive(Debug, Clone)]
pub enum ArmAuth {
    /// Token from the local `az` login (default for an interactive tool)
    AzureCli,
    /// Managed Identity, works automatically in Azure environments
    ManagedIdentity,
    /// Workload Identity with an explicit client id
    WorkloadIdentity { client_id: String },
}

/// Azure Resource Manager client for SQL long-term retention policies
pub struct ArmSqlClient {
    client: Client,
    endpoint: String,
    subscription_id: String,
    credential: Arc<dyn TokenCredential>,
}

impl std::fmt::Debug for ArmSqlClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArmSqlClient")
            .field("endpoint", &self.endpoint)
            .field("subscription_id", &self.subscription_id)
            .finish_non_exhaustive()
    }
}

impl ArmSqlClient {
    /// Create a new ARM client for the given subscription
    ///
    /// # Errors
    /// Returns an error if credential or HTTP client initialization fails
    pub fn new(subscription_id: &str, auth: &ArmAuth) -> Result<Self> {
        // Build credential based on authentication method
        // Note: Credential constructors return Arc<dyn TokenCredential>
        let credential: Arc<dyn TokenCredential> = match auth {
            ArmAuth::AzureCli => {
                debug!("Using Azure CLI authentication");
                AzureCliCredential::new(None).context("Failed to create AzureCliCredential")?
            }
            ArmAuth::ManagedIdentity => {
                info!("Using Managed Identity authentication");
                info!("This works automatically in Azure environments (AKS, App Service, etc.)");
                ManagedIdentityCredential::new(None)
                    .context("Failed to create ManagedIdentityCredential")?
            }
            ArmAuth::WorkloadIdentity { client_id } => {
                info!(
                    "Using Azure Workload Identity authentication with client ID: {}",
                    client_id
                );
                let options = azure_identity::WorkloadIdentityCredentialOptions {
                    client_id: Some(client_id.clone()),
                    ..Default::default()
                };
                WorkloadIdentityCredential::new(Some(options))
                    .context("Failed to create WorkloadIdentityCredential")?
            }
        };

        // Create HTTP client with rustls
        let client = Client::builder()
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint: DEFAULT_ARM_ENDPOINT.to_string(),
            subscription_id: subscription_id.to_string(),
            credential,
        })
    }

    /// Override the management endpoint, e.g. for sovereign clouds
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.trim_end_matches('/').to_string();
        self
    }

    /// Get an access token for Azure Resource Manager
    async fn get_token(&self) -> Result<String> {
        let scope = &[ARM_TOKEN_SCOPE];
        let options = Some(TokenRequestOptions::default());
        let token_response = self
            .credential
            .get_token(scope, options)
            .await
            .context("Failed to get Azure Resource Manager access token")?;
        Ok(token_response.token.secret().to_string())
    }

    /// Construct the URL of the singleton policy resource for a database
    fn policy_url(&self, target: &DatabaseIdentity) -> String {
        format!(
            "{}/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Sql/servers/{}/databases/{}/backupLongTermRetentionPolicies/{}?api-version={}",
            self.endpoint,
            self.subscription_id,
            target.resource_group,
            target.server,
            target.database,
            LTR_POLICY_RESOURCE_NAME,
            LTR_POLICY_API_VERSION,
        )
    }
}

/// ARM resource envelope for a long-term retention policy
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct PolicyResource {
    pub location: String,
    pub properties: PolicyProperties,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PolicyProperties {
    pub state: String,
    pub recovery_services_backup_policy_resource_id: String,
}

impl From<PolicyResource> for LongTermRetentionPolicy {
    fn from(resource: PolicyResource) -> Self {
        Self {
            state: resource.properties.state,
            recovery_services_backup_policy_resource_id: resource
                .properties
                .recovery_services_backup_policy_resource_id,
            location: resource.location,
        }
    }
}

impl From<&LongTermRetentionPolicy> for PolicyResource {
    fn from(policy: &LongTermRetentionPolicy) -> Self {
        Self {
            location: policy.location.clone(),
            properties: PolicyProperties {
                state: policy.state.clone(),
                recovery_services_backup_policy_resource_id: policy
                    .recovery_services_backup_policy_resource_id
                    .clone(),
            },
        }
    }
}

#[async_trait]
impl SqlManagementAdapter for ArmSqlClient {
    async fn get_long_term_retention_policy(
        &self,
        target: &DatabaseIdentity,
    ) -> Result<LongTermRetentionPolicy, AdapterError> {
        let span = info_span!(
            "arm.sql.ltr_policy.get",
            server.name = target.server,
            database.name = target.database
        );
        let span_clone = span.clone();
        let start = Instant::now();

        async move {
            let token = self.get_token().await?;

            let url = self.policy_url(target);
            debug!("Fetching long-term retention policy: {}", url);
            let response = self
                .client
                .get(&url)
                .header("Authorization", format!("Bearer {token}"))
                .header("Content-Type", "application/json")
                .send()
                .await
                .context("Failed to fetch long-term retention policy")?;

            let status = response.status();
            if status == StatusCode::NOT_FOUND {
                span_clone.record("operation.success", false);
                span_clone.record("operation.duration_ms", start.elapsed().as_millis() as u64);
                return Err(AdapterError::PolicyNotFound {
                    server: target.server.clone(),
                    database: target.database.clone(),
                });
            }
            if !status.is_success() {
                let error_text = response.text().await.unwrap_or_default();
                span_clone.record("operation.success", false);
                span_clone.record("error.message", format!("HTTP {status}: {error_text}"));
                span_clone.record("operation.duration_ms", start.elapsed().as_millis() as u64);
                if status == StatusCode::BAD_REQUEST {
                    return Err(AdapterError::Validation(error_text));
                }
                return Err(AdapterError::Transport(anyhow::anyhow!(
                    "Failed to fetch long-term retention policy: {status} - {error_text}"
                )));
            }

            let resource = response
                .json::<PolicyResource>()
                .await
                .context("Failed to deserialize long-term retention policy response")?;

            span_clone.record("operation.success", true);
            span_clone.record("operation.duration_ms", start.elapsed().as_millis() as u64);
            Ok(resource.into())
        }
        .instrument(span)
        .await
    }

    async fn set_long_term_retention_policy(
        &self,
        target: &DatabaseIdentity,
        policy: &LongTermRetentionPolicy,
    ) -> Result<LongTermRetentionPolicy, AdapterError> {
        let span = info_span!(
            "arm.sql.ltr_policy.set",
            server.name = target.server,
            database.name = target.database,
            policy.state = policy.state
        );
        let span_clone = span.clone();
        let start = Instant::now();

        async move {
            let token = self.get_token().await?;

            let url = self.policy_url(target);
            info!(
                "Updating long-term retention policy for database: {}",
                target.database
            );
            let body = PolicyResource::from(policy);
            let response = self
                .client
                .put(&url)
                .header("Authorization", format!("Bearer {token}"))
                .header("Content-Type", "application/json")
                .json(&body)
                .send()
                .await
                .context("Failed to update long-term retention policy")?;

            let status = response.status();
            if !status.is_success() {
                let error_text = response.text().await.unwrap_or_default();
                span_clone.record("operation.success", false);
                span_clone.record("error.message", format!("HTTP {status}: {error_text}"));
                span_clone.record("operation.duration_ms", start.elapsed().as_millis() as u64);
                if status == StatusCode::BAD_REQUEST {
                    return Err(AdapterError::Validation(error_text));
                }
                return Err(AdapterError::Transport(anyhow::anyhow!(
                    "Failed to update long-term retention policy: {status} - {error_text}"
                )));
            }

            let resource = response
                .json::<PolicyResource>()
                .await
                .context("Failed to deserialize long-term retention policy response")?;

            span_clone.record("operation.success", true);
            span_clone.record("operation.duration_ms", start.elapsed().as_millis() as u64);
            Ok(resource.into())
        }
        .instrument(span)
        .await
    }
}
