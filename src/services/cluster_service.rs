use std::sync::Arc;

use chrono::Utc;
use url::Url;
use uuid::Uuid;

use crate::auth::ServiceAccount;
use crate::config::Config;
use crate::error::RegistryError;
use crate::models::{with_trailing_slash, Cluster, CreateClusterData};
use crate::storage::{ClusterStore, IdentityLinkStore};

/// Business rules of the registry. Authorization policy for the read and
/// delete paths is enforced here so it lives in one place; the create and
/// link entry points are additionally gated at the controller.
#[derive(Clone)]
pub struct ClusterService {
    clusters: Arc<dyn ClusterStore>,
    links: Arc<dyn IdentityLinkStore>,
    toolchain_operator_account: String,
    auth_account: String,
}

impl ClusterService {
    pub fn new(
        clusters: Arc<dyn ClusterStore>,
        links: Arc<dyn IdentityLinkStore>,
        config: &Config,
    ) -> Self {
        Self {
            clusters,
            links,
            toolchain_operator_account: config.toolchain_operator_account.clone(),
            auth_account: config.auth_account.clone(),
        }
    }

    /// All registered clusters, in store order.
    pub async fn list(&self, _caller: &ServiceAccount) -> Result<Vec<Cluster>, RegistryError> {
        self.clusters.list().await
    }

    /// All registered clusters with credentials. Auth service only.
    pub async fn list_for_auth(
        &self,
        caller: &ServiceAccount,
    ) -> Result<Vec<Cluster>, RegistryError> {
        self.ensure_auth_account(caller)?;
        self.clusters.list().await
    }

    pub async fn load(
        &self,
        _caller: &ServiceAccount,
        cluster_id: Uuid,
    ) -> Result<Cluster, RegistryError> {
        self.clusters.load(cluster_id).await?.ok_or_else(|| {
            RegistryError::NotFound(format!("cluster with id {} not found", cluster_id))
        })
    }

    /// Single cluster with credentials. Auth service only.
    pub async fn load_for_auth(
        &self,
        caller: &ServiceAccount,
        cluster_id: Uuid,
    ) -> Result<Cluster, RegistryError> {
        self.ensure_auth_account(caller)?;
        self.clusters.load(cluster_id).await?.ok_or_else(|| {
            RegistryError::NotFound(format!("cluster with id {} not found", cluster_id))
        })
    }

    /// Creates or updates a cluster configuration. The record is keyed by
    /// its API URL: re-registering an already known cluster updates it in
    /// place and keeps the original `cluster_id`. URL fields are validated
    /// and stored with a trailing slash.
    pub async fn create_or_save(
        &self,
        data: CreateClusterData,
    ) -> Result<Cluster, RegistryError> {
        validate_url("api-url", &data.api_url)?;
        for (field, value) in [
            ("console-url", &data.console_url),
            ("metrics-url", &data.metrics_url),
            ("logging-url", &data.logging_url),
        ] {
            if let Some(value) = value {
                validate_url(field, value)?;
            }
        }

        let api_url = with_trailing_slash(&data.api_url);
        let now = Utc::now();

        let cluster = match self.clusters.load_by_api_url(&api_url).await? {
            Some(mut existing) => {
                existing.name = data.name;
                existing.cluster_type = data.cluster_type;
                existing.app_dns = data.app_dns;
                existing.sa_token = data.service_account_token;
                existing.sa_username = data.service_account_username;
                existing.auth_client_id = data.auth_client_id;
                existing.auth_client_secret = data.auth_client_secret;
                existing.auth_default_scope = data.auth_client_default_scope;
                // optional fields only overwrite when explicitly supplied
                if let Some(console_url) = data.console_url {
                    existing.console_url = with_trailing_slash(&console_url);
                }
                if let Some(metrics_url) = data.metrics_url {
                    existing.metrics_url = with_trailing_slash(&metrics_url);
                }
                if let Some(logging_url) = data.logging_url {
                    existing.logging_url = with_trailing_slash(&logging_url);
                }
                if let Some(capacity_exhausted) = data.capacity_exhausted {
                    existing.capacity_exhausted = capacity_exhausted;
                }
                if let Some(token_provider_id) = data.token_provider_id {
                    existing.token_provider_id = token_provider_id;
                }
                existing.updated_at = now;
                existing
            }
            None => Cluster {
                cluster_id: Uuid::new_v4(),
                name: data.name,
                cluster_type: data.cluster_type,
                api_url,
                console_url: data
                    .console_url
                    .map(|u| with_trailing_slash(&u))
                    .unwrap_or_default(),
                metrics_url: data
                    .metrics_url
                    .map(|u| with_trailing_slash(&u))
                    .unwrap_or_default(),
                logging_url: data
                    .logging_url
                    .map(|u| with_trailing_slash(&u))
                    .unwrap_or_default(),
                app_dns: data.app_dns,
                capacity_exhausted: data.capacity_exhausted.unwrap_or(false),
                sa_token: data.service_account_token,
                sa_username: data.service_account_username,
                sa_token_encrypted: false,
                auth_client_id: data.auth_client_id,
                auth_client_secret: data.auth_client_secret,
                auth_default_scope: data.auth_client_default_scope,
                token_provider_id: data.token_provider_id.unwrap_or_default(),
                created_at: now,
                updated_at: now,
            },
        };

        self.clusters.save(&cluster).await?;
        Ok(cluster)
    }

    /// Removes a cluster configuration. Toolchain operator only.
    pub async fn delete(
        &self,
        caller: &ServiceAccount,
        cluster_id: Uuid,
    ) -> Result<(), RegistryError> {
        if !caller.is_named(&self.toolchain_operator_account) {
            return Err(RegistryError::Unauthorized(
                "unauthorized access to cluster info".to_string(),
            ));
        }
        let removed = self.clusters.delete(cluster_id).await?;
        if !removed {
            return Err(RegistryError::NotFound(format!(
                "cluster with id {} not found",
                cluster_id
            )));
        }
        Ok(())
    }

    /// Records that an identity belongs to the cluster registered under the
    /// given URL. With `ignore_if_exists`, re-linking the same pair is a
    /// successful no-op.
    pub async fn link_identity_to_cluster(
        &self,
        identity_id: Uuid,
        cluster_url: &str,
        ignore_if_exists: bool,
    ) -> Result<(), RegistryError> {
        let cluster_url = with_trailing_slash(cluster_url);
        if self.clusters.load_by_api_url(&cluster_url).await?.is_none() {
            return Err(RegistryError::BadParameter(format!(
                "cluster with url '{}' is not registered",
                cluster_url
            )));
        }

        if self.links.exists(identity_id, &cluster_url).await? {
            if ignore_if_exists {
                return Ok(());
            }
            return Err(RegistryError::BadParameter(format!(
                "identity {} is already linked to cluster '{}'",
                identity_id, cluster_url
            )));
        }

        self.links.insert(identity_id, &cluster_url).await
    }

    /// Removes an identity-cluster association. Removing a pair that was
    /// never linked is a not-found.
    pub async fn remove_identity_to_cluster_link(
        &self,
        identity_id: Uuid,
        cluster_url: &str,
    ) -> Result<(), RegistryError> {
        let cluster_url = with_trailing_slash(cluster_url);
        let removed = self.links.delete(identity_id, &cluster_url).await?;
        if !removed {
            return Err(RegistryError::NotFound(format!(
                "identity {} is not linked to cluster '{}'",
                identity_id, cluster_url
            )));
        }
        Ok(())
    }

    fn ensure_auth_account(&self, caller: &ServiceAccount) -> Result<(), RegistryError> {
        if !caller.is_named(&self.auth_account) {
            return Err(RegistryError::Unauthorized(
                "unauthorized access to cluster info".to_string(),
            ));
        }
        Ok(())
    }
}

/// Checks that `raw` is an absolute http(s) URL with a host. The error
/// message names the offending field and value.
pub fn validate_url(field: &str, raw: &str) -> Result<(), RegistryError> {
    let invalid = || RegistryError::BadParameter(format!("{} '{}' is invalid", field, raw));
    let parsed = Url::parse(raw).map_err(|_| invalid())?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(invalid());
    }
    Ok(())
}
