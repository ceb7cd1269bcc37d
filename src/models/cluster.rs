use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Canonical cluster configuration record as persisted by the registry.
/// `cluster_id` is generated once at creation and never reassigned.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Cluster {
    pub cluster_id: Uuid,
    pub name: String,
    pub cluster_type: String,
    pub api_url: String,
    pub console_url: String,
    pub metrics_url: String,
    pub logging_url: String,
    pub app_dns: String,
    pub capacity_exhausted: bool,
    pub sa_token: String,
    pub sa_username: String,
    pub sa_token_encrypted: bool,
    pub auth_client_id: String,
    pub auth_client_secret: String,
    pub auth_default_scope: String,
    pub token_provider_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public projection of a cluster record. Lists exactly the fields safe to
/// expose to any authenticated caller; credentials never appear here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClusterView {
    pub name: String,
    pub api_url: String,
    pub console_url: String,
    pub metrics_url: String,
    pub logging_url: String,
    pub app_dns: String,
    #[serde(rename = "type")]
    pub cluster_type: String,
    pub capacity_exhausted: bool,
}

/// Privileged projection for the auth service: the public fields plus the
/// auth-client credentials, service-account credentials, encryption flag
/// and token provider reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FullClusterView {
    pub name: String,
    pub api_url: String,
    pub console_url: String,
    pub metrics_url: String,
    pub logging_url: String,
    pub app_dns: String,
    #[serde(rename = "type")]
    pub cluster_type: String,
    pub capacity_exhausted: bool,
    pub auth_client_id: String,
    pub auth_client_secret: String,
    pub auth_client_default_scope: String,
    pub service_account_token: String,
    pub service_account_username: String,
    pub sa_token_encrypted: bool,
    pub token_provider_id: String,
}

impl From<&Cluster> for ClusterView {
    fn from(c: &Cluster) -> Self {
        Self {
            name: c.name.clone(),
            api_url: with_trailing_slash(&c.api_url),
            console_url: with_trailing_slash(&c.console_url),
            metrics_url: with_trailing_slash(&c.metrics_url),
            logging_url: with_trailing_slash(&c.logging_url),
            app_dns: c.app_dns.clone(),
            cluster_type: c.cluster_type.clone(),
            capacity_exhausted: c.capacity_exhausted,
        }
    }
}

impl From<&Cluster> for FullClusterView {
    fn from(c: &Cluster) -> Self {
        Self {
            name: c.name.clone(),
            api_url: with_trailing_slash(&c.api_url),
            console_url: with_trailing_slash(&c.console_url),
            metrics_url: with_trailing_slash(&c.metrics_url),
            logging_url: with_trailing_slash(&c.logging_url),
            app_dns: c.app_dns.clone(),
            cluster_type: c.cluster_type.clone(),
            capacity_exhausted: c.capacity_exhausted,
            auth_client_id: c.auth_client_id.clone(),
            auth_client_secret: c.auth_client_secret.clone(),
            auth_client_default_scope: c.auth_default_scope.clone(),
            service_account_token: c.sa_token.clone(),
            service_account_username: c.sa_username.clone(),
            sa_token_encrypted: c.sa_token_encrypted,
            token_provider_id: c.token_provider_id.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClusterList {
    pub data: Vec<ClusterView>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClusterSingle {
    pub data: ClusterView,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FullClusterList {
    pub data: Vec<FullClusterView>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FullClusterSingle {
    pub data: FullClusterView,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateClusterPayload {
    pub data: CreateClusterData,
}

/// Creation payload. Optional fields carry explicit present/absent
/// semantics: absent means "leave at the zero value", never a sentinel.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CreateClusterData {
    pub name: String,
    #[serde(rename = "type")]
    pub cluster_type: String,
    pub api_url: String,
    pub app_dns: String,
    pub service_account_token: String,
    pub service_account_username: String,
    pub auth_client_id: String,
    pub auth_client_secret: String,
    pub auth_client_default_scope: String,
    pub console_url: Option<String>,
    pub metrics_url: Option<String>,
    pub logging_url: Option<String>,
    pub capacity_exhausted: Option<bool>,
    pub token_provider_id: Option<String>,
}

/// Appends a trailing slash unless the URL is empty or already ends with one.
pub fn with_trailing_slash(url: &str) -> String {
    if url.is_empty() || url.ends_with('/') {
        url.to_string()
    } else {
        format!("{}/", url)
    }
}
