// Storage module for the Cluster Registry backend
// Persistence seams consumed by the cluster service

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::RegistryError;
use crate::models::Cluster;

pub mod postgres;

pub use postgres::{PgClusterStore, PgIdentityLinkStore};

/// Store of cluster configuration records. Uniqueness of `api_url` and
/// upsert atomicity are the store's responsibility.
#[async_trait]
pub trait ClusterStore: Send + Sync {
    async fn save(&self, cluster: &Cluster) -> Result<(), RegistryError>;
    async fn load(&self, cluster_id: Uuid) -> Result<Option<Cluster>, RegistryError>;
    async fn load_by_api_url(&self, api_url: &str) -> Result<Option<Cluster>, RegistryError>;
    async fn list(&self) -> Result<Vec<Cluster>, RegistryError>;
    /// Returns true when a record was actually removed.
    async fn delete(&self, cluster_id: Uuid) -> Result<bool, RegistryError>;
}

/// Store of identity-to-cluster associations.
#[async_trait]
pub trait IdentityLinkStore: Send + Sync {
    async fn insert(&self, identity_id: Uuid, cluster_url: &str) -> Result<(), RegistryError>;
    async fn exists(&self, identity_id: Uuid, cluster_url: &str) -> Result<bool, RegistryError>;
    /// Returns true when a link was actually removed.
    async fn delete(&self, identity_id: Uuid, cluster_url: &str) -> Result<bool, RegistryError>;
}
