use async_trait::async_trait;
use sqlx::postgres::PgPool;
use uuid::Uuid;

use super::{ClusterStore, IdentityLinkStore};
use crate::error::RegistryError;
use crate::models::Cluster;

#[derive(Clone)]
pub struct PgClusterStore {
    pool: PgPool,
}

impl PgClusterStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClusterStore for PgClusterStore {
    async fn save(&self, cluster: &Cluster) -> Result<(), RegistryError> {
        sqlx::query(
            r#"
            INSERT INTO clusters (
                cluster_id, name, cluster_type, api_url, console_url, metrics_url,
                logging_url, app_dns, capacity_exhausted, sa_token, sa_username,
                sa_token_encrypted, auth_client_id, auth_client_secret,
                auth_default_scope, token_provider_id, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            ON CONFLICT (cluster_id) DO UPDATE SET
                name = EXCLUDED.name,
                cluster_type = EXCLUDED.cluster_type,
                api_url = EXCLUDED.api_url,
                console_url = EXCLUDED.console_url,
                metrics_url = EXCLUDED.metrics_url,
                logging_url = EXCLUDED.logging_url,
                app_dns = EXCLUDED.app_dns,
                capacity_exhausted = EXCLUDED.capacity_exhausted,
                sa_token = EXCLUDED.sa_token,
                sa_username = EXCLUDED.sa_username,
                sa_token_encrypted = EXCLUDED.sa_token_encrypted,
                auth_client_id = EXCLUDED.auth_client_id,
                auth_client_secret = EXCLUDED.auth_client_secret,
                auth_default_scope = EXCLUDED.auth_default_scope,
                token_provider_id = EXCLUDED.token_provider_id,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(cluster.cluster_id)
        .bind(&cluster.name)
        .bind(&cluster.cluster_type)
        .bind(&cluster.api_url)
        .bind(&cluster.console_url)
        .bind(&cluster.metrics_url)
        .bind(&cluster.logging_url)
        .bind(&cluster.app_dns)
        .bind(cluster.capacity_exhausted)
        .bind(&cluster.sa_token)
        .bind(&cluster.sa_username)
        .bind(cluster.sa_token_encrypted)
        .bind(&cluster.auth_client_id)
        .bind(&cluster.auth_client_secret)
        .bind(&cluster.auth_default_scope)
        .bind(&cluster.token_provider_id)
        .bind(cluster.created_at)
        .bind(cluster.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn load(&self, cluster_id: Uuid) -> Result<Option<Cluster>, RegistryError> {
        let cluster = sqlx::query_as::<_, Cluster>(
            "SELECT * FROM clusters WHERE cluster_id = $1",
        )
        .bind(cluster_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(cluster)
    }

    async fn load_by_api_url(&self, api_url: &str) -> Result<Option<Cluster>, RegistryError> {
        let cluster = sqlx::query_as::<_, Cluster>(
            "SELECT * FROM clusters WHERE api_url = $1",
        )
        .bind(api_url)
        .fetch_optional(&self.pool)
        .await?;

        Ok(cluster)
    }

    async fn list(&self) -> Result<Vec<Cluster>, RegistryError> {
        let clusters = sqlx::query_as::<_, Cluster>(
            "SELECT * FROM clusters ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(clusters)
    }

    async fn delete(&self, cluster_id: Uuid) -> Result<bool, RegistryError> {
        let result = sqlx::query("DELETE FROM clusters WHERE cluster_id = $1")
            .bind(cluster_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[derive(Clone)]
pub struct PgIdentityLinkStore {
    pool: PgPool,
}

impl PgIdentityLinkStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdentityLinkStore for PgIdentityLinkStore {
    async fn insert(&self, identity_id: Uuid, cluster_url: &str) -> Result<(), RegistryError> {
        sqlx::query(
            "INSERT INTO identity_cluster_links (identity_id, cluster_url, created_at) VALUES ($1, $2, now())",
        )
        .bind(identity_id)
        .bind(cluster_url)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn exists(&self, identity_id: Uuid, cluster_url: &str) -> Result<bool, RegistryError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM identity_cluster_links WHERE identity_id = $1 AND cluster_url = $2",
        )
        .bind(identity_id)
        .bind(cluster_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    async fn delete(&self, identity_id: Uuid, cluster_url: &str) -> Result<bool, RegistryError> {
        let result = sqlx::query(
            "DELETE FROM identity_cluster_links WHERE identity_id = $1 AND cluster_url = $2",
        )
        .bind(identity_id)
        .bind(cluster_url)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
