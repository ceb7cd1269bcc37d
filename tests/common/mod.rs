#![allow(dead_code)]

// Общие помощники для интеграционных тестов: in-memory реализации
// хранилищ и сборка тестового роутера без auth middleware

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};
use serde_json::json;
use uuid::Uuid;

use cluster_registry_backend::{
    error::RegistryError,
    handlers::cluster_handler,
    models::Cluster,
    storage::{ClusterStore, IdentityLinkStore},
    AppState, AuthService, ClusterService, Config, ServiceAccount,
};

pub struct InMemoryClusterStore {
    clusters: RwLock<Vec<Cluster>>,
}

impl InMemoryClusterStore {
    pub fn new() -> Self {
        Self {
            clusters: RwLock::new(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.clusters.read().unwrap().len()
    }

    pub fn get(&self, cluster_id: Uuid) -> Option<Cluster> {
        self.clusters
            .read()
            .unwrap()
            .iter()
            .find(|c| c.cluster_id == cluster_id)
            .cloned()
    }
}

#[async_trait]
impl ClusterStore for InMemoryClusterStore {
    async fn save(&self, cluster: &Cluster) -> Result<(), RegistryError> {
        let mut clusters = self.clusters.write().unwrap();
        match clusters.iter_mut().find(|c| c.cluster_id == cluster.cluster_id) {
            Some(existing) => *existing = cluster.clone(),
            None => clusters.push(cluster.clone()),
        }
        Ok(())
    }

    async fn load(&self, cluster_id: Uuid) -> Result<Option<Cluster>, RegistryError> {
        Ok(self.get(cluster_id))
    }

    async fn load_by_api_url(&self, api_url: &str) -> Result<Option<Cluster>, RegistryError> {
        Ok(self
            .clusters
            .read()
            .unwrap()
            .iter()
            .find(|c| c.api_url == api_url)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Cluster>, RegistryError> {
        Ok(self.clusters.read().unwrap().clone())
    }

    async fn delete(&self, cluster_id: Uuid) -> Result<bool, RegistryError> {
        let mut clusters = self.clusters.write().unwrap();
        let before = clusters.len();
        clusters.retain(|c| c.cluster_id != cluster_id);
        Ok(clusters.len() < before)
    }
}

pub struct InMemoryIdentityLinkStore {
    links: RwLock<Vec<(Uuid, String)>>,
}

impl InMemoryIdentityLinkStore {
    pub fn new() -> Self {
        Self {
            links: RwLock::new(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.links.read().unwrap().len()
    }

    pub fn contains(&self, identity_id: Uuid, cluster_url: &str) -> bool {
        self.links
            .read()
            .unwrap()
            .iter()
            .any(|(id, url)| *id == identity_id && url == cluster_url)
    }
}

#[async_trait]
impl IdentityLinkStore for InMemoryIdentityLinkStore {
    async fn insert(&self, identity_id: Uuid, cluster_url: &str) -> Result<(), RegistryError> {
        self.links
            .write()
            .unwrap()
            .push((identity_id, cluster_url.to_string()));
        Ok(())
    }

    async fn exists(&self, identity_id: Uuid, cluster_url: &str) -> Result<bool, RegistryError> {
        Ok(self.contains(identity_id, cluster_url))
    }

    async fn delete(&self, identity_id: Uuid, cluster_url: &str) -> Result<bool, RegistryError> {
        let mut links = self.links.write().unwrap();
        let before = links.len();
        links.retain(|(id, url)| !(*id == identity_id && url == cluster_url));
        Ok(links.len() < before)
    }
}

/// Создает тестовую конфигурацию
pub fn create_test_config() -> Config {
    Config {
        server_address: "0.0.0.0:3002".to_string(),
        database_url: "postgresql://localhost:5432/test".to_string(),
        auth_service_url: "http://localhost:8089".to_string(),
        toolchain_operator_account: "toolchain-operator".to_string(),
        auth_account: "auth".to_string(),
        log_level: "info".to_string(),
    }
}

/// Создает тестовый AppState поверх in-memory хранилищ и возвращает
/// хэндлы хранилищ для проверок состояния
pub fn create_test_app_state() -> (
    AppState,
    Arc<InMemoryClusterStore>,
    Arc<InMemoryIdentityLinkStore>,
) {
    let config = create_test_config();
    let auth_service = AuthService::new(&config).unwrap();
    let clusters = Arc::new(InMemoryClusterStore::new());
    let links = Arc::new(InMemoryIdentityLinkStore::new());
    let cluster_service = ClusterService::new(clusters.clone(), links.clone(), &config);

    (
        AppState {
            config,
            auth_service,
            cluster_service,
        },
        clusters,
        links,
    )
}

pub fn toolchain_operator() -> ServiceAccount {
    ServiceAccount {
        id: "1f7af8b1-43d8-4ba6-9ea5-6cf59aab0e7d".to_string(),
        name: "toolchain-operator".to_string(),
    }
}

pub fn auth_account() -> ServiceAccount {
    ServiceAccount {
        id: "9331f808-c2b4-4a81-94e4-b31b2cd8eccd".to_string(),
        name: "auth".to_string(),
    }
}

pub fn other_account() -> ServiceAccount {
    ServiceAccount {
        id: "e93cdd65-c02d-4a09-8a39-66b7d2f6fa40".to_string(),
        name: "e2e-tests".to_string(),
    }
}

/// Собирает роутер кластеров без auth middleware; вызывающий аккаунт
/// инжектируется как расширение запроса
pub fn clusters_router(state: AppState, caller: ServiceAccount) -> Router {
    Router::new()
        .route(
            "/clusters",
            get(cluster_handler::list).post(cluster_handler::create),
        )
        .route(
            "/clusters/foundauthclient",
            get(cluster_handler::list_for_auth_client),
        )
        .route(
            "/clusters/identitylink",
            post(cluster_handler::link_identity_to_cluster)
                .delete(cluster_handler::remove_identity_to_cluster_link),
        )
        .route(
            "/clusters/:cluster_id",
            get(cluster_handler::show).delete(cluster_handler::delete),
        )
        .route(
            "/clusters/:cluster_id/authclient",
            get(cluster_handler::show_for_auth_client),
        )
        .layer(Extension(caller))
        .with_state(state)
}

/// Полный корректный payload для регистрации кластера
pub fn create_cluster_payload(api_url: &str) -> serde_json::Value {
    json!({
        "data": {
            "name": "member-1",
            "type": "OSD",
            "api-url": api_url,
            "app-dns": "apps.member-1.example.com",
            "service-account-token": "sa-token-secret",
            "service-account-username": "system:serviceaccount:toolchain:operator",
            "auth-client-id": "auth-client-id-1",
            "auth-client-secret": "auth-client-secret-1",
            "auth-client-default-scope": "openid profile"
        }
    })
}
