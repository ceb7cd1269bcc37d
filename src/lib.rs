// Cluster Registry Backend Library
// Экспортируем публичные модули для использования в тестах

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod storage;

// Экспортируем основные типы
pub use auth::{AuthService, ServiceAccount};
pub use config::Config;
pub use error::RegistryError;
pub use services::ClusterService;

// Основная структура состояния приложения
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub auth_service: AuthService,
    pub cluster_service: ClusterService,
}
