use tokio;

mod common;

use common::create_test_config;

#[tokio::test]
async fn test_config_values() {
    // Тест значений тестовой конфигурации
    let config = create_test_config();

    assert_eq!(config.server_address, "0.0.0.0:3002");
    assert_eq!(config.auth_service_url, "http://localhost:8089");
    assert_eq!(config.toolchain_operator_account, "toolchain-operator");
    assert_eq!(config.auth_account, "auth");
    assert_eq!(config.log_level, "info");
}

#[tokio::test]
async fn test_auth_jwks_url() {
    // Тест генерации URL ключей сервиса аутентификации
    let mut config = create_test_config();
    config.auth_service_url = "http://auth:8089".to_string();

    assert_eq!(config.auth_jwks_url(), "http://auth:8089/api/token/keys");
}

#[tokio::test]
async fn test_config_is_cloneable() {
    let config = create_test_config();
    let cloned = config.clone();

    assert_eq!(cloned.server_address, config.server_address);
    assert_eq!(cloned.database_url, config.database_url);
}
