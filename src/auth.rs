use anyhow::{anyhow, Result};
use axum::http::HeaderMap;
use jsonwebtoken::{decode, Algorithm, DecodingKey, TokenData, Validation};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::Config;

/// Authenticated service-account principal, extracted from a verified token
/// by the auth middleware and attached to the request extensions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceAccount {
    pub id: String,
    pub name: String,
}

impl ServiceAccount {
    /// Returns true when this principal is the trusted service account
    /// registered under `account_name`.
    pub fn is_named(&self, account_name: &str) -> bool {
        self.name == account_name
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ServiceAccountClaims {
    pub sub: String,
    pub service_accountname: String,
    pub exp: usize,
    pub iat: Option<usize>,
}

#[derive(Clone)]
pub struct AuthService {
    config: Config,
    client: Client,
}

impl AuthService {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::new();
        Ok(Self {
            config: config.clone(),
            client,
        })
    }

    /// Validates a service-account token and returns the principal it carries.
    pub async fn validate_token(&self, token: &str) -> Result<ServiceAccount> {
        self.validate_with_jwks(token).await
    }

    async fn validate_with_jwks(&self, token: &str) -> Result<ServiceAccount> {
        // Получаем заголовок токена, чтобы извлечь kid
        let header = jsonwebtoken::decode_header(token)?;
        let kid = header.kid.ok_or_else(|| anyhow!("JWT header missing kid"))?;

        // Загружаем JWKS сервиса аутентификации
        let jwks = self
            .client
            .get(self.config.auth_jwks_url())
            .send()
            .await?
            .json::<serde_json::Value>()
            .await?;
        let keys = jwks
            .get("keys")
            .and_then(|k| k.as_array())
            .ok_or_else(|| anyhow!("JWKS keys missing"))?;
        let jwk = keys
            .iter()
            .find(|k| k.get("kid").and_then(|v| v.as_str()) == Some(kid.as_str()))
            .ok_or_else(|| anyhow!("No matching JWK for kid"))?;

        let n = jwk.get("n").and_then(|v| v.as_str()).ok_or_else(|| anyhow!("JWK missing n"))?;
        let e = jwk.get("e").and_then(|v| v.as_str()).ok_or_else(|| anyhow!("JWK missing e"))?;

        let decoding_key = DecodingKey::from_rsa_components(n, e)?;

        let validation = Validation::new(Algorithm::RS256);

        let token_data: TokenData<ServiceAccountClaims> =
            decode::<ServiceAccountClaims>(token, &decoding_key, &validation)?;

        let claims = token_data.claims;
        tracing::debug!(
            "JWT claims validated: sub={}, service_accountname={}",
            claims.sub,
            claims.service_accountname
        );

        Ok(ServiceAccount {
            id: claims.sub,
            name: claims.service_accountname,
        })
    }

    pub fn extract_token_from_headers(&self, headers: &HeaderMap) -> Result<String> {
        let auth_header = headers
            .get("Authorization")
            .ok_or_else(|| anyhow!("Missing Authorization header"))?
            .to_str()
            .map_err(|_| anyhow!("Invalid Authorization header"))?;

        if !auth_header.starts_with("Bearer ") {
            return Err(anyhow!("Invalid Authorization header format"));
        }

        Ok(auth_header[7..].to_string())
    }
}
