use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::{info, warn};

use crate::error::RegistryError;
use crate::AppState;

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, RegistryError> {
    // Extract token from Authorization header
    let headers = request.headers().clone();
    let token = match state.auth_service.extract_token_from_headers(&headers) {
        Ok(token) => token,
        Err(e) => {
            warn!("Failed to extract token: {}", e);
            return Err(RegistryError::Unauthorized(
                "missing or invalid authorization header".to_string(),
            ));
        }
    };

    // Validate token against the auth service JWKS
    match state.auth_service.validate_token(&token).await {
        Ok(account) => {
            info!("Service account authenticated: {} (sub: {})", account.name, account.id);

            // Add the principal to request extensions for use in handlers
            request.extensions_mut().insert(account);

            Ok(next.run(request).await)
        }
        Err(e) => {
            warn!("Token validation error: {}", e);
            Err(RegistryError::Unauthorized("invalid token".to_string()))
        }
    }
}
