use axum::{
    extract::{Extension, Path, State},
    http::{header, HeaderName, StatusCode},
    response::Json,
};
use tracing::error;
use uuid::Uuid;

use crate::auth::ServiceAccount;
use crate::error::RegistryError;
use crate::models::{
    ClusterList, ClusterSingle, ClusterView, CreateClusterPayload, FullClusterList,
    FullClusterSingle, FullClusterView, LinkIdentityToClusterData, UnLinkIdentityToClusterData,
};
use crate::services::validate_url;
use crate::AppState;

/// GET /clusters
/// Returns the list of registered clusters in the public view.
pub async fn list(
    State(state): State<AppState>,
    Extension(caller): Extension<ServiceAccount>,
) -> Result<Json<ClusterList>, RegistryError> {
    let clusters = state.cluster_service.list(&caller).await?;
    let data = clusters.iter().map(ClusterView::from).collect();
    Ok(Json(ClusterList { data }))
}

/// GET /clusters/foundauthclient
/// Returns the list of clusters with full configuration including auth
/// client data. To be used by the auth service only.
pub async fn list_for_auth_client(
    State(state): State<AppState>,
    Extension(caller): Extension<ServiceAccount>,
) -> Result<Json<FullClusterList>, RegistryError> {
    let clusters = state.cluster_service.list_for_auth(&caller).await?;
    let data = clusters.iter().map(FullClusterView::from).collect();
    Ok(Json(FullClusterList { data }))
}

/// GET /clusters/:cluster_id
pub async fn show(
    State(state): State<AppState>,
    Extension(caller): Extension<ServiceAccount>,
    Path(cluster_id): Path<Uuid>,
) -> Result<Json<ClusterSingle>, RegistryError> {
    // authorization is checked at the service level for more consistency
    // across the codebase
    let cluster = state.cluster_service.load(&caller, cluster_id).await?;
    Ok(Json(ClusterSingle {
        data: ClusterView::from(&cluster),
    }))
}

/// GET /clusters/:cluster_id/authclient
/// Returns the cluster with full configuration including auth client data.
/// To be used by the auth service only.
pub async fn show_for_auth_client(
    State(state): State<AppState>,
    Extension(caller): Extension<ServiceAccount>,
    Path(cluster_id): Path<Uuid>,
) -> Result<Json<FullClusterSingle>, RegistryError> {
    // authorization is checked at the service level for more consistency
    // across the codebase
    let cluster = state.cluster_service.load_for_auth(&caller, cluster_id).await?;
    Ok(Json(FullClusterSingle {
        data: FullClusterView::from(&cluster),
    }))
}

/// POST /clusters
/// Registers a new cluster configuration for later use, or updates the
/// record already registered under the same API URL.
pub async fn create(
    State(state): State<AppState>,
    Extension(caller): Extension<ServiceAccount>,
    Json(payload): Json<CreateClusterPayload>,
) -> Result<(StatusCode, [(HeaderName, String); 1]), RegistryError> {
    // only the toolchain operator service account may register clusters
    if !caller.is_named(&state.config.toolchain_operator_account) {
        error!("unauthorized access to cluster info");
        return Err(RegistryError::Unauthorized(
            "unauthorized access to cluster info".to_string(),
        ));
    }

    let cluster = match state.cluster_service.create_or_save(payload.data).await {
        Ok(cluster) => cluster,
        Err(e) => {
            error!("error while creating new cluster configuration: {}", e);
            return Err(e);
        }
    };

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/clusters/{}", cluster.cluster_id))],
    ))
}

/// DELETE /clusters/:cluster_id
pub async fn delete(
    State(state): State<AppState>,
    Extension(caller): Extension<ServiceAccount>,
    Path(cluster_id): Path<Uuid>,
) -> Result<StatusCode, RegistryError> {
    if let Err(e) = state.cluster_service.delete(&caller, cluster_id).await {
        error!("error while deleting a cluster configuration: {}", e);
        return Err(e);
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /clusters/identitylink
/// Records an identity-cluster relationship.
pub async fn link_identity_to_cluster(
    State(state): State<AppState>,
    Extension(caller): Extension<ServiceAccount>,
    Json(payload): Json<LinkIdentityToClusterData>,
) -> Result<StatusCode, RegistryError> {
    if !caller.is_named(&state.config.auth_account) {
        error!("the account is not authorized to create identity cluster relationship");
        return Err(RegistryError::Unauthorized(
            "account not authorized to create identity cluster relationship".to_string(),
        ));
    }

    let identity_id = Uuid::parse_str(&payload.identity_id).map_err(|_| {
        RegistryError::BadParameter(format!(
            "identity-id {} is not a valid UUID",
            payload.identity_id
        ))
    })?;

    validate_url("cluster-url", &payload.cluster_url)?;

    // ignore-if-already-exists defaults to true so the call is safe to retry
    let ignore = payload.ignore_if_already_exists.unwrap_or(true);

    if let Err(e) = state
        .cluster_service
        .link_identity_to_cluster(identity_id, &payload.cluster_url, ignore)
        .await
    {
        error!(
            "error while linking identity-id {} to cluster with url {}: {}",
            identity_id, payload.cluster_url, e
        );
        return Err(e);
    }

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /clusters/identitylink
/// Removes an identity-cluster relationship.
pub async fn remove_identity_to_cluster_link(
    State(state): State<AppState>,
    Extension(caller): Extension<ServiceAccount>,
    Json(payload): Json<UnLinkIdentityToClusterData>,
) -> Result<StatusCode, RegistryError> {
    if !caller.is_named(&state.config.auth_account) {
        error!("the account is not authorized to remove identity cluster relationship");
        return Err(RegistryError::Unauthorized(
            "account not authorized to remove identity cluster relationship".to_string(),
        ));
    }

    let identity_id = Uuid::parse_str(&payload.identity_id).map_err(|_| {
        RegistryError::BadParameter(format!(
            "identity-id {} is not a valid UUID",
            payload.identity_id
        ))
    })?;

    validate_url("cluster-url", &payload.cluster_url)?;

    if let Err(e) = state
        .cluster_service
        .remove_identity_to_cluster_link(identity_id, &payload.cluster_url)
        .await
    {
        error!(
            "error while removing link of identity-id {} to cluster with url {}: {}",
            identity_id, payload.cluster_url, e
        );
        return Err(e);
    }

    Ok(StatusCode::NO_CONTENT)
}
