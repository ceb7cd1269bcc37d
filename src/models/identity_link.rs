use serde::{Deserialize, Serialize};

/// Payload for POST /clusters/identitylink. The identity id travels as a
/// string and is parsed (and rejected) at the controller.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LinkIdentityToClusterData {
    pub identity_id: String,
    pub cluster_url: String,
    pub ignore_if_already_exists: Option<bool>,
}

/// Payload for DELETE /clusters/identitylink.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UnLinkIdentityToClusterData {
    pub identity_id: String,
    pub cluster_url: String,
}
