// Models module for the Cluster Registry backend
// Wire payloads, persisted records and the two cluster views

pub mod cluster;
pub mod identity_link;

pub use cluster::*;
pub use identity_link::*;
