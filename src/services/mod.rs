// Services module for the Cluster Registry backend
// Business rules live here; handlers stay thin

pub mod cluster_service;

pub use cluster_service::*;
