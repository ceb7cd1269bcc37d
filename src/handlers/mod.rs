// Handlers module for the Cluster Registry backend

pub mod cluster_handler;
pub mod health_handler;
