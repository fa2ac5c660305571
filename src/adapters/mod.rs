// Adapters layer: concrete implementations for external systems (directory HTTP API, axum routes).

pub mod directory;
pub mod http;
