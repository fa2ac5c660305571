use crate::adapters::directory::{DirectorySettings, HttpDirectoryConnector};
use crate::adapters::http::create_router;
use crate::config::GatewayConfig;
use crate::core::orchestrator::LookupOrchestrator;
use crate::core::region::NutsFormatClassifier;
use axum::Router;
use std::sync::Arc;

pub type HttpLookupOrchestrator = LookupOrchestrator<HttpDirectoryConnector, NutsFormatClassifier>;

/// Wires the reqwest-backed directory connector into the lookup pipeline.
pub fn build_orchestrator(config: &GatewayConfig) -> HttpLookupOrchestrator {
    LookupOrchestrator::new(
        HttpDirectoryConnector::new(DirectorySettings::from_config(config)),
        NutsFormatClassifier::new(),
        config.fan_out_settings(),
    )
}

pub fn build_router(config: &GatewayConfig) -> Router {
    create_router(Arc::new(build_orchestrator(config)))
}
