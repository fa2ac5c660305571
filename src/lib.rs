pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::directory::{DirectorySettings, HttpDirectoryConnector};
pub use crate::config::GatewayConfig;
pub use crate::core::aggregator::FanOutSettings;
pub use crate::core::negotiation::ResponseFormat;
pub use crate::core::orchestrator::{LookupOrchestrator, LookupRequest};
pub use crate::core::renderer::RenderedResponse;
pub use crate::utils::error::{GatewayError, QueryFailure, Result};
