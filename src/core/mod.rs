pub mod aggregator;
pub mod negotiation;
pub mod normalizer;
pub mod orchestrator;
pub mod region;
pub mod renderer;
pub mod routing;

pub use crate::domain::model::{AggregatedResults, DirectoryResultList, IdentifierSet, RoutingResponse};
pub use crate::domain::ports::{ConfigProvider, DirectoryConnector, DirectorySearch, RegionClassifier};
pub use crate::utils::error::Result;
