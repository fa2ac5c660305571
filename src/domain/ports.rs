use crate::domain::model::DirectoryResultList;
use crate::utils::error::{QueryFailure, Result};
use async_trait::async_trait;
use std::time::Duration;

/// One directory search per identifier.
#[async_trait]
pub trait DirectorySearch: Send + Sync {
    async fn query(&self, identifier: &str) -> std::result::Result<DirectoryResultList, QueryFailure>;
}

/// Hands out a directory session for exactly one lookup batch.
///
/// The session owns the transport resources (connection pool). It is dropped when the
/// batch completes, which releases them regardless of how the individual queries ended.
pub trait DirectoryConnector: Send + Sync {
    type Session: DirectorySearch;

    fn open(&self) -> Result<Self::Session>;
}

/// Advisory classification of region (ATU) codes. Never gates a request.
pub trait RegionClassifier: Send + Sync {
    fn is_nuts_code(&self, code: &str) -> bool;
}

pub trait ConfigProvider: Send + Sync {
    fn directory_base_url(&self) -> &str;
    fn max_results_per_query(&self) -> u32;
    fn max_concurrent_queries(&self) -> usize;
    fn request_timeout(&self) -> Duration;
    fn lookup_deadline(&self) -> Option<Duration>;
}
