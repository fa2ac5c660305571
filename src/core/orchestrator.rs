use crate::core::aggregator::{aggregate, FanOutSettings};
use crate::core::negotiation::{negotiate, ResponseFormat};
use crate::core::normalizer::normalize_request;
use crate::core::renderer::{render, RenderedResponse};
use crate::core::routing::build_response;
use crate::domain::model::{ErrorEntry, LookupQuery, RoutingResponse};
use crate::domain::ports::{DirectoryConnector, RegionClassifier};
use crate::utils::error::{GatewayError, Result};
use std::time::Instant;

pub const BAD_REQUEST_CODE: &str = "bad-request";
pub const INTERNAL_ERROR_CODE: &str = "internal-error";

/// Raw lookup input as delivered by the HTTP layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupRequest {
    pub canonical_object_type_ids: Option<String>,
    pub atu_code: Option<String>,
    pub accept: Option<String>,
}

impl LookupRequest {
    pub fn new(canonical_object_type_ids: impl Into<String>) -> Self {
        Self {
            canonical_object_type_ids: Some(canonical_object_type_ids.into()),
            ..Self::default()
        }
    }

    pub fn with_atu_code(mut self, atu_code: impl Into<String>) -> Self {
        self.atu_code = Some(atu_code.into());
        self
    }

    pub fn with_accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = Some(accept.into());
        self
    }

    pub fn response_format(&self) -> ResponseFormat {
        negotiate(self.accept.as_deref())
    }
}

/// Drives one lookup: normalize, fan out to the directory, aggregate, render.
pub struct LookupOrchestrator<C: DirectoryConnector, R: RegionClassifier> {
    connector: C,
    classifier: R,
    fan_out: FanOutSettings,
}

impl<C: DirectoryConnector, R: RegionClassifier> LookupOrchestrator<C, R> {
    pub fn new(connector: C, classifier: R, fan_out: FanOutSettings) -> Self {
        Self {
            connector,
            classifier,
            fan_out,
        }
    }

    pub async fn lookup(&self, request: &LookupRequest) -> Result<RenderedResponse> {
        let start = Instant::now();
        let result = self.run(request).await;
        let elapsed = start.elapsed();

        match &result {
            Ok(_) => tracing::info!(
                "✅ Successfully finalized querying Directory after {}ms",
                elapsed.as_millis()
            ),
            Err(e) if e.is_client_error() => tracing::warn!(
                "Rejected lookup request after {}ms: {}",
                elapsed.as_millis(),
                e
            ),
            Err(e) => tracing::error!(
                "❌ Lookup failed after {}ms: {}",
                elapsed.as_millis(),
                e
            ),
        }
        result
    }

    async fn run(&self, request: &LookupRequest) -> Result<RenderedResponse> {
        let query = normalize_request(
            request.canonical_object_type_ids.as_deref(),
            request.atu_code.as_deref(),
        )?;
        self.log_query(&query);

        let aggregated = {
            // 每個請求獨立的 Directory session，離開此區塊即釋放
            let session = self.connector.open()?;
            aggregate(&query.identifiers, &session, &self.fan_out).await?
        };

        tracing::info!(
            "Collective Directory results: {} of {} identifier(s) matched {:?}",
            aggregated.len(),
            query.identifiers.len(),
            aggregated.identifiers().collect::<Vec<_>>()
        );

        let response = build_response(&query.identifiers, &aggregated);
        render(&response, request.response_format())
    }

    fn log_query(&self, query: &LookupQuery) {
        match &query.region_code {
            Some(code) => {
                tracing::info!(
                    "Querying for {:?} in ATU code '{}'",
                    query.identifiers.as_slice(),
                    code
                );
                if self.classifier.is_nuts_code(code) {
                    tracing::info!("The provided ATU code '{}' is a NUTS code", code);
                } else {
                    tracing::info!("The provided ATU code '{}' seems to be a LAU code", code);
                }
            }
            None => tracing::info!("Querying for {:?}", query.identifiers.as_slice()),
        }
    }
}

/// Error body for a failed lookup, in the negotiated format.
pub fn render_error(error: &GatewayError, format: ResponseFormat) -> Result<RenderedResponse> {
    let code = if error.is_client_error() {
        BAD_REQUEST_CODE
    } else {
        INTERNAL_ERROR_CODE
    };
    let response =
        RoutingResponse::from_error(ErrorEntry::new(code, error.user_friendly_message()));
    render(&response, format)
}
