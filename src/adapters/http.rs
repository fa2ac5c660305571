// Axum routes for the provision lookup API.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tower_http::trace::TraceLayer;

use crate::core::orchestrator::{render_error, LookupOrchestrator, LookupRequest};
use crate::core::renderer::RenderedResponse;
use crate::domain::ports::{DirectoryConnector, RegionClassifier};
use crate::utils::error::GatewayError;

type SharedOrchestrator<C, R> = Arc<LookupOrchestrator<C, R>>;

pub fn create_router<C, R>(orchestrator: SharedOrchestrator<C, R>) -> Router
where
    C: DirectoryConnector + 'static,
    R: RegionClassifier + 'static,
{
    Router::new()
        .route("/provision/:canonical_object_type_ids", get(lookup::<C, R>))
        .route(
            "/provision/:canonical_object_type_ids/:atu_code",
            get(lookup_in_region::<C, R>),
        )
        .route("/health", get(health_check))
        .with_state(orchestrator)
        .layer(middleware::map_response(disable_caching))
        .layer(TraceLayer::new_for_http())
}

/// Lookup results change whenever the directory index changes.
async fn disable_caching(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-cache, no-store, must-revalidate, max-age=0"),
    );
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(header::EXPIRES, HeaderValue::from_static("0"));
    response
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn lookup<C, R>(
    State(orchestrator): State<SharedOrchestrator<C, R>>,
    Path(canonical_object_type_ids): Path<String>,
    headers: HeaderMap,
) -> Response
where
    C: DirectoryConnector + 'static,
    R: RegionClassifier + 'static,
{
    let request = LookupRequest {
        canonical_object_type_ids: Some(canonical_object_type_ids),
        atu_code: None,
        accept: accept_header(&headers),
    };
    respond(&orchestrator, request).await
}

async fn lookup_in_region<C, R>(
    State(orchestrator): State<SharedOrchestrator<C, R>>,
    Path((canonical_object_type_ids, atu_code)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response
where
    C: DirectoryConnector + 'static,
    R: RegionClassifier + 'static,
{
    let request = LookupRequest {
        canonical_object_type_ids: Some(canonical_object_type_ids),
        atu_code: Some(atu_code),
        accept: accept_header(&headers),
    };
    respond(&orchestrator, request).await
}

fn accept_header(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn respond<C, R>(orchestrator: &LookupOrchestrator<C, R>, request: LookupRequest) -> Response
where
    C: DirectoryConnector,
    R: RegionClassifier,
{
    match orchestrator.lookup(&request).await {
        Ok(rendered) => into_response(StatusCode::OK, rendered),
        Err(err) => error_response(&err, &request),
    }
}

fn into_response(status: StatusCode, rendered: RenderedResponse) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, rendered.content_type())],
        rendered.body,
    )
        .into_response()
}

fn error_response(err: &GatewayError, request: &LookupRequest) -> Response {
    let status = err.status_code();
    match render_error(err, request.response_format()) {
        Ok(rendered) => into_response(status, rendered),
        Err(render_err) => {
            tracing::error!("Failed to render error response: {}", render_err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                err.user_friendly_message(),
            )
                .into_response()
        }
    }
}
