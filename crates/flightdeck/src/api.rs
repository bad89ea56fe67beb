//! HTTP API for flightdeck.
//!
//! Two routes over a shared [`TelemetryService`]:
//!
//! - `POST /api/telemetry` stores a reading and answers `201` with a plain
//!   acknowledgment. Any failure answers `400` with a plain-text reason.
//! - `GET /api/telemetry` answers `200` with every reading, newest first.
//!
//! The OpenAPI document is served at `/api-docs/openapi.json`.

use std::future::Future;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::Value;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use utoipa::OpenApi;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::reading::TelemetryReading;
use crate::service::{ServiceError, TelemetryPayload, TelemetryService};

/// Body of a successful `POST /api/telemetry`.
pub const SAVED_MESSAGE: &str = "Telemetry data saved";

/// Route serving both telemetry operations.
pub const TELEMETRY_PATH: &str = "/api/telemetry";

/// OpenAPI specification for the telemetry endpoints.
#[derive(Debug, OpenApi)]
#[openapi(
    paths(create_telemetry, list_telemetry),
    components(schemas(TelemetryPayload, TelemetryReading)),
    tags(
        (name = "Telemetry", description = "Flight-instrument telemetry ingest and listing")
    )
)]
pub struct ApiDoc;

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, self.to_string()).into_response()
    }
}

/// Build the router with `service` as shared state.
pub fn router(service: Arc<TelemetryService>) -> Router {
    Router::new()
        .route(TELEMETRY_PATH, get(list_telemetry).post(create_telemetry))
        .route("/api-docs/openapi.json", get(openapi))
        .with_state(service)
}

/// Serve the API on `listener` until `shutdown` resolves.
///
/// # Errors
///
/// Returns an error if the server fails while accepting connections.
pub async fn serve<F>(
    listener: TcpListener,
    service: Arc<TelemetryService>,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

/// Bind the configured address and serve until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn run(config: &Config, service: Arc<TelemetryService>) -> Result<()> {
    let address = config.server_address();
    let listener = TcpListener::bind(&address).await?;
    info!("Telemetry API listening on http://{}", listener.local_addr()?);

    serve(listener, service, shutdown_signal()).await?;
    info!("Telemetry API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Store a reading
#[utoipa::path(
    post,
    path = "/api/telemetry",
    tag = "Telemetry",
    request_body = TelemetryPayload,
    responses(
        (status = 201, description = "Reading stored", body = String),
        (status = 400, description = "Fields missing, not numbers, or out of range", body = String)
    )
)]
pub async fn create_telemetry(
    State(service): State<Arc<TelemetryService>>,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> Response {
    let parsed = match body {
        Ok(Json(document)) => TelemetryPayload::from_json(document),
        Err(rejection) => {
            warn!("Unreadable telemetry body: {rejection}");
            Err(ServiceError::Validation { field: "body" })
        }
    };
    let payload = match parsed {
        Ok(payload) => payload,
        Err(e) => return e.into_response(),
    };

    match blocking(move || service.submit(&payload)).await {
        Ok(id) => {
            info!(id, "Telemetry reading saved");
            (StatusCode::CREATED, SAVED_MESSAGE).into_response()
        }
        Err(e) => {
            warn!("Telemetry submission rejected: {e:?}");
            e.into_response()
        }
    }
}

/// List every reading, newest first
#[utoipa::path(
    get,
    path = "/api/telemetry",
    tag = "Telemetry",
    responses(
        (status = 200, description = "All readings, newest first", body = Vec<TelemetryReading>),
        (status = 400, description = "The store could not be read", body = String)
    )
)]
pub async fn list_telemetry(
    State(service): State<Arc<TelemetryService>>,
) -> std::result::Result<Json<Vec<TelemetryReading>>, ServiceError> {
    let readings = blocking(move || service.list()).await.inspect_err(|e| {
        error!("Failed to list telemetry: {e}");
    })?;
    Ok(Json(readings))
}

async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Run a store-bound service call on the blocking pool.
async fn blocking<T, F>(call: F) -> std::result::Result<T, ServiceError>
where
    F: FnOnce() -> std::result::Result<T, ServiceError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(call)
        .await
        .unwrap_or_else(|e| {
            error!("Telemetry task did not complete: {e}");
            Err(ServiceError::persistence(Error::internal(format!(
                "telemetry task failed: {e}"
            ))))
        })
}
