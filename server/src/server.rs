use crate::config::Config;
use crate::device::DeviceClient;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::net::SocketAddr;
use std::path::Path;
use tower_http::services::ServeDir;

#[derive(Clone)]
pub struct AppState {
    pub device: DeviceClient,
}

pub async fn run(config: Config) -> anyhow::Result<()> {
    let state = AppState {
        device: DeviceClient::new(&config.device_ip),
    };

    let app = router(state, &config.static_dir);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the application router: the device proxy route, with every other
/// path handled by the static file service rooted at `static_dir`.
pub fn router(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .route("/esp32/depth", get(handle_depth))
        .fallback_service(ServeDir::new(static_dir))
        .with_state(state)
}

/// Proxy a depth reading from the device.
///
/// The device's JSON body is relayed unchanged on success. Any failure
/// (refused connection, timeout, non-2xx status, unparseable body) becomes
/// a 500 with an `{"error": ...}` payload.
#[axum::debug_handler]
async fn handle_depth(State(state): State<AppState>) -> Response {
    match state.device.fetch_depth().await {
        Ok(value) => Json(value).into_response(),
        Err(e) => {
            tracing::warn!("Device request failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}
