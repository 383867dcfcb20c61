/**
 * Router Configuration
 *
 * Combines the API routes, the realtime socket, the uploads directory and
 * the fallback into one Axum router.
 *
 * # Fallback
 *
 * Unknown `/api` paths always answer a JSON 404. In production every other
 * unknown path is served from the frontend bundle, with `index.html` for
 * client-side routes; in development it is a JSON 404 too.
 */

use std::convert::Infallible;
use std::path::PathBuf;

use axum::extract::Request;
use axum::response::{IntoResponse, Response};
use axum::Router;
use tower::ServiceExt;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::backend::error::BackendError;
use crate::backend::media::UPLOADS_ROUTE;
use crate::backend::realtime::handle_socket_upgrade;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::state::AppState;
use crate::shared::AppConfig;

/// Create the Axum router with all routes configured
///
/// 1. **API Routes**: `/api/...`
/// 2. **Realtime**: `GET /socket`
/// 3. **Uploads**: `/uploads/...` from the uploads directory
/// 4. **Fallback**: frontend bundle or JSON 404
pub fn create_router(app_state: AppState, config: &AppConfig) -> Router<()> {
    let router = configure_api_routes(Router::new())
        .route("/socket", axum::routing::get(handle_socket_upgrade))
        .nest_service(UPLOADS_ROUTE, ServeDir::new(&config.uploads_dir));

    let router = if config.production {
        let frontend_dir = config.frontend_dir.clone();
        tracing::info!("Serving the frontend bundle from {}", frontend_dir.display());
        router.fallback(move |request: Request| serve_frontend(frontend_dir.clone(), request))
    } else {
        router.fallback(route_not_found)
    };

    router
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

async fn route_not_found() -> BackendError {
    BackendError::not_found("Route not found")
}

async fn serve_frontend(frontend_dir: PathBuf, request: Request) -> Response {
    if request.uri().path().starts_with("/api") {
        return route_not_found().await.into_response();
    }

    let index = ServeFile::new(frontend_dir.join("index.html"));
    let result: Result<_, Infallible> = ServeDir::new(&frontend_dir)
        .fallback(index)
        .oneshot(request)
        .await;
    match result {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}
