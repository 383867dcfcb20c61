//! Fallback and static file routing

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::*;

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let app = TestApp::new();

    let api = app.get("/api/nothing/here", None).await;
    assert_status!(api, StatusCode::NOT_FOUND);
    assert_eq!(api.1, json!({ "message": "Route not found", "status": 404 }));

    let page = app.get("/rides/42", None).await;
    assert_status!(page, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_production_serves_frontend_bundle() {
    let frontend = tempfile::tempdir().unwrap();
    std::fs::write(frontend.path().join("index.html"), "<h1>RideHub</h1>").unwrap();
    std::fs::write(frontend.path().join("app.js"), "console.log('ride')").unwrap();

    let app = TestApp::with_config(|builder| {
        builder
            .production(true)
            .frontend_dir(frontend.path())
    });

    let asset = app.get("/app.js", None).await;
    assert_status!(asset, StatusCode::OK);
    assert_eq!(asset.1, json!("console.log('ride')"));

    let client_route = app.get("/rides/42", None).await;
    assert_status!(client_route, StatusCode::OK);
    assert_eq!(client_route.1, json!("<h1>RideHub</h1>"));

    let api = app.get("/api/nothing/here", None).await;
    assert_status!(api, StatusCode::NOT_FOUND);
    assert_message!(api, "Route not found");

    let real_api = app.get("/api/events", None).await;
    assert_status!(real_api, StatusCode::OK);
}
