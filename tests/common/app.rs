//! Test application
//!
//! A router on `Store::memory()` with a temporary uploads directory and the
//! cheapest bcrypt cost. Requests go through `tower::ServiceExt::oneshot`, so
//! no socket is opened.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use ridehub::backend::routes::create_router;
use ridehub::backend::server::AppState;
use ridehub::backend::store::Store;
use ridehub::shared::AppConfig;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

/// Status and parsed JSON body of a response
pub type TestResponse = (StatusCode, Value);

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub config: AppConfig,
    _uploads: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(|builder| builder)
    }

    /// Build the app with extra configuration on top of the test defaults
    pub fn with_config(
        customize: impl FnOnce(ridehub::shared::AppConfigBuilder) -> ridehub::shared::AppConfigBuilder,
    ) -> Self {
        let uploads = tempfile::tempdir().expect("Failed to create uploads directory");
        let builder = AppConfig::builder()
            .jwt_secret("test-secret")
            .bcrypt_cost(4)
            .uploads_dir(uploads.path());
        let config = customize(builder).build().expect("Invalid test configuration");

        let state = AppState::new(&config, Store::memory());
        let router = create_router(state.clone(), &config);
        Self {
            router,
            state,
            config,
            _uploads: uploads,
        }
    }

    pub fn store(&self) -> &Store {
        &self.state.store
    }

    /// Send a request, with an optional bearer token and JSON body
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        self.send(request).await
    }

    /// Send a prepared request
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router service failed");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn post_empty(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::POST, uri, token, None).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.request(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::DELETE, uri, token, None).await
    }

    /// Send `multipart/form-data` with text fields and one file part
    pub async fn multipart(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        fields: &[(&str, &str)],
        file: TestFile<'_>,
    ) -> TestResponse {
        let boundary = "ridehub-test-boundary";
        let mut body = String::new();
        for (name, value) in fields {
            body.push_str(&format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            ));
        }
        body.push_str(&format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n{}\r\n--{boundary}--\r\n",
            file.field, file.file_name, file.content
        ));

        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", boundary),
            );
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = builder.body(Body::from(body)).expect("Failed to build request");
        self.send(request).await
    }

    /// Names of the files in the uploads directory
    pub fn uploaded_files(&self) -> Vec<String> {
        std::fs::read_dir(&self.config.uploads_dir)
            .map(|entries| {
                entries
                    .filter_map(|entry| entry.ok())
                    .map(|entry| entry.file_name().to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// File part of a multipart test request
#[derive(Debug, Clone, Copy)]
pub struct TestFile<'a> {
    pub field: &'a str,
    pub file_name: &'a str,
    pub content: &'a str,
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
