//! filedrop-api - HTTP layer for the filedrop upload service
//!
//! Serves a multipart upload endpoint on top of [`filedrop_core::DiskStore`].
//!
//! # Usage
//!
//! ```ignore
//! use filedrop_api::{create_router, AppState, UploadConfig};
//!
//! let state = AppState::new(UploadConfig::default());
//! let router = create_router(state);
//! axum::serve(listener, router).await?;
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod state;

pub use config::{ConfigError, UploadConfig};
pub use error::ApiError;
pub use state::AppState;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, Method};
use axum::routing::{get, post, MethodRouter};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// CORS policy for browser uploads: any origin, POST only, Content-Type header
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

fn upload_route() -> MethodRouter<AppState> {
    post(handlers::upload::upload_file).fallback(handlers::upload::method_not_allowed)
}

/// Create the upload router with the given application state.
///
/// Routes must already have passed [`UploadConfig::validate`]; a duplicate
/// route panics here.
pub fn create_router(state: AppState) -> Router {
    let config = state.config().clone();

    let mut router = Router::new()
        // Health check
        .route("/health", get(|| async { "OK" }));

    for route in config.routes() {
        router = router.route(route, upload_route());
    }

    // No cap unless one is configured; axum would otherwise apply 2 MB
    let body_limit = match config.max_body_bytes {
        Some(max) => DefaultBodyLimit::max(max),
        None => DefaultBodyLimit::disable(),
    };

    let router = router
        .layer(body_limit)
        .layer(TraceLayer::new_for_http());

    // The CORS layer answers every OPTIONS request itself with a bare 200.
    // Without it OPTIONS falls through to the 405 fallback.
    let router = if config.cors {
        router.layer(cors_layer())
    } else {
        router
    };

    router.with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use tower::ServiceExt;

    const BOUNDARY: &str = "filedrop-test-boundary";

    fn config(dir: &Path) -> UploadConfig {
        UploadConfig {
            dir: dir.to_path_buf(),
            ..Default::default()
        }
    }

    /// Single-part multipart body
    fn multipart_body(field: &str, file_name: &str, content: &[u8]) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn upload_request(uri: &str, body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn send(config: UploadConfig, request: Request<Body>) -> Response {
        create_router(AppState::new(config))
            .oneshot(request)
            .await
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn stored_files(dir: &Path) -> Vec<std::path::PathBuf> {
        match std::fs::read_dir(dir) {
            Ok(entries) => entries.map(|e| e.unwrap().path()).collect(),
            Err(_) => Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_upload_stores_file() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("uploads");

        let response = send(
            config(&dir),
            upload_request("/upload", multipart_body("file", "a.txt", b"0123456789")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "File successfully uploaded\n");

        let files = stored_files(&dir);
        assert_eq!(files.len(), 1);
        assert_eq!(std::fs::read(&files[0]).unwrap(), b"0123456789");
        // Client-side extension is not kept
        assert!(!files[0].to_string_lossy().ends_with(".txt"));
    }

    #[tokio::test]
    async fn test_missing_field_is_bad_request() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("uploads");

        let response = send(
            config(&dir),
            upload_request("/upload", multipart_body("other", "a.txt", b"data")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(response).await, "Error retrieving the file\n");
        assert!(stored_files(&dir).is_empty());
    }

    #[tokio::test]
    async fn test_non_multipart_body_is_bad_request() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("uploads");

        let request = Request::builder()
            .method(Method::POST)
            .uri("/upload")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{}"))
            .unwrap();
        let response = send(config(&dir), request).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(response).await, "Could not parse form\n");
        assert!(stored_files(&dir).is_empty());
    }

    #[tokio::test]
    async fn test_get_is_method_not_allowed() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("uploads");

        let request = Request::builder()
            .method(Method::GET)
            .uri("/upload")
            .body(Body::empty())
            .unwrap();
        let response = send(config(&dir), request).await;

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body_text(response).await, "Invalid request method\n");
        assert!(!dir.exists());
    }

    #[tokio::test]
    async fn test_options_preflight_with_cors() {
        let tmp = tempfile::tempdir().unwrap();

        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/upload")
            .header(header::ORIGIN, "http://localhost:3000")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();
        let response = send(config(tmp.path()), request).await;

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "POST");
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_HEADERS]
                .to_str()
                .unwrap()
                .to_ascii_lowercase(),
            "content-type"
        );
        assert!(body_text(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_options_without_cors_is_method_not_allowed() {
        let tmp = tempfile::tempdir().unwrap();
        let config = UploadConfig {
            cors: false,
            ..config(tmp.path())
        };

        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/upload")
            .body(Body::empty())
            .unwrap();
        let response = send(config, request).await;

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }

    #[tokio::test]
    async fn test_upload_response_carries_cors_origin() {
        let tmp = tempfile::tempdir().unwrap();

        let mut request = upload_request("/upload", multipart_body("file", "a.txt", b"x"));
        request
            .headers_mut()
            .insert(header::ORIGIN, "http://localhost:3000".parse().unwrap());
        let response = send(config(tmp.path()), request).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn test_image_field_deployment() {
        let tmp = tempfile::tempdir().unwrap();
        let config = UploadConfig {
            field: "image".to_string(),
            ..config(tmp.path())
        };

        let wrong = send(
            config.clone(),
            upload_request("/upload", multipart_body("file", "cat.png", b"png")),
        )
        .await;
        assert_eq!(wrong.status(), StatusCode::BAD_REQUEST);
        assert!(stored_files(tmp.path()).is_empty());

        let right = send(
            config,
            upload_request("/upload", multipart_body("image", "cat.png", b"png")),
        )
        .await;
        assert_eq!(right.status(), StatusCode::OK);
        assert_eq!(stored_files(tmp.path()).len(), 1);
    }

    #[tokio::test]
    async fn test_alias_routes_share_handler() {
        let tmp = tempfile::tempdir().unwrap();
        let config = UploadConfig {
            aliases: vec!["/uploadimage".into(), "/uploadsong".into()],
            ..config(tmp.path())
        };
        let router = create_router(AppState::new(config));

        for uri in ["/upload", "/uploadimage", "/uploadsong"] {
            let response = router
                .clone()
                .oneshot(upload_request(uri, multipart_body("file", "x.bin", b"abc")))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK, "route {uri}");
        }

        assert_eq!(stored_files(tmp.path()).len(), 3);
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let response = send(
            config(tmp.path()),
            upload_request("/uploadrsvp", multipart_body("file", "a.txt", b"x")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_directory_failure_is_internal_error() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let response = send(
            config(&blocker.join("uploads")),
            upload_request("/upload", multipart_body("file", "a.txt", b"data")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_text(response).await,
            "Unable to create upload directory\n"
        );
    }

    #[tokio::test]
    async fn test_oversized_body_leaves_no_file() {
        let tmp = tempfile::tempdir().unwrap();
        let config = UploadConfig {
            max_body_bytes: Some(1024),
            ..config(tmp.path())
        };

        let response = send(
            config,
            upload_request("/upload", multipart_body("file", "big.bin", &[7u8; 8192])),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(response).await, "Could not parse form\n");
        assert!(stored_files(tmp.path()).is_empty());
    }

    #[tokio::test]
    async fn test_large_upload_accepted_without_cap() {
        let tmp = tempfile::tempdir().unwrap();
        let content = vec![0x5Au8; (32 << 20) + 4096];

        let response = send(
            config(tmp.path()),
            upload_request("/upload", multipart_body("file", "big.bin", &content)),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let files = stored_files(tmp.path());
        assert_eq!(files.len(), 1);
        assert_eq!(
            std::fs::metadata(&files[0]).unwrap().len(),
            content.len() as u64
        );
    }

    #[tokio::test]
    async fn test_health() {
        let tmp = tempfile::tempdir().unwrap();
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = send(config(tmp.path()), request).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "OK");
    }
}
