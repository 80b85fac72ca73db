//! `EmojiServer`: Axum HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::routing::get;
use emoji_embeddings::EmbeddingIndex;
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::ServerConfig;
use crate::handlers;
use crate::metrics::INDEX_ENTRIES;
use crate::shutdown::{DrainOutcome, ShutdownCoordinator};

/// Shared state accessible from Axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// Catalog, embedding table and query encoder.
    pub index: Arc<EmbeddingIndex>,
    /// Prometheus handle for `/metrics`.
    pub metrics: PrometheusHandle,
    /// `top_k` when a request omits it.
    pub default_top_k: usize,
    /// When the server started.
    pub start_time: Instant,
}

/// The emoji search server.
pub struct EmojiServer {
    config: ServerConfig,
    index: Arc<EmbeddingIndex>,
    metrics: PrometheusHandle,
    shutdown: ShutdownCoordinator,
    start_time: Instant,
}

impl EmojiServer {
    /// Create a new server over a built index.
    pub fn new(config: ServerConfig, index: Arc<EmbeddingIndex>, metrics: PrometheusHandle) -> Self {
        metrics::gauge!(INDEX_ENTRIES).set(index.len() as f64);
        Self {
            config,
            index,
            metrics,
            shutdown: ShutdownCoordinator::new(),
            start_time: Instant::now(),
        }
    }

    /// Build the Axum router with all routes.
    ///
    /// Any path not matched by an API route is served from the static
    /// directory.
    pub fn router(&self) -> Router {
        let state = AppState {
            index: Arc::clone(&self.index),
            metrics: self.metrics.clone(),
            default_top_k: self.config.default_top_k,
            start_time: self.start_time,
        };

        let cors = if self.config.cors_permissive {
            CorsLayer::permissive()
        } else {
            CorsLayer::new()
        };

        Router::new()
            .route("/api/emoji/groups", get(handlers::groups))
            .route("/api/emoji/all", get(handlers::all))
            .route("/api/emoji/group/{name}", get(handlers::group))
            .route("/api/emoji/search", get(handlers::search))
            .route("/api/health", get(handlers::health))
            .route("/metrics", get(handlers::metrics_text))
            .fallback_service(ServeDir::new(&self.config.static_dir))
            .layer(TraceLayer::new_for_http())
            .layer(cors)
            .with_state(state)
    }

    /// Bind the listener and serve until the shutdown token is cancelled.
    ///
    /// Returns the bound address and the serving task.
    pub async fn listen(&self) -> std::io::Result<(SocketAddr, JoinHandle<()>)> {
        let listener = tokio::net::TcpListener::bind(self.config.bind_addr()).await?;
        let addr = listener.local_addr()?;
        let router = self.router();
        let signal = self.shutdown.serve_signal();

        info!(%addr, static_dir = %self.config.static_dir.display(), "emoji search server listening");

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router)
                .with_graceful_shutdown(signal)
                .await
            {
                error!(error = %e, "server error");
            }
        });

        Ok((addr, handle))
    }

    /// Stop the listener started by [`EmojiServer::listen`], waiting up to
    /// the configured shutdown timeout for in-flight requests.
    pub async fn stop(&self, listener: JoinHandle<()>) -> DrainOutcome {
        self.shutdown
            .drain(listener, self.config.shutdown_timeout())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use emoji_core::{Catalog, RawEmoji};
    use emoji_embeddings::MockEmbeddingService;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use tower::ServiceExt;

    async fn make_server(static_dir: &std::path::Path) -> EmojiServer {
        let catalog = Catalog::load(vec![
            RawEmoji::new("\u{1f600}", "grinning face"),
            RawEmoji::new("\u{1f602}", "face with tears of joy"),
            RawEmoji::new("\u{1f44d}", "thumbs up"),
            RawEmoji::new("\u{1f44d}\u{1f3fc}", "thumbs up: medium-light skin tone"),
            RawEmoji::new("\u{1f44b}", "waving hand"),
            RawEmoji::new("\u{1f34e}", "red apple"),
        ]);
        let index = EmbeddingIndex::build(catalog, Arc::new(MockEmbeddingService::new(32)), 64)
            .await
            .unwrap();
        let metrics = PrometheusBuilder::new().build_recorder().handle();
        let config = ServerConfig {
            static_dir: static_dir.to_path_buf(),
            ..ServerConfig::default()
        };
        EmojiServer::new(config, Arc::new(index), metrics)
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), 1_000_000)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let (status, body) = get(app, uri).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn groups_sorted_and_present_only() {
        let dir = tempfile::tempdir().unwrap();
        let app = make_server(dir.path()).await.router();
        let (status, body) = get_json(app, "/api/emoji/groups").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            serde_json::json!(["Faces & Emotions", "Other", "People & Body"])
        );
    }

    #[tokio::test]
    async fn all_lists_every_entry_without_skin_tones() {
        let dir = tempfile::tempdir().unwrap();
        let app = make_server(dir.path()).await.router();
        let (status, body) = get_json(app, "/api/emoji/all").await;
        assert_eq!(status, StatusCode::OK);
        let items = body.as_array().unwrap();
        assert_eq!(items.len(), 5);
        assert_eq!(items[0]["symbol"], "\u{1f600}");
        assert_eq!(items[0]["name"], "Grinning Face");
        assert_eq!(items[0]["category"], "Faces & Emotions");
        assert!(items[0].get("keywords").is_none());
    }

    #[tokio::test]
    async fn group_filters_by_label() {
        let dir = tempfile::tempdir().unwrap();
        let app = make_server(dir.path()).await.router();
        let (status, body) = get_json(app, "/api/emoji/group/Faces%20%26%20Emotions").await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Grinning Face", "Face With Tears Of Joy"]);
    }

    #[tokio::test]
    async fn empty_group_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let app = make_server(dir.path()).await.router();
        let (status, body) = get_json(app, "/api/emoji/group/Flags").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Group 'Flags' not found");
    }

    #[tokio::test]
    async fn unknown_group_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let app = make_server(dir.path()).await.router();
        let (status, body) = get_json(app, "/api/emoji/group/Vehicles").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Group 'Vehicles' not found");
    }

    #[tokio::test]
    async fn search_returns_ranked_results() {
        let dir = tempfile::tempdir().unwrap();
        let app = make_server(dir.path()).await.router();
        let (status, body) = get_json(app, "/api/emoji/search?query=happy&top_k=3").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["query"], "happy");
        let results = body["results"].as_array().unwrap();
        assert_eq!(results.len(), 3);
        let scores: Vec<f64> = results.iter().map(|r| r["score"].as_f64().unwrap()).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
        for key in ["symbol", "name", "category", "score"] {
            assert!(results[0].get(key).is_some(), "missing {key}");
        }
    }

    #[tokio::test]
    async fn search_default_top_k_returns_all_small_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let app = make_server(dir.path()).await.router();
        let (status, body) = get_json(app, "/api/emoji/search?query=smile").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["results"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn search_empty_query_is_400() {
        let dir = tempfile::tempdir().unwrap();
        let server = make_server(dir.path()).await;
        for uri in [
            "/api/emoji/search?query=",
            "/api/emoji/search",
            "/api/emoji/search?query=%20%20",
        ] {
            let (status, body) = get_json(server.router(), uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(body["detail"], "Query parameter is required");
        }
    }

    #[tokio::test]
    async fn search_echoes_padded_query_untrimmed() {
        let dir = tempfile::tempdir().unwrap();
        let app = make_server(dir.path()).await.router();
        let (status, body) = get_json(app, "/api/emoji/search?query=%20cat%20&top_k=1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["query"], " cat ");
        assert_eq!(body["results"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn search_bad_top_k_is_400() {
        let dir = tempfile::tempdir().unwrap();
        let server = make_server(dir.path()).await;
        for top_k in ["0", "-2", "many"] {
            let uri = format!("/api/emoji/search?query=cat&top_k={top_k}");
            let (status, body) = get_json(server.router(), &uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(body["detail"], "top_k must be a positive integer");
        }
    }

    #[tokio::test]
    async fn health_reports_index() {
        let dir = tempfile::tempdir().unwrap();
        let app = make_server(dir.path()).await.router();
        let (status, body) = get_json(app, "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["entries"], 5);
        assert_eq!(body["model"], "mock-sha256");
        assert!(body["uptime_secs"].is_number());
    }

    #[tokio::test]
    async fn metrics_endpoint_is_text() {
        let dir = tempfile::tempdir().unwrap();
        let app = make_server(dir.path()).await.router();
        let (status, _) = get(app, "/metrics").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn static_index_served_at_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>emoji</h1>").unwrap();
        let app = make_server(dir.path()).await.router();
        let (status, body) = get(app, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"<h1>emoji</h1>");
    }

    #[tokio::test]
    async fn missing_static_file_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let app = make_server(dir.path()).await.router();
        let (status, _) = get(app, "/nonexistent.js").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn cors_allows_any_origin() {
        let dir = tempfile::tempdir().unwrap();
        let app = make_server(dir.path()).await.router();
        let req = Request::builder()
            .uri("/api/emoji/groups")
            .header("origin", "http://example.test")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(
            resp.headers()
                .get("access-control-allow-origin")
                .and_then(|v| v.to_str().ok()),
            Some("*")
        );
    }

    #[tokio::test]
    async fn stop_drains_listener() {
        let dir = tempfile::tempdir().unwrap();
        let mut server = make_server(dir.path()).await;
        server.config.host = "127.0.0.1".into();
        server.config.port = 0;
        server.config.shutdown_timeout_secs = 5;
        let (addr, handle) = server.listen().await.unwrap();
        assert_ne!(addr.port(), 0);
        assert_eq!(server.stop(handle).await, DrainOutcome::Drained);
        assert!(server.shutdown.is_shutting_down());
        assert!(tokio::net::TcpStream::connect(addr).await.is_err());
    }
}
