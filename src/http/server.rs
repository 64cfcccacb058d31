//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the chat endpoint and the static fallback
//! - Wire up middleware (tracing, request ID, CORS, body limit)
//! - Bind server to listener and shut down gracefully
//! - Map request extraction failures to the JSON error envelope

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::config::ProxyConfig;
use crate::http::request::{
    make_request_span, propagate_request_id_layer, set_request_id_layer, RequestIdExt,
};
use crate::http::response::error_envelope;
use crate::observability::metrics;
use crate::proxy::ProxyHandler;
use crate::upstream::{HttpUpstream, TargetError, UpstreamResponse};

/// Path of the proxy endpoint.
pub const CHAT_PATH: &str = "/api/chat";

/// Error building the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("invalid upstream target: {0}")]
    Target(#[from] TargetError),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("server IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub proxy: Arc<ProxyHandler>,
}

/// HTTP server for the chat proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a server that calls the real upstream over reqwest.
    pub fn new(config: ProxyConfig) -> Result<Self, ServerError> {
        let handler = ProxyHandler::with_http_client(&config.upstream, HttpUpstream::new()?)?;
        Ok(Self::with_handler(config, handler))
    }

    /// Create a server around an already-built proxy handler.
    pub fn with_handler(config: ProxyConfig, handler: ProxyHandler) -> Self {
        if !handler.has_credential() {
            tracing::warn!("GEMINI_API_KEY is not set; /api/chat will answer 500 until it is configured");
        }

        let state = AppState {
            proxy: Arc::new(handler),
        };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        let static_files = ServeDir::new(&config.static_files.root);

        let router = Router::new()
            .route(CHAT_PATH, post(chat_handler))
            .with_state(state)
            .fallback_service(static_files)
            .layer(DefaultBodyLimit::max(config.security.max_body_size));

        let router = if config.security.cors_enabled {
            router.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
        } else {
            router
        };

        router
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
            .layer(set_request_id_layer())
    }

    /// The fully layered router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until `shutdown` resolves, then drain in-flight requests.
    ///
    /// The drain waits for every pending upstream call to finish, however long it takes.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            static_root = %self.config.static_files.root,
            model = %self.config.upstream.model,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// `POST /api/chat`: forward the JSON body upstream and relay the answer.
async fn chat_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let start_time = Instant::now();
    let request_id = headers.request_id();

    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            let status = rejection.status();
            tracing::warn!(
                request_id = %request_id,
                status = %status,
                error = %rejection.body_text(),
                "Rejected chat request body"
            );
            metrics::record_chat_request(metrics::OUTCOME_REJECTED, status.as_u16(), start_time);
            return (status, Json(error_envelope(&rejection.body_text()))).into_response();
        }
    };

    tracing::debug!(request_id = %request_id, "Proxying chat request");

    match state.proxy.handle(&payload).await {
        Ok(UpstreamResponse { status, body }) => {
            metrics::record_chat_request(metrics::OUTCOME_RELAYED, status.as_u16(), start_time);
            (status, Json(body)).into_response()
        }
        Err(e) => {
            metrics::record_chat_request(e.kind(), StatusCode::INTERNAL_SERVER_ERROR.as_u16(), start_time);
            e.into_response()
        }
    }
}
