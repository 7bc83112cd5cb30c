//! HTTP server entry point and Axum router setup.
//!
//! Initializes the server state (agent registry), configures routes, and
//! starts the Axum server.

mod dto;
mod error;
mod handlers;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use parrot_core::{Agent, AgentRegistry, DEFAULT_AGENT};

/// Shared server state accessible from all handlers.
///
/// Agents are stateless, so a single instance is shared across all
/// requests without locking.
pub struct ServerState {
    pub registry: AgentRegistry,
    pub default_agent: Arc<dyn Agent>,
}

impl ServerState {
    /// Builds the state with the built-in agents registered.
    fn with_defaults() -> Self {
        let registry = AgentRegistry::with_defaults();
        let default_agent = registry
            .get(DEFAULT_AGENT)
            .expect("default agent must be registered");
        Self {
            registry,
            default_agent,
        }
    }
}

/// Builds the application router.
pub fn router(state: Arc<ServerState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request<Body>| {
            tracing::info_span!(
                "request",
                method = %req.method(),
                uri = %req.uri(),
                version = ?req.version(),
            )
        })
        .on_response(|res: &Response<Body>, latency: Duration, _span: &tracing::Span| {
            info!(
                latency = %format!("{} ms", latency.as_millis()),
                status = %res.status().as_u16(),
                "finished processing request"
            );
        });

    let logged_routes = Router::new()
        .route("/infer", post(handlers::infer::infer))
        .route("/agent/run", post(handlers::agent::run))
        .route("/agents", get(handlers::agent::list))
        .layer(trace_layer);

    Router::new()
        .merge(logged_routes)
        .route("/health", get(handlers::health))
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".parse().unwrap()),
        )
        .compact()
        .init();

    let state = Arc::new(ServerState::with_defaults());
    info!("Registered {} agents", state.registry.list().len());
    for name in state.registry.list() {
        info!("  - {}", name);
    }

    let app = router(state);

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8003".into());
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn test_app() -> Router {
        router(Arc::new(ServerState::with_defaults()))
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let res = test_app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_json(res).await, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn infer_echoes_prompt() {
        let res = test_app()
            .oneshot(post_json("/infer", r#"{"prompt":"hello"}"#))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            body_json(res).await,
            json!({
                "agent": "py-example",
                "input": "hello",
                "output": "ECHO_PY: hello",
                "len": 5,
            })
        );
    }

    #[tokio::test]
    async fn infer_without_prompt_is_validation_error() {
        let res = test_app()
            .oneshot(post_json("/infer", "{}"))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(res).await;
        assert!(body.get("error").is_some());
    }

    #[tokio::test]
    async fn infer_with_malformed_json_is_validation_error() {
        let res = test_app()
            .oneshot(post_json("/infer", "{not json"))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn agent_run_defaults_to_empty_prompt() {
        let res = test_app()
            .oneshot(post_json("/agent/run", "{}"))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            body_json(res).await,
            json!({
                "agent": "py-example",
                "result": {
                    "agent": "py-example",
                    "input": "",
                    "output": "ECHO_PY: ",
                    "len": 0,
                },
            })
        );
    }

    #[tokio::test]
    async fn agent_run_selects_agent_by_name() {
        let res = test_app()
            .oneshot(post_json(
                "/agent/run",
                r#"{"agent":"py-example","prompt":"hi"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        let body = body_json(res).await;
        assert_eq!(body["result"]["output"], "ECHO_PY: hi");
    }

    #[tokio::test]
    async fn agent_run_unknown_agent_is_not_found() {
        let res = test_app()
            .oneshot(post_json("/agent/run", r#"{"agent":"nope"}"#))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(res).await, json!({ "error": "Unknown agent: nope" }));
    }

    #[tokio::test]
    async fn agents_lists_registered_names() {
        let res = test_app()
            .oneshot(Request::builder().uri("/agents").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_json(res).await, json!(["py-example"]));
    }
}
