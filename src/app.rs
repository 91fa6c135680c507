use std::{net::SocketAddr, time::Duration};

use axum::{
    http::{Request, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{field, Span};
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::state::AppState;
use crate::{chat, planning, recipes, shopping};

const DEFAULT_LOG_FILTER: &str = "mealmind_relay=debug,axum=info,tower_http=info";

/// Installs the global subscriber. `RUST_LOG` overrides the default filter and
/// `LOG_FORMAT=json` switches to one JSON object per line.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => builder.with_target(false).json().init(),
        _ => builder.init(),
    }
}

pub fn build_app(state: AppState) -> Router {
    let api = Router::new()
        .merge(chat::router())
        .merge(recipes::router())
        .merge(planning::router())
        .merge(shopping::router());

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &Request<_>| {
                    tracing::info_span!(
                        "request",
                        method = %req.method(),
                        path = req.uri().path(),
                        status = field::Empty,
                    )
                })
                .on_response(|res: &Response<_>, latency: Duration, span: &Span| {
                    let status = res.status().as_u16();
                    let elapsed_ms = latency.as_millis() as u64;
                    span.record("status", status);
                    if status >= 500 {
                        tracing::error!(status, elapsed_ms, "request failed");
                    } else {
                        tracing::info!(status, elapsed_ms, "request done");
                    }
                }),
        )
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "message": "Backend is running" }))
}

pub async fn serve(app: Router, config: &AppConfig) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    tracing::info!("listening on {}", addr);
    tracing::info!(webhook = %config.webhook.url, "chat messages go to n8n");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use serde_json::json;

    use crate::error::UpstreamError;
    use crate::testing::{call, store_app, FakeStore};

    #[tokio::test]
    async fn health_is_ok() {
        let (status, body) = call(store_app(Arc::new(FakeStore::default())), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok", "message": "Backend is running" }));
    }

    #[tokio::test]
    async fn health_ignores_broken_upstreams() {
        let store = Arc::new(FakeStore::failing(UpstreamError::Unreachable("down".into())));
        let (status, body) = call(store_app(store.clone()), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert!(store.calls().is_empty());
    }
}
