use tidewatch_core::DrainResponse;

use crate::config::FeedConfig;
use crate::error::FeedError;

/// Something that can hand out the next batch of undelivered events.
/// Implemented by [`HttpDrainSource`] and by scripted sources in tests.
#[async_trait::async_trait]
pub trait DrainSource: Send + Sync {
    async fn drain(&self, limit: usize) -> Result<DrainResponse, FeedError>;
}

/// Drains events from the backend's HTTP endpoint.
///
/// No request timeout is set: a hung request only delays its own cycle,
/// later ticks issue independent requests.
pub struct HttpDrainSource {
    client: reqwest::Client,
    url: String,
}

impl HttpDrainSource {
    pub fn new(base_url: &str, drain_path: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: join_url(base_url, drain_path),
        }
    }

    pub fn from_config(config: &FeedConfig) -> Self {
        Self::new(&config.base_url, &config.drain_path)
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait::async_trait]
impl DrainSource for HttpDrainSource {
    async fn drain(&self, limit: usize) -> Result<DrainResponse, FeedError> {
        let resp = self
            .client
            .get(&self.url)
            .query(&[("limit", limit)])
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FeedError::Status(status.as_u16()));
        }
        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if path.is_empty() {
        return base.to_string();
    }
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use axum::extract::Query;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};

    async fn spawn_backend(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[test]
    fn join_url_normalizes_slashes() {
        assert_eq!(
            join_url("http://localhost:8000/", "/debug/drain_events"),
            "http://localhost:8000/debug/drain_events"
        );
        assert_eq!(
            join_url("http://localhost:8000", "api/debug/drain_events"),
            "http://localhost:8000/api/debug/drain_events"
        );
    }

    #[tokio::test]
    async fn drains_events_and_sends_limit() {
        let app = Router::new().route(
            "/debug/drain_events",
            get(|Query(q): Query<HashMap<String, String>>| async move {
                let limit = q.get("limit").cloned().unwrap_or_default();
                Json(serde_json::json!({
                    "drained": 2,
                    "events": [
                        {"type": "tank_ready", "payload": {"tank_id": "T-1"}, "timestamp": "1700000000.0"},
                        {"type": "limit_echo", "payload": {"limit": limit}},
                    ],
                }))
            }),
        );
        let base = spawn_backend(app).await;
        let source = HttpDrainSource::new(&base, "/debug/drain_events");

        let resp = source.drain(50).await.unwrap();
        assert_eq!(resp.drained, 2);
        assert_eq!(resp.events.len(), 2);
        assert_eq!(resp.events[0].kind.as_str(), "tank_ready");
        assert_eq!(resp.events[1].payload.str("limit"), Some("50"));
    }

    #[tokio::test]
    async fn server_error_is_status_error() {
        let app = Router::new().route(
            "/debug/drain_events",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );
        let base = spawn_backend(app).await;
        let source = HttpDrainSource::new(&base, "/debug/drain_events");

        let err = source.drain(50).await.unwrap_err();
        assert!(matches!(err, FeedError::Status(500)), "{err}");
    }

    #[tokio::test]
    async fn invalid_json_is_decode_error() {
        let app = Router::new().route("/debug/drain_events", get(|| async { "not json" }));
        let base = spawn_backend(app).await;
        let source = HttpDrainSource::new(&base, "/debug/drain_events");

        let err = source.drain(50).await.unwrap_err();
        assert!(matches!(err, FeedError::Decode(_)), "{err}");
    }

    #[tokio::test]
    async fn unreachable_backend_is_transport_error() {
        // Bind then drop to get a port with nothing listening.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let source = HttpDrainSource::new(&format!("http://{addr}"), "/debug/drain_events");

        let err = source.drain(50).await.unwrap_err();
        assert!(matches!(err, FeedError::Transport(_)), "{err}");
    }
}
