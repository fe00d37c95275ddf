//! AgentAPI client.

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

use crate::config::TimeoutConfig;

/// Status and body returned by an AgentAPI endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentResponse {
    pub status: u16,
    pub body: String,
}

impl AgentResponse {
    /// 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The request never produced an HTTP response.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    #[error("request to {url} failed: {detail}")]
    Connection { url: String, detail: String },
}

/// Delivery collaborator used by the dispatcher and the status endpoint.
#[async_trait]
pub trait AgentClient: Send + Sync {
    /// Send `content` as a user message to the agent at `endpoint`.
    async fn send_message(&self, endpoint: &str, content: &str) -> Result<AgentResponse, TransportError>;

    /// Query the agent's status endpoint.
    async fn status(&self, endpoint: &str) -> Result<AgentResponse, TransportError>;
}

#[derive(Serialize)]
struct MessageBody<'a> {
    content: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
}

/// [`AgentClient`] over HTTP using reqwest.
#[derive(Debug, Clone)]
pub struct HttpAgentClient {
    client: reqwest::Client,
    delivery_timeout: Duration,
    status_timeout: Duration,
}

impl HttpAgentClient {
    pub fn new(delivery_timeout: Duration, status_timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            delivery_timeout,
            status_timeout,
        }
    }

    pub fn from_config(timeouts: &TimeoutConfig) -> Self {
        Self::new(
            Duration::from_secs(timeouts.delivery_secs),
            Duration::from_secs(timeouts.status_secs),
        )
    }

    async fn finish(
        url: String,
        timeout: Duration,
        request: reqwest::RequestBuilder,
    ) -> Result<AgentResponse, TransportError> {
        let map_err = |e: reqwest::Error| {
            if e.is_timeout() {
                TransportError::Timeout {
                    url: url.clone(),
                    timeout,
                }
            } else {
                TransportError::Connection {
                    url: url.clone(),
                    detail: e.to_string(),
                }
            }
        };

        let response = request.timeout(timeout).send().await.map_err(map_err)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(map_err)?;
        Ok(AgentResponse { status, body })
    }
}

#[async_trait]
impl AgentClient for HttpAgentClient {
    async fn send_message(&self, endpoint: &str, content: &str) -> Result<AgentResponse, TransportError> {
        let url = join_url(endpoint, "message");
        tracing::debug!(url = %url, bytes = content.len(), "Sending message to agent");

        let request = self.client.post(&url).json(&MessageBody {
            content,
            kind: "user",
        });
        Self::finish(url, self.delivery_timeout, request).await
    }

    async fn status(&self, endpoint: &str) -> Result<AgentResponse, TransportError> {
        let url = join_url(endpoint, "status");
        let request = self.client.get(&url);
        Self::finish(url, self.status_timeout, request).await
    }
}

fn join_url(endpoint: &str, path: &str) -> String {
    format!("{}/{}", endpoint.trim_end_matches('/'), path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("http://agent:3284", "message"), "http://agent:3284/message");
        assert_eq!(join_url("http://agent:3284/", "status"), "http://agent:3284/status");
    }

    #[test]
    fn test_message_body_shape() {
        let body = serde_json::to_value(MessageBody {
            content: "hello",
            kind: "user",
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"content": "hello", "type": "user"}));
    }

    #[test]
    fn test_success_range() {
        let ok = |status| AgentResponse { status, body: String::new() };
        assert!(ok(200).is_success());
        assert!(ok(204).is_success());
        assert!(!ok(302).is_success());
        assert!(!ok(500).is_success());
    }

    #[tokio::test]
    async fn test_refused_connection_is_transport_error() {
        // Bind then drop to get a port with nothing listening.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = HttpAgentClient::new(Duration::from_secs(2), Duration::from_secs(2));
        let err = client
            .send_message(&format!("http://{}", addr), "hi")
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Connection { .. }));
    }
}
