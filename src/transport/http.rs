//! HTTP transport for the remote evaluation service

use std::time::Duration;

use async_trait::async_trait;

use super::{EvaluationEnvelope, EvaluationRequest, EvaluationTransport, TransportError};
use crate::config::ServiceConfig;

const EVALUATE_PATH: &str = "/api/evaluate";

/// Talks to `POST {base_url}/api/evaluate` over reqwest
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            timeout: Duration::from_secs(ServiceConfig::default().timeout_secs),
        }
    }

    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(config.base_url.clone()).with_timeout(Duration::from_secs(config.timeout_secs))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full endpoint URL; the base URL is otherwise used as given
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), EVALUATE_PATH)
    }
}

#[async_trait]
impl EvaluationTransport for HttpTransport {
    fn name(&self) -> &str {
        "http"
    }

    async fn evaluate(
        &self,
        request: &EvaluationRequest,
    ) -> Result<EvaluationEnvelope, TransportError> {
        let url = self.endpoint();
        tracing::debug!(%url, mode = %request.mode, "sending evaluation request");

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .timeout(self.timeout)
            .json(request)
            .send()
            .await
            .map_err(TransportError::from_network_error)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(TransportError::from_network_error)?;

        if !status.is_success() {
            tracing::warn!(%status, body = %body, "evaluation service returned an error status");
            return Err(TransportError::from_http_status(status, body));
        }

        serde_json::from_str::<EvaluationEnvelope>(&body).map_err(|e| {
            tracing::warn!(error = %e, body = %body, "failed to parse evaluation envelope");
            TransportError::MalformedEnvelope(e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_base_url() {
        let transport = HttpTransport::new("http://localhost:3001");
        assert_eq!(transport.endpoint(), "http://localhost:3001/api/evaluate");

        let transport = HttpTransport::new("https://critic.example.com/");
        assert_eq!(
            transport.endpoint(),
            "https://critic.example.com/api/evaluate"
        );
    }

    #[test]
    fn test_from_config_uses_timeout() {
        let config = ServiceConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 3,
        };
        let transport = HttpTransport::from_config(&config);
        assert_eq!(transport.timeout, Duration::from_secs(3));
        assert_eq!(transport.base_url(), "http://127.0.0.1:9");
    }

    #[tokio::test]
    async fn test_unreachable_service_is_network_error() {
        // Port 9 (discard) is closed on CI machines
        let transport = HttpTransport::new("http://127.0.0.1:9")
            .with_timeout(Duration::from_secs(2));
        let request = EvaluationRequest::new("title", crate::core::EvaluationMode::Cool);

        let err = transport.evaluate(&request).await.unwrap_err();
        assert!(
            matches!(err, TransportError::Network(_) | TransportError::Timeout(_)),
            "unexpected error: {err:?}"
        );
    }
}
