//! Transport layer between the controller and the evaluation service

mod error;
pub mod http;
mod types;

pub use error::TransportError;
pub use http::HttpTransport;
pub use types::{EnvelopeData, EvaluationEnvelope, EvaluationRequest};

use async_trait::async_trait;

/// Trait for anything that can carry an evaluation request to the service
///
/// The controller only sees this trait, so tests and alternative frontends
/// can swap in their own implementation.
#[async_trait]
pub trait EvaluationTransport: Send + Sync {
    /// Get the transport name (for logs)
    fn name(&self) -> &str;

    /// Send one request and return the decoded response envelope
    ///
    /// A 2xx answer with `success: false` is still `Ok`; only failures to
    /// obtain a well-formed envelope are errors.
    async fn evaluate(
        &self,
        request: &EvaluationRequest,
    ) -> Result<EvaluationEnvelope, TransportError>;
}
