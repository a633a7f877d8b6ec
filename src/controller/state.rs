//! Submission lifecycle state
//!
//! Replaced wholesale on every transition; consumers only ever see
//! snapshots.

use serde::Serialize;

use crate::evaluation::{format_evaluation, FormatError, FormattedEvaluation};
use crate::transport::{EvaluationEnvelope, TransportError};

/// Shown when the service rejects a title without saying why
pub const SERVICE_REJECTED_MESSAGE: &str = "評価に失敗しました。";

/// Shown for any transport failure without a structured service message
pub const TRANSPORT_ERROR_MESSAGE: &str = "エラーが発生しました。";

/// Shown when an evaluation arrives in a shape the client cannot render
pub const FORMAT_ERROR_MESSAGE: &str = "評価結果の形式が不正です。";

/// Which failure path produced a [`FailureReport`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The service answered `success: false`
    ServiceRejected,
    /// Connection, timeout, non-2xx or malformed envelope
    Transport,
    /// The evaluation object could not be formatted
    Formatting,
}

/// User-facing description of a failed submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureReport {
    pub kind: FailureKind,
    pub message: String,
}

impl FailureReport {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Lifecycle of the current submission
///
/// `Pending` never carries a result or an error from an earlier cycle.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Pending,
    Succeeded(FormattedEvaluation),
    Failed(FailureReport),
}

impl SubmissionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn evaluation(&self) -> Option<&FormattedEvaluation> {
        match self {
            Self::Succeeded(evaluation) => Some(evaluation),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&FailureReport> {
        match self {
            Self::Failed(report) => Some(report),
            _ => None,
        }
    }

    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Pending => "pending",
            Self::Succeeded(_) => "succeeded",
            Self::Failed(_) => "failed",
        }
    }

    /// Map a transport outcome to the state it leads to
    ///
    /// Diagnostics are logged here; only the user-facing message ends up in
    /// the returned state.
    pub fn from_outcome(outcome: Result<EvaluationEnvelope, TransportError>) -> Self {
        match outcome {
            Ok(envelope) if envelope.success => {
                let formatted = envelope
                    .evaluation()
                    .ok_or(FormatError::MissingEvaluation)
                    .and_then(format_evaluation);
                match formatted {
                    Ok(evaluation) => Self::Succeeded(evaluation),
                    Err(e) => {
                        tracing::warn!(error = %e, "evaluation payload could not be formatted");
                        Self::Failed(FailureReport::new(
                            FailureKind::Formatting,
                            FORMAT_ERROR_MESSAGE,
                        ))
                    }
                }
            }
            Ok(envelope) => {
                let message = envelope
                    .message
                    .filter(|message| !message.trim().is_empty())
                    .unwrap_or_else(|| SERVICE_REJECTED_MESSAGE.to_string());
                tracing::info!(%message, "evaluation rejected by service");
                Self::Failed(FailureReport::new(FailureKind::ServiceRejected, message))
            }
            Err(e) => {
                tracing::warn!(error = %e, retryable = e.is_retryable(), "evaluation transport failed");
                let message = e.service_message().unwrap_or(TRANSPORT_ERROR_MESSAGE);
                Self::Failed(FailureReport::new(FailureKind::Transport, message))
            }
        }
    }
}
