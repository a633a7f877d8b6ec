//! Wire types for the evaluation endpoint

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::EvaluationMode;

/// Body of `POST /api/evaluate`
///
/// The title is sent as typed; the service trims it again on its side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub title: String,
    #[serde(rename = "promptMode")]
    pub mode: EvaluationMode,
}

impl EvaluationRequest {
    pub fn new(title: impl Into<String>, mode: EvaluationMode) -> Self {
        Self {
            title: title.into(),
            mode,
        }
    }
}

/// Response envelope returned by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationEnvelope {
    pub success: bool,
    #[serde(default)]
    pub data: Option<EnvelopeData>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EnvelopeData {
    /// Left untyped; the formatter decides what shape it has
    #[serde(default)]
    pub evaluation: Option<Value>,
}

impl EvaluationEnvelope {
    pub fn success(evaluation: Value) -> Self {
        Self {
            success: true,
            data: Some(EnvelopeData {
                evaluation: Some(evaluation),
            }),
            message: None,
        }
    }

    pub fn rejected(message: Option<&str>) -> Self {
        Self {
            success: false,
            data: None,
            message: message.map(str::to_string),
        }
    }

    /// The evaluation object, if the envelope carried one
    pub fn evaluation(&self) -> Option<&Value> {
        self.data.as_ref().and_then(|data| data.evaluation.as_ref())
    }
}
