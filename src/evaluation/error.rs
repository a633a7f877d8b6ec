//! Typed errors for evaluation payload parsing

use thiserror::Error;

/// Raised when an evaluation payload cannot be turned into a
/// [`FormattedEvaluation`](super::FormattedEvaluation)
///
/// The controller maps every variant to the same user-facing message; the
/// variants exist so the operator log can say what was actually wrong.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The envelope reported success but carried no `data.evaluation`
    #[error("response contained no evaluation object")]
    MissingEvaluation,

    /// The evaluation was JSON but not an object (null, array, string, ...)
    #[error("evaluation must be a JSON object, found {found}")]
    NotAnObject { found: &'static str },

    /// The object had neither a `ratings` map nor any flat evaluation field
    #[error("evaluation object matches no known shape (keys: {keys:?})")]
    UnrecognizedShape { keys: Vec<String> },

    /// A known shape was detected but one of its fields had the wrong type
    #[error("invalid {shape} evaluation: {source}")]
    InvalidField {
        shape: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl FormatError {
    pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
        match value {
            serde_json::Value::Null => "null",
            serde_json::Value::Bool(_) => "boolean",
            serde_json::Value::Number(_) => "number",
            serde_json::Value::String(_) => "string",
            serde_json::Value::Array(_) => "array",
            serde_json::Value::Object(_) => "object",
        }
    }
}
