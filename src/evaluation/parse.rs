//! Structural parsing of raw evaluation objects
//!
//! The service has shipped two response shapes over time and sends no
//! version flag. [`Evaluation::parse`] decides which one it is looking at
//! once, up front, so the formatter only ever sees a typed variant.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::FormatError;

/// Keys whose presence marks the flat (older) response shape
const FLAT_KEYS: [&str; 4] = ["genre", "target_audience", "appeal_points", "rating"];

/// Key whose presence marks the categorized (newer) response shape
const RATINGS_KEY: &str = "ratings";

/// A single scored category in the categorized shape
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CategoryScore {
    pub score: Option<f64>,
    pub comment: Option<String>,
}

/// Per-category scores; any category may be missing
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CategoryRatings {
    pub impact: Option<CategoryScore>,
    pub imagination: Option<CategoryScore>,
    pub eroticism: Option<CategoryScore>,
    pub originality: Option<CategoryScore>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorizedEvaluation {
    pub ratings: CategoryRatings,
    pub overall_comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FlatEvaluation {
    pub genre: Option<String>,
    pub target_audience: Option<String>,
    pub appeal_points: Option<Vec<String>>,
    pub rating: Option<f64>,
}

/// An evaluation payload after shape detection
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    Categorized(CategorizedEvaluation),
    Flat(FlatEvaluation),
}

impl Evaluation {
    /// Detect the payload shape and parse it into the matching variant
    ///
    /// A `ratings` sub-object selects the categorized shape; otherwise at
    /// least one flat field must be present. A `ratings` key holding anything
    /// but an object does not count. Anything else is rejected rather than
    /// rendered as an empty critique.
    pub fn parse(value: &Value) -> Result<Self, FormatError> {
        let object = value.as_object().ok_or(FormatError::NotAnObject {
            found: FormatError::json_kind(value),
        })?;

        if object.get(RATINGS_KEY).is_some_and(Value::is_object) {
            let parsed = CategorizedEvaluation::deserialize(value).map_err(|source| {
                FormatError::InvalidField {
                    shape: "categorized",
                    source,
                }
            })?;
            return Ok(Self::Categorized(parsed));
        }

        if FLAT_KEYS.iter().any(|key| object.contains_key(*key)) {
            let parsed =
                FlatEvaluation::deserialize(value).map_err(|source| FormatError::InvalidField {
                    shape: "flat",
                    source,
                })?;
            return Ok(Self::Flat(parsed));
        }

        Err(FormatError::UnrecognizedShape {
            keys: object.keys().cloned().collect(),
        })
    }

    pub fn shape_name(&self) -> &'static str {
        match self {
            Self::Categorized(_) => "categorized",
            Self::Flat(_) => "flat",
        }
    }
}
