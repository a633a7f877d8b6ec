//! Conversion of parsed evaluations into the fixed display model

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::Serialize;
use serde_json::Value;

use super::error::FormatError;
use super::parse::{CategorizedEvaluation, CategoryScore, Evaluation, FlatEvaluation};

/// Placeholder for a score or rating the service did not provide
pub const UNRATED: &str = "未評価";

/// Placeholder for a flat text field the service did not provide
pub const UNKNOWN: &str = "不明";

/// Glyph for labels missing from [`LABEL_GLYPHS`]
pub const DEFAULT_ENTRY_GLYPH: &str = "📌";

static LABEL_GLYPHS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("ジャンル", "🎬"),
        ("ターゲット層", "🎯"),
        ("アピールポイント", "💡"),
        ("評価スコア", "⭐"),
        ("インパクト", "💥"),
        ("想像力", "🌈"),
        ("エロさ", "🔥"),
        ("独創性", "🧩"),
        ("総評", "📝"),
    ])
});

/// Glyph for a display label; unknown labels get [`DEFAULT_ENTRY_GLYPH`]
pub fn glyph_for_label(label: &str) -> &'static str {
    LABEL_GLYPHS
        .get(label)
        .copied()
        .unwrap_or(DEFAULT_ENTRY_GLYPH)
}

/// Render a score as `N/10`, or [`UNRATED`] when absent
///
/// Out-of-range values are shown as received.
pub fn display_score(score: Option<f64>) -> String {
    match score {
        Some(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
            format!("{}/10", value as i64)
        }
        Some(value) => format!("{}/10", value),
        None => UNRATED.to_string(),
    }
}

/// Which response shape produced a [`FormattedEvaluation`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationShape {
    Categorized,
    Flat,
}

/// Stable identity of a formatted entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKey {
    Genre,
    TargetAudience,
    AppealPoints,
    Rating,
    Impact,
    Imagination,
    Eroticism,
    Originality,
    Overall,
}

impl EntryKey {
    /// Display order of the categorized shape
    pub const CATEGORIZED: [EntryKey; 5] = [
        Self::Impact,
        Self::Imagination,
        Self::Eroticism,
        Self::Originality,
        Self::Overall,
    ];

    /// Display order of the flat shape
    pub const FLAT: [EntryKey; 4] = [
        Self::Genre,
        Self::TargetAudience,
        Self::AppealPoints,
        Self::Rating,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Genre => "ジャンル",
            Self::TargetAudience => "ターゲット層",
            Self::AppealPoints => "アピールポイント",
            Self::Rating => "評価スコア",
            Self::Impact => "インパクト",
            Self::Imagination => "想像力",
            Self::Eroticism => "エロさ",
            Self::Originality => "独創性",
            Self::Overall => "総評",
        }
    }
}

/// Value carried by one entry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum EntryValue {
    Text(String),
    List(Vec<String>),
    Score {
        score: Option<f64>,
        comment: Option<String>,
    },
}

impl EntryValue {
    /// `N/10` or the unrated placeholder for score entries
    pub fn score_text(&self) -> Option<String> {
        match self {
            Self::Score { score, .. } => Some(display_score(*score)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormattedEntry {
    pub key: EntryKey,
    pub label: &'static str,
    pub glyph: &'static str,
    pub value: EntryValue,
}

impl FormattedEntry {
    fn new(key: EntryKey, value: EntryValue) -> Self {
        let label = key.label();
        Self {
            key,
            label,
            glyph: glyph_for_label(label),
            value,
        }
    }
}

/// Ordered, labeled critique ready for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormattedEvaluation {
    shape: EvaluationShape,
    entries: Vec<FormattedEntry>,
}

impl FormattedEvaluation {
    pub fn shape(&self) -> EvaluationShape {
        self.shape
    }

    pub fn entries(&self) -> &[FormattedEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: EntryKey) -> Option<&FormattedEntry> {
        self.entries.iter().find(|entry| entry.key == key)
    }

    pub fn keys(&self) -> Vec<EntryKey> {
        self.entries.iter().map(|entry| entry.key).collect()
    }
}

impl Evaluation {
    pub fn format(&self) -> FormattedEvaluation {
        match self {
            Self::Categorized(eval) => format_categorized(eval),
            Self::Flat(eval) => format_flat(eval),
        }
    }
}

/// Parse and format a raw evaluation object in one step
pub fn format_evaluation(raw: &Value) -> Result<FormattedEvaluation, FormatError> {
    let evaluation = Evaluation::parse(raw)?;
    tracing::debug!(shape = evaluation.shape_name(), "evaluation shape detected");
    Ok(evaluation.format())
}

fn score_entry(key: EntryKey, category: Option<&CategoryScore>) -> FormattedEntry {
    let value = match category {
        Some(category) => EntryValue::Score {
            score: category.score,
            comment: category.comment.clone(),
        },
        None => EntryValue::Score {
            score: None,
            comment: None,
        },
    };
    FormattedEntry::new(key, value)
}

fn format_categorized(eval: &CategorizedEvaluation) -> FormattedEvaluation {
    let ratings = &eval.ratings;
    let entries = vec![
        score_entry(EntryKey::Impact, ratings.impact.as_ref()),
        score_entry(EntryKey::Imagination, ratings.imagination.as_ref()),
        score_entry(EntryKey::Eroticism, ratings.eroticism.as_ref()),
        score_entry(EntryKey::Originality, ratings.originality.as_ref()),
        FormattedEntry::new(
            EntryKey::Overall,
            EntryValue::Text(eval.overall_comment.clone().unwrap_or_default()),
        ),
    ];

    FormattedEvaluation {
        shape: EvaluationShape::Categorized,
        entries,
    }
}

fn format_flat(eval: &FlatEvaluation) -> FormattedEvaluation {
    let text_or_unknown = |value: &Option<String>| {
        value
            .as_deref()
            .filter(|text| !text.is_empty())
            .unwrap_or(UNKNOWN)
            .to_string()
    };

    let entries = vec![
        FormattedEntry::new(EntryKey::Genre, EntryValue::Text(text_or_unknown(&eval.genre))),
        FormattedEntry::new(
            EntryKey::TargetAudience,
            EntryValue::Text(text_or_unknown(&eval.target_audience)),
        ),
        FormattedEntry::new(
            EntryKey::AppealPoints,
            EntryValue::List(eval.appeal_points.clone().unwrap_or_default()),
        ),
        FormattedEntry::new(
            EntryKey::Rating,
            EntryValue::Score {
                score: eval.rating,
                comment: None,
            },
        ),
    ];

    FormattedEvaluation {
        shape: EvaluationShape::Flat,
        entries,
    }
}
