//! Result formatting for evaluation payloads
//!
//! Raw evaluation objects arrive as untyped JSON in one of two shapes.
//! [`Evaluation::parse`] turns them into a tagged variant and
//! [`Evaluation::format`] renders that into a [`FormattedEvaluation`]: a fixed,
//! ordered list of labeled entries. Both steps are pure.

mod error;
mod format;
mod parse;

pub use error::FormatError;
pub use format::{
    display_score, format_evaluation, glyph_for_label, EntryKey, EntryValue, EvaluationShape,
    FormattedEntry, FormattedEvaluation, DEFAULT_ENTRY_GLYPH, UNKNOWN, UNRATED,
};
pub use parse::{
    CategorizedEvaluation, CategoryRatings, CategoryScore, Evaluation, FlatEvaluation,
};
