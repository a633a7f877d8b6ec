//! Core domain modules
//!
//! Types shared by the controller, formatter and presentation layers.

pub mod types;

// Re-export canonical types
pub use types::{
    glyph_for, label_for, EvaluationMode, UnknownModeError, DEFAULT_MODE_GLYPH,
    DEFAULT_MODE_LABEL,
};
