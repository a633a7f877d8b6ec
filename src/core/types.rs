//! Canonical type definitions for the core domain
//!
//! The mode registry lives here: the fixed catalog of evaluation personas a
//! user can pick before submitting a title. Every other module refers to
//! modes through [`EvaluationMode`] rather than raw identifier strings.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Label shown for an identifier the registry does not know
pub const DEFAULT_MODE_LABEL: &str = "標準";

/// Glyph shown for an identifier the registry does not know
pub const DEFAULT_MODE_GLYPH: &str = "✨";

/// Evaluation persona sent along with every title
///
/// The mode only changes the `promptMode` parameter of the request; the
/// client handles every mode's response identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluationMode {
    /// Plain, friendly critique
    #[default]
    Casual,
    /// Detached, cool-headed critique
    Cool,
    /// Critique delivered by a little-sister persona
    Imouto,
    /// Critique written as verse
    Poet,
}

/// Returned when parsing an identifier outside the registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown evaluation mode '{0}' (expected one of: casual, cool, imouto, poet)")]
pub struct UnknownModeError(pub String);

impl EvaluationMode {
    /// Every mode in display order
    pub const ALL: [EvaluationMode; 4] = [Self::Casual, Self::Cool, Self::Imouto, Self::Poet];

    pub fn all() -> &'static [EvaluationMode] {
        &Self::ALL
    }

    /// Stable wire identifier (the `promptMode` value)
    pub fn id(&self) -> &'static str {
        match self {
            Self::Casual => "casual",
            Self::Cool => "cool",
            Self::Imouto => "imouto",
            Self::Poet => "poet",
        }
    }

    /// Get display label for this mode
    pub fn label(&self) -> &'static str {
        match self {
            Self::Casual => "カジュアル",
            Self::Cool => "クール",
            Self::Imouto => "妹モード",
            Self::Poet => "詩人モード",
        }
    }

    /// Get glyph for this mode
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Casual => "😊",
            Self::Cool => "😎",
            Self::Imouto => "🎀",
            Self::Poet => "🪶",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Casual => "Friendly, everyday commentary",
            Self::Cool => "Terse and detached commentary",
            Self::Imouto => "Playful commentary in a younger-sister voice",
            Self::Poet => "Commentary phrased as a short poem",
        }
    }

    /// Look up a mode by its wire identifier (case-insensitive)
    pub fn from_id(id: &str) -> Option<Self> {
        match id.trim().to_ascii_lowercase().as_str() {
            "casual" => Some(Self::Casual),
            "cool" => Some(Self::Cool),
            "imouto" => Some(Self::Imouto),
            "poet" => Some(Self::Poet),
            _ => None,
        }
    }

    /// Get the next mode in the toggle order (Casual → Cool → Imouto → Poet → Casual)
    pub fn next(self) -> Self {
        match self {
            Self::Casual => Self::Cool,
            Self::Cool => Self::Imouto,
            Self::Imouto => Self::Poet,
            Self::Poet => Self::Casual,
        }
    }

    /// Get the previous mode in the toggle order
    pub fn prev(self) -> Self {
        match self {
            Self::Casual => Self::Poet,
            Self::Cool => Self::Casual,
            Self::Imouto => Self::Cool,
            Self::Poet => Self::Imouto,
        }
    }
}

/// Label for an arbitrary identifier, falling back to [`DEFAULT_MODE_LABEL`]
pub fn label_for(id: &str) -> &'static str {
    EvaluationMode::from_id(id)
        .map(|mode| mode.label())
        .unwrap_or(DEFAULT_MODE_LABEL)
}

/// Glyph for an arbitrary identifier, falling back to [`DEFAULT_MODE_GLYPH`]
pub fn glyph_for(id: &str) -> &'static str {
    EvaluationMode::from_id(id)
        .map(|mode| mode.glyph())
        .unwrap_or(DEFAULT_MODE_GLYPH)
}

impl std::str::FromStr for EvaluationMode {
    type Err = UnknownModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_id(s).ok_or_else(|| UnknownModeError(s.to_string()))
    }
}

impl std::fmt::Display for EvaluationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_mode_is_casual() {
        assert_eq!(EvaluationMode::default(), EvaluationMode::Casual);
    }

    #[test]
    fn test_ids_are_unique() {
        let ids: HashSet<_> = EvaluationMode::all().iter().map(|m| m.id()).collect();
        assert_eq!(ids.len(), EvaluationMode::all().len());
    }

    #[test]
    fn test_from_id_round_trips_every_mode() {
        for mode in EvaluationMode::all() {
            assert_eq!(EvaluationMode::from_id(mode.id()), Some(*mode));
        }
        assert_eq!(EvaluationMode::from_id("  POET "), Some(EvaluationMode::Poet));
        assert_eq!(EvaluationMode::from_id("shouty"), None);
    }

    #[test]
    fn test_unknown_id_falls_back_to_defaults() {
        assert_eq!(label_for("shouty"), DEFAULT_MODE_LABEL);
        assert_eq!(glyph_for("shouty"), DEFAULT_MODE_GLYPH);
        assert_eq!(label_for("cool"), "クール");
        assert_eq!(glyph_for("imouto"), "🎀");
    }

    #[test]
    fn test_next_and_prev_cycle_through_all_modes() {
        let mut mode = EvaluationMode::Casual;
        for _ in 0..EvaluationMode::all().len() {
            assert_eq!(mode.next().prev(), mode);
            mode = mode.next();
        }
        assert_eq!(mode, EvaluationMode::Casual);
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        let err = "loud".parse::<EvaluationMode>().unwrap_err();
        assert!(err.to_string().contains("loud"));
        assert_eq!("cool".parse::<EvaluationMode>(), Ok(EvaluationMode::Cool));
    }

    #[test]
    fn test_serializes_as_wire_id() {
        let json = serde_json::to_string(&EvaluationMode::Imouto).unwrap();
        assert_eq!(json, "\"imouto\"");
        assert_eq!(EvaluationMode::Poet.to_string(), "poet");
    }
}
