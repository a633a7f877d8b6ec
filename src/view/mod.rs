//! View composer - picks and renders the panel for the current state
//!
//! A thin layer over [`SubmissionState`]: which of the empty, loading,
//! error and result panels to show, and how each looks as terminal text.
//! Entries are rendered in the order the formatter produced them.

use colored::Colorize;

use crate::controller::{FailureReport, SubmissionState};
use crate::core::EvaluationMode;
use crate::evaluation::{display_score, EntryValue, FormattedEvaluation};

const EMPTY_PROMPT: &str = "タイトルを入力してください";
const LOADING_TEXT: &str = "評価中...";
const RESULT_HEADING: &str = "評価結果";
const SUBMIT_LABEL: &str = "評価する";

/// The panel a frontend should show
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Panel<'a> {
    Empty,
    Loading,
    Error(&'a FailureReport),
    Result(&'a FormattedEvaluation),
}

/// Choose the panel for a state
pub fn compose(state: &SubmissionState) -> Panel<'_> {
    match state {
        SubmissionState::Idle => Panel::Empty,
        SubmissionState::Pending => Panel::Loading,
        SubmissionState::Failed(report) => Panel::Error(report),
        SubmissionState::Succeeded(evaluation) => Panel::Result(evaluation),
    }
}

/// Whether the submit action should be offered for this title
pub fn submit_enabled(state: &SubmissionState, title: &str) -> bool {
    !state.is_pending() && !title.trim().is_empty()
}

/// Label of the submit action
pub fn submit_label(state: &SubmissionState) -> &'static str {
    if state.is_pending() {
        LOADING_TEXT
    } else {
        SUBMIT_LABEL
    }
}

/// Terminal rendering options
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    pub color: bool,
}

impl RenderOptions {
    pub fn plain() -> Self {
        Self { color: false }
    }

    fn heading(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn error(&self, text: &str) -> String {
        if self.color {
            text.red().to_string()
        } else {
            text.to_string()
        }
    }

    fn dim(&self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }
}

/// Render a panel as multi-line text
pub fn render_panel(panel: &Panel<'_>, options: RenderOptions) -> String {
    match panel {
        Panel::Empty => options.dim(EMPTY_PROMPT),
        Panel::Loading => options.dim(LOADING_TEXT),
        Panel::Error(report) => options.error(&format!("⚠ {}", report.message)),
        Panel::Result(evaluation) => render_evaluation(evaluation, options),
    }
}

fn render_evaluation(evaluation: &FormattedEvaluation, options: RenderOptions) -> String {
    let mut lines = vec![options.heading(RESULT_HEADING)];

    for entry in evaluation.entries() {
        lines.push(options.heading(&format!("{} {}", entry.glyph, entry.label)));
        match &entry.value {
            EntryValue::Text(text) => lines.push(format!("  {}", text)),
            EntryValue::List(items) => {
                if items.is_empty() {
                    lines.push(format!("  {}", options.dim("-")));
                }
                for item in items {
                    lines.push(format!("  • {}", item));
                }
            }
            EntryValue::Score { score, comment } => {
                let score = display_score(*score);
                match comment.as_deref().filter(|c| !c.is_empty()) {
                    Some(comment) => lines.push(format!("  {}  {}", score, comment)),
                    None => lines.push(format!("  {}", score)),
                }
            }
        }
    }

    lines.join("\n")
}

/// One line per mode, marking the selected one
pub fn render_mode_bar(selected: EvaluationMode, options: RenderOptions) -> String {
    EvaluationMode::all()
        .iter()
        .map(|mode| {
            let item = format!("{} {}", mode.glyph(), mode.label());
            if *mode == selected {
                options.heading(&format!("[{}]", item))
            } else {
                format!(" {} ", item)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
