//! Typed errors for the request controller

use thiserror::Error;

/// Reasons a submission is refused before any network activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("title is empty")]
    EmptyTitle,

    #[error("an evaluation is already in progress")]
    AlreadyPending,
}
