//! title-critic: terminal client for a remote title evaluation service
//!
//! This library provides:
//! - A registry of evaluation modes (personas) sent with each request
//! - A request controller that runs one submission at a time and publishes
//!   its lifecycle state
//! - A formatter that turns either known evaluation shape into a fixed,
//!   ordered display model
//! - An HTTP transport for `POST /api/evaluate`
//! - Terminal rendering of the current state

pub mod cli;
pub mod config;
pub mod controller;
pub mod core;
pub mod evaluation;
pub mod telemetry;
pub mod transport;
pub mod view;

pub use config::Config;
pub use controller::{EvaluationController, SubmissionState};
pub use crate::core::EvaluationMode;
pub use evaluation::FormattedEvaluation;
