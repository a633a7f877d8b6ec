//! Request controller - owns the evaluation submission lifecycle
//!
//! ## Lifecycle
//!
//! ```text
//! Idle ──submit──▶ Pending ──outcome──▶ Succeeded | Failed
//!   ▲                 │                      │
//!   └─────reset───────┴──────────────────────┘ (submit re-enters Pending)
//! ```
//!
//! At most one submission is in flight. Each submission is tagged with a
//! sequence number; an outcome whose number is no longer current (because
//! the controller was reset and a newer submission started) is dropped.

mod errors;
mod state;

pub use errors::SubmitError;
pub use state::{
    FailureKind, FailureReport, SubmissionState, FORMAT_ERROR_MESSAGE, SERVICE_REJECTED_MESSAGE,
    TRANSPORT_ERROR_MESSAGE,
};

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;

use crate::config::ServiceConfig;
use crate::core::EvaluationMode;
use crate::transport::{
    EvaluationEnvelope, EvaluationRequest, EvaluationTransport, HttpTransport, TransportError,
};

/// A started submission: the request to send plus its sequence tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    sequence: u64,
    request: EvaluationRequest,
}

impl Submission {
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn request(&self) -> &EvaluationRequest {
        &self.request
    }
}

/// What happened to a transport outcome handed to [`EvaluationController::complete`]
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// The outcome was current and produced this state
    Applied(SubmissionState),
    /// The submission had been superseded; the outcome was discarded
    Stale,
}

impl Completion {
    pub fn is_stale(&self) -> bool {
        matches!(self, Self::Stale)
    }
}

#[derive(Debug, Default)]
struct ControllerInner {
    last_sequence: u64,
    /// Sequence of the submission currently allowed to complete
    active_sequence: Option<u64>,
}

/// Drives one evaluation submission at a time
///
/// State is published through a `watch` channel so a frontend can redraw on
/// every transition; all mutation goes through `&self` methods.
pub struct EvaluationController {
    transport: Arc<dyn EvaluationTransport>,
    inner: Mutex<ControllerInner>,
    state_tx: watch::Sender<SubmissionState>,
}

impl EvaluationController {
    pub fn new(transport: Arc<dyn EvaluationTransport>) -> Self {
        let (state_tx, _) = watch::channel(SubmissionState::Idle);
        Self {
            transport,
            inner: Mutex::new(ControllerInner::default()),
            state_tx,
        }
    }

    /// Controller backed by the HTTP transport
    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(Arc::new(HttpTransport::from_config(config)))
    }

    // ========== Private Helpers ==========

    /// Lock the inner state, recovering from poison
    fn lock_inner(&self) -> MutexGuard<'_, ControllerInner> {
        self.inner.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("EvaluationController lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn transition(&self, next: SubmissionState) {
        let previous = self.state_tx.send_replace(next);
        tracing::debug!(
            from = previous.name(),
            to = self.state_tx.borrow().name(),
            "submission state changed"
        );
    }

    // ========== Getters ==========

    /// Snapshot of the current state
    pub fn state(&self) -> SubmissionState {
        self.state_tx.borrow().clone()
    }

    /// Read-only subscription to state changes
    pub fn subscribe(&self) -> watch::Receiver<SubmissionState> {
        self.state_tx.subscribe()
    }

    pub fn is_pending(&self) -> bool {
        self.lock_inner().active_sequence.is_some()
    }

    pub fn transport_name(&self) -> &str {
        self.transport.name()
    }

    // ========== Lifecycle ==========

    /// Validate the title and enter `Pending`
    ///
    /// Nothing is sent; the caller passes [`Submission::request`] to a
    /// transport and hands the outcome to [`complete`](Self::complete).
    pub fn begin(&self, title: &str, mode: EvaluationMode) -> Result<Submission, SubmitError> {
        if title.trim().is_empty() {
            return Err(SubmitError::EmptyTitle);
        }

        let mut inner = self.lock_inner();
        if inner.active_sequence.is_some() {
            tracing::debug!("submission rejected: another evaluation is in flight");
            return Err(SubmitError::AlreadyPending);
        }

        inner.last_sequence += 1;
        let sequence = inner.last_sequence;
        inner.active_sequence = Some(sequence);
        self.transition(SubmissionState::Pending);

        tracing::info!(sequence, mode = %mode, "evaluation submitted");
        Ok(Submission {
            sequence,
            request: EvaluationRequest::new(title, mode),
        })
    }

    /// Apply a transport outcome, unless the submission was superseded
    pub fn complete(
        &self,
        submission: Submission,
        outcome: Result<EvaluationEnvelope, TransportError>,
    ) -> Completion {
        let mut inner = self.lock_inner();
        if inner.active_sequence != Some(submission.sequence) {
            tracing::debug!(
                sequence = submission.sequence,
                current = ?inner.active_sequence,
                "discarding stale evaluation response"
            );
            return Completion::Stale;
        }

        inner.active_sequence = None;
        let next = SubmissionState::from_outcome(outcome);
        self.transition(next.clone());
        Completion::Applied(next)
    }

    /// Submit a title and wait for the outcome
    ///
    /// Enters `Pending` before the transport is called. No retries.
    pub async fn submit(
        &self,
        title: &str,
        mode: EvaluationMode,
    ) -> Result<Completion, SubmitError> {
        let submission = self.begin(title, mode)?;
        tracing::debug!(
            sequence = submission.sequence,
            transport = self.transport_name(),
            "dispatching evaluation request"
        );
        let outcome = self.transport.evaluate(submission.request()).await;
        Ok(self.complete(submission, outcome))
    }

    /// Return to `Idle`, abandoning any in-flight submission
    pub fn reset(&self) {
        let mut inner = self.lock_inner();
        if let Some(sequence) = inner.active_sequence.take() {
            tracing::debug!(sequence, "abandoning in-flight evaluation");
        }
        self.transition(SubmissionState::Idle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::{EntryKey, EntryValue};
    use async_trait::async_trait;
    use proptest::prelude::*;
    use serde_json::json;
    use std::collections::VecDeque;
    use tokio::sync::Notify;

    type Outcome = Result<EvaluationEnvelope, TransportError>;

    /// Replays queued outcomes, optionally holding each call until released
    #[derive(Default)]
    struct ScriptedTransport {
        outcomes: Mutex<VecDeque<Outcome>>,
        requests: Mutex<Vec<EvaluationRequest>>,
        gate: Option<Arc<Notify>>,
    }

    impl ScriptedTransport {
        fn with_outcome(outcome: Outcome) -> Self {
            let transport = Self::default();
            transport.outcomes.lock().unwrap().push_back(outcome);
            transport
        }

        fn gated(mut self, gate: Arc<Notify>) -> Self {
            self.gate = Some(gate);
            self
        }

        fn requests(&self) -> Vec<EvaluationRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl EvaluationTransport for ScriptedTransport {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn evaluate(&self, request: &EvaluationRequest) -> Outcome {
            self.requests.lock().unwrap().push(request.clone());
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::Network("no scripted outcome".into())))
        }
    }

    fn scenario_a() -> EvaluationEnvelope {
        EvaluationEnvelope::success(json!({
            "ratings": {
                "impact": { "score": 8, "comment": "強い" },
                "imagination": { "score": 7, "comment": "良い" },
                "eroticism": { "score": 9, "comment": "高い" },
                "originality": { "score": 6, "comment": "普通" }
            },
            "overall_comment": "総じて良好"
        }))
    }

    fn controller(transport: ScriptedTransport) -> (EvaluationController, Arc<ScriptedTransport>) {
        let transport = Arc::new(transport);
        (EvaluationController::new(transport.clone()), transport)
    }

    #[tokio::test]
    async fn test_scenario_a_categorized_success() {
        let (controller, transport) = controller(ScriptedTransport::with_outcome(Ok(scenario_a())));
        assert_eq!(controller.transport_name(), "scripted");

        let completion = controller
            .submit("清楚な人妻が...", EvaluationMode::Casual)
            .await
            .unwrap();
        assert!(!completion.is_stale());

        let state = controller.state();
        let evaluation = state.evaluation().expect("succeeded");
        assert_eq!(evaluation.len(), 5);
        let impact = evaluation.get(EntryKey::Impact).unwrap();
        assert_eq!(impact.value.score_text().as_deref(), Some("8/10"));

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].title, "清楚な人妻が...");
        assert_eq!(requests[0].mode, EvaluationMode::Casual);
    }

    #[tokio::test]
    async fn test_scenario_b_blank_title_is_rejected_without_network() {
        let (controller, transport) = controller(ScriptedTransport::default());

        for title in ["", "   ", "\t\n"] {
            let err = controller
                .submit(title, EvaluationMode::Cool)
                .await
                .unwrap_err();
            assert_eq!(err, SubmitError::EmptyTitle);
        }
        assert!(controller.state().is_idle());
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_scenario_c_service_rejection_message() {
        let (controller, _) = controller(ScriptedTransport::with_outcome(Ok(
            EvaluationEnvelope::rejected(Some("不適切な内容です")),
        )));

        controller
            .submit("タイトル", EvaluationMode::Poet)
            .await
            .unwrap();
        let state = controller.state();
        let failure = state.failure().expect("failed");
        assert_eq!(failure.message, "不適切な内容です");
        assert_eq!(failure.kind, FailureKind::ServiceRejected);
    }

    #[tokio::test]
    async fn test_scenario_d_transport_failure_uses_generic_message() {
        let (controller, _) = controller(ScriptedTransport::with_outcome(Err(
            TransportError::Timeout("deadline elapsed".to_string()),
        )));

        controller
            .submit("タイトル", EvaluationMode::Casual)
            .await
            .unwrap();
        assert_eq!(
            controller.state().failure().unwrap().message,
            TRANSPORT_ERROR_MESSAGE
        );
    }

    #[tokio::test]
    async fn test_scenario_e_flat_success() {
        let envelope = EvaluationEnvelope::success(json!({
            "genre": "ドラマ",
            "target_audience": "20代",
            "appeal_points": ["設定が良い", "演技が自然"],
            "rating": 7
        }));
        let (controller, _) = controller(ScriptedTransport::with_outcome(Ok(envelope)));

        controller
            .submit("タイトル", EvaluationMode::Imouto)
            .await
            .unwrap();
        let state = controller.state();
        let evaluation = state.evaluation().unwrap();
        assert_eq!(
            evaluation.get(EntryKey::AppealPoints).unwrap().value,
            EntryValue::List(vec!["設定が良い".to_string(), "演技が自然".to_string()])
        );
        assert_eq!(
            evaluation
                .get(EntryKey::Rating)
                .unwrap()
                .value
                .score_text()
                .as_deref(),
            Some("7/10")
        );
    }

    #[tokio::test]
    async fn test_pending_is_entered_before_transport_resolves() {
        let gate = Arc::new(Notify::new());
        let (controller, _) =
            controller(ScriptedTransport::with_outcome(Ok(scenario_a())).gated(gate.clone()));
        let controller = Arc::new(controller);
        let mut rx = controller.subscribe();

        let task = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.submit("題名", EvaluationMode::Cool).await })
        };

        rx.wait_for(|state| state.is_pending()).await.unwrap();
        assert!(controller.is_pending());

        // A second submission while pending is refused outright
        assert_eq!(
            controller.begin("別の題名", EvaluationMode::Cool),
            Err(SubmitError::AlreadyPending)
        );

        gate.notify_one();
        let completion = task.await.unwrap().unwrap();
        assert!(matches!(completion, Completion::Applied(SubmissionState::Succeeded(_))));
        assert!(!controller.is_pending());
    }

    #[test]
    fn test_entering_pending_clears_previous_result() {
        let (controller, _) = controller(ScriptedTransport::default());

        let first = controller.begin("一作目", EvaluationMode::Casual).unwrap();
        controller.complete(first, Ok(EvaluationEnvelope::rejected(None)));
        assert!(controller.state().failure().is_some());

        controller.begin("二作目", EvaluationMode::Casual).unwrap();
        let state = controller.state();
        assert_eq!(state, SubmissionState::Pending);
        assert!(state.failure().is_none());
        assert!(state.evaluation().is_none());
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let (controller, _) = controller(ScriptedTransport::default());

        let first = controller.begin("一作目", EvaluationMode::Casual).unwrap();
        controller.reset();
        let second = controller.begin("二作目", EvaluationMode::Poet).unwrap();
        assert!(second.sequence() > first.sequence());

        let applied = controller.complete(second, Ok(scenario_a()));
        assert!(!applied.is_stale());

        // The first request resolves late and must not overwrite the second
        let late = controller.complete(first, Ok(EvaluationEnvelope::rejected(Some("古い"))));
        assert!(late.is_stale());
        assert!(controller.state().evaluation().is_some());
    }

    #[test]
    fn test_stale_response_does_not_touch_newer_pending() {
        let (controller, _) = controller(ScriptedTransport::default());

        let first = controller.begin("一作目", EvaluationMode::Casual).unwrap();
        controller.reset();
        let _second = controller.begin("二作目", EvaluationMode::Casual).unwrap();

        assert!(controller
            .complete(first, Err(TransportError::Network("reset".into())))
            .is_stale());
        assert!(controller.state().is_pending());
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let (controller, _) = controller(ScriptedTransport::default());
        let submission = controller.begin("題名", EvaluationMode::Casual).unwrap();
        controller.complete(submission, Ok(scenario_a()));

        controller.reset();
        assert!(controller.state().is_idle());
        assert!(!controller.is_pending());
    }

    #[test]
    fn test_completing_twice_is_stale_the_second_time() {
        let (controller, _) = controller(ScriptedTransport::default());
        let submission = controller.begin("題名", EvaluationMode::Casual).unwrap();
        let duplicate = submission.clone();

        assert!(!controller.complete(submission, Ok(scenario_a())).is_stale());
        assert!(controller
            .complete(duplicate, Ok(EvaluationEnvelope::rejected(None)))
            .is_stale());
        assert!(controller.state().evaluation().is_some());
    }

    #[test]
    fn test_title_is_sent_as_typed() {
        let (controller, _) = controller(ScriptedTransport::default());
        let submission = controller.begin("  余白つき  ", EvaluationMode::Cool).unwrap();
        assert_eq!(submission.request().title, "  余白つき  ");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Any title with visible characters enters Pending synchronously
        #[test]
        fn prop_non_blank_title_enters_pending(
            padding in "[ \t]{0,3}",
            title in "[a-zA-Z0-9ぁ-ん]{1,20}",
            mode_index in 0usize..4,
        ) {
            let (controller, transport) = controller(ScriptedTransport::default());
            let mode = EvaluationMode::all()[mode_index];
            let submission = controller.begin(&format!("{padding}{title}{padding}"), mode);
            prop_assert!(submission.is_ok());
            prop_assert!(controller.state().is_pending());
            prop_assert!(transport.requests().is_empty());
        }

        #[test]
        fn prop_whitespace_title_stays_idle(title in "[ \t\n]{0,10}") {
            let (controller, _) = controller(ScriptedTransport::default());
            prop_assert_eq!(
                controller.begin(&title, EvaluationMode::Casual),
                Err(SubmitError::EmptyTitle)
            );
            prop_assert!(controller.state().is_idle());
        }
    }
}
