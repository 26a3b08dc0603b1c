//! WizardController — owns the wizard state and drives step transitions.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Value, json};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::WizardConfig;
use crate::error::WizardError;

use super::backend::{Operation, TaskBackend};
use super::model::{AnswersUpdate, RegistrationReceipt, UploadedFile, WizardState};
use super::roadmap::{self, RoadmapSummary};
use super::step::Step;
use super::validation;

/// Result of one `advance` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AdvanceOutcome {
    /// The wizard moved to the next step.
    Moved { from: Step, to: Step },
    /// A guard or the backend refused; the step is unchanged.
    Rejected { step: Step, reason: String },
    /// Another advance is still pending; this call was dropped.
    Ignored,
    /// Already at `done`; only `reset` leaves it.
    Terminal,
}

/// Render-ready snapshot for the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct WizardView {
    #[serde(flatten)]
    pub state: WizardState,
    pub progress_percent: Option<u8>,
    pub roadmap_summary: RoadmapSummary,
}

/// Shown when a backend call ends in an unexpected way.
pub const UNEXPECTED_FAILURE: &str = "Something went wrong, please try again";

/// Coordinates one user's walk through the wizard: guards, backend calls,
/// and roadmap population.
pub struct WizardController {
    session_id: Uuid,
    backend: Arc<dyn TaskBackend>,
    min_documents: usize,
    state: Arc<RwLock<WizardState>>,
}

impl WizardController {
    pub fn new(backend: Arc<dyn TaskBackend>, config: &WizardConfig) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            backend,
            min_documents: config.min_documents,
            state: Arc::new(RwLock::new(WizardState::default())),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Clone of the current state.
    pub async fn snapshot(&self) -> WizardState {
        self.state.read().await.clone()
    }

    pub async fn current_step(&self) -> Step {
        self.state.read().await.step
    }

    pub async fn view(&self) -> WizardView {
        let state = self.snapshot().await;
        WizardView {
            progress_percent: state.step.progress_percent(),
            roadmap_summary: RoadmapSummary::of(&state.roadmap),
            state,
        }
    }

    /// Try to move to the next step.
    ///
    /// Guard failures set `error` and leave everything else untouched.
    /// Backend-bound steps hold `busy` for the duration of the call; calls
    /// arriving meanwhile are dropped, not queued. The backend call and the
    /// transition that follows run on their own task, so dropping this
    /// future never strands the wizard in `busy`.
    pub async fn advance(&self) -> AdvanceOutcome {
        let (from, to, operation, payload) = {
            let mut state = self.state.write().await;
            if state.busy {
                debug!(session_id = %self.session_id, "Advance ignored while busy");
                return AdvanceOutcome::Ignored;
            }

            let from = state.step;
            let Some(to) = from.next() else {
                return AdvanceOutcome::Terminal;
            };

            if let Err(e) = self.check_guard(&state) {
                return reject(self.session_id, &mut state, e);
            }

            match backend_call(&state) {
                None => {
                    commit(self.session_id, &mut state, from, to);
                    return AdvanceOutcome::Moved { from, to };
                }
                Some((operation, payload)) => {
                    state.busy = true;
                    state.error = None;
                    (from, to, operation, payload)
                }
            }
        };

        let session_id = self.session_id;
        let backend = Arc::clone(&self.backend);
        let shared = Arc::clone(&self.state);
        let task = tokio::spawn(async move {
            debug!(session_id = %session_id, operation = %operation, "Invoking backend");
            let result = backend.invoke(&operation, payload).await;

            let mut state = shared.write().await;
            state.busy = false;
            match result {
                Ok(response) => {
                    if operation == Operation::SubmitSpice {
                        state.registration = parse_receipt(&response);
                    }
                    commit(session_id, &mut state, from, to);
                    AdvanceOutcome::Moved { from, to }
                }
                Err(e) => reject(session_id, &mut state, e),
            }
        });

        match task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(session_id = %session_id, "Backend task failed: {}", e);
                let mut state = self.state.write().await;
                state.busy = false;
                reject(
                    session_id,
                    &mut state,
                    WizardError::Validation(UNEXPECTED_FAILURE.to_string()),
                )
            }
        }
    }

    /// Accept an uploaded document. Only valid on the documents step and
    /// not while a submission is pending; content checks are left to the
    /// documents guard.
    pub async fn receive_file(&self, file: UploadedFile) -> Result<usize, WizardError> {
        let mut state = self.state.write().await;
        if state.busy {
            return Err(WizardError::Busy {
                action: "receive a file".to_string(),
            });
        }
        if state.step != Step::Documents {
            return Err(WizardError::WrongStep {
                action: "receive a file".to_string(),
                step: state.step,
            });
        }
        debug!(
            session_id = %self.session_id,
            name = %file.name,
            size_bytes = file.size_bytes,
            "File received"
        );
        state.files.push(file);
        Ok(state.files.len())
    }

    /// Merge a partial answers update. Only valid on the quiz step.
    pub async fn update_answers(&self, update: AnswersUpdate) -> Result<(), WizardError> {
        let mut state = self.state.write().await;
        if state.busy {
            return Err(WizardError::Busy {
                action: "change answers".to_string(),
            });
        }
        if state.step != Step::Quiz {
            return Err(WizardError::WrongStep {
                action: "change answers".to_string(),
                step: state.step,
            });
        }
        state.answers.apply(update);
        Ok(())
    }

    /// Return to a fresh welcome screen. Dropped while a backend call is
    /// pending; returns whether the reset happened.
    pub async fn reset(&self) -> bool {
        let mut state = self.state.write().await;
        if state.busy {
            debug!(session_id = %self.session_id, "Reset ignored while busy");
            return false;
        }
        info!(session_id = %self.session_id, from = %state.step, "Wizard reset");
        *state = WizardState::default();
        true
    }

    fn check_guard(&self, state: &WizardState) -> Result<(), WizardError> {
        match state.step {
            Step::Quiz => validation::check_sector(&state.answers.sector),
            Step::Documents => validation::check_documents(state.files.len(), self.min_documents),
            _ => Ok(()),
        }
    }
}

fn reject(session_id: Uuid, state: &mut WizardState, error: WizardError) -> AdvanceOutcome {
    warn!(session_id = %session_id, step = %state.step, "Advance rejected: {}", error);
    let reason = error.user_message();
    state.error = Some(reason.clone());
    AdvanceOutcome::Rejected {
        step: state.step,
        reason,
    }
}

fn commit(session_id: Uuid, state: &mut WizardState, from: Step, to: Step) {
    debug_assert!(from.can_transition_to(to));
    if (from == Step::Roadmap || to == Step::Roadmap) && state.roadmap.is_empty() {
        state.roadmap = roadmap::generate(&state.answers);
    }
    state.step = to;
    state.error = None;
    info!(session_id = %session_id, %from, %to, "Wizard advanced");
}

/// The backend operation a step performs before leaving, if any.
fn backend_call(state: &WizardState) -> Option<(Operation, Value)> {
    match state.step {
        Step::Documents => Some((
            Operation::UploadDocuments,
            json!({ "files": state.files }),
        )),
        Step::Incorporation => {
            let file_names: Vec<&str> = state.files.iter().map(|f| f.name.as_str()).collect();
            Some((
                Operation::SubmitSpice,
                json!({ "answers": state.answers, "files": file_names }),
            ))
        }
        _ => None,
    }
}

fn parse_receipt(response: &Value) -> Option<RegistrationReceipt> {
    let registration_id = response.get("registration_id")?.as_str()?.to_string();
    let status = response
        .get("status")
        .and_then(Value::as_str)
        .unwrap_or("Submitted")
        .to_string();
    Some(RegistrationReceipt {
        registration_id,
        status,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use super::*;
    use crate::wizard::backend::SimulatedBackend;
    use crate::wizard::model::{QuizAnswers, RoadmapStatus};
    use crate::wizard::roadmap::{DPIIT_RECOGNITION, PF_ESIC};

    fn controller_with(backend: Arc<dyn TaskBackend>) -> WizardController {
        WizardController::new(backend, &WizardConfig::default())
    }

    fn instant_controller() -> WizardController {
        controller_with(Arc::new(SimulatedBackend::instant()))
    }

    fn sector(name: &str) -> AnswersUpdate {
        AnswersUpdate {
            sector: Some(name.to_string()),
            ..Default::default()
        }
    }

    /// Walk a fresh controller to the documents step with two files.
    async fn at_documents(controller: &WizardController) {
        controller.advance().await;
        controller.update_answers(sector("SaaS")).await.unwrap();
        controller.advance().await;
        controller.advance().await;
        assert_eq!(controller.current_step().await, Step::Documents);
        controller
            .receive_file(UploadedFile::new("pan.pdf", 120_000))
            .await
            .unwrap();
        controller
            .receive_file(UploadedFile::new("aadhaar.pdf", 240_000))
            .await
            .unwrap();
    }

    /// Holds each call until released, to observe the busy window.
    #[derive(Default)]
    struct GatedBackend {
        entered: Notify,
        release: Notify,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TaskBackend for GatedBackend {
        async fn invoke(&self, _operation: &Operation, _payload: Value) -> Result<Value, WizardError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.entered.notify_one();
            self.release.notified().await;
            Ok(json!({ "success": true }))
        }
    }

    /// Fails the first call, then succeeds.
    #[derive(Default)]
    struct FlakyBackend {
        failed_once: AtomicBool,
    }

    #[async_trait]
    impl TaskBackend for FlakyBackend {
        async fn invoke(&self, operation: &Operation, _payload: Value) -> Result<Value, WizardError> {
            if !self.failed_once.swap(true, Ordering::SeqCst) {
                return Err(WizardError::Backend {
                    operation: operation.to_string(),
                    reason: "Registry unavailable".to_string(),
                });
            }
            Ok(json!({ "success": true }))
        }
    }

    /// Panics mid-call, standing in for a broken backend client.
    struct PanickingBackend;

    #[async_trait]
    impl TaskBackend for PanickingBackend {
        async fn invoke(&self, _operation: &Operation, _payload: Value) -> Result<Value, WizardError> {
            panic!("backend client crashed");
        }
    }

    #[tokio::test]
    async fn dropped_advance_still_clears_busy() {
        let c = controller_with(Arc::new(SimulatedBackend::new(Duration::from_millis(200))));
        at_documents(&c).await;

        let abandoned = tokio::time::timeout(Duration::from_millis(20), c.advance()).await;
        assert!(abandoned.is_err(), "advance should still be pending");
        assert!(c.snapshot().await.busy);

        tokio::time::sleep(Duration::from_millis(400)).await;
        let state = c.snapshot().await;
        assert!(!state.busy);
        assert_eq!(state.step, Step::Incorporation);
        assert!(c.reset().await);
        assert_eq!(c.snapshot().await, WizardState::default());
    }

    #[tokio::test]
    async fn intake_refused_while_busy() {
        let backend = Arc::new(GatedBackend::default());
        let c = Arc::new(controller_with(backend.clone()));
        at_documents(&c).await;

        let pending = tokio::spawn({
            let c = Arc::clone(&c);
            async move { c.advance().await }
        });
        backend.entered.notified().await;

        let err = c
            .receive_file(UploadedFile::new("late.pdf", 10))
            .await
            .unwrap_err();
        assert!(matches!(err, WizardError::Busy { .. }));
        assert!(c.update_answers(sector("EdTech")).await.is_err());

        backend.release.notify_one();
        assert!(matches!(pending.await.unwrap(), AdvanceOutcome::Moved { .. }));
        let state = c.snapshot().await;
        assert_eq!(state.files.len(), 2, "late file was not committed");
        assert_eq!(state.step, Step::Incorporation);
    }

    #[tokio::test]
    async fn crashed_backend_surfaces_generic_error() {
        let c = controller_with(Arc::new(PanickingBackend));
        at_documents(&c).await;

        let outcome = c.advance().await;
        assert_eq!(
            outcome,
            AdvanceOutcome::Rejected {
                step: Step::Documents,
                reason: UNEXPECTED_FAILURE.to_string(),
            }
        );
        let state = c.snapshot().await;
        assert!(!state.busy);
        assert_eq!(state.error.as_deref(), Some(UNEXPECTED_FAILURE));
        assert!(c.reset().await);
    }

    #[tokio::test]
    async fn starts_at_welcome() {
        let c = instant_controller();
        let state = c.snapshot().await;
        assert_eq!(state, WizardState::default());
    }

    #[tokio::test]
    async fn quiz_requires_sector() {
        let c = instant_controller();
        c.advance().await;

        let outcome = c.advance().await;
        assert_eq!(
            outcome,
            AdvanceOutcome::Rejected {
                step: Step::Quiz,
                reason: validation::SECTOR_REQUIRED.to_string(),
            }
        );
        let state = c.snapshot().await;
        assert_eq!(state.step, Step::Quiz);
        assert!(state.roadmap.is_empty());
        assert!(state.error.is_some());

        c.update_answers(sector("EdTech")).await.unwrap();
        assert_eq!(
            c.advance().await,
            AdvanceOutcome::Moved {
                from: Step::Quiz,
                to: Step::Roadmap
            }
        );
        let state = c.snapshot().await;
        assert!(state.error.is_none(), "error clears on success");
        assert_eq!(state.roadmap.len(), 7);
    }

    #[tokio::test]
    async fn roadmap_is_generated_once() {
        let c = instant_controller();
        c.advance().await;
        c.update_answers(AnswersUpdate {
            sector: Some("FinTech".to_string()),
            employees: Some(3),
            ..Default::default()
        })
        .await
        .unwrap();
        c.advance().await;
        let first = c.snapshot().await.roadmap;
        c.advance().await;
        assert_eq!(c.snapshot().await.roadmap, first);

        let dpiit = first.iter().find(|i| i.title == DPIIT_RECOGNITION).unwrap();
        assert_eq!(dpiit.status, RoadmapStatus::Blocked);
    }

    #[tokio::test]
    async fn documents_need_two_files() {
        let c = instant_controller();
        c.advance().await;
        c.update_answers(sector("SaaS")).await.unwrap();
        c.advance().await;
        c.advance().await;

        let outcome = c.advance().await;
        assert!(matches!(outcome, AdvanceOutcome::Rejected { .. }));

        c.receive_file(UploadedFile::new("pan.pdf", 1)).await.unwrap();
        let outcome = c.advance().await;
        assert_eq!(
            outcome,
            AdvanceOutcome::Rejected {
                step: Step::Documents,
                reason: "PAN & Aadhaar required".to_string(),
            }
        );
        assert_eq!(c.current_step().await, Step::Documents);
        assert!(!c.snapshot().await.busy);

        c.receive_file(UploadedFile::new("aadhaar.pdf", 1)).await.unwrap();
        assert_eq!(
            c.advance().await,
            AdvanceOutcome::Moved {
                from: Step::Documents,
                to: Step::Incorporation
            }
        );
    }

    #[tokio::test]
    async fn files_rejected_outside_documents() {
        let c = instant_controller();
        let err = c
            .receive_file(UploadedFile::new("early.pdf", 10))
            .await
            .unwrap_err();
        assert!(matches!(err, WizardError::WrongStep { step: Step::Welcome, .. }));
        assert!(c.snapshot().await.files.is_empty());
    }

    #[tokio::test]
    async fn answers_locked_outside_quiz() {
        let c = instant_controller();
        assert!(c.update_answers(sector("SaaS")).await.is_err());
        assert_eq!(c.snapshot().await.answers, QuizAnswers::default());
    }

    #[tokio::test]
    async fn concurrent_advance_transitions_once() {
        let backend = Arc::new(GatedBackend::default());
        let c = Arc::new(controller_with(backend.clone()));
        at_documents(&c).await;

        let first = tokio::spawn({
            let c = Arc::clone(&c);
            async move { c.advance().await }
        });
        backend.entered.notified().await;

        assert!(c.snapshot().await.busy);
        assert_eq!(c.advance().await, AdvanceOutcome::Ignored);
        assert!(!c.reset().await, "reset is dropped while busy");

        backend.release.notify_one();
        let outcome = first.await.unwrap();
        assert_eq!(
            outcome,
            AdvanceOutcome::Moved {
                from: Step::Documents,
                to: Step::Incorporation
            }
        );
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);

        let state = c.snapshot().await;
        assert_eq!(state.step, Step::Incorporation);
        assert!(!state.busy);
    }

    #[tokio::test]
    async fn backend_failure_is_retryable() {
        let c = controller_with(Arc::new(FlakyBackend::default()));
        at_documents(&c).await;

        let outcome = c.advance().await;
        assert_eq!(
            outcome,
            AdvanceOutcome::Rejected {
                step: Step::Documents,
                reason: "Registry unavailable".to_string(),
            }
        );
        let state = c.snapshot().await;
        assert_eq!(state.step, Step::Documents);
        assert!(!state.busy);
        assert_eq!(state.error.as_deref(), Some("Registry unavailable"));

        assert!(matches!(c.advance().await, AdvanceOutcome::Moved { .. }));
        assert!(c.snapshot().await.error.is_none());
    }

    #[tokio::test]
    async fn submission_stores_receipt() {
        let c = instant_controller();
        at_documents(&c).await;
        c.advance().await;
        assert_eq!(c.current_step().await, Step::Incorporation);

        c.advance().await;
        let state = c.snapshot().await;
        assert_eq!(state.step, Step::Compliance);
        let receipt = state.registration.expect("receipt after filing");
        assert_eq!(receipt.status, "Submitted");
        assert!(receipt.registration_id.starts_with("U72900DL"));
    }

    #[tokio::test]
    async fn done_is_terminal_until_reset() {
        let c = instant_controller();
        at_documents(&c).await;
        for _ in 0..3 {
            c.advance().await;
        }
        assert_eq!(c.current_step().await, Step::Done);
        assert_eq!(c.advance().await, AdvanceOutcome::Terminal);

        assert!(c.reset().await);
        let state = c.snapshot().await;
        assert_eq!(state, WizardState::default());
    }

    #[tokio::test]
    async fn end_to_end_walkthrough() {
        let c = instant_controller();
        c.advance().await;
        assert_eq!(c.current_step().await, Step::Quiz);

        c.update_answers(AnswersUpdate {
            sector: Some("SaaS".to_string()),
            employees: Some(12),
            ..Default::default()
        })
        .await
        .unwrap();
        c.advance().await;

        let state = c.snapshot().await;
        assert_eq!(state.step, Step::Roadmap);
        assert_eq!(state.roadmap.len(), 7);
        let status = |title: &str| {
            state
                .roadmap
                .iter()
                .find(|i| i.title == title)
                .map(|i| i.status)
        };
        assert_eq!(status(PF_ESIC), Some(RoadmapStatus::Pending));
        assert_eq!(status(DPIIT_RECOGNITION), Some(RoadmapStatus::Pending));

        c.advance().await;
        assert_eq!(c.current_step().await, Step::Documents);
        c.receive_file(UploadedFile::new("A", 100)).await.unwrap();
        c.receive_file(UploadedFile::new("B", 200)).await.unwrap();

        for expected in [Step::Incorporation, Step::Compliance, Step::Done] {
            c.advance().await;
            assert_eq!(c.current_step().await, expected);
        }

        let view = c.view().await;
        assert_eq!(view.progress_percent, None);
        assert_eq!(view.roadmap_summary.total_days, 37);
        assert_eq!(view.roadmap_summary.active_days, 37);
    }
}
