use async_trait::async_trait;
use std::sync::Mutex;
use thiserror::Error;

use assess_core::Clock;
use assess_core::model::{
    AssessmentModuleId, AssignmentId, AssignmentReport, ExamTakerId, GroupProgress,
    ModuleProgressId, ModuleStatus,
};
use assess_core::time::HmsDuration;

use crate::wire::WireError;

/// Errors surfaced by session gateway adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GatewayError {
    #[error("not found")]
    NotFound,

    #[error("session service unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    InvalidPayload(#[from] WireError),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Contract for the upstream session/reporting service.
///
/// The backend is the source of truth for every status; calls that follow a
/// transition therefore return the *full refreshed snapshot list*, never a
/// single mutated row, and the client replaces its state wholesale.
#[async_trait]
pub trait SessionGateway: Send + Sync {
    /// Fetch the current group snapshot for one exam-taker and assignment.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the snapshot cannot be fetched or decoded.
    async fn fetch_group_progress(
        &self,
        exam_taker: ExamTakerId,
        assignment: AssignmentId,
    ) -> Result<GroupProgress, GatewayError>;

    /// Create a progress record for a first module launch.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if creation fails; no local state may change.
    async fn create_module_progress(
        &self,
        exam_taker: ExamTakerId,
        module: AssessmentModuleId,
    ) -> Result<GroupProgress, GatewayError>;

    /// Fetch the existing progress record when continuing a started module.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::NotFound` if the record is missing.
    async fn fetch_module_progress(
        &self,
        exam_taker: ExamTakerId,
        progress: ModuleProgressId,
    ) -> Result<GroupProgress, GatewayError>;

    /// Fetch the reporting view for one exam-taker and assignment.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the report cannot be fetched or decoded.
    async fn fetch_assignment_report(
        &self,
        exam_taker: ExamTakerId,
        assignment: AssignmentId,
    ) -> Result<AssignmentReport, GatewayError>;
}

//
// ─── IN-MEMORY GATEWAY ─────────────────────────────────────────────────────────
//

#[derive(Debug, Default)]
struct InMemoryState {
    group: Option<GroupProgress>,
    report: Option<AssignmentReport>,
    fail_next: Option<String>,
    fetch_calls: u32,
    create_calls: u32,
    resume_calls: u32,
    report_calls: u32,
}

/// Scriptable gateway for tests.
///
/// Behaves like a miniature backend: a launch flips the target module to
/// `InProgress`, stamps `started_at` from the clock, and seeds the countdown
/// with the full configured duration. `fail_next_with` injects a one-shot
/// failure for exercising error paths.
pub struct InMemoryGateway {
    clock: Clock,
    state: Mutex<InMemoryState>,
}

impl InMemoryGateway {
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self {
            clock,
            state: Mutex::new(InMemoryState::default()),
        }
    }

    pub fn set_group(&self, group: GroupProgress) {
        self.lock().group = Some(group);
    }

    pub fn set_report(&self, report: AssignmentReport) {
        self.lock().report = Some(report);
    }

    /// The next call, whichever it is, fails with `Unavailable(message)`.
    pub fn fail_next_with(&self, message: impl Into<String>) {
        self.lock().fail_next = Some(message.into());
    }

    #[must_use]
    pub fn fetch_count(&self) -> u32 {
        self.lock().fetch_calls
    }

    #[must_use]
    pub fn create_count(&self) -> u32 {
        self.lock().create_calls
    }

    #[must_use]
    pub fn resume_count(&self) -> u32 {
        self.lock().resume_calls
    }

    #[must_use]
    pub fn report_count(&self) -> u32 {
        self.lock().report_calls
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, InMemoryState> {
        self.state.lock().expect("in-memory gateway lock poisoned")
    }

    fn take_failure(state: &mut InMemoryState) -> Result<(), GatewayError> {
        match state.fail_next.take() {
            Some(message) => Err(GatewayError::Unavailable(message)),
            None => Ok(()),
        }
    }

    fn current_group(state: &InMemoryState) -> Result<GroupProgress, GatewayError> {
        state.group.clone().ok_or(GatewayError::NotFound)
    }
}

#[async_trait]
impl SessionGateway for InMemoryGateway {
    async fn fetch_group_progress(
        &self,
        _exam_taker: ExamTakerId,
        _assignment: AssignmentId,
    ) -> Result<GroupProgress, GatewayError> {
        let mut state = self.lock();
        state.fetch_calls += 1;
        Self::take_failure(&mut state)?;
        Self::current_group(&state)
    }

    async fn create_module_progress(
        &self,
        _exam_taker: ExamTakerId,
        module: AssessmentModuleId,
    ) -> Result<GroupProgress, GatewayError> {
        let now = self.clock.now();
        let mut state = self.lock();
        state.create_calls += 1;
        Self::take_failure(&mut state)?;

        let group = Self::current_group(&state)?;
        let mut modules = group.modules().to_vec();
        let target = modules
            .iter_mut()
            .find(|m| m.assessment_module_id == module)
            .ok_or(GatewayError::NotFound)?;
        if target.status != ModuleStatus::NotStarted {
            return Err(GatewayError::Unavailable(format!(
                "module {} is not launchable",
                target.id
            )));
        }
        target.status = ModuleStatus::InProgress;
        target.started_at = Some(now);
        if let Some(duration) = target.duration_minutes {
            target.time_remaining = Some(HmsDuration::from_seconds(i64::from(duration) * 60));
        }

        let updated = GroupProgress::new(modules, group.policy())
            .map_err(|e| GatewayError::Unavailable(e.to_string()))?;
        state.group = Some(updated.clone());
        Ok(updated)
    }

    async fn fetch_module_progress(
        &self,
        _exam_taker: ExamTakerId,
        progress: ModuleProgressId,
    ) -> Result<GroupProgress, GatewayError> {
        let mut state = self.lock();
        state.resume_calls += 1;
        Self::take_failure(&mut state)?;

        let group = Self::current_group(&state)?;
        if group.find(progress).is_none() {
            return Err(GatewayError::NotFound);
        }
        Ok(group)
    }

    async fn fetch_assignment_report(
        &self,
        _exam_taker: ExamTakerId,
        _assignment: AssignmentId,
    ) -> Result<AssignmentReport, GatewayError> {
        let mut state = self.lock();
        state.report_calls += 1;
        Self::take_failure(&mut state)?;
        state.report.clone().ok_or(GatewayError::NotFound)
    }
}
