use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use assess_core::Clock;
use assess_core::actions::LaunchKind;
use assess_core::model::{AssignmentId, ExamTakerId, GroupProgress, ModuleProgressId};

use gateway::SessionGateway;

use crate::error::ExecutionError;
use crate::refresh::{any_module_open, remaining_minutes_by_module, timer_crossed_zero};
use crate::view::{ModuleListItem, module_items};

//
// ─── EXECUTION SESSION ─────────────────────────────────────────────────────────
//

/// Client-held state for one exam-taker working through a group.
///
/// Holds the last fetched snapshot list and nothing derived from it except
/// the remaining-minutes capture used for the zero-crossing check. Status is
/// never mutated locally; every transition replaces the whole list with the
/// server's response.
pub struct ExecutionSession {
    exam_taker: ExamTakerId,
    assignment: AssignmentId,
    group: GroupProgress,
    fetched_at: DateTime<Utc>,
    last_remaining: HashMap<ModuleProgressId, i64>,
    launching: bool,
    pending_launch: Option<ModuleProgressId>,
}

impl ExecutionSession {
    fn new(
        exam_taker: ExamTakerId,
        assignment: AssignmentId,
        group: GroupProgress,
        now: DateTime<Utc>,
    ) -> Self {
        let last_remaining = remaining_minutes_by_module(&group, chrono::Duration::zero());
        Self {
            exam_taker,
            assignment,
            group,
            fetched_at: now,
            last_remaining,
            launching: false,
            pending_launch: None,
        }
    }

    fn replace_group(&mut self, group: GroupProgress, now: DateTime<Utc>) {
        self.last_remaining = remaining_minutes_by_module(&group, chrono::Duration::zero());
        self.group = group;
        self.fetched_at = now;
    }

    #[must_use]
    pub fn exam_taker(&self) -> ExamTakerId {
        self.exam_taker
    }

    #[must_use]
    pub fn assignment(&self) -> AssignmentId {
        self.assignment
    }

    #[must_use]
    pub fn group(&self) -> &GroupProgress {
        &self.group
    }

    #[must_use]
    pub fn is_launching(&self) -> bool {
        self.launching
    }

    #[must_use]
    pub fn pending_launch(&self) -> Option<ModuleProgressId> {
        self.pending_launch
    }

    /// Display rows for the execution screen, re-derived on demand.
    #[must_use]
    pub fn module_items(&self) -> Vec<ModuleListItem> {
        module_items(&self.group)
    }
}

impl fmt::Debug for ExecutionSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionSession")
            .field("exam_taker", &self.exam_taker)
            .field("assignment", &self.assignment)
            .field("modules_len", &self.group.len())
            .field("fetched_at", &self.fetched_at)
            .field("launching", &self.launching)
            .field("pending_launch", &self.pending_launch)
            .finish_non_exhaustive()
    }
}

//
// ─── EXECUTION SERVICE ─────────────────────────────────────────────────────────
//

/// Outcome of a periodic tick or a visibility-regain check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Snapshots were refetched from the session service.
    Refetched,
    /// Only the displayed countdowns needed re-deriving.
    RenderOnly,
}

/// Orchestrates fetches and module launches against the session service.
#[derive(Clone)]
pub struct ExecutionService {
    clock: Clock,
    gateway: Arc<dyn SessionGateway>,
}

impl ExecutionService {
    #[must_use]
    pub fn new(clock: Clock, gateway: Arc<dyn SessionGateway>) -> Self {
        Self { clock, gateway }
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Fetch the initial snapshot list and open an execution session.
    ///
    /// # Errors
    ///
    /// Returns `ExecutionError::Gateway` when the fetch fails.
    pub async fn load(
        &self,
        exam_taker: ExamTakerId,
        assignment: AssignmentId,
    ) -> Result<ExecutionSession, ExecutionError> {
        let group = self
            .gateway
            .fetch_group_progress(exam_taker, assignment)
            .await?;
        Ok(ExecutionSession::new(
            exam_taker,
            assignment,
            group,
            self.clock.now(),
        ))
    }

    /// Launch or continue a module.
    ///
    /// A `NotStarted` module requests creation of a new progress record; an
    /// `InProgress` module fetches the existing one. Either way the session's
    /// snapshot list is replaced wholesale by the server's response. On
    /// failure the guard and the pending selection are cleared and the
    /// snapshot list stays exactly as last fetched.
    ///
    /// # Errors
    ///
    /// Returns `ExecutionError::LaunchInFlight` while another launch is
    /// pending, `ExecutionError::ModuleNotFound` for an unknown id,
    /// `ExecutionError::NotActionable` for a module whose status offers no
    /// action, and `ExecutionError::Gateway` for upstream failures.
    pub async fn launch(
        &self,
        session: &mut ExecutionSession,
        module: ModuleProgressId,
    ) -> Result<LaunchKind, ExecutionError> {
        if session.launching {
            return Err(ExecutionError::LaunchInFlight);
        }
        let snapshot = session
            .group
            .find(module)
            .ok_or(ExecutionError::ModuleNotFound(module))?;
        let kind = LaunchKind::for_status(snapshot.status)
            .ok_or(ExecutionError::NotActionable(module))?;
        let assessment_module_id = snapshot.assessment_module_id;

        session.launching = true;
        session.pending_launch = Some(module);
        tracing::debug!(%module, ?kind, "launching module");

        let result = match kind {
            LaunchKind::Create => {
                self.gateway
                    .create_module_progress(session.exam_taker, assessment_module_id)
                    .await
            }
            LaunchKind::Resume => {
                self.gateway
                    .fetch_module_progress(session.exam_taker, module)
                    .await
            }
        };

        session.launching = false;
        session.pending_launch = None;
        match result {
            Ok(group) => {
                session.replace_group(group, self.clock.now());
                Ok(kind)
            }
            Err(err) => {
                tracing::warn!(%module, error = %err, "module launch failed");
                Err(err.into())
            }
        }
    }

    /// Refetch the snapshot list, replacing local state with server truth.
    ///
    /// # Errors
    ///
    /// Returns `ExecutionError::Gateway` on fetch failure; the session keeps
    /// its prior snapshots.
    pub async fn refresh(&self, session: &mut ExecutionSession) -> Result<(), ExecutionError> {
        let group = self
            .gateway
            .fetch_group_progress(session.exam_taker, session.assignment)
            .await?;
        session.replace_group(group, self.clock.now());
        Ok(())
    }

    /// Periodic countdown pass, intended to run every [`crate::TICK_INTERVAL`].
    ///
    /// Recomputes the remaining-minutes capture and refetches only when a
    /// started module's countdown crossed zero since the previous pass, since
    /// that crossing implies the backend may have flipped the module to
    /// `TimeElapsed` and unlocked its successor.
    ///
    /// # Errors
    ///
    /// Returns `ExecutionError::Gateway` when the triggered refetch fails.
    /// The crossing is consumed either way; the next user action or tick
    /// decides any retry.
    pub async fn tick(&self, session: &mut ExecutionSession) -> Result<TickOutcome, ExecutionError> {
        let elapsed = self.clock.now() - session.fetched_at;
        let current = remaining_minutes_by_module(&session.group, elapsed);
        let crossed = timer_crossed_zero(&session.last_remaining, &current, &session.group);
        session.last_remaining = current;

        if !crossed {
            return Ok(TickOutcome::RenderOnly);
        }
        tracing::debug!("countdown crossed zero, refetching snapshots");
        self.refresh(session).await?;
        Ok(TickOutcome::Refetched)
    }

    /// Visibility-regain check: refetch when any module is still open.
    ///
    /// # Errors
    ///
    /// Returns `ExecutionError::Gateway` when the refetch fails.
    pub async fn on_visibility_regained(
        &self,
        session: &mut ExecutionSession,
    ) -> Result<TickOutcome, ExecutionError> {
        if !any_module_open(&session.group) {
            return Ok(TickOutcome::RenderOnly);
        }
        self.refresh(session).await?;
        Ok(TickOutcome::Refetched)
    }
}
