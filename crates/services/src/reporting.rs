use std::sync::Arc;

use assess_core::Clock;
use assess_core::actions::action_for;
use assess_core::aggregate::{AssignmentStatus, classify_assignment};
use assess_core::model::{
    AssignmentId, ExamTakerId, GroupSchedulingPolicy, ModuleProgressSnapshot, ModuleStatus,
};
use assess_core::timing::classify_timing;

use gateway::SessionGateway;

use crate::error::ReportingError;

/// Per-module row on the reporting screens.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub order_number: u32,
    pub title: String,
    pub status: ModuleStatus,
    pub badge: &'static str,
    pub score_display: Option<String>,
    pub passed: Option<bool>,
    pub completed_display: Option<String>,
}

/// Aggregate status plus the module rows for one exam-taker and assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentReportView {
    pub status: AssignmentStatus,
    pub rows: Vec<ReportRow>,
}

fn score_display(snapshot: &ModuleProgressSnapshot) -> Option<String> {
    match (snapshot.score_percentage, snapshot.passing_score_percentage) {
        (Some(score), Some(passing)) => Some(format!("{score:.0}% / {passing:.0}%")),
        (Some(score), None) => Some(format!("{score:.0}%")),
        _ => None,
    }
}

fn report_row(snapshot: &ModuleProgressSnapshot) -> ReportRow {
    // Report badges reuse the execution mapping; policy messages are not
    // rendered here, so the default policy suffices.
    let action = action_for(snapshot.status, GroupSchedulingPolicy::default());
    let completed_display =
        classify_timing(snapshot).and_then(|timing| timing.completed_display);
    ReportRow {
        order_number: snapshot.order_number,
        title: snapshot.title.clone(),
        status: snapshot.status,
        badge: action.badge.label(),
        score_display: score_display(snapshot),
        passed: snapshot.passed,
        completed_display,
    }
}

/// Reporting facade that owns the time source and the gateway.
#[derive(Clone)]
pub struct ReportingService {
    clock: Clock,
    gateway: Arc<dyn SessionGateway>,
}

impl ReportingService {
    #[must_use]
    pub fn new(clock: Clock, gateway: Arc<dyn SessionGateway>) -> Self {
        Self { clock, gateway }
    }

    /// Classify the aggregate status for one exam-taker and assignment.
    ///
    /// # Errors
    ///
    /// Returns `ReportingError::Gateway` when the report fetch fails.
    pub async fn assignment_status(
        &self,
        exam_taker: ExamTakerId,
        assignment: AssignmentId,
    ) -> Result<AssignmentStatus, ReportingError> {
        let report = self
            .gateway
            .fetch_assignment_report(exam_taker, assignment)
            .await?;
        Ok(classify_assignment(
            report.window,
            &report.modules,
            report.activity,
            self.clock.now(),
        ))
    }

    /// Build the full reporting view: aggregate status plus module rows in
    /// group order.
    ///
    /// # Errors
    ///
    /// Returns `ReportingError::Gateway` when the report fetch fails.
    pub async fn assignment_report(
        &self,
        exam_taker: ExamTakerId,
        assignment: AssignmentId,
    ) -> Result<AssignmentReportView, ReportingError> {
        let report = self
            .gateway
            .fetch_assignment_report(exam_taker, assignment)
            .await?;
        let status = classify_assignment(
            report.window,
            &report.modules,
            report.activity,
            self.clock.now(),
        );
        tracing::debug!(%assignment, %exam_taker, status = %status, "classified assignment");

        let mut modules = report.modules;
        modules.sort_by_key(|m| m.order_number);
        let rows = modules.iter().map(report_row).collect();

        Ok(AssignmentReportView { status, rows })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use assess_core::model::{AssessmentModuleId, ModuleProgressId};
    use assess_core::time::fixed_now;
    use uuid::Uuid;

    fn module(order_number: u32, status: ModuleStatus) -> ModuleProgressSnapshot {
        ModuleProgressSnapshot {
            id: ModuleProgressId::new(Uuid::new_v4()),
            order_number,
            assessment_module_id: AssessmentModuleId::new(Uuid::new_v4()),
            title: format!("Module {order_number}"),
            description: None,
            status,
            started_at: None,
            completed_at: None,
            duration_minutes: None,
            time_remaining: None,
            passed: None,
            score_percentage: None,
            passing_score_percentage: None,
        }
    }

    #[test]
    fn score_display_renders_pass_mark_when_known() {
        let mut m = module(1, ModuleStatus::Completed);
        m.score_percentage = Some(82.4);
        m.passing_score_percentage = Some(60.0);
        assert_eq!(score_display(&m).as_deref(), Some("82% / 60%"));

        m.passing_score_percentage = None;
        assert_eq!(score_display(&m).as_deref(), Some("82%"));

        m.score_percentage = None;
        assert_eq!(score_display(&m), None);
    }

    #[test]
    fn report_row_carries_badge_and_completion() {
        let mut m = module(1, ModuleStatus::Completed);
        m.started_at = Some(fixed_now());
        m.completed_at = Some(fixed_now());
        m.passed = Some(true);

        let row = report_row(&m);
        assert_eq!(row.badge, "Completed");
        assert_eq!(row.passed, Some(true));
        assert_eq!(
            row.completed_display.as_deref(),
            Some("2025-06-15T15:06:40+00:00")
        );
    }
}
