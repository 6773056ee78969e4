mod assignment;
mod group;
mod ids;
mod module;

pub use assignment::{AssignmentActivity, AssignmentReport, AssignmentWindow, WindowState};
pub use group::{GroupProgress, GroupProgressError, GroupSchedulingPolicy};
pub use ids::{AssessmentModuleId, AssignmentId, ExamTakerId, ModuleProgressId, ParseIdError};
pub use module::{ModuleProgressSnapshot, ModuleStatus, ModuleStatusError};

#[cfg(test)]
pub(crate) mod test_support {
    use uuid::Uuid;

    use super::{AssessmentModuleId, ModuleProgressId, ModuleProgressSnapshot, ModuleStatus};

    /// Bare snapshot with no timing data, suitable as a baseline in tests.
    pub(crate) fn snapshot(order_number: u32, status: ModuleStatus) -> ModuleProgressSnapshot {
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
}
