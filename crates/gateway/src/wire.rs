use serde::Deserialize;
use thiserror::Error;

use assess_core::model::{
    AssignmentActivity, AssignmentReport, AssignmentWindow, GroupProgress, GroupProgressError,
    ModuleProgressSnapshot, ModuleStatus, ModuleStatusError,
};
use assess_core::time::{HmsDuration, parse_utc};

/// Errors raised while converting backend payloads into domain types.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WireError {
    #[error("invalid id in field {field}: {value:?}")]
    InvalidId { field: &'static str, value: String },

    #[error("invalid timestamp in field {field}: {value:?}")]
    InvalidTimestamp { field: &'static str, value: String },

    #[error(transparent)]
    Status(#[from] ModuleStatusError),

    #[error(transparent)]
    Group(#[from] GroupProgressError),
}

/// Backend shape of one module progress row.
///
/// All parsing into typed values happens in `into_snapshot`, exactly once;
/// downstream code never compares raw status strings or re-parses
/// timestamps. Timestamps without a zone suffix are read as UTC.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleProgressDto {
    pub id: String,
    pub order_number: u32,
    pub assessment_module_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: String,
    #[serde(default)]
    pub started_at_utc: Option<String>,
    #[serde(default)]
    pub completed_at_utc: Option<String>,
    #[serde(default)]
    pub duration_in_minutes: Option<u32>,
    #[serde(default)]
    pub time_remaining: Option<String>,
    #[serde(default)]
    pub passed: Option<bool>,
    #[serde(default)]
    pub score_percentage: Option<f64>,
    #[serde(default)]
    pub passing_score_percentage: Option<f64>,
}

fn parse_timestamp(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<chrono::DateTime<chrono::Utc>>, WireError> {
    match value {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => parse_utc(raw)
            .map(Some)
            .ok_or_else(|| WireError::InvalidTimestamp {
                field,
                value: raw.to_string(),
            }),
    }
}

impl ModuleProgressDto {
    /// Convert the wire row into a typed snapshot.
    ///
    /// # Errors
    ///
    /// Returns `WireError` for malformed ids, unknown status values, or
    /// unparseable timestamps. A malformed `timeRemaining` string is not an
    /// error; its bad segments read as zero.
    pub fn into_snapshot(self) -> Result<ModuleProgressSnapshot, WireError> {
        let id = self.id.parse().map_err(|_| WireError::InvalidId {
            field: "id",
            value: self.id.clone(),
        })?;
        let assessment_module_id =
            self.assessment_module_id
                .parse()
                .map_err(|_| WireError::InvalidId {
                    field: "assessmentModuleId",
                    value: self.assessment_module_id.clone(),
                })?;
        let status = ModuleStatus::from_wire(&self.status)?;
        let started_at = parse_timestamp("startedAtUtc", self.started_at_utc.as_deref())?;
        let completed_at = parse_timestamp("completedAtUtc", self.completed_at_utc.as_deref())?;

        Ok(ModuleProgressSnapshot {
            id,
            order_number: self.order_number,
            assessment_module_id,
            title: self.title,
            description: self.description,
            status,
            started_at,
            completed_at,
            duration_minutes: self.duration_in_minutes,
            time_remaining: self.time_remaining.as_deref().map(HmsDuration::parse),
            passed: self.passed,
            score_percentage: self.score_percentage,
            passing_score_percentage: self.passing_score_percentage,
        })
    }
}

/// Backend shape of the group snapshot query result.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupProgressDto {
    #[serde(default)]
    pub modules: Vec<ModuleProgressDto>,
    pub is_member_order_locked: bool,
    pub wait_module_completion: bool,
}

impl GroupProgressDto {
    /// # Errors
    ///
    /// Returns `WireError` when a row fails conversion or the sequencing
    /// invariant (unique order numbers) does not hold.
    pub fn into_domain(self) -> Result<GroupProgress, WireError> {
        let policy = assess_core::model::GroupSchedulingPolicy {
            is_member_order_locked: self.is_member_order_locked,
            wait_module_completion: self.wait_module_completion,
        };
        let modules = self
            .modules
            .into_iter()
            .map(ModuleProgressDto::into_snapshot)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(GroupProgress::new(modules, policy)?)
    }
}

/// Backend shape of the assignment/exam-taker reporting query result.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentReportDto {
    #[serde(default)]
    pub start_date_utc: Option<String>,
    #[serde(default)]
    pub end_date_utc: Option<String>,
    #[serde(default)]
    pub started_at_utc: Option<String>,
    #[serde(default)]
    pub completed_at_utc: Option<String>,
    #[serde(default)]
    pub modules: Vec<ModuleProgressDto>,
}

impl AssignmentReportDto {
    /// # Errors
    ///
    /// Returns `WireError` when any row or timestamp fails conversion.
    pub fn into_domain(self) -> Result<AssignmentReport, WireError> {
        let window = AssignmentWindow::new(
            parse_timestamp("startDateUtc", self.start_date_utc.as_deref())?,
            parse_timestamp("endDateUtc", self.end_date_utc.as_deref())?,
        );
        let activity = AssignmentActivity {
            started_at: parse_timestamp("startedAtUtc", self.started_at_utc.as_deref())?,
            completed_at: parse_timestamp("completedAtUtc", self.completed_at_utc.as_deref())?,
        };
        let modules = self
            .modules
            .into_iter()
            .map(ModuleProgressDto::into_snapshot)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(AssignmentReport {
            window,
            activity,
            modules,
        })
    }
}
