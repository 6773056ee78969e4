#![forbid(unsafe_code)]

pub mod error;
pub mod execution;
pub mod refresh;
pub mod reporting;
pub mod view;

pub use assess_core::Clock;

pub use error::{ExecutionError, ReportingError};
pub use execution::{ExecutionService, ExecutionSession, TickOutcome};
pub use refresh::TICK_INTERVAL;
pub use reporting::{AssignmentReportView, ReportRow, ReportingService};
pub use view::ModuleListItem;
