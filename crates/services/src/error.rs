//! Shared error types for the services crate.

use thiserror::Error;

use assess_core::model::ModuleProgressId;
use gateway::GatewayError;

/// Errors emitted by `ExecutionService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExecutionError {
    #[error("a module launch is already in flight")]
    LaunchInFlight,

    #[error("module progress {0} is not part of the current group")]
    ModuleNotFound(ModuleProgressId),

    #[error("module progress {0} is not actionable in its current status")]
    NotActionable(ModuleProgressId),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Errors emitted by `ReportingService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReportingError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}
