#![forbid(unsafe_code)]

pub mod contract;
pub mod http;
pub mod wire;

pub use contract::{GatewayError, InMemoryGateway, SessionGateway};
pub use http::{GatewayConfig, HttpSessionGateway};
pub use wire::{AssignmentReportDto, GroupProgressDto, ModuleProgressDto, WireError};
