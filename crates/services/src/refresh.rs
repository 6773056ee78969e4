//! Refetch triggers for the execution screen.
//!
//! The backend cannot push status changes, so the screen polls: a re-render
//! pass runs every [`TICK_INTERVAL`] to refresh displayed countdowns, and a
//! full refetch fires only when a countdown crosses zero (the backend may
//! have flipped the module to `TimeElapsed` and unlocked the next one) or
//! when the tab regains visibility with a module still open. Both conditions
//! are pure predicates over remaining-minutes maps so a push/subscription
//! mechanism could replace the polling without touching classification.

use chrono::Duration as ChronoDuration;
use std::collections::HashMap;
use std::time::Duration;

use assess_core::model::{GroupProgress, ModuleProgressId, ModuleStatus};
use assess_core::time::minutes_ceil;

/// Cadence of the countdown re-render pass.
pub const TICK_INTERVAL: Duration = Duration::from_secs(60);

/// Remaining whole minutes per started module, adjusted for the time elapsed
/// since the snapshots were fetched.
///
/// This map is the only client-held derived state; it exists solely so
/// consecutive captures can be compared for a zero crossing.
#[must_use]
pub fn remaining_minutes_by_module(
    group: &GroupProgress,
    elapsed_since_fetch: ChronoDuration,
) -> HashMap<ModuleProgressId, i64> {
    let elapsed_seconds = elapsed_since_fetch.num_seconds();
    group
        .modules()
        .iter()
        .filter(|m| m.duration_minutes.is_some() && m.is_started())
        .filter_map(|m| {
            let remaining = m.time_remaining?;
            Some((m.id, minutes_ceil(remaining.total_seconds() - elapsed_seconds)))
        })
        .collect()
}

/// True when some module with an active start went from positive to
/// non-positive remaining minutes between the two captures.
#[must_use]
pub fn timer_crossed_zero(
    previous: &HashMap<ModuleProgressId, i64>,
    current: &HashMap<ModuleProgressId, i64>,
    group: &GroupProgress,
) -> bool {
    group
        .modules()
        .iter()
        .filter(|m| m.is_open() && m.status != ModuleStatus::Completed)
        .any(|m| {
            let before = previous.get(&m.id).copied();
            let after = current.get(&m.id).copied();
            matches!((before, after), (Some(b), Some(a)) if b > 0 && a <= 0)
        })
}

/// True when any module is started but not completed.
///
/// While such a module exists, time kept passing while the tab was hidden
/// and the local countdown cannot be trusted.
#[must_use]
pub fn any_module_open(group: &GroupProgress) -> bool {
    group.modules().iter().any(|m| m.is_open())
}
