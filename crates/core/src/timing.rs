use crate::model::{ModuleProgressSnapshot, ModuleStatus};
use crate::time::format_minutes_span;

//
// ─── URGENCY ───────────────────────────────────────────────────────────────────
//

/// Color-coding tier for a remaining-minutes figure.
///
/// A short untimed-so-far module is flagged the same way a nearly-expired
/// one is, so the tiers apply to configured durations as well as countdowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    Urgent,
    Warning,
    Normal,
}

impl Urgency {
    /// # Examples
    ///
    /// ```
    /// # use assess_core::timing::Urgency;
    /// assert_eq!(Urgency::from_minutes(5), Urgency::Urgent);
    /// assert_eq!(Urgency::from_minutes(25), Urgency::Warning);
    /// assert_eq!(Urgency::from_minutes(90), Urgency::Normal);
    /// ```
    #[must_use]
    pub fn from_minutes(minutes: i64) -> Self {
        if minutes <= 10 {
            Self::Urgent
        } else if minutes <= 30 {
            Self::Warning
        } else {
            Self::Normal
        }
    }
}

//
// ─── MODULE TIMING ─────────────────────────────────────────────────────────────
//

/// Display-ready timing facts derived from a single snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModuleTiming {
    pub remaining_display: Option<String>,
    pub remaining_minutes: Option<i64>,
    pub duration_display: Option<String>,
    pub completed_display: Option<String>,
}

impl ModuleTiming {
    fn is_empty(&self) -> bool {
        self.remaining_display.is_none()
            && self.remaining_minutes.is_none()
            && self.duration_display.is_none()
            && self.completed_display.is_none()
    }

    #[must_use]
    pub fn urgency(&self) -> Option<Urgency> {
        self.remaining_minutes.map(Urgency::from_minutes)
    }
}

/// Classifies one module's timing data for display.
///
/// Rules, in precedence order:
///
/// 1. Neither `started_at` nor `duration_minutes` set: no timing data at all.
/// 2. Both set and the module is not `Completed`: the server-calculated
///    remaining time, rounded up to whole minutes, becomes the countdown.
///    At zero or below nothing is shown; expiry is the status badge's job.
/// 3. A configured duration on a module that has not started: the duration
///    itself is displayed (doubling as the remaining figure, so short modules
///    pick up the same color-coding a nearly-expired one would).
/// 4. Independently of the above, a completion timestamp renders as the UTC
///    instant in RFC 3339.
///
/// Idempotent: the same snapshot always yields the same output.
#[must_use]
pub fn classify_timing(snapshot: &ModuleProgressSnapshot) -> Option<ModuleTiming> {
    if snapshot.started_at.is_none() && snapshot.duration_minutes.is_none() {
        return None;
    }

    let mut timing = ModuleTiming::default();
    let not_completed = snapshot.status != ModuleStatus::Completed;

    match snapshot.duration_minutes {
        Some(_) if snapshot.started_at.is_some() => {
            if not_completed {
                let minutes = snapshot
                    .time_remaining
                    .map_or(0, |remaining| remaining.whole_minutes());
                if minutes > 0 {
                    timing.remaining_display =
                        Some(format!("{} remaining", format_minutes_span(minutes)));
                    timing.remaining_minutes = Some(minutes);
                }
            }
        }
        Some(duration) if not_completed => {
            let span = format_minutes_span(i64::from(duration));
            timing.duration_display = Some(span.clone());
            timing.remaining_display = Some(span);
            timing.remaining_minutes = Some(i64::from(duration));
        }
        _ => {}
    }

    if let Some(completed_at) = snapshot.completed_at {
        timing.completed_display = Some(completed_at.to_rfc3339());
    }

    if timing.is_empty() { None } else { Some(timing) }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
