use chrono::{DateTime, Duration, NaiveDateTime, Utc};

/// A simple clock abstraction for deterministic time in services and tests.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    Default,
    Fixed(DateTime<Utc>),
}

impl Clock {
    /// Returns a clock fixed at the given timestamp.
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    /// Returns the current time according to the clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::Default => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }

    /// If this is a fixed clock, advance it by the given duration.
    ///
    /// Has no effect on `Clock::Default`.
    pub fn advance(&mut self, delta: Duration) {
        if let Clock::Fixed(t) = self {
            *t += delta;
        }
    }
}

/// Deterministic timestamp for tests and examples (2025-06-15T15:06:40Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_750_000_000;

/// Returns a deterministic `DateTime<Utc>` for tests and doc examples.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

/// Returns a `Clock` fixed at the deterministic test timestamp.
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}

/// Parses a backend timestamp as UTC.
///
/// The backend serializes instants both with and without a zone suffix.
/// Zone-less strings are interpreted as UTC, never as local time.
#[must_use]
pub fn parse_utc(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }
    None
}

/// Server-calculated remaining time, parsed once from the wire `HH:MM:SS` string.
///
/// Parsing is lenient: absent or unparseable segments count as zero, so a
/// partial or malformed duration degrades to a shorter remaining time instead
/// of failing the whole snapshot.
///
/// # Examples
///
/// ```
/// # use assess_core::time::HmsDuration;
/// assert_eq!(HmsDuration::parse("00:05:30").total_seconds(), 330);
/// assert_eq!(HmsDuration::parse("05:30").total_seconds(), 19_800);
/// assert_eq!(HmsDuration::parse("garbage").total_seconds(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HmsDuration {
    total_seconds: i64,
}

impl HmsDuration {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let mut parts = raw.trim().splitn(3, ':');
        let mut segment = || {
            parts
                .next()
                .and_then(|s| s.trim().parse::<u32>().ok())
                .unwrap_or(0)
        };
        let hours = i64::from(segment());
        let minutes = i64::from(segment());
        let seconds = i64::from(segment());
        Self {
            total_seconds: hours * 3600 + minutes * 60 + seconds,
        }
    }

    #[must_use]
    pub fn from_seconds(total_seconds: i64) -> Self {
        Self { total_seconds }
    }

    #[must_use]
    pub fn total_seconds(&self) -> i64 {
        self.total_seconds
    }

    /// Whole minutes remaining, rounded up.
    #[must_use]
    pub fn whole_minutes(&self) -> i64 {
        minutes_ceil(self.total_seconds)
    }
}

/// Ceiling division of seconds into minutes.
///
/// A countdown with any seconds left still reads as one minute; the display
/// never reaches zero while time remains.
#[must_use]
pub fn minutes_ceil(seconds: i64) -> i64 {
    (seconds + 59).div_euclid(60)
}

/// Formats a minute count as `"Xm"` under an hour, `"Xh Ym"` otherwise.
///
/// # Examples
///
/// ```
/// # use assess_core::time::format_minutes_span;
/// assert_eq!(format_minutes_span(45), "45m");
/// assert_eq!(format_minutes_span(90), "1h 30m");
/// ```
#[must_use]
pub fn format_minutes_span(minutes: i64) -> String {
    if minutes < 60 {
        format!("{minutes}m")
    } else {
        format!("{}h {}m", minutes / 60, minutes % 60)
    }
}
