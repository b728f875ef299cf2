//! Due-occurrence gate.
//!
//! A schedule is due when its cron expression matches the current instant
//! AND it has not fired within the minimum spacing window. The 60-second
//! floor combined with per-minute cron granularity makes the gate idempotent
//! across repeated polls inside one matching minute, with no persisted
//! "already fired this minute" flag.

use chrono::{DateTime, Duration, TimeZone, Utc};
use tracing::warn;

use crate::constants::scheduler::MIN_FIRE_SPACING_SECONDS;

use super::cron::CronSchedule;

/// Whether the schedule is due at `now`. `last_fired_at` is the persisted
/// fire state (None means never fired).
pub fn is_due<Tz: TimeZone>(
    schedule: &CronSchedule,
    last_fired_at: Option<DateTime<Utc>>,
    now: &DateTime<Tz>,
) -> bool {
    if let Some(last_fired) = last_fired_at {
        let elapsed = now.clone().with_timezone(&Utc) - last_fired;
        if elapsed < Duration::seconds(MIN_FIRE_SPACING_SECONDS) {
            return false;
        }
    }
    schedule.matches(now)
}

/// Gate over a raw expression. Malformed expressions are logged and never
/// due; scheduling faults must not propagate into the poll loop.
pub fn expression_is_due<Tz: TimeZone>(
    expression: &str,
    last_fired_at: Option<DateTime<Utc>>,
    now: &DateTime<Tz>,
) -> bool {
    match CronSchedule::parse(expression) {
        Ok(schedule) => is_due(&schedule, last_fired_at, now),
        Err(e) => {
            warn!("Treating schedule as never due: {}", e);
            false
        }
    }
}
