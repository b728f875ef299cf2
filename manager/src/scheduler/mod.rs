//! Cron-based scheduling for handover automation
//!
//! This module decides *when* automated actions fire and guarantees each
//! action fires at most once per due occurrence:
//!
//! - `cron` - five-field cron expressions parsed once into tagged variants,
//!   then matched against an instant as a pure function
//! - `gate` - the due-occurrence gate: cron match plus a minimum spacing
//!   floor so a schedule never fires twice inside one matching minute
//! - `poller` - the recurring tick that evaluates enabled schedules and
//!   executes due actions, committing fire state only after success
//!
//! Expressions use the 5-field format `minute hour day month dayofweek`
//! (no seconds), e.g. `"0 17 * * *"` for daily at 17:00 in the configured
//! timezone.

pub mod cron;
pub mod gate;
pub mod poller;

pub use cron::{CronField, CronSchedule};
pub use poller::CommentPoller;
