//! The recurring poll tick.
//!
//! A single timer drives the poller; it holds no per-schedule state between
//! ticks - fire state lives in the database. Each tick reads the global
//! enabled flag once, evaluates all enabled schedules through a pure
//! decision step, then executes the due actions. One schedule's failure is
//! logged and never blocks its siblings, and fire state is committed only
//! after the action confirmed success.

use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::constants::settings;
use crate::database::{CommentType, Database, ScheduledCommentRecord};
use crate::dispatch::{render_anchor_message, HandoverDispatcher};
use crate::jira::JiraClient;
use crate::slack::SlackClient;

use super::gate;

/// The two daily handover shifts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shift {
    Evening,
    Night,
}

impl Shift {
    pub fn label(&self) -> &'static str {
        match self {
            Shift::Evening => "evening",
            Shift::Night => "night",
        }
    }

    pub fn token_key(&self) -> &'static str {
        match self {
            Shift::Evening => settings::EVENING_USER_TOKEN,
            Shift::Night => settings::NIGHT_USER_TOKEN,
        }
    }

    pub fn last_fired_key(&self) -> &'static str {
        match self {
            Shift::Evening => settings::EVENING_LAST_FIRED,
            Shift::Night => settings::NIGHT_LAST_FIRED,
        }
    }
}

/// An action the evaluation step decided is due this tick
#[derive(Debug, Clone)]
pub enum DueAction {
    /// Post a scheduled comment to its Jira ticket
    JiraComment(ScheduledCommentRecord),
    /// Post the shift's handover anchor message, then scan-and-reply
    ShiftHandover(Shift),
}

/// Everything a tick's decision step reads, loaded up front so evaluation
/// itself is pure and unit-testable without mocking I/O
#[derive(Debug, Clone, Default)]
pub struct TickSnapshot {
    pub schedules: Vec<ScheduledCommentRecord>,
    pub trigger_time_1: String,
    pub trigger_time_2: String,
    pub evening_last_fired: Option<DateTime<Utc>>,
    pub night_last_fired: Option<DateTime<Utc>>,
}

/// Convert an "HH:MM" trigger time to a daily cron expression.
/// Returns None for unparseable input.
pub fn time_to_cron(time: &str) -> Option<String> {
    let (hour_str, minute_str) = time.split_once(':')?;
    let hour: u32 = hour_str.trim().parse().ok()?;
    let minute: u32 = minute_str.trim().parse().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }
    Some(format!("{} {} * * *", minute, hour))
}

/// Pure decision step: which actions are due at `now`. No side effects.
pub fn collect_due_actions<Tz: TimeZone>(
    snapshot: &TickSnapshot,
    now: &DateTime<Tz>,
) -> Vec<DueAction> {
    let mut actions = Vec::new();

    // Jira-type scheduled comments fire independently on their own cron.
    // Slack-type schedules are not evaluated here: they gate the dispatcher
    // and are committed when a handover reply is actually posted.
    for schedule in &snapshot.schedules {
        if schedule.comment_type != CommentType::Jira {
            continue;
        }
        if gate::expression_is_due(&schedule.cron_schedule, schedule.last_posted_at, now) {
            actions.push(DueAction::JiraComment(schedule.clone()));
        }
    }

    let shifts = [
        (Shift::Evening, &snapshot.trigger_time_1, snapshot.evening_last_fired),
        (Shift::Night, &snapshot.trigger_time_2, snapshot.night_last_fired),
    ];
    for (shift, trigger_time, last_fired) in shifts {
        let Some(cron) = time_to_cron(trigger_time) else {
            warn!(
                "Invalid {} shift trigger time '{}', skipping",
                shift.label(),
                trigger_time
            );
            continue;
        };
        if gate::expression_is_due(&cron, last_fired, now) {
            actions.push(DueAction::ShiftHandover(shift));
        }
    }

    actions
}

pub struct CommentPoller {
    config: Arc<Config>,
    database: Arc<Database>,
    jira: Arc<JiraClient>,
    slack: Arc<SlackClient>,
    dispatcher: Arc<HandoverDispatcher>,
    timezone: chrono_tz::Tz,
}

impl CommentPoller {
    pub fn new(
        config: Arc<Config>,
        database: Arc<Database>,
        jira: Arc<JiraClient>,
        slack: Arc<SlackClient>,
        dispatcher: Arc<HandoverDispatcher>,
    ) -> Self {
        // Config load already validated the timezone
        let timezone = config
            .timezone
            .parse::<chrono_tz::Tz>()
            .unwrap_or(chrono_tz::UTC);

        Self {
            config,
            database,
            jira,
            slack,
            dispatcher,
            timezone,
        }
    }

    /// Run one tick. Called on the poll interval; also callable directly
    /// (tests, manual triggers). Never returns an error - every failure is
    /// contained and logged so the timer loop cannot die.
    pub async fn tick(&self) {
        let enabled = match self.database.get_scheduler_enabled().await {
            Ok(enabled) => enabled,
            Err(e) => {
                error!("Failed to read scheduler enabled flag: {}", e);
                return;
            }
        };
        if !enabled {
            debug!("Scheduler disabled, skipping tick");
            return;
        }

        let snapshot = match self.load_snapshot().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!("Failed to load tick snapshot: {}", e);
                return;
            }
        };

        let now = Utc::now().with_timezone(&self.timezone);
        let actions = collect_due_actions(&snapshot, &now);
        if actions.is_empty() {
            return;
        }

        info!("{} scheduled action(s) due this tick", actions.len());
        for action in actions {
            self.execute_action(action, &now).await;
        }
    }

    async fn load_snapshot(&self) -> anyhow::Result<TickSnapshot> {
        let schedules = self.database.get_enabled_scheduled_comments().await?;
        let (trigger_time_1, trigger_time_2) = self.database.get_trigger_times().await?;
        let evening_last_fired = self
            .database
            .get_shift_last_fired(settings::EVENING_LAST_FIRED)
            .await?;
        let night_last_fired = self
            .database
            .get_shift_last_fired(settings::NIGHT_LAST_FIRED)
            .await?;

        Ok(TickSnapshot {
            schedules,
            trigger_time_1,
            trigger_time_2,
            evening_last_fired,
            night_last_fired,
        })
    }

    async fn execute_action(&self, action: DueAction, now: &DateTime<chrono_tz::Tz>) {
        match action {
            DueAction::JiraComment(schedule) => self.post_jira_comment(&schedule).await,
            DueAction::ShiftHandover(shift) => self.run_shift_handover(shift, now).await,
        }
    }

    async fn post_jira_comment(&self, schedule: &ScheduledCommentRecord) {
        let Some(ticket_key) = schedule.ticket_key.as_deref() else {
            warn!(
                "Scheduled comment {} has no ticket key, skipping",
                schedule.id
            );
            return;
        };

        info!(
            "Posting scheduled comment {} to {}",
            schedule.id, ticket_key
        );

        match self.jira.post_comment(ticket_key, &schedule.comment_text).await {
            Ok(()) => {
                // Commit fire state only after Jira confirmed the comment
                if let Err(e) = self
                    .database
                    .mark_comment_posted(&schedule.id, Utc::now())
                    .await
                {
                    error!(
                        "Failed to commit fire state for schedule {}: {}",
                        schedule.id, e
                    );
                }
            }
            Err(e) => {
                error!(
                    "Scheduled comment {} failed for {}: {}",
                    schedule.id, ticket_key, e
                );
            }
        }
    }

    async fn run_shift_handover(&self, shift: Shift, now: &DateTime<chrono_tz::Tz>) {
        let token = match self.database.get_shift_user_token(shift.token_key()).await {
            Ok(Some(token)) => token,
            Ok(None) => {
                info!("Skipping {} shift - no token configured", shift.label());
                return;
            }
            Err(e) => {
                error!("Failed to read {} shift token: {}", shift.label(), e);
                return;
            }
        };

        let channel = match self.database.get_custom_channel_id().await {
            Ok(Some(custom)) => custom,
            _ => self.config.slack.channel_id.clone(),
        };

        info!("Triggering {} shift handover", shift.label());
        let anchor = render_anchor_message(now, shift.label());
        let response = self.slack.post_message(&anchor, &channel, Some(&token)).await;

        if !response.ok {
            error!(
                "Failed to post {} shift handover message: {}",
                shift.label(),
                response.error.unwrap_or_else(|| "unknown error".to_string())
            );
            return;
        }

        // The anchor is live; persist the shift's fire state before the
        // reply step so a crash here cannot re-post the anchor
        if let Err(e) = self
            .database
            .set_shift_last_fired(shift.last_fired_key(), Utc::now())
            .await
        {
            error!("Failed to persist {} shift fire state: {}", shift.label(), e);
        }

        self.dispatcher.scan_and_reply().await;
    }

    /// Spawn the recurring tick loop
    pub fn spawn(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        let interval_seconds = self.config.poll_interval_seconds;
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(std::time::Duration::from_secs(interval_seconds));
            loop {
                interval.tick().await;
                self.tick().await;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn jira_schedule(cron: &str, last: Option<DateTime<Utc>>) -> ScheduledCommentRecord {
        ScheduledCommentRecord {
            id: "s-1".to_string(),
            comment_type: CommentType::Jira,
            ticket_key: Some("TCP-1".to_string()),
            comment_text: "ping".to_string(),
            cron_schedule: cron.to_string(),
            enabled: true,
            last_posted_at: last,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn snapshot_with(schedules: Vec<ScheduledCommentRecord>) -> TickSnapshot {
        TickSnapshot {
            schedules,
            trigger_time_1: "17:00".to_string(),
            trigger_time_2: "23:00".to_string(),
            evening_last_fired: None,
            night_last_fired: None,
        }
    }

    #[test]
    fn time_to_cron_converts() {
        assert_eq!(time_to_cron("17:00").unwrap(), "0 17 * * *");
        assert_eq!(time_to_cron("9:05").unwrap(), "5 9 * * *");
        assert!(time_to_cron("25:00").is_none());
        assert!(time_to_cron("12:75").is_none());
        assert!(time_to_cron("noon").is_none());
    }

    #[test]
    fn due_jira_schedule_is_collected() {
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap();
        let snapshot = snapshot_with(vec![jira_schedule("*/5 * * * *", None)]);

        let actions = collect_due_actions(&snapshot, &now);
        assert!(actions
            .iter()
            .any(|a| matches!(a, DueAction::JiraComment(s) if s.id == "s-1")));
    }

    #[test]
    fn recently_fired_schedule_is_not_collected() {
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 30).unwrap();
        let last = Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap();
        let snapshot = snapshot_with(vec![jira_schedule("*/5 * * * *", Some(last))]);

        let actions = collect_due_actions(&snapshot, &now);
        assert!(!actions.iter().any(|a| matches!(a, DueAction::JiraComment(_))));
    }

    #[test]
    fn malformed_schedule_does_not_block_siblings() {
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap();
        let mut bad = jira_schedule("0 9 *", None);
        bad.id = "bad".to_string();
        let good = jira_schedule("*/5 * * * *", None);

        let snapshot = snapshot_with(vec![bad, good]);
        let actions = collect_due_actions(&snapshot, &now);

        assert!(actions
            .iter()
            .any(|a| matches!(a, DueAction::JiraComment(s) if s.id == "s-1")));
        assert!(!actions
            .iter()
            .any(|a| matches!(a, DueAction::JiraComment(s) if s.id == "bad")));
    }

    #[test]
    fn shift_fires_at_trigger_time() {
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 17, 0, 0).unwrap();
        let snapshot = snapshot_with(vec![]);

        let actions = collect_due_actions(&snapshot, &now);
        assert!(actions
            .iter()
            .any(|a| matches!(a, DueAction::ShiftHandover(Shift::Evening))));
        assert!(!actions
            .iter()
            .any(|a| matches!(a, DueAction::ShiftHandover(Shift::Night))));
    }

    #[test]
    fn shift_respects_spacing_floor() {
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 17, 0, 45).unwrap();
        let mut snapshot = snapshot_with(vec![]);
        snapshot.evening_last_fired = Some(Utc.with_ymd_and_hms(2026, 3, 2, 17, 0, 5).unwrap());

        let actions = collect_due_actions(&snapshot, &now);
        assert!(!actions
            .iter()
            .any(|a| matches!(a, DueAction::ShiftHandover(Shift::Evening))));
    }

    #[test]
    fn slack_type_schedules_are_not_directly_evaluated() {
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap();
        let mut slack = jira_schedule("* * * * *", None);
        slack.comment_type = CommentType::Slack;
        let snapshot = snapshot_with(vec![slack]);

        let actions = collect_due_actions(&snapshot, &now);
        assert!(!actions.iter().any(|a| matches!(a, DueAction::JiraComment(_))));
    }

    #[test]
    fn invalid_trigger_time_is_skipped() {
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 17, 0, 0).unwrap();
        let mut snapshot = snapshot_with(vec![]);
        snapshot.trigger_time_1 = "not-a-time".to_string();

        let actions = collect_due_actions(&snapshot, &now);
        assert!(!actions
            .iter()
            .any(|a| matches!(a, DueAction::ShiftHandover(Shift::Evening))));
    }
}
