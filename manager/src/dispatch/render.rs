//! Handover message rendering.
//!
//! Pure text builders: the coordinator decides *whether* and *when* to post,
//! these functions decide *what* the content looks like. No I/O.

use chrono::{DateTime, Datelike, TimeZone};

use crate::constants::scheduler::HANDOVER_MARKER;

/// One ticket line in the handover report: live Jira data merged with
/// operator-entered status/action notes
#[derive(Debug, Clone)]
pub struct TicketReportEntry {
    pub key: String,
    pub summary: String,
    pub wl_main_type: String,
    pub wl_sub_type: String,
    pub saved_status: String,
    pub saved_action: String,
}

/// The anchor message posted at shift time. Contains the marker string the
/// reply gate scans for.
pub fn render_anchor_message<Tz: TimeZone>(now: &DateTime<Tz>, shift_label: &str) -> String {
    format!(
        "{}\n{} - {} shift handover",
        HANDOVER_MARKER,
        format_report_date(now),
        shift_label
    )
}

/// The threaded reply attached under the anchor: mentions (if configured)
/// followed by one section per open ticket
pub fn render_handover_reply(
    entries: &[TicketReportEntry],
    mentions: Option<&str>,
    jira_base_url: &str,
) -> String {
    let mut reply = String::from("Please refer to this ticket information\n");

    if let Some(mentions) = mentions {
        reply.push_str(mentions);
        reply.push('\n');
    }
    reply.push('\n');

    if entries.is_empty() {
        reply.push_str("_No tickets to report._\n");
    } else {
        for (index, entry) in entries.iter().enumerate() {
            let ticket_url = format!("{}/browse/{}", jira_base_url, entry.key);

            reply.push_str(&format!("--- Ticket {} ---\n", index + 1));
            reply.push_str(&format!(
                "Ticket Link: <{}|{}> {}\n",
                ticket_url, entry.key, entry.summary
            ));
            reply.push_str(&format!("WL Main Type: {}\n", entry.wl_main_type));
            reply.push_str(&format!("WL Sub Type: {}\n", entry.wl_sub_type));
            reply.push_str(&format!("Status: {}\n", entry.saved_status));
            reply.push_str(&format!("Action: {}\n", entry.saved_action));
            reply.push('\n');
        }
    }

    reply.trim_end().to_string()
}

/// Long-format date like "Monday, 2 March 2026"
pub fn format_report_date<Tz: TimeZone>(date: &DateTime<Tz>) -> String {
    let naive = date.naive_local();
    format!(
        "{}, {} {} {}",
        weekday_name(naive.weekday()),
        naive.day(),
        month_name(naive.month()),
        naive.year()
    )
}

fn weekday_name(weekday: chrono::Weekday) -> &'static str {
    match weekday {
        chrono::Weekday::Mon => "Monday",
        chrono::Weekday::Tue => "Tuesday",
        chrono::Weekday::Wed => "Wednesday",
        chrono::Weekday::Thu => "Thursday",
        chrono::Weekday::Fri => "Friday",
        chrono::Weekday::Sat => "Saturday",
        chrono::Weekday::Sun => "Sunday",
    }
}

fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        _ => "December",
    }
}
