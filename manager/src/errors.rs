//! Custom error types for the handover manager.
//!
//! Most fallible paths use `anyhow` at the seams; the types here exist where
//! callers branch on the failure: schedule validation reports exactly what
//! is wrong with an expression, and Jira calls distinguish transport failure
//! from API rejection.

use std::fmt;

/// Cron schedule error variants
#[derive(Debug, Clone, PartialEq)]
pub enum ScheduleError {
    /// Expression does not have exactly five fields
    WrongFieldCount { expression: String, count: usize },

    /// A field could not be parsed
    InvalidField {
        name: &'static str,
        value: String,
        reason: String,
    },

    /// A parsed value falls outside the field's valid range
    OutOfRange {
        name: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },
}

/// Jira API error variants
#[derive(Debug)]
pub enum JiraError {
    /// HTTP request failed (network/timeout)
    RequestFailed { endpoint: String, reason: String },

    /// Jira returned a non-success status
    ApiError { endpoint: String, status: u16 },
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleError::WrongFieldCount { expression, count } => {
                write!(
                    f,
                    "Cron expression '{}' has {} fields, expected 5 (minute hour day month dayofweek)",
                    expression, count
                )
            }
            ScheduleError::InvalidField {
                name,
                value,
                reason,
            } => {
                write!(f, "Invalid {} field '{}': {}", name, value, reason)
            }
            ScheduleError::OutOfRange {
                name,
                value,
                min,
                max,
            } => {
                write!(
                    f,
                    "{} value {} is outside valid range {}-{}",
                    name, value, min, max
                )
            }
        }
    }
}

impl fmt::Display for JiraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JiraError::RequestFailed { endpoint, reason } => {
                write!(f, "Jira request to {} failed: {}", endpoint, reason)
            }
            JiraError::ApiError { endpoint, status } => {
                write!(f, "Jira {} returned status {}", endpoint, status)
            }
        }
    }
}

impl std::error::Error for ScheduleError {}
impl std::error::Error for JiraError {}
