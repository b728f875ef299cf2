//! Five-field cron expression matching.
//!
//! Expressions are parsed once into a tagged-variant form at schedule load
//! time, so malformed syntax surfaces as a single load-time error instead of
//! being silently mis-evaluated every minute, and the per-tick match is a
//! pure function over the parsed fields.
//!
//! Supported per-field syntax: `*`, a literal, `a-b`, `a,b,c`, and `*/n`.
//! Stepped ranges (`1-5/2`) and offset steps (`3/5`) are rejected at parse
//! time. Day-of-week runs 0-6 with Sunday as 0.

use chrono::{DateTime, Datelike, TimeZone, Timelike};

use crate::errors::ScheduleError;

/// One parsed cron field
#[derive(Debug, Clone, PartialEq)]
pub enum CronField {
    /// `*` - always matches
    Any,
    /// Exact value
    Literal(u32),
    /// Inclusive range `a-b`
    Range(u32, u32),
    /// `*/n` - matches when value % n == 0
    Step(u32),
    /// Comma list of literals
    List(Vec<u32>),
}

impl CronField {
    pub fn matches(&self, value: u32) -> bool {
        match self {
            CronField::Any => true,
            CronField::Literal(n) => value == *n,
            CronField::Range(start, end) => value >= *start && value <= *end,
            CronField::Step(n) => value % n == 0,
            CronField::List(values) => values.contains(&value),
        }
    }
}

/// A parsed five-field cron expression
#[derive(Debug, Clone, PartialEq)]
pub struct CronSchedule {
    expression: String,
    minute: CronField,
    hour: CronField,
    day_of_month: CronField,
    month: CronField,
    day_of_week: CronField,
}

impl CronSchedule {
    /// Parse a five-field expression (`minute hour day month dayofweek`)
    pub fn parse(expression: &str) -> Result<Self, ScheduleError> {
        let parts: Vec<&str> = expression.split_whitespace().collect();
        if parts.len() != 5 {
            return Err(ScheduleError::WrongFieldCount {
                expression: expression.to_string(),
                count: parts.len(),
            });
        }

        Ok(Self {
            expression: expression.to_string(),
            minute: parse_field(parts[0], "minute", 0, 59)?,
            hour: parse_field(parts[1], "hour", 0, 23)?,
            day_of_month: parse_field(parts[2], "day", 1, 31)?,
            month: parse_field(parts[3], "month", 1, 12)?,
            day_of_week: parse_field(parts[4], "dayofweek", 0, 6)?,
        })
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Whether this expression matches the given instant. All five fields
    /// must match. Pure: seconds are ignored, so an expression matches for
    /// one full minute.
    pub fn matches<Tz: TimeZone>(&self, instant: &DateTime<Tz>) -> bool {
        self.minute.matches(instant.minute())
            && self.hour.matches(instant.hour())
            && self.day_of_month.matches(instant.day())
            && self.month.matches(instant.month())
            && self.day_of_week.matches(instant.weekday().num_days_from_sunday())
    }
}

fn parse_field(
    field: &str,
    name: &'static str,
    min: u32,
    max: u32,
) -> Result<CronField, ScheduleError> {
    if field == "*" {
        return Ok(CronField::Any);
    }

    if let Some(step_str) = field.strip_prefix("*/") {
        let step = step_str
            .parse::<u32>()
            .map_err(|_| ScheduleError::InvalidField {
                name,
                value: field.to_string(),
                reason: format!("invalid step value '{}'", step_str),
            })?;
        if step == 0 {
            return Err(ScheduleError::InvalidField {
                name,
                value: field.to_string(),
                reason: "step value cannot be 0".to_string(),
            });
        }
        return Ok(CronField::Step(step));
    }

    // Anything else containing '/' is an offset step (3/5) or a stepped
    // range (1-5/2); neither is supported
    if field.contains('/') {
        return Err(ScheduleError::InvalidField {
            name,
            value: field.to_string(),
            reason: "steps are only supported as */n".to_string(),
        });
    }

    if field.contains('-') {
        let range: Vec<&str> = field.split('-').collect();
        if range.len() != 2 {
            return Err(ScheduleError::InvalidField {
                name,
                value: field.to_string(),
                reason: "range must have exactly one '-'".to_string(),
            });
        }
        let start = parse_value(range[0], name, field)?;
        let end = parse_value(range[1], name, field)?;
        check_range(start, name, min, max)?;
        check_range(end, name, min, max)?;
        if start > end {
            return Err(ScheduleError::InvalidField {
                name,
                value: field.to_string(),
                reason: format!("range start {} is after end {}", start, end),
            });
        }
        return Ok(CronField::Range(start, end));
    }

    if field.contains(',') {
        let mut values = Vec::new();
        for part in field.split(',') {
            let value = parse_value(part.trim(), name, field)?;
            check_range(value, name, min, max)?;
            values.push(value);
        }
        return Ok(CronField::List(values));
    }

    let value = parse_value(field, name, field)?;
    check_range(value, name, min, max)?;
    Ok(CronField::Literal(value))
}

fn parse_value(raw: &str, name: &'static str, field: &str) -> Result<u32, ScheduleError> {
    raw.parse::<u32>().map_err(|_| ScheduleError::InvalidField {
        name,
        value: field.to_string(),
        reason: format!("'{}' is not a number", raw),
    })
}

fn check_range(value: u32, name: &'static str, min: u32, max: u32) -> Result<(), ScheduleError> {
    if value < min || value > max {
        return Err(ScheduleError::OutOfRange {
            name,
            value,
            min,
            max,
        });
    }
    Ok(())
}
