//! In-memory filtering and ordering of a company's write-off history.

use baixas_core::{AppError, AppResult};
use chrono::{Days, NaiveDate};

use crate::WriteOffRecord;

/// Relative time window applied to the event date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodFilter {
    /// Events dated today.
    Today,
    /// Events dated yesterday.
    Yesterday,
    /// Events dated on or after `today - N` days. A negative `N` moves the
    /// limit into the future.
    LastDays(i64),
}

impl PeriodFilter {
    /// Parses a transport value such as `hoje`, `ontem` or `ultimos 7`.
    ///
    /// English aliases (`today`, `yesterday`, `last 7`) are accepted too.
    /// Unrecognized values yield `None`, which disables period filtering.
    #[must_use]
    pub fn parse_transport(value: &str) -> Option<Self> {
        let normalized = value.trim().to_lowercase();

        match normalized.as_str() {
            "hoje" | "today" => Some(Self::Today),
            "ontem" | "yesterday" => Some(Self::Yesterday),
            _ => ["ultimos", "últimos", "last"]
                .into_iter()
                .find_map(|prefix| normalized.strip_prefix(prefix))
                .and_then(|days| days.trim().parse::<i64>().ok())
                .map(Self::LastDays),
        }
    }

    /// Returns whether an event date falls inside the window.
    #[must_use]
    pub fn matches(&self, event_date: NaiveDate, today: NaiveDate) -> bool {
        match self {
            Self::Today => event_date == today,
            Self::Yesterday => today
                .checked_sub_days(Days::new(1))
                .is_some_and(|yesterday| event_date == yesterday),
            Self::LastDays(days) if *days >= 0 => today
                .checked_sub_days(Days::new(days.unsigned_abs()))
                .is_none_or(|limit| event_date >= limit),
            Self::LastDays(days) => today
                .checked_add_days(Days::new(days.unsigned_abs()))
                .is_some_and(|limit| event_date >= limit),
        }
    }
}

/// Ordering applied to the event timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Oldest first.
    Asc,
    /// Newest first.
    Desc,
}

impl SortDirection {
    /// Parses a transport value (`asc` or `desc`).
    pub fn parse_transport(value: &str) -> AppResult<Self> {
        match value.trim().to_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(AppError::Validation(format!(
                "unknown sort order '{value}', expected 'asc' or 'desc'"
            ))),
        }
    }
}

/// Filter and sort options for listing a company's write-offs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteOffQuery {
    /// Exact `tipo_registro` match. Blank values disable the filter.
    pub record_type: Option<String>,
    /// Relative event date window.
    pub period: Option<PeriodFilter>,
    /// Event time ordering. `None` keeps storage enumeration order.
    pub sort: Option<SortDirection>,
}

impl WriteOffQuery {
    /// Filters and orders records with a linear scan and a stable sort.
    #[must_use]
    pub fn apply(&self, records: Vec<WriteOffRecord>, today: NaiveDate) -> Vec<WriteOffRecord> {
        let record_type = self
            .record_type
            .as_deref()
            .filter(|value| !value.trim().is_empty());

        let mut filtered: Vec<WriteOffRecord> = records
            .into_iter()
            .filter(|record| record_type.is_none_or(|value| record.record_type().as_str() == value))
            .filter(|record| {
                self.period
                    .is_none_or(|period| period.matches(record.event_time().date(), today))
            })
            .collect();

        match self.sort {
            Some(SortDirection::Asc) => filtered.sort_by(|left, right| {
                left.event_time()
                    .wall_clock()
                    .cmp(&right.event_time().wall_clock())
            }),
            Some(SortDirection::Desc) => filtered.sort_by(|left, right| {
                right
                    .event_time()
                    .wall_clock()
                    .cmp(&left.event_time().wall_clock())
            }),
            None => {}
        }

        filtered
    }
}
