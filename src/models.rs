use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use crate::error::{ChoreError, Result};

/// Repeat rule attached to a chore.
///
/// Stored as an internally tagged object, e.g.
/// `{"type": "monthly", "day_of_month": 31, "end_date": "2025-12-31"}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Recurrence {
    /// Happens once, on the chore's date.
    #[default]
    None,
    /// Repeats on the given weekdays (0 = Sunday .. 6 = Saturday).
    Weekly {
        days_of_week: BTreeSet<u8>,
        #[serde(default)]
        end_date: Option<NaiveDate>,
    },
    /// Repeats on a day of the month (1..=31), clamped to shorter months.
    Monthly {
        day_of_month: u32,
        #[serde(default)]
        end_date: Option<NaiveDate>,
    },
}

const DAY_NAMES: [&str; 7] = ["sun", "mon", "tue", "wed", "thu", "fri", "sat"];

impl Recurrence {
    /// Parses a recurrence label.
    ///
    /// Formats:
    /// - `"none"` (or an empty string)
    /// - `"weekly:mon,wed,fri"` (day names or 0..6 with Sunday = 0)
    /// - `"monthly:15"`
    pub fn parse(label: &str) -> Result<Self> {
        let lower = label.trim().to_lowercase();
        if lower.is_empty() || lower == "none" {
            return Ok(Self::None);
        }
        if let Some(rest) = lower.strip_prefix("weekly:") {
            let days = rest
                .split(',')
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(parse_day_name)
                .collect::<Result<BTreeSet<u8>>>()?;
            if days.is_empty() {
                return Err(ChoreError::InvalidRecurrence(
                    "weekly recurrence needs at least one day".into(),
                ));
            }
            return Ok(Self::Weekly { days_of_week: days, end_date: None });
        }
        if let Some(rest) = lower.strip_prefix("monthly:") {
            let day: u32 = rest.trim().parse().map_err(|_| {
                ChoreError::InvalidRecurrence(format!("invalid day of month: {rest}"))
            })?;
            if !(1..=31).contains(&day) {
                return Err(ChoreError::InvalidRecurrence(format!(
                    "day of month out of range: {day}"
                )));
            }
            return Ok(Self::Monthly { day_of_month: day, end_date: None });
        }
        Err(ChoreError::InvalidRecurrence(format!(
            "unrecognized pattern '{label}' (use none, weekly:mon,wed or monthly:15)"
        )))
    }

    /// Returns the same rule with its end date replaced. No-op for `None`.
    pub fn with_end_date(self, until: Option<NaiveDate>) -> Self {
        match self {
            Self::None => Self::None,
            Self::Weekly { days_of_week, .. } => Self::Weekly { days_of_week, end_date: until },
            Self::Monthly { day_of_month, .. } => Self::Monthly { day_of_month, end_date: until },
        }
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        match self {
            Self::None => None,
            Self::Weekly { end_date, .. } | Self::Monthly { end_date, .. } => *end_date,
        }
    }

    pub fn is_recurring(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Short label, the inverse of [`Recurrence::parse`] (end date excluded).
    pub fn label(&self) -> String {
        match self {
            Self::None => "none".into(),
            Self::Weekly { days_of_week, .. } => {
                let names: Vec<&str> = days_of_week
                    .iter()
                    .map(|d| DAY_NAMES.get(*d as usize).copied().unwrap_or("?"))
                    .collect();
                format!("weekly:{}", names.join(","))
            }
            Self::Monthly { day_of_month, .. } => format!("monthly:{day_of_month}"),
        }
    }
}

fn parse_day_name(name: &str) -> Result<u8> {
    if let Some(idx) = DAY_NAMES.iter().position(|d| name.starts_with(d)) {
        return Ok(idx as u8);
    }
    match name.parse::<u8>() {
        Ok(n) if n <= 6 => Ok(n),
        _ => Err(ChoreError::InvalidRecurrence(format!("unknown day: {name}"))),
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())?;
        if let Some(end) = self.end_date() {
            write!(f, " until {end}")?;
        }
        Ok(())
    }
}

/// Progress state of a chore.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ChoreStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl ChoreStatus {
    pub const ALL: [ChoreStatus; 4] = [
        ChoreStatus::Pending,
        ChoreStatus::InProgress,
        ChoreStatus::Completed,
        ChoreStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChoreStatus::Pending => "pending",
            ChoreStatus::InProgress => "in-progress",
            ChoreStatus::Completed => "completed",
            ChoreStatus::Cancelled => "cancelled",
        }
    }

    /// The next status in the cycle used by the TUI.
    pub fn next(self) -> Self {
        match self {
            ChoreStatus::Pending => ChoreStatus::InProgress,
            ChoreStatus::InProgress => ChoreStatus::Completed,
            ChoreStatus::Completed => ChoreStatus::Cancelled,
            ChoreStatus::Cancelled => ChoreStatus::Pending,
        }
    }
}

impl FromStr for ChoreStatus {
    type Err = ChoreError;

    fn from_str(s: &str) -> Result<Self> {
        ChoreStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| ChoreError::InvalidStatus(s.to_string()))
    }
}

impl fmt::Display for ChoreStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A chore definition as stored on disk.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Chore {
    /// Unique identifier for the chore.
    pub id: u64,
    pub title: String,
    /// Anchor date: the one-time date, or the start of the repeat rule.
    pub date: NaiveDate,
    /// Team member responsible for the chore, if any.
    #[serde(default)]
    pub assignee_id: Option<u64>,
    #[serde(default)]
    pub recurrence: Recurrence,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: ChoreStatus,
    /// Timestamp when the chore was created (RFC 3339).
    pub created_at: String,
    /// Timestamp of the last change (RFC 3339).
    pub updated_at: String,
}

/// A team member chores can be assigned to.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Member {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default = "default_role")]
    pub role: String,
    /// Calendar color as `#rrggbb`.
    pub color: String,
    pub created_at: String,
    pub updated_at: String,
}

pub fn default_role() -> String {
    "Team Member".to_string()
}

/// One concrete dated occurrence of a chore, produced by expansion.
///
/// Never persisted; recomputed for every window.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ChoreInstance {
    /// `"{chore_id}-{YYYY-MM-DD}"` for recurring chores, `"{chore_id}"` otherwise.
    pub id: String,
    pub title: String,
    pub date: NaiveDate,
    pub assignee_id: Option<u64>,
    /// Resolved assignee color, or the neutral default.
    pub color: String,
    pub is_recurring: bool,
    pub base_chore_id: u64,
}
