//! Day-level attendance counts for dashboard stat cards

use super::tally::AttendanceTally;
use crate::core::normalize::NormalizedStudentView;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// When day-level counts are computed
///
/// The portal's stat cards only ever showed today's numbers, and asking for
/// another date left them at zero. `TodayOnly` keeps that contract;
/// `AnyDate` counts whatever date was queried.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DailyCountScope {
    #[default]
    TodayOnly,
    AnyDate,
}

impl DailyCountScope {
    /// Whether counts apply to `query_date`
    pub fn applies(&self, query_date: NaiveDate, today: NaiveDate) -> bool {
        match self {
            DailyCountScope::TodayOnly => query_date == today,
            DailyCountScope::AnyDate => true,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DailyCountScope::TodayOnly => "today_only",
            DailyCountScope::AnyDate => "any_date",
        }
    }
}

impl FromStr for DailyCountScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "today_only" => Ok(DailyCountScope::TodayOnly),
            "any_date" => Ok(DailyCountScope::AnyDate),
            other => Err(format!(
                "Unknown daily count scope '{other}'. Must be today_only or any_date"
            )),
        }
    }
}

impl fmt::Display for DailyCountScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Present/absent/late counters for one date
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DayCounts {
    pub date: Option<NaiveDate>,
    /// False when the scope left the counters at zero
    pub counted: bool,
    pub present: u64,
    pub absent: u64,
    pub late: u64,
    pub excused: u64,
}

impl DayCounts {
    pub fn total(&self) -> u64 {
        self.present + self.absent + self.late + self.excused
    }
}

/// Count class-entry statuses across all views for `query_date`
///
/// Each view's class entries carry the mark found for the queried date.
/// When `scope` does not apply the counters stay at zero and `counted` is
/// false, so callers can tell "not computed" from "no marks".
pub fn daily_counts(
    views: &[NormalizedStudentView],
    query_date: NaiveDate,
    today: NaiveDate,
    scope: DailyCountScope,
) -> DayCounts {
    let mut counts = DayCounts {
        date: Some(query_date),
        ..DayCounts::default()
    };

    if !scope.applies(query_date, today) {
        tracing::debug!(%query_date, %today, scope = %scope, "Day counts not computed for this date");
        return counts;
    }

    let tally = AttendanceTally::from_statuses(
        views
            .iter()
            .flat_map(|view| view.classes.iter())
            .filter_map(|entry| entry.attendance),
    );

    counts.counted = true;
    counts.present = tally.present;
    counts.absent = tally.absent;
    counts.late = tally.late;
    counts.excused = tally.excused;
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::source::Row;
    use crate::core::normalize::normalize;

    fn views() -> Vec<NormalizedStudentView> {
        let rows = vec![
            Row::new()
                .with("student_id", "S1")
                .with("class_id", "C1")
                .with("attendance_status", "present"),
            Row::new()
                .with("student_id", "S1")
                .with("class_id", "C2")
                .with("attendance_status", "late"),
            Row::new()
                .with("student_id", "S2")
                .with("class_id", "C1")
                .with("attendance_status", "absent"),
            Row::new()
                .with("student_id", "S3")
                .with("class_id", "C1")
                .with("attendance_status", serde_json::Value::Null),
        ];
        normalize(&rows).views
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    #[test]
    fn test_counts_today() {
        let counts = daily_counts(&views(), day(6), day(6), DailyCountScope::TodayOnly);
        assert!(counts.counted);
        assert_eq!((counts.present, counts.absent, counts.late), (1, 1, 1));
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn test_today_only_leaves_other_dates_at_zero() {
        let counts = daily_counts(&views(), day(3), day(6), DailyCountScope::TodayOnly);
        assert!(!counts.counted);
        assert_eq!(counts.total(), 0);
        assert_eq!(counts.date, Some(day(3)));
    }

    #[test]
    fn test_any_date_counts_history() {
        let counts = daily_counts(&views(), day(3), day(6), DailyCountScope::AnyDate);
        assert!(counts.counted);
        assert_eq!(counts.present, 1);
    }

    #[test]
    fn test_scope_parsing() {
        assert_eq!("today_only".parse::<DailyCountScope>(), Ok(DailyCountScope::TodayOnly));
        assert_eq!("ANY_DATE".parse::<DailyCountScope>(), Ok(DailyCountScope::AnyDate));
        assert!("weekly".parse::<DailyCountScope>().is_err());
    }
}
