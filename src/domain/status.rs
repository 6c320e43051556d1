//! Attendance and submission status values

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Status of one attendance mark
///
/// Parsing is case-insensitive and never fails: anything unrecognised,
/// including an empty string, is [`AttendanceStatus::Unset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    Excused,
    #[default]
    Unset,
}

impl AttendanceStatus {
    /// Parse a stored status, mapping unknown values to `Unset`
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "present" | "p" => AttendanceStatus::Present,
            "absent" | "a" => AttendanceStatus::Absent,
            "late" | "l" | "tardy" => AttendanceStatus::Late,
            "excused" | "e" => AttendanceStatus::Excused,
            _ => AttendanceStatus::Unset,
        }
    }

    /// Lowercase label used in storage, JSON and exports
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::Late => "late",
            AttendanceStatus::Excused => "excused",
            AttendanceStatus::Unset => "unset",
        }
    }

    /// Whether the mark counts towards the inclusive attendance rate
    pub fn is_attended(&self) -> bool {
        matches!(self, AttendanceStatus::Present | AttendanceStatus::Late)
    }

    /// Whether a mark was actually recorded
    pub fn is_recorded(&self) -> bool {
        !matches!(self, AttendanceStatus::Unset)
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttendanceStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

/// Status of one assignment submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Submitted,
    Late,
    #[default]
    Missing,
}

impl SubmissionStatus {
    /// Parse a stored status; unknown values count as `Missing`
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "submitted" | "graded" | "on_time" => SubmissionStatus::Submitted,
            "late" => SubmissionStatus::Late,
            _ => SubmissionStatus::Missing,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Submitted => "submitted",
            SubmissionStatus::Late => "late",
            SubmissionStatus::Missing => "missing",
        }
    }

    /// Submitted on time or late
    pub fn is_turned_in(&self) -> bool {
        !matches!(self, SubmissionStatus::Missing)
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("present", AttendanceStatus::Present)]
    #[test_case("PRESENT", AttendanceStatus::Present)]
    #[test_case(" late ", AttendanceStatus::Late)]
    #[test_case("tardy", AttendanceStatus::Late)]
    #[test_case("absent", AttendanceStatus::Absent)]
    #[test_case("excused", AttendanceStatus::Excused)]
    #[test_case("", AttendanceStatus::Unset)]
    #[test_case("holiday", AttendanceStatus::Unset)]
    fn test_attendance_status_parse(raw: &str, expected: AttendanceStatus) {
        assert_eq!(AttendanceStatus::parse(raw), expected);
    }

    #[test]
    fn test_attended_is_present_or_late() {
        assert!(AttendanceStatus::Present.is_attended());
        assert!(AttendanceStatus::Late.is_attended());
        assert!(!AttendanceStatus::Absent.is_attended());
        assert!(!AttendanceStatus::Excused.is_attended());
        assert!(!AttendanceStatus::Unset.is_recorded());
    }

    #[test]
    fn test_submission_status_parse() {
        assert_eq!(SubmissionStatus::parse("Submitted"), SubmissionStatus::Submitted);
        assert_eq!(SubmissionStatus::parse("late"), SubmissionStatus::Late);
        assert_eq!(SubmissionStatus::parse("pending"), SubmissionStatus::Missing);
        assert!(SubmissionStatus::Late.is_turned_in());
        assert!(!SubmissionStatus::Missing.is_turned_in());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&AttendanceStatus::Excused).unwrap();
        assert_eq!(json, "\"excused\"");
    }
}
