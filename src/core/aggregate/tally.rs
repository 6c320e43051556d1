//! Status tallies over marks and submissions

use super::rates::{completion_rate, rate};
use crate::domain::{AttendanceMark, AttendanceStatus, ClassId, StudentId, SubmissionStatus};
use serde::Serialize;
use std::collections::HashMap;

/// Attendance marks counted by status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AttendanceTally {
    pub present: u64,
    pub absent: u64,
    pub late: u64,
    pub excused: u64,
    pub unset: u64,
}

impl AttendanceTally {
    pub fn from_statuses<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = AttendanceStatus>,
    {
        let mut tally = Self::default();
        for status in statuses {
            tally.record(status);
        }
        tally
    }

    pub fn record(&mut self, status: AttendanceStatus) {
        match status {
            AttendanceStatus::Present => self.present += 1,
            AttendanceStatus::Absent => self.absent += 1,
            AttendanceStatus::Late => self.late += 1,
            AttendanceStatus::Excused => self.excused += 1,
            AttendanceStatus::Unset => self.unset += 1,
        }
    }

    pub fn merge(&mut self, other: &AttendanceTally) {
        self.present += other.present;
        self.absent += other.absent;
        self.late += other.late;
        self.excused += other.excused;
        self.unset += other.unset;
    }

    /// Marks with an actual status; the rate denominator
    pub fn recorded(&self) -> u64 {
        self.present + self.absent + self.late + self.excused
    }

    pub fn attended(&self) -> u64 {
        self.present + self.late
    }

    /// Inclusive attendance rate: present or late over recorded marks
    pub fn attendance_rate(&self) -> f64 {
        rate(self.attended(), self.recorded())
    }

    /// Rate for a single status over recorded marks
    pub fn status_rate(&self, status: AttendanceStatus) -> f64 {
        let matched = match status {
            AttendanceStatus::Present => self.present,
            AttendanceStatus::Absent => self.absent,
            AttendanceStatus::Late => self.late,
            AttendanceStatus::Excused => self.excused,
            AttendanceStatus::Unset => 0,
        };
        rate(matched, self.recorded())
    }

    /// Day tally matching attended marks
    pub fn as_day(&self) -> DayTally {
        DayTally::new(self.attended(), self.recorded())
    }
}

/// One day of a trend: matched marks out of the day's total
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DayTally {
    pub matched: u64,
    pub total: u64,
}

impl DayTally {
    /// `matched` is capped at `total`
    pub fn new(matched: u64, total: u64) -> Self {
        Self {
            matched: matched.min(total),
            total,
        }
    }

    pub fn complement(&self) -> u64 {
        self.total - self.matched
    }
}

/// Submissions counted by status for one assignment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SubmissionTally {
    pub submitted: u64,
    pub late: u64,
    pub missing: u64,
}

impl SubmissionTally {
    pub fn record(&mut self, status: SubmissionStatus) {
        match status {
            SubmissionStatus::Submitted => self.submitted += 1,
            SubmissionStatus::Late => self.late += 1,
            SubmissionStatus::Missing => self.missing += 1,
        }
    }

    pub fn merge(&mut self, other: &SubmissionTally) {
        self.submitted += other.submitted;
        self.late += other.late;
        self.missing += other.missing;
    }

    /// Completion against the enrolled head count
    ///
    /// Students without a submission row count as missing.
    pub fn completion_rate(&self, total_students: u64) -> u32 {
        completion_rate(self.submitted, self.late, total_students)
    }

    /// Missing including students with no submission row
    pub fn missing_of(&self, total_students: u64) -> u64 {
        total_students.saturating_sub(self.submitted + self.late).max(self.missing)
    }
}

/// Attendance marks grouped by (student, class) in first-seen order
pub fn group_marks(marks: &[AttendanceMark]) -> Vec<((StudentId, ClassId), AttendanceTally)> {
    let mut groups: Vec<((StudentId, ClassId), AttendanceTally)> = Vec::new();
    let mut index: HashMap<(StudentId, ClassId), usize> = HashMap::new();

    for mark in marks {
        let key = (mark.student_id.clone(), mark.class_id.clone());
        let position = *index.entry(key.clone()).or_insert_with(|| {
            groups.push((key, AttendanceTally::default()));
            groups.len() - 1
        });
        groups[position].1.record(mark.status);
    }

    groups
}
