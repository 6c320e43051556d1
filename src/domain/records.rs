//! Durable record types
//!
//! These mirror the rows owned by the registrar and teacher stores. They are
//! mutated by CRUD pages outside this crate; here they are only read.

use super::ids::{ClassId, StudentId, TeacherId};
use super::status::{AttendanceStatus, SubmissionStatus};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Student identity owned by the registrar store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub student_id: StudentId,
    pub first_name: String,
    #[serde(default)]
    pub middle_name: String,
    pub last_name: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub birthdate: Option<NaiveDate>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub contact_number: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub grade_level: String,
    #[serde(default)]
    pub section: String,
    /// `active` for enrolled students; anything else is treated as inactive
    pub status: String,
}

impl StudentRecord {
    /// "Last, First M." as shown on class lists and exports
    pub fn display_name(&self) -> String {
        format_display_name(&self.first_name, &self.middle_name, &self.last_name)
    }

    pub fn is_active(&self) -> bool {
        self.status.eq_ignore_ascii_case("active")
    }
}

/// "Last, First M." with empty parts dropped
pub fn format_display_name(first: &str, middle: &str, last: &str) -> String {
    let first = first.trim();
    let last = last.trim();
    let initial = middle
        .trim()
        .chars()
        .next()
        .map(|c| format!(" {}.", c.to_uppercase()))
        .unwrap_or_default();

    match (last.is_empty(), first.is_empty()) {
        (true, true) => String::new(),
        (true, false) => format!("{first}{initial}"),
        (false, true) => last.to_string(),
        (false, false) => format!("{last}, {first}{initial}"),
    }
}

/// Class section owned by the teacher store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassRecord {
    pub class_id: ClassId,
    pub subject: String,
    #[serde(default)]
    pub grade_level: String,
    #[serde(default)]
    pub section: String,
    #[serde(default)]
    pub schedule: String,
    #[serde(default)]
    pub room: String,
    pub teacher_id: TeacherId,
}

impl ClassRecord {
    /// "Mathematics 7-A" style label
    pub fn label(&self) -> String {
        format_class_label(&self.subject, &self.grade_level, &self.section)
    }
}

/// "Subject Level-Section" with empty parts dropped
pub fn format_class_label(subject: &str, grade_level: &str, section: &str) -> String {
    let mut label = subject.trim().to_string();
    let level_section = match (grade_level.trim(), section.trim()) {
        ("", "") => String::new(),
        (level, "") => level.to_string(),
        ("", section) => section.to_string(),
        (level, section) => format!("{level}-{section}"),
    };
    if !level_section.is_empty() {
        if !label.is_empty() {
            label.push(' ');
        }
        label.push_str(&level_section);
    }
    label
}

/// Student ↔ class relation for a grading period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentEdge {
    pub student_id: StudentId,
    pub class_id: ClassId,
    pub status: String,
}

/// One attendance mark, unique per (student, class, date)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceMark {
    pub student_id: StudentId,
    pub class_id: ClassId,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub recorded_by: Option<TeacherId>,
    #[serde(default)]
    pub recorded_at: Option<NaiveDateTime>,
}

/// One graded assessment, unique per (student, class, title, period)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeEntry {
    pub student_id: StudentId,
    pub class_id: ClassId,
    pub assessment: String,
    pub grading_period: String,
    pub score: f64,
    pub max_score: f64,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub recorded_by: Option<TeacherId>,
}

impl GradeEntry {
    /// Score as a percentage of the max score, `None` when max is not positive
    pub fn percentage(&self) -> Option<f64> {
        if self.max_score > 0.0 && self.score.is_finite() {
            Some((self.score / self.max_score * 100.0).clamp(0.0, 100.0))
        } else {
            None
        }
    }
}

/// One student's submission state for one assignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub assignment_id: String,
    pub student_id: StudentId,
    pub status: SubmissionStatus,
    #[serde(default)]
    pub submitted_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub score: Option<f64>,
}
