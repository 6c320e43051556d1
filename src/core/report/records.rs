//! Typed records from store rows
//!
//! Rows missing a required key are skipped and counted; nothing here fails.

use crate::adapters::source::Row;
use crate::domain::{
    AttendanceMark, AttendanceStatus, ClassId, ClassRecord, GradeEntry, StudentId,
    SubmissionStatus, TeacherId,
};
use chrono::NaiveDate;

/// Parsed records plus the count of rows that could not be used
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed<T> {
    pub records: Vec<T>,
    pub skipped: usize,
}

fn parse_all<T, F>(rows: &[Row], what: &'static str, f: F) -> Parsed<T>
where
    F: Fn(&Row) -> Option<T>,
{
    let mut records = Vec::with_capacity(rows.len());
    let mut skipped = 0;
    for row in rows {
        match f(row) {
            Some(record) => records.push(record),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        tracing::warn!(kind = what, skipped, kept = records.len(), "Skipped malformed rows");
    }
    Parsed { records, skipped }
}

fn student_id(row: &Row) -> Option<StudentId> {
    row.get("student_id").and_then(StudentId::from_value)
}

fn class_id(row: &Row) -> Option<ClassId> {
    row.get("class_id").and_then(ClassId::from_value)
}

fn text(row: &Row, name: &str) -> String {
    row.get_str(name).map(|s| s.trim().to_string()).unwrap_or_default()
}

fn opt_text(row: &Row, name: &str) -> Option<String> {
    row.get_str(name)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

pub fn classes(rows: &[Row]) -> Parsed<ClassRecord> {
    parse_all(rows, "class", |row| {
        Some(ClassRecord {
            class_id: class_id(row)?,
            subject: text(row, "subject"),
            grade_level: text(row, "grade_level"),
            section: text(row, "section"),
            schedule: text(row, "schedule"),
            room: text(row, "room"),
            teacher_id: row.get("teacher_id").and_then(TeacherId::from_value)?,
        })
    })
}

pub fn marks(rows: &[Row]) -> Parsed<AttendanceMark> {
    parse_all(rows, "attendance", |row| {
        Some(AttendanceMark {
            student_id: student_id(row)?,
            class_id: class_id(row)?,
            date: row.get_date("attendance_date")?,
            status: AttendanceStatus::parse(&text(row, "status")),
            notes: opt_text(row, "notes"),
            recorded_by: row.get("recorded_by").and_then(TeacherId::from_value),
            recorded_at: row.get_datetime("recorded_at"),
        })
    })
}

pub fn grades(rows: &[Row]) -> Parsed<GradeEntry> {
    parse_all(rows, "grade", |row| {
        Some(GradeEntry {
            student_id: student_id(row)?,
            class_id: class_id(row)?,
            assessment: text(row, "assessment"),
            grading_period: text(row, "grading_period"),
            score: row.get_f64("score")?,
            max_score: row.get_f64("max_score")?,
            notes: opt_text(row, "notes"),
            recorded_by: row.get("recorded_by").and_then(TeacherId::from_value),
        })
    })
}

/// One assignment with the submissions recorded against it
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentRow {
    pub assignment_id: String,
    pub title: String,
    pub class_id: ClassId,
    pub due_date: Option<NaiveDate>,
    pub submissions: Vec<(StudentId, SubmissionStatus)>,
}

/// Fold assignment ⟕ submission rows into one entry per assignment
///
/// Row order is kept; a submission-less assignment appears once with an
/// empty submission list.
pub fn assignments(rows: &[Row]) -> Parsed<AssignmentRow> {
    let mut records: Vec<AssignmentRow> = Vec::new();
    let mut skipped = 0;

    for row in rows {
        let (Some(assignment_id), Some(class)) = (row.get_key("assignment_id"), class_id(row))
        else {
            skipped += 1;
            continue;
        };

        let position = match records.iter().position(|a| a.assignment_id == assignment_id) {
            Some(i) => i,
            None => {
                records.push(AssignmentRow {
                    assignment_id,
                    title: text(row, "title"),
                    class_id: class,
                    due_date: row.get_date("due_date"),
                    submissions: Vec::new(),
                });
                records.len() - 1
            }
        };

        if let Some(student) = student_id(row) {
            let status = SubmissionStatus::parse(&text(row, "status"));
            records[position].submissions.push((student, status));
        }
    }

    if skipped > 0 {
        tracing::warn!(
            kind = "assignment",
            skipped,
            kept = records.len(),
            "Skipped malformed rows"
        );
    }
    Parsed { records, skipped }
}
