//! A small school shared by the report and HTTP tests
//!
//! Teacher T1 owns Math 7-A (C1) and Science 7-B (C2) for the week of
//! 2025-01-06. Account T9 exists in the login store with the student role.

#![allow(dead_code)]

use chrono::NaiveDate;
use classroll::adapters::source::{MemorySource, QueryParam, Row};
use classroll::core::report::queries;
use classroll::domain::Store;

pub const TEACHER: &str = "T1";
pub const STUDENT_ACCOUNT: &str = "T9";

pub fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, day).unwrap()
}

// (class, subject, level, section)
const CLASSES: [(&str, &str, &str, &str); 2] =
    [("C1", "Math", "7", "A"), ("C2", "Science", "7", "B")];

// (student, first, last)
const STUDENTS: [(&str, &str, &str); 3] =
    [("S1", "Ana", "Reyes"), ("S2", "Ben", "Cruz"), ("S3", "Cara", "Diaz")];

// (student, class)
const ENROLLMENTS: [(&str, &str); 4] = [("S1", "C1"), ("S2", "C1"), ("S1", "C2"), ("S3", "C2")];

// (student, class, day, status)
const MARKS: [(&str, &str, u32, &str); 9] = [
    ("S1", "C1", 6, "present"),
    ("S2", "C1", 6, "absent"),
    ("S1", "C2", 6, "present"),
    ("S3", "C2", 6, "excused"),
    ("S1", "C1", 7, "late"),
    ("S2", "C1", 7, "present"),
    ("S1", "C1", 10, "present"),
    ("S2", "C1", 10, "late"),
    ("S1", "C2", 10, "absent"),
];

// (student, class, assessment, score, max)
const GRADES: [(&str, &str, &str, f64, f64); 3] = [
    ("S1", "C1", "Quiz 1", 18.0, 20.0),
    ("S2", "C1", "Quiz 1", 14.0, 20.0),
    ("S1", "C2", "Lab 1", 40.0, 50.0),
];

// (assignment, class, title, due day, submissions)
const ASSIGNMENTS: [(&str, &str, &str, u32, &[(&str, &str)]); 2] = [
    ("A1", "C1", "Fractions", 8, &[("S1", "submitted"), ("S2", "late")]),
    ("A2", "C2", "Lab report", 9, &[("S1", "submitted")]),
];

fn text(params: &[QueryParam], i: usize) -> Option<String> {
    match params.get(i) {
        Some(QueryParam::Text(s)) => Some(s.clone()),
        Some(QueryParam::OptText(s)) => s.clone(),
        _ => None,
    }
}

fn day(params: &[QueryParam], i: usize) -> Option<NaiveDate> {
    match params.get(i) {
        Some(QueryParam::Date(d)) => Some(*d),
        _ => None,
    }
}

fn class_wanted(params: &[QueryParam], class: &str) -> bool {
    text(params, 1).map_or(true, |wanted| wanted == class)
}

fn in_range(params: &[QueryParam], d: NaiveDate) -> bool {
    match (day(params, 2), day(params, 3)) {
        (Some(start), Some(end)) => start <= d && d <= end,
        _ => false,
    }
}

fn owns_classes(params: &[QueryParam]) -> bool {
    text(params, 0).as_deref() == Some(TEACHER)
}

fn class_info(class: &str) -> (&'static str, &'static str, &'static str) {
    CLASSES
        .iter()
        .find(|c| c.0 == class)
        .map(|c| (c.1, c.2, c.3))
        .unwrap()
}

fn roster_row(student: &str, class: &str) -> Row {
    let (subject, level, section) = class_info(class);
    Row::new()
        .with("student_id", student)
        .with("class_id", class)
        .with("subject", subject)
        .with("class_grade_level", level)
        .with("class_section", section)
        .with("enrollment_status", "active")
}

fn status_on(student: &str, class: &str, on: NaiveDate) -> Option<&'static str> {
    MARKS
        .iter()
        .find(|m| m.0 == student && m.1 == class && date(m.2) == on)
        .map(|m| m.3)
}

/// The school as a scripted record source honoring teacher, class and date filters
pub fn school() -> MemorySource {
    MemorySource::new()
        .respond_with(Store::Login, queries::TEACHER_ACCOUNT, |params| {
            let role = match text(params, 0).as_deref() {
                Some(TEACHER) => "teacher",
                Some(STUDENT_ACCOUNT) => "student",
                _ => return Vec::new(),
            };
            vec![Row::new()
                .with("user_id", text(params, 0).unwrap_or_default())
                .with("role", role)
                .with("status", "active")]
        })
        .respond_with(Store::Registrar, queries::STUDENTS_BY_IDS, |params| {
            let wanted: Vec<String> = match params.first() {
                Some(QueryParam::TextList(ids)) => ids.clone(),
                _ => Vec::new(),
            };
            let mut students: Vec<_> = STUDENTS
                .iter()
                .filter(|s| wanted.iter().any(|w| w == s.0))
                .collect();
            students.sort_by_key(|s| (s.2, s.1));
            students
                .into_iter()
                .map(|(id, first, last)| {
                    Row::new()
                        .with("student_id", *id)
                        .with("first_name", *first)
                        .with("last_name", *last)
                        .with("status", "active")
                })
                .collect()
        })
        .respond_with(Store::Teacher, queries::TEACHER_CLASSES, |params| {
            if !owns_classes(params) {
                return Vec::new();
            }
            CLASSES
                .iter()
                .filter(|c| class_wanted(params, c.0))
                .map(|(id, subject, level, section)| {
                    Row::new()
                        .with("class_id", *id)
                        .with("subject", *subject)
                        .with("grade_level", *level)
                        .with("section", *section)
                        .with("teacher_id", TEACHER)
                })
                .collect()
        })
        .respond_with(Store::Teacher, queries::CLASS_ROSTER, |params| {
            if !owns_classes(params) {
                return Vec::new();
            }
            ENROLLMENTS
                .iter()
                .filter(|e| class_wanted(params, e.1))
                .map(|(student, class)| roster_row(student, class))
                .collect()
        })
        .respond_with(Store::Teacher, queries::ROSTER_WITH_MARKS, |params| {
            let Some(on) = day(params, 2) else {
                return Vec::new();
            };
            if !owns_classes(params) {
                return Vec::new();
            }
            ENROLLMENTS
                .iter()
                .filter(|e| class_wanted(params, e.1))
                .map(|(student, class)| {
                    let status = status_on(student, class, on)
                        .map_or(serde_json::Value::Null, serde_json::Value::from);
                    roster_row(student, class).with("attendance_status", status)
                })
                .collect()
        })
        .respond_with(Store::Teacher, queries::ATTENDANCE_RANGE, |params| {
            if !owns_classes(params) {
                return Vec::new();
            }
            MARKS
                .iter()
                .filter(|m| class_wanted(params, m.1) && in_range(params, date(m.2)))
                .map(|(student, class, d, status)| {
                    Row::new()
                        .with("student_id", *student)
                        .with("class_id", *class)
                        .with("attendance_date", date(*d).format("%Y-%m-%d").to_string())
                        .with("status", *status)
                        .with("recorded_by", TEACHER)
                })
                .collect()
        })
        .respond_with(Store::Teacher, queries::DAY_STATUSES, |params| {
            let Some(on) = day(params, 2) else {
                return Vec::new();
            };
            let subject = text(params, 1);
            MARKS
                .iter()
                .filter(|m| date(m.2) == on)
                .filter(|m| subject.as_deref().map_or(true, |s| class_info(m.1).0 == s))
                .map(|m| Row::new().with("status", m.3))
                .collect()
        })
        .respond_with(Store::Teacher, queries::GRADES_RANGE, |params| {
            if !owns_classes(params) || !in_range(params, date(8)) {
                return Vec::new();
            }
            GRADES
                .iter()
                .filter(|g| class_wanted(params, g.1))
                .map(|(student, class, assessment, score, max)| {
                    Row::new()
                        .with("student_id", *student)
                        .with("class_id", *class)
                        .with("assessment", *assessment)
                        .with("grading_period", "Q1")
                        .with("score", *score)
                        .with("max_score", *max)
                })
                .collect()
        })
        .respond_with(Store::Teacher, queries::ASSIGNMENT_SUBMISSIONS, |params| {
            if !owns_classes(params) {
                return Vec::new();
            }
            let mut rows = Vec::new();
            for (id, class, title, due, submissions) in ASSIGNMENTS {
                if !class_wanted(params, class) || !in_range(params, date(due)) {
                    continue;
                }
                let base = Row::new()
                    .with("assignment_id", id)
                    .with("class_id", class)
                    .with("title", title)
                    .with("due_date", date(due).format("%Y-%m-%d").to_string());
                for (student, status) in submissions {
                    rows.push(
                        base.clone()
                            .with("student_id", *student)
                            .with("status", *status),
                    );
                }
            }
            rows
        })
}
