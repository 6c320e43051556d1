//! Join Normalizer
//!
//! Folds flat join rows (one per student × class × mark) into one
//! [`NormalizedStudentView`] per distinct student, in first-seen order.
//!
//! Rows are expected to carry the registrar identity columns
//! (`student_id`, `first_name`, ...) plus the nullable teacher-store
//! columns listed on [`columns`].

use super::view::{ClassEntry, NormalizedStudentView};
use crate::adapters::source::Row;
use crate::domain::{AttendanceStatus, ClassId, StudentId, StudentRecord};
use serde::Serialize;
use std::collections::HashMap;

/// Column names read from join rows
pub mod columns {
    pub const STUDENT_ID: &str = "student_id";
    pub const CLASS_ID: &str = "class_id";
    pub const BIRTHDATE: [&str; 3] = ["birthdate", "birth_date", "date_of_birth"];
    pub const CONTACT: [&str; 3] = ["contact_number", "contact", "phone"];
    pub const SUBJECT: &str = "subject";
    pub const CLASS_GRADE_LEVEL: &str = "class_grade_level";
    pub const CLASS_SECTION: &str = "class_section";
    pub const SCHEDULE: &str = "schedule";
    pub const ROOM: &str = "room";
    pub const ENROLLMENT_STATUS: &str = "enrollment_status";
    pub const ATTENDANCE_STATUS: &str = "attendance_status";
    pub const ATTENDANCE_NOTES: &str = "attendance_notes";
    pub const GRADE: [&str; 2] = ["grade", "grade_percentage"];
}

/// Result of one normalization pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizeReport {
    pub views: Vec<NormalizedStudentView>,
    /// Rows dropped because they had no usable `student_id`
    pub skipped_rows: usize,
}

/// Streaming fold over join rows
///
/// ```
/// use classroll::adapters::source::Row;
/// use classroll::core::normalize::Normalizer;
///
/// let mut normalizer = Normalizer::new();
/// normalizer.fold(&Row::new().with("student_id", "S1").with("class_id", "C1"));
/// normalizer.fold(&Row::new().with("student_id", "S1").with("class_id", "C1"));
/// let report = normalizer.finish();
/// assert_eq!(report.views.len(), 1);
/// assert_eq!(report.views[0].classes.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct Normalizer {
    views: Vec<NormalizedStudentView>,
    index: HashMap<String, usize>,
    skipped_rows: usize,
}

impl Normalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one row into the graph
    pub fn fold(&mut self, row: &Row) {
        let student_id = match row.get(columns::STUDENT_ID).and_then(StudentId::from_value) {
            Some(id) => id,
            None => {
                self.skipped_rows += 1;
                tracing::warn!(
                    fields = row.len(),
                    skipped = self.skipped_rows,
                    "Skipping join row without student_id"
                );
                return;
            }
        };

        let position = match self.index.get(student_id.as_str()) {
            Some(&i) => i,
            None => {
                let i = self.views.len();
                self.index.insert(student_id.as_str().to_string(), i);
                self.views
                    .push(NormalizedStudentView::new(student_from_row(student_id, row)));
                i
            }
        };

        let Some(class_id) = row.get(columns::CLASS_ID).and_then(ClassId::from_value) else {
            return;
        };

        let view = &mut self.views[position];
        let (entry, _) = view
            .classes
            .upsert_with(&class_id, || class_from_row(class_id.clone(), row));
        merge_period_status(entry, row);
    }

    pub fn finish(self) -> NormalizeReport {
        if self.skipped_rows > 0 {
            tracing::warn!(
                skipped = self.skipped_rows,
                views = self.views.len(),
                "Normalization skipped malformed rows"
            );
        }
        NormalizeReport {
            views: self.views,
            skipped_rows: self.skipped_rows,
        }
    }
}

/// Normalize a complete row sequence
pub fn normalize(rows: &[Row]) -> NormalizeReport {
    let mut normalizer = Normalizer::new();
    for row in rows {
        normalizer.fold(row);
    }
    let report = normalizer.finish();
    tracing::debug!(
        rows = rows.len(),
        views = report.views.len(),
        skipped = report.skipped_rows,
        "Normalized join rows"
    );
    report
}

/// Identity fields with display defaults: missing text becomes `""`
fn student_from_row(student_id: StudentId, row: &Row) -> StudentRecord {
    let text = |name: &str| row.get_str(name).map(|s| s.trim().to_string()).unwrap_or_default();

    let birthdate = columns::BIRTHDATE.iter().find_map(|name| row.get_date(name));

    StudentRecord {
        student_id,
        first_name: text("first_name"),
        middle_name: text("middle_name"),
        last_name: text("last_name"),
        gender: text("gender"),
        birthdate,
        email: text("email"),
        contact_number: row.get_str_any(&columns::CONTACT).unwrap_or_default(),
        address: text("address"),
        grade_level: text("grade_level"),
        section: text("section"),
        status: text("status"),
    }
}

fn class_from_row(class_id: ClassId, row: &Row) -> ClassEntry {
    let text = |name: &str| row.get_str(name).unwrap_or_default();

    let mut entry = ClassEntry::new(class_id);
    entry.subject = text(columns::SUBJECT);
    entry.grade_level = text(columns::CLASS_GRADE_LEVEL);
    entry.section = text(columns::CLASS_SECTION);
    entry.schedule = text(columns::SCHEDULE);
    entry.room = text(columns::ROOM);
    entry.enrollment_status = row.get_str(columns::ENROLLMENT_STATUS);
    entry
}

/// Overwrite per-period fields only with non-null incoming values
fn merge_period_status(entry: &mut ClassEntry, row: &Row) {
    if let Some(raw) = row.get_str(columns::ATTENDANCE_STATUS) {
        entry.attendance = Some(AttendanceStatus::parse(&raw));
    }
    if let Some(notes) = row.get_str(columns::ATTENDANCE_NOTES) {
        entry.attendance_notes = Some(notes);
    }
    if let Some(grade) = columns::GRADE.iter().find_map(|name| row.get_f64(name)) {
        entry.grade = Some(grade);
    }
    if entry.enrollment_status.is_none() {
        entry.enrollment_status = row.get_str(columns::ENROLLMENT_STATUS);
    }
}
