//! Report datasets
//!
//! A [`ReportDataset`] is a summary plus ordered detail rows, built fresh
//! for every request and dropped once the response is written.

use crate::core::aggregate::{AttendanceTally, BandDistribution, SubmissionTally};
use crate::domain::{ClassId, ClassrollError, Result, TeacherId};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Longest date range a report may cover
pub const MAX_RANGE_DAYS: i64 = 366;

/// Report kinds offered by the portal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    Attendance,
    AttendanceLog,
    ClassPerformance,
    Assignments,
}

impl ReportKind {
    pub const ALL: [ReportKind; 4] = [
        ReportKind::Attendance,
        ReportKind::AttendanceLog,
        ReportKind::ClassPerformance,
        ReportKind::Assignments,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Attendance => "attendance",
            ReportKind::AttendanceLog => "attendance_log",
            ReportKind::ClassPerformance => "class_performance",
            ReportKind::Assignments => "assignments",
        }
    }

    /// Heading used on documents
    pub fn title(&self) -> &'static str {
        match self {
            ReportKind::Attendance => "Attendance Report",
            ReportKind::AttendanceLog => "Attendance Log",
            ReportKind::ClassPerformance => "Class Performance Report",
            ReportKind::Assignments => "Assignment Completion Report",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportKind {
    type Err = ClassrollError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        ReportKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| ClassrollError::Validation(format!("Unknown report type '{s}'")))
    }
}

/// Active filters of a report request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportFilters {
    pub teacher_id: TeacherId,
    /// `None` means all of the teacher's classes
    pub class_id: Option<ClassId>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl ReportFilters {
    /// # Errors
    ///
    /// `Validation` when the range is reversed or longer than
    /// [`MAX_RANGE_DAYS`].
    pub fn new(
        teacher_id: TeacherId,
        class_id: Option<ClassId>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Self> {
        if end_date < start_date {
            return Err(ClassrollError::Validation(
                "end_date must not be before start_date".to_string(),
            ));
        }
        if (end_date - start_date).num_days() >= MAX_RANGE_DAYS {
            return Err(ClassrollError::Validation(format!(
                "Date range cannot exceed {MAX_RANGE_DAYS} days"
            )));
        }
        Ok(Self {
            teacher_id,
            class_id,
            start_date,
            end_date,
        })
    }

    /// Class scope as shown in filenames and metadata
    pub fn class_scope(&self) -> &str {
        self.class_id.as_ref().map_or("all", |c| c.as_str())
    }

    pub fn period(&self) -> String {
        format!(
            "{} to {}",
            self.start_date.format("%Y-%m-%d"),
            self.end_date.format("%Y-%m-%d")
        )
    }
}

/// Detail column: stable key plus header label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Column {
    pub key: &'static str,
    pub label: &'static str,
}

impl Column {
    pub const fn new(key: &'static str, label: &'static str) -> Self {
        Self { key, label }
    }
}

/// Per-class average inside a performance summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassAverage {
    pub class_id: ClassId,
    pub label: String,
    pub students: u64,
    pub average: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AttendanceSummary {
    pub students: u64,
    pub classes: u64,
    pub days_recorded: u64,
    pub totals: AttendanceTally,
    pub attendance_rate: f64,
    pub distribution: BandDistribution,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AttendanceLogSummary {
    pub marks: u64,
    pub totals: AttendanceTally,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PerformanceSummary {
    pub students: u64,
    pub assessments: u64,
    pub overall_average: Option<f64>,
    pub class_averages: Vec<ClassAverage>,
    pub distribution: BandDistribution,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AssignmentSummary {
    pub assignments: u64,
    /// Sum of enrolled head counts across assignments
    pub expected_submissions: u64,
    pub totals: SubmissionTally,
    pub completion_rate: u32,
}

/// Summary aggregate, one shape per report kind
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReportSummary {
    Attendance(AttendanceSummary),
    AttendanceLog(AttendanceLogSummary),
    ClassPerformance(PerformanceSummary),
    Assignments(AssignmentSummary),
}

impl ReportSummary {
    /// Short human-readable lines for document metadata
    pub fn lines(&self) -> Vec<String> {
        match self {
            ReportSummary::Attendance(s) => vec![
                format!("Students: {}  Classes: {}", s.students, s.classes),
                format!(
                    "Present: {}  Absent: {}  Late: {}  Excused: {}",
                    s.totals.present, s.totals.absent, s.totals.late, s.totals.excused
                ),
                format!("Attendance rate: {:.1}%", s.attendance_rate),
            ],
            ReportSummary::AttendanceLog(s) => vec![format!(
                "Marks: {}  Present: {}  Absent: {}  Late: {}  Excused: {}",
                s.marks, s.totals.present, s.totals.absent, s.totals.late, s.totals.excused
            )],
            ReportSummary::ClassPerformance(s) => vec![
                format!("Students: {}  Assessments: {}", s.students, s.assessments),
                match s.overall_average {
                    Some(avg) => format!("Overall average: {avg:.1}%"),
                    None => "Overall average: n/a".to_string(),
                },
            ],
            ReportSummary::Assignments(s) => vec![
                format!(
                    "Assignments: {}  Submitted: {}  Late: {}  Missing: {}",
                    s.assignments, s.totals.submitted, s.totals.late, s.totals.missing
                ),
                format!("Completion rate: {}%", s.completion_rate),
            ],
        }
    }
}

/// Summary plus ordered detail rows for one report request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportDataset {
    pub kind: ReportKind,
    pub filters: ReportFilters,
    pub generated_at: NaiveDateTime,
    pub summary: ReportSummary,
    pub columns: Vec<Column>,
    /// One cell per column, in column order
    pub rows: Vec<Vec<Value>>,
    /// Join rows dropped while building the dataset
    pub skipped_rows: usize,
}

impl ReportDataset {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.label).collect()
    }

    /// Rows rendered to display text, column aligned
    pub fn text_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                (0..self.columns.len())
                    .map(|i| row.get(i).map(cell_text).unwrap_or_default())
                    .collect()
            })
            .collect()
    }
}

/// Display text for one cell; null renders empty
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => format!("{f:.1}"),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

/// Outcome of building a report
#[derive(Debug, Clone, PartialEq)]
pub enum ReportOutcome {
    Ready(ReportDataset),
    /// Valid query, nothing to report
    NoData { message: String },
}

pub const NO_DATA_MESSAGE: &str = "No data found for the selected criteria";

impl ReportOutcome {
    pub fn from_dataset(dataset: ReportDataset) -> Self {
        if dataset.is_empty() {
            ReportOutcome::NoData {
                message: NO_DATA_MESSAGE.to_string(),
            }
        } else {
            ReportOutcome::Ready(dataset)
        }
    }
}
