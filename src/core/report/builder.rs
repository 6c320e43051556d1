//! Report dataset construction
//!
//! Each report kind runs its store queries, joins registrar identity onto
//! teacher-store rows, folds them with the normalizer and aggregates the
//! result into a [`ReportDataset`].

use super::dataset::{
    AssignmentSummary, AttendanceLogSummary, AttendanceSummary, ClassAverage, Column,
    PerformanceSummary, ReportDataset, ReportFilters, ReportKind, ReportOutcome, ReportSummary,
};
use super::{queries, records};
use crate::adapters::source::{Query, RecordSource, Row};
use crate::config::ReportsConfig;
use crate::core::aggregate::{
    average, group_marks, AttendanceTally, BandDistribution, DailyCountScope, RateBand,
    SubmissionTally,
};
use crate::core::normalize::{left_join, normalize, NormalizeReport, NormalizedStudentView};
use crate::domain::{AttendanceMark, ClassId, Result, StudentId};
use chrono::NaiveDateTime;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

static ATTENDANCE_COLUMNS: [Column; 10] = [
    Column::new("student_id", "Student ID"),
    Column::new("student_name", "Student Name"),
    Column::new("class", "Class"),
    Column::new("present", "Present"),
    Column::new("absent", "Absent"),
    Column::new("late", "Late"),
    Column::new("excused", "Excused"),
    Column::new("days_recorded", "Days Recorded"),
    Column::new("attendance_rate", "Attendance Rate (%)"),
    Column::new("band", "Band"),
];

static ATTENDANCE_LOG_COLUMNS: [Column; 7] = [
    Column::new("date", "Date"),
    Column::new("student_id", "Student ID"),
    Column::new("student_name", "Student Name"),
    Column::new("class", "Class"),
    Column::new("status", "Status"),
    Column::new("notes", "Notes"),
    Column::new("recorded_by", "Recorded By"),
];

static PERFORMANCE_COLUMNS: [Column; 6] = [
    Column::new("student_id", "Student ID"),
    Column::new("student_name", "Student Name"),
    Column::new("class", "Class"),
    Column::new("assessments", "Assessments"),
    Column::new("average", "Average (%)"),
    Column::new("band", "Band"),
];

static ASSIGNMENT_COLUMNS: [Column; 9] = [
    Column::new("assignment_id", "Assignment ID"),
    Column::new("title", "Title"),
    Column::new("class", "Class"),
    Column::new("due_date", "Due Date"),
    Column::new("submitted", "Submitted"),
    Column::new("late", "Late"),
    Column::new("missing", "Missing"),
    Column::new("enrolled", "Enrolled"),
    Column::new("completion_rate", "Completion Rate (%)"),
];

/// Report-time settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportSettings {
    pub trend_days: usize,
    pub daily_counts: DailyCountScope,
    pub parallel_trend_queries: bool,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            trend_days: 7,
            daily_counts: DailyCountScope::TodayOnly,
            parallel_trend_queries: true,
        }
    }
}

impl From<&ReportsConfig> for ReportSettings {
    fn from(config: &ReportsConfig) -> Self {
        let daily_counts = config.daily_counts.parse().unwrap_or_else(|err: String| {
            tracing::warn!(error = %err, "Falling back to today_only day counts");
            DailyCountScope::TodayOnly
        });
        Self {
            trend_days: config.trend_days,
            daily_counts,
            parallel_trend_queries: config.parallel_trend_queries,
        }
    }
}

/// Student views plus the rows that could not be used to build them
#[derive(Debug, Clone, Default)]
pub struct StudentViews {
    pub views: Vec<NormalizedStudentView>,
    pub skipped_rows: usize,
}

/// Builds report datasets and dashboards from a [`RecordSource`]
#[derive(Clone)]
pub struct ReportBuilder {
    source: Arc<dyn RecordSource + Send + Sync>,
    settings: ReportSettings,
}

impl ReportBuilder {
    pub fn new(source: Arc<dyn RecordSource + Send + Sync>, settings: ReportSettings) -> Self {
        Self { source, settings }
    }

    pub fn source(&self) -> &(dyn RecordSource + Send + Sync) {
        self.source.as_ref()
    }

    pub fn settings(&self) -> &ReportSettings {
        &self.settings
    }

    pub(crate) async fn fetch(&self, query: Query) -> Result<Vec<Row>> {
        self.source.fetch(&query).await
    }

    /// Build a report and classify an empty result as no data
    ///
    /// # Errors
    ///
    /// Only store failures are returned; empty results become
    /// [`ReportOutcome::NoData`].
    pub async fn report(
        &self,
        kind: ReportKind,
        filters: ReportFilters,
        generated_at: NaiveDateTime,
    ) -> Result<ReportOutcome> {
        crate::log_report_start!(
            kind,
            format!("class={} {}", filters.class_scope(), filters.period())
        );
        let started = Instant::now();

        let dataset = self.build(kind, filters, generated_at).await?;

        tracing::info!(
            report = %kind,
            rows = dataset.rows.len(),
            skipped = dataset.skipped_rows,
            duration_ms = started.elapsed().as_millis() as u64,
            "Report built"
        );
        Ok(ReportOutcome::from_dataset(dataset))
    }

    /// Build the dataset for `kind`
    pub async fn build(
        &self,
        kind: ReportKind,
        filters: ReportFilters,
        generated_at: NaiveDateTime,
    ) -> Result<ReportDataset> {
        let (summary, columns, rows, skipped_rows) = match kind {
            ReportKind::Attendance => self.attendance(&filters).await?,
            ReportKind::AttendanceLog => self.attendance_log(&filters).await?,
            ReportKind::ClassPerformance => self.class_performance(&filters).await?,
            ReportKind::Assignments => self.assignments(&filters).await?,
        };

        Ok(ReportDataset {
            kind,
            filters,
            generated_at,
            summary,
            columns: columns.to_vec(),
            rows,
            skipped_rows,
        })
    }

    /// Join registrar identity onto teacher-store rows and normalize
    ///
    /// `right` rows are keyed by `student_id`; the registrar's order decides
    /// the order of the views. Right rows without a usable key, and students
    /// unknown to the registrar, are counted as skipped.
    pub async fn student_views(&self, right: &[Row]) -> Result<StudentViews> {
        let mut seen = HashSet::new();
        let mut ids = Vec::new();
        let mut skipped_rows = 0;
        for row in right {
            match row.get("student_id").and_then(StudentId::from_value) {
                Some(id) => {
                    if seen.insert(id.clone()) {
                        ids.push(id);
                    }
                }
                None => skipped_rows += 1,
            }
        }

        if ids.is_empty() {
            return Ok(StudentViews {
                views: Vec::new(),
                skipped_rows,
            });
        }

        let students = self.fetch(queries::students_by_ids(&ids)).await?;
        let joined = left_join(&students, right, "student_id");
        let NormalizeReport {
            views,
            skipped_rows: malformed,
        } = normalize(&joined);

        let known: HashSet<&str> = views.iter().map(|v| v.student_id()).collect();
        let orphans = ids.iter().filter(|id| !known.contains(id.as_str())).count();
        if orphans > 0 {
            tracing::warn!(
                orphans,
                "Teacher-store rows reference students missing from the registrar"
            );
        }

        Ok(StudentViews {
            views,
            skipped_rows: skipped_rows + malformed + orphans,
        })
    }

    async fn attendance(&self, filters: &ReportFilters) -> Result<Built> {
        let teacher = &filters.teacher_id;
        let class = filters.class_id.as_ref();

        let roster = self.fetch(queries::class_roster(teacher, class)).await?;
        let StudentViews {
            views,
            skipped_rows,
        } = self.student_views(&roster).await?;

        let mark_rows = self
            .fetch(queries::attendance_range(
                teacher,
                class,
                filters.start_date,
                filters.end_date,
            ))
            .await?;
        let parsed = records::marks(&mark_rows);
        if parsed.records.is_empty() {
            return Ok((
                ReportSummary::Attendance(AttendanceSummary::default()),
                &ATTENDANCE_COLUMNS[..],
                Vec::new(),
                skipped_rows + parsed.skipped,
            ));
        }
        let days_recorded = parsed
            .records
            .iter()
            .map(|m| m.date)
            .collect::<HashSet<_>>()
            .len() as u64;
        let tallies: HashMap<(StudentId, ClassId), AttendanceTally> =
            group_marks(&parsed.records).into_iter().collect();

        let mut summary = AttendanceSummary {
            students: views.len() as u64,
            days_recorded,
            ..AttendanceSummary::default()
        };
        let mut classes = HashSet::new();
        let mut rows = Vec::new();

        for view in &views {
            for entry in view.classes.iter() {
                let key = (view.student.student_id.clone(), entry.class_id.clone());
                let tally = tallies.get(&key).copied().unwrap_or_default();
                let rate = tally.attendance_rate();
                let band = RateBand::classify((tally.recorded() > 0).then_some(rate));

                summary.totals.merge(&tally);
                summary.distribution.add(band);
                classes.insert(entry.class_id.clone());

                rows.push(vec![
                    json!(view.student_id()),
                    json!(view.display_name),
                    json!(entry.label()),
                    json!(tally.present),
                    json!(tally.absent),
                    json!(tally.late),
                    json!(tally.excused),
                    json!(tally.recorded()),
                    json!(rate),
                    json!(band.label()),
                ]);
            }
        }

        summary.classes = classes.len() as u64;
        summary.attendance_rate = summary.totals.attendance_rate();

        Ok((
            ReportSummary::Attendance(summary),
            &ATTENDANCE_COLUMNS[..],
            rows,
            skipped_rows + parsed.skipped,
        ))
    }

    async fn attendance_log(&self, filters: &ReportFilters) -> Result<Built> {
        let teacher = &filters.teacher_id;
        let class = filters.class_id.as_ref();

        let mark_rows = self
            .fetch(queries::attendance_range(
                teacher,
                class,
                filters.start_date,
                filters.end_date,
            ))
            .await?;
        let parsed = records::marks(&mark_rows);

        let summary = AttendanceLogSummary {
            marks: parsed.records.len() as u64,
            totals: AttendanceTally::from_statuses(parsed.records.iter().map(|m| m.status)),
            first_date: parsed.records.iter().map(|m| m.date).min(),
            last_date: parsed.records.iter().map(|m| m.date).max(),
        };
        if parsed.records.is_empty() {
            return Ok((
                ReportSummary::AttendanceLog(summary),
                &ATTENDANCE_LOG_COLUMNS[..],
                Vec::new(),
                parsed.skipped,
            ));
        }

        let labels = self.class_labels(filters).await?;
        let names = self.student_names(&parsed.records).await?;

        let rows = parsed
            .records
            .iter()
            .map(|mark| {
                vec![
                    json!(mark.date.format("%Y-%m-%d").to_string()),
                    json!(mark.student_id.as_str()),
                    json!(names.get(mark.student_id.as_str()).cloned().unwrap_or_default()),
                    json!(labels
                        .get(mark.class_id.as_str())
                        .cloned()
                        .unwrap_or_else(|| mark.class_id.to_string())),
                    json!(mark.status.as_str()),
                    mark.notes.as_deref().map_or(Value::Null, |n| json!(n)),
                    mark.recorded_by
                        .as_ref()
                        .map_or(Value::Null, |t| json!(t.as_str())),
                ]
            })
            .collect();

        Ok((
            ReportSummary::AttendanceLog(summary),
            &ATTENDANCE_LOG_COLUMNS[..],
            rows,
            parsed.skipped,
        ))
    }

    async fn class_performance(&self, filters: &ReportFilters) -> Result<Built> {
        let teacher = &filters.teacher_id;
        let class = filters.class_id.as_ref();

        let roster = self.fetch(queries::class_roster(teacher, class)).await?;
        let StudentViews {
            views,
            skipped_rows,
        } = self.student_views(&roster).await?;

        let grade_rows = self
            .fetch(queries::grades_range(
                teacher,
                class,
                filters.start_date,
                filters.end_date,
            ))
            .await?;
        let parsed = records::grades(&grade_rows);
        if parsed.records.is_empty() {
            return Ok((
                ReportSummary::ClassPerformance(PerformanceSummary::default()),
                &PERFORMANCE_COLUMNS[..],
                Vec::new(),
                skipped_rows + parsed.skipped,
            ));
        }

        let mut percentages: HashMap<(StudentId, ClassId), Vec<f64>> = HashMap::new();
        for grade in &parsed.records {
            if let Some(pct) = grade.percentage() {
                percentages
                    .entry((grade.student_id.clone(), grade.class_id.clone()))
                    .or_default()
                    .push(pct);
            }
        }

        let mut distribution = BandDistribution::default();
        let mut per_class: Vec<(ClassId, String, Vec<f64>, u64)> = Vec::new();
        let mut all_averages = Vec::new();
        let mut rows = Vec::new();

        for view in &views {
            for entry in view.classes.iter() {
                let key = (view.student.student_id.clone(), entry.class_id.clone());
                let scores = percentages.get(&key).map(Vec::as_slice).unwrap_or(&[]);
                let avg = average(scores);
                let band = RateBand::classify(avg);
                distribution.add(band);

                let position = match per_class.iter().position(|c| c.0 == entry.class_id) {
                    Some(i) => i,
                    None => {
                        per_class.push((entry.class_id.clone(), entry.label(), Vec::new(), 0));
                        per_class.len() - 1
                    }
                };
                per_class[position].3 += 1;
                if let Some(avg) = avg {
                    per_class[position].2.push(avg);
                    all_averages.push(avg);
                }

                rows.push(vec![
                    json!(view.student_id()),
                    json!(view.display_name),
                    json!(entry.label()),
                    json!(scores.len()),
                    avg.map_or(Value::Null, |a| json!(a)),
                    json!(band.label()),
                ]);
            }
        }

        let summary = PerformanceSummary {
            students: views.len() as u64,
            assessments: parsed.records.len() as u64,
            overall_average: average(&all_averages),
            class_averages: per_class
                .into_iter()
                .map(|(class_id, label, averages, students)| ClassAverage {
                    class_id,
                    label,
                    students,
                    average: average(&averages),
                })
                .collect(),
            distribution,
        };

        Ok((
            ReportSummary::ClassPerformance(summary),
            &PERFORMANCE_COLUMNS[..],
            rows,
            skipped_rows + parsed.skipped,
        ))
    }

    async fn assignments(&self, filters: &ReportFilters) -> Result<Built> {
        let teacher = &filters.teacher_id;
        let class = filters.class_id.as_ref();

        let assignment_rows = self
            .fetch(queries::assignment_submissions(
                teacher,
                class,
                filters.start_date,
                filters.end_date,
            ))
            .await?;
        let parsed = records::assignments(&assignment_rows);
        if parsed.records.is_empty() {
            return Ok((
                ReportSummary::Assignments(AssignmentSummary::default()),
                &ASSIGNMENT_COLUMNS[..],
                Vec::new(),
                parsed.skipped,
            ));
        }

        let roster = self.fetch(queries::class_roster(teacher, class)).await?;
        let mut enrolled: HashMap<ClassId, HashSet<StudentId>> = HashMap::new();
        for row in &roster {
            let student = row.get("student_id").and_then(StudentId::from_value);
            let class_id = row.get("class_id").and_then(ClassId::from_value);
            if let (Some(student), Some(class_id)) = (student, class_id) {
                enrolled.entry(class_id).or_default().insert(student);
            }
        }
        let labels = self.class_labels(filters).await?;

        let mut summary = AssignmentSummary {
            assignments: parsed.records.len() as u64,
            ..AssignmentSummary::default()
        };
        let mut rows = Vec::new();

        for assignment in &parsed.records {
            let head_count = enrolled
                .get(&assignment.class_id)
                .map_or(0, |students| students.len() as u64);

            let mut tally = SubmissionTally::default();
            for (_, status) in &assignment.submissions {
                tally.record(*status);
            }
            let missing = tally.missing_of(head_count);
            let completion = tally.completion_rate(head_count);

            summary.expected_submissions += head_count;
            summary.totals.merge(&SubmissionTally {
                missing,
                ..tally
            });

            rows.push(vec![
                json!(assignment.assignment_id),
                json!(assignment.title),
                json!(labels
                    .get(assignment.class_id.as_str())
                    .cloned()
                    .unwrap_or_else(|| assignment.class_id.to_string())),
                assignment
                    .due_date
                    .map_or(Value::Null, |d| json!(d.format("%Y-%m-%d").to_string())),
                json!(tally.submitted),
                json!(tally.late),
                json!(missing),
                json!(head_count),
                json!(completion),
            ]);
        }

        summary.completion_rate = summary.totals.completion_rate(summary.expected_submissions);

        Ok((
            ReportSummary::Assignments(summary),
            &ASSIGNMENT_COLUMNS[..],
            rows,
            parsed.skipped,
        ))
    }

    /// Class id → label for the classes in scope
    async fn class_labels(&self, filters: &ReportFilters) -> Result<HashMap<String, String>> {
        let rows = self
            .fetch(queries::teacher_classes(
                &filters.teacher_id,
                filters.class_id.as_ref(),
            ))
            .await?;
        Ok(records::classes(&rows)
            .records
            .into_iter()
            .map(|class| (class.class_id.to_string(), class.label()))
            .collect())
    }

    /// Student id → display name for the students behind `marks`
    async fn student_names(
        &self,
        marks: &[AttendanceMark],
    ) -> Result<HashMap<String, String>> {
        let mut seen = HashSet::new();
        let ids: Vec<StudentId> = marks
            .iter()
            .filter(|m| seen.insert(m.student_id.clone()))
            .map(|m| m.student_id.clone())
            .collect();

        let students = self.fetch(queries::students_by_ids(&ids)).await?;
        Ok(normalize(&students)
            .views
            .into_iter()
            .map(|view| (view.student_id().to_string(), view.display_name))
            .collect())
    }
}

type Built = (ReportSummary, &'static [Column], Vec<Vec<Value>>, usize);
