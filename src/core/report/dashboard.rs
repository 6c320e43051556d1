//! Attendance dashboard aggregation
//!
//! Normalized student/class view for one date, the stat-card counts and
//! the attendance trend ending today.

use super::builder::{ReportBuilder, StudentViews};
use super::{queries, records};
use crate::core::aggregate::{collect_trend, daily_counts, AttendanceTally, DayCounts, Trend};
use crate::core::normalize::NormalizedStudentView;
use crate::domain::{AttendanceStatus, ClassId, ClassRecord, Result, TeacherId};
use chrono::NaiveDate;
use serde::Serialize;
use std::time::Instant;

/// Everything the dashboard page renders
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub date: NaiveDate,
    pub class_id: Option<ClassId>,
    /// All of the teacher's classes, for the class filter
    pub classes: Vec<ClassRecord>,
    pub students: Vec<NormalizedStudentView>,
    pub counts: DayCounts,
    /// Attended marks (present or late) per day
    pub trend: Trend,
    pub skipped_rows: usize,
}

impl ReportBuilder {
    /// Build the dashboard for `date`
    ///
    /// The trend always ends at `today` and is scoped to the teacher plus,
    /// when a class is selected, that class's subject.
    ///
    /// # Errors
    ///
    /// Returns `SourceUnavailable` if any store query fails; nothing is
    /// partially returned.
    pub async fn dashboard(
        &self,
        teacher_id: &TeacherId,
        class_id: Option<&ClassId>,
        date: NaiveDate,
        today: NaiveDate,
    ) -> Result<Dashboard> {
        let started = Instant::now();

        let class_rows = self.fetch(queries::teacher_classes(teacher_id, None)).await?;
        let classes = records::classes(&class_rows).records;
        let subject = class_id.and_then(|wanted| {
            classes
                .iter()
                .find(|c| &c.class_id == wanted)
                .map(|c| c.subject.clone())
        });

        let roster = self
            .fetch(queries::roster_with_marks(teacher_id, class_id, date))
            .await?;
        let StudentViews {
            views,
            skipped_rows,
        } = self.student_views(&roster).await?;

        let settings = *self.settings();
        let counts = daily_counts(&views, date, today, settings.daily_counts);

        let trend = collect_trend(
            today,
            settings.trend_days,
            settings.parallel_trend_queries,
            |day| {
                let query = queries::day_statuses(teacher_id, subject.as_deref(), day);
                async move {
                    let rows = self.fetch(query).await?;
                    let tally = AttendanceTally::from_statuses(rows.iter().map(|row| {
                        AttendanceStatus::parse(&row.get_str("status").unwrap_or_default())
                    }));
                    Ok(tally.as_day())
                }
            },
        )
        .await?;

        tracing::info!(
            teacher_id = %teacher_id,
            class_id = class_id.map_or("all", |c| c.as_str()),
            %date,
            students = views.len(),
            skipped = skipped_rows,
            duration_ms = started.elapsed().as_millis() as u64,
            "Dashboard built"
        );

        Ok(Dashboard {
            date,
            class_id: class_id.cloned(),
            classes,
            students: views,
            counts,
            trend,
            skipped_rows,
        })
    }
}
