//! Aggregation Engine bounds, bands, day counts and trends

use chrono::NaiveDate;
use classroll::adapters::source::Row;
use classroll::core::aggregate::{
    collect_trend, completion_rate, daily_counts, rate, AttendanceTally, BandDistribution,
    DailyCountScope, DayTally, RateBand, SubmissionTally,
};
use classroll::core::normalize::normalize;
use classroll::domain::{AttendanceStatus, SubmissionStatus};
use test_case::test_case;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
}

#[test]
fn test_rates_stay_in_bounds() {
    for total in 0..40u64 {
        for matched in 0..=total + 5 {
            let r = rate(matched, total);
            assert!(r.is_finite());
            assert!((0.0..=100.0).contains(&r), "rate({matched}, {total}) = {r}");
        }
    }
    assert_eq!(rate(3, 0), 0.0);
}

#[test_case(1, 3 => 33.3 ; "one third")]
#[test_case(2, 3 => 66.7 ; "two thirds")]
#[test_case(7, 7 => 100.0 ; "all")]
#[test_case(0, 9 => 0.0 ; "none")]
fn test_rate_rounds_to_one_decimal(matched: u64, total: u64) -> f64 {
    rate(matched, total)
}

#[test_case(3, 1, 8 => 50 ; "half")]
#[test_case(0, 0, 0 => 0 ; "no students")]
#[test_case(9, 4, 10 => 100 ; "clamped")]
fn test_completion_rate(submitted: u64, late: u64, students: u64) -> u32 {
    completion_rate(submitted, late, students)
}

#[test]
fn test_missing_rate_is_lowest_band() {
    let distribution = BandDistribution::from_rates([Some(95.0), Some(85.0), None, Some(10.0)]);
    assert_eq!(distribution.total(), 4);
    assert_eq!(distribution.count(RateBand::NeedsImprovement), 2);
    assert_eq!(RateBand::classify(None), RateBand::NeedsImprovement);
}

#[test]
fn test_inclusive_attendance_rate() {
    let tally = AttendanceTally::from_statuses([
        AttendanceStatus::Present,
        AttendanceStatus::Late,
        AttendanceStatus::Absent,
        AttendanceStatus::Excused,
    ]);
    assert_eq!(tally.attended(), 2);
    assert_eq!(tally.attendance_rate(), 50.0);
    assert_eq!(AttendanceTally::default().attendance_rate(), 0.0);
}

#[test]
fn test_submission_tally() {
    let mut tally = SubmissionTally::default();
    tally.record(SubmissionStatus::Submitted);
    tally.record(SubmissionStatus::Late);
    tally.record(SubmissionStatus::Missing);
    assert_eq!(tally.completion_rate(4), 50);
    assert_eq!(tally.missing_of(4), 2);
}

fn dashboard_rows() -> Vec<Row> {
    [("S1", "present"), ("S2", "absent"), ("S3", "late"), ("S4", "present")]
        .into_iter()
        .map(|(student, status)| {
            Row::new()
                .with("student_id", student)
                .with("class_id", "C1")
                .with("attendance_status", status)
        })
        .collect()
}

#[test]
fn test_day_counts_today_only() {
    let views = normalize(&dashboard_rows()).views;

    let today = daily_counts(&views, day(10), day(10), DailyCountScope::TodayOnly);
    assert!(today.counted);
    assert_eq!((today.present, today.absent, today.late), (2, 1, 1));

    let history = daily_counts(&views, day(9), day(10), DailyCountScope::TodayOnly);
    assert!(!history.counted);
    assert_eq!(history.total(), 0);

    let any = daily_counts(&views, day(9), day(10), DailyCountScope::AnyDate);
    assert_eq!(any.total(), 4);
}

#[test]
fn test_empty_input_is_all_zero() {
    let counts = daily_counts(&[], day(10), day(10), DailyCountScope::TodayOnly);
    assert!(counts.counted);
    assert_eq!(counts.total(), 0);
}

#[tokio::test]
async fn test_trend_symmetry() {
    for parallel in [true, false] {
        let trend = collect_trend(day(10), 7, parallel, |date| async move {
            let n = u64::from(chrono::Datelike::day(&date));
            // Every third day has no records at all
            let tally = if n % 3 == 0 {
                DayTally::new(0, 0)
            } else {
                DayTally::new(n % 4, n % 4 + n % 5)
            };
            Ok(tally)
        })
        .await
        .unwrap();

        assert_eq!(trend.len(), 7);
        assert_eq!(trend.dates.first(), Some(&day(4)));
        assert_eq!(trend.dates.last(), Some(&day(10)));
        for i in 0..trend.len() {
            assert_eq!(trend.matched[i] + trend.complement[i], trend.totals[i]);
        }
        // 2025-03-06 and 2025-03-09 have no records
        assert_eq!((trend.matched[2], trend.complement[2]), (0, 0));
        assert_eq!((trend.matched[5], trend.complement[5]), (0, 0));
    }
}
