//! N-day trends

use super::tally::DayTally;
use crate::domain::Result;
use chrono::{Days, NaiveDate};
use serde::Serialize;
use std::future::Future;

/// Parallel per-day sequences, oldest day first
///
/// For every index `matched[i] + complement[i] == totals[i]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Trend {
    pub dates: Vec<NaiveDate>,
    /// Short weekday labels for chart axes
    pub labels: Vec<String>,
    pub matched: Vec<u64>,
    pub complement: Vec<u64>,
    pub totals: Vec<u64>,
}

impl Trend {
    pub fn from_days(days: Vec<(NaiveDate, DayTally)>) -> Self {
        let mut trend = Trend::default();
        for (date, tally) in days {
            trend.dates.push(date);
            trend.labels.push(date.format("%a").to_string());
            trend.matched.push(tally.matched);
            trend.complement.push(tally.complement());
            trend.totals.push(tally.total);
        }
        trend
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// `days` consecutive calendar dates ending at `today`, oldest first
pub fn trend_dates(today: NaiveDate, days: usize) -> Vec<NaiveDate> {
    (0..days as u64)
        .rev()
        .filter_map(|back| today.checked_sub_days(Days::new(back)))
        .collect()
}

/// Run one aggregation per day and reassemble the results in day order
///
/// With `parallel` the per-day futures run concurrently; each one returns
/// its own [`DayTally`] and nothing is shared between them.
///
/// # Errors
///
/// Returns the first error any day produced.
pub async fn collect_trend<F, Fut>(
    today: NaiveDate,
    days: usize,
    parallel: bool,
    fetch_day: F,
) -> Result<Trend>
where
    F: Fn(NaiveDate) -> Fut,
    Fut: Future<Output = Result<DayTally>>,
{
    let dates = trend_dates(today, days);

    let tallies: Vec<DayTally> = if parallel {
        futures::future::try_join_all(dates.iter().map(|date| fetch_day(*date))).await?
    } else {
        let mut tallies = Vec::with_capacity(dates.len());
        for date in &dates {
            tallies.push(fetch_day(*date).await?);
        }
        tallies
    };

    tracing::debug!(days = dates.len(), parallel, "Trend collected");
    Ok(Trend::from_days(dates.into_iter().zip(tallies).collect()))
}
