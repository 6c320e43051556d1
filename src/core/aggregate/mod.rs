//! Aggregation Engine
//!
//! Counts, rates, trends and distribution bands derived from normalized
//! views or grouped rows. Empty input always produces all-zero results,
//! never an error; only store failures surface as `Err`.

pub mod daily;
pub mod rates;
pub mod tally;
pub mod trend;

pub use daily::{daily_counts, DailyCountScope, DayCounts};
pub use rates::{average, completion_rate, rate, BandDistribution, RateBand};
pub use tally::{group_marks, AttendanceTally, DayTally, SubmissionTally};
pub use trend::{collect_trend, trend_dates, Trend};
