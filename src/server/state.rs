//! Shared handler state

use crate::adapters::source::RecordSource;
use crate::config::ClassrollConfig;
use crate::core::export::Exporter;
use crate::core::report::{ReportBuilder, ReportSettings};
use chrono::{Local, NaiveDate, NaiveDateTime};
use std::sync::Arc;

/// Source of "now" for dashboards, filenames and default date ranges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clock {
    /// Local wall-clock time
    System,
    /// Fixed instant
    Fixed(NaiveDateTime),
}

impl Clock {
    pub fn now(&self) -> NaiveDateTime {
        match self {
            Clock::System => Local::now().naive_local(),
            Clock::Fixed(at) => *at,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Everything a handler needs; cheap to clone per request
#[derive(Clone)]
pub struct AppState {
    pub builder: ReportBuilder,
    pub exporter: Exporter,
    pub clock: Clock,
}

impl AppState {
    pub fn new(builder: ReportBuilder, exporter: Exporter) -> Self {
        Self {
            builder,
            exporter,
            clock: Clock::System,
        }
    }

    /// State wired from configuration around an existing record source
    pub fn from_config(
        config: &ClassrollConfig,
        source: Arc<dyn RecordSource + Send + Sync>,
    ) -> Self {
        Self::new(
            ReportBuilder::new(source, ReportSettings::from(&config.reports)),
            Exporter::from_config(&config.export),
        )
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }
}
