//! Export command implementation
//!
//! Builds one report and writes the delivered file to disk. With
//! `--fixtures` the rows come from a JSON fixture instead of the stores,
//! which is handy for checking layouts without a database.

use crate::adapters::source::{create_record_source, MemorySource, RecordSource};
use crate::config::{load_config, ClassrollConfig, ExportConfig};
use crate::core::export::{ExportOutcome, Exporter};
use crate::core::report::{
    verify_teacher, ReportBuilder, ReportFilters, ReportKind, ReportSettings,
};
use crate::domain::{ClassId, ClassrollError, TeacherId};
use chrono::{Local, NaiveDate};
use clap::Args;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Report kind (attendance, attendance_log, class_performance, assignments)
    pub kind: String,

    /// Teacher whose classes are reported
    #[arg(long, env = "CLASSROLL_TEACHER_ID")]
    pub teacher_id: String,

    /// Restrict to one class (default: all of the teacher's classes)
    #[arg(long)]
    pub class_id: Option<String>,

    /// First day of the range (YYYY-MM-DD)
    #[arg(long)]
    pub start: NaiveDate,

    /// Last day of the range (YYYY-MM-DD, default: today)
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Output format: csv, spreadsheet or pdf (default: configured format)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Directory the file is written to
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// Serve rows from a JSON fixture instead of the configured stores
    #[arg(long, value_name = "FILE")]
    pub fixtures: Option<PathBuf>,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(kind = %self.kind, "Starting export command");

        let (kind, filters) = match self.filters() {
            Ok(parsed) => parsed,
            Err(e) => {
                eprintln!("{}", e.user_message());
                return Ok(2); // Validation error exit code
            }
        };

        // A config file is optional when rows come from fixtures
        let config = if self.fixtures.is_some() && !Path::new(config_path).exists() {
            None
        } else {
            match load_config(config_path) {
                Ok(c) => Some(c),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to load configuration");
                    eprintln!("Failed to load configuration: {e}");
                    return Ok(2); // Configuration error exit code
                }
            }
        };

        let source = match self.record_source(config.as_ref()).await {
            Ok(s) => s,
            Err(ClassrollError::Configuration(msg)) => {
                eprintln!("Invalid fixtures: {msg}");
                return Ok(2); // Configuration error exit code
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to create record source");
                eprintln!("Failed to connect to the record stores: {e}");
                return Ok(4); // Connection error exit code
            }
        };

        let (settings, exporter) = match &config {
            Some(c) => (ReportSettings::from(&c.reports), Exporter::from_config(&c.export)),
            None => (
                ReportSettings::default(),
                Exporter::from_config(&ExportConfig::default()),
            ),
        };

        if let Err(e) = verify_teacher(source.as_ref(), &filters.teacher_id).await {
            return Ok(report_error(&e));
        }

        let builder = ReportBuilder::new(source, settings);
        let outcome = match builder
            .report(kind, filters, Local::now().naive_local())
            .await
        {
            Ok(o) => o,
            Err(e) => return Ok(report_error(&e)),
        };

        let token = self.format.as_deref().unwrap_or_default();
        let file = match exporter.export_outcome(&outcome, token) {
            ExportOutcome::File(file) => file,
            ExportOutcome::NoData { message } => {
                println!("{message}");
                return Ok(1); // No data exit code
            }
        };

        fs::create_dir_all(&self.output)?;
        let path = self.output.join(&file.filename);
        fs::write(&path, &file.bytes)?;

        if file.fell_back {
            println!(
                "Requested {} could not be rendered; delivered {} instead",
                file.requested.as_str(),
                file.delivered.as_str()
            );
        }
        println!("Format:   {}", file.delivered.as_str());
        println!("File:     {}", path.display());
        println!("Bytes:    {}", file.bytes.len());
        println!("SHA-256:  {}", file.sha256);
        Ok(0)
    }

    fn filters(&self) -> crate::domain::Result<(ReportKind, ReportFilters)> {
        let kind: ReportKind = self.kind.parse()?;
        let teacher_id =
            TeacherId::new(self.teacher_id.as_str()).map_err(ClassrollError::Validation)?;
        let class_id = match self.class_id.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(c) if c.eq_ignore_ascii_case("all") => None,
            Some(c) => Some(ClassId::new(c).map_err(ClassrollError::Validation)?),
        };
        let end = self.end.unwrap_or_else(|| Local::now().date_naive());
        let filters = ReportFilters::new(teacher_id, class_id, self.start, end)?;
        Ok((kind, filters))
    }

    async fn record_source(
        &self,
        config: Option<&ClassrollConfig>,
    ) -> crate::domain::Result<Arc<dyn RecordSource + Send + Sync>> {
        if let Some(path) = &self.fixtures {
            let text = fs::read_to_string(path).map_err(|e| {
                ClassrollError::Configuration(format!("{}: {e}", path.display()))
            })?;
            let fixture: serde_json::Value = serde_json::from_str(&text)
                .map_err(|e| ClassrollError::Configuration(format!("{}: {e}", path.display())))?;
            tracing::info!(fixtures = %path.display(), "Serving rows from fixtures");
            return Ok(Arc::new(MemorySource::from_fixture(&fixture)?));
        }

        let config = config.ok_or_else(|| {
            ClassrollError::Configuration("No configuration loaded".to_string())
        })?;
        create_record_source(&config.stores).await
    }
}

/// Print a report failure and map it to an exit code
fn report_error(err: &ClassrollError) -> i32 {
    tracing::error!(error = %err, "Report failed");
    eprintln!("{}", err.user_message());
    match err {
        ClassrollError::Validation(_) => 2,
        ClassrollError::Forbidden(_) => 3,
        ClassrollError::SourceUnavailable { .. } => 4,
        _ => 5,
    }
}
