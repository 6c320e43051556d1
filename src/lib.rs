// Classroll - Teacher Portal Reporting Service
// Copyright (c) 2025 Classroll Contributors
// Licensed under the MIT License

//! # Classroll - Teacher Portal Reporting
//!
//! Classroll aggregates attendance, grades and assignment submissions for a
//! teacher's classes across three record stores and delivers them as a
//! dashboard, JSON reports and downloadable files.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Querying** the registrar, teacher and login stores through one
//!   [`adapters::source::RecordSource`] contract
//! - **Joining** per-store rows in process and folding them into one view
//!   per student
//! - **Aggregating** day counts, attendance rates, trends, completion rates
//!   and distribution bands
//! - **Exporting** report datasets as delimited text, spreadsheet text or
//!   documents, with a deterministic fallback to delimited text
//!
//! ## Architecture
//!
//! Classroll follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`server`] - HTTP surfaces (dashboard, reports, export downloads)
//! - [`core`] - Business logic (normalize, aggregate, report, export)
//! - [`adapters`] - Record stores and the document renderer
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use classroll::adapters::source::create_record_source;
//! use classroll::config::load_config;
//! use classroll::server::{self, AppState};
//! use tokio::sync::watch;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("classroll.toml")?;
//!     let source = create_record_source(&config.stores).await?;
//!     let state = AppState::from_config(&config, source);
//!
//!     let (_shutdown_tx, shutdown_rx) = watch::channel(false);
//!     server::serve(&config.server, state, shutdown_rx).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Normalizing Join Rows
//!
//! Flat join rows, one per (student, class), fold into one view per student
//! in first-seen order:
//!
//! ```rust
//! use classroll::adapters::source::Row;
//! use classroll::core::normalize::normalize;
//!
//! let rows = vec![
//!     Row::new().with("student_id", "S1").with("first_name", "Ana").with("class_id", "A"),
//!     Row::new().with("student_id", "S1").with("first_name", "Ana").with("class_id", "B"),
//! ];
//! let report = normalize(&rows);
//! assert_eq!(report.views.len(), 1);
//! assert_eq!(report.views[0].classes.len(), 2);
//! ```
//!
//! ## Error Handling
//!
//! Classroll uses [`domain::ClassrollError`] for all library errors. Only
//! store failures reach a caller; malformed rows are counted and skipped,
//! and renderer failures fall back to delimited text.
//!
//! ```rust,no_run
//! use classroll::domain::ClassrollError;
//!
//! fn example() -> Result<(), ClassrollError> {
//!     let _config = classroll::config::load_config("classroll.toml")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! Classroll uses structured logging with the `tracing` crate; every HTTP
//! request runs in a span carrying its `request_id`.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
pub mod server;
