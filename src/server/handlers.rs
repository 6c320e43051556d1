//! HTTP handlers
//!
//! Every route except `/health` identifies the caller with the
//! `X-Teacher-Id` header and checks it against the login store first.

use super::error::{ApiError, MessageResponse};
use super::state::AppState;
use crate::core::export::ExportOutcome;
use crate::core::report::{
    verify_teacher, Dashboard, ReportDataset, ReportFilters, ReportKind, ReportOutcome,
};
use crate::domain::{ClassId, ClassrollError, Result, TeacherId};
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Caller identity header
pub const TEACHER_HEADER: &str = "x-teacher-id";

/// SHA-256 of the delivered export bytes
pub const CHECKSUM_HEADER: &str = "x-content-sha256";

/// Format actually delivered, which differs from the request after a fallback
pub const FORMAT_HEADER: &str = "x-export-format";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub success: bool,
    pub dashboard: Dashboard,
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub success: bool,
    pub report: ReportDataset,
}

#[derive(Debug, Default, Deserialize)]
pub struct DashboardParams {
    pub date: Option<String>,
    pub class_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportParams {
    pub class_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    /// Only read by the export route
    pub format: Option<String>,
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Dashboard for one date, optionally narrowed to one class
pub async fn get_dashboard(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<DashboardParams>,
) -> std::result::Result<Json<DashboardResponse>, ApiError> {
    let teacher_id = authorize(&state, &headers).await?;
    let today = state.clock.today();
    let date = parse_date("date", params.date.as_deref())?.unwrap_or(today);
    let class_id = parse_class(params.class_id.as_deref())?;

    let dashboard = state
        .builder
        .dashboard(&teacher_id, class_id.as_ref(), date, today)
        .await?;

    Ok(Json(DashboardResponse {
        success: true,
        dashboard,
    }))
}

/// Report dataset as JSON
pub async fn get_report(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    headers: HeaderMap,
    Query(params): Query<ReportParams>,
) -> std::result::Result<Response, ApiError> {
    let teacher_id = authorize(&state, &headers).await?;
    let kind: ReportKind = kind.parse()?;
    let filters = report_filters(&state, teacher_id, &params)?;

    let outcome = state.builder.report(kind, filters, state.clock.now()).await?;
    Ok(match outcome {
        ReportOutcome::Ready(report) => Json(ReportResponse {
            success: true,
            report,
        })
        .into_response(),
        ReportOutcome::NoData { message } => {
            Json(MessageResponse::failure(message)).into_response()
        }
    })
}

/// Report rendered as a downloadable file
pub async fn export_report(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    headers: HeaderMap,
    Query(params): Query<ReportParams>,
) -> std::result::Result<Response, ApiError> {
    let teacher_id = authorize(&state, &headers).await?;
    let kind: ReportKind = kind.parse()?;
    let filters = report_filters(&state, teacher_id, &params)?;

    let outcome = state.builder.report(kind, filters, state.clock.now()).await?;
    let token = params.format.as_deref().unwrap_or_default();

    match state.exporter.export_outcome(&outcome, token) {
        ExportOutcome::NoData { message } => {
            Ok(Json(MessageResponse::failure(message)).into_response())
        }
        ExportOutcome::File(file) => {
            let disposition = format!("attachment; filename=\"{}\"", file.filename);
            let mut response = (StatusCode::OK, file.bytes).into_response();
            let headers = response.headers_mut();
            headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static(file.delivered.content_type()),
            );
            headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
            headers.insert(
                FORMAT_HEADER,
                HeaderValue::from_static(file.delivered.as_str()),
            );
            headers.insert(header::CONTENT_DISPOSITION, header_value(&disposition)?);
            headers.insert(CHECKSUM_HEADER, header_value(&file.sha256)?);
            Ok(response)
        }
    }
}

/// Read `X-Teacher-Id` and confirm it belongs to a teacher account
async fn authorize(state: &AppState, headers: &HeaderMap) -> Result<TeacherId> {
    let raw = headers
        .get(TEACHER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .unwrap_or_default();
    let teacher_id = TeacherId::new(raw)
        .map_err(|_| ClassrollError::Forbidden("missing teacher id header".to_string()))?;

    verify_teacher(state.builder.source(), &teacher_id).await?;
    tracing::Span::current().record("teacher_id", teacher_id.as_str());
    Ok(teacher_id)
}

/// Filters from query parameters
///
/// The range defaults to the first of the current month through today.
fn report_filters(
    state: &AppState,
    teacher_id: TeacherId,
    params: &ReportParams,
) -> Result<ReportFilters> {
    let today = state.clock.today();
    let end = parse_date("end_date", params.end_date.as_deref())?.unwrap_or(today);
    let start = match parse_date("start_date", params.start_date.as_deref())? {
        Some(start) => start,
        None => end.with_day(1).unwrap_or(end),
    };
    let class_id = parse_class(params.class_id.as_deref())?;
    ReportFilters::new(teacher_id, class_id, start, end)
}

fn parse_date(field: &str, raw: Option<&str>) -> Result<Option<NaiveDate>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| ClassrollError::Validation(format!("{field} must be YYYY-MM-DD"))),
    }
}

/// `all` and empty both mean every class
fn parse_class(raw: Option<&str>) -> Result<Option<ClassId>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) if s.eq_ignore_ascii_case("all") => Ok(None),
        Some(s) => ClassId::new(s).map(Some).map_err(ClassrollError::Validation),
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| ClassrollError::Other(format!("Invalid header value: {e}")))
}
