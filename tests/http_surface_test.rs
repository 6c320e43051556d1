//! HTTP surfaces driven in process through the router

mod common;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use classroll::adapters::document::PdfRenderer;
use classroll::adapters::source::{MemorySource, Query, RecordSource, Row};
use classroll::core::export::{ExportOptions, Exporter};
use classroll::core::report::{queries, ReportBuilder, ReportSettings};
use classroll::domain::{Result as ClassrollResult, Store};
use classroll::server::handlers::{CHECKSUM_HEADER, FORMAT_HEADER, TEACHER_HEADER};
use classroll::server::routes::REQUEST_ID_HEADER;
use classroll::server::{router, AppState, Clock};
use common::{date, school, STUDENT_ACCOUNT, TEACHER};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

fn state(source: impl RecordSource + Send + Sync + 'static) -> AppState {
    let builder = ReportBuilder::new(Arc::new(source), ReportSettings::default());
    let exporter = Exporter::new(Arc::new(PdfRenderer::new(20)), ExportOptions::default());
    AppState::new(builder, exporter)
        .with_clock(Clock::Fixed(date(10).and_hms_opt(16, 0, 0).unwrap()))
}

async fn get(app_state: AppState, uri: &str, teacher: Option<&str>) -> Response {
    let mut request = Request::builder().uri(uri);
    if let Some(teacher) = teacher {
        request = request.header(TEACHER_HEADER, teacher);
    }
    router(app_state, Duration::from_secs(5))
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn header_text<'a>(response: &'a Response, name: &str) -> &'a str {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

#[tokio::test]
async fn test_health_needs_no_teacher() {
    let response = get(state(school()), "/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(uuid::Uuid::parse_str(header_text(&response, REQUEST_ID_HEADER)).is_ok());
    assert_eq!(json_body(response).await["status"], "healthy");
}

#[tokio::test]
async fn test_non_teachers_are_forbidden() {
    for teacher in [None, Some(""), Some(STUDENT_ACCOUNT), Some("T404")] {
        for uri in ["/api/dashboard", "/api/reports/attendance", "/export/attendance"] {
            let response = get(state(school()), uri, teacher).await;
            assert_eq!(response.status(), StatusCode::FORBIDDEN, "{uri} {teacher:?}");
            let body = json_body(response).await;
            assert_eq!(body["success"], false);
            assert!(body["message"].is_string());
        }
    }
}

#[tokio::test]
async fn test_dashboard_json() {
    let response = get(
        state(school()),
        "/api/dashboard?class_id=all",
        Some(TEACHER),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    let dashboard = &body["dashboard"];
    assert_eq!(dashboard["date"], "2025-01-10");
    assert_eq!(dashboard["counts"]["present"], 1);
    assert_eq!(dashboard["students"].as_array().unwrap().len(), 3);
    assert_eq!(dashboard["trend"]["totals"].as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn test_report_json() {
    let response = get(
        state(school()),
        "/api/reports/assignments?start_date=2025-01-06&end_date=2025-01-10",
        Some(TEACHER),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["report"]["kind"], "assignments");
    assert_eq!(body["report"]["rows"].as_array().unwrap().len(), 2);
    assert_eq!(body["report"]["summary"]["completion_rate"], 75);
}

#[tokio::test]
async fn test_report_defaults_to_month_to_date() {
    let response = get(state(school()), "/api/reports/attendance_log", Some(TEACHER)).await;
    let body = json_body(response).await;
    assert_eq!(body["report"]["filters"]["start_date"], "2025-01-01");
    assert_eq!(body["report"]["filters"]["end_date"], "2025-01-10");
}

#[tokio::test]
async fn test_export_download_headers() {
    let response = get(
        state(school()),
        "/export/attendance_log?start_date=2025-01-06&end_date=2025-01-10&format=csv",
        Some(TEACHER),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        header_text(&response, header::CONTENT_TYPE.as_str()),
        "text/csv; charset=utf-8"
    );
    assert_eq!(
        header_text(&response, header::CONTENT_DISPOSITION.as_str()),
        "attachment; filename=\"attendance_log_all_2025-01-06_to_2025-01-10_20250110.csv\""
    );
    assert_eq!(header_text(&response, FORMAT_HEADER), "delimited");
    assert!(!header_text(&response, REQUEST_ID_HEADER).is_empty());

    let checksum = header_text(&response, CHECKSUM_HEADER).to_string();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(checksum, format!("{:x}", Sha256::digest(&bytes)));

    let text = String::from_utf8(bytes.to_vec()).unwrap();
    // header plus nine marks
    assert_eq!(text.trim_end().lines().count(), 10);
}

#[tokio::test]
async fn test_export_document() {
    let response = get(
        state(school()),
        "/export/class_performance?start_date=2025-01-06&end_date=2025-01-10&format=pdf&class_id=C1",
        Some(TEACHER),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header_text(&response, FORMAT_HEADER), "document");
    assert!(header_text(&response, header::CONTENT_DISPOSITION.as_str())
        .contains("class_performance_c1_"));
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
}

#[tokio::test]
async fn test_export_without_rows_sends_message() {
    let response = get(
        state(school()),
        "/export/attendance_log?start_date=2025-02-03&end_date=2025-02-07&format=pdf",
        Some(TEACHER),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::CONTENT_DISPOSITION).is_none());
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "No data found for the selected criteria");
}

#[tokio::test]
async fn test_bad_request_parameters() {
    for uri in [
        "/api/reports/attendance?start_date=01/06/2025",
        "/api/reports/attendance?start_date=2025-01-10&end_date=2025-01-06",
        "/api/reports/report_cards",
        "/api/dashboard?date=tomorrow",
    ] {
        let response = get(state(school()), uri, Some(TEACHER)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(json_body(response).await["success"], false);
    }
}

#[tokio::test]
async fn test_store_outage_is_service_unavailable() {
    let response = get(
        state(school().fail_store(Store::Registrar)),
        "/api/reports/attendance",
        Some(TEACHER),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    // Connection details stay in the logs
    assert!(!body["message"].as_str().unwrap().contains("refused"));

    let response = get(
        state(school().fail_store(Store::Login)),
        "/api/dashboard",
        Some(TEACHER),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

/// Answers the teacher check at once and stalls every other query
struct StalledSource(MemorySource);

#[async_trait]
impl RecordSource for StalledSource {
    async fn fetch(&self, query: &Query) -> ClassrollResult<Vec<Row>> {
        if query.name != queries::TEACHER_ACCOUNT {
            tokio::time::sleep(Duration::from_secs(30)).await;
        }
        self.0.fetch(query).await
    }

    async fn ping(&self, store: Store) -> ClassrollResult<()> {
        self.0.ping(store).await
    }

    fn describe(&self) -> String {
        "stalled".to_string()
    }
}

#[tokio::test]
async fn test_slow_export_times_out() {
    let response = router(state(StalledSource(school())), Duration::from_millis(50))
        .oneshot(
            Request::builder()
                .uri("/export/attendance?format=csv")
                .header(TEACHER_HEADER, TEACHER)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(response.headers().get(header::CONTENT_DISPOSITION).is_none());
    assert_eq!(json_body(response).await["success"], false);
}
