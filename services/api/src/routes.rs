use crate::infra::AppState;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use chrono::Local;
use serde_json::json;
use speed_analytics::analytics::dashboard::DashboardView;
use speed_analytics::analytics::domain::{CaseManagerRow, TeamRow};
use speed_analytics::analytics::filter::RecordFilter;
use speed_analytics::analytics::ranking::PodiumEntry;
use speed_analytics::analytics::report::ReportKind;
use speed_analytics::analytics::source::{AccessToken, PerformanceSource, SourceError};
use speed_analytics::analytics::{AnalyticsService, Listing};
use speed_analytics::error::AppError;
use std::sync::Arc;

pub(crate) fn with_performance_routes<S>(service: Arc<AnalyticsService<S>>) -> Router
where
    S: PerformanceSource + 'static,
{
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route(
            "/api/v1/performance/case-managers",
            get(case_managers_endpoint::<S>),
        )
        .route("/api/v1/performance/teams", get(teams_endpoint::<S>))
        .route("/api/v1/dashboard/stats", get(dashboard_endpoint::<S>))
        .route(
            "/api/v1/dashboard/top-case-managers",
            get(top_case_managers_endpoint::<S>),
        )
        .route("/api/v1/dashboard/top-teams", get(top_teams_endpoint::<S>))
        .route("/api/v1/reports/:kind/csv", get(report_csv_endpoint::<S>))
        .with_state(service)
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Every analytics endpoint authenticates per request; a missing or
/// malformed `Authorization: Bearer <token>` header is treated the same
/// way as an upstream rejection.
fn bearer_token(headers: &HeaderMap) -> Result<AccessToken, AppError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(AccessToken::from_bearer_header)
        .ok_or(AppError::Source(SourceError::Denied))
}

pub(crate) async fn case_managers_endpoint<S>(
    State(service): State<Arc<AnalyticsService<S>>>,
    headers: HeaderMap,
    Query(filter): Query<RecordFilter>,
) -> Result<Json<Listing<CaseManagerRow>>, AppError>
where
    S: PerformanceSource,
{
    let token = bearer_token(&headers)?;
    Ok(Json(service.case_managers(&token, &filter)?))
}

pub(crate) async fn teams_endpoint<S>(
    State(service): State<Arc<AnalyticsService<S>>>,
    headers: HeaderMap,
    Query(filter): Query<RecordFilter>,
) -> Result<Json<Listing<TeamRow>>, AppError>
where
    S: PerformanceSource,
{
    let token = bearer_token(&headers)?;
    Ok(Json(service.teams(&token, &filter)?))
}

pub(crate) async fn dashboard_endpoint<S>(
    State(service): State<Arc<AnalyticsService<S>>>,
    headers: HeaderMap,
) -> Result<Json<DashboardView>, AppError>
where
    S: PerformanceSource,
{
    let token = bearer_token(&headers)?;
    Ok(Json(service.dashboard(&token)?))
}

pub(crate) async fn top_case_managers_endpoint<S>(
    State(service): State<Arc<AnalyticsService<S>>>,
    headers: HeaderMap,
) -> Result<Json<Vec<PodiumEntry<CaseManagerRow>>>, AppError>
where
    S: PerformanceSource,
{
    let token = bearer_token(&headers)?;
    Ok(Json(service.top_case_managers(&token)?))
}

pub(crate) async fn top_teams_endpoint<S>(
    State(service): State<Arc<AnalyticsService<S>>>,
    headers: HeaderMap,
) -> Result<Json<Vec<PodiumEntry<TeamRow>>>, AppError>
where
    S: PerformanceSource,
{
    let token = bearer_token(&headers)?;
    Ok(Json(service.top_teams(&token)?))
}

pub(crate) async fn report_csv_endpoint<S>(
    State(service): State<Arc<AnalyticsService<S>>>,
    headers: HeaderMap,
    Path(kind): Path<String>,
) -> Result<Response, AppError>
where
    S: PerformanceSource,
{
    let token = bearer_token(&headers)?;
    let Some(kind) = ReportKind::parse(&kind) else {
        let body = Json(json!({ "error": format!("unknown report '{kind}'") }));
        return Ok((StatusCode::NOT_FOUND, body).into_response());
    };

    let report = service.report(&token, kind, Local::now().date_naive())?;
    let csv = report.to_csv()?;
    let disposition = format!("attachment; filename=\"{}\"", report.file_name());

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    )
        .into_response())
}
