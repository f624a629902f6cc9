use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use serde::Serialize;

use super::domain::WorkflowStep;
use super::report::DashboardReport;
use super::service::{DashboardService, RefreshRequest, SourceConnector, WorkflowRequest};
use crate::error::AppError;

#[derive(Debug, Serialize)]
pub struct WorkflowResponse {
    pub job_id: String,
    pub steps: Vec<WorkflowStep>,
}

/// Router builder exposing the refresh and workflow endpoints.
///
/// Refreshes block on the recruiting API, so each one runs on the blocking
/// pool.
pub fn dashboard_router<C>(service: Arc<DashboardService<C>>) -> Router
where
    C: SourceConnector + 'static,
{
    Router::new()
        .route("/api/v1/dashboard/refresh", post(refresh_handler::<C>))
        .route("/api/v1/dashboard/workflow", post(workflow_handler::<C>))
        .with_state(service)
}

pub(crate) async fn refresh_handler<C>(
    State(service): State<Arc<DashboardService<C>>>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<DashboardReport>, AppError>
where
    C: SourceConnector + 'static,
{
    let report = tokio::task::spawn_blocking(move || service.refresh_report(request)).await??;
    Ok(Json(report))
}

pub(crate) async fn workflow_handler<C>(
    State(service): State<Arc<DashboardService<C>>>,
    Json(request): Json<WorkflowRequest>,
) -> Result<Json<WorkflowResponse>, AppError>
where
    C: SourceConnector + 'static,
{
    let WorkflowRequest {
        credentials,
        job_id,
    } = request;

    let response = tokio::task::spawn_blocking(move || {
        service
            .workflow_steps(&credentials, &job_id)
            .map(|steps| WorkflowResponse { job_id, steps })
    })
    .await??;

    Ok(Json(response))
}
