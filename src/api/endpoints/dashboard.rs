//! Dashboard summary endpoint.
//!
//! Assembles the fleet-wide counters (including the high-risk patient
//! count) and the recent-activity feed with per-patient risk scores.

use axum::extract::State;
use axum::Extension;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::{AdminContext, ApiContext};
use crate::dashboard::{self, ActivityRecord, DashboardCounts, RECENT_ACTIVITY_LIMIT};

#[derive(Serialize)]
pub struct DashboardResponse {
    pub admin_name: String,
    pub summary: DashboardCounts,
    pub recent_activity: Vec<ActivityRecord>,
}

/// `GET /api/dashboard/summary`.
pub async fn summary(
    State(ctx): State<ApiContext>,
    Extension(admin): Extension<AdminContext>,
) -> Result<Json<DashboardResponse>, ApiError> {
    let conn = ctx.open_db()?;
    let today = chrono::Local::now().date_naive();

    let summary = dashboard::fetch_dashboard_counts(&conn, today, &ctx.weights)?;
    let recent_activity =
        dashboard::fetch_recent_activity(&conn, RECENT_ACTIVITY_LIMIT, &ctx.weights)?;

    Ok(Json(DashboardResponse {
        admin_name: admin.username,
        summary,
        recent_activity,
    }))
}
