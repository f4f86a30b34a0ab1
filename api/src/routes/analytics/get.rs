use axum::{
    Json,
    body::Body,
    extract::{Query, State},
    http::{
        StatusCode,
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    },
    response::{IntoResponse, Response},
};
use db::models::DailyCount;
use db::models::activity_log::Model as ActivityLogModel;
use db::models::session::Model as SessionModel;
use db::models::user::{
    Column as UserColumn, Entity as UserEntity, Model as UserModel, RoleCount,
};
use sea_orm::{EntityTrait, QueryOrder};
use serde::{Deserialize, Serialize};
use util::state::AppState;

use crate::response::ApiResponse;

const DEFAULT_STAT_DAYS: i64 = 7;

#[derive(Debug, Deserialize)]
pub struct StatDaysQuery {
    pub days: Option<i64>,
}

#[derive(Debug, Serialize, Default)]
pub struct DashboardStats {
    pub total_users: u64,
    pub active_users: u64,
    pub active_sessions_count: usize,
}

/// GET /api/analytics/stats
///
/// Headline numbers for the dashboard: directory size, accounts with
/// `active` status, and the live presence count derived from open sessions.
///
/// ### Responses
/// - `200 OK` with `{ total_users, active_users, active_sessions_count }`
/// - `401 Unauthorized` / `403 Forbidden`
/// - `500 Internal Server Error`
pub async fn get_dashboard_stats(State(app): State<AppState>) -> impl IntoResponse {
    let db = app.db();

    match tokio::try_join!(
        UserModel::total_count(db),
        UserModel::active_status_count(db),
        SessionModel::active_user_ids(db),
    ) {
        Ok((total_users, active_users, active_ids)) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                DashboardStats {
                    total_users,
                    active_users,
                    active_sessions_count: active_ids.len(),
                },
                "Dashboard stats retrieved successfully",
            )),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<DashboardStats>::error(format!(
                "Database error: {}",
                e
            ))),
        ),
    }
}

#[derive(Debug, Serialize, Default)]
pub struct GrowthResponse {
    pub growth: Vec<DailyCount>,
}

/// GET /api/analytics/user-growth?days=7
///
/// Per-day signup counts for the chart on the dashboard. `days` is clamped
/// to at most two years.
pub async fn get_user_growth(
    State(app): State<AppState>,
    Query(query): Query<StatDaysQuery>,
) -> impl IntoResponse {
    let days = query.days.unwrap_or(DEFAULT_STAT_DAYS);

    match UserModel::growth(app.db(), days).await {
        Ok(growth) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                GrowthResponse { growth },
                "User growth retrieved successfully",
            )),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<GrowthResponse>::error(format!(
                "Database error: {}",
                e
            ))),
        ),
    }
}

#[derive(Debug, Serialize, Default)]
pub struct RoleDistributionResponse {
    pub distribution: Vec<RoleCount>,
}

/// GET /api/analytics/role-distribution
///
/// Role histogram over the whole directory.
pub async fn get_role_distribution(State(app): State<AppState>) -> impl IntoResponse {
    match UserModel::role_distribution(app.db()).await {
        Ok(distribution) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                RoleDistributionResponse { distribution },
                "Role distribution retrieved successfully",
            )),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<RoleDistributionResponse>::error(format!(
                "Database error: {}",
                e
            ))),
        ),
    }
}

#[derive(Debug, Serialize, Default)]
pub struct ActivityStatsResponse {
    pub stats: Vec<DailyCount>,
}

/// GET /api/analytics/activity-stats?days=7
///
/// Per-day activity counts for the chart on the dashboard.
pub async fn get_activity_stats(
    State(app): State<AppState>,
    Query(query): Query<StatDaysQuery>,
) -> impl IntoResponse {
    let days = query.days.unwrap_or(DEFAULT_STAT_DAYS);

    match ActivityLogModel::daily_counts(app.db(), days).await {
        Ok(stats) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                ActivityStatsResponse { stats },
                "Activity stats retrieved successfully",
            )),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<ActivityStatsResponse>::error(format!(
                "Database error: {}",
                e
            ))),
        ),
    }
}

/// GET /api/analytics/export
///
/// Dumps the user directory as CSV. Admin only.
///
/// ### Responses
/// - `200 OK` with `text/csv` body and an attachment disposition
/// - `401 Unauthorized` / `403 Forbidden`
/// - `500 Internal Server Error`
pub async fn export_users_csv(State(app): State<AppState>) -> Response {
    let users = match UserEntity::find()
        .order_by_asc(UserColumn::Id)
        .all(app.db())
        .await
    {
        Ok(users) => users,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error(format!("Database error: {}", e))),
            )
                .into_response();
        }
    };

    let mut csv = String::from("ID,Name,Email,Role,Status,Created At\n");
    for user in users {
        csv.push_str(&format!(
            "{},{},{},{},{},{}\n",
            user.id,
            csv_field(&user.name),
            csv_field(&user.email),
            user.role,
            user.status,
            user.created_at.to_rfc3339(),
        ));
    }

    Response::builder()
        .header(CONTENT_TYPE, "text/csv")
        .header(
            CONTENT_DISPOSITION,
            "attachment; filename=\"users-export.csv\"",
        )
        .body(Body::from(csv))
        .unwrap()
}

/// Quotes a CSV field when it contains a delimiter, quote, or newline.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
