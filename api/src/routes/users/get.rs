use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use db::models::user::{Column as UserColumn, Entity as UserEntity, Role, Status};
use sea_orm::{ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use util::state::AppState;
use validator::Validate;

use crate::response::ApiResponse;
use crate::routes::common::{UserResponse, format_validation_errors};

#[derive(Debug, Deserialize, Validate)]
pub struct ListUsersQuery {
    #[validate(range(min = 1))]
    pub page: Option<u64>,
    #[validate(range(min = 1, max = 100))]
    pub per_page: Option<u64>,
    pub sort: Option<String>,
    pub query: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize, Default)]
pub struct UsersListResponse {
    pub users: Vec<UserResponse>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
}

/// GET /api/users
///
/// Retrieve a paginated list of users with optional filtering and sorting.
/// Requires manager privileges or higher.
///
/// ### Query Parameters
/// - `page` (optional): Page number (default: 1, min: 1)
/// - `per_page` (optional): Items per page (default: 20, min: 1, max: 100)
/// - `query` (optional): Case-insensitive partial match against email OR name
/// - `email` (optional): Case-insensitive partial match on email
/// - `name` (optional): Case-insensitive partial match on name
/// - `role` (optional): Exact role (`admin`, `manager`, `user`)
/// - `status` (optional): Exact status (`active`, `inactive`)
/// - `sort` (optional): Comma-separated sort fields; `-` prefix for descending
///
/// ### Examples
/// ```http
/// GET /api/users?page=2&per_page=10
/// GET /api/users?query=ada
/// GET /api/users?role=manager&status=active
/// GET /api/users?sort=email,-created_at
/// ```
///
/// ### Responses
/// - `200 OK` with `{ users, page, per_page, total }`
/// - `400 Bad Request` - Invalid query parameters
/// - `401 Unauthorized` - Missing or invalid JWT
/// - `403 Forbidden` - Authenticated but below manager
/// - `500 Internal Server Error` - Database error
pub async fn list_users(
    State(app): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> impl IntoResponse {
    let db = app.db();

    if let Err(e) = query.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<UsersListResponse>::error(
                format_validation_errors(&e),
            )),
        );
    }

    let page = query.page.unwrap_or(1);
    let per_page = query.per_page.unwrap_or(20);

    let mut condition = Condition::all();

    if let Some(q) = &query.query {
        condition = condition.add(
            Condition::any()
                .add(UserColumn::Email.contains(q))
                .add(UserColumn::Name.contains(q)),
        );
    }

    if let Some(email) = &query.email {
        condition = condition.add(UserColumn::Email.contains(email));
    }

    if let Some(name) = &query.name {
        condition = condition.add(UserColumn::Name.contains(name));
    }

    if let Some(role) = &query.role {
        let Ok(role) = role.parse::<Role>() else {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::<UsersListResponse>::error(
                    "Invalid role. Must be admin, manager or user",
                )),
            );
        };
        condition = condition.add(UserColumn::Role.eq(role));
    }

    if let Some(status) = &query.status {
        let Ok(status) = status.parse::<Status>() else {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::<UsersListResponse>::error(
                    "Invalid status. Must be active or inactive",
                )),
            );
        };
        condition = condition.add(UserColumn::Status.eq(status));
    }

    let mut query_builder = UserEntity::find().filter(condition);

    if let Some(sort_param) = &query.sort {
        for sort_field in sort_param.split(',') {
            let (field, desc) = match sort_field.strip_prefix('-') {
                Some(rest) => (rest, true),
                None => (sort_field, false),
            };

            let column = match field {
                "email" => UserColumn::Email,
                "name" => UserColumn::Name,
                "role" => UserColumn::Role,
                "status" => UserColumn::Status,
                "created_at" => UserColumn::CreatedAt,
                _ => continue,
            };

            query_builder = if desc {
                query_builder.order_by_desc(column)
            } else {
                query_builder.order_by_asc(column)
            };
        }
    } else {
        query_builder = query_builder.order_by_desc(UserColumn::CreatedAt);
    }

    let paginator = query_builder.paginate(db, per_page);
    let total = match paginator.num_items().await {
        Ok(total) => total,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<UsersListResponse>::error(format!(
                    "Database error: {}",
                    e
                ))),
            );
        }
    };
    let users = match paginator.fetch_page(page - 1).await {
        Ok(users) => users.into_iter().map(UserResponse::from).collect(),
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<UsersListResponse>::error(format!(
                    "Database error: {}",
                    e
                ))),
            );
        }
    };

    (
        StatusCode::OK,
        Json(ApiResponse::success(
            UsersListResponse {
                users,
                page,
                per_page,
                total,
            },
            "Users retrieved successfully",
        )),
    )
}

/// GET /api/users/{user_id}
///
/// Fetch a single user by ID. Requires manager privileges or higher.
///
/// ### Responses
/// - `200 OK`: User found
/// - `404 Not Found`: User does not exist
/// - `500 Internal Server Error`: DB error
pub async fn get_user(
    State(app): State<AppState>,
    Path(user_id): Path<i64>,
) -> impl IntoResponse {
    match UserEntity::find_by_id(user_id).one(app.db()).await {
        Ok(Some(user)) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                UserResponse::from(user),
                "User retrieved successfully",
            )),
        ),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<UserResponse>::error("User not found")),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<UserResponse>::error(format!(
                "Database error: {}",
                e
            ))),
        ),
    }
}
