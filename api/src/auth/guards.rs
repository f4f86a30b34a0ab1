use crate::auth::claims::AuthUser;
use crate::response::ApiResponse;
use axum::{
    Json,
    body::Body,
    extract::FromRequestParts,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use db::models::user::Role;

// --- Role Based Access Guards ---

#[derive(serde::Serialize, Default)]
pub struct Empty;

/// Helper to extract and validate the user from the request, then insert the
/// claims back into the request extensions for downstream handlers.
async fn extract_and_insert_authuser(
    mut req: Request<Body>,
) -> Result<(Request<Body>, AuthUser), (StatusCode, Json<ApiResponse<Empty>>)> {
    let (mut parts, body) = req.into_parts();
    let user = AuthUser::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            (
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::error("Authentication required")),
            )
        })?;

    req = Request::from_parts(parts, body);
    req.extensions_mut().insert(user.clone());
    Ok((req, user))
}

/// Compute the set of roles with privileges greater than or equal to `role`.
///
/// Hierarchy (high -> low): Admin > Manager > User.
/// Allowing a role implicitly allows all roles above it.
fn roles_at_least(role: Role) -> &'static [Role] {
    match role {
        Role::Admin => &[Role::Admin],
        Role::Manager => &[Role::Admin, Role::Manager],
        Role::User => &[Role::Admin, Role::Manager, Role::User],
    }
}

/// Basic guard to ensure the request is authenticated.
pub async fn allow_authenticated(
    req: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, Json<ApiResponse<Empty>>)> {
    let (req, _user) = extract_and_insert_authuser(req).await?;

    Ok(next.run(req).await)
}

/// Admin-only guard.
pub async fn allow_admin(
    req: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, Json<ApiResponse<Empty>>)> {
    let (req, user) = extract_and_insert_authuser(req).await?;

    if !roles_at_least(Role::Admin).contains(&user.0.role) {
        return Err((
            StatusCode::FORBIDDEN,
            Json(ApiResponse::error("Admin access required")),
        ));
    }

    Ok(next.run(req).await)
}

/// Guard for allowing Manager and higher (Manager, Admin).
pub async fn allow_manager(
    req: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, Json<ApiResponse<Empty>>)> {
    let (req, user) = extract_and_insert_authuser(req).await?;

    if !roles_at_least(Role::Manager).contains(&user.0.role) {
        return Err((
            StatusCode::FORBIDDEN,
            Json(ApiResponse::error("Manager (or higher) access required")),
        ));
    }

    Ok(next.run(req).await)
}

/// Role check for handlers that gate a single method rather than a whole
/// route group.
pub fn has_role_at_least(user: &AuthUser, role: Role) -> bool {
    roles_at_least(role).contains(&user.0.role)
}
