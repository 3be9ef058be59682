//! Bearer token authentication middleware.
//!
//! Extracts `Authorization: Bearer <token>`, resolves the token hash
//! against the server-side session store, and injects `AdminContext`
//! into request extensions for downstream handlers.

use axum::http::{HeaderValue, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::api::error::ApiError;
use crate::api::types::{hash_token, AdminContext, ApiContext};
use crate::db::repository::admin as admin_repo;

/// Require a valid admin bearer token.
///
/// Accesses `ApiContext` from request extensions (injected by Extension layer).
/// On success: injects `AdminContext` and adds a `Cache-Control: no-store` header.
pub async fn require_auth(req: Request<axum::body::Body>, next: Next) -> Response {
    match require_auth_inner(req, next).await {
        Ok(resp) => resp,
        Err(err) => err.into_response(),
    }
}

async fn require_auth_inner(
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let ctx: ApiContext = req
        .extensions()
        .get::<ApiContext>()
        .cloned()
        .ok_or(ApiError::Internal("missing API context".into()))?;

    // 1. Extract bearer token
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(ApiError::Unauthorized)?
        .to_string();

    // 2. Resolve the session
    let conn = ctx.open_db()?;
    let now = chrono::Utc::now().naive_utc();
    let session = admin_repo::find_session(&conn, &hash_token(&token), now)
        .map_err(ApiError::from)?
        .ok_or(ApiError::Unauthorized)?;

    // 3. Inject admin context for downstream handlers
    req.extensions_mut().insert(AdminContext {
        admin_id: session.admin_id,
        username: session.username,
    });

    // 4. Process request
    let mut response = next.run(req).await;

    response
        .headers_mut()
        .insert("Cache-Control", HeaderValue::from_static("no-store"));

    Ok(response)
}
