//! Admin registration and login.
//!
//! Successful calls return a bearer token whose SHA-256 hash is stored
//! in the `admin_session` table with a TTL; the middleware resolves it
//! on every protected request.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Duration;
use pbkdf2::password_hash::rand_core::OsRng;
use pbkdf2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use pbkdf2::Pbkdf2;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::{generate_token, hash_token, ApiContext};
use crate::db::repository::admin as admin_repo;

use super::valid_email;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub admin_id: i64,
    pub username: String,
    pub token: String,
}

/// `POST /api/admin/register` — create the admin account and log it in.
pub async fn register(
    State(ctx): State<ApiContext>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    if req.username.trim().is_empty() || req.email.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::BadRequest(
            "username, email and password are required".into(),
        ));
    }
    if !valid_email(&req.email) {
        return Err(ApiError::BadRequest("Must be a valid email format".into()));
    }
    if req.password.len() < 8 {
        return Err(ApiError::BadRequest(
            "Password must be at least 8 characters".into(),
        ));
    }

    let conn = ctx.open_db()?;

    if admin_repo::find_by_email(&conn, &req.email)?.is_some() {
        return Err(ApiError::Conflict(
            "Admin with this email already exists".into(),
        ));
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Pbkdf2
        .hash_password(req.password.as_bytes(), &salt)
        .map_err(|e| ApiError::Internal(format!("password hashing failed: {e}")))?
        .to_string();

    let admin_id = admin_repo::insert_admin(&conn, &req.username, &req.email, &password_hash)?;
    let token = issue_session(&ctx, &conn, admin_id)?;

    tracing::info!(admin_id, "admin registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            admin_id,
            username: req.username,
            token,
        }),
    ))
}

/// `POST /api/admin/login` — verify credentials, issue a fresh token.
pub async fn login(
    State(ctx): State<ApiContext>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::BadRequest("email and password are required".into()));
    }

    let conn = ctx.open_db()?;

    let admin = admin_repo::find_by_email(&conn, &req.email)?
        .ok_or(ApiError::InvalidCredentials)?;

    let parsed = PasswordHash::new(&admin.password_hash)
        .map_err(|e| ApiError::Internal(format!("stored hash unreadable: {e}")))?;
    Pbkdf2
        .verify_password(req.password.as_bytes(), &parsed)
        .map_err(|_| ApiError::InvalidCredentials)?;

    let token = issue_session(&ctx, &conn, admin.admin_id)?;

    Ok(Json(AuthResponse {
        admin_id: admin.admin_id,
        username: admin.username,
        token,
    }))
}

fn issue_session(
    ctx: &ApiContext,
    conn: &rusqlite::Connection,
    admin_id: i64,
) -> Result<String, ApiError> {
    let token = generate_token();
    let expires_at =
        chrono::Utc::now().naive_utc() + Duration::hours(ctx.config.session_ttl_hours);
    admin_repo::create_session(conn, admin_id, &hash_token(&token), expires_at)?;
    Ok(token)
}
