//! Doctor CRUD.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db::repository::doctor::{self, DoctorUpdate, NewDoctor};
use crate::models::Doctor;

use super::patients::{CreatedResponse, MessageResponse};
use super::valid_email;

#[derive(Deserialize)]
pub struct CreateDoctorRequest {
    pub first_name: String,
    pub last_name: String,
    pub specialization: String,
    pub email: String,
}

#[derive(Deserialize)]
pub struct UpdateDoctorRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub specialization: Option<String>,
    pub email: Option<String>,
}

/// `POST /api/doctors`.
pub async fn create(
    State(ctx): State<ApiContext>,
    Json(req): Json<CreateDoctorRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    if req.first_name.trim().is_empty() {
        return Err(ApiError::BadRequest("First name is required".into()));
    }
    if req.last_name.trim().is_empty() {
        return Err(ApiError::BadRequest("Last name is required".into()));
    }
    if req.specialization.trim().is_empty() {
        return Err(ApiError::BadRequest("Specialization is required".into()));
    }
    if !valid_email(&req.email) {
        return Err(ApiError::BadRequest("Must be a valid email format".into()));
    }

    let conn = ctx.open_db()?;
    let id = doctor::insert_doctor(
        &conn,
        &NewDoctor {
            first_name: req.first_name,
            last_name: req.last_name,
            specialization: req.specialization,
            email: req.email,
        },
    )?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            id,
            message: "Doctor created successfully".into(),
        }),
    ))
}

/// `GET /api/doctors`.
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<Vec<Doctor>>, ApiError> {
    let conn = ctx.open_db()?;
    Ok(Json(doctor::list_doctors(&conn)?))
}

/// `GET /api/doctors/:id`.
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
) -> Result<Json<Doctor>, ApiError> {
    let conn = ctx.open_db()?;
    Ok(Json(doctor::get_doctor(&conn, id)?))
}

/// `PUT /api/doctors/:id` — partial update.
pub async fn update(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateDoctorRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if let Some(email) = &req.email {
        if !valid_email(email) {
            return Err(ApiError::BadRequest("Must be a valid email format".into()));
        }
    }

    let update = DoctorUpdate {
        first_name: req.first_name,
        last_name: req.last_name,
        specialization: req.specialization,
        email: req.email,
    };
    if update.is_empty() {
        return Err(ApiError::BadRequest("No fields provided for update".into()));
    }

    let conn = ctx.open_db()?;
    doctor::update_doctor(&conn, id, &update)?;
    Ok(Json(MessageResponse {
        message: "Doctor updated successfully".into(),
    }))
}

/// `DELETE /api/doctors/:id`.
pub async fn remove(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    let conn = ctx.open_db()?;
    doctor::delete_doctor(&conn, id)?;
    Ok(Json(MessageResponse {
        message: "Doctor deleted successfully".into(),
    }))
}
