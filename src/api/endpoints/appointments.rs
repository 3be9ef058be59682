//! Appointment CRUD.

use std::str::FromStr;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db::repository::appointment::{self, AppointmentUpdate, NewAppointment};
use crate::models::{Appointment, AppointmentStatus};

use super::parse_request_datetime;
use super::patients::{CreatedResponse, MessageResponse};

#[derive(Deserialize)]
pub struct CreateAppointmentRequest {
    pub patient_id: i64,
    pub doctor_id: i64,
    pub appointment_time: String,
    pub reason: Option<String>,
    pub status: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateAppointmentRequest {
    pub appointment_time: Option<String>,
    pub reason: Option<String>,
    pub status: Option<String>,
}

fn parse_status(s: &str) -> Result<AppointmentStatus, ApiError> {
    AppointmentStatus::from_str(s).map_err(|_| {
        ApiError::BadRequest("Status must be Scheduled, Completed, or Cancelled".into())
    })
}

/// `POST /api/appointments` — status defaults to `Scheduled`.
pub async fn create(
    State(ctx): State<ApiContext>,
    Json(req): Json<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let appointment_time = parse_request_datetime(&req.appointment_time)?;
    let status = match &req.status {
        Some(s) => parse_status(s)?,
        None => AppointmentStatus::Scheduled,
    };

    let conn = ctx.open_db()?;
    let id = appointment::insert_appointment(
        &conn,
        &NewAppointment {
            patient_id: req.patient_id,
            doctor_id: req.doctor_id,
            appointment_time,
            reason: req.reason,
            status,
        },
    )?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            id,
            message: "Appointment created successfully".into(),
        }),
    ))
}

/// `GET /api/appointments`.
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<Vec<Appointment>>, ApiError> {
    let conn = ctx.open_db()?;
    Ok(Json(appointment::list_appointments(&conn)?))
}

/// `GET /api/appointments/:id`.
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
) -> Result<Json<Appointment>, ApiError> {
    let conn = ctx.open_db()?;
    Ok(Json(appointment::get_appointment(&conn, id)?))
}

/// `PUT /api/appointments/:id` — partial update.
pub async fn update(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateAppointmentRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let appointment_time = match &req.appointment_time {
        Some(t) => Some(parse_request_datetime(t)?),
        None => None,
    };
    let status = match &req.status {
        Some(s) => Some(parse_status(s)?),
        None => None,
    };

    let update = AppointmentUpdate {
        appointment_time,
        reason: req.reason,
        status,
    };
    if update.is_empty() {
        return Err(ApiError::BadRequest("No fields provided for update".into()));
    }

    let conn = ctx.open_db()?;
    appointment::update_appointment(&conn, id, &update)?;
    Ok(Json(MessageResponse {
        message: "Appointment updated successfully".into(),
    }))
}

/// `DELETE /api/appointments/:id`.
pub async fn remove(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    let conn = ctx.open_db()?;
    appointment::delete_appointment(&conn, id)?;
    Ok(Json(MessageResponse {
        message: "Appointment deleted successfully".into(),
    }))
}
