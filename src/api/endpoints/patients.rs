//! Patient CRUD plus the history + synthesis view.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db::repository::appointment::{self, PatientAppointment};
use crate::db::repository::document;
use crate::db::repository::history;
use crate::db::repository::patient::{self, NewPatient, PatientSummary, PatientUpdate};
use crate::models::{Document, MedicalCondition, Patient};
use crate::synthesis::{self, SynthesisResult};

use super::{parse_request_date, valid_email};

#[derive(Deserialize)]
pub struct CreatePatientRequest {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdatePatientRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

#[derive(Serialize)]
pub struct CreatedResponse {
    pub id: i64,
    pub message: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Deserialize)]
pub struct PatientListQuery {
    pub search: Option<String>,
}

/// `POST /api/patients` — create a patient.
pub async fn create(
    State(ctx): State<ApiContext>,
    Json(req): Json<CreatePatientRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    if req.first_name.trim().is_empty() {
        return Err(ApiError::BadRequest("First name is required".into()));
    }
    if req.last_name.trim().is_empty() {
        return Err(ApiError::BadRequest("Last name is required".into()));
    }
    let date_of_birth = parse_request_date(&req.date_of_birth)?;
    if let Some(email) = &req.email {
        if !valid_email(email) {
            return Err(ApiError::BadRequest("Must be a valid email format".into()));
        }
    }

    let conn = ctx.open_db()?;
    let id = patient::insert_patient(
        &conn,
        &NewPatient {
            first_name: req.first_name,
            last_name: req.last_name,
            date_of_birth,
            phone: req.phone,
            email: req.email,
            address: req.address,
        },
    )?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            id,
            message: "Patient created successfully".into(),
        }),
    ))
}

/// `GET /api/patients?search=` — patient index.
pub async fn list(
    State(ctx): State<ApiContext>,
    Query(query): Query<PatientListQuery>,
) -> Result<Json<Vec<PatientSummary>>, ApiError> {
    let conn = ctx.open_db()?;
    let patients = patient::list_patients(&conn, query.search.as_deref())?;
    Ok(Json(patients))
}

/// `GET /api/patients/:id` — single patient.
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
) -> Result<Json<Patient>, ApiError> {
    let conn = ctx.open_db()?;
    Ok(Json(patient::get_patient(&conn, id)?))
}

/// `PUT /api/patients/:id` — partial update.
pub async fn update(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
    Json(req): Json<UpdatePatientRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let date_of_birth = match &req.date_of_birth {
        Some(d) => Some(parse_request_date(d)?),
        None => None,
    };
    if let Some(email) = &req.email {
        if !valid_email(email) {
            return Err(ApiError::BadRequest("Must be a valid email format".into()));
        }
    }

    let update = PatientUpdate {
        first_name: req.first_name,
        last_name: req.last_name,
        date_of_birth,
        phone: req.phone,
        email: req.email,
        address: req.address,
    };
    if update.is_empty() {
        return Err(ApiError::BadRequest("No fields provided for update".into()));
    }

    let conn = ctx.open_db()?;
    patient::update_patient(&conn, id, &update)?;
    Ok(Json(MessageResponse {
        message: "Patient updated successfully".into(),
    }))
}

/// `DELETE /api/patients/:id`.
pub async fn remove(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    let conn = ctx.open_db()?;
    patient::delete_patient(&conn, id)?;
    Ok(Json(MessageResponse {
        message: "Patient deleted successfully".into(),
    }))
}

/// `GET /api/patients/:id/appointments` — appointments with doctor names.
pub async fn appointments(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<PatientAppointment>>, ApiError> {
    let conn = ctx.open_db()?;
    Ok(Json(appointment::fetch_for_patient(&conn, id)?))
}

#[derive(Serialize)]
pub struct PatientHistoryResponse {
    pub patient: Patient,
    pub appointments: Vec<PatientAppointment>,
    pub documents: Vec<Document>,
    pub conditions: Vec<MedicalCondition>,
    pub synthesis: SynthesisResult,
}

/// `GET /api/patients/:id/history` — full history plus risk synthesis.
pub async fn history_view(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
) -> Result<Json<PatientHistoryResponse>, ApiError> {
    let conn = ctx.open_db()?;

    let bundle = history::fetch_patient_history(&conn, id)?;
    let synthesis = synthesis::synthesize_with(&bundle, &ctx.weights);

    let appointments = appointment::fetch_for_patient(&conn, id)?;
    let documents = document::fetch_for_patient(&conn, id)?;

    Ok(Json(PatientHistoryResponse {
        patient: bundle.patient,
        appointments,
        documents,
        conditions: bundle.conditions,
        synthesis,
    }))
}
