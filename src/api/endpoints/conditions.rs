//! Medical condition CRUD.

use std::str::FromStr;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db::repository::condition::{self, ConditionUpdate, NewCondition};
use crate::models::{ConditionSeverity, MedicalCondition};

use super::parse_request_date;
use super::patients::{CreatedResponse, MessageResponse};

#[derive(Deserialize)]
pub struct CreateConditionRequest {
    pub patient_id: i64,
    pub condition_name: String,
    pub diagnosis_date: Option<String>,
    pub severity: String,
}

#[derive(Deserialize)]
pub struct UpdateConditionRequest {
    pub condition_name: Option<String>,
    pub diagnosis_date: Option<String>,
    pub severity: Option<String>,
}

fn parse_severity(s: &str) -> Result<ConditionSeverity, ApiError> {
    ConditionSeverity::from_str(s)
        .map_err(|_| ApiError::BadRequest("Severity must be Mild, Moderate, or Severe".into()))
}

/// `POST /api/conditions`.
pub async fn create(
    State(ctx): State<ApiContext>,
    Json(req): Json<CreateConditionRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    if req.condition_name.trim().is_empty() {
        return Err(ApiError::BadRequest("Condition name is required".into()));
    }
    let severity = parse_severity(&req.severity)?;
    let diagnosis_date = match &req.diagnosis_date {
        Some(d) => Some(parse_request_date(d)?),
        None => None,
    };

    let conn = ctx.open_db()?;
    let id = condition::insert_condition(
        &conn,
        &NewCondition {
            patient_id: req.patient_id,
            condition_name: req.condition_name,
            diagnosis_date,
            severity,
        },
    )?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            id,
            message: "Condition created successfully".into(),
        }),
    ))
}

/// `GET /api/conditions`.
pub async fn list(
    State(ctx): State<ApiContext>,
) -> Result<Json<Vec<MedicalCondition>>, ApiError> {
    let conn = ctx.open_db()?;
    Ok(Json(condition::list_conditions(&conn)?))
}

/// `GET /api/conditions/:id`.
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
) -> Result<Json<MedicalCondition>, ApiError> {
    let conn = ctx.open_db()?;
    Ok(Json(condition::get_condition(&conn, id)?))
}

/// `PUT /api/conditions/:id` — partial update.
pub async fn update(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateConditionRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let severity = match &req.severity {
        Some(s) => Some(parse_severity(s)?),
        None => None,
    };
    let diagnosis_date = match &req.diagnosis_date {
        Some(d) => Some(parse_request_date(d)?),
        None => None,
    };

    let update = ConditionUpdate {
        condition_name: req.condition_name,
        diagnosis_date,
        severity,
    };
    if update.is_empty() {
        return Err(ApiError::BadRequest("No fields provided for update".into()));
    }

    let conn = ctx.open_db()?;
    condition::update_condition(&conn, id, &update)?;
    Ok(Json(MessageResponse {
        message: "Condition updated successfully".into(),
    }))
}

/// `DELETE /api/conditions/:id`.
pub async fn remove(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    let conn = ctx.open_db()?;
    condition::delete_condition(&conn, id)?;
    Ok(Json(MessageResponse {
        message: "Condition deleted successfully".into(),
    }))
}
