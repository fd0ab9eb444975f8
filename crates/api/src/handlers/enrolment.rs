//! Handlers for the `/enrolments` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use admissions_core::error::CoreError;
use admissions_core::funnel::{EnrolmentStatus, PaymentStatus};
use admissions_core::types::DbId;
use admissions_db::models::enrolment::{CreateEnrolment, Enrolment, UpdateEnrolment};
use admissions_db::repositories::EnrolmentRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Reject unknown enum values before they hit the CHECK constraints.
fn validate_fields(status: &Option<String>, payment_status: &Option<String>) -> AppResult<()> {
    if let Some(s) = status {
        if EnrolmentStatus::parse(s).is_none() {
            return Err(AppError::BadRequest(format!("invalid status '{s}'")));
        }
    }
    if let Some(p) = payment_status {
        if PaymentStatus::parse(p).is_none() {
            return Err(AppError::BadRequest(format!(
                "invalid payment_status '{p}'"
            )));
        }
    }
    Ok(())
}

/// POST /api/v1/enrolments
pub async fn create(
    State(state): State<AppState>,
    Json(mut input): Json<CreateEnrolment>,
) -> AppResult<(StatusCode, Json<Enrolment>)> {
    input.course_name = input.course_name.trim().to_string();
    if input.course_name.is_empty() {
        return Err(AppError::BadRequest("course_name must not be empty".into()));
    }
    validate_fields(&input.status, &input.payment_status)?;

    let enrolment = EnrolmentRepo::create(&state.pool, &input).await?;

    tracing::info!(enrolment_id = enrolment.id, "Enrolment created");
    Ok((StatusCode::CREATED, Json(enrolment)))
}

/// GET /api/v1/enrolments
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Enrolment>>> {
    let enrolments = EnrolmentRepo::list(&state.pool).await?;
    Ok(Json(enrolments))
}

/// GET /api/v1/enrolments/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Enrolment>> {
    let enrolment = EnrolmentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Enrolment",
            id,
        }))?;
    Ok(Json(enrolment))
}

/// PUT /api/v1/enrolments/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateEnrolment>,
) -> AppResult<Json<Enrolment>> {
    validate_fields(&input.status, &input.payment_status)?;

    let enrolment = EnrolmentRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Enrolment",
            id,
        }))?;
    Ok(Json(enrolment))
}

/// DELETE /api/v1/enrolments/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let deleted = EnrolmentRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Enrolment",
            id,
        }))
    }
}
