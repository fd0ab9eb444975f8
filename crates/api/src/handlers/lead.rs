//! Handlers for the `/leads` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;

use admissions_core::error::CoreError;
use admissions_core::funnel::{EnquiryStatus, LeadStatus, VisitType};
use admissions_core::types::DbId;
use admissions_db::models::enquiry::{CreateEnquiry, Enquiry, VisitLog};
use admissions_db::models::lead::{CreateLead, Lead, UpdateLead};
use admissions_db::repositories::{EnquiryRepo, LeadRepo};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Trim a submitted optional field; whitespace-only values become `None`.
fn trimmed(value: Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Reject unknown lead status values before they hit the CHECK constraint.
fn validate_status(status: &Option<String>) -> AppResult<()> {
    if let Some(s) = status {
        if LeadStatus::parse(s).is_none() {
            return Err(AppError::BadRequest(format!("invalid status '{s}'")));
        }
    }
    Ok(())
}

/// POST /api/v1/leads
pub async fn create(
    State(state): State<AppState>,
    Json(mut input): Json<CreateLead>,
) -> AppResult<(StatusCode, Json<Lead>)> {
    input.name = input.name.trim().to_string();
    if input.name.is_empty() {
        return Err(AppError::BadRequest("name must not be empty".into()));
    }
    input.email = trimmed(input.email);
    input.phone = trimmed(input.phone);
    input.company = trimmed(input.company);
    input.source = trimmed(input.source);
    input.notes = trimmed(input.notes);
    validate_status(&input.status)?;

    let lead = LeadRepo::create(&state.pool, &input).await?;

    tracing::info!(lead_id = lead.id, "Lead created");
    Ok((StatusCode::CREATED, Json(lead)))
}

/// GET /api/v1/leads
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Lead>>> {
    let leads = LeadRepo::list(&state.pool).await?;
    Ok(Json(leads))
}

/// GET /api/v1/leads/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Lead>> {
    let lead = LeadRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Lead", id }))?;
    Ok(Json(lead))
}

/// PUT /api/v1/leads/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateLead>,
) -> AppResult<Json<Lead>> {
    if let Some(name) = &input.name {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::BadRequest("name must not be empty".into()));
        }
        input.name = Some(name.to_string());
    }
    validate_status(&input.status)?;

    let lead = LeadRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Lead", id }))?;
    Ok(Json(lead))
}

/// DELETE /api/v1/leads/{id}
///
/// Dependent enquiries and enrolments cascade.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let deleted = LeadRepo::delete(&state.pool, id).await?;
    if deleted {
        tracing::info!(lead_id = id, "Lead deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "Lead", id }))
    }
}

/// POST /api/v1/leads/{id}/visits
///
/// Log a visit for a lead that has no open enquiry yet: creates an enquiry
/// already in `visit` status. The subject defaults to "Visit from {name}",
/// the date to today, the type to walk-in.
pub async fn log_visit(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<VisitLog>,
) -> AppResult<(StatusCode, Json<Enquiry>)> {
    let lead = LeadRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Lead", id }))?;

    let visit_type = match &input.visit_type {
        Some(v) => VisitType::parse(v)
            .ok_or_else(|| AppError::BadRequest(format!("invalid visit_type '{v}'")))?,
        None => VisitType::default(),
    };

    let enquiry = EnquiryRepo::create(
        &state.pool,
        &CreateEnquiry {
            lead_id: Some(lead.id),
            subject: trimmed(input.subject).unwrap_or_else(|| format!("Visit from {}", lead.name)),
            message: trimmed(input.message),
            status: Some(EnquiryStatus::Visit.as_str().to_string()),
            priority: None,
            assigned_to: None,
            visit_date: Some(input.visit_date.unwrap_or_else(|| Utc::now().date_naive())),
            visit_type: Some(visit_type.as_str().to_string()),
        },
    )
    .await?;

    tracing::info!(lead_id = lead.id, enquiry_id = enquiry.id, "Visit logged for lead");
    Ok((StatusCode::CREATED, Json(enquiry)))
}
