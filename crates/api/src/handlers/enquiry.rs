//! Handlers for the `/enquiries` resource, including the two guided
//! transitions: visit logging and conversion to an enrolment.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;

use admissions_core::error::CoreError;
use admissions_core::funnel::{EnquiryStatus, Priority, VisitType};
use admissions_core::types::DbId;
use admissions_db::models::enquiry::{
    CreateEnquiry, Enquiry, EnquiryWithLead, UpdateEnquiry, VisitLog,
};
use admissions_db::models::enrolment::{ConvertEnquiry, Enrolment};
use admissions_db::repositories::{EnquiryRepo, EnrolmentRepo};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Reject unknown enum values before they hit the CHECK constraints.
fn validate_fields(
    status: &Option<String>,
    priority: &Option<String>,
    visit_type: &Option<String>,
) -> AppResult<()> {
    if let Some(s) = status {
        if EnquiryStatus::parse(s).is_none() {
            return Err(AppError::BadRequest(format!("invalid status '{s}'")));
        }
    }
    if let Some(p) = priority {
        if Priority::parse(p).is_none() {
            return Err(AppError::BadRequest(format!("invalid priority '{p}'")));
        }
    }
    if let Some(v) = visit_type {
        if VisitType::parse(v).is_none() {
            return Err(AppError::BadRequest(format!("invalid visit_type '{v}'")));
        }
    }
    Ok(())
}

/// POST /api/v1/enquiries
pub async fn create(
    State(state): State<AppState>,
    Json(mut input): Json<CreateEnquiry>,
) -> AppResult<(StatusCode, Json<Enquiry>)> {
    input.subject = input.subject.trim().to_string();
    if input.subject.is_empty() {
        return Err(AppError::BadRequest("subject must not be empty".into()));
    }
    validate_fields(&input.status, &input.priority, &input.visit_type)?;

    let enquiry = EnquiryRepo::create(&state.pool, &input).await?;

    tracing::info!(enquiry_id = enquiry.id, "Enquiry created");
    Ok((StatusCode::CREATED, Json(enquiry)))
}

/// GET /api/v1/enquiries
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Enquiry>>> {
    let enquiries = EnquiryRepo::list(&state.pool).await?;
    Ok(Json(enquiries))
}

/// GET /api/v1/enquiries/{id}
///
/// Embeds the linked lead, when there is one.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<EnquiryWithLead>> {
    let enquiry = EnquiryRepo::find_with_lead(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Enquiry",
            id,
        }))?;
    Ok(Json(enquiry))
}

/// PUT /api/v1/enquiries/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateEnquiry>,
) -> AppResult<Json<Enquiry>> {
    validate_fields(&input.status, &input.priority, &input.visit_type)?;

    let enquiry = EnquiryRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Enquiry",
            id,
        }))?;
    Ok(Json(enquiry))
}

/// DELETE /api/v1/enquiries/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let deleted = EnquiryRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Enquiry",
            id,
        }))
    }
}

/// POST /api/v1/enquiries/{id}/visit
///
/// Move the enquiry into `visit` status. The date defaults to today, the
/// type to walk-in; an absent message keeps the existing one.
pub async fn log_visit(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<VisitLog>,
) -> AppResult<Json<Enquiry>> {
    let visit_type = match &input.visit_type {
        Some(v) => VisitType::parse(v)
            .ok_or_else(|| AppError::BadRequest(format!("invalid visit_type '{v}'")))?,
        None => VisitType::default(),
    };
    let visit_date = input.visit_date.unwrap_or_else(|| Utc::now().date_naive());

    let enquiry = EnquiryRepo::log_visit(
        &state.pool,
        id,
        visit_date,
        visit_type.as_str(),
        input.message.as_deref(),
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "Enquiry",
        id,
    }))?;

    tracing::info!(enquiry_id = id, visit_type = %visit_type, "Visit logged");
    Ok(Json(enquiry))
}

/// POST /api/v1/enquiries/{id}/convert
///
/// Convert the enquiry into an enrolment (payment recorded as paid) and
/// close it, in one transaction.
pub async fn convert(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ConvertEnquiry>,
) -> AppResult<(StatusCode, Json<Enrolment>)> {
    let enquiry = EnquiryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Enquiry",
            id,
        }))?;

    let enrolment = EnrolmentRepo::convert_from_enquiry(&state.pool, &enquiry, &input).await?;

    Ok((StatusCode::CREATED, Json(enrolment)))
}
