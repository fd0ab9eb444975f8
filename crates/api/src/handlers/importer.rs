//! Batch import endpoints for leads and enquiries.
//!
//! Both endpoints take a JSON array of already-parsed rows (the CSV itself
//! is parsed client-side) and return an [`ImportReport`]: every submitted
//! row is either imported or listed in `errors` with its 1-based position,
//! so `imported + errors.len() == total` always holds. A single bad row
//! never aborts the batch.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use admissions_core::imports::{
    normalize_enquiry_row, normalize_lead_row, EnquiryImportRow, ImportReport, LeadImportRow,
    NormalizedLead, RowOutcome, LEAD_IMPORT_CHUNK_SIZE,
};
use admissions_core::resolution::plan_resolution;
use admissions_db::repositories::{EnquiryRepo, LeadRepo};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Request body for `POST /leads/import`.
#[derive(Debug, Deserialize)]
pub struct LeadImportRequest {
    pub leads: Vec<LeadImportRow>,
}

/// Request body for `POST /enquiries/import`.
#[derive(Debug, Deserialize)]
pub struct EnquiryImportRequest {
    pub enquiries: Vec<EnquiryImportRow>,
}

/// Response envelope shared by both importers.
///
/// `success` reports that the batch ran to completion with at least one row
/// imported; callers must still check `errors` for partial failure.
#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub success: bool,
    #[serde(flatten)]
    pub report: ImportReport,
}

/// Map a finished report to its HTTP shape: 500 when nothing was imported
/// and at least one row errored, 200 otherwise.
fn report_response(report: ImportReport) -> Response {
    if report.fully_failed() {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ImportResponse {
                success: false,
                report,
            }),
        )
            .into_response()
    } else {
        Json(ImportResponse {
            success: true,
            report,
        })
        .into_response()
    }
}

/// POST /api/v1/leads/import
///
/// Valid rows are inserted in chunks of [`LEAD_IMPORT_CHUNK_SIZE`] with one
/// multi-row INSERT per chunk; a chunk-level failure is recorded against
/// every row in that chunk.
pub async fn import_leads(
    State(state): State<AppState>,
    Json(request): Json<LeadImportRequest>,
) -> AppResult<Response> {
    if request.leads.is_empty() {
        return Err(AppError::BadRequest(
            "leads must be a non-empty array".into(),
        ));
    }

    let normalized: Vec<Result<NormalizedLead, String>> =
        request.leads.iter().map(normalize_lead_row).collect();

    let mut outcomes: Vec<RowOutcome> = normalized
        .iter()
        .map(|row| match row {
            Ok(_) => RowOutcome::Accepted,
            Err(reason) => RowOutcome::Rejected(reason.clone()),
        })
        .collect();

    let valid: Vec<(usize, NormalizedLead)> = normalized
        .into_iter()
        .enumerate()
        .filter_map(|(idx, row)| row.ok().map(|lead| (idx, lead)))
        .collect();

    for chunk in valid.chunks(LEAD_IMPORT_CHUNK_SIZE) {
        let rows: Vec<NormalizedLead> = chunk.iter().map(|(_, lead)| lead.clone()).collect();
        if let Err(err) = LeadRepo::insert_chunk(&state.pool, &rows).await {
            tracing::error!(error = %err, rows = chunk.len(), "Lead import chunk failed");
            let message = err.to_string();
            for (idx, _) in chunk {
                outcomes[*idx] = RowOutcome::Failed(message.clone());
            }
        }
    }

    let report = ImportReport::from_outcomes(&outcomes);
    tracing::info!(
        total = report.total,
        imported = report.imported,
        errors = report.errors.len(),
        "Lead import completed",
    );

    Ok(report_response(report))
}

/// POST /api/v1/enquiries/import
///
/// Rows are processed strictly sequentially: lead resolution first (upsert
/// by email, fresh lead for name-only rows, unlinked otherwise), then the
/// enquiry insert with defaulted fields.
pub async fn import_enquiries(
    State(state): State<AppState>,
    Json(request): Json<EnquiryImportRequest>,
) -> AppResult<Response> {
    if request.enquiries.is_empty() {
        return Err(AppError::BadRequest(
            "enquiries must be a non-empty array".into(),
        ));
    }

    let mut outcomes = Vec::with_capacity(request.enquiries.len());

    for (idx, row) in request.enquiries.iter().enumerate() {
        let outcome = match normalize_enquiry_row(row) {
            Err(reason) => RowOutcome::Rejected(reason),
            Ok(normalized) => {
                let plan = plan_resolution(row.lead_email.as_deref(), row.lead_name.as_deref());
                match LeadRepo::resolve(&state.pool, &plan).await {
                    Err(err) => {
                        tracing::error!(error = %err, row = idx + 1, "Lead resolution failed");
                        RowOutcome::Failed(format!("failed to resolve lead: {err}"))
                    }
                    Ok(lead_id) => {
                        match EnquiryRepo::create_imported(&state.pool, lead_id, &normalized).await
                        {
                            Ok(_) => RowOutcome::Accepted,
                            Err(err) => {
                                tracing::error!(error = %err, row = idx + 1, "Enquiry insert failed");
                                RowOutcome::Failed(err.to_string())
                            }
                        }
                    }
                }
            }
        };
        outcomes.push(outcome);
    }

    let report = ImportReport::from_outcomes(&outcomes);
    tracing::info!(
        total = report.total,
        imported = report.imported,
        errors = report.errors.len(),
        "Enquiry import completed",
    );

    Ok(report_response(report))
}
