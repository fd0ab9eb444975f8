//! The EVES (Enquiry / Visit / Enrolment / Starter) monthly funnel report.

use axum::extract::{Query, State};
use axum::Json;
use chrono::{Datelike, Utc};
use serde::Deserialize;

use admissions_core::report::{EvesReport, MonthKey};
use admissions_db::repositories::{EnquiryRepo, EnrolmentRepo};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Query parameters for the report endpoint.
#[derive(Debug, Deserialize)]
pub struct ReportParams {
    /// `YYYY-MM`; defaults to the current UTC month.
    pub month: Option<String>,
}

/// GET /api/v1/reports/eves?month=YYYY-MM
///
/// Starters are enrolments whose intake cohort starts in the requested
/// month; months without an intake (anything outside Feb/May/Aug/Nov)
/// report zero starters.
pub async fn eves(
    State(state): State<AppState>,
    Query(params): Query<ReportParams>,
) -> AppResult<Json<EvesReport>> {
    let month = match &params.month {
        Some(raw) => MonthKey::parse(raw)
            .ok_or_else(|| AppError::BadRequest(format!("invalid month '{raw}', expected YYYY-MM")))?,
        None => {
            let now = Utc::now();
            MonthKey {
                year: now.year(),
                month: now.month(),
            }
        }
    };

    let enquiries = EnquiryRepo::count_created_in(&state.pool, month.year, month.month).await?;
    let visits = EnquiryRepo::count_visits_in(&state.pool, month.year, month.month).await?;
    let enrolments = EnrolmentRepo::count_created_in(&state.pool, month.year, month.month).await?;

    let starters = match month.intake() {
        Some(intake) => EnrolmentRepo::count_starters(&state.pool, intake.as_str()).await?,
        None => 0,
    };

    Ok(Json(EvesReport {
        month: month.to_string(),
        enquiries,
        visits,
        enrolments,
        starters,
    }))
}
