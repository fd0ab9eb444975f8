//! Enrolment entity model and DTOs.

use admissions_core::funnel::Intake;
use admissions_core::types::{DbId, Timestamp};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `enrolments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Enrolment {
    pub id: DbId,
    pub lead_id: Option<DbId>,
    pub course_name: String,
    pub course_date: Option<NaiveDate>,
    /// Currency-agnostic amount (application fee or course price).
    pub amount: Option<f64>,
    pub status: String,
    pub payment_status: String,
    /// Quarterly cohort; NULL until assigned.
    pub intake: Option<String>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new enrolment.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEnrolment {
    pub lead_id: Option<DbId>,
    pub course_name: String,
    pub course_date: Option<NaiveDate>,
    pub amount: Option<f64>,
    /// Defaults to `pending` if omitted.
    pub status: Option<String>,
    /// Defaults to `unpaid` if omitted.
    pub payment_status: Option<String>,
    pub intake: Option<Intake>,
    pub notes: Option<String>,
}

/// DTO for updating an existing enrolment. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateEnrolment {
    pub lead_id: Option<DbId>,
    pub course_name: Option<String>,
    pub course_date: Option<NaiveDate>,
    pub amount: Option<f64>,
    pub status: Option<String>,
    pub payment_status: Option<String>,
    pub intake: Option<Intake>,
    pub notes: Option<String>,
}

/// DTO for converting an enquiry into an enrolment.
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertEnquiry {
    /// The cohort the student starts in.
    pub intake: Intake,
    /// Defaults to the enquiry's subject.
    pub course_name: Option<String>,
    /// Application fee; defaults to 0.
    pub amount: Option<f64>,
}
