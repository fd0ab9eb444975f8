//! Enquiry entity model and DTOs.

use admissions_core::types::{DbId, Timestamp};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::lead::Lead;

/// A row from the `enquiries` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Enquiry {
    pub id: DbId,
    /// Nullable: webhook-created enquiries arrive with no lead linkage.
    pub lead_id: Option<DbId>,
    pub subject: String,
    pub message: Option<String>,
    pub status: String,
    pub priority: String,
    pub assigned_to: Option<String>,
    /// Set when the enquiry moves to `visit` status.
    pub visit_date: Option<NaiveDate>,
    pub visit_type: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An enquiry together with its linked lead, for detail responses.
#[derive(Debug, Clone, Serialize)]
pub struct EnquiryWithLead {
    #[serde(flatten)]
    pub enquiry: Enquiry,
    pub lead: Option<Lead>,
}

/// DTO for creating a new enquiry.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEnquiry {
    pub lead_id: Option<DbId>,
    pub subject: String,
    pub message: Option<String>,
    /// Defaults to `open` if omitted.
    pub status: Option<String>,
    /// Defaults to `medium` if omitted.
    pub priority: Option<String>,
    pub assigned_to: Option<String>,
    pub visit_date: Option<NaiveDate>,
    pub visit_type: Option<String>,
}

/// DTO for updating an existing enquiry. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateEnquiry {
    pub lead_id: Option<DbId>,
    pub subject: Option<String>,
    pub message: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub assigned_to: Option<String>,
    pub visit_date: Option<NaiveDate>,
    pub visit_type: Option<String>,
}

/// DTO for the visit-logging operations.
///
/// `visit_date` defaults to today and `visit_type` to `walkin` when absent;
/// `subject` is only consulted when logging a visit against a lead (it
/// seeds the created enquiry's subject).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VisitLog {
    pub visit_date: Option<NaiveDate>,
    pub visit_type: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}
