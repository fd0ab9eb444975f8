//! Row-level types and accounting for the batch importers.
//!
//! The contract for both importers (leads and enquiries): rows are processed
//! independently, one row's failure never aborts the batch, and every
//! submitted row ends in exactly one outcome -- accepted, rejected by
//! validation, or failed in storage. The report counts therefore always
//! reconcile: `imported + errors.len() == total`.

use serde::{Deserialize, Serialize};

use crate::funnel::{EnquiryStatus, LeadStatus, Priority};
use crate::resolution::derived_lead_name;

/// Lead rows are inserted in chunks of this size; a chunk-level insert
/// failure is recorded against every row in the chunk.
pub const LEAD_IMPORT_CHUNK_SIZE: usize = 100;

/// Subject given to imported enquiries that arrive without one.
pub const DEFAULT_IMPORT_SUBJECT: &str = "Imported Enquiry";

// ── Submitted rows ───────────────────────────────────────────────────

/// A raw lead row as submitted to the lead import endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeadImportRow {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub source: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

/// A raw enquiry row as submitted to the enquiry import endpoint.
///
/// `lead_email` / `lead_name` are identity hints for lead resolution, not
/// columns on the enquiry itself.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnquiryImportRow {
    pub lead_email: Option<String>,
    pub lead_name: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub assigned_to: Option<String>,
}

// ── Normalized rows ──────────────────────────────────────────────────

/// A lead row that passed validation, ready for insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedLead {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub source: Option<String>,
    pub status: LeadStatus,
    pub notes: Option<String>,
}

/// An enquiry row that passed validation. Lead linkage is resolved
/// separately from the identity hints.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedEnquiry {
    pub subject: String,
    pub message: Option<String>,
    pub status: EnquiryStatus,
    pub priority: Priority,
    pub assigned_to: Option<String>,
}

/// Trim a submitted field; whitespace-only values count as absent.
fn opt_trimmed(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Validate and normalize one lead row.
///
/// A lead needs some identity: an explicit name, or an email to derive one
/// from (its local part, falling back to the generic import label). Rows
/// with neither are rejected. A supplied status must be a known value
/// (absent defaults to `new`). The returned `Err` is the rejection reason
/// reported against the row.
pub fn normalize_lead_row(row: &LeadImportRow) -> Result<NormalizedLead, String> {
    let explicit_name = opt_trimmed(&row.name);
    let email = opt_trimmed(&row.email);
    if explicit_name.is_none() && email.is_none() {
        return Err("name or email is required".to_string());
    }
    let name = derived_lead_name(explicit_name.as_deref(), email.as_deref());

    let status = match opt_trimmed(&row.status) {
        Some(s) => LeadStatus::parse(&s).ok_or_else(|| format!("invalid status '{s}'"))?,
        None => LeadStatus::default(),
    };

    Ok(NormalizedLead {
        name,
        email,
        phone: opt_trimmed(&row.phone),
        company: opt_trimmed(&row.company),
        source: opt_trimmed(&row.source),
        status,
        notes: opt_trimmed(&row.notes),
    })
}

/// Validate and normalize one enquiry row.
///
/// Subject defaults to [`DEFAULT_IMPORT_SUBJECT`], status to `open`,
/// priority to `medium`; supplied values must parse.
pub fn normalize_enquiry_row(row: &EnquiryImportRow) -> Result<NormalizedEnquiry, String> {
    let status = match opt_trimmed(&row.status) {
        Some(s) => EnquiryStatus::parse(&s).ok_or_else(|| format!("invalid status '{s}'"))?,
        None => EnquiryStatus::default(),
    };

    let priority = match opt_trimmed(&row.priority) {
        Some(p) => Priority::parse(&p).ok_or_else(|| format!("invalid priority '{p}'"))?,
        None => Priority::default(),
    };

    Ok(NormalizedEnquiry {
        subject: opt_trimmed(&row.subject).unwrap_or_else(|| DEFAULT_IMPORT_SUBJECT.to_string()),
        message: opt_trimmed(&row.message),
        status,
        priority,
        assigned_to: opt_trimmed(&row.assigned_to),
    })
}

// ── Row accounting ───────────────────────────────────────────────────

/// The final fate of one submitted row, in submission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    /// Inserted successfully.
    Accepted,
    /// Failed validation; never reached storage.
    Rejected(String),
    /// Reached storage and the insert failed.
    Failed(String),
}

/// One reported row error, with the row's 1-based position.
#[derive(Debug, Clone, Serialize)]
pub struct RowError {
    pub row: usize,
    pub error: String,
}

/// Result summary returned by both import endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub total: usize,
    pub imported: usize,
    pub errors: Vec<RowError>,
}

impl ImportReport {
    /// Fold per-row outcomes (in submission order) into the report.
    pub fn from_outcomes(outcomes: &[RowOutcome]) -> Self {
        let mut imported = 0;
        let mut errors = Vec::new();

        for (idx, outcome) in outcomes.iter().enumerate() {
            match outcome {
                RowOutcome::Accepted => imported += 1,
                RowOutcome::Rejected(reason) | RowOutcome::Failed(reason) => {
                    errors.push(RowError {
                        row: idx + 1,
                        error: reason.clone(),
                    });
                }
            }
        }

        Self {
            total: outcomes.len(),
            imported,
            errors,
        }
    }

    /// True when nothing was imported and at least one row errored -- the
    /// "total failure" shape that maps to a 500 at the HTTP edge.
    pub fn fully_failed(&self) -> bool {
        self.imported == 0 && !self.errors.is_empty()
    }
}
