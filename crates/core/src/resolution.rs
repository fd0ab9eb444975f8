//! Lead resolution rules: deriving an identity from partial import hints.
//!
//! Given `{email?, name?}` the importer must end up with at most one lead.
//! The decision tree is pure and lives here as [`plan_resolution`]; executing
//! the plan (upsert / insert) is the repository's job.

/// `source` tag stamped on leads created by the enquiry importer.
pub const IMPORT_SOURCE: &str = "enquiry_import";

/// Name used when neither an explicit name nor a usable email local part
/// is available.
pub const FALLBACK_LEAD_NAME: &str = "Imported Lead";

/// What the repository should do to resolve a lead for one import row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionPlan {
    /// Email present: idempotent upsert keyed by the (exact) email.
    /// Resolves to the existing lead on conflict, otherwise creates one
    /// with the derived name.
    UpsertByEmail { email: String, name: String },
    /// Name only: always create a fresh lead. Lookup-by-name is deliberately
    /// not performed -- common names would merge unrelated people. Every
    /// name-only row therefore produces a new lead.
    CreateByName { name: String },
    /// No identity at all: leave the dependent record unlinked.
    Skip,
}

/// Build the resolution plan for one row's identity hints.
///
/// Hints are trimmed first; whitespace-only values count as absent.
pub fn plan_resolution(email: Option<&str>, name: Option<&str>) -> ResolutionPlan {
    let email = email.map(str::trim).filter(|e| !e.is_empty());
    let name = name.map(str::trim).filter(|n| !n.is_empty());

    match (email, name) {
        (Some(email), name) => ResolutionPlan::UpsertByEmail {
            email: email.to_string(),
            name: derived_lead_name(name, Some(email)),
        },
        (None, Some(name)) => ResolutionPlan::CreateByName {
            name: name.to_string(),
        },
        (None, None) => ResolutionPlan::Skip,
    }
}

/// Derive a lead name: explicit name, else the email's local part, else
/// [`FALLBACK_LEAD_NAME`].
///
/// An email like `@example.com` has an empty local part and falls through
/// to the fallback.
pub fn derived_lead_name(name: Option<&str>, email: Option<&str>) -> String {
    if let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) {
        return name.to_string();
    }
    if let Some(email) = email {
        let local = email.trim().split('@').next().unwrap_or("").trim();
        if !local.is_empty() {
            return local.to_string();
        }
    }
    FALLBACK_LEAD_NAME.to_string()
}
