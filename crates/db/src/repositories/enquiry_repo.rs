//! Repository for the `enquiries` table.

use admissions_core::funnel::EnquiryStatus;
use admissions_core::imports::NormalizedEnquiry;
use admissions_core::types::DbId;
use chrono::NaiveDate;
use sqlx::PgPool;

use crate::models::enquiry::{CreateEnquiry, Enquiry, EnquiryWithLead, UpdateEnquiry};
use crate::repositories::LeadRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, lead_id, subject, message, status, priority, \
    assigned_to, visit_date, visit_type, created_at, updated_at";

/// Provides CRUD, visit-logging, and report-count operations for enquiries.
pub struct EnquiryRepo;

impl EnquiryRepo {
    /// Insert a new enquiry, returning the created row.
    ///
    /// If `status` is `None`, defaults to `'open'`; `priority` to `'medium'`.
    pub async fn create(pool: &PgPool, input: &CreateEnquiry) -> Result<Enquiry, sqlx::Error> {
        let query = format!(
            "INSERT INTO enquiries
                (lead_id, subject, message, status, priority, assigned_to, visit_date, visit_type)
             VALUES ($1, $2, $3, COALESCE($4, 'open'), COALESCE($5, 'medium'), $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Enquiry>(&query)
            .bind(input.lead_id)
            .bind(&input.subject)
            .bind(&input.message)
            .bind(&input.status)
            .bind(&input.priority)
            .bind(&input.assigned_to)
            .bind(input.visit_date)
            .bind(&input.visit_type)
            .fetch_one(pool)
            .await
    }

    /// Insert one validated import row, linking the resolved lead (if any).
    pub async fn create_imported(
        pool: &PgPool,
        lead_id: Option<DbId>,
        row: &NormalizedEnquiry,
    ) -> Result<Enquiry, sqlx::Error> {
        let input = CreateEnquiry {
            lead_id,
            subject: row.subject.clone(),
            message: row.message.clone(),
            status: Some(row.status.as_str().to_string()),
            priority: Some(row.priority.as_str().to_string()),
            assigned_to: row.assigned_to.clone(),
            visit_date: None,
            visit_type: None,
        };
        Self::create(pool, &input).await
    }

    /// Find an enquiry by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Enquiry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM enquiries WHERE id = $1");
        sqlx::query_as::<_, Enquiry>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an enquiry and embed its linked lead, for detail responses.
    pub async fn find_with_lead(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<EnquiryWithLead>, sqlx::Error> {
        let Some(enquiry) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let lead = match enquiry.lead_id {
            Some(lead_id) => LeadRepo::find_by_id(pool, lead_id).await?,
            None => None,
        };
        Ok(Some(EnquiryWithLead { enquiry, lead }))
    }

    /// List all enquiries, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Enquiry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM enquiries ORDER BY created_at DESC");
        sqlx::query_as::<_, Enquiry>(&query).fetch_all(pool).await
    }

    /// Update an enquiry. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateEnquiry,
    ) -> Result<Option<Enquiry>, sqlx::Error> {
        let query = format!(
            "UPDATE enquiries SET
                lead_id = COALESCE($2, lead_id),
                subject = COALESCE($3, subject),
                message = COALESCE($4, message),
                status = COALESCE($5, status),
                priority = COALESCE($6, priority),
                assigned_to = COALESCE($7, assigned_to),
                visit_date = COALESCE($8, visit_date),
                visit_type = COALESCE($9, visit_type)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Enquiry>(&query)
            .bind(id)
            .bind(input.lead_id)
            .bind(&input.subject)
            .bind(&input.message)
            .bind(&input.status)
            .bind(&input.priority)
            .bind(&input.assigned_to)
            .bind(input.visit_date)
            .bind(&input.visit_type)
            .fetch_optional(pool)
            .await
    }

    /// Delete an enquiry by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM enquiries WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Move an enquiry into `visit` status with the visit metadata.
    ///
    /// An absent `message` keeps the existing one.
    /// Returns `None` if no row with the given `id` exists.
    pub async fn log_visit(
        pool: &PgPool,
        id: DbId,
        visit_date: NaiveDate,
        visit_type: &str,
        message: Option<&str>,
    ) -> Result<Option<Enquiry>, sqlx::Error> {
        let query = format!(
            "UPDATE enquiries SET
                status = $2,
                visit_date = $3,
                visit_type = $4,
                message = COALESCE($5, message)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Enquiry>(&query)
            .bind(id)
            .bind(EnquiryStatus::Visit.as_str())
            .bind(visit_date)
            .bind(visit_type)
            .bind(message)
            .fetch_optional(pool)
            .await
    }

    /// Count enquiries created in the given UTC calendar month.
    pub async fn count_created_in(
        pool: &PgPool,
        year: i32,
        month: u32,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM enquiries
             WHERE EXTRACT(YEAR FROM created_at AT TIME ZONE 'UTC') = $1
               AND EXTRACT(MONTH FROM created_at AT TIME ZONE 'UTC') = $2",
        )
        .bind(year)
        .bind(month as i32)
        .fetch_one(pool)
        .await
    }

    /// Count enquiries whose visit date falls in the given calendar month.
    pub async fn count_visits_in(
        pool: &PgPool,
        year: i32,
        month: u32,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM enquiries
             WHERE visit_date IS NOT NULL
               AND EXTRACT(YEAR FROM visit_date) = $1
               AND EXTRACT(MONTH FROM visit_date) = $2",
        )
        .bind(year)
        .bind(month as i32)
        .fetch_one(pool)
        .await
    }
}
