//! Repository for the `enrolments` table.

use admissions_core::funnel::{conversion_notes, EnquiryStatus, EnrolmentStatus, PaymentStatus};
use admissions_core::types::DbId;
use sqlx::PgPool;

use crate::models::enquiry::Enquiry;
use crate::models::enrolment::{ConvertEnquiry, CreateEnrolment, Enrolment, UpdateEnrolment};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, lead_id, course_name, course_date, amount, status, \
    payment_status, intake, notes, created_at, updated_at";

/// Provides CRUD, conversion, and report-count operations for enrolments.
pub struct EnrolmentRepo;

impl EnrolmentRepo {
    /// Insert a new enrolment, returning the created row.
    ///
    /// If `status` is `None`, defaults to `'pending'`; `payment_status` to
    /// `'unpaid'`.
    pub async fn create(pool: &PgPool, input: &CreateEnrolment) -> Result<Enrolment, sqlx::Error> {
        let query = format!(
            "INSERT INTO enrolments
                (lead_id, course_name, course_date, amount, status, payment_status, intake, notes)
             VALUES ($1, $2, $3, $4, COALESCE($5, 'pending'), COALESCE($6, 'unpaid'), $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Enrolment>(&query)
            .bind(input.lead_id)
            .bind(&input.course_name)
            .bind(input.course_date)
            .bind(input.amount)
            .bind(&input.status)
            .bind(&input.payment_status)
            .bind(input.intake.map(|i| i.as_str()))
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// Find an enrolment by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Enrolment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM enrolments WHERE id = $1");
        sqlx::query_as::<_, Enrolment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all enrolments, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Enrolment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM enrolments ORDER BY created_at DESC");
        sqlx::query_as::<_, Enrolment>(&query).fetch_all(pool).await
    }

    /// Update an enrolment. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateEnrolment,
    ) -> Result<Option<Enrolment>, sqlx::Error> {
        let query = format!(
            "UPDATE enrolments SET
                lead_id = COALESCE($2, lead_id),
                course_name = COALESCE($3, course_name),
                course_date = COALESCE($4, course_date),
                amount = COALESCE($5, amount),
                status = COALESCE($6, status),
                payment_status = COALESCE($7, payment_status),
                intake = COALESCE($8, intake),
                notes = COALESCE($9, notes)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Enrolment>(&query)
            .bind(id)
            .bind(input.lead_id)
            .bind(&input.course_name)
            .bind(input.course_date)
            .bind(input.amount)
            .bind(&input.status)
            .bind(&input.payment_status)
            .bind(input.intake.map(|i| i.as_str()))
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    /// Delete an enrolment by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM enrolments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Convert an enquiry into an enrolment.
    ///
    /// One transaction, two effects: insert the enrolment (course name
    /// defaulted from the enquiry's subject, payment recorded as paid,
    /// notes back-referencing the source enquiry) and close the enquiry.
    /// Either both commit or neither does.
    pub async fn convert_from_enquiry(
        pool: &PgPool,
        enquiry: &Enquiry,
        input: &ConvertEnquiry,
    ) -> Result<Enrolment, sqlx::Error> {
        let course_name = input
            .course_name
            .clone()
            .unwrap_or_else(|| enquiry.subject.clone());

        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO enrolments
                (lead_id, course_name, amount, status, payment_status, intake, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        let enrolment = sqlx::query_as::<_, Enrolment>(&query)
            .bind(enquiry.lead_id)
            .bind(&course_name)
            .bind(input.amount.unwrap_or(0.0))
            .bind(EnrolmentStatus::Pending.as_str())
            .bind(PaymentStatus::Paid.as_str())
            .bind(input.intake.as_str())
            .bind(conversion_notes(enquiry.id, &enquiry.subject))
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("UPDATE enquiries SET status = $2 WHERE id = $1")
            .bind(enquiry.id)
            .bind(EnquiryStatus::Closed.as_str())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(
            enquiry_id = enquiry.id,
            enrolment_id = enrolment.id,
            intake = %input.intake,
            "Enquiry converted to enrolment",
        );

        Ok(enrolment)
    }

    /// Count enrolments created in the given UTC calendar month.
    pub async fn count_created_in(
        pool: &PgPool,
        year: i32,
        month: u32,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM enrolments
             WHERE EXTRACT(YEAR FROM created_at AT TIME ZONE 'UTC') = $1
               AND EXTRACT(MONTH FROM created_at AT TIME ZONE 'UTC') = $2",
        )
        .bind(year)
        .bind(month as i32)
        .fetch_one(pool)
        .await
    }

    /// Count enrolments in the given intake cohort, across all years.
    pub async fn count_starters(pool: &PgPool, intake: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM enrolments WHERE intake = $1")
            .bind(intake)
            .fetch_one(pool)
            .await
    }
}
