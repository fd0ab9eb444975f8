//! Repository for the `leads` table.

use admissions_core::funnel::LeadStatus;
use admissions_core::imports::NormalizedLead;
use admissions_core::resolution::{ResolutionPlan, IMPORT_SOURCE};
use admissions_core::types::DbId;
use sqlx::{PgPool, QueryBuilder};

use crate::models::lead::{CreateLead, Lead, UpdateLead};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, name, email, phone, company, source, status, notes, created_at, updated_at";

/// Provides CRUD and resolution operations for leads.
pub struct LeadRepo;

impl LeadRepo {
    /// Insert a new lead, returning the created row.
    ///
    /// If `status` is `None`, defaults to `'new'`.
    pub async fn create(pool: &PgPool, input: &CreateLead) -> Result<Lead, sqlx::Error> {
        let query = format!(
            "INSERT INTO leads (name, email, phone, company, source, status, notes)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, 'new'), $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lead>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.company)
            .bind(&input.source)
            .bind(&input.status)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// Find a lead by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Lead>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM leads WHERE id = $1");
        sqlx::query_as::<_, Lead>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a lead by exact email match. Matching is byte-exact; no case
    /// folding is applied.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Lead>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM leads WHERE email = $1");
        sqlx::query_as::<_, Lead>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// List all leads, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Lead>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM leads ORDER BY created_at DESC");
        sqlx::query_as::<_, Lead>(&query).fetch_all(pool).await
    }

    /// Update a lead. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateLead,
    ) -> Result<Option<Lead>, sqlx::Error> {
        let query = format!(
            "UPDATE leads SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                company = COALESCE($5, company),
                source = COALESCE($6, source),
                status = COALESCE($7, status),
                notes = COALESCE($8, notes)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lead>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.company)
            .bind(&input.source)
            .bind(&input.status)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    /// Delete a lead by ID. Dependent enquiries and enrolments cascade.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM leads WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Idempotent find-or-create keyed by exact email.
    ///
    /// A single `INSERT .. ON CONFLICT` against the `uq_leads_email` partial
    /// index, so two concurrent imports of the same email resolve to the
    /// same lead. On conflict the existing row is returned untouched apart
    /// from its `updated_at` bump; the stored name is never overwritten.
    pub async fn upsert_by_email(
        pool: &PgPool,
        email: &str,
        name: &str,
    ) -> Result<Lead, sqlx::Error> {
        let query = format!(
            "INSERT INTO leads (name, email, source, status)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (email) WHERE email IS NOT NULL
             DO UPDATE SET email = EXCLUDED.email
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lead>(&query)
            .bind(name)
            .bind(email)
            .bind(IMPORT_SOURCE)
            .bind(LeadStatus::New.as_str())
            .fetch_one(pool)
            .await
    }

    /// Execute a [`ResolutionPlan`] produced from one import row's identity
    /// hints. Returns the resolved lead id, or `None` for `Skip`.
    pub async fn resolve(
        pool: &PgPool,
        plan: &ResolutionPlan,
    ) -> Result<Option<DbId>, sqlx::Error> {
        match plan {
            ResolutionPlan::UpsertByEmail { email, name } => {
                let lead = Self::upsert_by_email(pool, email, name).await?;
                Ok(Some(lead.id))
            }
            // Name-only rows always create a fresh lead; see
            // `admissions_core::resolution`.
            ResolutionPlan::CreateByName { name } => {
                let lead = Self::create(
                    pool,
                    &CreateLead {
                        name: name.clone(),
                        email: None,
                        phone: None,
                        company: None,
                        source: Some(IMPORT_SOURCE.to_string()),
                        status: None,
                        notes: None,
                    },
                )
                .await?;
                Ok(Some(lead.id))
            }
            ResolutionPlan::Skip => Ok(None),
        }
    }

    /// Insert one chunk of validated import rows with a single multi-row
    /// INSERT. Returns the number of rows inserted; a failure fails the
    /// whole chunk.
    pub async fn insert_chunk(
        pool: &PgPool,
        leads: &[NormalizedLead],
    ) -> Result<u64, sqlx::Error> {
        if leads.is_empty() {
            return Ok(0);
        }

        let mut builder = QueryBuilder::new(
            "INSERT INTO leads (name, email, phone, company, source, status, notes) ",
        );
        builder.push_values(leads, |mut row, lead| {
            row.push_bind(&lead.name)
                .push_bind(&lead.email)
                .push_bind(&lead.phone)
                .push_bind(&lead.company)
                .push_bind(&lead.source)
                .push_bind(lead.status.as_str())
                .push_bind(&lead.notes);
        });

        let result = builder.build().execute(pool).await?;
        Ok(result.rows_affected())
    }
}
