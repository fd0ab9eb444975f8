//! Integration tests for lead resolution and batch import storage.
//!
//! Covers the find-or-create upsert, the resolution plans produced from
//! identity hints, and the chunked multi-row lead insert.

use admissions_core::imports::{normalize_lead_row, LeadImportRow};
use admissions_core::resolution::{plan_resolution, IMPORT_SOURCE};
use admissions_db::models::lead::CreateLead;
use admissions_db::repositories::LeadRepo;
use sqlx::PgPool;

fn import_row(name: Option<&str>, email: Option<&str>) -> LeadImportRow {
    LeadImportRow {
        name: name.map(String::from),
        email: email.map(String::from),
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Upsert / find-or-create
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_upsert_matches_existing_email(pool: PgPool) {
    let existing = LeadRepo::create(
        &pool,
        &CreateLead {
            name: "Alice".to_string(),
            email: Some("alice@example.com".to_string()),
            phone: None,
            company: None,
            source: None,
            status: None,
            notes: None,
        },
    )
    .await
    .unwrap();

    let resolved = LeadRepo::upsert_by_email(&pool, "alice@example.com", "Someone Else")
        .await
        .unwrap();

    // Resolves to the existing lead; the stored name is untouched.
    assert_eq!(resolved.id, existing.id);
    assert_eq!(resolved.name, "Alice");
    assert_eq!(LeadRepo::list(&pool).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_upsert_creates_when_no_match(pool: PgPool) {
    let lead = LeadRepo::upsert_by_email(&pool, "b@x.com", "b").await.unwrap();

    assert_eq!(lead.name, "b");
    assert_eq!(lead.email.as_deref(), Some("b@x.com"));
    assert_eq!(lead.source.as_deref(), Some(IMPORT_SOURCE));
    assert_eq!(lead.status, "new");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_upsert_is_idempotent(pool: PgPool) {
    let first = LeadRepo::upsert_by_email(&pool, "same@x.com", "Same").await.unwrap();
    let second = LeadRepo::upsert_by_email(&pool, "same@x.com", "Same").await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(LeadRepo::list(&pool).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_upsert_email_match_is_case_sensitive(pool: PgPool) {
    let lower = LeadRepo::upsert_by_email(&pool, "case@x.com", "Lower").await.unwrap();
    let upper = LeadRepo::upsert_by_email(&pool, "Case@x.com", "Upper").await.unwrap();

    // Byte-exact matching: different casing means a different lead.
    assert_ne!(lower.id, upper.id);
}

// ---------------------------------------------------------------------------
// Resolution plans
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_resolve_email_hint_links_existing_lead(pool: PgPool) {
    let existing = LeadRepo::upsert_by_email(&pool, "known@x.com", "Known").await.unwrap();

    let plan = plan_resolution(Some("known@x.com"), Some("Ignored Name"));
    let resolved = LeadRepo::resolve(&pool, &plan).await.unwrap();

    assert_eq!(resolved, Some(existing.id));
    assert_eq!(LeadRepo::list(&pool).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_resolve_unmatched_email_derives_name_from_local_part(pool: PgPool) {
    let plan = plan_resolution(Some("charlie.w@uni.edu"), None);
    let id = LeadRepo::resolve(&pool, &plan).await.unwrap().unwrap();

    let lead = LeadRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(lead.name, "charlie.w");
    assert_eq!(lead.source.as_deref(), Some(IMPORT_SOURCE));
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_resolve_name_only_always_creates_new_lead(pool: PgPool) {
    let plan = plan_resolution(None, Some("John Smith"));
    let first = LeadRepo::resolve(&pool, &plan).await.unwrap().unwrap();
    let second = LeadRepo::resolve(&pool, &plan).await.unwrap().unwrap();

    // Deliberate duplication: name-only rows never dedup.
    assert_ne!(first, second);
    assert_eq!(LeadRepo::list(&pool).await.unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_resolve_no_identity_skips(pool: PgPool) {
    let plan = plan_resolution(None, None);
    let resolved = LeadRepo::resolve(&pool, &plan).await.unwrap();

    assert_eq!(resolved, None);
    assert!(LeadRepo::list(&pool).await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Chunked lead insert
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_insert_chunk_inserts_all_rows(pool: PgPool) {
    let rows: Vec<_> = (0..5)
        .map(|i| {
            normalize_lead_row(&import_row(
                Some(&format!("Lead {i}")),
                Some(&format!("lead{i}@x.com")),
            ))
            .unwrap()
        })
        .collect();

    let inserted = LeadRepo::insert_chunk(&pool, &rows).await.unwrap();
    assert_eq!(inserted, 5);
    assert_eq!(LeadRepo::list(&pool).await.unwrap().len(), 5);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_insert_chunk_empty_is_noop(pool: PgPool) {
    let inserted = LeadRepo::insert_chunk(&pool, &[]).await.unwrap();
    assert_eq!(inserted, 0);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_insert_chunk_fails_as_a_unit_on_duplicate(pool: PgPool) {
    LeadRepo::upsert_by_email(&pool, "taken@x.com", "Taken").await.unwrap();

    let rows = vec![
        normalize_lead_row(&import_row(Some("Fresh"), Some("fresh@x.com"))).unwrap(),
        normalize_lead_row(&import_row(Some("Clash"), Some("taken@x.com"))).unwrap(),
    ];

    // One multi-row INSERT: the duplicate poisons the whole chunk.
    assert!(LeadRepo::insert_chunk(&pool, &rows).await.is_err());
    assert_eq!(LeadRepo::list(&pool).await.unwrap().len(), 1);
}
