//! HTTP-level integration tests for the funnel CRUD endpoints and the
//! guided transitions (visit logging, conversion, EVES report).
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router
//! without an actual TCP listener.

mod common;

use axum::http::StatusCode;
use chrono::{Datelike, Utc};
use common::{body_json, delete, get, post_json, put_json};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Lead CRUD
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_create_lead_returns_201(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/leads",
        serde_json::json!({"name": "Alice Zhang", "email": "alice@example.com"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["name"], "Alice Zhang");
    assert_eq!(json["status"], "new");
    assert!(json["id"].is_number());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_create_lead_blank_name_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/v1/leads", serde_json::json!({"name": "   "})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_create_lead_duplicate_email_returns_409(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    post_json(
        app,
        "/api/v1/leads",
        serde_json::json!({"name": "Alice", "email": "dup@example.com"}),
    )
    .await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/leads",
        serde_json::json!({"name": "Other", "email": "dup@example.com"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_get_nonexistent_lead_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/leads/999999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_update_lead_rejects_unknown_status(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let created = body_json(
        post_json(app, "/api/v1/leads", serde_json::json!({"name": "Edit Me"})).await,
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let response = put_json(
        app,
        &format!("/api/v1/leads/{id}"),
        serde_json::json!({"status": "sizzling"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_delete_lead_returns_204(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let created = body_json(
        post_json(app, "/api/v1/leads", serde_json::json!({"name": "Delete Me"})).await,
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = delete(app, &format!("/api/v1/leads/{id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/v1/leads/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Enquiry CRUD + embedded lead
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_enquiry_detail_embeds_lead(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let lead = body_json(
        post_json(app, "/api/v1/leads", serde_json::json!({"name": "Linked"})).await,
    )
    .await;
    let lead_id = lead["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let enquiry = body_json(
        post_json(
            app,
            "/api/v1/enquiries",
            serde_json::json!({"lead_id": lead_id, "subject": "Math Course"}),
        )
        .await,
    )
    .await;
    let id = enquiry["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let json = body_json(get(app, &format!("/api/v1/enquiries/{id}")).await).await;
    assert_eq!(json["subject"], "Math Course");
    assert_eq!(json["status"], "open");
    assert_eq!(json["priority"], "medium");
    assert_eq!(json["lead"]["name"], "Linked");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_orphan_enquiry_has_null_lead(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let enquiry = body_json(
        post_json(
            app,
            "/api/v1/enquiries",
            serde_json::json!({"subject": "No lead"}),
        )
        .await,
    )
    .await;
    let id = enquiry["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let json = body_json(get(app, &format!("/api/v1/enquiries/{id}")).await).await;
    assert!(json["lead"].is_null());
}

// ---------------------------------------------------------------------------
// Visit logging
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_visit_log_on_lead_defaults_to_today(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let lead = body_json(
        post_json(app, "/api/v1/leads", serde_json::json!({"name": "Walker"})).await,
    )
    .await;
    let lead_id = lead["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        &format!("/api/v1/leads/{lead_id}/visits"),
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["status"], "visit");
    assert_eq!(json["visit_type"], "walkin");
    assert_eq!(json["subject"], "Visit from Walker");
    assert_eq!(
        json["visit_date"],
        Utc::now().date_naive().to_string().as_str()
    );
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_visit_log_on_enquiry(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let enquiry = body_json(
        post_json(
            app,
            "/api/v1/enquiries",
            serde_json::json!({"subject": "Campus tour"}),
        )
        .await,
    )
    .await;
    let id = enquiry["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        &format!("/api/v1/enquiries/{id}/visit"),
        serde_json::json!({"visit_date": "2026-08-07", "visit_type": "call", "message": "Phoned in"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "visit");
    assert_eq!(json["visit_date"], "2026-08-07");
    assert_eq!(json["visit_type"], "call");
    assert_eq!(json["message"], "Phoned in");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_visit_log_rejects_unknown_type(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let enquiry = body_json(
        post_json(
            app,
            "/api/v1/enquiries",
            serde_json::json!({"subject": "Bad visit"}),
        )
        .await,
    )
    .await;
    let id = enquiry["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        &format!("/api/v1/enquiries/{id}/visit"),
        serde_json::json!({"visit_type": "video"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Conversion
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_convert_enquiry_to_enrolment(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let lead = body_json(
        post_json(app, "/api/v1/leads", serde_json::json!({"name": "Student"})).await,
    )
    .await;
    let lead_id = lead["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let enquiry = body_json(
        post_json(
            app,
            "/api/v1/enquiries",
            serde_json::json!({"lead_id": lead_id, "subject": "Math Course"}),
        )
        .await,
    )
    .await;
    let enquiry_id = enquiry["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        &format!("/api/v1/enquiries/{enquiry_id}/convert"),
        serde_json::json!({"intake": "May", "amount": 100.0}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let enrolment = body_json(response).await;
    assert_eq!(enrolment["course_name"], "Math Course");
    assert_eq!(enrolment["intake"], "May");
    assert_eq!(enrolment["amount"], 100.0);
    assert_eq!(enrolment["payment_status"], "paid");
    assert_eq!(enrolment["status"], "pending");
    assert_eq!(enrolment["lead_id"], lead_id);

    let app = common::build_test_app(pool);
    let json = body_json(get(app, &format!("/api/v1/enquiries/{enquiry_id}")).await).await;
    assert_eq!(json["status"], "closed");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_convert_missing_enquiry_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/enquiries/999999/convert",
        serde_json::json!({"intake": "February"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// EVES report
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_eves_report_counts(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let enquiry = body_json(
        post_json(
            app,
            "/api/v1/enquiries",
            serde_json::json!({"subject": "Counted"}),
        )
        .await,
    )
    .await;
    let enquiry_id = enquiry["id"].as_i64().unwrap();

    // Log a visit this month and convert to a May enrolment.
    let app = common::build_test_app(pool.clone());
    post_json(
        app,
        &format!("/api/v1/enquiries/{enquiry_id}/visit"),
        serde_json::json!({}),
    )
    .await;
    let app = common::build_test_app(pool.clone());
    post_json(
        app,
        &format!("/api/v1/enquiries/{enquiry_id}/convert"),
        serde_json::json!({"intake": "May"}),
    )
    .await;

    let now = Utc::now();
    let month = format!("{:04}-{:02}", now.year(), now.month());
    let app = common::build_test_app(pool.clone());
    let json = body_json(get(app, &format!("/api/v1/reports/eves?month={month}")).await).await;

    assert_eq!(json["month"], month);
    assert_eq!(json["enquiries"], 1);
    assert_eq!(json["visits"], 1);
    assert_eq!(json["enrolments"], 1);

    // Starters count the May cohort regardless of the queried year.
    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/api/v1/reports/eves?month=2030-05").await).await;
    assert_eq!(json["starters"], 1);
    assert_eq!(json["enrolments"], 0);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_eves_report_rejects_bad_month(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/reports/eves?month=2026-13").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_health_reports_ok(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["db_healthy"], true);
}
