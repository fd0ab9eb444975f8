//! Route definitions for the `/api/v1` tree.

pub mod health;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{enquiry, enrolment, importer, lead, report, whatsapp};
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// GET    /leads                     list
/// POST   /leads                     create
/// POST   /leads/import              batch import
/// GET    /leads/{id}                get
/// PUT    /leads/{id}                update
/// DELETE /leads/{id}                delete (cascades)
/// POST   /leads/{id}/visits         log a visit (creates an enquiry)
///
/// GET    /enquiries                 list
/// POST   /enquiries                 create
/// POST   /enquiries/import          batch import with lead resolution
/// GET    /enquiries/{id}            get (embeds lead)
/// PUT    /enquiries/{id}            update
/// DELETE /enquiries/{id}            delete
/// POST   /enquiries/{id}/visit      log a visit (status -> visit)
/// POST   /enquiries/{id}/convert    convert to enrolment, close enquiry
///
/// GET    /enrolments                list
/// POST   /enrolments                create
/// GET    /enrolments/{id}           get
/// PUT    /enrolments/{id}           update
/// DELETE /enrolments/{id}           delete
///
/// GET    /reports/eves              EVES monthly funnel report
///
/// GET    /webhooks/whatsapp         verification handshake
/// POST   /webhooks/whatsapp         inbound message -> enquiry
/// ```
pub fn api_routes() -> Router<AppState> {
    let lead_routes = Router::new()
        .route("/", get(lead::list).post(lead::create))
        .route("/import", post(importer::import_leads))
        .route(
            "/{id}",
            get(lead::get_by_id).put(lead::update).delete(lead::delete),
        )
        .route("/{id}/visits", post(lead::log_visit));

    let enquiry_routes = Router::new()
        .route("/", get(enquiry::list).post(enquiry::create))
        .route("/import", post(importer::import_enquiries))
        .route(
            "/{id}",
            get(enquiry::get_by_id)
                .put(enquiry::update)
                .delete(enquiry::delete),
        )
        .route("/{id}/visit", post(enquiry::log_visit))
        .route("/{id}/convert", post(enquiry::convert));

    let enrolment_routes = Router::new()
        .route("/", get(enrolment::list).post(enrolment::create))
        .route(
            "/{id}",
            get(enrolment::get_by_id)
                .put(enrolment::update)
                .delete(enrolment::delete),
        );

    Router::new()
        .nest("/leads", lead_routes)
        .nest("/enquiries", enquiry_routes)
        .nest("/enrolments", enrolment_routes)
        .route("/reports/eves", get(report::eves))
        .route(
            "/webhooks/whatsapp",
            get(whatsapp::verify).post(whatsapp::receive),
        )
}
