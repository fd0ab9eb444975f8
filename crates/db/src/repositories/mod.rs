//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod enquiry_repo;
pub mod enrolment_repo;
pub mod lead_repo;

pub use enquiry_repo::EnquiryRepo;
pub use enrolment_repo::EnrolmentRepo;
pub use lead_repo::LeadRepo;
