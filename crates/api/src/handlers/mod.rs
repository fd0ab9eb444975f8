//! HTTP handlers, one module per resource.

pub mod enquiry;
pub mod enrolment;
pub mod importer;
pub mod lead;
pub mod report;
pub mod whatsapp;
