//! Domain logic for the admissions funnel.
//!
//! This crate has zero I/O: no database, no async, no HTTP. It holds the
//! status vocabularies, the lead-resolution rules, the batch-import row
//! accounting, and the EVES report arithmetic. The `db` and `api` crates
//! supply storage and transport around it.

pub mod error;
pub mod funnel;
pub mod imports;
pub mod report;
pub mod resolution;
pub mod types;
