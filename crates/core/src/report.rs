//! EVES report arithmetic: month keys and the month-to-intake mapping.
//!
//! EVES = Enquiry / Visit / Enrolment / Starter, counted per calendar month.
//! The counting itself is done in SQL; this module owns parsing the
//! `YYYY-MM` month key and deciding which intake cohort (if any) a month's
//! starters belong to.

use serde::Serialize;

use crate::funnel::Intake;

/// A calendar month in the `YYYY-MM` form the report endpoint accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    /// Parse a `YYYY-MM` string. Returns `None` for anything that is not a
    /// four-digit year, a dash, and a month in 1-12.
    pub fn parse(s: &str) -> Option<Self> {
        let (year, month) = s.split_once('-')?;
        if year.len() != 4 || month.len() != 2 {
            return None;
        }
        let year: i32 = year.parse().ok()?;
        let month: u32 = month.parse().ok()?;
        if !(1..=12).contains(&month) {
            return None;
        }
        Some(Self { year, month })
    }

    /// The intake cohort starting this month, if any.
    pub fn intake(&self) -> Option<Intake> {
        Intake::for_month(self.month)
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// The monthly funnel counts returned by the report endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct EvesReport {
    /// The requested month, `YYYY-MM`.
    pub month: String,
    /// Enquiries created in the month.
    pub enquiries: i64,
    /// Enquiries whose visit_date falls in the month.
    pub visits: i64,
    /// Enrolments created in the month.
    pub enrolments: i64,
    /// Enrolments whose intake cohort starts in the month.
    pub starters: i64,
}
