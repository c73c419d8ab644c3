// src/utils.rs
use chrono::{DateTime, Datelike, Utc};

use crate::types::JobListing;

const MONTHS_ES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Long Spanish date, e.g. "19 de octubre de 2026"
pub fn format_long_date_es(date: &DateTime<Utc>) -> String {
    format!(
        "{} de {} de {}",
        date.day(),
        MONTHS_ES[date.month0() as usize],
        date.year()
    )
}

/// Optional date, "—" when missing
pub fn format_optional_date_es(date: Option<&DateTime<Utc>>) -> String {
    date.map(format_long_date_es)
        .unwrap_or_else(|| "—".to_string())
}

/// Last `count` jobs of the list, newest first.
pub fn latest_jobs(jobs: &[JobListing], count: usize) -> Vec<JobListing> {
    let start = jobs.len().saturating_sub(count);
    jobs[start..].iter().rev().cloned().collect()
}

/// True when every field has non-whitespace content.
pub fn all_filled(fields: &[&str]) -> bool {
    fields.iter().all(|f| !f.trim().is_empty())
}
