// src/types/mod.rs
//! Entities exchanged with the EmpleosNG API

pub mod application;
pub mod auth;
pub mod job;
pub mod response;

pub use application::{replace_by_id, Application, ApplicationStatus, JobSummary, WorkerSummary};
pub use auth::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
pub use job::{JobForm, JobImage, JobListing};
pub use response::{CheckAppliedResponse, MessageBody};

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};
use tracing::debug;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Display-only timestamps: RFC 3339, or a zone-less value read as UTC.
/// Anything else becomes `None` instead of failing the whole entity.
pub(crate) fn lenient_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    let Some(text) = raw.as_ref().and_then(serde_json::Value::as_str) else {
        return Ok(None);
    };

    if let Ok(date) = DateTime::parse_from_rfc3339(text) {
        return Ok(Some(date.with_timezone(&Utc)));
    }
    let parsed = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|naive| naive.and_utc());
    if parsed.is_none() {
        debug!("Ignoring unreadable timestamp: {}", text);
    }
    Ok(parsed)
}
