// src/types/job.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::lenient_datetime;

// ===== Job listings =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobListing {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Path relative to the API origin, e.g. `/uploads/job-7.png`
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub created_at: Option<DateTime<Utc>>,
}

impl JobListing {
    pub fn description_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or(fallback)
    }
}

/// Text fields of the "post a job" form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobForm {
    pub employer_id: String,
    pub title: String,
    pub description: String,
}

/// Binary image attached to a new job.
#[derive(Debug, Clone, PartialEq)]
pub struct JobImage {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}
