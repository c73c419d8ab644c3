// src/types/response.rs
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateApplicationRequest {
    pub job_id: i64,
    pub worker_id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct StatusUpdateRequest {
    pub status: super::ApplicationStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckAppliedResponse {
    #[serde(default)]
    pub aplicado: bool,
}

/// Error or notice body: `{"message": "..."}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageBody {
    #[serde(default)]
    pub message: Option<String>,
}
