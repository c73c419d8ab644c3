// src/views/job_details.rs
use std::sync::Mutex;
use tracing::{info, warn};

use super::{lock, AppContext};
use crate::core::{Operation, OperationKey};
use crate::error::ClientError;
use crate::navigation::ViewScope;
use crate::router::Route;
use crate::types::{Application, JobListing};

pub const MSG_LOAD_FAILED: &str = "No se pudo cargar el trabajo.";
pub const MSG_ALREADY_APPLIED: &str = "Ya aplicaste a este trabajo.";
pub const MSG_APPLIED: &str = "¡Aplicaste con éxito! Redirigiendo al perfil...";
pub const MSG_APPLY_FAILED: &str = "Error al aplicar.";
pub const MSG_SIGN_IN_TO_APPLY: &str = "Inicia sesión para aplicar.";
pub const MSG_UNAVAILABLE: &str = "Trabajo no disponible.";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobDetailsState {
    pub loading: bool,
    pub job: Option<JobListing>,
    pub worker_id: Option<i64>,
    pub applying: bool,
    pub has_applied: bool,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApplyOutcome {
    Applied(Application),
    AlreadyApplied,
    /// An identical apply is still pending; nothing was sent.
    InProgress,
    NotSignedIn,
    /// The job is still loading or failed to load; nothing was sent.
    Unavailable,
    Failed(String),
    Cancelled,
}

pub struct JobDetailsView {
    ctx: AppContext,
    scope: ViewScope,
    job_id: i64,
    state: Mutex<JobDetailsState>,
}

impl JobDetailsView {
    pub fn mount(ctx: &AppContext, job_id: i64) -> Self {
        let scope = ctx.mount(Route::JobDetails { id: job_id });
        let worker_id = ctx.session.claims().and_then(|c| c.id);

        Self {
            ctx: ctx.clone(),
            scope,
            job_id,
            state: Mutex::new(JobDetailsState {
                loading: true,
                worker_id,
                ..JobDetailsState::default()
            }),
        }
    }

    pub fn job_id(&self) -> i64 {
        self.job_id
    }

    pub fn snapshot(&self) -> JobDetailsState {
        lock(&self.state).clone()
    }

    /// Whether the apply control is enabled.
    pub fn can_apply(&self) -> bool {
        let state = lock(&self.state);
        !state.loading
            && state.job.is_some()
            && !state.applying
            && !state.has_applied
            && state.worker_id.is_some()
    }

    /// Load the job and, once a worker id is known, whether they already applied.
    pub async fn load(&self) {
        tokio::join!(self.load_job(), self.check_applied());
    }

    async fn load_job(&self) {
        let result = self
            .scope
            .run("get_job", self.ctx.api.get_job(self.job_id))
            .await;

        let mut state = lock(&self.state);
        match result {
            Ok(job) => state.job = Some(job),
            Err(ClientError::Cancelled) => return,
            Err(e) => {
                warn!("Failed to load job {}: {}", self.job_id, e);
                state.message = Some(MSG_LOAD_FAILED.to_string());
            }
        }
        state.loading = false;
    }

    /// Ask the API whether the signed-in worker already applied. Skipped
    /// entirely without a worker id.
    pub async fn check_applied(&self) -> bool {
        let Some(worker_id) = lock(&self.state).worker_id else {
            return false;
        };

        let result = self
            .scope
            .run(
                "check_applied",
                self.ctx.api.check_applied(self.job_id, worker_id),
            )
            .await;

        match result {
            Ok(true) => {
                let mut state = lock(&self.state);
                state.has_applied = true;
                state.message = Some(MSG_ALREADY_APPLIED.to_string());
                true
            }
            Ok(false) => false,
            Err(ClientError::Cancelled) => false,
            Err(e) => {
                warn!("Failed to check previous application: {}", e);
                false
            }
        }
    }

    pub async fn apply(&self) -> ApplyOutcome {
        let worker_id = {
            let mut state = lock(&self.state);
            if state.has_applied {
                state.message = Some(MSG_ALREADY_APPLIED.to_string());
                return ApplyOutcome::AlreadyApplied;
            }
            if state.applying {
                return ApplyOutcome::InProgress;
            }
            if state.loading || state.job.is_none() {
                if !state.loading {
                    state.message = Some(MSG_UNAVAILABLE.to_string());
                }
                return ApplyOutcome::Unavailable;
            }
            match state.worker_id {
                Some(id) => id,
                None => {
                    state.message = Some(MSG_SIGN_IN_TO_APPLY.to_string());
                    return ApplyOutcome::NotSignedIn;
                }
            }
        };

        let key = OperationKey::new(
            Operation::CreateApplication,
            format!("{}:{}", self.job_id, worker_id),
        );
        let Some(_ticket) = self.ctx.in_flight.try_begin(key) else {
            return ApplyOutcome::InProgress;
        };

        {
            let mut state = lock(&self.state);
            state.applying = true;
            state.message = None;
        }

        let result = self
            .scope
            .run(
                "create_application",
                self.ctx.api.create_application(self.job_id, worker_id),
            )
            .await;

        let mut state = lock(&self.state);
        state.applying = false;
        match result {
            Ok(application) => {
                state.has_applied = true;
                state.message = Some(MSG_APPLIED.to_string());
                drop(state);

                info!(
                    "Worker {} applied to job {} (application {})",
                    worker_id, self.job_id, application.id
                );
                self.ctx.navigator.push(Route::Profile);
                ApplyOutcome::Applied(application)
            }
            Err(ClientError::Cancelled) => ApplyOutcome::Cancelled,
            Err(e) => {
                warn!("Failed to apply to job {}: {}", self.job_id, e);
                let message = e.user_message(MSG_APPLY_FAILED);
                state.message = Some(message.clone());
                ApplyOutcome::Failed(message)
            }
        }
    }
}
