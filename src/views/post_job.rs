// src/views/post_job.rs
//! Employer form for publishing a job, with an optional image.

use std::path::Path;
use std::sync::Mutex;
use tracing::{info, warn};

use super::{lock, AppContext};
use crate::core::{Operation, OperationKey};
use crate::error::ClientError;
use crate::image_validator::{load_job_image, ImageErrorType, ImageValidationError};
use crate::navigation::ViewScope;
use crate::router::Route;
use crate::types::{JobForm, JobImage, JobListing};
use crate::utils::all_filled;

pub const MSG_CREATED: &str = "✅ Trabajo creado exitosamente";
pub const MSG_CREATE_FAILED: &str = "❌ No se pudo crear el trabajo";
pub const MSG_INVALID_TOKEN: &str = "Token inválido";
pub const MSG_REQUIRED: &str = "Todos los campos son obligatorios.";

/// Form message for a rejected image.
pub fn image_error_message(error_type: ImageErrorType) -> &'static str {
    match error_type {
        ImageErrorType::FileNotFound => "No se encontró la imagen.",
        ImageErrorType::UnreadableFile => "No se pudo leer la imagen.",
        ImageErrorType::EmptyFile => "La imagen está vacía.",
        ImageErrorType::TooLarge => "La imagen supera el tamaño máximo de 10MB.",
        ImageErrorType::WrongFormat => "Formato de imagen no soportado. Usa PNG, JPEG, GIF o WebP.",
        ImageErrorType::CorruptedFile => "La imagen está dañada o no coincide con su extensión.",
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostJobState {
    pub form: JobForm,
    pub image: Option<JobImage>,
    pub submitting: bool,
    pub success: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PostJobOutcome {
    Created(JobListing),
    Invalid(String),
    InProgress,
    Failed(String),
    Cancelled,
}

pub struct PostJobView {
    ctx: AppContext,
    scope: ViewScope,
    state: Mutex<PostJobState>,
}

impl PostJobView {
    pub fn mount(ctx: &AppContext) -> Self {
        let mut state = PostJobState::default();

        if ctx.session.is_authenticated() {
            match ctx.session.claims() {
                Some(claims) => {
                    state.form.employer_id = claims.id.map(|id| id.to_string()).unwrap_or_default();
                }
                None => state.error = Some(MSG_INVALID_TOKEN.to_string()),
            }
        }

        Self {
            ctx: ctx.clone(),
            scope: ctx.mount(Route::PostJob),
            state: Mutex::new(state),
        }
    }

    pub fn snapshot(&self) -> PostJobState {
        lock(&self.state).clone()
    }

    pub fn set_title(&self, title: impl Into<String>) {
        lock(&self.state).form.title = title.into();
    }

    pub fn set_description(&self, description: impl Into<String>) {
        lock(&self.state).form.description = description.into();
    }

    /// Read and validate an image file, replacing any previous attachment.
    pub async fn attach_image(&self, path: &Path) -> Result<(), ImageValidationError> {
        match load_job_image(path).await {
            Ok(image) => {
                lock(&self.state).image = Some(image);
                Ok(())
            }
            Err(e) => {
                warn!("Rejected job image {}: {}", e.path.display(), e.message);
                lock(&self.state).error = Some(image_error_message(e.error_type).to_string());
                Err(e)
            }
        }
    }

    pub fn clear_image(&self) {
        lock(&self.state).image = None;
    }

    pub async fn submit(&self) -> PostJobOutcome {
        let (form, image) = {
            let mut state = lock(&self.state);
            if state.submitting {
                return PostJobOutcome::InProgress;
            }
            if !all_filled(&[&state.form.title, &state.form.description]) {
                state.error = Some(MSG_REQUIRED.to_string());
                return PostJobOutcome::Invalid(MSG_REQUIRED.to_string());
            }
            (state.form.clone(), state.image.clone())
        };

        let key = OperationKey::new(Operation::CreateJob, &form.employer_id);
        let Some(_ticket) = self.ctx.in_flight.try_begin(key) else {
            return PostJobOutcome::InProgress;
        };

        {
            let mut state = lock(&self.state);
            state.submitting = true;
            state.success = None;
            state.error = None;
        }

        let result = self
            .scope
            .run("create_job", self.ctx.api.create_job(&form, image))
            .await;

        let mut state = lock(&self.state);
        state.submitting = false;
        match result {
            Ok(job) => {
                info!("Job {} '{}' published", job.id, job.title);
                state.success = Some(MSG_CREATED.to_string());
                state.form.title.clear();
                state.form.description.clear();
                state.image = None;
                drop(state);

                self.ctx.navigator.push(Route::Dashboard);
                PostJobOutcome::Created(job)
            }
            Err(ClientError::Cancelled) => PostJobOutcome::Cancelled,
            Err(e) => {
                warn!("Failed to publish job: {}", e);
                state.error = Some(MSG_CREATE_FAILED.to_string());
                PostJobOutcome::Failed(MSG_CREATE_FAILED.to_string())
            }
        }
    }
}
