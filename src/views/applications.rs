// src/views/applications.rs
//! Employer board: every application with approve / reject actions.

use std::sync::Mutex;
use tracing::{info, warn};

use super::{lock, AppContext};
use crate::core::{Operation, OperationKey};
use crate::error::ClientError;
use crate::navigation::ViewScope;
use crate::router::Route;
use crate::types::{replace_by_id, Application, ApplicationStatus};

pub const MSG_LOAD_FAILED: &str = "No se pudieron cargar las aplicaciones.";
pub const MSG_UPDATE_FAILED: &str = "No se pudo actualizar el estado.";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplicationsState {
    pub loading: bool,
    pub applications: Vec<Application>,
    pub error: Option<String>,
    pub notice: Option<String>,
}

/// Which action buttons are enabled for one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowActions {
    pub approve: bool,
    pub reject: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatusChange {
    Updated(Application),
    /// The row is already in the requested state, or is unknown.
    Disabled,
    InProgress,
    Failed(String),
    Cancelled,
}

pub struct ApplicationsBoard {
    ctx: AppContext,
    scope: ViewScope,
    state: Mutex<ApplicationsState>,
}

impl ApplicationsBoard {
    pub fn mount(ctx: &AppContext) -> Self {
        Self {
            ctx: ctx.clone(),
            scope: ctx.mount(Route::Applications),
            state: Mutex::new(ApplicationsState {
                loading: true,
                ..ApplicationsState::default()
            }),
        }
    }

    pub fn snapshot(&self) -> ApplicationsState {
        lock(&self.state).clone()
    }

    pub async fn load(&self) {
        let result = self
            .scope
            .run("list_applications", self.ctx.api.list_applications())
            .await;

        let mut state = lock(&self.state);
        match result {
            Ok(applications) => {
                info!("Loaded {} applications", applications.len());
                state.applications = applications;
                state.error = None;
            }
            Err(ClientError::Cancelled) => return,
            Err(e) => {
                warn!("Failed to load applications: {}", e);
                state.error = Some(MSG_LOAD_FAILED.to_string());
            }
        }
        state.loading = false;
    }

    pub fn actions(&self, id: i64) -> RowActions {
        let state = lock(&self.state);
        let Some(current) = state
            .applications
            .iter()
            .find(|a| a.id == id)
            .map(|a| a.status)
        else {
            return RowActions {
                approve: false,
                reject: false,
            };
        };

        let pending = self.ctx.in_flight.is_pending(&Self::key(id));
        RowActions {
            approve: !pending && current.offers(ApplicationStatus::Approved),
            reject: !pending && current.offers(ApplicationStatus::Rejected),
        }
    }

    pub async fn approve(&self, id: i64) -> StatusChange {
        self.change_status(id, ApplicationStatus::Approved).await
    }

    pub async fn reject(&self, id: i64) -> StatusChange {
        self.change_status(id, ApplicationStatus::Rejected).await
    }

    fn key(id: i64) -> OperationKey {
        OperationKey::new(Operation::UpdateApplicationStatus, id)
    }

    async fn change_status(&self, id: i64, target: ApplicationStatus) -> StatusChange {
        let offered = lock(&self.state)
            .applications
            .iter()
            .find(|a| a.id == id)
            .is_some_and(|a| a.status.offers(target));
        if !offered {
            return StatusChange::Disabled;
        }

        let Some(_ticket) = self.ctx.in_flight.try_begin(Self::key(id)) else {
            return StatusChange::InProgress;
        };

        let result = self
            .scope
            .run(
                "update_application_status",
                self.ctx.api.update_application_status(id, target),
            )
            .await;

        let mut state = lock(&self.state);
        match result {
            Ok(updated) => {
                info!("Application {} is now {}", id, updated.status);
                replace_by_id(&mut state.applications, updated.clone());
                state.notice = None;
                StatusChange::Updated(updated)
            }
            Err(ClientError::Cancelled) => StatusChange::Cancelled,
            Err(e) => {
                warn!("Failed to set application {} to {}: {}", id, target, e);
                state.notice = Some(MSG_UPDATE_FAILED.to_string());
                StatusChange::Failed(MSG_UPDATE_FAILED.to_string())
            }
        }
    }
}
