// src/views/register.rs
use std::sync::Mutex;
use tracing::{info, warn};

use super::{lock, AppContext};
use crate::core::{Operation, OperationKey};
use crate::error::ClientError;
use crate::navigation::ViewScope;
use crate::router::Route;
use crate::utils::all_filled;

pub const MSG_REQUIRED: &str = "Todos los campos son obligatorios.";
pub const MSG_REJECTED: &str = "No se pudo registrar el usuario";
pub const MSG_FAILED: &str = "Error al registrar. Intenta con otro correo.";
pub const MSG_REGISTERED: &str = "¡Registro exitoso! Ahora puedes iniciar sesión.";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegisterState {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub loading: bool,
    pub error: Option<String>,
    pub success: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RegisterOutcome {
    Registered,
    Invalid(String),
    Failed(String),
    InProgress,
    Cancelled,
}

pub struct RegisterView {
    ctx: AppContext,
    scope: ViewScope,
    state: Mutex<RegisterState>,
}

impl RegisterView {
    pub fn mount(ctx: &AppContext) -> Self {
        Self {
            ctx: ctx.clone(),
            scope: ctx.mount(Route::Register),
            state: Mutex::new(RegisterState::default()),
        }
    }

    pub fn snapshot(&self) -> RegisterState {
        lock(&self.state).clone()
    }

    pub fn set_full_name(&self, full_name: impl Into<String>) {
        lock(&self.state).full_name = full_name.into();
    }

    pub fn set_email(&self, email: impl Into<String>) {
        lock(&self.state).email = email.into();
    }

    pub fn set_password(&self, password: impl Into<String>) {
        lock(&self.state).password = password.into();
    }

    pub async fn submit(&self) -> RegisterOutcome {
        let (full_name, email, password) = {
            let mut state = lock(&self.state);
            if state.loading {
                return RegisterOutcome::InProgress;
            }
            state.error = None;
            state.success = None;
            if !all_filled(&[&state.full_name, &state.email, &state.password]) {
                state.error = Some(MSG_REQUIRED.to_string());
                return RegisterOutcome::Invalid(MSG_REQUIRED.to_string());
            }
            (
                state.full_name.trim().to_string(),
                state.email.trim().to_string(),
                state.password.clone(),
            )
        };

        let Some(_ticket) = self
            .ctx
            .in_flight
            .try_begin(OperationKey::new(Operation::Register, &email))
        else {
            return RegisterOutcome::InProgress;
        };
        lock(&self.state).loading = true;

        let result = self
            .scope
            .run(
                "register",
                self.ctx.api.register(&full_name, &email, &password),
            )
            .await;

        let mut state = lock(&self.state);
        state.loading = false;
        match result {
            Ok(_) => {
                state.success = Some(MSG_REGISTERED.to_string());
                drop(state);

                info!("Registered {}", email);
                self.ctx.navigator.push(Route::Login);
                RegisterOutcome::Registered
            }
            Err(ClientError::Cancelled) => RegisterOutcome::Cancelled,
            Err(e) => {
                warn!("Registration failed for {}: {}", email, e);
                let message = match &e {
                    ClientError::Status { .. } => e.user_message(MSG_REJECTED),
                    _ => MSG_FAILED.to_string(),
                };
                state.error = Some(message.clone());
                RegisterOutcome::Failed(message)
            }
        }
    }
}
