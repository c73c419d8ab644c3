// src/views/login.rs
use std::sync::Mutex;
use tracing::{info, warn};

use super::{lock, AppContext};
use crate::core::{Operation, OperationKey};
use crate::error::ClientError;
use crate::navigation::ViewScope;
use crate::router::{route_for_claims, Route, RouteDecision};
use crate::token::decode_claims;

pub const MSG_INVALID_ROLE: &str = "Rol de usuario no válido";
pub const MSG_BAD_CREDENTIALS: &str = "Correo o contraseña incorrectos";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginState {
    pub email: String,
    pub password: String,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    SignedIn(Route),
    InvalidRole,
    Failed(String),
    InProgress,
    Cancelled,
}

pub struct LoginView {
    ctx: AppContext,
    scope: ViewScope,
    state: Mutex<LoginState>,
}

impl LoginView {
    pub fn mount(ctx: &AppContext) -> Self {
        Self {
            ctx: ctx.clone(),
            scope: ctx.mount(Route::Login),
            state: Mutex::new(LoginState::default()),
        }
    }

    pub fn snapshot(&self) -> LoginState {
        lock(&self.state).clone()
    }

    pub fn set_email(&self, email: impl Into<String>) {
        lock(&self.state).email = email.into();
    }

    pub fn set_password(&self, password: impl Into<String>) {
        lock(&self.state).password = password.into();
    }

    /// Exchange credentials for a token, store it and route by role.
    pub async fn submit(&self) -> LoginOutcome {
        let (email, password) = {
            let state = lock(&self.state);
            if state.loading {
                return LoginOutcome::InProgress;
            }
            (state.email.trim().to_string(), state.password.clone())
        };

        let Some(_ticket) = self
            .ctx
            .in_flight
            .try_begin(OperationKey::new(Operation::Login, &email))
        else {
            return LoginOutcome::InProgress;
        };

        {
            let mut state = lock(&self.state);
            state.loading = true;
            state.error = None;
        }

        let result = self
            .scope
            .run("login", self.ctx.api.login(&email, &password))
            .await;

        let response = match result {
            Ok(response) => response,
            Err(ClientError::Cancelled) => {
                lock(&self.state).loading = false;
                return LoginOutcome::Cancelled;
            }
            Err(e) => {
                warn!("Login failed for {}: {}", email, e);
                return self.fail(MSG_BAD_CREDENTIALS);
            }
        };

        let claims = match response.token.as_deref() {
            Some(token) => {
                if let Err(e) = self.ctx.session.sign_in(token) {
                    warn!("Could not persist session: {:#}", e);
                    return self.fail(MSG_BAD_CREDENTIALS);
                }
                decode_claims(token)
            }
            None => None,
        };

        // a token without readable claims has no role either
        let decision = match claims.as_ref() {
            Some(claims) => route_for_claims(Some(claims)),
            None => RouteDecision::InvalidRole,
        };

        match decision {
            RouteDecision::Navigate(route) => {
                lock(&self.state).loading = false;
                info!("Signed in {} -> {}", email, route);
                self.ctx.navigator.push(route.clone());
                LoginOutcome::SignedIn(route)
            }
            RouteDecision::InvalidRole => {
                warn!("Signed-in user {} has no known role", email);
                self.fail(MSG_INVALID_ROLE);
                LoginOutcome::InvalidRole
            }
        }
    }

    fn fail(&self, message: &str) -> LoginOutcome {
        let mut state = lock(&self.state);
        state.loading = false;
        state.error = Some(message.to_string());
        LoginOutcome::Failed(message.to_string())
    }
}
