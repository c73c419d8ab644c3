// src/views/profile.rs
use std::sync::Mutex;
use tracing::{info, warn};

use super::{lock, AppContext};
use crate::error::ClientError;
use crate::navigation::ViewScope;
use crate::router::Route;
use crate::session::SessionUser;
use crate::types::Application;

pub const MSG_NO_TOKEN: &str = "No hay token de autenticación.";
pub const MSG_INVALID_TOKEN: &str = "Token inválido.";
pub const MSG_LOAD_FAILED: &str = "No se pudieron cargar las aplicaciones.";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileState {
    pub user: Option<SessionUser>,
    pub applications: Vec<Application>,
    pub loading: bool,
    pub error: Option<String>,
}

pub struct ProfileView {
    ctx: AppContext,
    scope: ViewScope,
    state: Mutex<ProfileState>,
}

impl ProfileView {
    pub fn mount(ctx: &AppContext) -> Self {
        let mut state = ProfileState {
            loading: true,
            ..ProfileState::default()
        };

        if ctx.session.credential().is_none() {
            state.error = Some(MSG_NO_TOKEN.to_string());
        } else {
            match ctx.session.current_user() {
                Some(user) => state.user = Some(user),
                None => state.error = Some(MSG_INVALID_TOKEN.to_string()),
            }
        }

        Self {
            ctx: ctx.clone(),
            scope: ctx.mount(Route::Profile),
            state: Mutex::new(state),
        }
    }

    pub fn snapshot(&self) -> ProfileState {
        lock(&self.state).clone()
    }

    /// Load the signed-in user's applications. Without a user nothing is fetched.
    pub async fn load(&self) {
        let user_id = lock(&self.state).user.as_ref().map(|u| u.id);
        let Some(user_id) = user_id else {
            lock(&self.state).loading = false;
            return;
        };

        let result = self
            .scope
            .run(
                "list_applications_for_user",
                self.ctx.api.list_applications_for_user(user_id),
            )
            .await;

        let mut state = lock(&self.state);
        match result {
            Ok(applications) => state.applications = applications,
            Err(ClientError::Cancelled) => return,
            Err(e) => {
                warn!("Failed to load applications for user {}: {}", user_id, e);
                state.error = Some(MSG_LOAD_FAILED.to_string());
            }
        }
        state.loading = false;
    }

    pub fn logout(&self) -> anyhow::Result<()> {
        self.ctx.session.sign_out()?;
        info!("User signed out from profile");
        self.ctx.navigator.push(Route::Login);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{DEFAULT_USER_EMAIL, DEFAULT_USER_NAME};
    use crate::test_support::{context_for, raw_token};
    use crate::types::ApplicationStatus;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_profile_lists_own_applications() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/aplicaciones/usuario/3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": 1, "status": "approved", "job": { "id": 7, "title": "Cocinero" } }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let ctx = context_for(&server, Some(json!({ "id": 3 })));
        let view = ProfileView::mount(&ctx);
        view.load().await;

        let state = view.snapshot();
        let user = state.user.unwrap();
        assert_eq!(user.name, DEFAULT_USER_NAME);
        assert_eq!(user.email, DEFAULT_USER_EMAIL);
        assert_eq!(state.applications.len(), 1);
        assert_eq!(state.applications[0].status, ApplicationStatus::Approved);
        assert!(!state.loading);
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn test_missing_and_invalid_tokens() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(0)
            .mount(&server)
            .await;

        let ctx = context_for(&server, None);
        let view = ProfileView::mount(&ctx);
        view.load().await;
        let state = view.snapshot();
        assert_eq!(state.error.as_deref(), Some(MSG_NO_TOKEN));
        assert!(!state.loading);

        ctx.session.sign_in(&raw_token("%%%")).unwrap();
        let view = ProfileView::mount(&ctx);
        view.load().await;
        assert_eq!(view.snapshot().error.as_deref(), Some(MSG_INVALID_TOKEN));
    }

    #[tokio::test]
    async fn test_logout_clears_session() {
        let server = MockServer::start().await;
        let ctx = context_for(&server, Some(json!({ "id": 3 })));
        let view = ProfileView::mount(&ctx);

        view.logout().unwrap();
        assert!(!ctx.session.is_authenticated());
        assert_eq!(ctx.navigator.current(), Route::Login);
    }
}
