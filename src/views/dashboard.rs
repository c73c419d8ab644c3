// src/views/dashboard.rs
use tracing::info;

use super::AppContext;
use crate::navigation::ViewScope;
use crate::router::Route;
use crate::session::SessionUser;

/// Employer landing page: shortcuts to posting and reviewing, plus logout.
pub struct DashboardView {
    ctx: AppContext,
    scope: ViewScope,
    user: Option<SessionUser>,
}

impl DashboardView {
    pub fn mount(ctx: &AppContext) -> Self {
        Self {
            ctx: ctx.clone(),
            scope: ctx.mount(Route::Dashboard),
            user: ctx.session.current_user(),
        }
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.scope.is_active()
    }

    pub fn post_job(&self) -> ViewScope {
        self.ctx.navigator.push(Route::PostJob)
    }

    pub fn review_applications(&self) -> ViewScope {
        self.ctx.navigator.push(Route::Applications)
    }

    pub fn logout(&self) -> anyhow::Result<()> {
        self.ctx.session.sign_out()?;
        info!("Employer signed out");
        self.ctx.navigator.push(Route::Login);
        Ok(())
    }
}
