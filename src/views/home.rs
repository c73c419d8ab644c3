// src/views/home.rs
use std::sync::Mutex;

use super::{lock, AppContext};
use crate::error::ClientError;
use crate::navigation::ViewScope;
use crate::router::Route;
use crate::session::AuthCheck;
use crate::types::JobListing;
use crate::utils::latest_jobs;

pub const LATEST_JOBS: usize = 3;
pub const MSG_NO_JOBS: &str = "No hay trabajos disponibles.";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HomeState {
    pub auth: AuthCheck,
    pub jobs: Vec<JobListing>,
    pub loaded: bool,
}

impl HomeState {
    pub fn empty_message(&self) -> Option<&'static str> {
        (self.loaded && self.jobs.is_empty()).then_some(MSG_NO_JOBS)
    }
}

/// Landing page: newest jobs and a sign-in or profile entry point.
pub struct HomeView {
    ctx: AppContext,
    scope: ViewScope,
    state: Mutex<HomeState>,
}

impl HomeView {
    pub fn mount(ctx: &AppContext, route: Route) -> Self {
        Self {
            ctx: ctx.clone(),
            scope: ctx.mount(route),
            state: Mutex::new(HomeState::default()),
        }
    }

    pub fn snapshot(&self) -> HomeState {
        lock(&self.state).clone()
    }

    /// Settle the auth flag. Only the first call per mount reads the store.
    pub fn check_auth(&self) {
        lock(&self.state).auth.complete(&self.ctx.session);
    }

    pub async fn load(&self) {
        let api = &self.ctx.api;
        let result = self
            .scope
            .run("list_jobs", async { Ok::<_, ClientError>(api.list_jobs().await) })
            .await;

        if let Ok(jobs) = result {
            let mut state = lock(&self.state);
            state.jobs = latest_jobs(&jobs, LATEST_JOBS);
            state.loaded = true;
        }
    }

    /// Destination of the header button.
    pub fn account_route(&self) -> Route {
        if lock(&self.state).auth.is_authenticated() {
            Route::Profile
        } else {
            Route::Login
        }
    }
}
