// src/views/job_board.rs
use std::sync::Mutex;

use super::{lock, AppContext};
use crate::error::ClientError;
use crate::navigation::ViewScope;
use crate::router::Route;
use crate::session::SessionUser;
use crate::types::JobListing;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobBoardState {
    pub loading: bool,
    pub jobs: Vec<JobListing>,
    pub user: Option<SessionUser>,
}

pub struct JobBoardView {
    ctx: AppContext,
    scope: ViewScope,
    state: Mutex<JobBoardState>,
}

impl JobBoardView {
    pub fn mount(ctx: &AppContext) -> Self {
        Self {
            ctx: ctx.clone(),
            scope: ctx.mount(Route::JobBoard),
            state: Mutex::new(JobBoardState {
                loading: true,
                jobs: Vec::new(),
                user: ctx.session.current_user(),
            }),
        }
    }

    pub fn snapshot(&self) -> JobBoardState {
        lock(&self.state).clone()
    }

    pub async fn load(&self) {
        let api = &self.ctx.api;
        let result = self
            .scope
            .run("list_jobs", async { Ok::<_, ClientError>(api.list_jobs().await) })
            .await;

        if let Ok(jobs) = result {
            let mut state = lock(&self.state);
            state.jobs = jobs;
            state.loading = false;
        }
    }

    /// Absolute image URL for a listing, when it has one.
    pub fn image_url(&self, job: &JobListing) -> Option<String> {
        job.image_url
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(|p| self.ctx.api.asset_url(p))
    }

    /// Open a listing's detail page.
    pub fn open(&self, job_id: i64) -> ViewScope {
        self.ctx.navigator.push(Route::JobDetails { id: job_id })
    }
}
