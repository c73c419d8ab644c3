// src/views/mod.rs
//! Page state holders. Each view mounts against an `AppContext`, loads what it
//! needs through its `ViewScope`, and exposes snapshots for rendering.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::core::{ApiClient, InFlight};
use crate::navigation::{Navigator, ViewScope};
use crate::router::Route;
use crate::session::Session;

pub mod applications;
pub mod dashboard;
pub mod home;
pub mod job_board;
pub mod job_details;
pub mod login;
pub mod post_job;
pub mod profile;
pub mod register;

pub use applications::{ApplicationsBoard, StatusChange};
pub use dashboard::DashboardView;
pub use home::HomeView;
pub use job_board::JobBoardView;
pub use job_details::{ApplyOutcome, JobDetailsView};
pub use login::{LoginOutcome, LoginView};
pub use post_job::{PostJobOutcome, PostJobView};
pub use profile::ProfileView;
pub use register::{RegisterOutcome, RegisterView};

/// Everything a view needs, passed explicitly.
#[derive(Clone)]
pub struct AppContext {
    pub api: ApiClient,
    pub session: Session,
    pub navigator: Arc<Navigator>,
    pub in_flight: Arc<InFlight>,
}

impl AppContext {
    pub fn new(api: ApiClient, session: Session) -> Self {
        Self {
            api,
            session,
            navigator: Arc::new(Navigator::new(Route::Landing)),
            in_flight: InFlight::new(),
        }
    }

    pub(crate) fn mount(&self, route: Route) -> ViewScope {
        self.navigator.enter(route)
    }
}

pub(crate) fn lock<T>(state: &Mutex<T>) -> MutexGuard<'_, T> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
