// src/router.rs
use std::fmt;

use crate::session::Session;
use crate::token::{Claims, Role};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Landing,
    Login,
    Register,
    /// Worker landing page
    Home,
    /// Employer landing page
    Dashboard,
    JobBoard,
    JobDetails { id: i64 },
    PostJob,
    Applications,
    Profile,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Landing => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Home => "/home".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::JobBoard => "/list_jobs".to_string(),
            Route::JobDetails { id } => format!("/job_details?id={}", id),
            Route::PostJob => "/jobs".to_string(),
            Route::Applications => "/aplicaciones".to_string(),
            Route::Profile => "/perfil".to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Navigate(Route),
    /// Claims carry neither known role; the caller stays put and reports it.
    InvalidRole,
}

/// Pick the landing destination for decoded claims.
pub fn route_for_claims(claims: Option<&Claims>) -> RouteDecision {
    let Some(claims) = claims else {
        return RouteDecision::Navigate(Route::Login);
    };

    let roles = claims.roles();
    if roles.contains(&Role::Employer) {
        RouteDecision::Navigate(Route::Dashboard)
    } else if roles.contains(&Role::Worker) {
        RouteDecision::Navigate(Route::Home)
    } else {
        RouteDecision::InvalidRole
    }
}

pub fn route_for_session(session: &Session) -> RouteDecision {
    route_for_claims(session.claims().as_ref())
}
