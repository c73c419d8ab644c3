// src/navigation.rs
//! Active view tracking and per-view request cancellation.

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::ClientError;
use crate::router::{Route, RouteDecision};

/// Identity and cancellation token of one mounted view.
#[derive(Debug, Clone)]
pub struct ViewScope {
    id: Uuid,
    route: Route,
    cancel: CancellationToken,
}

impl ViewScope {
    fn new(route: Route) -> Self {
        Self {
            id: Uuid::new_v4(),
            route,
            cancel: CancellationToken::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn is_active(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    /// Run a request on behalf of this view.
    ///
    /// The request future is dropped as soon as the view is left, and a response
    /// that lands after that point is discarded as `Cancelled`.
    pub async fn run<F, T>(&self, operation: &str, request: F) -> Result<T, ClientError>
    where
        F: Future<Output = Result<T, ClientError>>,
    {
        if self.cancel.is_cancelled() {
            return Err(ClientError::Cancelled);
        }

        let request_id = Uuid::new_v4();
        debug!(view = %self.id, %request_id, operation, "request started");

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                debug!(view = %self.id, %request_id, operation, "request cancelled");
                Err(ClientError::Cancelled)
            }
            outcome = request => {
                if self.cancel.is_cancelled() {
                    debug!(view = %self.id, %request_id, operation, "late response discarded");
                    Err(ClientError::Cancelled)
                } else {
                    outcome
                }
            }
        }
    }
}

/// Routes kept in the navigation history; older entries are dropped.
pub const MAX_HISTORY: usize = 50;

struct NavState {
    active: ViewScope,
    history: Vec<Route>,
}

/// Owns the current route. Leaving a route cancels every request its view
/// still has in flight.
pub struct Navigator {
    state: Mutex<NavState>,
}

impl Navigator {
    pub fn new(start: Route) -> Self {
        Self {
            state: Mutex::new(NavState {
                history: vec![start.clone()],
                active: ViewScope::new(start),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, NavState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn current(&self) -> Route {
        self.lock().active.route.clone()
    }

    pub fn history(&self) -> Vec<Route> {
        self.lock().history.clone()
    }

    /// Navigate to `route`, cancelling the previous view.
    pub fn push(&self, route: Route) -> ViewScope {
        let mut state = self.lock();
        state.active.cancel.cancel();
        info!("Navigating {} -> {}", state.active.route, route);

        let scope = ViewScope::new(route.clone());
        state.active = scope.clone();
        state.history.push(route);
        if state.history.len() > MAX_HISTORY {
            let excess = state.history.len() - MAX_HISTORY;
            state.history.drain(..excess);
        }
        scope
    }

    /// Scope for a view mounting at `route`: reuses the active scope when the
    /// navigator already points there, otherwise navigates first.
    pub fn enter(&self, route: Route) -> ViewScope {
        {
            let state = self.lock();
            if state.active.route == route && state.active.is_active() {
                return state.active.clone();
            }
        }
        self.push(route)
    }

    /// Apply a router decision. `InvalidRole` leaves navigation untouched.
    pub fn follow(&self, decision: &RouteDecision) -> Option<ViewScope> {
        match decision {
            RouteDecision::Navigate(route) => Some(self.push(route.clone())),
            RouteDecision::InvalidRole => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_push_cancels_previous_scope() {
        let nav = Navigator::new(Route::Landing);
        let first = nav.enter(Route::JobBoard);
        assert!(first.is_active());

        let second = nav.push(Route::Profile);
        assert!(!first.is_active());
        assert!(second.is_active());
        assert_eq!(nav.current(), Route::Profile);
        assert_eq!(
            nav.history(),
            vec![Route::Landing, Route::JobBoard, Route::Profile]
        );
    }

    #[test]
    fn test_enter_reuses_active_scope() {
        let nav = Navigator::new(Route::Landing);
        let pushed = nav.push(Route::Home);
        let entered = nav.enter(Route::Home);

        assert_eq!(pushed.id(), entered.id());
        assert_eq!(nav.history().len(), 2);
    }

    #[test]
    fn test_history_is_bounded() {
        let nav = Navigator::new(Route::Landing);
        for id in 0..(MAX_HISTORY as i64 * 3) {
            nav.push(Route::JobDetails { id });
        }

        let history = nav.history();
        assert_eq!(history.len(), MAX_HISTORY);
        assert_eq!(history.last(), Some(&nav.current()));
        assert_eq!(
            history.first(),
            Some(&Route::JobDetails {
                id: MAX_HISTORY as i64 * 2
            })
        );
    }

    #[test]
    fn test_follow_invalid_role_stays() {
        let nav = Navigator::new(Route::Login);
        assert!(nav.follow(&RouteDecision::InvalidRole).is_none());
        assert_eq!(nav.current(), Route::Login);

        nav.follow(&RouteDecision::Navigate(Route::Dashboard));
        assert_eq!(nav.current(), Route::Dashboard);
    }

    #[tokio::test]
    async fn test_run_passes_through_on_active_view() {
        let nav = Navigator::new(Route::Landing);
        let scope = nav.enter(Route::Home);

        let out = scope.run("noop", async { Ok::<_, ClientError>(5) }).await;
        assert_eq!(out.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_run_aborts_when_view_is_left() {
        let nav = std::sync::Arc::new(Navigator::new(Route::Landing));
        let scope = nav.enter(Route::JobBoard);

        let leaver = {
            let nav = nav.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                nav.push(Route::Profile);
            })
        };

        let out = scope
            .run("slow", async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok::<_, ClientError>(())
            })
            .await;

        leaver.await.unwrap();
        assert!(matches!(out, Err(ClientError::Cancelled)));
    }

    #[tokio::test]
    async fn test_run_refuses_on_left_view() {
        let nav = Navigator::new(Route::Landing);
        let scope = nav.enter(Route::Home);
        nav.push(Route::Login);

        let out = scope.run("late", async { Ok::<_, ClientError>(1) }).await;
        assert!(out.unwrap_err().is_cancelled());
    }
}
