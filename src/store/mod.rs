//! Application state: explicit container for the signed-in portal.
//!
//! `AppState` holds one independent slice per concern (auth, partners,
//! dashboard). Slices change only through their action enums; async thunks
//! wrap an API call with `Pending → Fulfilled | Rejected` dispatches. The
//! container is passed by reference to whoever needs it; there is no global.

pub mod auth;
pub mod dashboard;
pub mod partners;
pub mod selectors;

use crate::error::ApiError;

pub use auth::{AuthAction, AuthState};
pub use dashboard::{DashboardAction, DashboardState};
pub use partners::{PartnersAction, PartnersState};

/// Lifecycle of one async request, as dispatched by a thunk.
#[derive(Debug, Clone, PartialEq)]
pub enum Async<T> {
    Pending,
    Fulfilled(T),
    Rejected(String),
}

impl<T> Async<T> {
    /// Fold a request result into the matching terminal action. Errors are
    /// reduced to their user-facing message here.
    pub fn settle(result: &Result<T, ApiError>) -> Self
    where
        T: Clone,
    {
        match result {
            Ok(value) => Self::Fulfilled(value.clone()),
            Err(e) => Self::Rejected(e.user_message()),
        }
    }
}

/// Data plus loading/error flags for one remote resource.
#[derive(Debug, Clone, PartialEq)]
pub struct Loadable<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for Loadable<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
        }
    }
}

impl<T> Loadable<T> {
    /// Apply a request lifecycle step. Stale data is kept while reloading
    /// and after a failure.
    pub fn apply(&mut self, step: Async<T>) {
        match step {
            Async::Pending => {
                self.loading = true;
                self.error = None;
            }
            Async::Fulfilled(data) => {
                self.data = Some(data);
                self.loading = false;
                self.error = None;
            }
            Async::Rejected(message) => {
                self.loading = false;
                self.error = Some(message);
            }
        }
    }
}

#[derive(Debug, Clone)]
pub enum AppAction {
    Auth(AuthAction),
    Partners(PartnersAction),
    Dashboard(DashboardAction),
}

#[derive(Debug, Default)]
pub struct AppState {
    pub auth: AuthState,
    pub partners: PartnersState,
    pub dashboard: DashboardState,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatch(&mut self, action: AppAction) {
        match action {
            AppAction::Auth(AuthAction::Logout) => {
                self.auth.apply(AuthAction::Logout);
                self.partners = PartnersState::default();
                self.dashboard = DashboardState::default();
            }
            AppAction::Auth(action) => self.auth.apply(action),
            AppAction::Partners(action) => self.partners.apply(action),
            AppAction::Dashboard(action) => self.dashboard.apply(action),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loadable_lifecycle() {
        let mut slot: Loadable<u32> = Loadable::default();
        slot.apply(Async::Pending);
        assert!(slot.loading);

        slot.apply(Async::Fulfilled(7));
        assert_eq!(slot.data, Some(7));
        assert!(!slot.loading);

        slot.apply(Async::Pending);
        slot.apply(Async::Rejected("boom".into()));
        assert_eq!(slot.data, Some(7), "stale data survives a failed reload");
        assert_eq!(slot.error.as_deref(), Some("boom"));

        slot.apply(Async::Pending);
        assert!(slot.error.is_none(), "pending clears the previous error");
    }

    #[test]
    fn settle_uses_user_message() {
        let result: Result<u32, ApiError> = Err(ApiError::Network("refused".into()));
        match Async::settle(&result) {
            Async::Rejected(msg) => assert!(msg.contains("Unable to reach the server")),
            other => panic!("unexpected {other:?}"),
        }
    }
}
