//! Auth slice: the signed-in session.

use secrecy::SecretString;

use super::{AppAction, AppState, Async};
use crate::api::{PortalApi, Session};
use crate::error::StoreError;

#[derive(Debug, Clone)]
pub enum AuthAction {
    Login(Async<Session>),
    Logout,
}

#[derive(Debug, Default)]
pub struct AuthState {
    pub session: Option<Session>,
    pub loading: bool,
    pub error: Option<String>,
}

impl AuthState {
    pub fn apply(&mut self, action: AuthAction) {
        match action {
            AuthAction::Login(Async::Pending) => {
                self.loading = true;
                self.error = None;
            }
            AuthAction::Login(Async::Fulfilled(session)) => {
                self.session = Some(session);
                self.loading = false;
            }
            AuthAction::Login(Async::Rejected(message)) => {
                self.session = None;
                self.loading = false;
                self.error = Some(message);
            }
            AuthAction::Logout => {
                self.session = None;
                self.loading = false;
                self.error = None;
            }
        }
    }
}

/// Sign in and store the session.
pub async fn login(
    state: &mut AppState,
    api: &dyn PortalApi,
    email: &str,
    password: &SecretString,
) -> Result<(), StoreError> {
    state.dispatch(AppAction::Auth(AuthAction::Login(Async::Pending)));
    let result = api.login(email, password).await;
    state.dispatch(AppAction::Auth(AuthAction::Login(Async::settle(&result))));
    match result {
        Ok(session) => {
            tracing::info!(user = %session.user.id, role = %session.user.role, "Signed in");
            Ok(())
        }
        Err(e) => {
            tracing::warn!(error = %e, "Sign-in failed");
            Err(e.into())
        }
    }
}

pub fn logout(state: &mut AppState) {
    tracing::info!("Signed out");
    state.dispatch(AppAction::Auth(AuthAction::Logout));
}

/// Session of the signed-in user, cloned so the caller can keep using the
/// state mutably.
pub(crate) fn require_session(state: &AppState) -> Result<Session, StoreError> {
    state
        .auth
        .session
        .clone()
        .ok_or(StoreError::NotAuthenticated)
}
