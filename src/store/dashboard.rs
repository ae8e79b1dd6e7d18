//! Dashboard slice: funnel, snapshot, trends and matrix panels.

use super::auth::require_session;
use super::{AppAction, AppState, Async, Loadable};
use crate::api::{DateRange, Funnel, Matrix, PortalApi, Snapshot, Trends};
use crate::error::StoreError;

#[derive(Debug, Clone)]
pub enum DashboardAction {
    SetRange(DateRange),
    Funnel(Async<Funnel>),
    Snapshot(Async<Snapshot>),
    Trends(Async<Trends>),
    Matrix(Async<Matrix>),
}

#[derive(Debug, Default)]
pub struct DashboardState {
    pub range: DateRange,
    pub funnel: Loadable<Funnel>,
    pub snapshot: Loadable<Snapshot>,
    pub trends: Loadable<Trends>,
    pub matrix: Loadable<Matrix>,
}

impl DashboardState {
    pub fn apply(&mut self, action: DashboardAction) {
        match action {
            DashboardAction::SetRange(range) => self.range = range,
            DashboardAction::Funnel(step) => self.funnel.apply(step),
            DashboardAction::Snapshot(step) => self.snapshot.apply(step),
            DashboardAction::Trends(step) => self.trends.apply(step),
            DashboardAction::Matrix(step) => self.matrix.apply(step),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.funnel.loading || self.snapshot.loading || self.trends.loading || self.matrix.loading
    }
}

/// Load all four panels for the current range. Each panel records its own
/// outcome; the first failure (if any) is returned after all have run.
pub async fn load_dashboard(state: &mut AppState, api: &dyn PortalApi) -> Result<(), StoreError> {
    let session = require_session(state)?;
    if !session.user.role.can_view_dashboard() {
        return Err(StoreError::Forbidden {
            role: session.user.role.to_string(),
            action: "view the dashboard".to_string(),
        });
    }
    let range = state.dashboard.range;
    let mut first_error = None;

    state.dispatch(AppAction::Dashboard(DashboardAction::Funnel(Async::Pending)));
    let funnel = api.dashboard_funnel(&session, range).await;
    state.dispatch(AppAction::Dashboard(DashboardAction::Funnel(Async::settle(&funnel))));
    first_error = first_error.or(funnel.err());

    state.dispatch(AppAction::Dashboard(DashboardAction::Snapshot(Async::Pending)));
    let snapshot = api.dashboard_snapshot(&session, range).await;
    state.dispatch(AppAction::Dashboard(DashboardAction::Snapshot(Async::settle(&snapshot))));
    first_error = first_error.or(snapshot.err());

    state.dispatch(AppAction::Dashboard(DashboardAction::Trends(Async::Pending)));
    let trends = api.dashboard_trends(&session, range).await;
    state.dispatch(AppAction::Dashboard(DashboardAction::Trends(Async::settle(&trends))));
    first_error = first_error.or(trends.err());

    state.dispatch(AppAction::Dashboard(DashboardAction::Matrix(Async::Pending)));
    let matrix = api.dashboard_matrix(&session, range).await;
    state.dispatch(AppAction::Dashboard(DashboardAction::Matrix(Async::settle(&matrix))));
    first_error = first_error.or(matrix.err());

    match first_error {
        Some(e) => {
            tracing::warn!(error = %e, "Dashboard partially failed to load");
            Err(e.into())
        }
        None => {
            tracing::debug!("Dashboard loaded");
            Ok(())
        }
    }
}
