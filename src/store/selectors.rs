//! Typed read-only views over [`AppState`].

use super::AppState;
use crate::api::{PartnerRecord, PartnerStatus, PortalUser, Role};

pub fn is_authenticated(state: &AppState) -> bool {
    state.auth.session.is_some()
}

pub fn current_user(state: &AppState) -> Option<&PortalUser> {
    state.auth.session.as_ref().map(|s| &s.user)
}

pub fn current_role(state: &AppState) -> Option<Role> {
    current_user(state).map(|u| u.role)
}

pub fn partners(state: &AppState) -> &[PartnerRecord] {
    state.partners.list.data.as_deref().unwrap_or_default()
}

pub fn partners_with_status(state: &AppState, status: PartnerStatus) -> Vec<&PartnerRecord> {
    partners(state)
        .iter()
        .filter(|p| p.status == status)
        .collect()
}

/// Partners waiting on a document review.
pub fn review_queue_len(state: &AppState) -> usize {
    partners(state)
        .iter()
        .filter(|p| matches!(p.status, PartnerStatus::Pending | PartnerStatus::UnderReview))
        .count()
}

pub fn selected_partner(state: &AppState) -> Option<&PartnerRecord> {
    state.partners.selected.data.as_ref()
}

/// First dashboard panel error, in panel order.
pub fn dashboard_error(state: &AppState) -> Option<&str> {
    let d = &state.dashboard;
    [
        &d.funnel.error,
        &d.snapshot.error,
        &d.trends.error,
        &d.matrix.error,
    ]
    .into_iter()
    .find_map(|e| e.as_deref())
}
