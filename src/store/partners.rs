//! Partners slice: the management table and the record under review.

use super::auth::require_session;
use super::{AppAction, AppState, Async, Loadable};
use crate::api::{PartnerRecord, PartnerUpdate, PortalApi, Session};
use crate::error::StoreError;

#[derive(Debug, Clone)]
pub enum PartnersAction {
    List(Async<Vec<PartnerRecord>>),
    Fetch(Async<PartnerRecord>),
    Update(Async<PartnerRecord>),
}

#[derive(Debug, Default)]
pub struct PartnersState {
    pub list: Loadable<Vec<PartnerRecord>>,
    pub selected: Loadable<PartnerRecord>,
    pub saving: bool,
    pub save_error: Option<String>,
}

impl PartnersState {
    pub fn apply(&mut self, action: PartnersAction) {
        match action {
            PartnersAction::List(step) => self.list.apply(step),
            PartnersAction::Fetch(step) => self.selected.apply(step),
            PartnersAction::Update(Async::Pending) => {
                self.saving = true;
                self.save_error = None;
            }
            PartnersAction::Update(Async::Fulfilled(record)) => {
                self.saving = false;
                if let Some(rows) = self.list.data.as_mut() {
                    if let Some(row) = rows.iter_mut().find(|r| r.id == record.id) {
                        *row = record.clone();
                    }
                }
                if self.selected.data.as_ref().is_some_and(|s| s.id == record.id) {
                    self.selected.data = Some(record);
                }
            }
            PartnersAction::Update(Async::Rejected(message)) => {
                self.saving = false;
                self.save_error = Some(message);
            }
        }
    }
}

fn require_manager(session: &Session, action: &str) -> Result<(), StoreError> {
    if session.user.role.can_manage_partners() {
        Ok(())
    } else {
        Err(StoreError::Forbidden {
            role: session.user.role.to_string(),
            action: action.to_string(),
        })
    }
}

pub async fn fetch_partners(state: &mut AppState, api: &dyn PortalApi) -> Result<(), StoreError> {
    let session = require_session(state)?;
    require_manager(&session, "list partners")?;

    state.dispatch(AppAction::Partners(PartnersAction::List(Async::Pending)));
    let result = api.list_partners(&session).await;
    state.dispatch(AppAction::Partners(PartnersAction::List(Async::settle(&result))));
    let rows = result?;
    tracing::debug!(count = rows.len(), "Partners loaded");
    Ok(())
}

pub async fn fetch_partner(
    state: &mut AppState,
    api: &dyn PortalApi,
    id: &str,
) -> Result<(), StoreError> {
    let session = require_session(state)?;

    state.dispatch(AppAction::Partners(PartnersAction::Fetch(Async::Pending)));
    let result = api.get_partner(&session, id).await;
    state.dispatch(AppAction::Partners(PartnersAction::Fetch(Async::settle(&result))));
    result?;
    Ok(())
}

/// Save a review decision or edit on a partner record.
pub async fn update_partner(
    state: &mut AppState,
    api: &dyn PortalApi,
    id: &str,
    update: &PartnerUpdate,
) -> Result<(), StoreError> {
    let session = require_session(state)?;
    require_manager(&session, "update partners")?;

    state.dispatch(AppAction::Partners(PartnersAction::Update(Async::Pending)));
    let result = api.update_partner(&session, id, update).await;
    state.dispatch(AppAction::Partners(PartnersAction::Update(Async::settle(&result))));
    match result {
        Ok(record) => {
            tracing::info!(partner_id = %record.id, status = ?record.status, "Partner updated");
            Ok(())
        }
        Err(e) => {
            tracing::warn!(partner_id = %id, error = %e, "Partner update failed");
            Err(e.into())
        }
    }
}
