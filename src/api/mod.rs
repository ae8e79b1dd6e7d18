//! REST backend seam.
//!
//! Two async traits split the backend by audience: [`OnboardingApi`] covers
//! the public registration endpoints the wizard needs, [`PortalApi`] the
//! signed-in endpoints behind the application state. [`HttpApi`] implements
//! both on top of `reqwest`; tests substitute stubs.

pub mod http;
pub mod submission;
pub mod types;

use async_trait::async_trait;
use secrecy::SecretString;

use crate::error::ApiError;

pub use http::HttpApi;
pub use submission::{FormEntry, FormValue, SubmissionForm};
pub use types::{
    DateRange, Funnel, Matrix, PartnerRecord, PartnerStatus, PartnerUpdate, PortalUser, Role,
    Session, Snapshot, Trends,
};

/// Endpoints used by the onboarding wizard.
#[async_trait]
pub trait OnboardingApi: Send + Sync {
    /// `POST /partner/send-otp`
    async fn send_otp(&self, email: &str) -> Result<(), ApiError>;

    /// `POST /partner/verify-otp`. A wrong code comes back as
    /// [`ApiError::Validation`] with the server's reason.
    async fn verify_otp(&self, email: &str, otp: &str) -> Result<(), ApiError>;

    /// Bank names offered by the bank-name picker.
    async fn bank_names(&self) -> Result<Vec<String>, ApiError>;

    /// `POST /partner/create`. Returns the server-assigned partner id.
    async fn create_partner(&self, form: SubmissionForm) -> Result<String, ApiError>;
}

/// Endpoints that need a signed-in session.
#[async_trait]
pub trait PortalApi: Send + Sync {
    async fn login(&self, email: &str, password: &SecretString) -> Result<Session, ApiError>;

    async fn list_partners(&self, session: &Session) -> Result<Vec<PartnerRecord>, ApiError>;

    async fn get_partner(&self, session: &Session, id: &str) -> Result<PartnerRecord, ApiError>;

    async fn update_partner(
        &self,
        session: &Session,
        id: &str,
        update: &PartnerUpdate,
    ) -> Result<PartnerRecord, ApiError>;

    async fn dashboard_funnel(&self, session: &Session, range: DateRange)
    -> Result<Funnel, ApiError>;

    async fn dashboard_snapshot(
        &self,
        session: &Session,
        range: DateRange,
    ) -> Result<Snapshot, ApiError>;

    async fn dashboard_trends(&self, session: &Session, range: DateRange)
    -> Result<Trends, ApiError>;

    async fn dashboard_matrix(&self, session: &Session, range: DateRange)
    -> Result<Matrix, ApiError>;
}
