//! `reqwest` implementation of the portal backend traits.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use super::submission::SubmissionForm;
use super::types::{
    ApiEnvelope, CreatedPartner, DateRange, Funnel, LoginData, Matrix, PartnerRecord,
    PartnerUpdate, Session, Snapshot, Trends,
};
use super::{OnboardingApi, PortalApi};
use crate::config::PortalConfig;
use crate::error::{ApiError, ConfigError};

/// HTTP client for the portal backend.
///
/// One request per call; no retries. Every request carries a fresh
/// `X-Request-Id` that is also logged.
pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
    default_token: Option<SecretString>,
}

impl HttpApi {
    pub fn new(config: &PortalConfig) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            timeout: config.request_timeout,
            default_token: config.auth_token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn classify(&self, err: reqwest::Error) -> ApiError {
        if err.is_timeout() {
            ApiError::Timeout(self.timeout)
        } else if err.is_connect() || err.is_request() {
            ApiError::Network(err.to_string())
        } else {
            ApiError::Unknown(err.to_string())
        }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        token: Option<&SecretString>,
        operation: &'static str,
    ) -> Result<ApiEnvelope<T>, ApiError> {
        let request_id = Uuid::new_v4();
        let mut request = request.header("X-Request-Id", request_id.to_string());
        if let Some(token) = token.or(self.default_token.as_ref()) {
            request = request.bearer_auth(token.expose_secret());
        }

        tracing::info!(%request_id, operation, "Sending portal request");

        let response = request.send().await.map_err(|e| {
            let err = self.classify(e);
            tracing::warn!(%request_id, operation, error = %err, "Portal request failed");
            err
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.classify(e))?;

        if status.is_success() {
            if body.trim().is_empty() {
                return Ok(ApiEnvelope {
                    success: true,
                    message: None,
                    data: None,
                });
            }
            let envelope: ApiEnvelope<T> = serde_json::from_str(&body).map_err(|e| {
                ApiError::Unknown(format!("{operation}: unreadable response body: {e}"))
            })?;
            if !envelope.success {
                let message = envelope
                    .message
                    .unwrap_or_else(|| "The request was rejected".to_string());
                tracing::warn!(%request_id, operation, %message, "Portal request rejected");
                return Err(ApiError::Validation(message));
            }
            tracing::debug!(%request_id, operation, %status, "Portal request succeeded");
            return Ok(envelope);
        }

        let message = error_message(&body);
        tracing::warn!(
            %request_id,
            operation,
            %status,
            message = message.as_deref().unwrap_or(""),
            "Portal request returned an error status"
        );

        match message {
            Some(message) if status.is_client_error() => Err(ApiError::Validation(message)),
            Some(message) => Err(ApiError::Unknown(format!("{status}: {message}"))),
            None => Err(ApiError::Unknown(status.to_string())),
        }
    }
}

/// `message` (or `error`) from a JSON error body.
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .or_else(|| value.get("error"))
        .and_then(|m| m.as_str())
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

fn require<T>(envelope: ApiEnvelope<T>, operation: &str) -> Result<T, ApiError> {
    envelope
        .data
        .ok_or_else(|| ApiError::Unknown(format!("{operation}: response had no data")))
}

#[async_trait]
impl OnboardingApi for HttpApi {
    async fn send_otp(&self, email: &str) -> Result<(), ApiError> {
        let request = self
            .client
            .post(self.url("partner/send-otp"))
            .json(&serde_json::json!({ "email": email }));
        self.execute::<serde_json::Value>(request, None, "send_otp")
            .await
            .map(|_| ())
    }

    async fn verify_otp(&self, email: &str, otp: &str) -> Result<(), ApiError> {
        let request = self
            .client
            .post(self.url("partner/verify-otp"))
            .json(&serde_json::json!({ "email": email, "otp": otp }));
        self.execute::<serde_json::Value>(request, None, "verify_otp")
            .await
            .map(|_| ())
    }

    async fn bank_names(&self) -> Result<Vec<String>, ApiError> {
        let request = self.client.get(self.url("banks"));
        let envelope = self.execute(request, None, "bank_names").await?;
        require(envelope, "bank_names")
    }

    async fn create_partner(&self, form: SubmissionForm) -> Result<String, ApiError> {
        let request = self
            .client
            .post(self.url("partner/create"))
            .multipart(form.into_multipart()?);
        let envelope = self
            .execute::<CreatedPartner>(request, None, "create_partner")
            .await?;
        let created = require(envelope, "create_partner")?;
        tracing::info!(partner_id = %created.partner_id, "Partner registration created");
        Ok(created.partner_id)
    }
}

#[async_trait]
impl PortalApi for HttpApi {
    async fn login(&self, email: &str, password: &SecretString) -> Result<Session, ApiError> {
        let request = self.client.post(self.url("auth/login")).json(&serde_json::json!({
            "email": email,
            "password": password.expose_secret(),
        }));
        let envelope = self.execute::<LoginData>(request, None, "login").await?;
        require(envelope, "login").map(Session::from)
    }

    async fn list_partners(&self, session: &Session) -> Result<Vec<PartnerRecord>, ApiError> {
        let request = self.client.get(self.url("partners"));
        let envelope = self
            .execute(request, Some(&session.token), "list_partners")
            .await?;
        require(envelope, "list_partners")
    }

    async fn get_partner(&self, session: &Session, id: &str) -> Result<PartnerRecord, ApiError> {
        let request = self.client.get(self.url(&format!("partners/{id}")));
        let envelope = self
            .execute(request, Some(&session.token), "get_partner")
            .await?;
        require(envelope, "get_partner")
    }

    async fn update_partner(
        &self,
        session: &Session,
        id: &str,
        update: &PartnerUpdate,
    ) -> Result<PartnerRecord, ApiError> {
        let request = self
            .client
            .put(self.url(&format!("partners/{id}")))
            .json(update);
        let envelope = self
            .execute(request, Some(&session.token), "update_partner")
            .await?;
        require(envelope, "update_partner")
    }

    async fn dashboard_funnel(
        &self,
        session: &Session,
        range: DateRange,
    ) -> Result<Funnel, ApiError> {
        let request = self
            .client
            .get(self.url("dashboard/funnel"))
            .query(&range.query());
        let envelope = self
            .execute(request, Some(&session.token), "dashboard_funnel")
            .await?;
        require(envelope, "dashboard_funnel")
    }

    async fn dashboard_snapshot(
        &self,
        session: &Session,
        range: DateRange,
    ) -> Result<Snapshot, ApiError> {
        let request = self
            .client
            .get(self.url("dashboard/snapshot"))
            .query(&range.query());
        let envelope = self
            .execute(request, Some(&session.token), "dashboard_snapshot")
            .await?;
        require(envelope, "dashboard_snapshot")
    }

    async fn dashboard_trends(
        &self,
        session: &Session,
        range: DateRange,
    ) -> Result<Trends, ApiError> {
        let request = self
            .client
            .get(self.url("dashboard/trends"))
            .query(&range.query());
        let envelope = self
            .execute(request, Some(&session.token), "dashboard_trends")
            .await?;
        require(envelope, "dashboard_trends")
    }

    async fn dashboard_matrix(
        &self,
        session: &Session,
        range: DateRange,
    ) -> Result<Matrix, ApiError> {
        let request = self
            .client
            .get(self.url("dashboard/matrix"))
            .query(&range.query());
        let envelope = self
            .execute(request, Some(&session.token), "dashboard_matrix")
            .await?;
        require(envelope, "dashboard_matrix")
    }
}
