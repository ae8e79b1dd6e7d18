//! Email OTP verification: the gate inside the first wizard step.

use std::fmt;

use crate::api::OnboardingApi;
use crate::error::WizardError;
use crate::validation::rules;

/// Progresses `Unsent → Sent → Verified`. Resending stays in `Sent`; nothing
/// leads back to `Unsent` short of a wizard reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OtpState {
    #[default]
    Unsent,
    Sent,
    Verified,
}

impl fmt::Display for OtpState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Unsent => "unsent",
            Self::Sent => "sent",
            Self::Verified => "verified",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Default)]
pub struct OtpFlow {
    state: OtpState,
    /// Address the outstanding code was sent to.
    sent_to: Option<String>,
    /// Feedback shown next to the OTP input.
    message: Option<String>,
}

impl OtpFlow {
    pub fn state(&self) -> OtpState {
        self.state
    }

    pub fn is_verified(&self) -> bool {
        self.state == OtpState::Verified
    }

    pub fn sent_to(&self) -> Option<&str> {
        self.sent_to.as_deref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Send (or resend) a code to `email`. The caller has already checked the
    /// email format.
    pub async fn send(&mut self, api: &dyn OnboardingApi, email: &str) -> Result<(), WizardError> {
        if self.is_verified() {
            return Err(self.fail("Email is already verified"));
        }

        let email = email.trim();
        match api.send_otp(email).await {
            Ok(()) => {
                let resend = self.state == OtpState::Sent;
                self.state = OtpState::Sent;
                self.sent_to = Some(email.to_string());
                self.message = Some(format!("A verification code was sent to {email}"));
                tracing::info!(resend, "OTP sent");
                Ok(())
            }
            Err(e) => {
                self.message = Some(e.user_message());
                tracing::warn!(error = %e, "OTP send failed");
                Err(e.into())
            }
        }
    }

    /// Verify `code` for `email`. Any failure leaves the state at `Sent`.
    pub async fn verify(
        &mut self,
        api: &dyn OnboardingApi,
        email: &str,
        code: &str,
    ) -> Result<(), WizardError> {
        match self.state {
            OtpState::Verified => return Err(self.fail("Email is already verified")),
            OtpState::Unsent => return Err(self.fail("Request a verification code first")),
            OtpState::Sent => {}
        }

        if let Some(msg) = rules::validate_otp_code(code) {
            return Err(self.fail(&msg));
        }

        let email = email.trim();
        if self.sent_to.as_deref() != Some(email) {
            return Err(self.fail("Email changed since the code was sent. Request a new code."));
        }

        match api.verify_otp(email, code.trim()).await {
            Ok(()) => {
                self.state = OtpState::Verified;
                self.message = Some("Email verified".to_string());
                tracing::info!("OTP verified");
                Ok(())
            }
            Err(e) => {
                self.message = Some(e.user_message());
                tracing::warn!(error = %e, "OTP verification rejected");
                Err(e.into())
            }
        }
    }

    fn fail(&mut self, message: &str) -> WizardError {
        self.message = Some(message.to_string());
        WizardError::Otp(message.to_string())
    }
}
