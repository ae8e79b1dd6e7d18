//! WizardController: owns the draft and drives step navigation, OTP
//! verification and the final submission.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::api::{OnboardingApi, SubmissionForm};
use crate::draft::{DocumentSlot, Draft, Field, UploadFile};
use crate::error::WizardError;
use crate::validation::rules;

use super::otp::{OtpFlow, OtpState};
use super::steps::{self, FieldKey, WizardStep};

/// Where the wizard is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardStatus {
    /// Filling in steps; `step()` says which.
    Editing,
    /// The create request is in flight.
    Submitting,
    /// Terminal: the partner was created.
    Success { partner_id: String },
}

/// Drives the onboarding wizard.
///
/// All operations take `&mut self`, so a single controller never has two
/// requests in flight.
pub struct WizardController {
    api: Arc<dyn OnboardingApi>,
    draft: Draft,
    step: WizardStep,
    status: WizardStatus,
    /// Keys whose messages are visible. Editing a field hides its message
    /// until the next blur.
    touched: BTreeSet<FieldKey>,
    upload_errors: BTreeMap<FieldKey, String>,
    otp: OtpFlow,
    banner: Option<String>,
    banks: Option<Vec<String>>,
    scroll_generation: u64,
}

impl WizardController {
    pub fn new(api: Arc<dyn OnboardingApi>) -> Self {
        Self {
            api,
            draft: Draft::default(),
            step: WizardStep::BasicInfo,
            status: WizardStatus::Editing,
            touched: BTreeSet::new(),
            upload_errors: BTreeMap::new(),
            otp: OtpFlow::default(),
            banner: None,
            banks: None,
            scroll_generation: 0,
        }
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn status(&self) -> &WizardStatus {
        &self.status
    }

    pub fn otp(&self) -> &OtpFlow {
        &self.otp
    }

    /// Submission failure message, until dismissed.
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn dismiss_banner(&mut self) {
        self.banner = None;
    }

    pub fn banks(&self) -> Option<&[String]> {
        self.banks.as_deref()
    }

    /// Bumped on every forward step; a view scrolls to the top when it
    /// changes.
    pub fn scroll_generation(&self) -> u64 {
        self.scroll_generation
    }

    /// Whether "Continue" is enabled.
    pub fn can_advance(&self) -> bool {
        self.status == WizardStatus::Editing && steps::is_valid(self.step, &self.draft)
    }

    /// Messages to show on the current step.
    pub fn visible_errors(&self) -> BTreeMap<FieldKey, String> {
        let mut visible: BTreeMap<FieldKey, String> = steps::errors(self.step, &self.draft)
            .into_iter()
            .filter(|(key, _)| self.touched.contains(key))
            .collect();
        if matches!(self.step, WizardStep::Documents | WizardStep::Preview) {
            visible.extend(self.upload_errors.clone());
        }
        visible
    }

    pub fn field_error(&self, field: Field) -> Option<String> {
        let key = FieldKey::Field(field);
        if !self.touched.contains(&key) {
            return None;
        }
        rules::validate(field, &self.draft)
    }

    /// Update one field (shallow merge into the draft). Only the current
    /// step's fields can be edited; the preview step may edit any of them.
    pub fn set_field(&mut self, field: Field, value: &str) -> Result<(), WizardError> {
        self.ensure_editable()?;
        self.ensure_on_step(WizardStep::owning(field))?;
        if field == Field::Email && self.otp.is_verified() {
            return Err(WizardError::EmailLocked);
        }
        self.draft
            .set(field, value)
            .map_err(|message| WizardError::InvalidValue {
                field: field.name().to_string(),
                message,
            })?;
        self.touched.remove(&FieldKey::Field(field));
        tracing::debug!(field = %field, "Draft field updated");
        Ok(())
    }

    /// The field lost focus: show its message, if any.
    pub fn blur(&mut self, field: Field) {
        self.touched.insert(FieldKey::Field(field));
    }

    pub fn attach(&mut self, slot: DocumentSlot, file: UploadFile) -> Result<(), WizardError> {
        self.ensure_editable()?;
        self.ensure_on_step(WizardStep::Documents)?;
        let key = FieldKey::Document(slot);
        let name = file.name.clone();
        match self.draft.documents.put(slot, file) {
            Ok(()) => {
                self.upload_errors.remove(&key);
                self.touched.insert(key);
                tracing::info!(slot = %slot, file = %name, "Document attached");
                Ok(())
            }
            Err(rejection) => {
                self.upload_errors.insert(key, rejection.to_string());
                tracing::info!(slot = %slot, file = %name, reason = %rejection, "Document rejected");
                Err(rejection.into())
            }
        }
    }

    pub fn detach(&mut self, slot: DocumentSlot) -> Result<Option<UploadFile>, WizardError> {
        self.ensure_editable()?;
        self.ensure_on_step(WizardStep::Documents)?;
        self.upload_errors.remove(&FieldKey::Document(slot));
        Ok(self.draft.documents.take(slot))
    }

    pub fn attach_other(&mut self, file: UploadFile) -> Result<(), WizardError> {
        self.ensure_editable()?;
        self.ensure_on_step(WizardStep::Documents)?;
        let name = file.name.clone();
        match self.draft.documents.push_other(file) {
            Ok(()) => {
                self.upload_errors.remove(&FieldKey::OtherDocuments);
                tracing::info!(file = %name, "Other document attached");
                Ok(())
            }
            Err(rejection) => {
                self.upload_errors
                    .insert(FieldKey::OtherDocuments, rejection.to_string());
                Err(rejection.into())
            }
        }
    }

    pub fn remove_other(&mut self, index: usize) -> Result<UploadFile, WizardError> {
        self.ensure_editable()?;
        self.ensure_on_step(WizardStep::Documents)?;
        self.draft
            .documents
            .remove_other(index)
            .ok_or(WizardError::NoSuchDocument(index))
    }

    /// Move to the next step if the current one is valid. On refusal every
    /// failing field of the step becomes visible.
    pub fn advance(&mut self) -> Result<WizardStep, WizardError> {
        self.ensure_editable()?;
        let errors = steps::errors(self.step, &self.draft);
        if !errors.is_empty() {
            let count = errors.len();
            self.touched.extend(errors.into_keys());
            tracing::debug!(step = %self.step, count, "Advance refused");
            return Err(WizardError::StepInvalid {
                step: self.step,
                count,
            });
        }

        if let Some(next) = self.step.next() {
            tracing::info!(from = %self.step, to = %next, "Wizard advanced");
            self.step = next;
            self.scroll_generation += 1;
        }
        Ok(self.step)
    }

    /// Move back one step. Never validated.
    pub fn retreat(&mut self) -> Result<WizardStep, WizardError> {
        self.ensure_editable()?;
        if let Some(prev) = self.step.prev() {
            tracing::debug!(from = %self.step, to = %prev, "Wizard retreated");
            self.step = prev;
        }
        Ok(self.step)
    }

    /// Send or resend the verification code to the draft's email.
    pub async fn send_otp(&mut self) -> Result<(), WizardError> {
        self.ensure_editable()?;
        if let Some(message) = rules::validate(Field::Email, &self.draft) {
            self.touched.insert(FieldKey::Field(Field::Email));
            return Err(WizardError::InvalidValue {
                field: Field::Email.name().to_string(),
                message,
            });
        }
        let email = self.draft.basic.email.clone();
        self.otp.send(self.api.as_ref(), &email).await
    }

    /// Verify the code; on success the email is locked and the OTP gate of
    /// the first step opens.
    pub async fn verify_otp(&mut self, code: &str) -> Result<(), WizardError> {
        self.ensure_editable()?;
        let email = self.draft.basic.email.clone();
        let result = self.otp.verify(self.api.as_ref(), &email, code).await;
        if result.is_ok() {
            self.draft.basic.otp_verified = true;
        } else {
            self.touched.insert(FieldKey::Otp);
        }
        result
    }

    /// Fetch and cache the bank-name list.
    pub async fn load_banks(&mut self) -> Result<&[String], WizardError> {
        if self.banks.is_none() {
            let banks = self.api.bank_names().await?;
            tracing::debug!(count = banks.len(), "Bank list loaded");
            self.banks = Some(banks);
        }
        Ok(self.banks.as_deref().unwrap_or_default())
    }

    /// Submit the registration. Only allowed on the preview step with every
    /// step valid. On failure the draft is kept and the message is shown in
    /// the banner; there is no automatic retry.
    pub async fn submit(&mut self) -> Result<String, WizardError> {
        self.ensure_editable()?;
        if !self.step.is_last() {
            return Err(WizardError::NotOnPreview { current: self.step });
        }
        let errors = steps::errors(WizardStep::Preview, &self.draft);
        if !errors.is_empty() {
            let count = errors.len();
            self.touched.extend(errors.into_keys());
            return Err(WizardError::StepInvalid {
                step: self.step,
                count,
            });
        }

        let form = SubmissionForm::from_draft(&self.draft);
        self.status = WizardStatus::Submitting;
        self.banner = None;
        tracing::info!(entries = form.entries().len(), "Submitting partner registration");

        match self.api.create_partner(form).await {
            Ok(partner_id) => {
                tracing::info!(%partner_id, "Partner registration submitted");
                self.status = WizardStatus::Success {
                    partner_id: partner_id.clone(),
                };
                self.draft = Draft::default();
                self.otp = OtpFlow::default();
                self.touched.clear();
                self.upload_errors.clear();
                Ok(partner_id)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Partner registration failed");
                self.status = WizardStatus::Editing;
                self.banner = Some(e.user_message());
                Err(e.into())
            }
        }
    }

    /// Explicit exit: drop the draft and start over at the first step.
    pub fn reset(&mut self) {
        tracing::info!("Wizard reset");
        self.draft = Draft::default();
        self.step = WizardStep::BasicInfo;
        self.status = WizardStatus::Editing;
        self.touched.clear();
        self.upload_errors.clear();
        self.otp = OtpFlow::default();
        self.banner = None;
        self.scroll_generation = 0;
    }

    pub fn otp_state(&self) -> OtpState {
        self.otp.state()
    }

    fn ensure_on_step(&self, owner: WizardStep) -> Result<(), WizardError> {
        if self.step == owner || self.step.is_last() {
            Ok(())
        } else {
            Err(WizardError::WrongStep {
                owner,
                current: self.step,
            })
        }
    }

    fn ensure_editable(&self) -> Result<(), WizardError> {
        match self.status {
            WizardStatus::Editing => Ok(()),
            WizardStatus::Submitting => Err(WizardError::Busy),
            WizardStatus::Success { .. } => Err(WizardError::AlreadySubmitted),
        }
    }
}
