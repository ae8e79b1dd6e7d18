//! Submission adapter: turns a draft into the multipart body of
//! `POST /partner/create` and back.
//!
//! Key convention:
//! - basic info uses flat keys (`fullName`, `email`, ...) plus `emailVerified`
//! - other groups use dotted prefixes (`personalDetails.gender`,
//!   `address.city`, `bankDetails.ifscCode`)
//! - each document slot is a flat file key (`panCard`, ...)
//! - other documents repeat the `otherDocuments` key, in order
//!
//! Empty values are omitted, and so are conditional values that no longer
//! apply. The confirm-account-number input never leaves the client.

use reqwest::multipart::{Form, Part};

use crate::draft::{DocumentSlot, Draft, Field, UploadFile};
use crate::error::ApiError;
use crate::validation::{UploadRejection, rules};

pub const EMAIL_VERIFIED_KEY: &str = "emailVerified";
pub const OTHER_DOCUMENTS_KEY: &str = "otherDocuments";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    Text(String),
    File(UploadFile),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormEntry {
    pub key: String,
    pub value: FormValue,
}

/// Why a submission form could not be read back into a draft.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormParseError {
    #[error("Unknown form key: {0}")]
    UnknownKey(String),

    #[error("Expected a text value for {0}")]
    ExpectedText(String),

    #[error("Expected a file for {0}")]
    ExpectedFile(String),

    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("File under {key} rejected: {source}")]
    Upload {
        key: String,
        #[source]
        source: UploadRejection,
    },
}

/// Multipart key for a scalar field.
pub fn field_key(field: Field) -> String {
    match field.group().prefix() {
        Some(prefix) => format!("{prefix}.{}", field.name()),
        None => field.name().to_string(),
    }
}

/// Ordered multipart entries for one submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionForm {
    entries: Vec<FormEntry>,
}

impl SubmissionForm {
    /// Only values in effect are sent: a conditional field that is not
    /// currently required (and a GST certificate whose flag no longer
    /// applies) stays behind in the draft.
    pub fn from_draft(draft: &Draft) -> Self {
        let mut form = Self::default();

        for field in Field::ALL.iter().copied() {
            if field == Field::TeamStrength {
                form.push_text(EMAIL_VERIFIED_KEY, &draft.basic.otp_verified.to_string());
            }
            if field == Field::ConfirmAccountNumber
                || (rules::is_conditional(field) && !rules::is_required(field, draft))
            {
                continue;
            }
            let value = draft.get(field);
            if !value.is_empty() {
                form.push_text(field_key(field), &value);
            }
        }

        let required = rules::required_documents(draft);
        for slot in DocumentSlot::ALL.iter().copied() {
            if slot == DocumentSlot::GstCertificate && !required.contains(&slot) {
                continue;
            }
            if let Some(file) = draft.documents.get(slot) {
                form.push_file(slot.key(), file.clone());
            }
        }
        for file in draft.documents.others() {
            form.push_file(OTHER_DOCUMENTS_KEY, file.clone());
        }

        form
    }

    pub fn entries(&self) -> &[FormEntry] {
        &self.entries
    }

    /// First text value stored under `key`.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.entries.iter().find_map(|e| match &e.value {
            FormValue::Text(text) if e.key == key => Some(text.as_str()),
            _ => None,
        })
    }

    /// All files stored under `key`, in order.
    pub fn files(&self, key: &str) -> Vec<&UploadFile> {
        self.entries
            .iter()
            .filter(|e| e.key == key)
            .filter_map(|e| match &e.value {
                FormValue::File(file) => Some(file),
                FormValue::Text(_) => None,
            })
            .collect()
    }

    pub fn push_text(&mut self, key: impl Into<String>, value: &str) {
        self.entries.push(FormEntry {
            key: key.into(),
            value: FormValue::Text(value.to_string()),
        });
    }

    pub fn push_file(&mut self, key: impl Into<String>, file: UploadFile) {
        self.entries.push(FormEntry {
            key: key.into(),
            value: FormValue::File(file),
        });
    }

    /// Read the entries back into a draft using the same key convention.
    /// Every key must be recognised; nothing is dropped silently.
    pub fn to_draft(&self) -> Result<Draft, FormParseError> {
        let mut draft = Draft::default();

        for entry in &self.entries {
            let key = entry.key.as_str();

            if key == EMAIL_VERIFIED_KEY {
                let text = expect_text(entry)?;
                draft.basic.otp_verified =
                    text.parse().map_err(|_| FormParseError::InvalidValue {
                        key: key.to_string(),
                        message: format!("expected true or false, got {text:?}"),
                    })?;
                continue;
            }

            if key == OTHER_DOCUMENTS_KEY {
                let file = expect_file(entry)?;
                draft
                    .documents
                    .push_other(file.clone())
                    .map_err(|source| FormParseError::Upload {
                        key: key.to_string(),
                        source,
                    })?;
                continue;
            }

            if let Some(slot) = DocumentSlot::ALL.iter().copied().find(|s| s.key() == key) {
                let file = expect_file(entry)?;
                draft
                    .documents
                    .put(slot, file.clone())
                    .map_err(|source| FormParseError::Upload {
                        key: key.to_string(),
                        source,
                    })?;
                continue;
            }

            let field = Field::ALL
                .iter()
                .copied()
                .filter(|f| *f != Field::ConfirmAccountNumber)
                .find(|f| field_key(*f) == key)
                .ok_or_else(|| FormParseError::UnknownKey(key.to_string()))?;
            let text = expect_text(entry)?;
            draft
                .set(field, text)
                .map_err(|message| FormParseError::InvalidValue {
                    key: key.to_string(),
                    message,
                })?;
        }

        draft.bank.confirm_account_number = draft.bank.account_number.clone();
        Ok(draft)
    }

    /// Build the `reqwest` multipart body.
    pub fn into_multipart(self) -> Result<Form, ApiError> {
        let mut form = Form::new();
        for entry in self.entries {
            form = match entry.value {
                FormValue::Text(text) => form.text(entry.key, text),
                FormValue::File(file) => {
                    let part = Part::bytes(file.content)
                        .file_name(file.name)
                        .mime_str(&file.mime_type)
                        .map_err(|e| {
                            ApiError::Unknown(format!("invalid MIME type for {}: {e}", entry.key))
                        })?;
                    form.part(entry.key, part)
                }
            };
        }
        Ok(form)
    }
}

fn expect_text(entry: &FormEntry) -> Result<&str, FormParseError> {
    match &entry.value {
        FormValue::Text(text) => Ok(text),
        FormValue::File(_) => Err(FormParseError::ExpectedText(entry.key.clone())),
    }
}

fn expect_file(entry: &FormEntry) -> Result<&UploadFile, FormParseError> {
    match &entry.value {
        FormValue::File(file) => Ok(file),
        FormValue::Text(_) => Err(FormParseError::ExpectedFile(entry.key.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(name: &str) -> UploadFile {
        UploadFile::new(name, "image/png", vec![1, 2, 3])
    }

    fn filled_draft() -> Draft {
        let mut draft = Draft::default();
        let values = [
            (Field::FullName, "Asha Rao"),
            (Field::MobileNumber, "9876543210"),
            (Field::Email, "asha@example.com"),
            (Field::RegistrationType, "Company"),
            (Field::TeamStrength, "8"),
            (Field::Gender, "Female"),
            (Field::DateOfBirth, "1990-04-12"),
            (Field::EmploymentType, "Self-Employed"),
            (Field::EmergencyContact, "9123456780"),
            (Field::FocusProduct, "Home Loan"),
            (Field::Experience, "3-5 Years"),
            (Field::Role, "file-sharing"),
            (Field::AddressLine1, "12 MG Road"),
            (Field::Landmark, "Near the metro"),
            (Field::City, "Bengaluru"),
            (Field::Pincode, "560001"),
            (Field::AddressType, "Office"),
            (Field::AccountType, "Current"),
            (Field::HolderName, "Asha Rao"),
            (Field::RelationshipWithHolder, "Self"),
            (Field::BankName, "HDFC Bank"),
            (Field::AccountNumber, "123456789012"),
            (Field::ConfirmAccountNumber, "123456789012"),
            (Field::IfscCode, "HDFC0001234"),
            (Field::BranchName, "MG Road"),
            (Field::GstBilling, "Yes"),
        ];
        for (field, value) in values {
            draft.set(field, value).unwrap();
        }
        draft.basic.otp_verified = true;
        for slot in DocumentSlot::ALL {
            draft.documents.put(*slot, png(slot.key())).unwrap();
        }
        draft.documents.push_other(png("extra-1")).unwrap();
        draft
            .documents
            .push_other(UploadFile::new("extra-2", "application/pdf", vec![9]))
            .unwrap();
        draft
    }

    #[test]
    fn key_convention() {
        assert_eq!(field_key(Field::FullName), "fullName");
        assert_eq!(field_key(Field::Gender), "personalDetails.gender");
        assert_eq!(field_key(Field::Pincode), "address.pincode");
        assert_eq!(field_key(Field::GstBilling), "bankDetails.isGstBillingApplicable");
    }

    #[test]
    fn draft_round_trips() {
        let draft = filled_draft();
        let form = SubmissionForm::from_draft(&draft);
        assert_eq!(form.to_draft().unwrap(), draft);
    }

    #[test]
    fn empty_draft_round_trips() {
        let draft = Draft::default();
        let form = SubmissionForm::from_draft(&draft);
        assert_eq!(form.entries().len(), 1);
        assert_eq!(form.text(EMAIL_VERIFIED_KEY), Some("false"));
        assert_eq!(form.to_draft().unwrap(), draft);
    }

    #[test]
    fn padded_input_round_trips() {
        let mut draft = Draft::default();
        for (field, value) in [
            (Field::FullName, " Asha Rao "),
            (Field::Email, "asha@example.com\t"),
            (Field::City, "  Pune"),
            (Field::Gender, " Female "),
            (Field::IfscCode, " hdfc0001234 "),
        ] {
            draft.set(field, value).unwrap();
        }
        let form = SubmissionForm::from_draft(&draft);
        assert_eq!(form.text("fullName"), Some("Asha Rao"));
        assert_eq!(form.to_draft().unwrap(), draft);
    }

    #[test]
    fn stale_team_strength_is_not_sent() {
        let mut draft = Draft::default();
        draft.set(Field::RegistrationType, "Company").unwrap();
        draft.set(Field::TeamStrength, "lots").unwrap();
        assert_eq!(
            SubmissionForm::from_draft(&draft).text("teamStrength"),
            Some("lots")
        );

        draft.set(Field::RegistrationType, "Individual").unwrap();
        let form = SubmissionForm::from_draft(&draft);
        assert_eq!(form.text("teamStrength"), None);
        assert_eq!(form.text("registrationType"), Some("Individual"));
        assert_eq!(form.text(EMAIL_VERIFIED_KEY), Some("false"));
    }

    #[test]
    fn stale_gst_flag_and_certificate_are_not_sent() {
        let mut draft = Draft::default();
        draft.set(Field::AccountType, "Current").unwrap();
        draft.set(Field::GstBilling, "Yes").unwrap();
        draft
            .documents
            .put(DocumentSlot::GstCertificate, png("gst"))
            .unwrap();
        let form = SubmissionForm::from_draft(&draft);
        assert_eq!(form.text("bankDetails.isGstBillingApplicable"), Some("Yes"));
        assert_eq!(form.files("gstCertificate").len(), 1);

        draft.set(Field::AccountType, "Savings").unwrap();
        let form = SubmissionForm::from_draft(&draft);
        assert_eq!(form.text("bankDetails.isGstBillingApplicable"), None);
        assert!(form.files("gstCertificate").is_empty());

        // Billing flag required but answered "No": the certificate stays home.
        draft.set(Field::AccountType, "Others").unwrap();
        draft.set(Field::GstBilling, "No").unwrap();
        let form = SubmissionForm::from_draft(&draft);
        assert_eq!(form.text("bankDetails.isGstBillingApplicable"), Some("No"));
        assert!(form.files("gstCertificate").is_empty());
    }

    #[test]
    fn normalized_mime_type_builds_multipart() {
        let mut draft = Draft::default();
        draft
            .documents
            .put(
                DocumentSlot::PanCard,
                UploadFile {
                    name: "pan.png".into(),
                    mime_type: " IMAGE/PNG".into(),
                    content: vec![1, 2, 3],
                },
            )
            .unwrap();
        let form = SubmissionForm::from_draft(&draft);
        assert_eq!(form.files("panCard")[0].mime_type, "image/png");
        assert!(form.into_multipart().is_ok());
    }

    #[test]
    fn confirm_account_number_is_not_sent() {
        let form = SubmissionForm::from_draft(&filled_draft());
        assert!(form.entries().iter().all(|e| !e.key.contains("confirm")));
        assert_eq!(form.text("bankDetails.accountNumber"), Some("123456789012"));
    }

    #[test]
    fn files_use_flat_and_repeated_keys() {
        let form = SubmissionForm::from_draft(&filled_draft());
        assert_eq!(form.files("panCard").len(), 1);
        let others = form.files(OTHER_DOCUMENTS_KEY);
        assert_eq!(others.len(), 2);
        assert_eq!(others[0].name, "extra-1");
        assert_eq!(others[1].name, "extra-2");
    }

    #[test]
    fn optional_empty_values_are_omitted() {
        let form = SubmissionForm::from_draft(&filled_draft());
        assert!(form.text("address.addressLine2").is_none());
        assert_eq!(form.text("address.landmark"), Some("Near the metro"));
    }

    #[test]
    fn unknown_key_is_an_error() {
        let mut form = SubmissionForm::default();
        form.push_text("nickname", "Ash");
        assert_eq!(
            form.to_draft().unwrap_err(),
            FormParseError::UnknownKey("nickname".into())
        );
    }

    #[test]
    fn wrong_value_kind_is_an_error() {
        let mut form = SubmissionForm::default();
        form.push_text("panCard", "not a file");
        assert!(matches!(form.to_draft(), Err(FormParseError::ExpectedFile(_))));

        let mut form = SubmissionForm::default();
        form.push_file("fullName", png("x"));
        assert!(matches!(form.to_draft(), Err(FormParseError::ExpectedText(_))));
    }

    #[test]
    fn invalid_file_is_rejected_on_parse() {
        let mut form = SubmissionForm::default();
        form.push_file("profilePhoto", UploadFile::new("p.pdf", "application/pdf", vec![1]));
        assert!(matches!(form.to_draft(), Err(FormParseError::Upload { .. })));
    }

    #[test]
    fn builds_multipart() {
        let form = SubmissionForm::from_draft(&filled_draft());
        let multipart = form.into_multipart().unwrap();
        assert!(!multipart.boundary().is_empty());
    }
}
