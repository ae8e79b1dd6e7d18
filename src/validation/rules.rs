//! Field validators.
//!
//! Each rule maps `(field, draft)` to an optional message. The wizard's step
//! gate and its inline messages are both computed from [`validate`], so a
//! step can never be enabled while one of its rules still fails.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate, Utc};
use regex::Regex;

use crate::draft::model::{AccountType, GstBilling, RegistrationType};
use crate::draft::{DocumentSlot, Draft, Field};

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$").expect("email pattern")
});
static MOBILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[6-9][0-9]{9}$").expect("mobile pattern"));
static PERSON_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z .']*$").expect("name pattern"));
static PINCODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[1-9][0-9]{5}$").expect("pincode pattern"));
static ACCOUNT_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{9,18}$").expect("account pattern"));
static IFSC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{4}0[A-Z0-9]{6}$").expect("ifsc pattern"));
static OTP_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{6}$").expect("otp pattern"));

/// Minimum partner age in whole years.
pub const MIN_AGE_YEARS: i32 = 18;

/// Fields that become required because of a selector value elsewhere in
/// the draft.
///
/// - any registration type other than `Individual` requires team strength
/// - `Current` and `Others` accounts require the GST-billing flag
pub fn conditional_fields(draft: &Draft) -> Vec<Field> {
    let mut fields = Vec::new();
    if matches!(
        draft.basic.registration_type,
        Some(ty) if ty != RegistrationType::Individual
    ) {
        fields.push(Field::TeamStrength);
    }
    if matches!(
        draft.bank.account_type,
        Some(AccountType::Current | AccountType::Others)
    ) {
        fields.push(Field::GstBilling);
    }
    fields
}

/// Fields whose requirement depends on a selector elsewhere in the draft.
/// When not required they are ignored entirely, neither validated nor sent.
pub fn is_conditional(field: Field) -> bool {
    matches!(field, Field::TeamStrength | Field::GstBilling)
}

/// Whether a field must be filled in for the current draft.
pub fn is_required(field: Field, draft: &Draft) -> bool {
    match field {
        Field::AddressLine2 | Field::Landmark => false,
        _ if is_conditional(field) => conditional_fields(draft).contains(&field),
        _ => true,
    }
}

/// Document slots that must hold a file for the current draft.
pub fn required_documents(draft: &Draft) -> Vec<DocumentSlot> {
    let mut slots = vec![
        DocumentSlot::ProfilePhoto,
        DocumentSlot::PanCard,
        DocumentSlot::AadharFront,
        DocumentSlot::AadharBack,
        DocumentSlot::CancelledCheque,
    ];
    if is_required(Field::GstBilling, draft) && draft.bank.gst_billing == Some(GstBilling::Yes) {
        slots.push(DocumentSlot::GstCertificate);
    }
    slots
}

/// Validate one field against the draft. `None` means the field is fine.
pub fn validate(field: Field, draft: &Draft) -> Option<String> {
    if is_conditional(field) && !is_required(field, draft) {
        return None;
    }

    let value = draft.get(field);
    let value = value.trim();

    if value.is_empty() {
        return is_required(field, draft).then(|| required_message(field));
    }

    let message = match field {
        Field::FullName | Field::HolderName => check_person_name(field, value),
        Field::MobileNumber => check_mobile(field, value),
        Field::EmergencyContact => check_mobile(field, value).or_else(|| {
            (value == draft.basic.mobile_number.trim())
                .then(|| "Emergency contact must differ from your mobile number".to_string())
        }),
        Field::Email => (!EMAIL.is_match(value)).then(|| "Enter a valid email address".to_string()),
        Field::TeamStrength => match value.parse::<u32>() {
            Ok(n) if n > 0 => None,
            _ => Some("Team strength must be a whole number greater than zero".to_string()),
        },
        Field::DateOfBirth => check_date_of_birth(value, Utc::now().date_naive()),
        Field::Pincode => {
            (!PINCODE.is_match(value)).then(|| "Enter a valid 6-digit pincode".to_string())
        }
        Field::City => (value.chars().any(|c| c.is_ascii_digit()))
            .then(|| "City name cannot contain digits".to_string()),
        Field::AccountNumber => (!ACCOUNT_NUMBER.is_match(value))
            .then(|| "Account number must be 9 to 18 digits".to_string()),
        Field::ConfirmAccountNumber => (value != draft.bank.account_number.trim())
            .then(|| "Account numbers do not match".to_string()),
        Field::IfscCode => (!IFSC.is_match(&value.to_ascii_uppercase()))
            .then(|| "Enter a valid IFSC code (e.g. HDFC0001234)".to_string()),
        _ => None,
    };

    if let Some(ref msg) = message {
        tracing::debug!(field = %field, message = %msg, "Field validation failed");
    }
    message
}

/// Local shape check for an OTP before it is sent to the backend.
pub fn validate_otp_code(code: &str) -> Option<String> {
    (!OTP_CODE.is_match(code.trim())).then(|| "Enter the 6-digit code sent to your email".to_string())
}

fn required_message(field: Field) -> String {
    if field.is_choice() {
        format!("Please select {}", field.label().to_lowercase())
    } else {
        format!("{} is required", field.label())
    }
}

fn check_person_name(field: Field, value: &str) -> Option<String> {
    if !PERSON_NAME.is_match(value) {
        Some(format!("{} can only contain letters and spaces", field.label()))
    } else if value.chars().filter(|c| c.is_alphabetic()).count() < 3 {
        Some(format!("{} must be at least 3 characters", field.label()))
    } else {
        None
    }
}

fn check_mobile(field: Field, value: &str) -> Option<String> {
    (!MOBILE.is_match(value))
        .then(|| format!("{} must be a valid 10-digit number", field.label()))
}

fn check_date_of_birth(value: &str, today: NaiveDate) -> Option<String> {
    let Ok(dob) = NaiveDate::parse_from_str(value, "%Y-%m-%d") else {
        return Some("Enter the date as YYYY-MM-DD".to_string());
    };
    if dob > today {
        return Some("Date of birth cannot be in the future".to_string());
    }
    let mut age = today.year() - dob.year();
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
        age -= 1;
    }
    (age < MIN_AGE_YEARS).then(|| format!("You must be at least {MIN_AGE_YEARS} years old"))
}
