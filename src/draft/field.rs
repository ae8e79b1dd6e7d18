//! Addressable scalar fields of the draft.
//!
//! Every text or selector input maps to one [`Field`]. Views and the terminal
//! front-end set values through [`Draft::set`] using the field's wire name,
//! and read them back through [`Draft::get`].

use std::fmt;
use std::str::FromStr;

use super::model::Draft;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    // Basic info
    FullName,
    MobileNumber,
    Email,
    RegistrationType,
    TeamStrength,
    // Personal details
    Gender,
    DateOfBirth,
    EmploymentType,
    EmergencyContact,
    FocusProduct,
    Experience,
    Role,
    // Address
    AddressLine1,
    AddressLine2,
    Landmark,
    City,
    Pincode,
    AddressType,
    // Bank details
    AccountType,
    HolderName,
    RelationshipWithHolder,
    BankName,
    AccountNumber,
    ConfirmAccountNumber,
    IfscCode,
    BranchName,
    GstBilling,
}

impl Field {
    pub const ALL: &'static [Field] = &[
        Self::FullName,
        Self::MobileNumber,
        Self::Email,
        Self::RegistrationType,
        Self::TeamStrength,
        Self::Gender,
        Self::DateOfBirth,
        Self::EmploymentType,
        Self::EmergencyContact,
        Self::FocusProduct,
        Self::Experience,
        Self::Role,
        Self::AddressLine1,
        Self::AddressLine2,
        Self::Landmark,
        Self::City,
        Self::Pincode,
        Self::AddressType,
        Self::AccountType,
        Self::HolderName,
        Self::RelationshipWithHolder,
        Self::BankName,
        Self::AccountNumber,
        Self::ConfirmAccountNumber,
        Self::IfscCode,
        Self::BranchName,
        Self::GstBilling,
    ];

    /// camelCase leaf name, unique across the draft.
    pub fn name(&self) -> &'static str {
        match self {
            Self::FullName => "fullName",
            Self::MobileNumber => "mobileNumber",
            Self::Email => "email",
            Self::RegistrationType => "registrationType",
            Self::TeamStrength => "teamStrength",
            Self::Gender => "gender",
            Self::DateOfBirth => "dateOfBirth",
            Self::EmploymentType => "employmentType",
            Self::EmergencyContact => "emergencyContact",
            Self::FocusProduct => "focusProduct",
            Self::Experience => "experience",
            Self::Role => "role",
            Self::AddressLine1 => "addressLine1",
            Self::AddressLine2 => "addressLine2",
            Self::Landmark => "landmark",
            Self::City => "city",
            Self::Pincode => "pincode",
            Self::AddressType => "addressType",
            Self::AccountType => "accountType",
            Self::HolderName => "holderName",
            Self::RelationshipWithHolder => "relationshipWithHolder",
            Self::BankName => "bankName",
            Self::AccountNumber => "accountNumber",
            Self::ConfirmAccountNumber => "confirmAccountNumber",
            Self::IfscCode => "ifscCode",
            Self::BranchName => "branchName",
            Self::GstBilling => "isGstBillingApplicable",
        }
    }

    /// Human-readable label used in validation messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::FullName => "Full name",
            Self::MobileNumber => "Mobile number",
            Self::Email => "Email",
            Self::RegistrationType => "Registration type",
            Self::TeamStrength => "Team strength",
            Self::Gender => "Gender",
            Self::DateOfBirth => "Date of birth",
            Self::EmploymentType => "Employment type",
            Self::EmergencyContact => "Emergency contact",
            Self::FocusProduct => "Focus product",
            Self::Experience => "Experience",
            Self::Role => "Role",
            Self::AddressLine1 => "Address line 1",
            Self::AddressLine2 => "Address line 2",
            Self::Landmark => "Landmark",
            Self::City => "City",
            Self::Pincode => "Pincode",
            Self::AddressType => "Address type",
            Self::AccountType => "Account type",
            Self::HolderName => "Account holder name",
            Self::RelationshipWithHolder => "Relationship with account holder",
            Self::BankName => "Bank name",
            Self::AccountNumber => "Account number",
            Self::ConfirmAccountNumber => "Confirm account number",
            Self::IfscCode => "IFSC code",
            Self::BranchName => "Branch name",
            Self::GstBilling => "GST billing applicable",
        }
    }

    pub fn group(&self) -> FieldGroup {
        match self {
            Self::FullName
            | Self::MobileNumber
            | Self::Email
            | Self::RegistrationType
            | Self::TeamStrength => FieldGroup::Basic,
            Self::Gender
            | Self::DateOfBirth
            | Self::EmploymentType
            | Self::EmergencyContact
            | Self::FocusProduct
            | Self::Experience
            | Self::Role => FieldGroup::Personal,
            Self::AddressLine1
            | Self::AddressLine2
            | Self::Landmark
            | Self::City
            | Self::Pincode
            | Self::AddressType => FieldGroup::Address,
            _ => FieldGroup::Bank,
        }
    }

    /// Whether the field holds a closed selector rather than free text.
    pub fn is_choice(&self) -> bool {
        matches!(
            self,
            Self::RegistrationType
                | Self::Gender
                | Self::EmploymentType
                | Self::FocusProduct
                | Self::Experience
                | Self::Role
                | Self::AddressType
                | Self::AccountType
                | Self::GstBilling
        )
    }
}

/// Which section of the draft a field belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldGroup {
    Basic,
    Personal,
    Address,
    Bank,
}

impl FieldGroup {
    /// Dotted prefix used for the group's keys in the submission form.
    /// Basic info is submitted with flat keys.
    pub fn prefix(&self) -> Option<&'static str> {
        match self {
            Self::Basic => None,
            Self::Personal => Some("personalDetails"),
            Self::Address => Some("address"),
            Self::Bank => Some("bankDetails"),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .iter()
            .copied()
            .find(|f| f.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown field: {s}"))
    }
}

fn parse_choice<T: FromStr<Err = String>>(raw: &str) -> Result<Option<T>, String> {
    if raw.trim().is_empty() {
        Ok(None)
    } else {
        raw.parse().map(Some)
    }
}

fn show<T: fmt::Display>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

impl Draft {
    /// Current value of a field, rendered as its input text.
    pub fn get(&self, field: Field) -> String {
        let b = &self.basic;
        let p = &self.personal;
        let a = &self.address;
        let k = &self.bank;
        match field {
            Field::FullName => b.full_name.clone(),
            Field::MobileNumber => b.mobile_number.clone(),
            Field::Email => b.email.clone(),
            Field::RegistrationType => show(&b.registration_type),
            Field::TeamStrength => b.team_strength.clone(),
            Field::Gender => show(&p.gender),
            Field::DateOfBirth => p.date_of_birth.clone(),
            Field::EmploymentType => show(&p.employment_type),
            Field::EmergencyContact => p.emergency_contact.clone(),
            Field::FocusProduct => show(&p.focus_product),
            Field::Experience => show(&p.experience),
            Field::Role => show(&p.role),
            Field::AddressLine1 => a.line1.clone(),
            Field::AddressLine2 => a.line2.clone(),
            Field::Landmark => a.landmark.clone(),
            Field::City => a.city.clone(),
            Field::Pincode => a.pincode.clone(),
            Field::AddressType => show(&a.address_type),
            Field::AccountType => show(&k.account_type),
            Field::HolderName => k.holder_name.clone(),
            Field::RelationshipWithHolder => k.relationship_with_holder.clone(),
            Field::BankName => k.bank_name.clone(),
            Field::AccountNumber => k.account_number.clone(),
            Field::ConfirmAccountNumber => k.confirm_account_number.clone(),
            Field::IfscCode => k.ifsc_code.clone(),
            Field::BranchName => k.branch_name.clone(),
            Field::GstBilling => show(&k.gst_billing),
        }
    }

    /// Overwrite one field. Input is trimmed first, so stored text never
    /// carries surrounding whitespace. Selector fields must parse to one of
    /// their wire names; an empty value clears them. The IFSC code is
    /// upper-cased.
    pub fn set(&mut self, field: Field, raw: &str) -> Result<(), String> {
        let raw = raw.trim();
        let text = raw.to_string();
        match field {
            Field::FullName => self.basic.full_name = text,
            Field::MobileNumber => self.basic.mobile_number = text,
            Field::Email => self.basic.email = text,
            Field::RegistrationType => self.basic.registration_type = parse_choice(raw)?,
            Field::TeamStrength => self.basic.team_strength = text,
            Field::Gender => self.personal.gender = parse_choice(raw)?,
            Field::DateOfBirth => self.personal.date_of_birth = text,
            Field::EmploymentType => self.personal.employment_type = parse_choice(raw)?,
            Field::EmergencyContact => self.personal.emergency_contact = text,
            Field::FocusProduct => self.personal.focus_product = parse_choice(raw)?,
            Field::Experience => self.personal.experience = parse_choice(raw)?,
            Field::Role => self.personal.role = parse_choice(raw)?,
            Field::AddressLine1 => self.address.line1 = text,
            Field::AddressLine2 => self.address.line2 = text,
            Field::Landmark => self.address.landmark = text,
            Field::City => self.address.city = text,
            Field::Pincode => self.address.pincode = text,
            Field::AddressType => self.address.address_type = parse_choice(raw)?,
            Field::AccountType => self.bank.account_type = parse_choice(raw)?,
            Field::HolderName => self.bank.holder_name = text,
            Field::RelationshipWithHolder => self.bank.relationship_with_holder = text,
            Field::BankName => self.bank.bank_name = text,
            Field::AccountNumber => self.bank.account_number = text,
            Field::ConfirmAccountNumber => self.bank.confirm_account_number = text,
            Field::IfscCode => self.bank.ifsc_code = text.to_ascii_uppercase(),
            Field::BranchName => self.bank.branch_name = text,
            Field::GstBilling => self.bank.gst_billing = parse_choice(raw)?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::model::{AccountType, RegistrationType};

    #[test]
    fn names_are_unique() {
        let mut names: Vec<&str> = Field::ALL.iter().map(|f| f.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Field::ALL.len());
    }

    #[test]
    fn field_parses_from_name() {
        for field in Field::ALL {
            assert_eq!(field.name().parse::<Field>(), Ok(*field));
        }
        assert_eq!("FULLNAME".parse::<Field>(), Ok(Field::FullName));
        assert!("nickname".parse::<Field>().is_err());
    }

    #[test]
    fn set_then_get_every_text_field() {
        let mut draft = Draft::default();
        for field in Field::ALL.iter().filter(|f| !f.is_choice()) {
            draft.set(*field, "ABC123").unwrap();
            assert_eq!(draft.get(*field), "ABC123", "{field}");
        }
    }

    #[test]
    fn set_choice_fields() {
        let mut draft = Draft::default();
        draft.set(Field::RegistrationType, "company").unwrap();
        assert_eq!(draft.basic.registration_type, Some(RegistrationType::Company));
        assert_eq!(draft.get(Field::RegistrationType), "Company");

        draft.set(Field::AccountType, "").unwrap();
        assert_eq!(draft.bank.account_type, None);

        let err = draft.set(Field::AccountType, "Joint").unwrap_err();
        assert!(err.contains("Savings"));
        assert_eq!(draft.bank.account_type, None);

        draft.set(Field::AccountType, "current").unwrap();
        assert_eq!(draft.bank.account_type, Some(AccountType::Current));
    }

    #[test]
    fn set_trims_input() {
        let mut draft = Draft::default();
        draft.set(Field::FullName, "  Asha Rao ").unwrap();
        draft.set(Field::Gender, " female\t").unwrap();
        draft.set(Field::IfscCode, " hdfc0001234\n").unwrap();
        assert_eq!(draft.basic.full_name, "Asha Rao");
        assert_eq!(draft.get(Field::Gender), "Female");
        assert_eq!(draft.bank.ifsc_code, "HDFC0001234");

        draft.set(Field::Landmark, "   ").unwrap();
        assert_eq!(draft.address.landmark, "");
    }

    #[test]
    fn ifsc_is_upper_cased() {
        let mut draft = Draft::default();
        draft.set(Field::IfscCode, "hdfc0001234").unwrap();
        assert_eq!(draft.bank.ifsc_code, "HDFC0001234");
    }
}
