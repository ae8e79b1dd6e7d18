//! Wizard steps and their validity predicates.

use std::collections::BTreeMap;
use std::fmt;

use crate::draft::{DocumentSlot, Draft, Field, FieldGroup};
use crate::validation::rules;

/// The six steps of the onboarding wizard, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WizardStep {
    BasicInfo,
    PersonalDetails,
    Address,
    BankDetails,
    Documents,
    Preview,
}

impl WizardStep {
    pub const ALL: [WizardStep; 6] = [
        Self::BasicInfo,
        Self::PersonalDetails,
        Self::Address,
        Self::BankDetails,
        Self::Documents,
        Self::Preview,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The following step, if any.
    pub fn next(&self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    /// The preceding step, if any.
    pub fn prev(&self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    pub fn is_last(&self) -> bool {
        matches!(self, Self::Preview)
    }

    /// Scalar fields this step owns.
    pub fn fields(&self) -> Vec<Field> {
        let group = match self {
            Self::BasicInfo => FieldGroup::Basic,
            Self::PersonalDetails => FieldGroup::Personal,
            Self::Address => FieldGroup::Address,
            Self::BankDetails => FieldGroup::Bank,
            Self::Documents | Self::Preview => return Vec::new(),
        };
        Field::ALL
            .iter()
            .copied()
            .filter(|f| f.group() == group)
            .collect()
    }

    /// The step whose form owns `field`.
    pub fn owning(field: Field) -> Self {
        match field.group() {
            FieldGroup::Basic => Self::BasicInfo,
            FieldGroup::Personal => Self::PersonalDetails,
            FieldGroup::Address => Self::Address,
            FieldGroup::Bank => Self::BankDetails,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::BasicInfo => "Basic Info",
            Self::PersonalDetails => "Personal Details",
            Self::Address => "Address",
            Self::BankDetails => "Bank Details",
            Self::Documents => "Documents",
            Self::Preview => "Preview",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}/{})", self.title(), self.index() + 1, Self::ALL.len())
    }
}

/// Anything a validation message can be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldKey {
    Field(Field),
    /// The email-verification gate on the first step.
    Otp,
    Document(DocumentSlot),
    OtherDocuments,
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(field) => write!(f, "{field}"),
            Self::Otp => f.write_str("otp"),
            Self::Document(slot) => write!(f, "{slot}"),
            Self::OtherDocuments => f.write_str("otherDocuments"),
        }
    }
}

/// Every failing rule of `step` against `draft`.
///
/// This is the single validation pass: the step gate is "no errors" and the
/// inline messages are these errors filtered to touched fields.
pub fn errors(step: WizardStep, draft: &Draft) -> BTreeMap<FieldKey, String> {
    let mut errors = BTreeMap::new();

    for field in step.fields() {
        if let Some(msg) = rules::validate(field, draft) {
            errors.insert(FieldKey::Field(field), msg);
        }
    }

    match step {
        WizardStep::BasicInfo if !draft.basic.otp_verified => {
            errors.insert(
                FieldKey::Otp,
                "Verify your email address to continue".to_string(),
            );
        }
        WizardStep::Documents => {
            for slot in rules::required_documents(draft) {
                if draft.documents.get(slot).is_none() {
                    errors.insert(FieldKey::Document(slot), format!("{} is required", slot.label()));
                }
            }
        }
        WizardStep::Preview => {
            for earlier in &WizardStep::ALL[..WizardStep::Preview.index()] {
                errors.extend(self::errors(*earlier, draft));
            }
        }
        _ => {}
    }

    errors
}

/// The step gate: whether the wizard may move past `step`.
pub fn is_valid(step: WizardStep, draft: &Draft) -> bool {
    errors(step, draft).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_walks_all_steps() {
        let mut current = WizardStep::BasicInfo;
        let mut visited = vec![current];
        while let Some(next) = current.next() {
            visited.push(next);
            current = next;
        }
        assert_eq!(visited, WizardStep::ALL.to_vec());
        assert!(current.is_last());
    }

    #[test]
    fn prev_stops_at_first() {
        assert_eq!(WizardStep::BasicInfo.prev(), None);
        assert_eq!(WizardStep::Preview.prev(), Some(WizardStep::Documents));
    }

    #[test]
    fn every_field_belongs_to_one_step() {
        let mut owned: Vec<Field> = WizardStep::ALL.iter().flat_map(|s| s.fields()).collect();
        owned.sort();
        let mut all = Field::ALL.to_vec();
        all.sort();
        assert_eq!(owned, all);
    }

    #[test]
    fn owning_step_lists_the_field() {
        for field in Field::ALL {
            assert!(WizardStep::owning(*field).fields().contains(field), "{field}");
        }
    }

    #[test]
    fn display_shows_position() {
        assert_eq!(WizardStep::BankDetails.to_string(), "Bank Details (4/6)");
    }

    #[test]
    fn empty_draft_fails_basic_info_with_otp() {
        let errors = errors(WizardStep::BasicInfo, &Draft::default());
        assert!(errors.contains_key(&FieldKey::Otp));
        assert!(errors.contains_key(&FieldKey::Field(Field::FullName)));
        assert!(!errors.contains_key(&FieldKey::Field(Field::TeamStrength)));
    }

    #[test]
    fn documents_step_lists_missing_slots() {
        let errors = errors(WizardStep::Documents, &Draft::default());
        assert_eq!(errors.len(), 5);
        assert!(!errors.contains_key(&FieldKey::Document(DocumentSlot::GstCertificate)));
    }

    #[test]
    fn preview_collects_every_step() {
        let preview = errors(WizardStep::Preview, &Draft::default());
        for step in &WizardStep::ALL[..5] {
            for key in errors(*step, &Draft::default()).keys() {
                assert!(preview.contains_key(key), "{key} missing from preview");
            }
        }
    }
}
