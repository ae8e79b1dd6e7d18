//! Draft record and its selector enums.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::validation::upload::{self, UploadRejection};

/// Declares a closed selector enum with a fixed wire name per variant.
///
/// Wire names are what the backend stores and what the terminal front-end
/// accepts; parsing is case-insensitive.
macro_rules! choice_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $wire)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s))
                    .ok_or_else(|| {
                        let options: Vec<&str> = $name::ALL.iter().map(|v| v.as_str()).collect();
                        format!("expected one of: {}", options.join(", "))
                    })
            }
        }
    };
}

choice_enum!(
    /// How the partner registers with the portal.
    RegistrationType {
        Individual => "Individual",
        Partnership => "Partnership",
        Company => "Company",
    }
);

choice_enum!(Gender {
    Male => "Male",
    Female => "Female",
    Other => "Other",
});

choice_enum!(EmploymentType {
    Salaried => "Salaried",
    SelfEmployed => "Self-Employed",
    Business => "Business",
});

choice_enum!(
    /// Loan product the partner mainly sources.
    LoanProduct {
        HomeLoan => "Home Loan",
        PersonalLoan => "Personal Loan",
        BusinessLoan => "Business Loan",
        LoanAgainstProperty => "Loan Against Property",
        CarLoan => "Car Loan",
    }
);

choice_enum!(Experience {
    UnderOneYear => "0-1 Years",
    OneToThree => "1-3 Years",
    ThreeToFive => "3-5 Years",
    FivePlus => "5+ Years",
});

choice_enum!(
    /// Whether the partner only shares leads or also handles loan files.
    PartnerRole {
        LeadSharing => "lead-sharing",
        FileSharing => "file-sharing",
    }
);

choice_enum!(AddressType {
    Residential => "Residential",
    Office => "Office",
});

choice_enum!(AccountType {
    Savings => "Savings",
    Current => "Current",
    Others => "Others",
});

choice_enum!(GstBilling {
    Yes => "Yes",
    No => "No",
});

/// Identity and contact details (step 1).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasicInfo {
    pub full_name: String,
    pub mobile_number: String,
    pub email: String,
    pub registration_type: Option<RegistrationType>,
    /// Only required when registering as something other than an individual.
    pub team_strength: String,
    /// Set by a successful OTP verification, cleared only by a wizard reset.
    pub otp_verified: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonalDetails {
    pub gender: Option<Gender>,
    /// Raw `YYYY-MM-DD` input.
    pub date_of_birth: String,
    pub employment_type: Option<EmploymentType>,
    pub emergency_contact: String,
    pub focus_product: Option<LoanProduct>,
    pub experience: Option<Experience>,
    pub role: Option<PartnerRole>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Address {
    pub line1: String,
    pub line2: String,
    pub landmark: String,
    pub city: String,
    pub pincode: String,
    pub address_type: Option<AddressType>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BankDetails {
    pub account_type: Option<AccountType>,
    pub holder_name: String,
    pub relationship_with_holder: String,
    pub bank_name: String,
    pub account_number: String,
    pub confirm_account_number: String,
    pub ifsc_code: String,
    pub branch_name: String,
    /// Only required for current and "others" accounts.
    pub gst_billing: Option<GstBilling>,
}

/// A file handed over by the file picker.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    /// MIME type as reported by the picker. Never sniffed from the content.
    pub mime_type: String,
    pub content: Vec<u8>,
}

impl UploadFile {
    /// The reported MIME type is stored trimmed and lower-cased.
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: normalize_mime(&mime_type.into()),
            content,
        }
    }

    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }
}

fn normalize_mime(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

impl fmt::Debug for UploadFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadFile")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("size", &upload::format_file_size(self.size()))
            .finish()
    }
}

/// Named upload targets with a fixed purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DocumentSlot {
    ProfilePhoto,
    PanCard,
    AadharFront,
    AadharBack,
    CancelledCheque,
    GstCertificate,
}

impl DocumentSlot {
    pub const ALL: &'static [DocumentSlot] = &[
        Self::ProfilePhoto,
        Self::PanCard,
        Self::AadharFront,
        Self::AadharBack,
        Self::CancelledCheque,
        Self::GstCertificate,
    ];

    /// Multipart key the slot is submitted under.
    pub fn key(&self) -> &'static str {
        match self {
            Self::ProfilePhoto => "profilePhoto",
            Self::PanCard => "panCard",
            Self::AadharFront => "aadharFront",
            Self::AadharBack => "aadharBack",
            Self::CancelledCheque => "cancelledCheque",
            Self::GstCertificate => "gstCertificate",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::ProfilePhoto => "Profile photo",
            Self::PanCard => "PAN card",
            Self::AadharFront => "Aadhar card (front)",
            Self::AadharBack => "Aadhar card (back)",
            Self::CancelledCheque => "Cancelled cheque",
            Self::GstCertificate => "GST certificate",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.key().eq_ignore_ascii_case(key))
    }
}

impl fmt::Display for DocumentSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Uploaded documents (step 5).
///
/// Files only get in through [`Documents::put`] and [`Documents::push_other`],
/// both of which run the file validator, so every stored file has already
/// passed and is never checked again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Documents {
    profile_photo: Option<UploadFile>,
    pan_card: Option<UploadFile>,
    aadhar_front: Option<UploadFile>,
    aadhar_back: Option<UploadFile>,
    cancelled_cheque: Option<UploadFile>,
    gst_certificate: Option<UploadFile>,
    others: Vec<UploadFile>,
}

impl Documents {
    pub fn get(&self, slot: DocumentSlot) -> Option<&UploadFile> {
        self.slot(slot).as_ref()
    }

    /// Validate and store a file in a named slot, replacing any previous one.
    pub fn put(
        &mut self,
        slot: DocumentSlot,
        mut file: UploadFile,
    ) -> Result<(), UploadRejection> {
        file.mime_type = normalize_mime(&file.mime_type);
        upload::validate_file(upload::AcceptPolicy::for_slot(Some(slot)), &file)?;
        *self.slot_mut(slot) = Some(file);
        Ok(())
    }

    pub fn take(&mut self, slot: DocumentSlot) -> Option<UploadFile> {
        self.slot_mut(slot).take()
    }

    pub fn others(&self) -> &[UploadFile] {
        &self.others
    }

    /// Validate and append an "other" document.
    pub fn push_other(&mut self, mut file: UploadFile) -> Result<(), UploadRejection> {
        file.mime_type = normalize_mime(&file.mime_type);
        upload::validate_file(upload::AcceptPolicy::for_slot(None), &file)?;
        self.others.push(file);
        Ok(())
    }

    pub fn remove_other(&mut self, index: usize) -> Option<UploadFile> {
        (index < self.others.len()).then(|| self.others.remove(index))
    }

    fn slot(&self, slot: DocumentSlot) -> &Option<UploadFile> {
        match slot {
            DocumentSlot::ProfilePhoto => &self.profile_photo,
            DocumentSlot::PanCard => &self.pan_card,
            DocumentSlot::AadharFront => &self.aadhar_front,
            DocumentSlot::AadharBack => &self.aadhar_back,
            DocumentSlot::CancelledCheque => &self.cancelled_cheque,
            DocumentSlot::GstCertificate => &self.gst_certificate,
        }
    }

    fn slot_mut(&mut self, slot: DocumentSlot) -> &mut Option<UploadFile> {
        match slot {
            DocumentSlot::ProfilePhoto => &mut self.profile_photo,
            DocumentSlot::PanCard => &mut self.pan_card,
            DocumentSlot::AadharFront => &mut self.aadhar_front,
            DocumentSlot::AadharBack => &mut self.aadhar_back,
            DocumentSlot::CancelledCheque => &mut self.cancelled_cheque,
            DocumentSlot::GstCertificate => &mut self.gst_certificate,
        }
    }
}

/// The in-memory, not-yet-submitted partner registration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub basic: BasicInfo,
    pub personal: PersonalDetails,
    pub address: Address,
    pub bank: BankDetails,
    pub documents: Documents,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choice_parsing_is_case_insensitive() {
        assert_eq!("individual".parse::<RegistrationType>(), Ok(RegistrationType::Individual));
        assert_eq!("LEAD-SHARING".parse::<PartnerRole>(), Ok(PartnerRole::LeadSharing));
        assert_eq!(
            " loan against property ".parse::<LoanProduct>(),
            Ok(LoanProduct::LoanAgainstProperty)
        );
    }

    #[test]
    fn choice_parse_error_lists_options() {
        let err = "Joint".parse::<AccountType>().unwrap_err();
        assert_eq!(err, "expected one of: Savings, Current, Others");
    }

    #[test]
    fn display_matches_serde() {
        for ty in EmploymentType::ALL {
            let json = serde_json::to_string(ty).unwrap();
            assert_eq!(json, format!("\"{ty}\""));
        }
    }

    #[test]
    fn put_rejects_invalid_file_without_storing() {
        let mut docs = Documents::default();
        let pdf = UploadFile::new("me.pdf", "application/pdf", vec![0; 10]);
        assert!(docs.put(DocumentSlot::ProfilePhoto, pdf).is_err());
        assert!(docs.get(DocumentSlot::ProfilePhoto).is_none());

        let png = UploadFile::new("me.png", "image/png", vec![0; 10]);
        docs.put(DocumentSlot::ProfilePhoto, png.clone()).unwrap();
        assert_eq!(docs.get(DocumentSlot::ProfilePhoto), Some(&png));
    }

    #[test]
    fn other_documents_keep_order() {
        let mut docs = Documents::default();
        docs.push_other(UploadFile::new("a.pdf", "application/pdf", vec![1])).unwrap();
        docs.push_other(UploadFile::new("b.jpg", "image/jpeg", vec![2])).unwrap();
        assert_eq!(docs.others()[1].name, "b.jpg");

        assert_eq!(docs.remove_other(0).unwrap().name, "a.pdf");
        assert!(docs.remove_other(5).is_none());
        assert_eq!(docs.others().len(), 1);
    }

    #[test]
    fn mime_type_is_normalized_on_the_way_in() {
        let file = UploadFile::new("pan.png", " Image/PNG ", vec![1]);
        assert_eq!(file.mime_type, "image/png");

        // Files built by hand are normalized when they enter the draft.
        let raw = UploadFile {
            name: "cheque.pdf".into(),
            mime_type: "APPLICATION/PDF\n".into(),
            content: vec![1],
        };
        let mut docs = Documents::default();
        docs.put(DocumentSlot::CancelledCheque, raw.clone()).unwrap();
        docs.push_other(raw).unwrap();
        assert_eq!(
            docs.get(DocumentSlot::CancelledCheque).unwrap().mime_type,
            "application/pdf"
        );
        assert_eq!(docs.others()[0].mime_type, "application/pdf");
    }

    #[test]
    fn upload_file_debug_omits_content() {
        let file = UploadFile::new("pan.png", "image/png", vec![7; 2048]);
        let debug = format!("{file:?}");
        assert!(debug.contains("2 KB"));
        assert!(!debug.contains("7, 7"));
    }
}
