//! Partner registration draft: the record the onboarding wizard edits.

pub mod field;
pub mod model;

pub use field::{Field, FieldGroup};
pub use model::{
    AccountType, Address, AddressType, BankDetails, BasicInfo, Documents, DocumentSlot, Draft,
    EmploymentType, Experience, Gender, GstBilling, LoanProduct, PartnerRole, PersonalDetails,
    RegistrationType, UploadFile,
};
