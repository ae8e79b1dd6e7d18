//! Partner onboarding wizard.
//!
//! Six steps (basic info, personal details, address, bank details, documents,
//! preview) edit one shared [`Draft`](crate::draft::Draft). Each step has a
//! validity predicate that gates "Continue"; the first step also requires the
//! email to be verified by OTP. The preview step submits the whole draft as a
//! single multipart request.

pub mod controller;
pub mod otp;
pub mod steps;

pub use controller::{WizardController, WizardStatus};
pub use otp::{OtpFlow, OtpState};
pub use steps::{FieldKey, WizardStep};
