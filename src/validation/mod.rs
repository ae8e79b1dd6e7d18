//! Pure validation: field rules, conditional requirements and uploads.

pub mod rules;
pub mod upload;

pub use rules::{
    conditional_fields, is_conditional, is_required, required_documents, validate,
    validate_otp_code,
};
pub use upload::{AcceptPolicy, MAX_FILE_SIZE, UploadRejection, format_file_size, validate_file};
