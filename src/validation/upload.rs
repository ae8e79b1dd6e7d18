//! File validator shared by every document upload.
//!
//! Trusts the MIME type reported by the file picker; the backend remains the
//! authority on real content validation.

use crate::draft::model::{DocumentSlot, UploadFile};

/// Largest accepted upload: 4 MiB.
pub const MAX_FILE_SIZE: u64 = 4 * 1024 * 1024;

const IMAGE_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png"];
const DOCUMENT_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "application/pdf"];

/// Which MIME types a slot accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptPolicy {
    ImagesOnly,
    ImagesOrPdf,
}

impl AcceptPolicy {
    /// `None` is the open-ended "other documents" list.
    pub fn for_slot(slot: Option<DocumentSlot>) -> Self {
        match slot {
            Some(DocumentSlot::ProfilePhoto) => Self::ImagesOnly,
            _ => Self::ImagesOrPdf,
        }
    }

    pub fn allowed_types(&self) -> &'static [&'static str] {
        match self {
            Self::ImagesOnly => IMAGE_TYPES,
            Self::ImagesOrPdf => DOCUMENT_TYPES,
        }
    }

    pub fn accepts(&self, mime_type: &str) -> bool {
        let mime = mime_type.trim();
        self.allowed_types()
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(mime))
    }

    fn formats(&self) -> &'static str {
        match self {
            Self::ImagesOnly => "JPG or PNG",
            Self::ImagesOrPdf => "JPG, PNG or PDF",
        }
    }
}

/// Why a file was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadRejection {
    #[error("Invalid file type ({mime_type}). Please upload a {formats} file.")]
    UnsupportedType {
        mime_type: String,
        formats: &'static str,
    },

    #[error("File size exceeds 4 MB limit. Selected file is {size}.")]
    TooLarge { size: String },
}

/// Check type first, then size.
pub fn validate_file(policy: AcceptPolicy, file: &UploadFile) -> Result<(), UploadRejection> {
    if !policy.accepts(&file.mime_type) {
        tracing::debug!(name = %file.name, mime = %file.mime_type, "Upload rejected: type");
        return Err(UploadRejection::UnsupportedType {
            mime_type: if file.mime_type.is_empty() {
                "unknown".to_string()
            } else {
                file.mime_type.clone()
            },
            formats: policy.formats(),
        });
    }

    if file.size() > MAX_FILE_SIZE {
        tracing::debug!(name = %file.name, size = file.size(), "Upload rejected: size");
        return Err(UploadRejection::TooLarge {
            size: format_file_size(file.size()),
        });
    }

    Ok(())
}

/// Render a byte count in base-1024 units with at most two decimals.
///
/// `0` → `0 Bytes`, `1536` → `1.5 KB`, `5 * 1024 * 1024` → `5 MB`.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{value:.2}");
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(mime: &str, size: usize) -> UploadFile {
        UploadFile::new("upload", mime, vec![0u8; size])
    }

    #[test]
    fn format_sizes() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5 MB");
        assert_eq!(format_file_size(4 * 1024 * 1024 + 1), "4 MB");
        assert_eq!(format_file_size(3 * 1024 * 1024 * 1024), "3 GB");
        assert_eq!(format_file_size(1_234_567), "1.18 MB");
    }

    #[test]
    fn size_boundary() {
        let policy = AcceptPolicy::ImagesOrPdf;
        assert!(validate_file(policy, &file("image/png", MAX_FILE_SIZE as usize)).is_ok());
        assert_eq!(
            validate_file(policy, &file("image/png", MAX_FILE_SIZE as usize + 1)),
            Err(UploadRejection::TooLarge {
                size: "4 MB".to_string()
            })
        );
    }

    #[test]
    fn five_mib_png_rejected_two_mib_accepted() {
        let policy = AcceptPolicy::for_slot(Some(DocumentSlot::PanCard));
        let err = validate_file(policy, &file("image/png", 5 * 1024 * 1024)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "File size exceeds 4 MB limit. Selected file is 5 MB."
        );
        assert!(validate_file(policy, &file("image/png", 2 * 1024 * 1024)).is_ok());
    }

    #[test]
    fn profile_photo_is_images_only() {
        let policy = AcceptPolicy::for_slot(Some(DocumentSlot::ProfilePhoto));
        assert!(validate_file(policy, &file("image/jpeg", 10)).is_ok());
        let err = validate_file(policy, &file("application/pdf", 10)).unwrap_err();
        assert!(matches!(err, UploadRejection::UnsupportedType { formats: "JPG or PNG", .. }));
    }

    #[test]
    fn documents_accept_pdf_but_not_other_types() {
        let policy = AcceptPolicy::for_slot(None);
        assert!(validate_file(policy, &file("application/pdf", 10)).is_ok());
        assert!(validate_file(policy, &file("IMAGE/PNG", 10)).is_ok());
        assert!(validate_file(policy, &file("image/gif", 10)).is_err());
        assert!(validate_file(policy, &file("", 10)).is_err());
    }

    #[test]
    fn type_is_checked_before_size() {
        let err = validate_file(AcceptPolicy::ImagesOrPdf, &file("text/plain", 5 * 1024 * 1024))
            .unwrap_err();
        assert!(matches!(err, UploadRejection::UnsupportedType { .. }));
    }

    #[test]
    fn rejects_iff_too_large_or_wrong_type() {
        let sizes = [0, 1, MAX_FILE_SIZE as usize, MAX_FILE_SIZE as usize + 1];
        let types = ["image/png", "image/jpeg", "application/pdf", "image/webp"];
        for policy in [AcceptPolicy::ImagesOnly, AcceptPolicy::ImagesOrPdf] {
            for size in sizes {
                for mime in types {
                    let expected_ok = size as u64 <= MAX_FILE_SIZE && policy.accepts(mime);
                    assert_eq!(
                        validate_file(policy, &file(mime, size)).is_ok(),
                        expected_ok,
                        "{policy:?} {mime} {size}"
                    );
                }
            }
        }
    }
}
