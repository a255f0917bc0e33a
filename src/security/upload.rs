//! Upload screening.
//!
//! Runs on the raw client-supplied file name, before sanitization, to catch
//! names that are hostile rather than merely untidy.

use crate::validation::file::{FileDescriptor, MAX_FILE_SIZE};

const FORBIDDEN_NAME_CHARS: &[char] = &['<', '>', ':', '"', '|', '?', '*'];

const EXECUTABLE_EXTENSIONS: &[&str] = &[
    "exe", "bat", "cmd", "com", "pif", "scr", "vbs", "js", "jar", "php", "asp", "aspx", "jsp",
];

/// Reason an upload was refused by screening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UploadRejection {
    #[error("File size exceeds 10MB limit")]
    TooLarge,
    #[error("Invalid file type. Only JPEG, PNG, and WebP are allowed")]
    DisallowedType,
    #[error("Invalid file name detected")]
    SuspiciousName,
}

impl UploadRejection {
    pub fn reason(self) -> &'static str {
        match self {
            Self::TooLarge => "too_large",
            Self::DisallowedType => "disallowed_type",
            Self::SuspiciousName => "suspicious_name",
        }
    }
}

/// Screen an upload's size, type and name.
pub fn screen_upload(file: &FileDescriptor) -> Result<(), UploadRejection> {
    if file.size > MAX_FILE_SIZE {
        return Err(UploadRejection::TooLarge);
    }
    if file.format().is_none() {
        return Err(UploadRejection::DisallowedType);
    }
    if is_suspicious_name(&file.name) {
        return Err(UploadRejection::SuspiciousName);
    }
    Ok(())
}

/// Directory traversal, shell metacharacters, reserved device names, or an
/// executable extension.
pub fn is_suspicious_name(name: &str) -> bool {
    name.contains("..")
        || name.contains(FORBIDDEN_NAME_CHARS)
        || is_reserved_device_name(name)
        || has_executable_extension(name)
}

fn is_reserved_device_name(name: &str) -> bool {
    let upper = name.to_ascii_uppercase();
    match upper.as_str() {
        "CON" | "PRN" | "AUX" | "NUL" => true,
        _ => {
            let bytes = upper.as_bytes();
            bytes.len() == 4
                && (upper.starts_with("COM") || upper.starts_with("LPT"))
                && (b'1'..=b'9').contains(&bytes[3])
        }
    }
}

fn has_executable_extension(name: &str) -> bool {
    name.rsplit_once('.')
        .map(|(_, ext)| {
            EXECUTABLE_EXTENSIONS
                .iter()
                .any(|candidate| ext.eq_ignore_ascii_case(candidate))
        })
        .unwrap_or(false)
}
