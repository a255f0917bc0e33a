//! Uploaded file descriptor validation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::validation::check::{
    all_chars, char_len, read_value, run_checks, Check, ValidationError, ValidationResult,
};

/// Maximum accepted upload size (10 MiB).
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Maximum file name length in characters.
pub const MAX_FILE_NAME_LEN: usize = 255;

/// Image formats accepted for upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpeg,
    Png,
    Webp,
}

impl ImageFormat {
    /// Resolve a MIME type, returning `None` for anything outside the allowed set.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "image/jpeg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/webp" => Some(Self::Webp),
            _ => None,
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Webp => "webp",
        }
    }
}

/// Metadata of a candidate upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    #[serde(default)]
    pub name: String,
    pub size: u64,
    #[serde(rename = "type", default)]
    pub mime_type: String,
}

impl FileDescriptor {
    pub fn new(name: impl Into<String>, size: u64, mime_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size,
            mime_type: mime_type.into(),
        }
    }

    /// The accepted format of this file, if any.
    pub fn format(&self) -> Option<ImageFormat> {
        ImageFormat::from_mime(&self.mime_type)
    }
}

pub(crate) fn is_file_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')
}

const FILE_CHECKS: &[Check<FileDescriptor>] = &[
    Check {
        name: "name_required",
        message: "File name is required",
        passes: |f| !f.name.is_empty(),
    },
    Check {
        name: "name_length",
        message: "File name too long",
        passes: |f| char_len(&f.name) <= MAX_FILE_NAME_LEN,
    },
    Check {
        name: "name_charset",
        message: "Invalid file name characters",
        passes: |f| all_chars(&f.name, is_file_name_char),
    },
    Check {
        name: "size_min",
        message: "File cannot be empty",
        passes: |f| f.size >= 1,
    },
    Check {
        name: "size_max",
        message: "File size must be less than 10MB",
        passes: |f| f.size <= MAX_FILE_SIZE,
    },
    Check {
        name: "mime_type",
        message: "Only JPEG, PNG, and WebP images are allowed",
        passes: |f| f.format().is_some(),
    },
];

/// Run the file checks, returning the first failure.
pub fn check_file(file: &FileDescriptor) -> Result<(), ValidationError> {
    run_checks(FILE_CHECKS, file)
}

/// Validate a file descriptor.
pub fn validate_file(file: &FileDescriptor) -> ValidationResult {
    check_file(file).into()
}

/// Read and validate an untyped file descriptor.
pub fn parse_file(value: &Value) -> Result<FileDescriptor, ValidationError> {
    let file: FileDescriptor = read_value(value, "Invalid file")?;
    check_file(&file)?;
    Ok(file)
}

pub fn validate_file_value(value: &Value) -> ValidationResult {
    parse_file(value).into()
}
