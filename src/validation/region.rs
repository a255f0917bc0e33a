//! Edit region validation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::validation::check::{
    all_chars, char_len, read_value, run_checks, Check, ValidationError, ValidationResult,
};

/// Maximum region/effect label length in characters.
pub const MAX_LABEL_LEN: usize = 50;

/// Kinds of region a user can mark on an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionType {
    Posture,
    Cosmetic,
    Repair,
    Enhancement,
}

impl RegionType {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "posture" => Some(Self::Posture),
            "cosmetic" => Some(Self::Cosmetic),
            "repair" => Some(Self::Repair),
            "enhancement" => Some(Self::Enhancement),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Posture => "posture",
            Self::Cosmetic => "cosmetic",
            Self::Repair => "repair",
            Self::Enhancement => "enhancement",
        }
    }
}

/// A candidate region as submitted by a form or API body.
///
/// `region_type` stays a raw string so an unknown type is reported by the
/// region checks rather than rejected as malformed input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionDescriptor {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub region_type: String,
}

impl RegionDescriptor {
    pub fn new(name: impl Into<String>, region_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            region_type: region_type.into(),
        }
    }

    pub fn kind(&self) -> Option<RegionType> {
        RegionType::parse(&self.region_type)
    }
}

pub(crate) fn is_region_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '(' | ')')
}

const REGION_CHECKS: &[Check<RegionDescriptor>] = &[
    Check {
        name: "name_required",
        message: "Region name is required",
        passes: |r| !r.name.trim().is_empty(),
    },
    Check {
        name: "name_length",
        message: "Region name too long",
        passes: |r| char_len(&r.name) <= MAX_LABEL_LEN,
    },
    Check {
        name: "name_charset",
        message: "Invalid characters in region name",
        passes: |r| all_chars(&r.name, is_region_name_char),
    },
    Check {
        name: "region_type",
        message: "Invalid region type",
        passes: |r| r.kind().is_some(),
    },
];

pub fn check_region(region: &RegionDescriptor) -> Result<(), ValidationError> {
    run_checks(REGION_CHECKS, region)
}

/// Validate a region descriptor.
pub fn validate_region(region: &RegionDescriptor) -> ValidationResult {
    check_region(region).into()
}

pub fn parse_region(value: &Value) -> Result<RegionDescriptor, ValidationError> {
    let region: RegionDescriptor = read_value(value, "Invalid region data")?;
    check_region(&region)?;
    Ok(region)
}

pub fn validate_region_value(value: &Value) -> ValidationResult {
    parse_region(value).into()
}
