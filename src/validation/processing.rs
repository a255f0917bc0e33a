//! Processing request validation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::validation::check::{
    non_null, read_value, run_checks, Check, ValidationError, ValidationResult,
};
use crate::validation::effect::{INTENSITY_MAX, INTENSITY_MIN};

/// One edit to apply: an effect at an intensity on a named region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditInstruction {
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub effect: String,
    pub intensity: f64,
}

/// Optional artifacts requested alongside the processed image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingOptions {
    #[serde(
        rename = "generate3D",
        default,
        deserialize_with = "non_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub generate_3d: Option<bool>,
    #[serde(
        rename = "includeReport",
        default,
        deserialize_with = "non_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub include_report: Option<bool>,
}

/// Body of a processing request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingRequest {
    #[serde(rename = "fileId", default)]
    pub file_id: String,
    #[serde(default)]
    pub edits: Vec<EditInstruction>,
    #[serde(default, deserialize_with = "non_null", skip_serializing_if = "Option::is_none")]
    pub options: Option<ProcessingOptions>,
}

impl ProcessingRequest {
    pub fn wants_3d(&self) -> bool {
        self.options.as_ref().and_then(|o| o.generate_3d).unwrap_or(false)
    }

    pub fn wants_report(&self) -> bool {
        self.options.as_ref().and_then(|o| o.include_report).unwrap_or(false)
    }
}

const REQUEST_CHECKS: &[Check<ProcessingRequest>] = &[
    Check {
        name: "file_id_required",
        message: "File ID is required",
        passes: |r| !r.file_id.is_empty(),
    },
    Check {
        name: "edits_required",
        message: "At least one edit is required",
        passes: |r| !r.edits.is_empty(),
    },
];

const EDIT_CHECKS: &[Check<EditInstruction>] = &[
    Check {
        name: "edit_region_required",
        message: "Region is required",
        passes: |e| !e.region.is_empty(),
    },
    Check {
        name: "edit_effect_required",
        message: "Effect is required",
        passes: |e| !e.effect.is_empty(),
    },
    Check {
        name: "edit_intensity_range",
        message: "Intensity must be between -1 and 1",
        passes: |e| (INTENSITY_MIN..=INTENSITY_MAX).contains(&e.intensity),
    },
];

/// Check the request, then each edit in order.
pub fn check_processing_request(request: &ProcessingRequest) -> Result<(), ValidationError> {
    run_checks(REQUEST_CHECKS, request)?;
    request
        .edits
        .iter()
        .try_for_each(|edit| run_checks(EDIT_CHECKS, edit))
}

pub fn validate_processing_request(request: &ProcessingRequest) -> ValidationResult {
    check_processing_request(request).into()
}

pub fn parse_processing_request(value: &Value) -> Result<ProcessingRequest, ValidationError> {
    let request: ProcessingRequest = read_value(value, "Invalid processing request")?;
    check_processing_request(&request)?;
    Ok(request)
}

pub fn validate_processing_request_value(value: &Value) -> ValidationResult {
    parse_processing_request(value).into()
}
