//! Export option validation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::validation::check::{read_value, run_checks, Check, ValidationError, ValidationResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Jpg,
    Png,
    Glb,
    Pdf,
}

impl ExportFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "jpg" => Some(Self::Jpg),
            "png" => Some(Self::Png),
            "glb" => Some(Self::Glb),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }
}

fn default_quality() -> f64 {
    0.9
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOptions {
    #[serde(default)]
    pub format: String,
    #[serde(default = "default_quality")]
    pub quality: f64,
    #[serde(default = "default_true")]
    pub include_metadata: bool,
    #[serde(default)]
    pub include_report: bool,
}

impl ExportOptions {
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            quality: default_quality(),
            include_metadata: true,
            include_report: false,
        }
    }
}

const EXPORT_CHECKS: &[Check<ExportOptions>] = &[
    Check {
        name: "format",
        message: "Invalid export format",
        passes: |o| ExportFormat::parse(&o.format).is_some(),
    },
    Check {
        name: "quality_range",
        message: "Quality must be between 0.1 and 1",
        passes: |o| (0.1..=1.0).contains(&o.quality),
    },
];

pub fn check_export_options(options: &ExportOptions) -> Result<(), ValidationError> {
    run_checks(EXPORT_CHECKS, options)
}

pub fn validate_export_options(options: &ExportOptions) -> ValidationResult {
    check_export_options(options).into()
}

pub fn parse_export_options(value: &Value) -> Result<ExportOptions, ValidationError> {
    let options: ExportOptions = read_value(value, "Invalid export options")?;
    check_export_options(&options)?;
    Ok(options)
}

pub fn validate_export_options_value(value: &Value) -> ValidationResult {
    parse_export_options(value).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_applied() {
        let options = parse_export_options(&json!({ "format": "pdf" })).unwrap();
        assert_eq!(options.quality, 0.9);
        assert!(options.include_metadata);
        assert!(!options.include_report);
    }

    #[test]
    fn test_rejects_unknown_format() {
        assert_eq!(
            validate_export_options(&ExportOptions::new("gif")).error.as_deref(),
            Some("Invalid export format")
        );
    }

    #[test]
    fn test_quality_bounds() {
        let mut options = ExportOptions::new("jpg");
        options.quality = 0.05;
        assert_eq!(check_export_options(&options).unwrap_err().check, "quality_range");
        options.quality = 0.1;
        assert!(check_export_options(&options).is_ok());
        options.quality = 1.0;
        assert!(check_export_options(&options).is_ok());
    }

    #[test]
    fn test_malformed_shape() {
        assert_eq!(
            validate_export_options_value(&json!({ "format": "png", "includeReport": 1 }))
                .error
                .as_deref(),
            Some("Invalid export options")
        );
    }
}
