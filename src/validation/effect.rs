//! Effect validation.
//!
//! The intensity bound is the fixed range `[-1, 1]`. An effect's own
//! `min`/`max` describe the slider and are not used to bound `intensity`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::validation::check::{
    all_chars, char_len, read_value, run_checks, Check, ValidationError, ValidationResult,
};
use crate::validation::region::MAX_LABEL_LEN;

/// Lowest accepted intensity.
pub const INTENSITY_MIN: f64 = -1.0;
/// Highest accepted intensity.
pub const INTENSITY_MAX: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectType {
    Straighten,
    Align,
    Position,
    Brightness,
    Smoothness,
    Color,
}

impl EffectType {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "straighten" => Some(Self::Straighten),
            "align" => Some(Self::Align),
            "position" => Some(Self::Position),
            "brightness" => Some(Self::Brightness),
            "smoothness" => Some(Self::Smoothness),
            "color" => Some(Self::Color),
            _ => None,
        }
    }
}

fn default_min() -> f64 {
    -1.0
}

fn default_max() -> f64 {
    1.0
}

fn default_step() -> f64 {
    0.1
}

/// An adjustable effect bound to a slider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectDescriptor {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub effect_type: String,
    pub intensity: f64,
    #[serde(default = "default_min")]
    pub min: f64,
    #[serde(default = "default_max")]
    pub max: f64,
    #[serde(default = "default_step")]
    pub step: f64,
}

impl EffectDescriptor {
    /// Effect with the default slider range (-1..1, step 0.1).
    pub fn new(name: impl Into<String>, effect_type: impl Into<String>, intensity: f64) -> Self {
        Self {
            name: name.into(),
            effect_type: effect_type.into(),
            intensity,
            min: default_min(),
            max: default_max(),
            step: default_step(),
        }
    }

    pub fn kind(&self) -> Option<EffectType> {
        EffectType::parse(&self.effect_type)
    }
}

pub(crate) fn is_effect_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, ' ' | '-')
}

const EFFECT_CHECKS: &[Check<EffectDescriptor>] = &[
    Check {
        name: "name_required",
        message: "Effect name is required",
        passes: |e| !e.name.trim().is_empty(),
    },
    Check {
        name: "name_length",
        message: "Effect name too long",
        passes: |e| char_len(&e.name) <= MAX_LABEL_LEN,
    },
    Check {
        name: "name_charset",
        message: "Invalid characters in effect name",
        passes: |e| all_chars(&e.name, is_effect_name_char),
    },
    Check {
        name: "effect_type",
        message: "Invalid effect type",
        passes: |e| e.kind().is_some(),
    },
    Check {
        name: "intensity_min",
        message: "Intensity must be at least -1",
        passes: |e| e.intensity >= INTENSITY_MIN,
    },
    Check {
        name: "intensity_max",
        message: "Intensity must be at most 1",
        passes: |e| e.intensity <= INTENSITY_MAX,
    },
    Check {
        name: "step_positive",
        message: "Step must be greater than 0",
        passes: |e| e.step > 0.0,
    },
];

pub fn check_effect(effect: &EffectDescriptor) -> Result<(), ValidationError> {
    run_checks(EFFECT_CHECKS, effect)
}

/// Validate an effect descriptor.
pub fn validate_effect(effect: &EffectDescriptor) -> ValidationResult {
    check_effect(effect).into()
}

pub fn parse_effect(value: &Value) -> Result<EffectDescriptor, ValidationError> {
    let effect: EffectDescriptor = read_value(value, "Invalid effect data")?;
    check_effect(&effect)?;
    Ok(effect)
}

pub fn validate_effect_value(value: &Value) -> ValidationResult {
    parse_effect(value).into()
}
