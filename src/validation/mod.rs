//! Input validation subsystem.
//!
//! # Data Flow
//! ```text
//! API body / form payload (serde_json::Value)
//!     → parse_* (shape errors → fallback message)
//!     → ordered checks per entity (first failure wins)
//!     → ValidationResult { success, error }
//! ```
//!
//! # Design Decisions
//! - Validation never panics and never returns a raw serde error
//! - Every message is a fixed string; callers match on substrings
//! - Enumerated fields stay raw strings until checked so unknown values
//!   get the entity's own message

pub mod check;
pub mod effect;
pub mod export;
pub mod file;
pub mod processing;
pub mod region;

pub use check::{run_checks, Check, ValidationError, ValidationResult};
pub use effect::{
    check_effect, parse_effect, validate_effect, validate_effect_value, EffectDescriptor,
    EffectType,
};
pub use export::{
    check_export_options, parse_export_options, validate_export_options,
    validate_export_options_value, ExportFormat, ExportOptions,
};
pub use file::{
    check_file, parse_file, validate_file, validate_file_value, FileDescriptor, ImageFormat,
    MAX_FILE_NAME_LEN, MAX_FILE_SIZE,
};
pub use processing::{
    check_processing_request, parse_processing_request, validate_processing_request,
    validate_processing_request_value, EditInstruction, ProcessingOptions, ProcessingRequest,
};
pub use region::{
    check_region, parse_region, validate_region, validate_region_value, RegionDescriptor,
    RegionType, MAX_LABEL_LEN,
};
