//! Mock upload and processing payloads.

use serde::{Deserialize, Serialize};

use crate::validation::EditInstruction;

/// Metadata returned for an accepted upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadRecord {
    pub id: String,
    pub url: String,
    pub filename: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub bucket: String,
    #[serde(rename = "uploadedAt")]
    pub uploaded_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeforeAfter {
    pub before: String,
    pub after: String,
}

/// An applied edit, stamped with the time it was applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedEdit {
    #[serde(flatten)]
    pub edit: EditInstruction,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingMetadata {
    /// Formatted as seconds with one decimal, e.g. "2.4s".
    pub processing_time: String,
    pub confidence_score: f64,
    pub enhancement_type: String,
    pub timestamp: String,
}

/// Simulated enhancement result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingResult {
    pub before_after: BeforeAfter,
    pub edits: Vec<AppliedEdit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact: Option<String>,
    pub metadata: ProcessingMetadata,
}

/// Response of the health endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: String,
    pub uptime: f64,
    pub version: String,
    pub environment: String,
    pub services: ServiceStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub api: String,
    pub database: String,
    pub storage: String,
}
