//! Canned upload and processing results.
//!
//! Nothing is stored and no pixels are touched: uploads get a generated id and
//! URL, processing waits for the configured delay and returns sample images
//! with randomized metadata.

use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use rand::Rng;

use crate::simulation::types::{
    AppliedEdit, BeforeAfter, ProcessingMetadata, ProcessingResult, UploadRecord,
};
use crate::validation::ProcessingRequest;

pub const SAMPLE_BEFORE: &str = "/sample/before.png";
pub const SAMPLE_AFTER: &str = "/sample/after.png";
pub const ENHANCEMENT_TYPE: &str = "posture_correction";

const FILE_ID_SUFFIX_LEN: usize = 9;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// An upload that passed validation, with its bucket already resolved.
#[derive(Debug, Clone)]
pub struct AcceptedUpload {
    pub filename: String,
    pub size: u64,
    pub mime_type: String,
    pub bucket: String,
}

#[derive(Debug, Clone, Default)]
pub struct SimulationEngine;

impl SimulationEngine {
    pub fn new() -> Self {
        Self
    }

    /// Assign an id and URL to an accepted upload.
    pub fn register_upload(&self, upload: AcceptedUpload) -> UploadRecord {
        let id = generate_file_id(Utc::now().timestamp_millis());
        let extension = upload.filename.rsplit('.').next().unwrap_or_default();

        tracing::info!(
            file_id = %id,
            size = upload.size,
            bucket = %upload.bucket,
            "Registered upload"
        );

        UploadRecord {
            url: format!("/uploads/{id}.{extension}"),
            id,
            filename: upload.filename,
            size: upload.size,
            mime_type: upload.mime_type,
            bucket: upload.bucket,
            uploaded_at: now_rfc3339(),
        }
    }

    /// Produce a mock result for a validated request after `delay`.
    pub async fn process(&self, request: &ProcessingRequest, delay: Duration) -> ProcessingResult {
        tracing::debug!(
            file_id = %request.file_id,
            edits = request.edits.len(),
            delay_ms = delay.as_millis() as u64,
            "Simulating processing"
        );
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.build_result(request)
    }

    fn build_result(&self, request: &ProcessingRequest) -> ProcessingResult {
        let timestamp = now_rfc3339();
        let mut rng = rand::thread_rng();
        let processing_secs: f64 = rng.gen_range(1.0..4.0);
        let confidence_score: f64 = rng.gen_range(0.7..1.0);

        let edits = request
            .edits
            .iter()
            .map(|edit| AppliedEdit {
                edit: edit.clone(),
                timestamp: timestamp.clone(),
            })
            .collect();

        ProcessingResult {
            before_after: BeforeAfter {
                before: SAMPLE_BEFORE.to_string(),
                after: SAMPLE_AFTER.to_string(),
            },
            edits,
            report: request
                .wants_report()
                .then(|| format!("/uploads/{}_report.pdf", request.file_id)),
            artifact: request
                .wants_3d()
                .then(|| format!("demo_3d_model_{}.glb", Utc::now().timestamp_millis())),
            metadata: ProcessingMetadata {
                processing_time: format!("{processing_secs:.1}s"),
                confidence_score,
                enhancement_type: ENHANCEMENT_TYPE.to_string(),
                timestamp,
            },
        }
    }
}

/// `file_<millis>_<9 base36 chars>`.
pub fn generate_file_id(millis: i64) -> String {
    let suffix: String = (0..FILE_ID_SUFFIX_LEN)
        .map(|_| BASE36[fastrand::usize(..BASE36.len())] as char)
        .collect();
    format!("file_{millis}_{suffix}")
}

pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
