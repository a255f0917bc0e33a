//! Simulated enhancement backend.

pub mod engine;
pub mod types;

pub use engine::{AcceptedUpload, SimulationEngine};
pub use types::{
    AppliedEdit, BeforeAfter, HealthStatus, ProcessingMetadata, ProcessingResult, UploadRecord,
};
