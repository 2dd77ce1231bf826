//! # Recolor Pipeline
//!
//! Wires the codec registry, the decoders, the substitution engine and the
//! encoders into a single source-to-destination run.

pub mod fs;
pub mod orchestrator;

// Re-exports for convenience
pub use fs::{ensure_output_dir, extract_extension};
pub use orchestrator::{PipelineOrchestrator, RecolorImage, RecolorOutcome};
