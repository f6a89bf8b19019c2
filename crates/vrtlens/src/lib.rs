//! Visual analysis engine for screenshot regression testing.
//!
//! Decodes a reference and a test image, profiles each one (colour,
//! structure, layout), compares them, and grades the result with
//! human-readable insights.

pub mod analyze;
pub mod buffer;
pub mod compare;
pub mod config;
pub mod engine;
pub mod error;
pub mod insight;
pub mod regions;
pub mod report;
pub mod suite;

pub use buffer::PixelBuffer;
pub use config::EngineConfig;
pub use engine::{Report, VisualAnalysisEngine};
pub use error::{AnalysisError, Result};
