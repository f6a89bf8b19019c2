use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to decode in-memory image: {0}")]
    DecodeMemory(#[source] image::ImageError),

    #[error("invalid pixel buffer: {0}")]
    InvalidBuffer(String),

    #[error("dimension mismatch: {reference_w}x{reference_h} vs {test_w}x{test_h}")]
    DimensionMismatch {
        reference_w: u32,
        reference_h: u32,
        test_w: u32,
        test_h: u32,
    },

    #[error("empty pixel buffer")]
    EmptyBuffer,

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("no comparison could be computed")]
    NoComparisons,
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
