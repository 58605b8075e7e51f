//! Renderer errors.

use thiserror::Error;

/// Errors reported at the render entry points.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid render resolution: {width}x{height} at scale {scale}")]
    InvalidResolution { width: u32, height: u32, scale: u32 },

    #[error("Kernel launcher '{0}' is unavailable")]
    KernelUnavailable(&'static str),

    #[error("Unknown kernel launcher '{0}' (expected rayon, bucket or serial)")]
    UnknownKernel(String),

    #[error("Failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type RenderResult<T> = Result<T, RenderError>;
