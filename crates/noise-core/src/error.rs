//! Error types for noise-core

use thiserror::Error;

/// Result type alias for noise-core operations.
pub type Result<T> = std::result::Result<T, NoiseError>;

/// Errors raised by the tonal-noise kernel.
///
/// The kernel has no recovery logic; every anomaly propagates to the caller,
/// which decides whether to abort the mission segment or substitute a
/// fallback. No partial spectra are written on error.
#[derive(Debug, Error)]
pub enum NoiseError {
    /// A tensor input disagrees with the declared mic/prop/radial/harmonic
    /// extents.
    #[error("shape mismatch in {context}: expected {expected}, got {actual}")]
    ShapeMismatch {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A radiation denominator collapsed to zero.
    #[error("numerical singularity: {0}")]
    NumericalSingularity(&'static str),

    /// Upstream data failed boundary validation.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Accumulator slot index past the pre-allocated control points.
    #[error("control point index {index} out of range ({len} slots)")]
    IndexOutOfRange { index: usize, len: usize },
}
