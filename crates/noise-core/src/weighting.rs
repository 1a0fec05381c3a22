use ndarray::Array3;

use crate::error::{NoiseError, Result};

/// A-weighting correction in dB at frequency `f` (Hz).
///
/// Standard IEC 61672 curve: `A(f) = 2.0 + 20·log₁₀(R_A(f))` with the
/// rational weighting function `R_A`. Negative below ~1 kHz, ~0 dB at 1 kHz.
pub fn a_weighting_offset(f: f64) -> f64 {
    let f2 = f * f;
    let c1 = 12194.0 * 12194.0;
    let c2 = 20.6 * 20.6;
    let c3 = 107.7 * 107.7;
    let c4 = 737.9 * 737.9;
    let ra = (c1 * f2 * f2) / ((f2 + c2) * ((f2 + c3) * (f2 + c4)).sqrt() * (f2 + c1));
    2.0 + 20.0 * ra.log10()
}

/// Apply the A-weighting correction to a `[mic, prop, harmonic]` line
/// spectrum, elementwise along the harmonic axis.
pub fn a_weighting(spl: &Array3<f64>, frequencies: &[f64]) -> Result<Array3<f64>> {
    let (_, _, nh) = spl.dim();
    if frequencies.len() != nh {
        return Err(NoiseError::ShapeMismatch {
            context: "A-weighting frequency vector",
            expected: nh,
            actual: frequencies.len(),
        });
    }
    let offsets: Vec<f64> = frequencies.iter().map(|&f| a_weighting_offset(f)).collect();
    Ok(Array3::from_shape_fn(spl.dim(), |(i, j, h)| {
        spl[[i, j, h]] + offsets[h]
    }))
}
