use ndarray::{Array1, Array2, Array3, Array4, Axis, Zip};
use num_complex::Complex64;

use crate::error::{NoiseError, Result};

/// Declared extents of the common broadcast tensor
/// `[num_mic, num_prop, num_radial, num_harmonic]`.
///
/// Every quantity entering the radiation integrals is replicated to exactly
/// this shape before any arithmetic, so elementwise formulas can never pair
/// values from different axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TensorDims {
    pub num_mic: usize,
    pub num_prop: usize,
    pub num_radial: usize,
    pub num_harmonic: usize,
}

impl TensorDims {
    pub fn new(num_mic: usize, num_prop: usize, num_radial: usize, num_harmonic: usize) -> Self {
        Self {
            num_mic,
            num_prop,
            num_radial,
            num_harmonic,
        }
    }

    /// Shape tuple in `[mic, prop, radial, harmonic]` order.
    pub fn shape(&self) -> (usize, usize, usize, usize) {
        (
            self.num_mic,
            self.num_prop,
            self.num_radial,
            self.num_harmonic,
        )
    }
}

/// Replicate the 1-D harmonic list across the radial, propeller and
/// microphone axes.
pub fn broadcast_harmonics(harmonics: &[u32], dims: &TensorDims) -> Result<Array4<f64>> {
    if harmonics.len() != dims.num_harmonic {
        return Err(NoiseError::ShapeMismatch {
            context: "harmonic axis",
            expected: dims.num_harmonic,
            actual: harmonics.len(),
        });
    }
    Ok(Array4::from_shape_fn(dims.shape(), |(_, _, _, h)| {
        harmonics[h] as f64
    }))
}

/// Replicate a `[mic, prop]` observer-plane component across the radial and
/// harmonic axes.
pub fn broadcast_observer(component: &Array2<f64>, dims: &TensorDims) -> Result<Array4<f64>> {
    let (nm, np) = component.dim();
    if nm != dims.num_mic {
        return Err(NoiseError::ShapeMismatch {
            context: "microphone axis",
            expected: dims.num_mic,
            actual: nm,
        });
    }
    if np != dims.num_prop {
        return Err(NoiseError::ShapeMismatch {
            context: "propeller axis",
            expected: dims.num_prop,
            actual: np,
        });
    }
    Ok(Array4::from_shape_fn(dims.shape(), |(i, j, _, _)| {
        component[[i, j]]
    }))
}

/// Replicate a radial distribution (or a length-1 per-rotor scalar) across
/// the harmonic, propeller and microphone axes.
pub fn broadcast_radial(values: &[f64], dims: &TensorDims) -> Result<Array4<f64>> {
    match values.len() {
        1 => Ok(Array4::from_elem(dims.shape(), values[0])),
        n if n == dims.num_radial => Ok(Array4::from_shape_fn(dims.shape(), |(_, _, k, _)| {
            values[k]
        })),
        n => Err(NoiseError::ShapeMismatch {
            context: "radial axis",
            expected: dims.num_radial,
            actual: n,
        }),
    }
}

/// Trapezoidal integration along the radial axis (axis 2), with `r` as the
/// integration variable.
///
/// A single-station grid has no trapezoid to sum: the result is exactly
/// zero. Callers that cannot tolerate the degenerate interval must reject
/// single-station inputs before integrating.
pub fn integrate_radial(values: &Array4<Complex64>, r: &Array1<f64>) -> Result<Array3<Complex64>> {
    let (nm, np, nr, nh) = values.dim();
    if r.len() != nr {
        return Err(NoiseError::ShapeMismatch {
            context: "radial integration grid",
            expected: nr,
            actual: r.len(),
        });
    }
    let mut out = Array3::<Complex64>::zeros((nm, np, nh));
    for k in 0..nr.saturating_sub(1) {
        let dr = r[k + 1] - r[k];
        let lo = values.index_axis(Axis(2), k);
        let hi = values.index_axis(Axis(2), k + 1);
        Zip::from(&mut out).and(&lo).and(&hi).for_each(|o, &a, &b| {
            *o += (a + b) * (0.5 * dr);
        });
    }
    Ok(out)
}
