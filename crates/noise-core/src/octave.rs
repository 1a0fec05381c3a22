use ndarray::Array3;
use serde::{Deserialize, Serialize};

use crate::error::{NoiseError, Result};

/// ANSI preferred 1/3-octave center frequencies, 16 Hz – 10 kHz.
const PREFERRED_CENTERS: [f64; 29] = [
    16.0, 20.0, 25.0, 31.5, 40.0, 50.0, 63.0, 80.0, 100.0, 125.0, 160.0, 200.0, 250.0, 315.0,
    400.0, 500.0, 630.0, 800.0, 1000.0, 1250.0, 1600.0, 2000.0, 2500.0, 3150.0, 4000.0, 5000.0,
    6300.0, 8000.0, 10000.0,
];

/// 1/3-octave band configuration.
///
/// Band edges are derived from the centers as `f_c·2^∓1/6`. Lines falling
/// exactly on an edge are dropped (strict inequalities on both sides), and a
/// band containing no line reports 0.0 dB.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OctaveBands {
    pub center_frequencies: Vec<f64>,
}

impl Default for OctaveBands {
    fn default() -> Self {
        Self {
            center_frequencies: PREFERRED_CENTERS.to_vec(),
        }
    }
}

impl OctaveBands {
    pub fn new(center_frequencies: Vec<f64>) -> Self {
        Self { center_frequencies }
    }

    pub fn len(&self) -> usize {
        self.center_frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.center_frequencies.is_empty()
    }

    /// Lower band edges, `f_c / 2^(1/6)`.
    pub fn lower_frequencies(&self) -> Vec<f64> {
        let factor = 2f64.powf(1.0 / 6.0);
        self.center_frequencies.iter().map(|f| f / factor).collect()
    }

    /// Upper band edges, `f_c · 2^(1/6)`.
    pub fn upper_frequencies(&self) -> Vec<f64> {
        let factor = 2f64.powf(1.0 / 6.0);
        self.center_frequencies.iter().map(|f| f * factor).collect()
    }

    /// Energy-sum a line spectrum into the bands:
    /// `SPL_band = 10·log₁₀(Σ 10^(SPL_line/10))` over lines inside each band.
    pub fn to_third_octave(&self, lines: &[f64], frequencies: &[f64]) -> Result<Vec<f64>> {
        if lines.len() != frequencies.len() {
            return Err(NoiseError::ShapeMismatch {
                context: "line spectrum",
                expected: frequencies.len(),
                actual: lines.len(),
            });
        }
        let lower = self.lower_frequencies();
        let upper = self.upper_frequencies();
        let mut bands = vec![0.0; self.len()];
        for (b, band) in bands.iter_mut().enumerate() {
            let mut energy = 0.0;
            let mut hit = false;
            for (&spl, &f) in lines.iter().zip(frequencies) {
                if f > lower[b] && f < upper[b] {
                    energy += 10f64.powf(spl / 10.0);
                    hit = true;
                }
            }
            if hit {
                *band = 10.0 * energy.log10();
            }
        }
        Ok(bands)
    }

    /// Band-convert every microphone/propeller pair of a
    /// `[mic, prop, harmonic]` spectrum into `[mic, prop, band]`.
    pub fn band_spectrum(&self, spl: &Array3<f64>, frequencies: &[f64]) -> Result<Array3<f64>> {
        let (nm, np, nh) = spl.dim();
        if frequencies.len() != nh {
            return Err(NoiseError::ShapeMismatch {
                context: "band frequency vector",
                expected: nh,
                actual: frequencies.len(),
            });
        }
        let mut out = Array3::zeros((nm, np, self.len()));
        for i in 0..nm {
            for j in 0..np {
                let lines: Vec<f64> = (0..nh).map(|h| spl[[i, j, h]]).collect();
                let bands = self.to_third_octave(&lines, frequencies)?;
                for (b, &v) in bands.iter().enumerate() {
                    out[[i, j, b]] = v;
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_band_count() {
        assert_eq!(OctaveBands::default().len(), 29);
    }

    #[test]
    fn test_edges_span_one_third_octave() {
        let bands = OctaveBands::default();
        let lower = bands.lower_frequencies();
        let upper = bands.upper_frequencies();
        for b in 0..bands.len() {
            let ratio = upper[b] / lower[b];
            assert!((ratio - 2f64.powf(1.0 / 3.0)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_single_line_lands_in_its_band() {
        let bands = OctaveBands::default();
        let out = bands.to_third_octave(&[85.0], &[1000.0]).unwrap();
        let idx = bands
            .center_frequencies
            .iter()
            .position(|&f| f == 1000.0)
            .unwrap();
        assert!((out[idx] - 85.0).abs() < 1e-12);
        for (b, &v) in out.iter().enumerate() {
            if b != idx {
                assert_eq!(v, 0.0, "band {b} should stay empty");
            }
        }
    }

    #[test]
    fn test_two_equal_lines_add_3db() {
        let bands = OctaveBands::default();
        // both lines inside the 1 kHz band (891–1122 Hz)
        let out = bands.to_third_octave(&[80.0, 80.0], &[950.0, 1050.0]).unwrap();
        let idx = bands
            .center_frequencies
            .iter()
            .position(|&f| f == 1000.0)
            .unwrap();
        assert!((out[idx] - 83.0103).abs() < 1e-3);
    }

    #[test]
    fn test_out_of_range_line_dropped() {
        let bands = OctaveBands::default();
        let out = bands.to_third_octave(&[90.0], &[40_000.0]).unwrap();
        assert!(out.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_band_spectrum_shape() {
        let bands = OctaveBands::default();
        let spl = Array3::from_elem((2, 3, 4), 70.0);
        let freqs = [100.0, 200.0, 400.0, 800.0];
        let out = bands.band_spectrum(&spl, &freqs).unwrap();
        assert_eq!(out.dim(), (2, 3, bands.len()));
    }

    #[test]
    fn test_custom_centers() {
        let bands = OctaveBands::new(vec![100.0, 200.0]);
        assert_eq!(bands.len(), 2);
        let out = bands.to_third_octave(&[75.0, 70.0], &[95.0, 210.0]).unwrap();
        assert!((out[0] - 75.0).abs() < 1e-12);
        assert!((out[1] - 70.0).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_length_mismatch() {
        let bands = OctaveBands::default();
        assert!(bands.to_third_octave(&[80.0, 81.0], &[1000.0]).is_err());
    }
}
