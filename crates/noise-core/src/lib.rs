pub mod bessel;
pub mod constants;
pub mod error;
pub mod harmonic;
pub mod octave;
pub mod signature;
pub mod tensor;
pub mod weighting;

pub use error::{NoiseError, Result};
pub use harmonic::{compute_harmonic_noise, ControlPointSpectrum};
pub use octave::OctaveBands;

use ndarray::Array3;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Shared interface types — the evaluator and the pipeline build against these
// ---------------------------------------------------------------------------

/// Rotor blade geometry, radial distributions ordered hub → tip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RotorGeometry {
    /// Number of blades B.
    pub number_of_blades: u32,
    /// Tip radius in metres; sets the tip Mach number.
    pub tip_radius: f64,
    /// Radial station locations in metres, strictly increasing, hub first.
    pub radius_distribution: Vec<f64>,
    /// Blade chord at each station, metres.
    pub chord_distribution: Vec<f64>,
    /// Section thickness-to-chord ratio at each station.
    pub thickness_to_chord: Vec<f64>,
    /// Mid-chord alignment (sweep offset) at each station, metres.
    pub mid_chord_alignment: Vec<f64>,
}

impl RotorGeometry {
    /// Number of radial stations.
    pub fn num_radial(&self) -> usize {
        self.radius_distribution.len()
    }

    /// Boundary validation of upstream geometry data.
    pub fn validate(&self) -> Result<()> {
        let n = self.radius_distribution.len();
        if n < 2 {
            return Err(NoiseError::InvalidInput(
                "at least two radial stations are required".into(),
            ));
        }
        for (context, dist) in [
            ("chord distribution", &self.chord_distribution),
            ("thickness-to-chord distribution", &self.thickness_to_chord),
            ("mid-chord alignment distribution", &self.mid_chord_alignment),
        ] {
            if dist.len() != n {
                return Err(NoiseError::ShapeMismatch {
                    context,
                    expected: n,
                    actual: dist.len(),
                });
            }
            if dist.iter().any(|v| !v.is_finite()) {
                return Err(NoiseError::InvalidInput(format!(
                    "{context} contains non-finite entries"
                )));
            }
        }
        if self.number_of_blades == 0 {
            return Err(NoiseError::InvalidInput(
                "rotor must have at least one blade".into(),
            ));
        }
        if !(self.tip_radius > 0.0) {
            return Err(NoiseError::InvalidInput("tip radius must be positive".into()));
        }
        if !(self.radius_distribution[0] > 0.0) {
            return Err(NoiseError::InvalidInput(
                "hub radius must be positive".into(),
            ));
        }
        for pair in self.radius_distribution.windows(2) {
            if !(pair[1] > pair[0]) {
                return Err(NoiseError::InvalidInput(
                    "radius distribution must be strictly increasing".into(),
                ));
            }
        }
        if self.chord_distribution.iter().any(|&c| !(c > 0.0)) {
            return Err(NoiseError::InvalidInput(
                "chord distribution must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Freestream state at one control point.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Freestream {
    /// Speed of sound, m/s.
    pub speed_of_sound: f64,
    /// Air density, kg/m³.
    pub density: f64,
    /// Velocity vector of the vehicle, m/s.
    pub velocity: [f64; 3],
}

impl Freestream {
    pub fn validate(&self) -> Result<()> {
        if !(self.speed_of_sound > 0.0) {
            return Err(NoiseError::InvalidInput(
                "speed of sound must be positive".into(),
            ));
        }
        if !(self.density > 0.0) {
            return Err(NoiseError::InvalidInput("density must be positive".into()));
        }
        if self.velocity.iter().any(|v| !v.is_finite()) {
            return Err(NoiseError::InvalidInput(
                "velocity vector contains non-finite entries".into(),
            ));
        }
        Ok(())
    }
}

/// Rotor operating state at one control point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RotorOperatingPoint {
    /// Shaft angular velocity ω, rad/s.
    pub angular_velocity: f64,
    /// Vehicle angle of attack, rad.
    pub angle_of_attack: f64,
    /// Rotor thrust-axis tilt, rad.
    pub thrust_angle: f64,
    /// Nondimensional thrust gradient dT/dr per radial station.
    pub thrust_gradient: Vec<f64>,
    /// Nondimensional torque gradient dQ/dr per radial station.
    pub torque_gradient: Vec<f64>,
}

impl RotorOperatingPoint {
    pub fn validate(&self, num_radial: usize) -> Result<()> {
        if !(self.angular_velocity > 0.0) {
            return Err(NoiseError::InvalidInput(
                "angular velocity must be positive".into(),
            ));
        }
        if !self.angle_of_attack.is_finite() || !self.thrust_angle.is_finite() {
            return Err(NoiseError::InvalidInput(
                "attitude angles must be finite".into(),
            ));
        }
        for (context, dist) in [
            ("thrust gradient distribution", &self.thrust_gradient),
            ("torque gradient distribution", &self.torque_gradient),
        ] {
            if dist.len() != num_radial {
                return Err(NoiseError::ShapeMismatch {
                    context,
                    expected: num_radial,
                    actual: dist.len(),
                });
            }
            if dist.iter().any(|v| !v.is_finite()) {
                return Err(NoiseError::InvalidInput(format!(
                    "{context} contains non-finite entries"
                )));
            }
        }
        Ok(())
    }
}

/// One control point of a mission time history.
#[derive(Debug, Clone)]
pub struct ControlPoint {
    pub freestream: Freestream,
    pub operating: RotorOperatingPoint,
}

/// A complete tonal-noise evaluation case: one rotor, a set of observers,
/// and the control points of a mission segment.
#[derive(Debug, Clone)]
pub struct NoiseCase {
    pub rotor: RotorGeometry,
    /// Position vectors rotor → microphone, `[num_mic, num_prop, 3]`.
    pub positions: Array3<f64>,
    /// Blade-passing harmonic orders, usually `1..=num_h`.
    pub harmonics: Vec<u32>,
    pub bands: OctaveBands,
    pub points: Vec<ControlPoint>,
}

/// Caller-owned result slots, one per control point.
///
/// Each slot is written once by index and never revisited; control points
/// are independent, so no ordering is required between stores.
#[derive(Debug, Clone, Default)]
pub struct SpectrumAccumulator {
    slots: Vec<Option<ControlPointSpectrum>>,
}

impl SpectrumAccumulator {
    pub fn new(num_points: usize) -> Self {
        Self {
            slots: vec![None; num_points],
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Store the spectrum for control point `index`.
    pub fn store(&mut self, index: usize, spectrum: ControlPointSpectrum) -> Result<()> {
        let len = self.slots.len();
        match self.slots.get_mut(index) {
            Some(slot) => {
                *slot = Some(spectrum);
                Ok(())
            }
            None => Err(NoiseError::IndexOutOfRange { index, len }),
        }
    }

    pub fn get(&self, index: usize) -> Option<&ControlPointSpectrum> {
        self.slots.get(index).and_then(|s| s.as_ref())
    }

    /// Iterate stored spectra in control-point order.
    pub fn iter(&self) -> impl Iterator<Item = Option<&ControlPointSpectrum>> {
        self.slots.iter().map(|s| s.as_ref())
    }
}

/// Evaluate every control point of a case in sequence and collect the
/// spectra into a fresh accumulator.
pub fn compute(case: &NoiseCase) -> Result<SpectrumAccumulator> {
    case.rotor.validate()?;
    let mut accumulator = SpectrumAccumulator::new(case.points.len());
    for (i, point) in case.points.iter().enumerate() {
        tracing::debug!(control_point = i, "evaluating harmonic noise");
        let spectrum = harmonic::compute_harmonic_noise(
            &case.rotor,
            &point.operating,
            &point.freestream,
            &case.positions,
            &case.harmonics,
            &case.bands,
        )?;
        accumulator.store(i, spectrum)?;
    }
    Ok(accumulator)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case() -> NoiseCase {
        let rotor = RotorGeometry {
            number_of_blades: 3,
            tip_radius: 1.0,
            radius_distribution: vec![0.25, 0.5, 0.75, 1.0],
            chord_distribution: vec![0.15, 0.14, 0.11, 0.07],
            thickness_to_chord: vec![0.12, 0.10, 0.08, 0.06],
            mid_chord_alignment: vec![0.0, 0.005, 0.012, 0.02],
        };
        let mut positions = Array3::zeros((2, 1, 3));
        positions[[0, 0, 0]] = 30.0;
        positions[[0, 0, 1]] = 60.0;
        positions[[0, 0, 2]] = 5.0;
        positions[[1, 0, 0]] = -10.0;
        positions[[1, 0, 1]] = 80.0;
        positions[[1, 0, 2]] = 12.0;
        let operating = RotorOperatingPoint {
            angular_velocity: 150.0,
            angle_of_attack: 0.03,
            thrust_angle: 0.01,
            thrust_gradient: vec![0.3, 0.7, 1.0, 0.5],
            torque_gradient: vec![0.08, 0.18, 0.26, 0.14],
        };
        let climb = ControlPoint {
            freestream: Freestream {
                speed_of_sound: 340.3,
                density: 1.225,
                velocity: [45.0, 0.0, 3.0],
            },
            operating: operating.clone(),
        };
        let cruise = ControlPoint {
            freestream: Freestream {
                speed_of_sound: 336.4,
                density: 1.112,
                velocity: [65.0, 0.0, 0.0],
            },
            operating,
        };
        NoiseCase {
            rotor,
            positions,
            harmonics: (1..=6).collect(),
            bands: OctaveBands::default(),
            points: vec![climb, cruise],
        }
    }

    #[test]
    fn test_pipeline_fills_every_slot() {
        let acc = compute(&case()).unwrap();
        assert_eq!(acc.len(), 2);
        for i in 0..2 {
            let spectrum = acc.get(i).expect("slot not filled");
            assert_eq!(spectrum.spl.dim(), (2, 1, 6));
            assert!(spectrum.spl.iter().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn test_pipeline_points_differ() {
        let acc = compute(&case()).unwrap();
        // climb and cruise conditions must not produce the same spectrum
        assert_ne!(acc.get(0).unwrap().spl, acc.get(1).unwrap().spl);
    }

    #[test]
    fn test_accumulator_rejects_out_of_range_store() {
        let acc = compute(&case()).unwrap();
        let spectrum = acc.get(0).unwrap().clone();
        let mut small = SpectrumAccumulator::new(1);
        let err = small.store(5, spectrum).unwrap_err();
        assert!(matches!(
            err,
            NoiseError::IndexOutOfRange { index: 5, len: 1 }
        ));
    }

    #[test]
    fn test_rotor_validation_catches_bad_data() {
        let mut bad = case();
        bad.rotor.chord_distribution[2] = f64::NAN;
        assert!(compute(&bad).is_err());

        let mut shrinking = case();
        shrinking.rotor.radius_distribution = vec![0.25, 0.2, 0.75, 1.0];
        assert!(compute(&shrinking).is_err());

        let mut bladeless = case();
        bladeless.rotor.number_of_blades = 0;
        assert!(compute(&bladeless).is_err());
    }

    #[test]
    fn test_freestream_validation() {
        let ok = Freestream {
            speed_of_sound: 340.0,
            density: 1.2,
            velocity: [10.0, 0.0, 0.0],
        };
        assert!(ok.validate().is_ok());

        let bad = Freestream {
            speed_of_sound: 0.0,
            ..ok
        };
        assert!(bad.validate().is_err());

        let nan = Freestream {
            velocity: [f64::NAN, 0.0, 0.0],
            ..ok
        };
        assert!(nan.validate().is_err());
    }
}
