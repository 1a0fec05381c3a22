use std::f64::consts::PI;

use ndarray::{Array1, Array3, Array4, Axis, Zip};
use num_complex::Complex64;

use crate::bessel::bessel_jn;
use crate::constants::P_REF;
use crate::error::{NoiseError, Result};
use crate::octave::OctaveBands;
use crate::tensor::{
    broadcast_harmonics, broadcast_observer, broadcast_radial, integrate_radial, TensorDims,
};
use crate::weighting;
use crate::{Freestream, RotorGeometry, RotorOperatingPoint};

/// Radiation denominators below this magnitude are treated as singular.
const SINGULARITY_EPS: f64 = 1e-12;

/// Tonal spectrum radiated to every microphone at one control point.
///
/// All level tensors are `[mic, prop, harmonic]` (or `[mic, prop, band]`
/// for the octave spectra); slots of a [`crate::SpectrumAccumulator`] hold
/// one of these per control point.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlPointSpectrum {
    /// Blade-passing harmonic frequencies `f_m = B·ω·m/(2π)`, Hz.
    pub frequencies: Vec<f64>,
    /// Unweighted SPL, dB re 2×10⁻⁵ Pa.
    pub spl: Array3<f64>,
    /// A-weighted SPL, dBA.
    pub spl_dba: Array3<f64>,
    /// Mean-square pressure ratio `10^(SPL/10)`.
    pub pressure_ratio: Array3<f64>,
    /// Mean-square pressure ratio of the A-weighted spectrum.
    pub pressure_ratio_dba: Array3<f64>,
    /// 1/3-octave band SPL, `[mic, prop, band]`.
    pub band_spl: Array3<f64>,
    /// 1/3-octave band SPL of the A-weighted spectrum.
    pub band_spl_dba: Array3<f64>,
    /// Rotational tonal band spectrum. Currently a pass-through of
    /// `band_spl`; see the note at the end of [`compute_harmonic_noise`].
    pub tonal_band_spl: Array3<f64>,
    /// Thickness-noise pressure magnitude |p_mT|, Pa.
    pub thickness_pressure: Array3<f64>,
    /// Loading-noise pressure magnitude |p_mL|, Pa.
    pub loading_pressure: Array3<f64>,
}

/// Polar angle corrected to the retarded (emission-time) frame for forward
/// Mach number `m_x`.
fn retarded_polar_angle(theta: f64, m_x: f64) -> f64 {
    let sin2 = theta.sin() * theta.sin();
    let arg = theta.cos() * (1.0 - m_x * m_x * sin2).sqrt() + m_x * sin2;
    // floating point can push the argument past ±1
    arg.clamp(-1.0, 1.0).acos()
}

/// Retarded polar angle rotated into the shaft-axis frame tilted by `alpha`
/// (angle of attack + thrust angle).
fn shaft_frame_polar_angle(theta_r: f64, phi: f64, alpha: f64) -> f64 {
    let arg = theta_r.cos() * alpha.cos() + theta_r.sin() * phi.sin() * alpha.sin();
    arg.clamp(-1.0, 1.0).acos()
}

/// Normalized thickness and loading shape functions ψ_V, ψ_L over the wave
/// number tensor. Station 0 (the hub) takes the closed-form values 2/3 and
/// 1; outboard stations the sinc-like forms in `k_x`.
fn shape_functions(k_x: &Array4<f64>) -> (Array4<f64>, Array4<f64>) {
    let mut psi_v = Array4::zeros(k_x.raw_dim());
    let mut psi_l = Array4::zeros(k_x.raw_dim());
    Zip::indexed(&mut psi_v)
        .and(&mut psi_l)
        .and(k_x)
        .for_each(|(_, _, k, _), pv, pl, &kx| {
            if k == 0 {
                *pv = 2.0 / 3.0;
                *pl = 1.0;
            } else {
                let half = 0.5 * kx;
                *pv = (8.0 / (kx * kx)) * ((2.0 / kx) * half.sin() - half.cos());
                *pl = (2.0 / kx) * half.sin();
            }
        });
    (psi_v, psi_l)
}

/// Chordwise (`k_x`) and skew (`k_y`) wave numbers of the helicoidal
/// radiation geometry.
///
/// `k_y` does not enter the thickness or loading integrands; it is exposed
/// for inspection of the source geometry.
pub fn wave_numbers(
    m: &Array4<f64>,
    chord_to_diameter: &Array4<f64>,
    section_mach: &Array4<f64>,
    radius_nd: &Array4<f64>,
    retarded_polar: &Array4<f64>,
    blade_count: f64,
    tip_mach: f64,
    forward_mach: f64,
) -> (Array4<f64>, Array4<f64>) {
    let k_x = Zip::from(m)
        .and(chord_to_diameter)
        .and(section_mach)
        .and(retarded_polar)
        .map_collect(|&m, &bd, &mr, &tr| {
            2.0 * m * blade_count * bd * tip_mach / (mr * (1.0 - forward_mach * tr.cos()))
        });
    let k_y = Zip::from(m)
        .and(chord_to_diameter)
        .and(section_mach)
        .and(radius_nd)
        .and(retarded_polar)
        .map_collect(|&m, &bd, &mr, &r, &tr| {
            let doppler = 1.0 - forward_mach * tr.cos();
            (2.0 * m * blade_count * bd / (mr * r)) * ((forward_mach - mr * mr * tr.cos()) / doppler)
        });
    (k_x, k_y)
}

/// Compute the tonal (thickness + loading) acoustic spectrum radiated by
/// each propeller to each microphone for one control point.
///
/// Implements Hanson's far-field helicoidal surface theory: retarded-time
/// observer geometry, `J_{mB}` radiation pattern, and trapezoidal radial
/// integration of the thickness and loading integrands over the
/// nondimensional radius. Thickness and loading pressures are combined as
/// an incoherent magnitude sum before the level is formed.
///
/// The evaluator is pure; callers own the per-control-point slot the result
/// is stored in.
pub fn compute_harmonic_noise(
    rotor: &RotorGeometry,
    operating: &RotorOperatingPoint,
    freestream: &Freestream,
    positions: &Array3<f64>,
    harmonics: &[u32],
    bands: &OctaveBands,
) -> Result<ControlPointSpectrum> {
    rotor.validate()?;
    operating.validate(rotor.num_radial())?;
    freestream.validate()?;
    if harmonics.is_empty() {
        return Err(NoiseError::InvalidInput("empty harmonic set".into()));
    }

    let (num_mic, num_prop, components) = positions.dim();
    if components != 3 {
        return Err(NoiseError::ShapeMismatch {
            context: "position vector components",
            expected: 3,
            actual: components,
        });
    }
    let dims = TensorDims::new(num_mic, num_prop, rotor.num_radial(), harmonics.len());

    let a = freestream.speed_of_sound;
    let rho = freestream.density;
    let [vx, vy, vz] = freestream.velocity;
    let omega = operating.angular_velocity;
    let blades = rotor.number_of_blades as f64;
    let alpha = operating.angle_of_attack + operating.thrust_angle;

    // replicate everything to [mic, prop, radial, harmonic]
    let m = broadcast_harmonics(harmonics, &dims)?;
    let x = broadcast_observer(&positions.index_axis(Axis(2), 0).to_owned(), &dims)?;
    let y = broadcast_observer(&positions.index_axis(Axis(2), 1).to_owned(), &dims)?;
    let z = broadcast_observer(&positions.index_axis(Axis(2), 2).to_owned(), &dims)?;
    let radius = broadcast_radial(&rotor.radius_distribution, &dims)?;
    let chord = broadcast_radial(&rotor.chord_distribution, &dims)?;
    let t_c = broadcast_radial(&rotor.thickness_to_chord, &dims)?;
    let mca = broadcast_radial(&rotor.mid_chord_alignment, &dims)?;
    let dt_dr = broadcast_radial(&operating.thrust_gradient, &dims)?;
    let dq_dr = broadcast_radial(&operating.torque_gradient, &dims)?;

    let frequencies: Vec<f64> = harmonics
        .iter()
        .map(|&mh| blades * omega * mh as f64 / (2.0 * PI))
        .collect();

    // nondimensional radius and diameter from the outermost station
    let r_last = rotor.radius_distribution[rotor.num_radial() - 1];
    let diameter = 2.0 * r_last;
    let r = radius.mapv(|v| v / r_last);
    let r_grid = Array1::from(
        rotor
            .radius_distribution
            .iter()
            .map(|&v| v / r_last)
            .collect::<Vec<_>>(),
    );

    // observer geometry
    let s = Zip::from(&x)
        .and(&y)
        .and(&z)
        .map_collect(|&x, &y, &z| (x * x + y * y + z * z).sqrt());
    let theta = Zip::from(&x)
        .and(&s)
        .map_collect(|&x, &s| (x / s).clamp(-1.0, 1.0).acos());
    let y_off = Zip::from(&y)
        .and(&z)
        .map_collect(|&y, &z| (y * y + z * z).sqrt());
    let phi = Zip::from(&z).and(&y).map_collect(|&z, &y| (z / y).atan());

    // Mach numbers
    let v_mag = (vx * vx + vy * vy + vz * vz).sqrt();
    let m_x = v_mag / a;
    if m_x >= 1.0 {
        return Err(NoiseError::InvalidInput(format!(
            "forward Mach number {m_x:.3} is supersonic"
        )));
    }
    let m_t = rotor.tip_radius * omega / a;
    let m_r = r.mapv(|r| (m_x * m_x + r * r * m_t * m_t).sqrt());
    let b_d = chord.mapv(|c| c / diameter);

    // retarded frame angles
    let theta_r = theta.mapv(|th| retarded_polar_angle(th, m_x));
    let sin_theta_r = theta_r.mapv(f64::sin);
    let doppler = theta_r.mapv(|tr| 1.0 - m_x * tr.cos());
    let theta_r_prime = Zip::from(&theta_r)
        .and(&phi)
        .map_collect(|&tr, &ph| shaft_frame_polar_angle(tr, ph, alpha));

    if sin_theta_r.iter().any(|v| v.abs() < SINGULARITY_EPS) {
        return Err(NoiseError::NumericalSingularity(
            "observer on the rotor axis (sin theta_r = 0)",
        ));
    }
    if doppler.iter().any(|v| v.abs() < SINGULARITY_EPS) {
        return Err(NoiseError::NumericalSingularity(
            "sonic radiation condition (1 - M_x cos theta_r = 0)",
        ));
    }
    if m_r.iter().any(|v| v.abs() < SINGULARITY_EPS) {
        return Err(NoiseError::NumericalSingularity(
            "vanishing section Mach number (M_r = 0)",
        ));
    }

    let phi_prime = Zip::from(&sin_theta_r)
        .and(&theta_r_prime)
        .and(&phi)
        .map_collect(|&str_, &trp, &ph| {
            ((str_ / trp.sin()) * ph.cos()).clamp(-1.0, 1.0).acos()
        });

    // wave numbers and source-offset phase
    let (k_x, _k_y) = wave_numbers(&m, &b_d, &m_r, &r, &theta_r, blades, m_t, m_x);
    let phi_s = Zip::from(&m)
        .and(&m_r)
        .and(&doppler)
        .and(&mca)
        .map_collect(|&m, &mr, &dop, &mca| {
            (2.0 * m * blades * m_t / (mr * dop)) * (mca / diameter)
        });
    let s_r = Zip::from(&y_off)
        .and(&sin_theta_r)
        .map_collect(|&yo, &str_| yo / str_);

    // helicoidal radiation pattern
    let j_mb = Zip::from(&m)
        .and(&r)
        .and(&theta_r_prime)
        .and(&doppler)
        .map_collect(|&m, &r, &trp, &dop| {
            let order = m.round() as u32 * rotor.number_of_blades;
            bessel_jn(order, m * blades * r * m_t * trp.sin() / dop)
        });

    let (psi_v, psi_l) = shape_functions(&k_x);

    // common retarded-time/Doppler phase factor
    // e^{i m B (ω S_r / a + φ' − π/2)} / (1 − M_x cos θ_r)
    let exponent = Zip::from(&m)
        .and(&s_r)
        .and(&phi_prime)
        .and(&doppler)
        .map_collect(|&m, &sr, &pp, &dop| {
            let phase = m * blades * (omega * sr / a + pp - 0.5 * PI);
            Complex64::new(0.0, phase).exp() / dop
        });

    // thickness noise
    let sqrt2 = 2f64.sqrt();
    let thickness_prefactor = Zip::from(&sin_theta_r)
        .and(&y_off)
        .and(&exponent)
        .map_collect(|&str_, &yo, &ef| {
            ef * (rho * a * a * blades * str_ / (4.0 * sqrt2 * PI * (yo / diameter)))
        });
    // Six producers exceed ndarray's Zip::map_collect arity; build the
    // integrand by index with the identical elementwise expression.
    let thickness_integrand = Array4::from_shape_fn(m_r.raw_dim(), |idx| {
        let mr = m_r[idx];
        let tc = t_c[idx];
        let ps = phi_s[idx];
        let j = j_mb[idx];
        let kx = k_x[idx];
        let pv = psi_v[idx];
        Complex64::new(0.0, ps).exp() * (mr * mr * tc * j * kx * kx * pv)
    });
    let thickness_integral = integrate_radial(&thickness_integrand, &r_grid)?;
    // the prefactor is radially constant; evaluate it at station 0
    let thickness_pressure = Zip::from(&thickness_prefactor.index_axis(Axis(2), 0))
        .and(&thickness_integral)
        .map_collect(|&f, &integral| (-f * integral).norm());

    // loading noise
    let loading_prefactor = Zip::from(&m)
        .and(&sin_theta_r)
        .and(&y_off)
        .and(&exponent)
        .map_collect(|&m, &str_, &yo, &ef| {
            ef * (m * blades * m_t * str_ / (2.0 * sqrt2 * PI * yo * rotor.tip_radius))
        });
    let loading_source = Zip::from(&theta_r_prime)
        .and(&doppler)
        .and(&dt_dr)
        .and(&r)
        .and(&dq_dr)
        .map_collect(|&trp, &dop, &dt, &r, &dq| {
            (trp.cos() / dop) * dt - dq / (r * r * m_t * rotor.tip_radius)
        });
    let loading_integrand = Zip::from(&loading_source)
        .and(&phi_s)
        .and(&j_mb)
        .and(&psi_l)
        .map_collect(|&src, &ps, &j, &pl| Complex64::new(0.0, ps).exp() * (src * j * pl));
    let loading_integral = integrate_radial(&loading_integrand, &r_grid)?;
    let loading_pressure = Zip::from(&loading_prefactor.index_axis(Axis(2), 0))
        .and(&loading_integral)
        .map_collect(|&f, &integral| (f * integral).norm());

    // incoherent magnitude sum of the two noise mechanisms
    let spl = Zip::from(&loading_pressure)
        .and(&thickness_pressure)
        .map_collect(|&pl, &pt| 20.0 * ((pl + pt) / P_REF).log10());
    if spl.iter().any(|v| !v.is_finite()) {
        return Err(NoiseError::NumericalSingularity(
            "non-finite sound pressure level",
        ));
    }

    let pressure_ratio = spl.mapv(|v| 10f64.powf(v / 10.0));
    let spl_dba = weighting::a_weighting(&spl, &frequencies)?;
    let pressure_ratio_dba = spl_dba.mapv(|v| 10f64.powf(v / 10.0));

    let band_spl = bands.band_spectrum(&spl, &frequencies)?;
    let band_spl_dba = bands.band_spectrum(&spl_dba, &frequencies)?;
    // TODO: separate the rotational lines from broadband content before
    // reporting them as tonal; until then the tonal band spectrum is the
    // band spectrum unchanged.
    let tonal_band_spl = band_spl.mapv(|v| 10.0 * 10f64.powf(v / 10.0).log10());

    Ok(ControlPointSpectrum {
        frequencies,
        spl,
        spl_dba,
        pressure_ratio,
        pressure_ratio_dba,
        band_spl,
        band_spl_dba,
        tonal_band_spl,
        thickness_pressure,
        loading_pressure,
    })
}
