//! Demo harness for the tonal-noise pipeline.
//!
//! Builds a three-blade propeller, evaluates a climb and a cruise control
//! point against two ground microphones, and prints the harmonic lines and
//! the A-weighted 1/3-octave summary for each point.
//!
//! Run with:
//!   cargo run -p noise-core --example flyover

use ndarray::Array3;
use noise_core::{
    constants, signature, ControlPoint, Freestream, NoiseCase, OctaveBands, RotorGeometry,
    RotorOperatingPoint,
};

fn main() {
    tracing_subscriber::fmt::init();

    let rotor = RotorGeometry {
        number_of_blades: 3,
        tip_radius: 0.95,
        radius_distribution: vec![0.2, 0.4, 0.6, 0.8, 0.95],
        chord_distribution: vec![0.16, 0.15, 0.13, 0.10, 0.06],
        thickness_to_chord: vec![0.14, 0.11, 0.09, 0.07, 0.05],
        mid_chord_alignment: vec![0.0, 0.004, 0.010, 0.018, 0.028],
    };

    // two ground microphones, one rotor, positions rotor → microphone
    let mut positions = Array3::zeros((2, 1, 3));
    positions[[0, 0, 0]] = 60.0;
    positions[[0, 0, 1]] = 100.0;
    positions[[0, 0, 2]] = 15.0;
    positions[[1, 0, 0]] = -40.0;
    positions[[1, 0, 1]] = 120.0;
    positions[[1, 0, 2]] = 8.0;

    let operating = RotorOperatingPoint {
        angular_velocity: 220.0,
        angle_of_attack: 0.05,
        thrust_angle: 0.0,
        thrust_gradient: vec![0.25, 0.6, 0.95, 0.8, 0.4],
        torque_gradient: vec![0.06, 0.16, 0.25, 0.2, 0.1],
    };

    let (c_climb, rho_climb) = constants::isa_atmosphere(300.0);
    let (c_cruise, rho_cruise) = constants::isa_atmosphere(1500.0);
    let case = NoiseCase {
        rotor,
        positions,
        harmonics: (1..=8).collect(),
        bands: OctaveBands::default(),
        points: vec![
            ControlPoint {
                freestream: Freestream {
                    speed_of_sound: c_climb,
                    density: rho_climb,
                    velocity: [50.0, 0.0, 5.0],
                },
                operating: operating.clone(),
            },
            ControlPoint {
                freestream: Freestream {
                    speed_of_sound: c_cruise,
                    density: rho_cruise,
                    velocity: [72.0, 0.0, 0.0],
                },
                operating,
            },
        ],
    };

    println!("=== Propeller tonal noise demo ===");
    let accumulator = noise_core::compute(&case).expect("noise evaluation failed");

    for (i, spectrum) in accumulator.iter().enumerate() {
        let spectrum = spectrum.expect("slot not filled");
        println!("\n--- control point {i} ---");
        println!("blade-passing harmonics (mic 0):");
        for (h, f) in spectrum.frequencies.iter().enumerate() {
            println!(
                "  m={:>2}  f={:7.1} Hz  SPL={:6.1} dB  SPL(A)={:6.1} dBA",
                h + 1,
                f,
                spectrum.spl[[0, 0, h]],
                spectrum.spl_dba[[0, 0, h]],
            );
        }
        println!("A-weighted 1/3-octave bands with content (mic 0):");
        for (b, &center) in case.bands.center_frequencies.iter().enumerate() {
            let level = spectrum.band_spl_dba[[0, 0, b]];
            if level != 0.0 {
                println!("  {center:7.1} Hz  {level:6.1} dBA");
            }
        }
    }

    // one revolution of the blade-passing waveform at the first microphone
    let first = accumulator.get(0).expect("slot not filled");
    let amplitudes: Vec<f64> = (0..first.frequencies.len())
        .map(|h| constants::P_REF * 10f64.powf(first.spl[[0, 0, h]] / 20.0))
        .collect();
    let wave = signature::pressure_signature(&amplitudes, case.rotor.number_of_blades, 512)
        .expect("signature synthesis failed");
    let peak = wave.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    println!("\npressure signature: {} samples/rev, peak {:.4} Pa", wave.len(), peak);
}
