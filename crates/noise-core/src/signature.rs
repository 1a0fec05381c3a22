use realfft::{ComplexToReal, RealFftPlanner};

use crate::error::{NoiseError, Result};

/// Synthesize one shaft revolution of the tonal pressure waveform (Pa) from
/// per-harmonic pressure amplitudes.
///
/// Harmonic `m` of blade passing lands at bin `m·B` of the revolution, so
/// every harmonic must sit strictly below the Nyquist bin
/// `samples_per_revolution / 2`. Phases are taken as zero; the waveform is
/// the incoherent line spectrum rendered as a cosine series.
pub fn pressure_signature(
    amplitudes: &[f64],
    blade_count: u32,
    samples_per_revolution: usize,
) -> Result<Vec<f64>> {
    if blade_count == 0 {
        return Err(NoiseError::InvalidInput(
            "blade count must be at least 1".into(),
        ));
    }
    let n = samples_per_revolution;
    if n < 4 {
        return Err(NoiseError::InvalidInput(format!(
            "samples per revolution {n} is too short for synthesis"
        )));
    }
    let nyquist_bin = n / 2;
    let highest_bin = amplitudes.len() * blade_count as usize;
    if highest_bin >= nyquist_bin {
        return Err(NoiseError::ShapeMismatch {
            context: "harmonic bins past Nyquist",
            expected: nyquist_bin - 1,
            actual: highest_bin,
        });
    }

    let mut planner = RealFftPlanner::<f64>::new();
    let ifft = planner.plan_fft_inverse(n);

    // realfft's inverse is unnormalized: a cosine of amplitude A at bin k is
    // the spectrum value A·n/2 followed by a 1/n scale of the output.
    let mut spectrum = ifft.make_input_vec();
    for (idx, &amp) in amplitudes.iter().enumerate() {
        let bin = (idx + 1) * blade_count as usize;
        spectrum[bin].re = amp * n as f64 / 2.0;
    }

    let mut output = ifft.make_output_vec();
    ifft.process(&mut spectrum, &mut output)
        .expect("inverse FFT failed");

    let norm = 1.0 / n as f64;
    for s in &mut output {
        *s *= norm;
    }
    Ok(output)
}
