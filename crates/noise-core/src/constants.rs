/// Reference sound pressure for SPL, 2×10⁻⁵ Pa.
pub const P_REF: f64 = 2.0e-5;

/// Speed of sound in air (m/s) and density (kg/m³) as a function of
/// temperature in °C. Uses the ideal-gas approximation; handy for ground
/// microphones at ambient conditions.
pub fn speed_of_sound_and_density(temperature_c: f64) -> (f64, f64) {
    let t_kelvin = temperature_c + 273.15;
    // c = 331.3 * sqrt(T/273.15)
    let c = 331.3 * (t_kelvin / 273.15).sqrt();
    // ρ = p / (R_specific * T), with p = 101325 Pa, R_specific = 287.05 J/(kg·K)
    let rho = 101325.0 / (287.05 * t_kelvin);
    (c, rho)
}

/// ISA troposphere speed of sound (m/s) and density (kg/m³) at a geometric
/// altitude in metres. Valid through the tropopause at 11 km; altitudes are
/// clamped to that range.
pub fn isa_atmosphere(altitude_m: f64) -> (f64, f64) {
    const T0: f64 = 288.15; // sea-level temperature, K
    const P0: f64 = 101_325.0; // sea-level pressure, Pa
    const LAPSE: f64 = -0.0065; // K/m
    const R_AIR: f64 = 287.05; // J/(kg·K)
    const G0: f64 = 9.80665; // m/s²
    const GAMMA: f64 = 1.4;

    let h = altitude_m.clamp(0.0, 11_000.0);
    let t = T0 + LAPSE * h;
    let p = P0 * (t / T0).powf(-G0 / (LAPSE * R_AIR));
    let rho = p / (R_AIR * t);
    let c = (GAMMA * R_AIR * t).sqrt();
    (c, rho)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_of_sound_at_20c() {
        let (c, rho) = speed_of_sound_and_density(20.0);
        assert!((c - 343.2).abs() < 0.5, "c = {c}");
        assert!((rho - 1.204).abs() < 0.01, "rho = {rho}");
    }

    #[test]
    fn test_isa_sea_level() {
        let (c, rho) = isa_atmosphere(0.0);
        assert!((c - 340.3).abs() < 0.2, "c = {c}");
        assert!((rho - 1.225).abs() < 0.001, "rho = {rho}");
    }

    #[test]
    fn test_isa_tropopause() {
        let (c, rho) = isa_atmosphere(11_000.0);
        assert!((c - 295.1).abs() < 0.3, "c = {c}");
        assert!((rho - 0.364).abs() < 0.002, "rho = {rho}");
    }

    #[test]
    fn test_isa_density_decreases_with_altitude() {
        let mut prev = f64::INFINITY;
        for km in 0..=11 {
            let (_, rho) = isa_atmosphere(km as f64 * 1000.0);
            assert!(rho < prev, "density not decreasing at {km} km");
            prev = rho;
        }
    }

    #[test]
    fn test_isa_clamps_below_sea_level() {
        assert_eq!(isa_atmosphere(-500.0), isa_atmosphere(0.0));
    }
}
