//! Right-hand sides of the stellar structure equations
//!
//! Each derivative is a pure function of the local state at radius `r`.

use std::f64::consts::PI;

use crate::constants::PhysicalConstants;

/// Adiabatic index of a monatomic, fully ionised ideal gas
pub const ADIABATIC_INDEX: f64 = 5. / 3.;

/// Mass conservation, dM/dr \[g/cm\]
pub fn dm_dr(r: f64, rho: f64) -> f64 {
    4. * PI * r.powi(2) * rho
}

/// Hydrostatic equilibrium, dP/dr \[erg/cm^4\]
pub fn dp_dr(r: f64, m: f64, rho: f64, constants: &PhysicalConstants) -> f64 {
    -constants.grav * m * rho / r.powi(2)
}

/// Radiative diffusion, dT/dr \[K/cm\]
pub fn dt_dr_radiative(
    r: f64,
    l: f64,
    kappa: f64,
    rho: f64,
    t: f64,
    constants: &PhysicalConstants,
) -> f64 {
    -(3. * l * kappa * rho) / (4. * PI * r.powi(2) * 4. * constants.a_rad * constants.c * t.powi(3))
}

/// Adiabatic temperature gradient, the threshold beyond which convection sets in \[K/cm\]
pub fn dt_dr_convective(t: f64, p: f64, dp_dr: f64) -> f64 {
    (ADIABATIC_INDEX - 1.) / ADIABATIC_INDEX * t / p * dp_dr
}

/// Energy generation, dL/dr \[erg/s/cm\]
pub fn dl_dr(r: f64, rho: f64, epsilon: f64) -> f64 {
    4. * PI * r.powi(2) * rho * epsilon
}

/// Mode of energy transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Regime {
    /// Energy carried by photon diffusion
    Radiative,
    /// Energy carried by convective motions
    Convective,
}

/// Temperature gradient together with the transport regime it originates from
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TemperatureGradient {
    /// The radiative gradient is stable against convection
    Radiative(f64),
    /// The radiative gradient is steeper than the adiabatic one
    Convective(f64),
}

impl TemperatureGradient {
    /// dT/dr \[K/cm\]
    pub fn value(&self) -> f64 {
        match *self {
            TemperatureGradient::Radiative(value) | TemperatureGradient::Convective(value) => value,
        }
    }

    /// Regime that was selected
    pub fn regime(&self) -> Regime {
        match self {
            TemperatureGradient::Radiative(_) => Regime::Radiative,
            TemperatureGradient::Convective(_) => Regime::Convective,
        }
    }
}

/// Schwarzschild criterion. Both gradients are negative inside the star, so only magnitudes are
/// compared. Equality stays radiative.
pub fn select_gradient(dt_dr_rad: f64, t: f64, p: f64, dp_dr: f64) -> TemperatureGradient {
    let dt_dr_conv = dt_dr_convective(t, p, dp_dr);

    if dt_dr_rad.abs() > dt_dr_conv.abs() {
        TemperatureGradient::Convective(dt_dr_conv)
    } else {
        TemperatureGradient::Radiative(dt_dr_rad)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    const T: f64 = 1.5e7;
    const P: f64 = 1e18;
    const DP_DR: f64 = -1.0;

    #[test]
    fn convective_threshold() {
        assert_relative_eq!(dt_dr_convective(T, P, DP_DR), -6e-12, max_relative = 1e-12);
    }

    #[test]
    fn selects_convective_when_radiative_is_steeper() {
        let gradient = select_gradient(-1e-11, T, P, DP_DR);

        assert_eq!(gradient.regime(), Regime::Convective);
        assert_relative_eq!(gradient.value(), -6e-12, max_relative = 1e-12);
    }

    #[test]
    fn selects_radiative_when_radiative_is_shallower() {
        let gradient = select_gradient(-1e-12, T, P, DP_DR);

        assert_eq!(gradient, TemperatureGradient::Radiative(-1e-12));
    }

    #[test]
    fn compares_magnitudes_only() {
        // Positive radiative gradient of large magnitude still triggers convection
        let gradient = select_gradient(1e-11, T, P, DP_DR);

        assert_eq!(gradient.regime(), Regime::Convective);
    }

    #[test]
    fn centre_is_radiative() {
        // No luminosity and no enclosed mass: both gradients vanish
        let gradient = select_gradient(0., T, P, 0.);

        assert_eq!(gradient, TemperatureGradient::Radiative(0.));
    }

    #[test]
    fn derivatives() {
        let c = PhysicalConstants::cgs();

        assert_relative_eq!(dm_dr(2., 1.), 16. * PI);
        assert_relative_eq!(dl_dr(2., 1., 3.), 48. * PI);
        assert_relative_eq!(dp_dr(2., 4., 1., &c), -c.grav);
        assert_eq!(dp_dr(1e8, 0., 100., &c), 0.);
        assert_eq!(dt_dr_radiative(1e8, 0., 0.34, 100., T, &c), 0.);
        assert!(dt_dr_radiative(1e8, 1e33, 0.34, 100., T, &c) < 0.);
    }
}
