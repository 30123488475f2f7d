//! Equation of state, opacity and nuclear energy generation
//!
//! All of these are pure functions of the local state and the composition.

use std::f64::consts::SQRT_2;

use crate::constants::PhysicalConstants;

const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// Ideal gas equation of state solved for the density \[g/cm^3\].
///
/// `mean_particle_mass` is the mass per free particle, see
/// [Composition::mean_particle_mass](crate::Composition::mean_particle_mass). Only meaningful for
/// positive temperatures.
pub fn density(p: f64, t: f64, mean_particle_mass: f64, constants: &PhysicalConstants) -> f64 {
    mean_particle_mass / (constants.k_b * t) * p
}

/// Electron scattering opacity of a fully ionised gas \[cm^2/g\]
pub fn opacity(x: f64, constants: &PhysicalConstants) -> f64 {
    constants.sigma_t / (2. * constants.m_h) * (1. + x)
}

/// Energy generation rate of the pp-chain, with the reaction constants folded into a prefactor
/// and the Gamow exponent.
///
/// The thermally averaged cross-section uses the Gaussian approximation of the Gamow peak for a
/// non-resonant reaction between two protons,
/// `<σv> = 4√2 / (√3 ∛2) μ^(-1/2) S0 E_G^(1/6) (kT)^(-2/3) exp(-3 (E_G / 4kT)^(1/3))`.
#[derive(Debug, Clone, Copy)]
pub struct PpChain {
    coefficient: f64,
    beta: f64,
}

impl PpChain {
    /// Precompute the rate constants
    pub fn new(constants: &PhysicalConstants) -> Self {
        let reduced_mass = 0.5 * constants.m_h;
        // Identical particles, each reaction counted once. A full chain burns two p+p reactions.
        let rate = 0.5 * constants.q_pp / (2. * constants.m_h.powi(2));
        let sigma_v = 4. * SQRT_2 / (SQRT_3 * 2f64.cbrt())
            * reduced_mass.powf(-0.5)
            * constants.s0_pp
            * constants.e_gamow_pp.powf(1. / 6.)
            * constants.k_b.powf(-2. / 3.);

        PpChain {
            coefficient: rate * sigma_v,
            beta: 3. * (constants.e_gamow_pp / (4. * constants.k_b)).cbrt(),
        }
    }

    /// Prefactor `C` in `ε = C ρ X² T^(-2/3) exp(-β T^(-1/3))`
    pub fn coefficient(&self) -> f64 {
        self.coefficient
    }

    /// Gamow exponent `β` \[K^(1/3)\]
    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Energy generation rate \[erg/s/g\]
    pub fn epsilon(&self, rho: f64, t: f64, x: f64) -> f64 {
        self.coefficient * rho * x.powi(2) * t.powf(-2. / 3.) * (-self.beta * t.powf(-1. / 3.)).exp()
    }
}

/// Energy generation rate of the pp-chain \[erg/s/g\]. Prefer [PpChain] when evaluating many
/// points.
pub fn epsilon(rho: f64, t: f64, x: f64, constants: &PhysicalConstants) -> f64 {
    PpChain::new(constants).epsilon(rho, t, x)
}
