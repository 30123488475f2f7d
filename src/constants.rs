//! Physical constants in CGS units

/// One mega-electronvolt \[erg\]
pub const MEV: f64 = 1.602_176_634e-6;
/// One kilo-electronvolt \[erg\]
pub const KEV: f64 = MEV * 1e-3;
/// One barn \[cm^2\]
pub const BARN: f64 = 1e-24;

// Stefan-Boltzmann constant, only needed to derive the radiation constant
const SIGMA_SB: f64 = 5.670_374_419e-5;

/// Constants used by the microphysics and structure equations. Everything is passed around
/// explicitly so alternate constant sets can be used side by side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicalConstants {
    /// Gravitational constant \[cm^3 g^-1 s^-2\]
    pub grav: f64,
    /// Speed of light \[cm/s\]
    pub c: f64,
    /// Boltzmann constant \[erg/K\]
    pub k_b: f64,
    /// Radiation constant \[erg cm^-3 K^-4\]
    pub a_rad: f64,
    /// Thomson cross-section \[cm^2\]
    pub sigma_t: f64,
    /// Mass of a hydrogen atom \[g\]
    pub m_h: f64,
    /// Energy released per completed pp-chain \[erg\]
    pub q_pp: f64,
    /// Astrophysical S-factor of the p + p reaction at zero energy \[erg cm^2\]
    pub s0_pp: f64,
    /// Gamow energy of the p + p reaction \[erg\]
    pub e_gamow_pp: f64,
}

impl PhysicalConstants {
    /// CODATA 2018 values
    pub const fn cgs() -> Self {
        const C: f64 = 2.997_924_58e10;

        PhysicalConstants {
            // As defined by MESA
            grav: 6.67430e-8,
            c: C,
            k_b: 1.380_649e-16,
            a_rad: 4. * SIGMA_SB / C,
            sigma_t: 6.652_458_732_1e-25,
            m_h: 1.673_557_5e-24,
            q_pp: 26.73 * MEV,
            s0_pp: 4.01e-22 * KEV * BARN,
            e_gamow_pp: 493. * KEV,
        }
    }
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self::cgs()
    }
}
