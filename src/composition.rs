//! Chemical composition of the stellar material

use crate::{constants::PhysicalConstants, integrator::BuildError};

/// Mass fractions of hydrogen and helium. The metal fraction is whatever remains.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Composition {
    x: f64,
    y: f64,
}

impl Composition {
    /// Construct from hydrogen fraction `x` and helium fraction `y`. Both need to lie in
    /// `[0, 1]` and may not sum to more than one.
    pub fn new(x: f64, y: f64) -> Result<Self, BuildError> {
        let in_range = |f: f64| f.is_finite() && (0.0..=1.0).contains(&f);

        if !in_range(x) || !in_range(y) || x + y > 1.0 {
            return Err(BuildError::InvalidComposition { x, y });
        }

        Ok(Composition { x, y })
    }

    /// Hydrogen mass fraction
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Helium mass fraction
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Metal mass fraction
    pub fn z(&self) -> f64 {
        1.0 - self.x - self.y
    }

    /// Mean molecular weight of a fully ionised gas
    pub fn mean_molecular_weight(&self) -> f64 {
        1.0 / (2.0 * self.x + 0.75 * self.y + 0.5 * self.z())
    }

    /// Mean mass per free particle \[g\]
    pub fn mean_particle_mass(&self, constants: &PhysicalConstants) -> f64 {
        self.mean_molecular_weight() * constants.m_h
    }
}
