//! Radial grid for the outward integration

use crate::integrator::BuildError;

/// Uniform radial grid, offset by half a step from the centre so that `1/r²` terms stay finite.
#[derive(Debug, Clone)]
pub struct RadialGrid {
    points: Box<[f64]>,
    step: f64,
}

fn linspace(lower: f64, upper: f64, n: usize) -> impl Iterator<Item = f64> {
    (0..n).map(move |x| lower + (upper - lower) * (x as f64) / ((n - 1) as f64))
}

impl RadialGrid {
    /// `n` equally spaced points over `[0, r_max]`, each shifted outward by half the spacing.
    pub fn new(r_max: f64, n: usize) -> Result<Self, BuildError> {
        if n < 2 || !r_max.is_finite() || r_max <= 0. {
            return Err(BuildError::InvalidGrid { r_max, steps: n });
        }

        let step = r_max / (n - 1) as f64;

        Ok(RadialGrid {
            points: linspace(0., r_max, n).map(|r| r + step / 2.).collect(),
            step,
        })
    }

    /// Spacing between consecutive points \[cm\]
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false, a grid has at least two points
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Radius of point `idx` \[cm\]
    pub fn radius(&self, idx: usize) -> f64 {
        self.points[idx]
    }

    /// All radii \[cm\]
    pub fn as_slice(&self) -> &[f64] {
        &self.points
    }

    /// Iterate over all radii
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().copied()
    }
}
