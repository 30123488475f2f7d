//! Radial profiles produced by the integrator

use crate::{equations::Regime, integrator::Termination};

/// Local state of the star at a single grid point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StellarState {
    /// Radius \[cm\]
    pub r: f64,
    /// Enclosed mass \[g\]
    pub m: f64,
    /// Pressure \[erg/cm^3\]
    pub p: f64,
    /// Temperature \[K\]
    pub t: f64,
    /// Luminosity \[erg/s\]
    pub l: f64,
    /// Density \[g/cm^3\]
    pub rho: f64,
    /// Opacity \[cm^2/g\]
    pub kappa: f64,
    /// Energy generation rate \[erg/s/g\]
    pub epsilon: f64,
}

/// Global properties of an integrated star
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    /// Stellar radius \[cm\]
    pub radius: f64,
    /// Stellar mass \[g\]
    pub mass: f64,
    /// Stellar luminosity \[erg/s\]
    pub luminosity: f64,
    /// Number of retained grid points
    pub steps: usize,
    /// Why the integration stopped
    pub termination: Termination,
}

/// Result of a single integration, from the centre up to and including the last retained step.
/// All quantity slices have the same, non-zero, length.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    r_coord: Box<[f64]>,
    m_coord: Box<[f64]>,
    p: Box<[f64]>,
    t: Box<[f64]>,
    l: Box<[f64]>,
    rho: Box<[f64]>,
    kappa: Box<[f64]>,
    epsilon: Box<[f64]>,
    transport: Box<[Regime]>,
    termination: Termination,
}

impl Profile {
    pub(crate) fn from_states(
        states: &[StellarState],
        transport: Vec<Regime>,
        termination: Termination,
    ) -> Self {
        assert!(!states.is_empty());
        assert_eq!(transport.len() + 1, states.len());

        macro_rules! column {
            ($e: ident) => {
                states.iter().map(|state| state.$e).collect()
            };
        }

        Profile {
            r_coord: column!(r),
            m_coord: column!(m),
            p: column!(p),
            t: column!(t),
            l: column!(l),
            rho: column!(rho),
            kappa: column!(kappa),
            epsilon: column!(epsilon),
            transport: transport.into(),
            termination,
        }
    }

    /// Number of retained grid points
    pub fn len(&self) -> usize {
        self.r_coord.len()
    }

    /// Always false, the centre is always retained
    pub fn is_empty(&self) -> bool {
        self.r_coord.is_empty()
    }

    /// Radial coordinate \[cm\]
    pub fn r_coord(&self) -> &[f64] {
        &self.r_coord
    }

    /// Enclosed mass \[g\]
    pub fn m_coord(&self) -> &[f64] {
        &self.m_coord
    }

    /// Pressure \[erg/cm^3\]
    pub fn pressure(&self) -> &[f64] {
        &self.p
    }

    /// Temperature \[K\]
    pub fn temperature(&self) -> &[f64] {
        &self.t
    }

    /// Luminosity \[erg/s\]
    pub fn luminosity(&self) -> &[f64] {
        &self.l
    }

    /// Density \[g/cm^3\]
    pub fn density(&self) -> &[f64] {
        &self.rho
    }

    /// Opacity \[cm^2/g\]
    pub fn opacity(&self) -> &[f64] {
        &self.kappa
    }

    /// Energy generation rate \[erg/s/g\]
    pub fn epsilon(&self) -> &[f64] {
        &self.epsilon
    }

    /// Transport regime used on each interval, entry `i` covers the step from point `i` to
    /// point `i + 1`.
    pub fn transport(&self) -> &[Regime] {
        &self.transport
    }

    /// Why the integration stopped
    pub fn termination(&self) -> Termination {
        self.termination
    }

    /// Whether the profile ends at the stellar surface
    pub fn is_surface(&self) -> bool {
        self.termination == Termination::SurfaceReached
    }

    /// State at grid point `idx`
    pub fn state(&self, idx: usize) -> StellarState {
        StellarState {
            r: self.r_coord[idx],
            m: self.m_coord[idx],
            p: self.p[idx],
            t: self.t[idx],
            l: self.l[idx],
            rho: self.rho[idx],
            kappa: self.kappa[idx],
            epsilon: self.epsilon[idx],
        }
    }

    /// Iterate over all retained states, from the centre outward
    pub fn states(&self) -> impl ExactSizeIterator<Item = StellarState> + '_ {
        (0..self.len()).map(|idx| self.state(idx))
    }

    /// Outermost retained state
    pub fn last(&self) -> StellarState {
        self.state(self.len() - 1)
    }

    /// Stellar radius \[cm\]
    pub fn r_star(&self) -> f64 {
        self.last().r
    }

    /// Stellar mass \[g\]
    pub fn m_star(&self) -> f64 {
        self.last().m
    }

    /// Stellar luminosity \[erg/s\]
    pub fn l_star(&self) -> f64 {
        self.last().l
    }

    /// Radius, mass and luminosity at the last retained step
    pub fn summary(&self) -> Summary {
        let last = self.last();

        Summary {
            radius: last.r,
            mass: last.m,
            luminosity: last.l,
            steps: self.len(),
            termination: self.termination,
        }
    }

    /// Fraction of the integration intervals that were convective
    pub fn convective_fraction(&self) -> f64 {
        if self.transport.is_empty() {
            return 0.;
        }

        let convective = self
            .transport
            .iter()
            .filter(|&&regime| regime == Regime::Convective)
            .count();

        convective as f64 / self.transport.len() as f64
    }

    /// Number of leading points where pressure, temperature and density are all positive. This
    /// excludes the surface point.
    pub fn interior_len(&self) -> usize {
        self.states()
            .take_while(|state| state.p > 0. && state.t > 0. && state.rho > 0.)
            .count()
    }
}

/// Homology invariants and other dimensionless structure coefficients
pub mod homology;

/// GYRE stellar model export
#[cfg(feature = "hdf5")]
pub mod gsm;
