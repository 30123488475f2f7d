//! Outward integration of the structure equations with a fixed-step explicit Euler scheme

use std::fmt::Display;

use nalgebra::Vector4;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    composition::Composition,
    constants::PhysicalConstants,
    equations::{dl_dr, dm_dr, dp_dr, dt_dr_radiative, select_gradient, Regime},
    grid::RadialGrid,
    microphysics::{density, opacity, PpChain},
    model::{Profile, StellarState},
};

/// Errors that prevent an integration from starting
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum BuildError {
    /// Mass fractions outside `[0, 1]`, or hydrogen and helium summing to more than one.
    #[error("Invalid composition X = {x}, Y = {y}")]
    InvalidComposition {
        /// Hydrogen fraction that was passed
        x: f64,
        /// Helium fraction that was passed
        y: f64,
    },
    /// Central temperature or pressure are not positive, or produce a non-finite centre.
    #[error("Non-physical central conditions T0 = {temperature} K, P0 = {pressure} erg/cm^3")]
    NonPhysicalBoundary {
        /// Central temperature \[K\]
        temperature: f64,
        /// Central pressure \[erg/cm^3\]
        pressure: f64,
    },
    /// The radial grid needs at least two points and a positive, finite extent.
    #[error("Invalid radial grid, r_max = {r_max} cm with {steps} points")]
    InvalidGrid {
        /// Outer edge of the grid \[cm\]
        r_max: f64,
        /// Number of grid points
        steps: usize,
    },
}

/// Quantities tracked during the integration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantity {
    /// Enclosed mass
    Mass,
    /// Pressure
    Pressure,
    /// Temperature
    Temperature,
    /// Luminosity
    Luminosity,
    /// Density
    Density,
    /// Opacity
    Opacity,
    /// Energy generation rate
    EnergyGeneration,
}

impl Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Quantity::Mass => "mass",
            Quantity::Pressure => "pressure",
            Quantity::Temperature => "temperature",
            Quantity::Luminosity => "luminosity",
            Quantity::Density => "density",
            Quantity::Opacity => "opacity",
            Quantity::EnergyGeneration => "energy generation",
        };

        write!(f, "{name}")
    }
}

// Order of the components in the Euler state vector
const STATE_QUANTITIES: [Quantity; 4] = [
    Quantity::Mass,
    Quantity::Pressure,
    Quantity::Temperature,
    Quantity::Luminosity,
];

/// Reason the integration stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Pressure, temperature or density became non-positive. The last retained step is the
    /// surface of the star.
    SurfaceReached,
    /// The grid ended before the surface was found. `r_max` was too small for these central
    /// conditions.
    GridExhausted,
    /// `quantity` became non-finite at `step`. The profile ends at the step before.
    NumericBreakdown {
        /// Step at which the non-finite value appeared
        step: usize,
        /// The offending quantity
        quantity: Quantity,
    },
}

impl Display for Termination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Termination::SurfaceReached => write!(f, "surface reached"),
            Termination::GridExhausted => write!(f, "grid exhausted before the surface"),
            Termination::NumericBreakdown { step, quantity } => {
                write!(f, "non-finite {quantity} at step {step}")
            }
        }
    }
}

/// Grid parameters of the integration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegrationParams {
    /// Outer edge of the radial grid \[cm\]
    pub r_max: f64,
    /// Number of grid points
    pub steps: usize,
}

impl Default for IntegrationParams {
    fn default() -> Self {
        IntegrationParams {
            r_max: 1e12,
            steps: 100_000,
        }
    }
}

/// Boundary conditions at the centre of the star
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CentralConditions {
    /// Central temperature \[K\]
    pub temperature: f64,
    /// Central pressure \[erg/cm^3\]
    pub pressure: f64,
}

impl CentralConditions {
    /// Both values need to be positive and finite
    pub fn new(temperature: f64, pressure: f64) -> Result<Self, BuildError> {
        let central = CentralConditions {
            temperature,
            pressure,
        };
        central.validate()?;

        Ok(central)
    }

    fn validate(&self) -> Result<(), BuildError> {
        let physical = |v: f64| v.is_finite() && v > 0.;

        if physical(self.temperature) && physical(self.pressure) {
            Ok(())
        } else {
            Err(self.non_physical())
        }
    }

    fn non_physical(&self) -> BuildError {
        BuildError::NonPhysicalBoundary {
            temperature: self.temperature,
            pressure: self.pressure,
        }
    }
}

/// Local quantities that follow from pressure, temperature and composition
struct Microphysics<'c> {
    constants: &'c PhysicalConstants,
    mean_particle_mass: f64,
    x: f64,
    pp: PpChain,
}

struct Derived {
    rho: f64,
    kappa: f64,
    epsilon: f64,
}

impl Derived {
    fn non_finite(&self) -> Option<Quantity> {
        [
            (self.rho, Quantity::Density),
            (self.kappa, Quantity::Opacity),
            (self.epsilon, Quantity::EnergyGeneration),
        ]
        .into_iter()
        .find_map(|(value, quantity)| (!value.is_finite()).then_some(quantity))
    }
}

impl Microphysics<'_> {
    fn eval(&self, p: f64, t: f64) -> Derived {
        let rho = density(p, t, self.mean_particle_mass, self.constants);

        Derived {
            rho,
            kappa: opacity(self.x, self.constants),
            epsilon: self.pp.epsilon(rho, t, self.x),
        }
    }
}

/// Explicit Euler integrator for the structure equations
#[derive(Debug, Clone, Copy, Default)]
pub struct Integrator {
    /// Constants used by all equations
    pub constants: PhysicalConstants,
    /// Grid parameters
    pub params: IntegrationParams,
}

impl Integrator {
    /// Integrator with the default CGS constants
    pub fn new(params: IntegrationParams) -> Self {
        Integrator {
            constants: PhysicalConstants::default(),
            params,
        }
    }

    /// Replace the physical constants
    pub fn with_constants(self, constants: PhysicalConstants) -> Self {
        Integrator { constants, ..self }
    }

    /// Integrate from the centre outward until the surface is reached or the grid ends.
    ///
    /// Running out of grid or hitting non-finite values is not an error, the partial profile is
    /// returned with the corresponding [Termination].
    pub fn integrate(
        &self,
        central: CentralConditions,
        composition: Composition,
    ) -> Result<Profile, BuildError> {
        central.validate()?;
        let grid = RadialGrid::new(self.params.r_max, self.params.steps)?;
        let dr = grid.step();

        let micro = Microphysics {
            constants: &self.constants,
            mean_particle_mass: composition.mean_particle_mass(&self.constants),
            x: composition.x(),
            pp: PpChain::new(&self.constants),
        };

        debug!(
            r_max = self.params.r_max,
            steps = grid.len(),
            dr,
            mean_particle_mass = micro.mean_particle_mass,
            pp_coefficient = micro.pp.coefficient(),
            pp_beta = micro.pp.beta(),
            "Starting integration"
        );

        let centre = micro.eval(central.pressure, central.temperature);
        if centre.non_finite().is_some() || centre.rho <= 0. {
            return Err(central.non_physical());
        }

        let mut states = vec![StellarState {
            r: grid.radius(0),
            m: 0.,
            p: central.pressure,
            t: central.temperature,
            l: 0.,
            rho: centre.rho,
            kappa: centre.kappa,
            epsilon: centre.epsilon,
        }];
        let mut transport: Vec<Regime> = Vec::new();
        let mut termination = Termination::GridExhausted;

        for i in 1..grid.len() {
            let prev = states[i - 1];
            let r = prev.r;

            let dpdr = dp_dr(r, prev.m, prev.rho, &self.constants);
            let gradient = select_gradient(
                dt_dr_radiative(r, prev.l, prev.kappa, prev.rho, prev.t, &self.constants),
                prev.t,
                prev.p,
                dpdr,
            );
            let derivative = Vector4::new(
                dm_dr(r, prev.rho),
                dpdr,
                gradient.value(),
                dl_dr(r, prev.rho, prev.epsilon),
            );

            let next = Vector4::new(prev.m, prev.p, prev.t, prev.l) + derivative * dr;

            if let Some(idx) = next.iter().position(|v| !v.is_finite()) {
                termination = Termination::NumericBreakdown {
                    step: i,
                    quantity: STATE_QUANTITIES[idx],
                };
                break;
            }

            let (m, p, t, l) = (next[0], next[1], next[2], next[3]);

            if p <= 0. || t <= 0. {
                // Equation of state no longer applies, the density vanishes at the surface
                states.push(StellarState {
                    r: grid.radius(i),
                    m,
                    p,
                    t,
                    l,
                    rho: 0.,
                    kappa: opacity(micro.x, &self.constants),
                    epsilon: 0.,
                });
                transport.push(gradient.regime());
                termination = Termination::SurfaceReached;
                break;
            }

            let derived = micro.eval(p, t);

            if let Some(quantity) = derived.non_finite() {
                termination = Termination::NumericBreakdown { step: i, quantity };
                break;
            }

            states.push(StellarState {
                r: grid.radius(i),
                m,
                p,
                t,
                l,
                rho: derived.rho,
                kappa: derived.kappa,
                epsilon: derived.epsilon,
            });
            transport.push(gradient.regime());

            if derived.rho <= 0. {
                termination = Termination::SurfaceReached;
                break;
            }
        }

        let profile = Profile::from_states(&states, transport, termination);
        let summary = profile.summary();

        match termination {
            Termination::SurfaceReached => info!(
                steps = summary.steps,
                radius = summary.radius,
                mass = summary.mass,
                luminosity = summary.luminosity,
                convective_fraction = profile.convective_fraction(),
                "Surface reached"
            ),
            Termination::GridExhausted => warn!(
                r_max = self.params.r_max,
                pressure = profile.last().p,
                temperature = profile.last().t,
                "Grid exhausted before reaching the surface, increase r_max"
            ),
            Termination::NumericBreakdown { step, quantity } => warn!(
                step,
                %quantity,
                dr,
                "Integration broke down, reduce the step size"
            ),
        }

        Ok(profile)
    }
}

/// Build a star with the default grid and constants.
///
/// ```
/// use starbuild::{build_star, Termination};
///
/// let star = build_star(1.5e7, 1e18, 0.7, 0.28).unwrap();
/// assert_eq!(star.termination(), Termination::SurfaceReached);
/// ```
pub fn build_star(t0: f64, p0: f64, x: f64, y: f64) -> Result<Profile, BuildError> {
    build_star_with(t0, p0, x, y, IntegrationParams::default())
}

/// Build a star on a custom grid with the default constants
pub fn build_star_with(
    t0: f64,
    p0: f64,
    x: f64,
    y: f64,
    params: IntegrationParams,
) -> Result<Profile, BuildError> {
    let composition = Composition::new(x, y)?;
    let central = CentralConditions::new(t0, p0)?;

    Integrator::new(params).integrate(central, composition)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sun_like() -> Profile {
        build_star(1.5e7, 1e18, 0.7, 0.28).unwrap()
    }

    #[test]
    fn reaches_surface() {
        let star = sun_like();
        let summary = star.summary();

        assert_eq!(star.termination(), Termination::SurfaceReached);
        assert!(summary.steps < 100_000);
        assert!(summary.radius > 1e10 && summary.radius < 1e11);
        assert!(summary.mass > 10f64.powf(32.5) && summary.mass < 10f64.powf(33.5));
        // Thomson opacity alone lets the luminosity climb close to 1e34
        assert!(summary.luminosity > 1e33 && summary.luminosity < 3e34);
        approx::assert_relative_eq!(summary.luminosity, 9.71e33, max_relative = 0.05);
    }

    #[test]
    fn surface_is_last_step_only() {
        let star = sun_like();
        let n = star.len();

        for state in star.states().take(n - 1) {
            assert!(state.p > 0. && state.t > 0. && state.rho > 0.);
        }

        let surface = star.last();
        assert!(surface.p <= 0. || surface.t <= 0. || surface.rho <= 0.);
        assert!(surface.rho >= 0. && surface.epsilon.is_finite());
        assert_eq!(star.transport().len(), n - 1);
    }

    #[test]
    fn monotonic_near_centre() {
        let star = sun_like();

        for (inner, outer) in star.states().zip(star.states().skip(1)).take(100) {
            assert!(outer.m >= inner.m);
            assert!(outer.p <= inner.p);
            assert!(outer.t <= inner.t);
            assert!(outer.l >= inner.l);
        }
    }

    #[test]
    fn first_step_matches_centre() {
        let star = sun_like();
        let centre = star.state(0);

        assert_eq!(centre.m, 0.);
        assert_eq!(centre.l, 0.);
        assert_eq!(centre.t, 1.5e7);
        assert_eq!(centre.p, 1e18);
        assert_eq!(centre.r, 1e12 / 99_999. / 2.);
        // No enclosed mass or luminosity yet, so nothing changes over the first interval
        assert_eq!(star.state(1).p, 1e18);
        assert_eq!(star.state(1).t, 1.5e7);
        assert!(star.state(1).m > 0.);
    }

    #[test]
    fn uses_previous_density() {
        let star = sun_like();
        let dr = star.state(1).r - star.state(0).r;
        let c = PhysicalConstants::cgs();

        let (prev, next) = (star.state(5), star.state(6));
        let expected = prev.p + dp_dr(prev.r, prev.m, prev.rho, &c) * dr;
        approx::assert_relative_eq!(next.p, expected, max_relative = 1e-9);
    }

    #[test]
    fn grid_exhausted() {
        let star = build_star_with(
            1.5e7,
            1e18,
            0.7,
            0.28,
            IntegrationParams {
                r_max: 1e6,
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(star.termination(), Termination::GridExhausted);
        assert!(!star.is_surface());
        assert_eq!(star.len(), 100_000);
        assert!(star.last().p > 0. && star.last().t > 0.);
    }

    #[test]
    fn numeric_breakdown() {
        // A gravitational constant this large drives the pressure to -inf in a single step
        let integrator = Integrator::new(IntegrationParams {
            r_max: 1e12,
            steps: 100,
        })
        .with_constants(PhysicalConstants {
            grav: f64::MAX,
            ..Default::default()
        });

        let star = integrator
            .integrate(
                CentralConditions::new(1.5e7, 1e18).unwrap(),
                Composition::new(0.7, 0.28).unwrap(),
            )
            .unwrap();

        assert!(matches!(
            star.termination(),
            Termination::NumericBreakdown {
                step: 2,
                quantity: Quantity::Pressure
            }
        ));
        assert_eq!(star.len(), 2);
    }

    #[test]
    fn density_breakdown_mid_run() {
        // Repulsive gravity makes the pressure grow outward. Without energy generation the
        // temperature stays put, so the density overflows while the state is still finite.
        let integrator = Integrator::new(IntegrationParams {
            r_max: 1.,
            steps: 1000,
        })
        .with_constants(PhysicalConstants {
            grav: -1.,
            k_b: 1e-60,
            s0_pp: 0.,
            ..Default::default()
        });

        let star = integrator
            .integrate(
                CentralConditions::new(1.5e7, 1e18).unwrap(),
                Composition::new(0.7, 0.28).unwrap(),
            )
            .unwrap();

        assert_eq!(
            star.termination(),
            Termination::NumericBreakdown {
                step: 4,
                quantity: Quantity::Density
            }
        );
        assert_eq!(star.len(), 4);
        assert_eq!(star.transport().len(), 3);
        assert!(star.states().all(|s| s.p.is_finite() && s.rho.is_finite()));
        assert_eq!(star.last().t, 1.5e7);
    }

    #[test]
    fn invalid_composition() {
        assert_eq!(
            build_star(1.5e7, 1e18, 0.9, 0.9).unwrap_err(),
            BuildError::InvalidComposition { x: 0.9, y: 0.9 }
        );
    }

    #[test]
    fn non_physical_boundary() {
        assert!(matches!(
            build_star(0., 1e18, 0.7, 0.28),
            Err(BuildError::NonPhysicalBoundary { .. })
        ));
        assert!(matches!(
            build_star(1.5e7, -1., 0.7, 0.28),
            Err(BuildError::NonPhysicalBoundary { .. })
        ));
    }

    #[test]
    fn central_density_overflow() {
        // Both inputs are finite and positive, but ρ = m̄ P / (k_B T) is not
        assert_eq!(
            build_star(1e-300, 1e300, 0.7, 0.28).unwrap_err(),
            BuildError::NonPhysicalBoundary {
                temperature: 1e-300,
                pressure: 1e300
            }
        );
    }

    #[test]
    fn invalid_grid() {
        let result = build_star_with(
            1.5e7,
            1e18,
            0.7,
            0.28,
            IntegrationParams {
                r_max: 1e12,
                steps: 1,
            },
        );

        assert!(matches!(result, Err(BuildError::InvalidGrid { steps: 1, .. })));
    }

    #[test]
    fn deterministic() {
        assert_eq!(sun_like(), sun_like());
    }
}
