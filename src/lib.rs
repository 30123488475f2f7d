//! Stellar structure by explicit Euler integration
//!
//! Starting from central boundary conditions and a composition, [build_star] marches the four
//! coupled structure equations (mass conservation, hydrostatic equilibrium, energy transport and
//! nuclear energy generation) outward on a fixed radial grid until the surface is reached. All
//! quantities are in CGS units.
#![allow(clippy::needless_range_loop)] // Makes math code less readable
#![warn(missing_docs)]

pub mod composition;
pub mod constants;
pub mod equations;
pub mod grid;
pub mod integrator;
pub mod microphysics;
pub mod model;
pub mod sweep;

pub use composition::Composition;
pub use constants::PhysicalConstants;
pub use integrator::{
    build_star, build_star_with, BuildError, CentralConditions, IntegrationParams, Integrator,
    Quantity, Termination,
};
pub use model::{Profile, StellarState, Summary};
