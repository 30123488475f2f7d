//! Batches of independent models
//!
//! Every integration owns its working state, so separate models are integrated in parallel. A
//! single model is always integrated serially.

use rayon::prelude::*;

use crate::{
    composition::Composition,
    integrator::{BuildError, CentralConditions, Integrator},
    model::Profile,
};

/// Inputs for one model of a batch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelInputs {
    /// Central boundary conditions
    pub central: CentralConditions,
    /// Composition
    pub composition: Composition,
}

impl Integrator {
    /// Integrate all models in parallel. Results are in the same order as `inputs`.
    pub fn sweep(&self, inputs: &[ModelInputs]) -> Vec<Result<Profile, BuildError>> {
        inputs
            .par_iter()
            .map(|input| self.integrate(input.central, input.composition))
            .collect()
    }
}

/// `n` models with linearly spaced central temperatures between `lower` and `upper`, all other
/// inputs fixed.
pub fn central_temperature_range(
    lower: f64,
    upper: f64,
    n: usize,
    pressure: f64,
    composition: Composition,
) -> Result<Vec<ModelInputs>, BuildError> {
    if n == 1 {
        return Ok(vec![ModelInputs {
            central: CentralConditions::new(lower, pressure)?,
            composition,
        }]);
    }

    (0..n)
        .map(|i| lower + (upper - lower) * i as f64 / (n - 1) as f64)
        .map(|temperature| {
            Ok(ModelInputs {
                central: CentralConditions::new(temperature, pressure)?,
                composition,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{integrator::IntegrationParams, Termination};

    fn composition() -> Composition {
        Composition::new(0.7, 0.28).unwrap()
    }

    #[test]
    fn temperature_range() {
        let inputs = central_temperature_range(1e7, 2e7, 3, 1e18, composition()).unwrap();

        assert_eq!(inputs.len(), 3);
        assert_eq!(inputs[0].central.temperature, 1e7);
        assert_eq!(inputs[1].central.temperature, 1.5e7);
        assert_eq!(inputs[2].central.temperature, 2e7);
    }

    #[test]
    fn rejects_non_physical() {
        assert!(central_temperature_range(-1e7, 2e7, 3, 1e18, composition()).is_err());
    }

    #[test]
    fn matches_individual_runs() {
        let integrator = Integrator::default();
        let inputs = central_temperature_range(1.2e7, 1.8e7, 4, 1e18, composition()).unwrap();
        let results = integrator.sweep(&inputs);

        assert_eq!(results.len(), inputs.len());
        for (input, result) in inputs.iter().zip(results) {
            let single = integrator
                .integrate(input.central, input.composition)
                .unwrap();
            assert_eq!(result.unwrap(), single);
        }
    }

    #[test]
    fn exhausted_grid_is_reported_per_model() {
        let integrator = Integrator::new(IntegrationParams {
            r_max: 1e6,
            steps: 1000,
        });
        let inputs = central_temperature_range(1e7, 2e7, 2, 1e18, composition()).unwrap();

        for result in integrator.sweep(&inputs) {
            assert_eq!(result.unwrap().termination(), Termination::GridExhausted);
        }
    }
}
