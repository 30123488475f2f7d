//! Batch driver reading commands from stdin.
//!
//! Commands are separated by newlines or `;`:
//!
//! - `grid R_MAX N`: grid used for all following models
//! - `model T0 P0 X Y`: integrate a single model
//! - `sweep T_LOW T_HIGH N P0 X Y`: integrate `N` models with central temperatures between
//!   `T_LOW` and `T_HIGH`, in parallel
//! - `report`: print a summary line for every model so far
//! - `output FILE`: write every model so far to `FILE`, one group per model (requires `hdf5`)
//! - `clear`: forget all models

use std::io::{self, BufRead};
use std::str::FromStr;

use color_eyre::eyre::{eyre, Context};
use color_eyre::Result;
use starbuild::sweep::{central_temperature_range, ModelInputs};
use starbuild::{CentralConditions, Composition, IntegrationParams, Integrator, Profile};
use tracing::info;
use tracing_subscriber::EnvFilter;

struct Solution {
    inputs: ModelInputs,
    profile: Profile,
}

fn arg<T: FromStr>(args: &[&str], idx: usize) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = args
        .get(idx)
        .ok_or_else(|| eyre!("Command `{}` expects at least {} arguments", args[0], idx))?;

    raw.parse()
        .wrap_err_with(|| format!("Could not parse argument {idx} (`{raw}`) of `{}`", args[0]))
}

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(io::stderr)
        .init();

    let mut integrator = Integrator::default();
    let mut solutions: Vec<Solution> = Vec::new();

    for line in io::stdin().lock().lines() {
        let line = line?;

        for command in line.split(";") {
            let args: Vec<&str> = command.split_whitespace().collect();

            if args.is_empty() {
                continue;
            }

            match args[0] {
                "grid" => {
                    integrator.params = IntegrationParams {
                        r_max: arg(&args, 1)?,
                        steps: arg(&args, 2)?,
                    };
                }
                "model" => {
                    let inputs = ModelInputs {
                        central: CentralConditions::new(arg(&args, 1)?, arg(&args, 2)?)?,
                        composition: Composition::new(arg(&args, 3)?, arg(&args, 4)?)?,
                    };
                    let profile = integrator.integrate(inputs.central, inputs.composition)?;

                    solutions.push(Solution { inputs, profile });
                }
                "sweep" => {
                    let composition = Composition::new(arg(&args, 5)?, arg(&args, 6)?)?;
                    let inputs = central_temperature_range(
                        arg(&args, 1)?,
                        arg(&args, 2)?,
                        arg(&args, 3)?,
                        arg(&args, 4)?,
                        composition,
                    )?;

                    info!(models = inputs.len(), "Starting sweep");

                    for (input, profile) in inputs.iter().zip(integrator.sweep(&inputs)) {
                        solutions.push(Solution {
                            inputs: *input,
                            profile: profile.wrap_err("Sweep failed")?,
                        });
                    }
                }
                "report" => {
                    for solution in &solutions {
                        let summary = solution.profile.summary();
                        println!(
                            "{:>14.6e}{:>14.6e}{:>8.4}{:>8.4}{:>14.6e}{:>14.6e}{:>14.6e}{:>8}  {}",
                            solution.inputs.central.temperature,
                            solution.inputs.central.pressure,
                            solution.inputs.composition.x(),
                            solution.inputs.composition.y(),
                            summary.radius,
                            summary.mass,
                            summary.luminosity,
                            summary.steps,
                            summary.termination,
                        );
                    }
                }
                "output" => {
                    let path: String = arg(&args, 1)?;
                    write_solutions(&solutions, &path, &integrator)?;
                }
                "clear" => solutions.clear(),
                command => return Err(eyre!("Unknown command '{command}'")),
            }
        }
    }

    Ok(())
}

#[cfg(feature = "hdf5")]
fn write_solutions(solutions: &[Solution], path: &str, integrator: &Integrator) -> Result<()> {
    use ndarray::aview0;

    let output = hdf5::File::create(path)?;

    for (i, solution) in solutions.iter().enumerate() {
        let group = output.create_group(format!("{i:05}").as_str())?;
        let summary = solution.profile.summary();

        for (name, value) in [
            ("T0", solution.inputs.central.temperature),
            ("P0", solution.inputs.central.pressure),
            ("X", solution.inputs.composition.x()),
            ("Y", solution.inputs.composition.y()),
            ("R_star", summary.radius),
            ("M_star", summary.mass),
            ("L_star", summary.luminosity),
        ] {
            group
                .new_attr_builder()
                .with_data(aview0(&value))
                .create(name)?;
        }

        group
            .new_attr_builder()
            .with_data(aview0(&solution.profile.is_surface()))
            .create("surface")?;

        for (name, data) in [
            ("r", solution.profile.r_coord()),
            ("M_r", solution.profile.m_coord()),
            ("P", solution.profile.pressure()),
            ("T", solution.profile.temperature()),
            ("L_r", solution.profile.luminosity()),
            ("rho", solution.profile.density()),
            ("kap", solution.profile.opacity()),
            ("eps", solution.profile.epsilon()),
        ] {
            group.new_dataset_builder().with_data(data).create(name)?;
        }
    }

    info!(models = solutions.len(), path, r_max = integrator.params.r_max, "Wrote models");

    Ok(())
}

#[cfg(not(feature = "hdf5"))]
fn write_solutions(_: &[Solution], _: &str, _: &Integrator) -> Result<()> {
    Err(eyre!("starbuild-batch was built without the `hdf5` feature"))
}
