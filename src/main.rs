use std::path::{Path, PathBuf};

use clap::Parser;
use color_eyre::eyre::{eyre, Context};
use color_eyre::Result;
use starbuild::{
    CentralConditions, Composition, IntegrationParams, Integrator, PhysicalConstants, Profile,
};
use tracing_subscriber::EnvFilter;

/// Integrate a stellar structure model outward from its centre
#[derive(Parser, Debug)]
#[command(name = "starbuild", version)]
struct Args {
    /// Central temperature [K]
    #[arg(long, default_value_t = 1.5e7)]
    temperature: f64,

    /// Central pressure [erg/cm^3]
    #[arg(long, default_value_t = 1e18)]
    pressure: f64,

    /// Hydrogen mass fraction
    #[arg(short = 'x', long, default_value_t = 0.7)]
    hydrogen: f64,

    /// Helium mass fraction
    #[arg(short = 'y', long, default_value_t = 0.28)]
    helium: f64,

    /// Outer edge of the radial grid [cm]
    #[arg(long, default_value_t = IntegrationParams::default().r_max)]
    r_max: f64,

    /// Number of grid points
    #[arg(long, default_value_t = IntegrationParams::default().steps)]
    steps: usize,

    /// Print the full profile as whitespace separated columns
    #[arg(long)]
    table: bool,

    /// Write the model to a GYRE stellar model file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn print_table(profile: &Profile) {
    println!(
        "{:>20}{:>20}{:>20}{:>20}{:>20}{:>20}{:>20}{:>20}",
        "r", "M", "P", "T", "L", "rho", "kappa", "epsilon"
    );
    for state in profile.states() {
        println!(
            "{:>20.10e}{:>20.10e}{:>20.10e}{:>20.10e}{:>20.10e}{:>20.10e}{:>20.10e}{:>20.10e}",
            state.r, state.m, state.p, state.t, state.l, state.rho, state.kappa, state.epsilon
        );
    }
}

/// Fail before integrating if the requested output cannot be written by this build
fn check_output(output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) if !cfg!(feature = "hdf5") => Err(eyre!(
            "Cannot write `{}`: starbuild was built without the `hdf5` feature",
            path.display()
        )),
        _ => Ok(()),
    }
}

#[cfg(feature = "hdf5")]
fn write_output(
    profile: &Profile,
    path: &Path,
    constants: &PhysicalConstants,
) -> Result<()> {
    profile
        .write_gsm(path, constants)
        .wrap_err_with(|| format!("Failed to write `{}`", path.display()))
}

#[cfg(not(feature = "hdf5"))]
fn write_output(_: &Profile, _: &Path, _: &PhysicalConstants) -> Result<()> {
    Err(eyre!("starbuild was built without the `hdf5` feature"))
}

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    check_output(args.output.as_deref())?;

    let composition =
        Composition::new(args.hydrogen, args.helium).wrap_err("Invalid composition")?;
    let central = CentralConditions::new(args.temperature, args.pressure)
        .wrap_err("Invalid central conditions")?;
    let integrator = Integrator::new(IntegrationParams {
        r_max: args.r_max,
        steps: args.steps,
    });

    let profile = integrator
        .integrate(central, composition)
        .wrap_err("Integration failed")?;
    let summary = profile.summary();

    if args.table {
        print_table(&profile);
    }

    println!("termination: {}", summary.termination);
    println!("steps:       {}", summary.steps);
    println!("radius:      {:.6e} cm", summary.radius);
    println!("mass:        {:.6e} g", summary.mass);
    println!("luminosity:  {:.6e} erg/s", summary.luminosity);
    println!("convective:  {:.3}", profile.convective_fraction());

    if let Some(path) = args.output {
        write_output(&profile, &path, &integrator.constants)?;
    }

    Ok(())
}
