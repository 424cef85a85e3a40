//! End-to-end mixture calculation: datasets -> isotherm models -> pressure sweep.
use super::iast::{IastSolver, MixtureSolver};
use super::isotherm_data::{DatasetError, IsothermDataset};
use super::isotherm_models::{FitOutcome, Isotherm, build_isotherm};
use super::pressure_sweep::{PressureSweep, SweepResult};
use crate::errors::GeoSorbError;
use crate::settings::IastConfig;
use log::info;

/// Everything produced by one run, kept for reporting
#[derive(Debug, Clone)]
pub struct MixtureRun {
    pub datasets: Vec<IsothermDataset>,
    pub isotherms: Vec<Isotherm>,
    pub outcomes: Vec<FitOutcome>,
    pub result: SweepResult,
}

impl MixtureRun {
    /// `Binary Mixture Isotherms (CH4/CO2) in IRMOF-1` plus the composition line
    pub fn title(&self, material: &str) -> String {
        let species = self.result.species.join("/");
        let fractions = self
            .result
            .species
            .iter()
            .zip(&self.result.molar_fractions)
            .map(|(s, y)| format!("y_{} = {}", s, y))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "Binary Mixture Isotherms ({}) in {}\nMolar fractions: {}",
            species, material, fractions
        )
    }
}

/// Reads every configured component dataset
pub fn load_datasets(config: &IastConfig) -> Result<Vec<IsothermDataset>, DatasetError> {
    config
        .components
        .iter()
        .map(|c| {
            IsothermDataset::from_csv(&c.path, &c.species, &config.pressure_key, &config.loading_key)
        })
        .collect()
}

fn log_ranges(datasets: &[IsothermDataset]) {
    for ds in datasets {
        if let Some((min, max)) = ds.pressure_range() {
            info!(
                "{} pressure range: {} to {} {}",
                ds.species,
                min,
                max,
                ds.pressure_unit.as_deref().unwrap_or("")
            );
        }
        info!("All {} pressures: {:?}", ds.species, ds.sorted_pressures());
    }
}

/// Builds the models and sweeps the pressure with any mixture solver
pub fn run_with_solver<S: MixtureSolver + ?Sized>(
    config: &IastConfig,
    datasets: Vec<IsothermDataset>,
    solver: &S,
) -> Result<MixtureRun, GeoSorbError> {
    config.validate()?;
    log_ranges(&datasets);
    let mut isotherms = Vec::with_capacity(datasets.len());
    let mut outcomes = Vec::with_capacity(datasets.len());
    for ds in &datasets {
        let (isotherm, outcome) = build_isotherm(ds, config.model)?;
        isotherms.push(isotherm);
        outcomes.push(outcome);
    }
    let sweep = PressureSweep::from_config(config)?;
    let result = sweep.run(solver, &isotherms);
    Ok(MixtureRun {
        datasets,
        isotherms,
        outcomes,
        result,
    })
}

/// Loads the configured files and runs the IAST sweep
pub fn run_binary_mixture(config: &IastConfig) -> Result<MixtureRun, GeoSorbError> {
    config.validate()?;
    let datasets = load_datasets(config)?;
    let solver = IastSolver::new(config.solver.tolerance, config.solver.max_iterations)
        .verbose(config.solver.verbose);
    run_with_solver(config, datasets, &solver)
}
