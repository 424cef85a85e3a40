use crate::Adsorption::binary_mixture::{MixtureRun, run_binary_mixture};
use crate::Adsorption::isotherm_models::{FitOutcome, ModelKind};
use crate::errors::GeoSorbError;
use crate::gui::iast_plot::show_iast_plot;
use crate::settings::{ComponentConfig, IastConfig};
use clap::Args;
use log::{info, warn};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Args)]
pub struct IastArgs {
    /// CH4 pure-component isotherm (CSV)
    #[arg(long, value_name = "FILE")]
    pub ch4: Option<PathBuf>,
    /// CO2 pure-component isotherm (CSV)
    #[arg(long, value_name = "FILE")]
    pub co2: Option<PathBuf>,
    /// parametric model fitted before falling back to interpolation
    #[arg(long, value_enum)]
    pub model: Option<ModelKind>,
    /// skip the plot window
    #[arg(long)]
    pub no_plot: bool,
    /// also plot the loadings in the terminal
    #[arg(long)]
    pub terminal_plot: bool,
    /// write the results to a .csv or .json file
    #[arg(long, value_name = "FILE")]
    pub export: Option<PathBuf>,
}

fn set_component_path(config: &mut IastConfig, species: &str, path: &Path) {
    match config.components.iter_mut().find(|c| c.species == species) {
        Some(c) => c.path = path.to_path_buf(),
        None => config.components.push(ComponentConfig {
            species: species.to_string(),
            path: path.to_path_buf(),
            molar_fraction: 0.0,
        }),
    }
}

impl IastArgs {
    /// command line values override the configuration file
    pub fn apply(&self, config: &mut IastConfig) {
        if let Some(path) = &self.ch4 {
            set_component_path(config, "CH4", path);
        }
        if let Some(path) = &self.co2 {
            set_component_path(config, "CO2", path);
        }
        if let Some(model) = self.model {
            config.model = model;
        }
    }
}

fn log_strategy(run: &MixtureRun, model: ModelKind) {
    if run
        .outcomes
        .iter()
        .all(|o| matches!(o, FitOutcome::Fitted(_)))
    {
        info!("Using {} model fits for better extrapolation", model);
        return;
    }
    for (ds, outcome) in run.datasets.iter().zip(&run.outcomes) {
        if let FitOutcome::Interpolated { reason } = outcome {
            warn!(
                "{}: model fit failed ({}), using interpolation with extrapolation",
                ds.species, reason
            );
        }
    }
}

/// Runs the sweep and produces every requested report
pub fn run_iast(config: &IastConfig, args: &IastArgs) -> Result<MixtureRun, GeoSorbError> {
    let run = run_binary_mixture(config)?;
    log_strategy(&run, config.model);
    let result = &run.result;
    result.pretty_print(config.summary_rows);
    if let Some(path) = &args.export {
        result.save(path)?;
    }
    if args.terminal_plot {
        result.plot_in_terminal();
    }
    if args.no_plot {
        return Ok(run);
    }
    if result.is_empty() {
        warn!("no successful pressure points, nothing to plot");
        return Ok(run);
    }
    show_iast_plot(result, &run.title(&config.material))
        .map_err(|e| GeoSorbError::Plot(e.to_string()))?;
    Ok(run)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let mut config = IastConfig::default();
        let args = IastArgs {
            ch4: Some(PathBuf::from("data/CH4_IRMOF1.csv")),
            model: Some(ModelKind::Henry),
            ..Default::default()
        };
        args.apply(&mut config);
        assert_eq!(config.components[0].path, PathBuf::from("data/CH4_IRMOF1.csv"));
        assert_eq!(config.components[1].path, PathBuf::from("CO2_IRMOF1.csv"));
        assert_eq!(config.model, ModelKind::Henry);
    }

    #[test]
    fn headless_run_exports_results() {
        let dir = tempfile::tempdir().unwrap();
        let write = |name: &str, m: f64, k: f64| {
            let path = dir.path().join(name);
            let mut text = String::from("Pressure(bar),Loading(mmol/g)\n");
            for i in 1..=12 {
                let p = 0.5 * i as f64;
                text.push_str(&format!("{},{}\n", p, m * k * p / (1.0 + k * p)));
            }
            std::fs::write(&path, text).unwrap();
            path
        };
        let args = IastArgs {
            ch4: Some(write("ch4.csv", 12.0, 0.04)),
            co2: Some(write("co2.csv", 20.0, 0.1)),
            no_plot: true,
            export: Some(dir.path().join("out.json")),
            ..Default::default()
        };
        let mut config = IastConfig::default();
        args.apply(&mut config);
        let run = run_iast(&config, &args).unwrap();
        assert_eq!(run.result.len(), 20);
        assert!(dir.path().join("out.json").exists());
    }

    #[test]
    fn bundled_irmof1_data() {
        let data = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
        let args = IastArgs {
            ch4: Some(data.join("CH4_IRMOF1.csv")),
            co2: Some(data.join("CO2_IRMOF1.csv")),
            no_plot: true,
            ..Default::default()
        };
        let mut config = IastConfig::default();
        args.apply(&mut config);
        let run = run_iast(&config, &args).unwrap();
        assert_eq!(run.outcomes, vec![FitOutcome::Fitted(ModelKind::Langmuir); 2]);
        assert_eq!(run.result.len(), 20);
        let last = run.result.len() - 1;
        assert!(run.result.loadings[(last, 1)] > run.result.loadings[(last, 0)]);
    }
}
