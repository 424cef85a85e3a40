use crate::Adsorption::iast_output::ExportError;
use crate::Adsorption::isotherm_data::DatasetError;
use crate::Adsorption::isotherm_models::FitError;
use crate::Adsorption::pressure_sweep::SweepError;
use crate::Animation::renderer::RenderError;
use crate::settings::ConfigError;
use thiserror::Error;

/// top-level error of both pipelines
#[derive(Debug, Error)]
pub enum GeoSorbError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error("isotherm model could not be built: {0}")]
    Fit(#[from] FitError),
    #[error(transparent)]
    Sweep(#[from] SweepError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("unknown scene '{0}'")]
    UnknownScene(String),
    #[error("plot window failed: {0}")]
    Plot(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
