//! # Settings Module
//!
//! ## Purpose
//! Explicit context structures for both pipelines. Every parameter that the scripts
//! used to keep in module-level variables lives here and is passed down to the
//! functions that need it.
//!
//! ## Configuration Format
//! ```json
//! {
//!   "iast": {
//!     "components": [
//!       { "species": "CH4", "path": "CH4_IRMOF1.csv", "molar_fraction": 0.5 },
//!       { "species": "CO2", "path": "CO2_IRMOF1.csv", "molar_fraction": 0.5 }
//!     ],
//!     "pressure_key": "Pressure(bar)",
//!     "loading_key": "Loading(mmol/g)",
//!     "model": "langmuir",
//!     "sweep": { "start": 0.1, "stop": 4.1, "step": 0.2 }
//!   },
//!   "animation": { "quality": "low", "media_dir": "media" }
//! }
//! ```
//! Every field is optional; missing fields take the defaults shown above.
//!
//! ## Usage Pattern
//! ```rust
//! use GeoSorb::settings::AppConfig;
//!
//! let config = AppConfig::default();
//! assert_eq!(config.iast.components.len(), 2);
//! assert!(config.validate().is_ok());
//! ```
use crate::Adsorption::isotherm_models::ModelKind;
use crate::Animation::primitives::Color;
use crate::Animation::renderer::RenderQuality;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot access config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in config file '{path}': {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// One pure-component dataset and its gas-phase molar fraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentConfig {
    pub species: String,
    pub path: PathBuf,
    pub molar_fraction: f64,
}

/// Total-pressure grid, `stop` is exclusive like `numpy.arange`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub start: f64,
    pub stop: f64,
    pub step: f64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            start: 0.1,
            stop: 4.1,
            step: 0.2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub tolerance: f64,
    pub max_iterations: usize,
    pub verbose: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-10,
            max_iterations: 200,
            verbose: false,
        }
    }
}

/// Context of the binary-mixture IAST pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IastConfig {
    pub components: Vec<ComponentConfig>,
    pub pressure_key: String,
    pub loading_key: String,
    /// adsorbent name used in the plot title
    pub material: String,
    pub model: ModelKind,
    pub sweep: SweepConfig,
    pub solver: SolverConfig,
    /// solver error messages are cut to this many characters in the log
    pub error_text_limit: usize,
    /// approximate number of rows of the printed summary table
    pub summary_rows: usize,
}

impl Default for IastConfig {
    fn default() -> Self {
        Self {
            components: vec![
                ComponentConfig {
                    species: "CH4".to_string(),
                    path: PathBuf::from("CH4_IRMOF1.csv"),
                    molar_fraction: 0.5,
                },
                ComponentConfig {
                    species: "CO2".to_string(),
                    path: PathBuf::from("CO2_IRMOF1.csv"),
                    molar_fraction: 0.5,
                },
            ],
            pressure_key: "Pressure(bar)".to_string(),
            loading_key: "Loading(mmol/g)".to_string(),
            material: "IRMOF-1".to_string(),
            model: ModelKind::Langmuir,
            sweep: SweepConfig::default(),
            solver: SolverConfig::default(),
            error_text_limit: 150,
            summary_rows: 8,
        }
    }
}

impl IastConfig {
    pub fn species(&self) -> Vec<String> {
        self.components.iter().map(|c| c.species.clone()).collect()
    }

    pub fn molar_fractions(&self) -> Vec<f64> {
        self.components.iter().map(|c| c.molar_fraction).collect()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.components.is_empty() {
            return Err(ConfigError::Invalid("no components configured".to_string()));
        }
        let sum: f64 = self.molar_fractions().iter().sum();
        if (sum - 1.0).abs() > 1e-9 {
            return Err(ConfigError::Invalid(format!(
                "molar fractions must sum to 1, got {}",
                sum
            )));
        }
        if self.molar_fractions().iter().any(|y| *y < 0.0) {
            return Err(ConfigError::Invalid(
                "molar fractions must not be negative".to_string(),
            ));
        }
        let s = &self.sweep;
        if !(s.step > 0.0) || !(s.stop > s.start) {
            return Err(ConfigError::Invalid(format!(
                "pressure sweep needs step > 0 and stop > start, got start = {}, stop = {}, step = {}",
                s.start, s.stop, s.step
            )));
        }
        Ok(())
    }
}

/// Context of the matrix-rank animation pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub scene: String,
    pub quality: RenderQuality,
    /// root of the `videos/<module>/<quality>/<Scene>.gif` tree
    pub media_dir: PathBuf,
    pub background: Color,
    /// pixel size overriding the one implied by `quality`
    pub resolution: Option<[u32; 2]>,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            scene: "MatrixRankGeometry".to_string(),
            quality: RenderQuality::Low,
            media_dir: PathBuf::from("media"),
            background: Color::BLACK,
            resolution: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub iast: IastConfig,
    pub animation: AnimationConfig,
}

impl AppConfig {
    /// Loads a configuration file; fields missing from the file keep their defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: AppConfig =
            serde_json::from_str(&content).map_err(|source| ConfigError::Json {
                path: path.display().to_string(),
                source,
            })?;
        config.validate()?;
        info!("configuration loaded from '{}'", path.display());
        Ok(config)
    }

    /// Loads `path` when given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Json {
            path: path.display().to_string(),
            source,
        })?;
        fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        info!("configuration written to '{}'", path.display());
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.iast.validate()
    }
}
