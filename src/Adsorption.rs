//! Binary-mixture adsorption: isotherm datasets, single-component models and IAST
//! # Examples
//! ```
//! use GeoSorb::Adsorption::isotherm_data::IsothermDataset;
//! use GeoSorb::Adsorption::isotherm_models::{build_isotherm, FitOutcome, ModelKind};
//! use GeoSorb::Adsorption::iast::{IastSolver, MixtureSolver};
//! use nalgebra::DVector;
//! // pure-component measurements (pressure in bar, loading in mmol/g)
//! let pressures: Vec<f64> = (1..=10).map(|i| i as f64).collect();
//! let ch4 = IsothermDataset::new(
//!     "CH4",
//!     pressures.clone(),
//!     pressures.iter().map(|p| 10.0 * 0.05 * p / (1.0 + 0.05 * p)).collect(),
//! ).unwrap();
//! let co2 = IsothermDataset::new(
//!     "CO2",
//!     pressures.clone(),
//!     pressures.iter().map(|p| 20.0 * 0.2 * p / (1.0 + 0.2 * p)).collect(),
//! ).unwrap();
//! // Langmuir fits; the interpolator is used only if a fit fails
//! let (ch4_iso, outcome) = build_isotherm(&ch4, ModelKind::Langmuir).unwrap();
//! assert_eq!(outcome, FitOutcome::Fitted(ModelKind::Langmuir));
//! let (co2_iso, _) = build_isotherm(&co2, ModelKind::Langmuir).unwrap();
//! // equimolar mixture at 2 bar total pressure
//! let solution = IastSolver::default()
//!     .solve(&DVector::from_vec(vec![1.0, 1.0]), &[ch4_iso, co2_iso])
//!     .unwrap();
//! // CO2 adsorbs much more strongly
//! assert!(solution.loadings[1] > solution.loadings[0]);
//! assert!((solution.adsorbed_mole_fractions.sum() - 1.0).abs() < 1e-9);
//! ```

pub mod binary_mixture;
pub mod iast;
pub mod iast_output;
pub mod isotherm_data;
pub mod isotherm_models;
pub mod pressure_sweep;
