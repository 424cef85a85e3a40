//! Sweep of the total pressure with a fixed gas-phase composition.
//!
//! Every grid point is solved independently. A failing point is logged and skipped, so
//! the result can have gaps: it is never re-gridded or interpolated.
use super::iast::MixtureSolver;
use super::isotherm_models::Isotherm;
use crate::settings::IastConfig;
use log::{info, warn};
use nalgebra::{DMatrix, DVector};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SweepError {
    #[error("invalid pressure grid: start = {start}, stop = {stop}, step = {step}")]
    InvalidGrid { start: f64, stop: f64, step: f64 },
    #[error("molar fractions must be non-negative and sum to 1, got {0:?}")]
    InvalidMolarFractions(Vec<f64>),
    #[error("{fractions} molar fractions given for {species} species")]
    SpeciesMismatch { fractions: usize, species: usize },
}

/// `numpy.arange(start, stop, step)`: `ceil((stop - start)/step)` points, stop excluded
pub fn pressure_grid(start: f64, stop: f64, step: f64) -> Result<Vec<f64>, SweepError> {
    if !(step > 0.0) || !(stop > start) || !start.is_finite() || !stop.is_finite() {
        return Err(SweepError::InvalidGrid { start, stop, step });
    }
    let n = ((stop - start) / step).ceil() as usize;
    Ok((0..n).map(|i| start + step * i as f64).collect())
}

/// Outcome of a single pressure point
#[derive(Debug, Clone, PartialEq)]
pub enum SweepPoint {
    Solved {
        total_pressure: f64,
        partial_pressures: DVector<f64>,
        loadings: DVector<f64>,
    },
    Skipped {
        total_pressure: f64,
        reason: String,
    },
}

impl SweepPoint {
    pub fn total_pressure(&self) -> f64 {
        match self {
            SweepPoint::Solved { total_pressure, .. } => *total_pressure,
            SweepPoint::Skipped { total_pressure, .. } => *total_pressure,
        }
    }

    pub fn is_solved(&self) -> bool {
        matches!(self, SweepPoint::Solved { .. })
    }
}

/// Successful points only, aligned: row `i` of `loadings` belongs to `pressures[i]`,
/// column `j` to species `j`.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepResult {
    pub species: Vec<String>,
    pub molar_fractions: Vec<f64>,
    pub points: Vec<SweepPoint>,
    pub pressures: Vec<f64>,
    pub loadings: DMatrix<f64>,
}

impl SweepResult {
    fn from_points(species: Vec<String>, molar_fractions: Vec<f64>, points: Vec<SweepPoint>) -> Self {
        let n_species = species.len();
        let mut pressures = Vec::new();
        let mut flat = Vec::new();
        for point in &points {
            if let SweepPoint::Solved {
                total_pressure,
                loadings,
                ..
            } = point
            {
                pressures.push(*total_pressure);
                flat.extend(loadings.iter().copied());
            }
        }
        let loadings = DMatrix::from_row_slice(pressures.len(), n_species, &flat);
        Self {
            species,
            molar_fractions,
            points,
            pressures,
            loadings,
        }
    }

    pub fn len(&self) -> usize {
        self.pressures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pressures.is_empty()
    }

    /// loadings of species `j` at every successful pressure
    pub fn species_loadings(&self, j: usize) -> Vec<f64> {
        self.loadings.column(j).iter().copied().collect()
    }

    pub fn skipped_pressures(&self) -> Vec<f64> {
        self.points
            .iter()
            .filter(|p| !p.is_solved())
            .map(SweepPoint::total_pressure)
            .collect()
    }

    pub fn max_loading(&self) -> Option<f64> {
        if self.loadings.is_empty() {
            return None;
        }
        Some(self.loadings.max())
    }
}

/// Pressure grid plus the fixed gas-phase composition
#[derive(Debug, Clone)]
pub struct PressureSweep {
    pub species: Vec<String>,
    pub molar_fractions: DVector<f64>,
    pub pressures: Vec<f64>,
    /// solver messages longer than this are cut in the log
    pub error_text_limit: usize,
}

impl PressureSweep {
    pub fn new(
        species: Vec<String>,
        molar_fractions: Vec<f64>,
        pressures: Vec<f64>,
    ) -> Result<Self, SweepError> {
        if species.len() != molar_fractions.len() {
            return Err(SweepError::SpeciesMismatch {
                fractions: molar_fractions.len(),
                species: species.len(),
            });
        }
        let sum: f64 = molar_fractions.iter().sum();
        if molar_fractions.is_empty()
            || molar_fractions.iter().any(|y| *y < 0.0 || !y.is_finite())
            || (sum - 1.0).abs() > 1e-9
        {
            return Err(SweepError::InvalidMolarFractions(molar_fractions));
        }
        Ok(Self {
            species,
            molar_fractions: DVector::from_vec(molar_fractions),
            pressures,
            error_text_limit: 150,
        })
    }

    pub fn from_config(config: &IastConfig) -> Result<Self, SweepError> {
        let s = config.sweep;
        let pressures = pressure_grid(s.start, s.stop, s.step)?;
        let mut sweep = Self::new(config.species(), config.molar_fractions(), pressures)?;
        sweep.error_text_limit = config.error_text_limit;
        Ok(sweep)
    }

    /// `y_i * P` for every species
    pub fn partial_pressures(&self, total_pressure: f64) -> DVector<f64> {
        &self.molar_fractions * total_pressure
    }

    /// Solves every grid point, skipping the ones where the solver fails
    pub fn run<S: MixtureSolver + ?Sized>(&self, solver: &S, isotherms: &[Isotherm]) -> SweepResult {
        if let (Some(first), Some(last)) = (self.pressures.first(), self.pressures.last()) {
            info!(
                "sweeping {} pressure points from {:.1} to {:.1}",
                self.pressures.len(),
                first,
                last
            );
        }
        let points = self
            .pressures
            .iter()
            .map(|&total_pressure| self.solve_point(solver, isotherms, total_pressure))
            .collect();
        let result = SweepResult::from_points(
            self.species.clone(),
            self.molar_fractions.iter().copied().collect(),
            points,
        );
        info!(
            "{} of {} pressure points solved",
            result.len(),
            self.pressures.len()
        );
        result
    }

    fn solve_point<S: MixtureSolver + ?Sized>(
        &self,
        solver: &S,
        isotherms: &[Isotherm],
        total_pressure: f64,
    ) -> SweepPoint {
        let partial_pressures = self.partial_pressures(total_pressure);
        let partials = self
            .species
            .iter()
            .zip(partial_pressures.iter())
            .map(|(s, p)| format!("P_{} = {:.1}", s, p))
            .collect::<Vec<_>>()
            .join(", ");
        info!("Trying P_total = {:.1} bar ({})", total_pressure, partials);
        match solver.solve(&partial_pressures, isotherms) {
            Ok(solution) if solution.loadings.len() != self.species.len() => {
                let reason = format!(
                    "solver returned {} loadings for {} species",
                    solution.loadings.len(),
                    self.species.len()
                );
                warn!("  Error at pressure {:.1} bar: {}", total_pressure, reason);
                SweepPoint::Skipped {
                    total_pressure,
                    reason,
                }
            }
            Ok(solution) => {
                let loadings = solution.loadings;
                let msg = self
                    .species
                    .iter()
                    .zip(loadings.iter())
                    .map(|(s, q)| format!("{} = {:.3}", s, q))
                    .collect::<Vec<_>>()
                    .join(", ");
                info!("  Success: {}", msg);
                SweepPoint::Solved {
                    total_pressure,
                    partial_pressures,
                    loadings,
                }
            }
            Err(e) => {
                let reason = truncate(&e.to_string(), self.error_text_limit);
                warn!(
                    "  Error at pressure {:.1} bar: {}...",
                    total_pressure, reason
                );
                SweepPoint::Skipped {
                    total_pressure,
                    reason,
                }
            }
        }
    }
}

/// first `limit` characters of `text`
pub fn truncate(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}
