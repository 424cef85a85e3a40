//! # Ideal Adsorbed Solution Theory
//!
//! For a gas mixture at partial pressures `p_i` (total `P`, molar fractions
//! `y_i = p_i/P`), IAST looks for pure-component pressures `p0_i` at which every
//! component has the same reduced spreading pressure `pi`, such that the adsorbed mole
//! fractions `x_i = p_i / p0_i` sum to one. Then
//!
//! ```text
//! 1/q_total = sum_i x_i / q_i(p0_i),     q_i = x_i * q_total
//! ```
//!
//! The common `pi` is bracketed between the smallest and largest pure-component
//! spreading pressure at the total pressure, where `sum_i p_i/p0_i(pi) - 1` changes sign,
//! and found by bisection.
use super::isotherm_models::{Isotherm, IsothermError, IsothermModel};
use log::debug;
use nalgebra::DVector;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum IastError {
    #[error("no components given")]
    Empty,
    #[error("{pressures} partial pressures given for {isotherms} isotherms")]
    LengthMismatch { pressures: usize, isotherms: usize },
    #[error("total pressure must be positive, got {0}")]
    NonPositiveTotalPressure(f64),
    #[error("invalid partial pressure {value} for component {index}")]
    InvalidPartialPressure { index: usize, value: f64 },
    #[error("isotherm of component {index} failed: {source}")]
    Isotherm {
        index: usize,
        #[source]
        source: IsothermError,
    },
    #[error("pure-component loading of component {index} is zero at its IAST pressure")]
    ZeroLoading { index: usize },
    #[error("IAST did not converge in {iterations} iterations (residual {residual:e})")]
    NotConverged { iterations: usize, residual: f64 },
}

/// Result of one mixture-equilibrium calculation. Vectors are element-aligned with the
/// input partial pressures and isotherms.
#[derive(Debug, Clone, PartialEq)]
pub struct IastSolution {
    /// mixture loadings of every component
    pub loadings: DVector<f64>,
    /// adsorbed phase mole fractions
    pub adsorbed_mole_fractions: DVector<f64>,
    /// pure-component pressures at the common spreading pressure
    pub pure_component_pressures: DVector<f64>,
    /// reduced spreading pressure of the mixture
    pub spreading_pressure: f64,
    pub iterations: usize,
}

impl IastSolution {
    pub fn total_loading(&self) -> f64 {
        self.loadings.sum()
    }
}

/// Mixture-equilibrium solver used by the pressure sweep
pub trait MixtureSolver {
    fn solve(
        &self,
        partial_pressures: &DVector<f64>,
        isotherms: &[Isotherm],
    ) -> Result<IastSolution, IastError>;
}

/// Bisection-based IAST solver
#[derive(Debug, Clone)]
pub struct IastSolver {
    /// relative tolerance on the spreading pressure
    pub tolerance: f64,
    pub max_iterations: usize,
    /// log intermediate quantities at debug level
    pub verbose: bool,
}

impl Default for IastSolver {
    fn default() -> Self {
        Self {
            tolerance: 1e-10,
            max_iterations: 200,
            verbose: false,
        }
    }
}

impl IastSolver {
    pub fn new(tolerance: f64, max_iterations: usize) -> Self {
        Self {
            tolerance,
            max_iterations,
            verbose: false,
        }
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// sum_i p_i / p0_i(pi) - 1 over the components with non-zero partial pressure
    fn residual(
        &self,
        pi: f64,
        partial_pressures: &DVector<f64>,
        isotherms: &[Isotherm],
    ) -> Result<f64, IastError> {
        let mut sum = 0.0;
        for (index, (p, iso)) in partial_pressures.iter().zip(isotherms).enumerate() {
            if *p == 0.0 {
                continue;
            }
            let p0 = iso
                .pressure_at_spreading_pressure(pi)
                .map_err(|source| IastError::Isotherm { index, source })?;
            sum += p / p0;
        }
        Ok(sum - 1.0)
    }
}

impl MixtureSolver for IastSolver {
    fn solve(
        &self,
        partial_pressures: &DVector<f64>,
        isotherms: &[Isotherm],
    ) -> Result<IastSolution, IastError> {
        if partial_pressures.is_empty() || isotherms.is_empty() {
            return Err(IastError::Empty);
        }
        if partial_pressures.len() != isotherms.len() {
            return Err(IastError::LengthMismatch {
                pressures: partial_pressures.len(),
                isotherms: isotherms.len(),
            });
        }
        for (index, p) in partial_pressures.iter().enumerate() {
            if *p < 0.0 || !p.is_finite() {
                return Err(IastError::InvalidPartialPressure { index, value: *p });
            }
        }
        let total = partial_pressures.sum();
        if !(total > 0.0) {
            return Err(IastError::NonPositiveTotalPressure(total));
        }

        // pure-component spreading pressures at the total pressure bracket the solution
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for (index, (p, iso)) in partial_pressures.iter().zip(isotherms).enumerate() {
            if *p == 0.0 {
                continue;
            }
            let pi_i = iso
                .spreading_pressure(total)
                .map_err(|source| IastError::Isotherm { index, source })?;
            lo = lo.min(pi_i);
            hi = hi.max(pi_i);
        }

        let mut iterations = 0;
        let pi = if hi - lo <= self.tolerance * hi.abs() {
            0.5 * (lo + hi)
        } else {
            loop {
                let mid = 0.5 * (lo + hi);
                let r = self.residual(mid, partial_pressures, isotherms)?;
                iterations += 1;
                if r > 0.0 {
                    lo = mid;
                } else {
                    hi = mid;
                }
                if r == 0.0 || hi - lo <= self.tolerance * hi.abs() {
                    break 0.5 * (lo + hi);
                }
                if iterations >= self.max_iterations {
                    return Err(IastError::NotConverged {
                        iterations,
                        residual: r,
                    });
                }
            }
        };

        let n = partial_pressures.len();
        let mut p0 = DVector::<f64>::zeros(n);
        let mut x = DVector::<f64>::zeros(n);
        let mut inverse_total = 0.0;
        for (index, (p, iso)) in partial_pressures.iter().zip(isotherms).enumerate() {
            if *p == 0.0 {
                continue;
            }
            let err = |source: IsothermError| IastError::Isotherm { index, source };
            p0[index] = iso.pressure_at_spreading_pressure(pi).map_err(err)?;
            x[index] = p / p0[index];
            let q0 = iso.loading(p0[index]).map_err(err)?;
            if q0 <= 0.0 {
                return Err(IastError::ZeroLoading { index });
            }
            inverse_total += x[index] / q0;
        }
        // normalise away the bisection tolerance
        let x_sum = x.sum();
        x /= x_sum;
        let q_total = 1.0 / inverse_total;
        let loadings = &x * q_total;
        if self.verbose {
            debug!(
                "IAST at P = {:.4}: pi = {:.6}, p0 = {:?}, x = {:?}, q = {:?}",
                total,
                pi,
                p0.as_slice(),
                x.as_slice(),
                loadings.as_slice()
            );
        }
        Ok(IastSolution {
            loadings,
            adsorbed_mole_fractions: x,
            pure_component_pressures: p0,
            spreading_pressure: pi,
            iterations,
        })
    }
}
