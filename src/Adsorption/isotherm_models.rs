//! # Single-component isotherm models
//!
//! ## Models
//! - [`LangmuirIsotherm`]: `q = M*K*p / (1 + K*p)`, fitted by bounded least squares
//! - [`HenryIsotherm`]: `q = K_H*p`, closed-form least squares through the origin
//! - [`InterpolatorIsotherm`]: piecewise-linear interpolation of the measurements with an
//!   optional flat extrapolation value beyond the largest measured pressure
//!
//! All of them implement [`IsothermModel`], which is what the IAST solver needs:
//! the loading, the reduced spreading pressure
//!
//! ```text
//! pi(p) = integral_0^p q(p')/p' dp'
//! ```
//!
//! and its inverse.
//!
//! ## Fit-then-fallback
//! [`build_isotherm`] tries the parametric fit first and falls back to the interpolator
//! (extrapolating with the last observed loading) when the fit fails. The strategy that
//! was used is returned as a [`FitOutcome`].
use super::isotherm_data::IsothermDataset;
use enum_dispatch::enum_dispatch;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// lower and upper bounds of the Langmuir affinity constant K, 1/pressure units
pub const LANGMUIR_K_BOUNDS: (f64, f64) = (1e-6, 1e4);
const GRID_POINTS: usize = 200;
const GOLDEN_ITERATIONS: usize = 200;
const BISECTION_ITERATIONS: usize = 200;

/// errors of the parametric fits and of the interpolator construction
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    #[error("at least {needed} measurements are needed, got {got}")]
    TooFewPoints { needed: usize, got: usize },
    #[error("non-finite value in measurement {index}")]
    NonFinite { index: usize },
    #[error("negative value in measurement {index}")]
    NegativeValue { index: usize },
    #[error("all loadings are zero")]
    AllZeroLoadings,
    #[error("optimum K = {k:e} lies on the fit bound, the data show no saturation")]
    AtBound { k: f64 },
    #[error("non-physical fitted parameter {parameter} = {value}")]
    NonPhysical { parameter: &'static str, value: f64 },
}

/// errors raised when an isotherm is evaluated
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IsothermError {
    #[error("negative pressure {0}")]
    NegativePressure(f64),
    #[error(
        "pressure {pressure} lies outside the interpolation range [0, {max}] and no fill value is set"
    )]
    OutsideRange { pressure: f64, max: f64 },
    #[error("spreading pressure {0} cannot be reached by this isotherm")]
    Unreachable(f64),
    #[error("invalid spreading pressure {0}")]
    InvalidSpreadingPressure(f64),
}

/// Which parametric model to fit first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    Langmuir,
    Henry,
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelKind::Langmuir => write!(f, "Langmuir"),
            ModelKind::Henry => write!(f, "Henry"),
        }
    }
}

/// Strategy that produced an isotherm
#[derive(Debug, Clone, PartialEq)]
pub enum FitOutcome {
    Fitted(ModelKind),
    Interpolated { reason: String },
}

#[enum_dispatch]
pub trait IsothermModel {
    /// adsorbed loading at `pressure`
    fn loading(&self, pressure: f64) -> Result<f64, IsothermError>;
    /// reduced spreading pressure at `pressure`
    fn spreading_pressure(&self, pressure: f64) -> Result<f64, IsothermError>;
    /// pure-component pressure at which the reduced spreading pressure equals `pi`
    fn pressure_at_spreading_pressure(&self, pi: f64) -> Result<f64, IsothermError>;
    fn describe(&self) -> String;
}

#[enum_dispatch(IsothermModel)]
#[derive(Debug, Clone, PartialEq)]
pub enum Isotherm {
    Langmuir(LangmuirIsotherm),
    Henry(HenryIsotherm),
    Interpolator(InterpolatorIsotherm),
}

fn check_pressure(pressure: f64) -> Result<(), IsothermError> {
    if pressure < 0.0 || !pressure.is_finite() {
        return Err(IsothermError::NegativePressure(pressure));
    }
    Ok(())
}

fn check_spreading_pressure(pi: f64) -> Result<(), IsothermError> {
    if pi < 0.0 || !pi.is_finite() {
        return Err(IsothermError::InvalidSpreadingPressure(pi));
    }
    Ok(())
}

/// common validation of measurements used by every fit
fn validate_points(dataset: &IsothermDataset, needed: usize) -> Result<(), FitError> {
    if dataset.len() < needed {
        return Err(FitError::TooFewPoints {
            needed,
            got: dataset.len(),
        });
    }
    for (index, (p, q)) in dataset.points().enumerate() {
        if !p.is_finite() || !q.is_finite() {
            return Err(FitError::NonFinite { index });
        }
        if p < 0.0 || q < 0.0 {
            return Err(FitError::NegativeValue { index });
        }
    }
    if dataset.loadings.iter().all(|q| *q == 0.0) {
        return Err(FitError::AllZeroLoadings);
    }
    Ok(())
}

//////////////////////////////////LANGMUIR/////////////////////////////////////////////

#[derive(Debug, Clone, PartialEq)]
pub struct LangmuirIsotherm {
    /// saturation loading M
    pub m: f64,
    /// affinity constant K
    pub k: f64,
    /// residual sum of squares of the fit
    pub rss: f64,
}

impl LangmuirIsotherm {
    pub fn new(m: f64, k: f64) -> Self {
        Self { m, k, rss: 0.0 }
    }

    /// Least-squares fit with K restricted to [`LANGMUIR_K_BOUNDS`].
    ///
    /// For a fixed K the optimal M is linear, `M = sum(q*f)/sum(f*f)` with
    /// `f = K*p/(1+K*p)`, so only ln K is searched: a coarse grid locates the basin,
    /// golden-section search refines it.
    pub fn fit(dataset: &IsothermDataset) -> Result<Self, FitError> {
        validate_points(dataset, 2)?;
        let distinct_positive = {
            let mut p: Vec<f64> = dataset
                .sorted_pressures()
                .into_iter()
                .filter(|p| *p > 0.0)
                .collect();
            p.dedup();
            p.len()
        };
        if distinct_positive < 2 {
            return Err(FitError::TooFewPoints {
                needed: 2,
                got: distinct_positive,
            });
        }
        let points: Vec<(f64, f64)> = dataset.points().collect();
        let (lo, hi) = (LANGMUIR_K_BOUNDS.0.ln(), LANGMUIR_K_BOUNDS.1.ln());
        let objective = |u: f64| langmuir_profile(&points, u.exp()).1;

        let h = (hi - lo) / (GRID_POINTS - 1) as f64;
        let (best, _) = (0..GRID_POINTS)
            .map(|i| (i, objective(lo + h * i as f64)))
            .fold((0, f64::INFINITY), |acc, (i, v)| if v < acc.1 { (i, v) } else { acc });
        if best == 0 || best == GRID_POINTS - 1 {
            return Err(FitError::AtBound {
                k: (lo + h * best as f64).exp(),
            });
        }
        let u = golden_section(
            objective,
            lo + h * (best - 1) as f64,
            lo + h * (best + 1) as f64,
        );
        let k = u.exp();
        let (m, rss) = langmuir_profile(&points, k);
        if !(m > 0.0) || !m.is_finite() {
            return Err(FitError::NonPhysical {
                parameter: "M",
                value: m,
            });
        }
        Ok(Self { m, k, rss })
    }
}

/// optimal M and residual sum of squares for a given K
fn langmuir_profile(points: &[(f64, f64)], k: f64) -> (f64, f64) {
    let f = |p: f64| k * p / (1.0 + k * p);
    let (qf, ff) = points
        .iter()
        .fold((0.0, 0.0), |(qf, ff), &(p, q)| (qf + q * f(p), ff + f(p) * f(p)));
    if ff == 0.0 {
        return (0.0, f64::INFINITY);
    }
    let m = qf / ff;
    let rss = points
        .iter()
        .map(|&(p, q)| (q - m * f(p)).powi(2))
        .sum::<f64>();
    (m, rss)
}

/// minimum of a unimodal function on [a, b]
fn golden_section<F: Fn(f64) -> f64>(f: F, mut a: f64, mut b: f64) -> f64 {
    let inv_phi = (5f64.sqrt() - 1.0) / 2.0;
    let mut c = b - inv_phi * (b - a);
    let mut d = a + inv_phi * (b - a);
    let (mut fc, mut fd) = (f(c), f(d));
    for _ in 0..GOLDEN_ITERATIONS {
        if (b - a).abs() < 1e-12 {
            break;
        }
        if fc < fd {
            b = d;
            d = c;
            fd = fc;
            c = b - inv_phi * (b - a);
            fc = f(c);
        } else {
            a = c;
            c = d;
            fc = fd;
            d = a + inv_phi * (b - a);
            fd = f(d);
        }
    }
    0.5 * (a + b)
}

impl IsothermModel for LangmuirIsotherm {
    fn loading(&self, pressure: f64) -> Result<f64, IsothermError> {
        check_pressure(pressure)?;
        Ok(self.m * self.k * pressure / (1.0 + self.k * pressure))
    }

    fn spreading_pressure(&self, pressure: f64) -> Result<f64, IsothermError> {
        check_pressure(pressure)?;
        Ok(self.m * (self.k * pressure).ln_1p())
    }

    fn pressure_at_spreading_pressure(&self, pi: f64) -> Result<f64, IsothermError> {
        check_spreading_pressure(pi)?;
        let p = (pi / self.m).exp_m1() / self.k;
        if !p.is_finite() {
            return Err(IsothermError::Unreachable(pi));
        }
        Ok(p)
    }

    fn describe(&self) -> String {
        format!("Langmuir(M = {:.4}, K = {:.4})", self.m, self.k)
    }
}

//////////////////////////////////HENRY/////////////////////////////////////////////

#[derive(Debug, Clone, PartialEq)]
pub struct HenryIsotherm {
    pub k_h: f64,
}

impl HenryIsotherm {
    pub fn fit(dataset: &IsothermDataset) -> Result<Self, FitError> {
        validate_points(dataset, 1)?;
        let (pq, pp) = dataset
            .points()
            .fold((0.0, 0.0), |(pq, pp), (p, q)| (pq + p * q, pp + p * p));
        if pp == 0.0 {
            return Err(FitError::TooFewPoints { needed: 1, got: 0 });
        }
        let k_h = pq / pp;
        if !(k_h > 0.0) || !k_h.is_finite() {
            return Err(FitError::NonPhysical {
                parameter: "K_H",
                value: k_h,
            });
        }
        Ok(Self { k_h })
    }
}

impl IsothermModel for HenryIsotherm {
    fn loading(&self, pressure: f64) -> Result<f64, IsothermError> {
        check_pressure(pressure)?;
        Ok(self.k_h * pressure)
    }

    fn spreading_pressure(&self, pressure: f64) -> Result<f64, IsothermError> {
        check_pressure(pressure)?;
        Ok(self.k_h * pressure)
    }

    fn pressure_at_spreading_pressure(&self, pi: f64) -> Result<f64, IsothermError> {
        check_spreading_pressure(pi)?;
        Ok(pi / self.k_h)
    }

    fn describe(&self) -> String {
        format!("Henry(K_H = {:.4})", self.k_h)
    }
}

//////////////////////////////////INTERPOLATOR/////////////////////////////////////////////

/// Piecewise-linear isotherm through the measured points.
///
/// The measurements are sorted by pressure and `(0, 0)` is prepended when the data do not
/// start at zero pressure. Repeated pressures keep the last loading.
#[derive(Debug, Clone, PartialEq)]
pub struct InterpolatorIsotherm {
    pub pressures: Vec<f64>,
    pub loadings: Vec<f64>,
    /// loading returned beyond the largest measured pressure
    pub fill_value: Option<f64>,
}

impl InterpolatorIsotherm {
    pub fn new(dataset: &IsothermDataset, fill_value: Option<f64>) -> Result<Self, FitError> {
        validate_points(dataset, 1)?;
        let mut points: Vec<(f64, f64)> = dataset.points().collect();
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        let mut pressures: Vec<f64> = Vec::with_capacity(points.len() + 1);
        let mut loadings: Vec<f64> = Vec::with_capacity(points.len() + 1);
        for (p, q) in points {
            if pressures.last() == Some(&p) {
                if let Some(last) = loadings.last_mut() {
                    *last = q;
                }
                continue;
            }
            pressures.push(p);
            loadings.push(q);
        }
        if pressures[0] > 0.0 {
            pressures.insert(0, 0.0);
            loadings.insert(0, 0.0);
        } else if loadings[0] != 0.0 {
            // q/p is not integrable at p = 0 otherwise
            return Err(FitError::NonPhysical {
                parameter: "loading at zero pressure",
                value: loadings[0],
            });
        }
        if pressures.len() < 2 {
            return Err(FitError::TooFewPoints { needed: 1, got: 0 });
        }
        if let Some(fill) = fill_value {
            if !fill.is_finite() || fill < 0.0 {
                return Err(FitError::NonPhysical {
                    parameter: "fill value",
                    value: fill,
                });
            }
        }
        Ok(Self {
            pressures,
            loadings,
            fill_value,
        })
    }

    pub fn max_pressure(&self) -> f64 {
        *self.pressures.last().unwrap_or(&0.0)
    }

    /// integral of q/p over the interpolated part, `p <= max_pressure`
    fn integral_within(&self, pressure: f64) -> f64 {
        let mut total = 0.0;
        for i in 0..self.pressures.len() - 1 {
            let (a, b) = (self.pressures[i], self.pressures[i + 1]);
            if a >= pressure {
                break;
            }
            let (qa, qb) = (self.loadings[i], self.loadings[i + 1]);
            let slope = (qb - qa) / (b - a);
            let upper = b.min(pressure);
            total += if a == 0.0 {
                slope * upper
            } else {
                (qa - slope * a) * (upper / a).ln() + slope * (upper - a)
            };
        }
        total
    }
}

impl IsothermModel for InterpolatorIsotherm {
    fn loading(&self, pressure: f64) -> Result<f64, IsothermError> {
        check_pressure(pressure)?;
        let max = self.max_pressure();
        if pressure > max {
            return self
                .fill_value
                .ok_or(IsothermError::OutsideRange { pressure, max });
        }
        let i = self
            .pressures
            .partition_point(|p| *p < pressure)
            .clamp(1, self.pressures.len() - 1);
        let (a, b) = (self.pressures[i - 1], self.pressures[i]);
        let (qa, qb) = (self.loadings[i - 1], self.loadings[i]);
        Ok(qa + (qb - qa) * (pressure - a) / (b - a))
    }

    fn spreading_pressure(&self, pressure: f64) -> Result<f64, IsothermError> {
        check_pressure(pressure)?;
        let max = self.max_pressure();
        if pressure <= max {
            return Ok(self.integral_within(pressure));
        }
        let fill = self
            .fill_value
            .ok_or(IsothermError::OutsideRange { pressure, max })?;
        Ok(self.integral_within(max) + fill * (pressure / max).ln())
    }

    fn pressure_at_spreading_pressure(&self, pi: f64) -> Result<f64, IsothermError> {
        check_spreading_pressure(pi)?;
        if pi == 0.0 {
            return Ok(0.0);
        }
        let max = self.max_pressure();
        let pi_max = self.integral_within(max);
        if pi > pi_max {
            return match self.fill_value {
                Some(fill) if fill > 0.0 => {
                    let p = max * ((pi - pi_max) / fill).exp();
                    if p.is_finite() {
                        Ok(p)
                    } else {
                        Err(IsothermError::Unreachable(pi))
                    }
                }
                _ => Err(IsothermError::Unreachable(pi)),
            };
        }
        let (mut lo, mut hi) = (0.0, max);
        for _ in 0..BISECTION_ITERATIONS {
            let mid = 0.5 * (lo + hi);
            if self.integral_within(mid) < pi {
                lo = mid;
            } else {
                hi = mid;
            }
            if hi - lo <= 1e-14 * hi {
                break;
            }
        }
        Ok(0.5 * (lo + hi))
    }

    fn describe(&self) -> String {
        match self.fill_value {
            Some(fill) => format!(
                "Interpolator({} points, fill value = {:.4})",
                self.pressures.len(),
                fill
            ),
            None => format!("Interpolator({} points)", self.pressures.len()),
        }
    }
}

//////////////////////////////////BUILDER/////////////////////////////////////////////

/// Fits the requested parametric model
pub fn fit_model(dataset: &IsothermDataset, kind: ModelKind) -> Result<Isotherm, FitError> {
    match kind {
        ModelKind::Langmuir => LangmuirIsotherm::fit(dataset).map(Isotherm::from),
        ModelKind::Henry => HenryIsotherm::fit(dataset).map(Isotherm::from),
    }
}

/// Fits `kind`; if the fit fails, interpolates the data with flat extrapolation at the
/// last observed loading. An error is returned only when the interpolator cannot be built
/// either.
pub fn build_isotherm(
    dataset: &IsothermDataset,
    kind: ModelKind,
) -> Result<(Isotherm, FitOutcome), FitError> {
    match fit_model(dataset, kind) {
        Ok(model) => {
            info!(
                "{}: using {} model fit for better extrapolation: {}",
                dataset.species,
                kind,
                model.describe()
            );
            Ok((model, FitOutcome::Fitted(kind)))
        }
        Err(e) => {
            warn!(
                "{}: {} fit failed ({}), using InterpolatorIsotherm with extrapolation",
                dataset.species, kind, e
            );
            let model = InterpolatorIsotherm::new(dataset, dataset.last_loading())?;
            info!("{}: {}", dataset.species, model.describe());
            Ok((
                Isotherm::from(model),
                FitOutcome::Interpolated {
                    reason: e.to_string(),
                },
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn langmuir_data(m: f64, k: f64) -> IsothermDataset {
        let pressures: Vec<f64> = (1..=12).map(|i| 0.5 * i as f64).collect();
        let loadings = pressures
            .iter()
            .map(|p| m * k * p / (1.0 + k * p))
            .collect();
        IsothermDataset::new("CO2", pressures, loadings).unwrap()
    }

    #[test]
    fn langmuir_fit_recovers_generating_parameters() {
        let fit = LangmuirIsotherm::fit(&langmuir_data(5.0, 2.0)).unwrap();
        assert_relative_eq!(fit.m, 5.0, epsilon = 1e-5);
        assert_relative_eq!(fit.k, 2.0, epsilon = 1e-5);
        assert!(fit.rss < 1e-10);
    }

    #[test]
    fn langmuir_spreading_pressure_inverts() {
        let iso = LangmuirIsotherm::new(4.0, 0.7);
        for p in [0.01, 0.5, 3.0, 40.0] {
            let pi = iso.spreading_pressure(p).unwrap();
            assert_relative_eq!(iso.pressure_at_spreading_pressure(pi).unwrap(), p, max_relative = 1e-10);
        }
        assert_relative_eq!(iso.spreading_pressure(1.0).unwrap(), 4.0 * 1.7f64.ln(), epsilon = 1e-12);
    }

    #[test]
    fn convex_data_hit_the_fit_bound() {
        let pressures = vec![0.5, 1.0, 1.5, 2.0, 2.5, 3.0];
        let loadings = pressures.iter().map(|p| p * p).collect();
        let ds = IsothermDataset::new("CH4", pressures, loadings).unwrap();
        let err = LangmuirIsotherm::fit(&ds).unwrap_err();
        assert!(matches!(err, FitError::AtBound { .. }));
    }

    #[test]
    fn langmuir_fit_rejects_bad_data() {
        let ds = IsothermDataset::new("CH4", vec![1.0], vec![1.0]).unwrap();
        assert_eq!(
            LangmuirIsotherm::fit(&ds).unwrap_err(),
            FitError::TooFewPoints { needed: 2, got: 1 }
        );
        let ds = IsothermDataset::new("CH4", vec![1.0, 2.0], vec![0.0, 0.0]).unwrap();
        assert_eq!(LangmuirIsotherm::fit(&ds).unwrap_err(), FitError::AllZeroLoadings);
        let ds = IsothermDataset::new("CH4", vec![1.0, -2.0], vec![1.0, 2.0]).unwrap();
        assert_eq!(
            LangmuirIsotherm::fit(&ds).unwrap_err(),
            FitError::NegativeValue { index: 1 }
        );
        let ds = IsothermDataset::new("CH4", vec![1.0, 1.0], vec![1.0, 2.0]).unwrap();
        assert!(matches!(
            LangmuirIsotherm::fit(&ds).unwrap_err(),
            FitError::TooFewPoints { .. }
        ));
    }

    #[test]
    fn henry_fit_is_least_squares_through_origin() {
        let ds = IsothermDataset::new("CH4", vec![1.0, 2.0, 3.0], vec![2.0, 4.0, 6.0]).unwrap();
        let henry = HenryIsotherm::fit(&ds).unwrap();
        assert_relative_eq!(henry.k_h, 2.0, epsilon = 1e-12);
        assert_relative_eq!(henry.spreading_pressure(1.5).unwrap(), 3.0, epsilon = 1e-12);
        assert_relative_eq!(henry.pressure_at_spreading_pressure(3.0).unwrap(), 1.5, epsilon = 1e-12);
    }

    #[test]
    fn interpolator_prepends_origin_and_sorts() {
        let ds = IsothermDataset::new("CH4", vec![2.0, 1.0], vec![3.0, 2.0]).unwrap();
        let iso = InterpolatorIsotherm::new(&ds, None).unwrap();
        assert_eq!(iso.pressures, vec![0.0, 1.0, 2.0]);
        assert_eq!(iso.loadings, vec![0.0, 2.0, 3.0]);
        assert_relative_eq!(iso.loading(0.5).unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(iso.loading(1.5).unwrap(), 2.5, epsilon = 1e-12);
        assert_relative_eq!(iso.loading(2.0).unwrap(), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn interpolator_extrapolates_flat_or_fails() {
        let ds = IsothermDataset::new("CH4", vec![1.0, 2.0], vec![2.0, 3.0]).unwrap();
        let flat = InterpolatorIsotherm::new(&ds, Some(3.0)).unwrap();
        assert_eq!(flat.loading(10.0).unwrap(), 3.0);
        let bare = InterpolatorIsotherm::new(&ds, None).unwrap();
        assert_eq!(
            bare.loading(10.0).unwrap_err(),
            IsothermError::OutsideRange {
                pressure: 10.0,
                max: 2.0
            }
        );
        assert!(bare.spreading_pressure(10.0).is_err());
    }

    #[test]
    fn interpolator_spreading_pressure_is_exact_for_linear_data() {
        // q = 2p is linear, so pi(p) = 2p inside the range
        let ds = IsothermDataset::new("CH4", vec![1.0, 2.0, 4.0], vec![2.0, 4.0, 8.0]).unwrap();
        let iso = InterpolatorIsotherm::new(&ds, Some(8.0)).unwrap();
        assert_relative_eq!(iso.spreading_pressure(3.0).unwrap(), 6.0, epsilon = 1e-12);
        // beyond the range: pi(4) + 8 ln(p/4)
        let pi = iso.spreading_pressure(8.0).unwrap();
        assert_relative_eq!(pi, 8.0 + 8.0 * 2f64.ln(), epsilon = 1e-12);
        assert_relative_eq!(iso.pressure_at_spreading_pressure(pi).unwrap(), 8.0, epsilon = 1e-9);
        assert_relative_eq!(iso.pressure_at_spreading_pressure(5.0).unwrap(), 2.5, epsilon = 1e-9);
    }

    #[test]
    fn interpolator_rejects_loading_at_zero_pressure() {
        let ds = IsothermDataset::new("CH4", vec![0.0, 1.0], vec![0.5, 1.0]).unwrap();
        assert!(matches!(
            InterpolatorIsotherm::new(&ds, None).unwrap_err(),
            FitError::NonPhysical { .. }
        ));
    }

    #[test]
    fn builder_prefers_the_fit() {
        let (iso, outcome) = build_isotherm(&langmuir_data(3.0, 0.5), ModelKind::Langmuir).unwrap();
        assert_eq!(outcome, FitOutcome::Fitted(ModelKind::Langmuir));
        assert!(matches!(iso, Isotherm::Langmuir(_)));
    }

    #[test]
    fn builder_falls_back_to_interpolation_with_last_loading() {
        // last row in file order is not the largest pressure
        let ds = IsothermDataset::new("CH4", vec![1.0, 3.0, 2.0], vec![1.0, 9.0, 4.0]).unwrap();
        let (iso, outcome) = build_isotherm(&ds, ModelKind::Langmuir).unwrap();
        assert!(matches!(outcome, FitOutcome::Interpolated { .. }));
        match iso {
            Isotherm::Interpolator(interp) => assert_eq!(interp.fill_value, Some(4.0)),
            other => panic!("expected interpolator, got {other:?}"),
        }
    }

    #[test]
    fn builder_propagates_interpolator_failure() {
        let ds = IsothermDataset::new("CH4", vec![1.0, 2.0], vec![f64::NAN, 1.0]).unwrap();
        assert_eq!(
            build_isotherm(&ds, ModelKind::Langmuir).unwrap_err(),
            FitError::NonFinite { index: 0 }
        );
    }

    #[test]
    fn rebuilding_from_identical_data_is_idempotent() {
        let ds = langmuir_data(7.0, 0.3);
        let (a, _) = build_isotherm(&ds, ModelKind::Langmuir).unwrap();
        let (b, _) = build_isotherm(&ds.clone(), ModelKind::Langmuir).unwrap();
        let probe = 1.7;
        assert_relative_eq!(a.loading(probe).unwrap(), b.loading(probe).unwrap(), epsilon = 1e-12);
    }
}
