//! Binary logit estimation by Newton-Raphson (IRLS)
//!
//! Maximizes the binomial log-likelihood of the observed choices under a
//! sigmoid link. An optional L2 penalty keeps coefficients finite on
//! separated data; without it, separation and singular designs are reported
//! as convergence failures rather than silently returning huge estimates.

use faer::prelude::SolverCore;
use faer::{Mat, Side};
use serde::Serialize;

use super::encoder::{DesignColumn, DesignLayout, DesignMatrix};
use crate::error::{ConjointError, Result};

/// Fitted probabilities this close to their label on every row mean the
/// classes are perfectly separated
const SEPARATION_TOLERANCE: f64 = 1e-10;

/// Largest variance inflation H_jj * (H^-1)_jj accepted before the
/// information matrix is treated as singular
const MAX_VARIANCE_INFLATION: f64 = 1e10;

/// Optimizer settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FitConfig {
    /// Maximum Newton iterations before giving up
    pub max_iterations: usize,
    /// Converged when the largest coefficient step falls below this
    pub tolerance: f64,
    /// Ridge penalty on all coefficients (0 = plain maximum likelihood)
    pub l2_penalty: f64,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            max_iterations: 35,
            tolerance: 1e-8,
            l2_penalty: 0.0,
        }
    }
}

/// One estimated coefficient with its Wald statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Coefficient {
    pub column: DesignColumn,
    pub estimate: f64,
    pub std_error: f64,
    pub z_value: f64,
    pub p_value: f64,
}

/// Result of a logit fit: one coefficient per design column plus diagnostics
#[derive(Debug, Clone, Serialize)]
pub struct FittedModel {
    /// In design layout order, intercept first
    pub coefficients: Vec<Coefficient>,
    pub log_likelihood: f64,
    /// Log-likelihood of the intercept-only model
    pub null_log_likelihood: f64,
    /// McFadden's pseudo R-squared
    pub pseudo_r_squared: f64,
    pub iterations: usize,
    pub n_observations: usize,
    #[serde(skip)]
    pub layout: DesignLayout,
}

impl FittedModel {
    pub fn estimates(&self) -> Vec<f64> {
        self.coefficients.iter().map(|c| c.estimate).collect()
    }

    /// Coefficient of the (attribute, level) indicator, if it was fitted
    pub fn coefficient_for(&self, attribute: &str, level: &str) -> Option<&Coefficient> {
        self.layout
            .column_index(attribute, level)
            .and_then(|idx| self.coefficients.get(idx))
    }

    pub fn intercept(&self) -> f64 {
        self.coefficients.first().map_or(0.0, |c| c.estimate)
    }

    /// x'β for an encoded design row
    pub fn linear_predictor(&self, row: &[f64]) -> Result<f64> {
        if row.len() != self.coefficients.len() {
            return Err(ConjointError::SchemaMismatch(format!(
                "design row has {} columns, model has {} coefficients",
                row.len(),
                self.coefficients.len()
            )));
        }
        Ok(row
            .iter()
            .zip(&self.coefficients)
            .map(|(x, c)| x * c.estimate)
            .sum())
    }
}

/// Fits a logistic regression of choices on a design matrix
pub trait LogisticFitter {
    fn fit(&self, design: &DesignMatrix, y: &[f64]) -> Result<FittedModel>;
}

/// Newton-Raphson maximum likelihood with Cholesky solves
#[derive(Debug, Clone, Default)]
pub struct NewtonRaphsonFitter {
    pub config: FitConfig,
}

impl NewtonRaphsonFitter {
    pub fn new(config: FitConfig) -> Self {
        Self { config }
    }
}

/// Per-iteration quantities at the current coefficients
struct NewtonState {
    probabilities: Vec<f64>,
    log_likelihood: f64,
    gradient: Mat<f64>,
    information: Mat<f64>,
}

impl NewtonRaphsonFitter {
    fn evaluate(&self, x: &Mat<f64>, y: &[f64], beta: &[f64]) -> NewtonState {
        let (n, k) = (x.nrows(), x.ncols());
        let lambda = self.config.l2_penalty;

        let mut probabilities = Vec::with_capacity(n);
        let mut log_likelihood = 0.0;
        let mut gradient = Mat::<f64>::zeros(k, 1);
        let mut information = Mat::<f64>::zeros(k, k);

        for i in 0..n {
            let eta: f64 = (0..k).map(|j| x[(i, j)] * beta[j]).sum();
            let p = sigmoid(eta);
            log_likelihood += y[i] * eta - log1p_exp(eta);

            let residual = y[i] - p;
            let weight = p * (1.0 - p);
            for j in 0..k {
                let xij = x[(i, j)];
                if xij == 0.0 {
                    continue;
                }
                gradient[(j, 0)] += xij * residual;
                for l in 0..k {
                    information[(j, l)] += xij * x[(i, l)] * weight;
                }
            }
            probabilities.push(p);
        }

        for j in 0..k {
            gradient[(j, 0)] -= lambda * beta[j];
            information[(j, j)] += lambda;
        }

        NewtonState {
            probabilities,
            log_likelihood,
            gradient,
            information,
        }
    }

    fn failure(reason: impl Into<String>, iterations: usize, log_likelihood: f64) -> ConjointError {
        ConjointError::ConvergenceFailure {
            reason: reason.into(),
            iterations,
            log_likelihood,
        }
    }
}

impl LogisticFitter for NewtonRaphsonFitter {
    fn fit(&self, design: &DesignMatrix, y: &[f64]) -> Result<FittedModel> {
        let x = &design.x;
        let (n, k) = (x.nrows(), x.ncols());

        if y.len() != n {
            return Err(ConjointError::SchemaMismatch(format!(
                "{} choice labels for {} design rows",
                y.len(),
                n
            )));
        }
        if let Some(bad) = y.iter().find(|&&v| v != 0.0 && v != 1.0) {
            return Err(ConjointError::DataLoadFailure(format!(
                "choice labels must be 0 or 1, found {}",
                bad
            )));
        }
        if n == 0 || k == 0 {
            return Err(Self::failure("empty design matrix", 0, 0.0));
        }
        if n < k {
            return Err(Self::failure(
                format!("{} observations cannot identify {} parameters", n, k),
                0,
                0.0,
            ));
        }

        let mut beta = vec![0.0; k];
        let mut iterations = 0;
        let mut converged = false;
        let mut last_ll = f64::NAN;

        while iterations < self.config.max_iterations {
            iterations += 1;
            let state = self.evaluate(x, y, &beta);
            last_ll = state.log_likelihood;

            if !state.log_likelihood.is_finite() {
                return Err(Self::failure("log-likelihood is not finite", iterations, last_ll));
            }
            if is_separated(&state.probabilities, y) {
                return Err(Self::failure("perfect separation detected", iterations, last_ll));
            }

            let inverse = invert_information(&state.information).ok_or_else(|| {
                Self::failure(
                    "information matrix is singular (collinear design or too few observations)",
                    iterations,
                    last_ll,
                )
            })?;
            let step = &inverse * &state.gradient;

            let mut max_step: f64 = 0.0;
            for (j, b) in beta.iter_mut().enumerate() {
                let delta = step[(j, 0)];
                *b += delta;
                max_step = max_step.max(delta.abs());
            }

            tracing::debug!(
                iteration = iterations,
                log_likelihood = state.log_likelihood,
                max_step,
                "newton step"
            );

            if !max_step.is_finite() || beta.iter().any(|b| !b.is_finite()) {
                return Err(Self::failure("coefficients diverged", iterations, last_ll));
            }
            if max_step < self.config.tolerance {
                converged = true;
                break;
            }
        }

        if !converged {
            return Err(Self::failure(
                format!("iteration limit of {} reached", self.config.max_iterations),
                iterations,
                last_ll,
            ));
        }

        let state = self.evaluate(x, y, &beta);
        if is_separated(&state.probabilities, y) {
            return Err(Self::failure(
                "perfect separation detected",
                iterations,
                state.log_likelihood,
            ));
        }
        let covariance = invert_information(&state.information).ok_or_else(|| {
            Self::failure(
                "information matrix is singular at the optimum",
                iterations,
                state.log_likelihood,
            )
        })?;

        let coefficients = design
            .layout
            .columns()
            .iter()
            .enumerate()
            .map(|(j, column)| {
                let estimate = beta[j];
                let std_error = covariance[(j, j)].max(0.0).sqrt();
                let z_value = if std_error > 0.0 {
                    estimate / std_error
                } else {
                    0.0
                };
                Coefficient {
                    column: column.clone(),
                    estimate,
                    std_error,
                    z_value,
                    p_value: 2.0 * (1.0 - normal_cdf(z_value.abs())),
                }
            })
            .collect();

        let null_log_likelihood = null_log_likelihood(y);
        let pseudo_r_squared = if null_log_likelihood != 0.0 {
            1.0 - state.log_likelihood / null_log_likelihood
        } else {
            0.0
        };

        tracing::debug!(
            iterations,
            log_likelihood = state.log_likelihood,
            pseudo_r_squared,
            "logit fit converged"
        );

        Ok(FittedModel {
            coefficients,
            log_likelihood: state.log_likelihood,
            null_log_likelihood,
            pseudo_r_squared,
            iterations,
            n_observations: n,
            layout: design.layout.clone(),
        })
    }
}

/// Invert a symmetric information matrix, or `None` if it is not safely
/// positive definite
fn invert_information(information: &Mat<f64>) -> Option<Mat<f64>> {
    let inverse = information.cholesky(Side::Lower).ok()?.inverse();

    for j in 0..information.nrows() {
        let inflation = information[(j, j)] * inverse[(j, j)];
        if !inflation.is_finite() || inverse[(j, j)] <= 0.0 || inflation > MAX_VARIANCE_INFLATION {
            return None;
        }
    }

    Some(inverse)
}

fn is_separated(probabilities: &[f64], y: &[f64]) -> bool {
    probabilities
        .iter()
        .zip(y)
        .all(|(p, label)| (label - p).abs() < SEPARATION_TOLERANCE)
}

/// Log-likelihood of a model that predicts the sample choice share for every row
fn null_log_likelihood(y: &[f64]) -> f64 {
    let n = y.len() as f64;
    let share = y.iter().sum::<f64>() / n;
    if share <= 0.0 || share >= 1.0 {
        return 0.0;
    }
    n * (share * share.ln() + (1.0 - share) * (1.0 - share).ln())
}

pub fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// ln(1 + e^x) without overflow
fn log1p_exp(x: f64) -> f64 {
    if x > 0.0 {
        x + (-x).exp().ln_1p()
    } else {
        x.exp().ln_1p()
    }
}

/// Standard normal CDF (Abramowitz and Stegun 7.1.26)
fn normal_cdf(x: f64) -> f64 {
    let a1 = 0.254_829_592;
    let a2 = -0.284_496_736;
    let a3 = 1.421_413_741;
    let a4 = -1.453_152_027;
    let a5 = 1.061_405_429;
    let p = 0.327_591_1;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs() / std::f64::consts::SQRT_2;

    let t = 1.0 / (1.0 + p * x);
    let y = 1.0 - (((((a5 * t + a4) * t) + a3) * t + a2) * t + a1) * t * (-x * x).exp();

    0.5 * (1.0 + sign * y)
}
