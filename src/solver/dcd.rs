//! Dual coordinate descent for the L2-regularized, squared-hinge linear SVM
//!
//! Solves the binary problem
//!
//! ```text
//! min_w  0.5 * w^T w + C * sum_i max(0, 1 - y_i w^T x_i)^2
//! ```
//!
//! through its dual, updating one multiplier at a time in closed form while
//! maintaining `w = sum_i alpha_i y_i x_i`. The bias is learned as the weight
//! of an extra constant feature equal to the intercept scaling, so it is
//! regularized like every other weight.

use crate::core::{LearnerError, OptimizationResult, Result, Sample, SolverConfig};
use crate::kernel::{axpy, dot_product, norm_squared};
use crate::solver::shrinking::ActiveSet;
use log::{debug, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Projected gradients below this magnitude do not trigger an update
const MIN_PROJECTED_GRADIENT: f64 = 1.0e-12;

/// Coordinate descent solver for one binary problem
pub struct DualCoordinateDescent {
    config: SolverConfig,
}

impl DualCoordinateDescent {
    /// Create a solver with the given configuration
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Get the solver configuration
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solve the binary problem where `targets[i]` is `+1.0` or `-1.0`
    pub fn solve(&self, samples: &[Sample], targets: &[f64]) -> Result<OptimizationResult> {
        self.validate(samples, targets)?;

        let n = samples.len();
        let dim = samples[0].dim();

        // A non-finite feature turns the first update into NaN, which spreads
        // to every weight through `w += delta * x`
        if let Some(i) = samples
            .iter()
            .position(|s| s.features.iter().any(|v| !v.is_finite()))
        {
            debug!("Sample {i} has non-finite features; solution is undefined");
            return Ok(OptimizationResult {
                weights: vec![f64::NAN; dim],
                bias: if self.config.fit_intercept { f64::NAN } else { 0.0 },
                iterations: 0,
                converged: false,
            });
        }
        let bias_feature = if self.config.fit_intercept {
            self.config.intercept_scaling
        } else {
            0.0
        };

        // Squared hinge: no upper bound on alpha, diagonal shift of 1 / (2C)
        let diag = 0.5 / self.config.c;
        let qd: Vec<f64> = samples
            .iter()
            .map(|s| diag + norm_squared(&s.features) + bias_feature * bias_feature)
            .collect();

        let mut alpha = vec![0.0; n];
        let mut weights = vec![0.0; dim];
        let mut bias_weight = 0.0;

        let mut active = ActiveSet::new(n);
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.config.max_iterations {
            active.begin_pass();
            active.shuffle(&mut rng);

            let mut s = 0;
            while s < active.len() {
                let i = active.get(s);
                let y_i = targets[i];
                let x_i = &samples[i].features;

                let margin = dot_product(&weights, x_i) + bias_weight * bias_feature;
                let g = y_i * margin - 1.0 + alpha[i] * diag;

                let mut pg = 0.0;
                if alpha[i] == 0.0 {
                    if active.can_shrink_lower(g) {
                        active.shrink(s);
                        continue;
                    } else if g < 0.0 {
                        pg = g;
                    }
                } else {
                    pg = g;
                }
                active.record(pg);

                if pg.abs() > MIN_PROJECTED_GRADIENT {
                    let alpha_old = alpha[i];
                    alpha[i] = (alpha[i] - g / qd[i]).max(0.0);
                    let delta = (alpha[i] - alpha_old) * y_i;
                    axpy(delta, x_i, &mut weights);
                    bias_weight += delta * bias_feature;
                }

                s += 1;
            }

            iterations += 1;

            if active.gap() <= self.config.tolerance {
                if active.is_full() {
                    converged = true;
                    break;
                }
                debug!("Active set converged, restoring all {n} variables");
                active.restore();
                continue;
            }

            active.end_pass();
        }

        if !converged {
            warn!(
                "Solver reached max_iter={} without converging (C={}); \
                 consider more iterations",
                self.config.max_iterations, self.config.c
            );
        }

        let n_support = alpha.iter().filter(|&&a| a > 0.0).count();
        debug!(
            "Solver finished after {iterations} passes, {n_support}/{n} support vectors"
        );

        Ok(OptimizationResult {
            weights,
            bias: bias_weight * bias_feature,
            iterations,
            converged,
        })
    }

    fn validate(&self, samples: &[Sample], targets: &[f64]) -> Result<()> {
        if samples.is_empty() {
            return Err(LearnerError::EmptyDataset);
        }
        if samples.len() != targets.len() {
            return Err(LearnerError::DimensionMismatch {
                expected: samples.len(),
                actual: targets.len(),
            });
        }
        if !(self.config.c > 0.0 && self.config.c.is_finite()) {
            return Err(LearnerError::InvalidParameter(format!(
                "C must be positive and finite, got: {}",
                self.config.c
            )));
        }
        if self.config.max_iterations == 0 {
            return Err(LearnerError::InvalidParameter(
                "max_iter must be at least 1".to_string(),
            ));
        }
        if let Some(&t) = targets.iter().find(|&&t| t != 1.0 && t != -1.0) {
            return Err(LearnerError::InvalidParameter(format!(
                "Binary targets must be +1 or -1, got: {t}"
            )));
        }
        Ok(())
    }
}
