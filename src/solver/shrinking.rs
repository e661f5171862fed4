//! Active-set shrinking for dual coordinate descent
//!
//! Multipliers sitting at the lower bound whose gradient exceeds the largest
//! projected gradient of the previous pass are unlikely to move, so they are
//! dropped from the active set until the remaining problem converges. The
//! full set is then restored for a final verification pass.

use rand::Rng;

/// Permutable set of active variable indices with projected-gradient bounds
#[derive(Debug, Clone)]
pub struct ActiveSet {
    index: Vec<usize>,
    active_size: usize,
    pg_max_old: f64,
    pg_max_new: f64,
    pg_min_new: f64,
}

impl ActiveSet {
    /// Create an active set holding every variable in `0..n`
    pub fn new(n: usize) -> Self {
        Self {
            index: (0..n).collect(),
            active_size: n,
            pg_max_old: f64::INFINITY,
            pg_max_new: f64::NEG_INFINITY,
            pg_min_new: f64::INFINITY,
        }
    }

    /// Number of active variables
    pub fn len(&self) -> usize {
        self.active_size
    }

    /// Whether no variable is active
    pub fn is_empty(&self) -> bool {
        self.active_size == 0
    }

    /// Whether every variable is active
    pub fn is_full(&self) -> bool {
        self.active_size == self.index.len()
    }

    /// Variable at position `s` of the active prefix
    pub fn get(&self, s: usize) -> usize {
        self.index[s]
    }

    /// Randomly permute the active prefix
    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        for i in 0..self.active_size {
            let j = i + rng.gen_range(0..self.active_size - i);
            self.index.swap(i, j);
        }
    }

    /// Start a pass over the active prefix
    pub fn begin_pass(&mut self) {
        self.pg_max_new = f64::NEG_INFINITY;
        self.pg_min_new = f64::INFINITY;
    }

    /// Whether a variable at the lower bound with gradient `g` can be shrunk
    pub fn can_shrink_lower(&self, g: f64) -> bool {
        g > self.pg_max_old
    }

    /// Remove position `s` from the active prefix
    ///
    /// The last active variable takes its place, so the caller must revisit
    /// position `s`.
    pub fn shrink(&mut self, s: usize) {
        self.active_size -= 1;
        self.index.swap(s, self.active_size);
    }

    /// Record the projected gradient of one visited variable
    pub fn record(&mut self, projected_gradient: f64) {
        self.pg_max_new = self.pg_max_new.max(projected_gradient);
        self.pg_min_new = self.pg_min_new.min(projected_gradient);
    }

    /// Spread of projected gradients seen in the current pass
    pub fn gap(&self) -> f64 {
        self.pg_max_new - self.pg_min_new
    }

    /// Carry this pass's bound into the next shrinking decision
    pub fn end_pass(&mut self) {
        self.pg_max_old = if self.pg_max_new <= 0.0 {
            f64::INFINITY
        } else {
            self.pg_max_new
        };
    }

    /// Reactivate every variable and forget the shrinking bound
    pub fn restore(&mut self) {
        self.active_size = self.index.len();
        self.pg_max_old = f64::INFINITY;
    }
}
