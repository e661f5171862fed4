//! Dense linear algebra for the linear model: K(x, y) = x^T * y

/// Compute dot product between two dense vectors
///
/// Extra trailing entries on the longer side are ignored.
pub fn dot_product(x: &[f64], y: &[f64]) -> f64 {
    x.iter().zip(y.iter()).map(|(a, b)| a * b).sum()
}

/// Compute `y += a * x` in place
pub fn axpy(a: f64, x: &[f64], y: &mut [f64]) {
    for (yi, xi) in y.iter_mut().zip(x.iter()) {
        *yi += a * xi;
    }
}

/// Squared L2 norm
pub fn norm_squared(x: &[f64]) -> f64 {
    dot_product(x, x)
}
