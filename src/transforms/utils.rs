// hyperspectrs/src/transforms/utils.rs

use super::errors::TransformError;
use ndarray::{s, Array1, Array2, ArrayView2};

/// Convolution coefficients of a Savitzky-Golay filter.
///
/// Builds the Vandermonde matrix `B[k + half, i] = k^i` for `k` in
/// `[-half, half]` and returns the row `derivation_order` of its
/// Moore-Penrose pseudo-inverse. `B` always has full column rank for a valid
/// configuration, so the pseudo-inverse is `(B^T B)^-1 B^T` and the requested
/// row is `B (B^T B)^-1 e_d`. The abscissa is scaled to `[-1, 1]` before
/// solving to keep the normal equations well conditioned; the scale is folded
/// back into the result.
pub fn savitzky_golay_coefficients(
    window_size: usize,
    polynomial_order: usize,
    derivation_order: usize,
) -> Result<Array1<f64>, TransformError> {
    let half = (window_size - 1) / 2;
    let scale = half.max(1) as f64;
    let ncoefs = polynomial_order + 1;
    let vandermonde = Array2::from_shape_fn((2 * half + 1, ncoefs), |(row, power)| {
        let k = row as f64 - half as f64;
        (k / scale).powi(power as i32)
    });
    let gram = vandermonde.t().dot(&vandermonde);
    let mut unit = Array1::<f64>::zeros(ncoefs);
    unit[derivation_order] = 1.;
    let solution = solve_spd(&gram, &unit)?;
    let kernel = vandermonde.dot(&solution);
    Ok(kernel / scale.powi(derivation_order as i32))
}

/// Pads every row with `half` extrapolated samples on each side.
///
/// Head samples are `x0 - |x[half - j] - x0|` and tail samples are
/// `xn + |x[n - 2 - j] - xn|`, i.e. the signal mirrored around its end point
/// and reflected through it.
pub fn mirror_pad(x: ArrayView2<f64>, half: usize) -> Result<Array2<f64>, TransformError> {
    let (nrows, ncols) = x.dim();
    if ncols < half + 1 {
        return Err(TransformError::SignalTooShort(ncols, 2 * half + 1));
    }
    let mut padded = Array2::<f64>::zeros((nrows, ncols + 2 * half));
    padded.slice_mut(s![.., half..half + ncols]).assign(&x);
    for (mut out, row) in padded.rows_mut().into_iter().zip(x.rows()) {
        let first = row[0];
        let last = row[ncols - 1];
        for j in 0..half {
            out[j] = first - (row[half - j] - first).abs();
            out[half + ncols + j] = last + (row[ncols - 2 - j] - last).abs();
        }
    }
    Ok(padded)
}

/// Solves `a x = b` for a symmetric positive definite `a` with a Cholesky
/// factorisation.
pub fn solve_spd(a: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>, TransformError> {
    let n = b.len();
    let mut l = Array2::<f64>::zeros((n, n));
    for j in 0..n {
        for i in j..n {
            let mut sum = a[[i, j]];
            for k in 0..j {
                sum -= l[[i, k]] * l[[j, k]];
            }
            if i == j {
                if sum <= 0. {
                    return Err(TransformError::SingularMatrix);
                }
                l[[i, j]] = libm::sqrt(sum);
            } else {
                l[[i, j]] = sum / l[[j, j]];
            }
        }
    }
    // L y = b
    let mut y = Array1::<f64>::zeros(n);
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum -= l[[i, j]] * y[j];
        }
        y[i] = sum / l[[i, i]];
    }
    // L^T x = y
    let mut x = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let mut sum = y[i];
        for j in i + 1..n {
            sum -= l[[j, i]] * x[j];
        }
        x[i] = sum / l[[i, i]];
    }
    Ok(x)
}
