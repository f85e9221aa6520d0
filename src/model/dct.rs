//! Orthonormal DCT-II basis used by the forward model.
//!
//! The transform is applied to the *flattened* block vector, not as a 2-D
//! transform. Forward and inverse paths must keep the same flatten order and
//! dimensionality or round-trips break silently, so both directions share the
//! single basis matrix built here.

use nalgebra::DMatrix;
use std::f64::consts::PI;

/// Build the N×N orthonormal DCT-II matrix: row `k`, column `i` holds
/// `s_k · cos(π·(2i+1)·k / 2N)` with `s_0 = √(1/N)` and `s_k = √(2/N)`.
///
/// The matrix is orthogonal, so the inverse transform (DCT-III with the same
/// scaling) is its transpose.
pub fn dct2_orthonormal(n: usize) -> DMatrix<f64> {
    let nf = n as f64;
    DMatrix::from_fn(n, n, |k, i| {
        let scale = if k == 0 {
            (1.0 / nf).sqrt()
        } else {
            (2.0 / nf).sqrt()
        };
        scale * (PI * (2.0 * i as f64 + 1.0) * k as f64 / (2.0 * nf)).cos()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DVector;

    #[test]
    fn basis_is_orthonormal() {
        let d = dct2_orthonormal(16);
        let gram = &d * d.transpose();
        for i in 0..16 {
            for j in 0..16 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!(
                    (gram[(i, j)] - expected).abs() < 1e-12,
                    "gram[{i},{j}] = {}",
                    gram[(i, j)]
                );
            }
        }
    }

    #[test]
    fn transpose_inverts_forward() {
        let d = dct2_orthonormal(64);
        let x = DVector::from_fn(64, |i, _| if i % 3 == 0 { 1.0 } else { 0.0 });
        let back = d.transpose() * (&d * &x);
        assert!((back - &x).norm() < 1e-12, "round-trip drifted");
    }

    #[test]
    fn constant_signal_concentrates_in_dc() {
        let d = dct2_orthonormal(8);
        let x = DVector::from_element(8, 1.0);
        let c = &d * &x;
        assert!((c[0] - 8.0f64.sqrt()).abs() < 1e-12);
        for k in 1..8 {
            assert!(c[k].abs() < 1e-12, "AC coefficient {k} is {}", c[k]);
        }
    }
}
