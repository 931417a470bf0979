// SPDX-License-Identifier: MIT OR Apache-2.0

//! Linear projection of word vectors to 2 or 3 dimensions.

use crate::errors::EmbeddingError;

const MAX_ITERATIONS: usize = 1000;
const TOLERANCE: f64 = 1e-10;
const EPSILON: f64 = 1e-12;

/// Trait for dimensionality reduction.
pub trait Projector {
    /// Short identifier used in reports and logs.
    fn name(&self) -> &str;

    /// Reduce each row of `vectors` to `dims` coordinates.
    fn project(&self, vectors: &[Vec<f32>], dims: usize) -> Result<Vec<Vec<f32>>, EmbeddingError>;
}

/// Principal component analysis via power iteration on the covariance matrix.
///
/// Components come out in order of explained variance. Each axis is signed so
/// that its largest-magnitude loading is positive, which keeps output stable
/// across runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct PcaProjector;

impl Projector for PcaProjector {
    fn name(&self) -> &str {
        "pca"
    }

    fn project(&self, vectors: &[Vec<f32>], dims: usize) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let n = vectors.len();
        let d = vectors.first().map(Vec::len).unwrap_or(0);
        if dims == 0 || dims > d || dims > n {
            return Err(EmbeddingError::InvalidDimensions {
                requested: dims,
                available: d.min(n),
            });
        }
        if vectors.iter().any(|v| v.len() != d) {
            return Err(EmbeddingError::InvalidParams("vectors differ in length".into()));
        }

        let centered = center(vectors);
        let cov = covariance(&centered);
        let axes = principal_axes(&cov, dims);

        Ok(centered
            .iter()
            .map(|row| axes.iter().map(|axis| dot(row, axis) as f32).collect())
            .collect())
    }
}

fn center(vectors: &[Vec<f32>]) -> Vec<Vec<f64>> {
    let n = vectors.len() as f64;
    let d = vectors[0].len();
    let mut mean = vec![0.0f64; d];
    for row in vectors {
        for (m, v) in mean.iter_mut().zip(row) {
            *m += *v as f64;
        }
    }
    mean.iter_mut().for_each(|m| *m /= n);

    vectors
        .iter()
        .map(|row| row.iter().zip(&mean).map(|(v, m)| *v as f64 - m).collect())
        .collect()
}

fn covariance(centered: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let d = centered[0].len();
    let denom = (centered.len().saturating_sub(1)).max(1) as f64;
    let mut cov = vec![vec![0.0f64; d]; d];
    for row in centered {
        for i in 0..d {
            if row[i] == 0.0 {
                continue;
            }
            for j in i..d {
                cov[i][j] += row[i] * row[j];
            }
        }
    }
    for i in 0..d {
        for j in i..d {
            let value = cov[i][j] / denom;
            cov[i][j] = value;
            cov[j][i] = value;
        }
    }
    cov
}

/// Top `k` eigenvectors of a symmetric positive semi-definite matrix.
fn principal_axes(cov: &[Vec<f64>], k: usize) -> Vec<Vec<f64>> {
    let d = cov.len();
    let mut matrix = cov.to_vec();
    let mut axes: Vec<Vec<f64>> = Vec::with_capacity(k);

    for _ in 0..k {
        let mut v = start_vector(d, &axes);
        for _ in 0..MAX_ITERATIONS {
            let mut w = mat_vec(&matrix, &v);
            orthogonalize(&mut w, &axes);
            let len = norm(&w);
            if len < EPSILON {
                // no variance left in the remaining subspace
                break;
            }
            w.iter_mut().for_each(|x| *x /= len);
            let delta: f64 = w.iter().zip(&v).map(|(a, b)| (a - b).abs()).sum();
            v = w;
            if delta < TOLERANCE {
                break;
            }
        }

        fix_sign(&mut v);
        let lambda = dot(&v, &mat_vec(&matrix, &v));
        for i in 0..d {
            for j in 0..d {
                matrix[i][j] -= lambda * v[i] * v[j];
            }
        }
        axes.push(v);
    }
    axes
}

/// A unit vector orthogonal to `axes`.
fn start_vector(d: usize, axes: &[Vec<f64>]) -> Vec<f64> {
    let generic: Vec<f64> = (0..d).map(|i| 1.0 + 0.1 * i as f64).collect();
    let candidates = std::iter::once(generic).chain((0..d).map(|i| {
        let mut e = vec![0.0; d];
        e[i] = 1.0;
        e
    }));

    for mut candidate in candidates {
        orthogonalize(&mut candidate, axes);
        let n = norm(&candidate);
        if n > 1e-6 {
            candidate.iter_mut().for_each(|x| *x /= n);
            return candidate;
        }
    }
    vec![0.0; d]
}

fn orthogonalize(v: &mut [f64], axes: &[Vec<f64>]) {
    for axis in axes {
        let p = dot(v, axis);
        for (x, a) in v.iter_mut().zip(axis) {
            *x -= p * a;
        }
    }
}

fn fix_sign(v: &mut [f64]) {
    let pivot = v
        .iter()
        .copied()
        .fold(0.0f64, |best, x| if x.abs() > best.abs() { x } else { best });
    if pivot < 0.0 {
        v.iter_mut().for_each(|x| *x = -*x);
    }
}

fn mat_vec(m: &[Vec<f64>], v: &[f64]) -> Vec<f64> {
    m.iter().map(|row| dot(row, v)).collect()
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn norm(v: &[f64]) -> f64 {
    dot(v, v).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collinear_points_collapse_onto_first_axis() {
        let vectors = vec![
            vec![1.0, 2.0, 3.0],
            vec![2.0, 4.0, 6.0],
            vec![3.0, 6.0, 9.0],
            vec![4.0, 8.0, 12.0],
        ];
        let points = PcaProjector.project(&vectors, 2).unwrap();
        assert_eq!(points.len(), 4);
        assert!(points.iter().all(|p| p.len() == 2));

        let step = 14.0f32.sqrt();
        for pair in points.windows(2) {
            assert!(((pair[1][0] - pair[0][0]) - step).abs() < 1e-3);
        }
        assert!(points.iter().all(|p| p[1].abs() < 1e-4));
    }

    #[test]
    fn components_follow_variance_order() {
        // wide spread along x, narrow along y, none along z
        let vectors = vec![
            vec![-10.0, 1.0, 0.0],
            vec![10.0, -1.0, 0.0],
            vec![-10.0, -1.0, 0.0],
            vec![10.0, 1.0, 0.0],
        ];
        let points = PcaProjector.project(&vectors, 3).unwrap();
        let spread = |k: usize| points.iter().map(|p| p[k].abs()).fold(0.0f32, f32::max);
        assert!((spread(0) - 10.0).abs() < 1e-3);
        assert!((spread(1) - 1.0).abs() < 1e-3);
        assert!(spread(2) < 1e-4);
        // sign convention: +x loads positively
        assert!(points[1][0] > 0.0);
    }

    #[test]
    fn rejects_impossible_dimensions() {
        let vectors = vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 7.0]];
        assert!(matches!(
            PcaProjector.project(&vectors, 3),
            Err(EmbeddingError::InvalidDimensions { .. })
        ));
        assert!(PcaProjector.project(&vectors, 0).is_err());
        assert!(PcaProjector.project(&[], 2).is_err());
    }
}
