//! One-dimensional Gaussian kernel density estimation.

use std::f64::consts::PI;

/// Gaussian KDE with Scott's rule bandwidth.
#[derive(Debug, Clone)]
pub struct GaussianKde {
    points: Vec<f64>,
    bandwidth: f64,
}

impl GaussianKde {
    /// Returns `None` for fewer than two points or zero variance.
    pub fn new(points: &[f64]) -> Option<Self> {
        let n = points.len();
        if n < 2 {
            return None;
        }
        let mean = points.iter().sum::<f64>() / n as f64;
        let variance = points.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        if !variance.is_finite() || variance <= 0.0 {
            return None;
        }
        let scott = (n as f64).powf(-0.2);
        Some(Self {
            points: points.to_vec(),
            bandwidth: variance.sqrt() * scott,
        })
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn density(&self, x: f64) -> f64 {
        let norm = 1.0 / (self.points.len() as f64 * self.bandwidth * (2.0 * PI).sqrt());
        norm * self
            .points
            .iter()
            .map(|p| (-0.5 * ((x - p) / self.bandwidth).powi(2)).exp())
            .sum::<f64>()
    }

    /// `(x, density)` at `samples` evenly spaced points of `[lo, hi]`.
    pub fn curve(&self, lo: f64, hi: f64, samples: usize) -> Vec<(f64, f64)> {
        let steps = samples.max(2) - 1;
        (0..=steps)
            .map(|i| {
                let x = lo + (hi - lo) * i as f64 / steps as f64;
                (x, self.density(x))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integrates_to_one() {
        let kde = GaussianKde::new(&[1.0, 1.1, 1.25, 1.4]).unwrap();
        let curve = kde.curve(-1.0, 3.5, 4001);
        let dx = curve[1].0 - curve[0].0;
        let area: f64 = curve.windows(2).map(|w| 0.5 * (w[0].1 + w[1].1) * dx).sum();
        assert!((area - 1.0).abs() < 1e-3, "area {area}");
    }

    #[test]
    fn scott_bandwidth() {
        let kde = GaussianKde::new(&[0.0, 2.0]).unwrap();
        let expected = 2.0f64.sqrt() * 2.0f64.powf(-0.2);
        assert!((kde.bandwidth() - expected).abs() < 1e-12);
    }

    #[test]
    fn degenerate_inputs() {
        assert!(GaussianKde::new(&[]).is_none());
        assert!(GaussianKde::new(&[1.2]).is_none());
        assert!(GaussianKde::new(&[1.2, 1.2]).is_none());
    }

    #[test]
    fn peaks_at_the_data() {
        let kde = GaussianKde::new(&[1.0, 1.02, 1.6]).unwrap();
        assert!(kde.density(1.01) > kde.density(1.3));
    }
}
