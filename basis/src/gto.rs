#![allow(non_snake_case)]
extern crate nalgebra as na;

use crate::basis::Basis;
use crate::helper::boys_f0;
use na::Vector3;
use std::f64::consts::PI;

/// Normalized s-type primitive Gaussian `N exp(-alpha |r - center|²)`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GTO {
    pub alpha: f64,
    pub center: Vector3<f64>,
    pub norm: f64,
}

impl GTO {
    pub fn new(alpha: f64, center: Vector3<f64>) -> Self {
        let norm = (2.0 * alpha / PI).powf(0.75);
        Self {
            alpha,
            center,
            norm,
        }
    }

    /// Gaussian product theorem: exponent, center and prefactor of `a * b`.
    pub(crate) fn merge(a: &GTO, b: &GTO) -> (f64, Vector3<f64>, f64) {
        let p = a.alpha + b.alpha;
        let mu = a.alpha * b.alpha / p;
        let P = (a.center * a.alpha + b.center * b.alpha) / p;
        let K = (-mu * (a.center - b.center).norm_squared()).exp();
        (p, P, K)
    }
}

impl Basis for GTO {
    fn evaluate(&self, r: &Vector3<f64>) -> f64 {
        self.norm * (-self.alpha * (r - self.center).norm_squared()).exp()
    }

    fn Sab(a: &GTO, b: &GTO) -> f64 {
        let (p, _, K) = GTO::merge(a, b);
        a.norm * b.norm * K * (PI / p).powf(1.5)
    }

    fn Tab(a: &GTO, b: &GTO) -> f64 {
        let p = a.alpha + b.alpha;
        let mu = a.alpha * b.alpha / p;
        let r2 = (a.center - b.center).norm_squared();
        mu * (3.0 - 2.0 * mu * r2) * GTO::Sab(a, b)
    }

    fn Vab(a: &GTO, b: &GTO, R: Vector3<f64>, Z: u32) -> f64 {
        let (p, P, K) = GTO::merge(a, b);
        let t = p * (P - R).norm_squared();
        -(Z as f64) * a.norm * b.norm * K * 2.0 * PI / p * boys_f0(t)
    }

    fn JKabcd(a: &GTO, b: &GTO, c: &GTO, d: &GTO) -> f64 {
        let (p, P, Kab) = GTO::merge(a, b);
        let (q, Q, Kcd) = GTO::merge(c, d);
        let rho = p * q / (p + q);
        let t = rho * (P - Q).norm_squared();
        let pre = 2.0 * PI.powf(2.5) / (p * q * (p + q).sqrt());
        a.norm * b.norm * c.norm * d.norm * Kab * Kcd * pre * boys_f0(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_normalized_overlap() {
        let g = GTO::new(0.8, Vector3::new(0.1, -0.2, 0.3));
        assert_relative_eq!(GTO::Sab(&g, &g), 1.0, epsilon = 1e-14);
    }

    #[test]
    fn test_kinetic_single_gaussian() {
        // <g|-½∇²|g> = 3α/2 for a normalized s Gaussian
        let g = GTO::new(1.3, Vector3::zeros());
        assert_relative_eq!(GTO::Tab(&g, &g), 1.5 * 1.3, epsilon = 1e-14);
    }

    #[test]
    fn test_nuclear_attraction_on_center() {
        // -Z <g|1/r|g> = -Z * 2 sqrt(2α/π)
        let alpha = 0.7;
        let g = GTO::new(alpha, Vector3::zeros());
        let expected = -2.0 * 2.0 * (2.0 * alpha / PI).sqrt();
        assert_relative_eq!(GTO::Vab(&g, &g, Vector3::zeros(), 2), expected, epsilon = 1e-13);
    }

    #[test]
    fn test_repulsion_same_center() {
        // (gg|gg) = 2 sqrt(α/π) for one normalized s Gaussian
        let alpha = 0.9;
        let g = GTO::new(alpha, Vector3::zeros());
        let expected = 2.0 * (alpha / PI).sqrt();
        assert_relative_eq!(GTO::JKabcd(&g, &g, &g, &g), expected, epsilon = 1e-13);
    }

    #[test]
    fn test_repulsion_far_apart_is_coulomb() {
        let a = GTO::new(1.0, Vector3::zeros());
        let b = GTO::new(1.0, Vector3::new(0.0, 0.0, 50.0));
        assert_relative_eq!(GTO::JKabcd(&a, &a, &b, &b), 1.0 / 50.0, epsilon = 1e-12);
    }
}
