use libm::{erf, sqrt};
use std::f64::consts::PI;

// below this argument the series is exact to machine precision
const BOYS_SERIES_CUTOFF: f64 = 1e-8;

/// Zeroth-order Boys function F_0(x) = ∫_0^1 exp(-x t²) dt.
pub fn boys_f0(x: f64) -> f64 {
    if x < BOYS_SERIES_CUTOFF {
        1.0 - x / 3.0
    } else {
        0.5 * sqrt(PI / x) * erf(sqrt(x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // Simpson's rule on the defining integral
    fn boys_quadrature(x: f64) -> f64 {
        let n = 2000;
        let h = 1.0 / n as f64;
        let f = |t: f64| (-x * t * t).exp();
        let mut sum = f(0.0) + f(1.0);
        for i in 1..n {
            let t = i as f64 * h;
            sum += if i % 2 == 0 { 2.0 * f(t) } else { 4.0 * f(t) };
        }
        sum * h / 3.0
    }

    #[test]
    fn test_boys_function() {
        assert_relative_eq!(boys_f0(0.0), 1.0);
        for x in [1e-9, 1e-3, 0.5, 2.0, 10.0, 35.0] {
            assert_relative_eq!(boys_f0(x), boys_quadrature(x), epsilon = 1e-10);
        }
    }

    #[test]
    fn test_boys_function_large_argument() {
        let x = 400.0;
        assert_relative_eq!(boys_f0(x), 0.5 * (PI / x).sqrt(), epsilon = 1e-14);
    }
}
