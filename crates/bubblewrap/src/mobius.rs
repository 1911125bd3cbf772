//! Möbius transformations as 2×2 complex matrices.
//!
//! Matrices act on the Riemann sphere by `z ↦ (a z + b) / (c z + d)`. Most
//! helpers assume unit determinant; `make_sl2` normalizes a GL(2,C) matrix.

use nalgebra::{Complex, Matrix2};

/// 2×2 complex matrix; the holonomy and circle-inversion type throughout the crate.
pub type Mat2c = Matrix2<Complex<f64>>;

#[inline]
pub(crate) fn c(re: f64, im: f64) -> Complex<f64> {
    Complex::new(re, im)
}

/// Inverse of a unit-determinant matrix (the adjugate).
pub fn sl2_inv(m: &Mat2c) -> Mat2c {
    Mat2c::new(m[(1, 1)], -m[(0, 1)], -m[(1, 0)], m[(0, 0)])
}

#[inline]
pub fn det(m: &Mat2c) -> Complex<f64> {
    m[(0, 0)] * m[(1, 1)] - m[(0, 1)] * m[(1, 0)]
}

#[inline]
pub fn trace(m: &Mat2c) -> Complex<f64> {
    m[(0, 0)] + m[(1, 1)]
}

/// Scale `m` by `1/sqrt(det m)` (principal branch).
pub fn make_sl2(m: &Mat2c) -> Mat2c {
    let s = det(m).sqrt();
    m.map(|z| z / s)
}

/// `a b a⁻¹ b⁻¹` for unit-determinant `a`, `b`.
pub fn commutator(a: &Mat2c, b: &Mat2c) -> Mat2c {
    a * b * sl2_inv(a) * sl2_inv(b)
}

pub fn transform_point(m: &Mat2c, p: Complex<f64>) -> Complex<f64> {
    (m[(0, 0)] * p + m[(0, 1)]) / (m[(1, 0)] * p + m[(1, 1)])
}

/// Spectral radius of an element of SL(2,C), always ≥ 1.
pub fn sl2_rho(m: &Mat2c) -> f64 {
    let t = trace(m);
    let d = (t * t - c(4.0, 0.0)).sqrt();
    let rho = (0.5 * (t + d)).norm();
    if rho < 1.0 {
        1.0 / rho
    } else {
        rho
    }
}

/// The two fixed points of `m` (requires `m[(1,0)] != 0`).
pub fn fixed_points(m: &Mat2c) -> (Complex<f64>, Complex<f64>) {
    let (a, b, cc, d) = (m[(0, 0)], m[(0, 1)], m[(1, 0)], m[(1, 1)]);
    let disc = (4.0 * b * cc + (a - d) * (a - d)).sqrt();
    (((a - d) - disc) / (2.0 * cc), ((a - d) + disc) / (2.0 * cc))
}

/// Cross ratio `(z1-z3)(z2-z4) / ((z1-z4)(z2-z3))`.
pub fn cross_ratio(z1: Complex<f64>, z2: Complex<f64>, z3: Complex<f64>, z4: Complex<f64>) -> Complex<f64> {
    (z1 - z3) * (z2 - z4) / ((z1 - z4) * (z2 - z3))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_sl2(rng: &mut StdRng) -> Mat2c {
        let mut z = || c(rng.gen_range(-2.0..2.0), rng.gen_range(-2.0..2.0));
        let m = Mat2c::new(z(), z(), z(), z());
        make_sl2(&m)
    }

    fn close(a: &Mat2c, b: &Mat2c) -> bool {
        (a - b).iter().all(|z| z.norm() < 1e-9)
    }

    #[test]
    fn inverse_and_determinant() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let m = random_sl2(&mut rng);
            assert!((det(&m) - c(1.0, 0.0)).norm() < 1e-12);
            assert!(close(&(m * sl2_inv(&m)), &Mat2c::identity()));
        }
    }

    #[test]
    fn commutator_of_commuting_pair_is_identity() {
        let a = Mat2c::new(c(2.0, 0.0), c(0.0, 0.0), c(0.0, 0.0), c(0.5, 0.0));
        let b = Mat2c::new(c(0.0, 1.0), c(0.0, 0.0), c(0.0, 0.0), c(0.0, -1.0));
        assert!(close(&commutator(&a, &b), &Mat2c::identity()));
    }

    #[test]
    fn fixed_points_are_fixed() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..20 {
            let m = random_sl2(&mut rng);
            let (p, q) = fixed_points(&m);
            assert!((transform_point(&m, p) - p).norm() < 1e-7 * (1.0 + p.norm_sqr()));
            assert!((transform_point(&m, q) - q).norm() < 1e-7 * (1.0 + q.norm_sqr()));
        }
    }

    #[test]
    fn spectral_radius() {
        let hyp = Mat2c::new(c(3.0, 0.0), c(0.0, 0.0), c(0.0, 0.0), c(1.0 / 3.0, 0.0));
        assert!((sl2_rho(&hyp) - 3.0).abs() < 1e-12);
        let par = Mat2c::new(c(1.0, 0.0), c(1.0, 0.0), c(0.0, 0.0), c(1.0, 0.0));
        assert!((sl2_rho(&par) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn cross_ratio_of_standard_points() {
        let w = cross_ratio(c(0.0, 0.0), c(1.0, 0.0), c(2.0, 0.0), c(3.0, 0.0));
        assert!((w - c(4.0 / 3.0, 0.0)).norm() < 1e-12);
    }
}
