//! Circles on the Riemann sphere and their development through a packing.
//!
//! A circle (or line) is stored as the matrix of its inversion, an
//! anti-Möbius map `z ↦ (a z̄ + b) / (c z̄ + d)`. Transforming by a Möbius
//! map `T` conjugates it: `T · m · conj(T⁻¹)`.

use std::fmt;

use nalgebra::Complex;

use crate::cfg::LINE_EPS;
use crate::cocycle::{CocycleError, InterstitialCocycle};
use crate::dcel::{edge_chain_dfs, HalfEdgeId, Move, VertexId};
use crate::mobius::{c, make_sl2, sl2_inv, Mat2c};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    m: Mat2c,
}

impl Circle {
    #[inline]
    pub fn from_matrix(m: Mat2c) -> Self {
        Self { m }
    }

    #[inline]
    pub fn matrix(&self) -> &Mat2c {
        &self.m
    }

    pub fn from_center_radius(center: Complex<f64>, radius: f64) -> Self {
        let i = c(0.0, 1.0);
        let r = radius;
        Self::from_matrix(Mat2c::new(
            i * center / r,
            i * (r - center.norm_sqr() / r),
            i / r,
            -i * center.conj() / r,
        ))
    }

    /// Line through `point` at angle `theta` to the real axis.
    pub fn from_point_angle(point: Complex<f64>, theta: f64) -> Self {
        let u = Complex::from_polar(1.0, theta);
        Self::from_matrix(Mat2c::new(
            u,
            u.conj() * point - u * point.conj(),
            c(0.0, 0.0),
            u.conj(),
        ))
    }

    /// The real axis, boundary of the standard interstice.
    pub fn real_line() -> Self {
        Self::from_point_angle(c(0.0, 0.0), 0.0)
    }

    /// True for lines (circles through infinity).
    pub fn contains_infinity(&self) -> bool {
        self.m[(1, 0)].im.abs() < LINE_EPS
    }

    pub fn center(&self) -> Complex<f64> {
        self.m[(0, 0)] / self.m[(1, 0)]
    }

    pub fn radius(&self) -> f64 {
        1.0 / self.m[(1, 0)].im
    }

    pub fn line_base(&self) -> Complex<f64> {
        0.5 * self.m[(0, 0)] * self.m[(0, 1)]
    }

    pub fn line_angle(&self) -> f64 {
        self.m[(0, 0)].arg()
    }

    /// Image under `t` after normalizing it to unit determinant.
    pub fn transform_gl2(&self, t: &Mat2c) -> Self {
        self.transform_sl2(&make_sl2(t))
    }

    /// Image under a unit-determinant `t`.
    pub fn transform_sl2(&self, t: &Mat2c) -> Self {
        let ti = sl2_inv(t).map(|z| z.conj());
        Self::from_matrix(t * self.m * ti)
    }
}

impl fmt::Display for Circle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.contains_infinity() {
            write!(
                f,
                "Line(c={}, arg={}*pi)",
                self.line_base(),
                self.line_angle() / std::f64::consts::PI
            )
        } else {
            write!(f, "Circle(c={}, r={})", self.center(), self.radius())
        }
    }
}

/// Cross ratio of a Steiner chain of `n` circles: `2 cos(π/n)`.
pub fn steiner_chain_xratio(n: usize) -> f64 {
    2.0 * (std::f64::consts::PI / n as f64).cos()
}

/// The first `k` neighbours of `e0.src`, developed from the real line.
///
/// Neighbour `i` is reached by `i` clockwise rotations about `e0.src`
/// followed by one clockwise rotation inside the triangle.
pub fn circles_around_vertex<C: InterstitialCocycle>(
    mesh: &C,
    x: &[f64],
    e0: HalfEdgeId,
    k: usize,
) -> Result<Vec<Circle>, CocycleError> {
    let d = mesh.indexed().mesh();
    let c0 = Circle::real_line();
    let mut out = Vec::with_capacity(k);
    let mut chain = vec![e0];
    for i in 0..k {
        if i > 0 {
            let last = chain[chain.len() - 1];
            chain.push(d.vert_cw(last).ok_or(CocycleError::BlockedMove(last))?);
        }
        let last = chain[chain.len() - 1];
        let mut ch = chain.clone();
        ch.push(d.tri_cw(last));
        out.push(c0.transform_gl2(&mesh.hol(&ch, x)?));
    }
    Ok(out)
}

/// One developed circle per vertex, reached from `base` along a shortest chain.
pub fn vertex_circles<C: InterstitialCocycle>(
    mesh: &C,
    x: &[f64],
    base: HalfEdgeId,
) -> Result<Vec<(VertexId, Circle)>, CocycleError> {
    let d = mesh.indexed().mesh();
    let c0 = Circle::real_line();
    let mut seen = vec![false; d.num_vertices()];
    let mut out = Vec::new();
    for ch in edge_chain_dfs(d, base, &Move::ALL) {
        let Some(&last) = ch.last() else { continue };
        let v = d.src(last);
        if std::mem::replace(&mut seen[v.0], true) {
            continue;
        }
        out.push((v, c0.transform_gl2(&mesh.hol(&ch, x)?)));
    }
    Ok(out)
}
