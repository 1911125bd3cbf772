//! Least-squares Newton iteration for overdetermined systems.
//!
//! Purpose
//! - Find `x ∈ Rⁿ` with `f(x) = 0` for `f: Rⁿ → Rᵏ`, `k ≥ n`, by repeatedly
//!   solving the linearization `J v ≈ f(x)` in the least-squares sense and
//!   stepping `x ← x − relax·v`.
//!
//! Why this design
//! - The minimum-norm step comes from one SVD, which also yields the
//!   condition number used to refuse steps near singular configurations.
//! - Problems implement `LeastSquaresProblem`; the Jacobian defaults to
//!   forward differences reusing the residual already computed at `x`.
//! - No silent recovery: ill-conditioning, exhaustion and monitor aborts are
//!   distinct `SolverError` variants so callers can stop a parameter sweep
//!   and report how far it got.

use nalgebra::{DMatrix, DVector};
use thiserror::Error;

use crate::cfg::DERIV_EPS;

/// Iteration controls.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NewtonCfg {
    /// Fail once this many iterations have run without reaching `normgoal`.
    pub maxiter: usize,
    /// Damping factor in `(0, 1]` applied to every step.
    pub relax: f64,
    /// Success threshold on `‖f(x)‖`.
    pub normgoal: f64,
    /// Largest acceptable `σ_max / σ_min` of the Jacobian.
    pub maxcond: f64,
}

impl Default for NewtonCfg {
    fn default() -> Self {
        Self {
            maxiter: 500,
            relax: 0.9,
            normgoal: 1e-7,
            maxcond: 1e7,
        }
    }
}

#[derive(Debug, Error)]
pub enum SolverError {
    #[error("condition number {cond:e} exceeded maxcond ({maxcond:e})")]
    IllConditioned { cond: f64, maxcond: f64 },
    #[error("maxiter ({0}) iterations without success")]
    MaxIter(usize),
    #[error("linear algebra failure: {0}")]
    LinearAlgebra(&'static str),
    #[error("aborted by monitor: {0}")]
    Aborted(String),
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),
    #[error("residual evaluation failed")]
    Residual(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// A residual `f: Rⁿ → Rᵏ` and its Jacobian.
pub trait LeastSquaresProblem {
    fn residual(&self, x: &DVector<f64>) -> Result<DVector<f64>, SolverError>;

    /// Jacobian at `x`, given `y = f(x)`. Defaults to forward differences.
    fn jacobian(&self, x: &DVector<f64>, y: &DVector<f64>) -> Result<DMatrix<f64>, SolverError> {
        numjac(|z| self.residual(z), x, y, DERIV_EPS)
    }
}

impl<F> LeastSquaresProblem for F
where
    F: Fn(&DVector<f64>) -> Result<DVector<f64>, SolverError>,
{
    fn residual(&self, x: &DVector<f64>) -> Result<DVector<f64>, SolverError> {
        self(x)
    }
}

/// Residual with a closed-form Jacobian.
pub struct WithJacobian<F, J> {
    pub fun: F,
    pub jac: J,
}

impl<F, J> LeastSquaresProblem for WithJacobian<F, J>
where
    F: Fn(&DVector<f64>) -> Result<DVector<f64>, SolverError>,
    J: Fn(&DVector<f64>) -> Result<DMatrix<f64>, SolverError>,
{
    fn residual(&self, x: &DVector<f64>) -> Result<DVector<f64>, SolverError> {
        (self.fun)(x)
    }
    fn jacobian(&self, x: &DVector<f64>, _y: &DVector<f64>) -> Result<DMatrix<f64>, SolverError> {
        (self.jac)(x)
    }
}

/// Forward-difference Jacobian: one evaluation per coordinate, reusing `y0 = f(x)`.
pub fn numjac<F>(f: F, x: &DVector<f64>, y0: &DVector<f64>, eps: f64) -> Result<DMatrix<f64>, SolverError>
where
    F: Fn(&DVector<f64>) -> Result<DVector<f64>, SolverError>,
{
    let mut j = DMatrix::zeros(y0.len(), x.len());
    let mut xp = x.clone();
    for i in 0..x.len() {
        xp[i] = x[i] + eps;
        let y1 = f(&xp)?;
        xp[i] = x[i];
        if y1.len() != y0.len() {
            return Err(SolverError::DimensionMismatch(format!(
                "residual length changed from {} to {}",
                y0.len(),
                y1.len()
            )));
        }
        j.set_column(i, &((y1 - y0) / eps));
    }
    Ok(j)
}

/// Per-iteration callback `(x, y, ‖y‖)`; returning an error aborts the solve.
pub type Monitor<'a> = &'a mut dyn FnMut(&DVector<f64>, &DVector<f64>, f64) -> Result<(), SolverError>;

/// Monitor that aborts once the residual norm exceeds `limit`.
pub fn abort_above_norm(limit: f64) -> impl FnMut(&DVector<f64>, &DVector<f64>, f64) -> Result<(), SolverError> {
    move |_x, _y, norm| {
        if norm > limit {
            Err(SolverError::Aborted(format!("residual norm {norm:e} above {limit:e}")))
        } else {
            Ok(())
        }
    }
}

/// Result of a successful solve.
#[derive(Clone, Debug)]
pub struct NewtonReport {
    pub x: DVector<f64>,
    /// `‖f(x)‖` at the returned point.
    pub norm: f64,
    /// Newton steps taken.
    pub iterations: usize,
}

/// Damped least-squares Newton iteration from `x0`.
pub fn lsroot<P>(
    problem: &P,
    x0: DVector<f64>,
    cfg: NewtonCfg,
    mut monitor: Option<Monitor<'_>>,
) -> Result<NewtonReport, SolverError>
where
    P: LeastSquaresProblem + ?Sized,
{
    let mut n = 1;
    let mut x = x0;
    loop {
        let y = problem.residual(&x)?;
        let norm = y.norm();
        if norm < cfg.normgoal {
            tracing::debug!(iterations = n - 1, norm, "newton converged");
            return Ok(NewtonReport {
                x,
                norm,
                iterations: n - 1,
            });
        }
        if let Some(m) = monitor.as_mut() {
            m(&x, &y, norm)?;
        }
        let j = problem.jacobian(&x, &y)?;
        if j.nrows() != y.len() || j.ncols() != x.len() {
            return Err(SolverError::DimensionMismatch(format!(
                "jacobian is {}x{}, expected {}x{}",
                j.nrows(),
                j.ncols(),
                y.len(),
                x.len()
            )));
        }
        let svd = j.svd(true, true);
        let s = &svd.singular_values;
        let cond = s.max() / s.min();
        if !(cond <= cfg.maxcond) {
            return Err(SolverError::IllConditioned {
                cond,
                maxcond: cfg.maxcond,
            });
        }
        // Singular values below machine precision count as zero, as in a
        // rank-revealing least-squares solve.
        let rcond = f64::EPSILON * y.len().max(x.len()) as f64 * s.max();
        let v = svd.solve(&y, rcond).map_err(SolverError::LinearAlgebra)?;
        let step = &v * cfg.relax;
        tracing::debug!(iter = n, norm, cond, dx = step.norm(), "newton step");
        x -= step;
        n += 1;
        if n > cfg.maxiter {
            return Err(SolverError::MaxIter(cfg.maxiter));
        }
    }
}
