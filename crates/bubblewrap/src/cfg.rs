//! Numeric defaults (internal).
//!
//! Policy
//! - Fixed constants rather than knobs; the public `*Cfg` structs default to
//!   these so call sites never repeat literals.

/// Imaginary part of the `c` entry below which a circle is treated as a line.
pub(crate) const LINE_EPS: f64 = 1e-8;
/// Forward-difference step for numeric Jacobians.
pub(crate) const DERIV_EPS: f64 = 1e-12;
/// Weight of the trace-reality rows in the packing residual.
pub(crate) const TRACE_WEIGHT: f64 = 1000.0;
/// Residual norm above which a packing solve is abandoned.
pub(crate) const DIVERGENCE_NORM: f64 = 1e7;
