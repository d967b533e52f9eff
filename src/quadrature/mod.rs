//! Quadrature rules over a closed interval `[a, b]`.
//!
//! All rules evaluate the integrand through [`Integrand::eval_many`], one
//! batch per rule application, and reject estimates that are not finite.

mod gauss;
mod newton_cotes;
mod romberg;

pub use gauss::{fixed_gauss, gauss_legendre, gaussian_sweep, GaussianSweep};
pub use newton_cotes::{simpsons, trapezoidal};
pub use romberg::{romberg, RombergTable, MAX_ROMBERG_ORDER};

use crate::compile::CompiledFunction;
use crate::{Error, Result};

/// Digits kept in the convergence traces.
pub const TRACE_DIGITS: i32 = 6;

/// Largest subinterval count for the composite rules. Romberg's deepest row
/// (`2^(MAX_ROMBERG_ORDER - 1)` subintervals) stays within it.
pub const MAX_SUBINTERVALS: usize = 1 << 24;

/// Largest Gauss-Legendre order; building the nodes is quadratic in it.
pub const MAX_GAUSS_ORDER: usize = 1024;

/// Something that can be sampled at many abscissae in one call.
pub trait Integrand {
  /// Values at `xs`, in the same order and of the same length.
  fn eval_many(&self, xs: &[f64]) -> Vec<f64>;
}

impl Integrand for CompiledFunction {
  fn eval_many(&self, xs: &[f64]) -> Vec<f64> {
    self.eval(xs)
  }
}

impl<F> Integrand for F
where
  F: Fn(f64) -> f64,
{
  fn eval_many(&self, xs: &[f64]) -> Vec<f64> {
    xs.iter().map(|&x| self(x)).collect()
  }
}

/// Sample `f` and check that it kept its side of the contract.
pub(crate) fn sample<F: Integrand + ?Sized>(
  f: &F,
  xs: &[f64],
) -> Result<Vec<f64>> {
  let ys = f.eval_many(xs);
  if ys.len() != xs.len() {
    return Err(Error::Evaluation(format!(
      "integrand returned {} values for {} points",
      ys.len(),
      xs.len()
    )));
  }
  Ok(ys)
}

/// `n + 1` equally spaced points from `a` to `b`, endpoints included.
pub(crate) fn grid(a: f64, b: f64, n: usize) -> Vec<f64> {
  let h = (b - a) / n as f64;
  let mut xs: Vec<f64> = (0..=n).map(|i| i as f64 * h + a).collect();
  // The last point is pinned so that rounding in `i * h` cannot overshoot.
  xs[n] = b;
  xs
}

/// Reject a size parameter outside `1..=max` before anything is allocated.
pub(crate) fn check_size(
  name: &'static str,
  value: usize,
  max: usize,
) -> Result<()> {
  if value == 0 {
    return Err(Error::invalid(name, "must be at least 1"));
  }
  if value > max {
    return Err(Error::invalid(
      name,
      format!("must be at most {max}, got {value}"),
    ));
  }
  Ok(())
}

pub(crate) fn ensure_finite(value: f64, operation: &'static str) -> Result<f64> {
  if value.is_finite() {
    return Ok(value);
  }
  tracing::warn!(
    component = "quadrature",
    operation,
    status = "non_finite",
    value,
    "Rejected non-finite estimate"
  );
  Err(Error::Evaluation(format!(
    "{operation} estimate is {value}; the integrand is undefined or unbounded on the interval"
  )))
}

/// Round for display, half away from zero.
pub fn round_to(value: f64, digits: i32) -> f64 {
  let factor = 10f64.powi(digits);
  (value * factor).round() / factor
}

const PAIRWISE_BLOCK: usize = 128;

/// Pairwise summation with eight-way unrolled leaves.
///
/// Keeps the rounding error at O(log n) and adds in the same order as the
/// array libraries these rules are usually checked against.
pub fn pairwise_sum(values: &[f64]) -> f64 {
  let n = values.len();
  if n < 8 {
    let mut res = 0.0;
    for v in values {
      res += v;
    }
    res
  } else if n <= PAIRWISE_BLOCK {
    let mut r = [0.0; 8];
    r.copy_from_slice(&values[..8]);
    let whole = n - n % 8;
    for chunk in values[8..whole].chunks_exact(8) {
      for (acc, v) in r.iter_mut().zip(chunk) {
        *acc += v;
      }
    }
    let mut res = ((r[0] + r[1]) + (r[2] + r[3])) + ((r[4] + r[5]) + (r[6] + r[7]));
    for v in &values[whole..] {
      res += v;
    }
    res
  } else {
    let mut half = n / 2;
    half -= half % 8;
    pairwise_sum(&values[..half]) + pairwise_sum(&values[half..])
  }
}
