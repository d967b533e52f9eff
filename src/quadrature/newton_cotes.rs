//! Composite trapezoidal and Simpson rules.

use std::time::Instant;

use super::{
  check_size, ensure_finite, grid, pairwise_sum, sample, Integrand, MAX_SUBINTERVALS,
};
use crate::{Error, Result};

/// Composite trapezoidal rule with `n` equal subintervals.
///
/// ```
/// let estimate = numint::trapezoidal(&|x: f64| x, 0.0, 2.0, 2).unwrap();
/// assert_eq!(estimate, 2.0);
/// ```
pub fn trapezoidal<F: Integrand + ?Sized>(
  f: &F,
  a: f64,
  b: f64,
  n: usize,
) -> Result<f64> {
  check_size("n", n, MAX_SUBINTERVALS)?;
  if a == b {
    return Ok(0.0);
  }

  let started = Instant::now();
  let h = (b - a) / n as f64;
  let y = sample(f, &grid(a, b, n))?;
  let estimate = h * (0.5 * y[0] + pairwise_sum(&y[1..n]) + 0.5 * y[n]);

  tracing::debug!(
    component = "quadrature",
    operation = "trapezoidal",
    a,
    b,
    n,
    evaluations = n + 1,
    estimate,
    duration_ms = started.elapsed().as_secs_f64() * 1000.0,
    "Applied trapezoidal rule"
  );
  ensure_finite(estimate, "trapezoidal")
}

/// Composite Simpson rule; `n` must be even.
///
/// The parameter checks run before the integrand is touched.
pub fn simpsons<F: Integrand + ?Sized>(
  f: &F,
  a: f64,
  b: f64,
  n: usize,
) -> Result<f64> {
  check_size("n", n, MAX_SUBINTERVALS)?;
  if n % 2 != 0 {
    return Err(Error::invalid("n", "must be even"));
  }
  if a == b {
    return Ok(0.0);
  }

  let started = Instant::now();
  let h = (b - a) / n as f64;
  let y = sample(f, &grid(a, b, n))?;
  let odd: Vec<f64> = y[1..n].iter().step_by(2).copied().collect();
  let even: Vec<f64> = y[1..n].iter().skip(1).step_by(2).copied().collect();
  let estimate =
    h / 3.0 * (y[0] + 4.0 * pairwise_sum(&odd) + 2.0 * pairwise_sum(&even) + y[n]);

  tracing::debug!(
    component = "quadrature",
    operation = "simpsons",
    a,
    b,
    n,
    evaluations = n + 1,
    estimate,
    duration_ms = started.elapsed().as_secs_f64() * 1000.0,
    "Applied Simpson's rule"
  );
  ensure_finite(estimate, "simpsons")
}
