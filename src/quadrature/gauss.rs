//! Fixed-order Gauss-Legendre quadrature and the order sweep built on it.

use std::f64::consts::PI;
use std::time::Instant;

use super::{
  check_size, ensure_finite, pairwise_sum, round_to, sample, Integrand, MAX_GAUSS_ORDER,
  TRACE_DIGITS,
};
use crate::Result;

const NEWTON_TOLERANCE: f64 = 1e-15;
const NEWTON_MAX_ITERATIONS: usize = 100;

/// Estimates of a Gauss-Legendre sweep, ordered by increasing order.
///
/// Each estimate is rounded to six decimals. A sweep always holds at least
/// one entry.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianSweep {
  entries: Vec<(usize, f64)>,
}

impl GaussianSweep {
  pub fn entries(&self) -> &[(usize, f64)] {
    &self.entries
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// The highest-order entry, which callers report as the result.
  pub fn last(&self) -> (usize, f64) {
    self.entries[self.entries.len() - 1]
  }

  pub fn iter(&self) -> impl Iterator<Item = &(usize, f64)> {
    self.entries.iter()
  }
}

/// Nodes and weights of the `n`-point Gauss-Legendre rule on `[-1, 1]`.
///
/// Nodes are returned in increasing order. The nodes are the roots of the
/// Legendre polynomial `P_n`, found by Newton iteration from a Chebyshev-like
/// first guess; both halves are filled from the positive roots by symmetry.
pub fn gauss_legendre(n: usize) -> (Vec<f64>, Vec<f64>) {
  let mut nodes = vec![0.0; n];
  let mut weights = vec![0.0; n];

  for i in 0..n.div_ceil(2) {
    let mut z = ((i as f64 + 0.75) / (n as f64 + 0.5) * PI).cos();
    for _ in 0..NEWTON_MAX_ITERATIONS {
      let (p, dp) = legendre_p_and_dp(n, z);
      let next = z - p / dp;
      let done = (next - z).abs() <= NEWTON_TOLERANCE;
      z = next;
      if done {
        break;
      }
    }

    let (_, dp) = legendre_p_and_dp(n, z);
    let w = 2.0 / ((1.0 - z * z) * dp * dp);

    nodes[i] = -z;
    nodes[n - 1 - i] = z;
    weights[i] = w;
    weights[n - 1 - i] = w;
  }

  (nodes, weights)
}

/// `P_n(x)` and `P_n'(x)` by the three-term recurrence.
fn legendre_p_and_dp(n: usize, x: f64) -> (f64, f64) {
  if n == 0 {
    return (1.0, 0.0);
  }
  if n == 1 {
    return (x, 1.0);
  }

  let mut p_prev = 1.0;
  let mut p_curr = x;
  for k in 2..=n {
    let p_next =
      ((2 * k - 1) as f64 * x * p_curr - (k - 1) as f64 * p_prev) / k as f64;
    p_prev = p_curr;
    p_curr = p_next;
  }

  let dp = n as f64 * (x * p_curr - p_prev) / (x * x - 1.0);
  (p_curr, dp)
}

/// `n`-point Gauss-Legendre estimate over `[a, b]`, full precision.
///
/// Exact (up to rounding) for polynomials of degree `2n - 1` or less.
pub fn fixed_gauss<F: Integrand + ?Sized>(
  f: &F,
  a: f64,
  b: f64,
  n: usize,
) -> Result<f64> {
  check_size("n", n, MAX_GAUSS_ORDER)?;
  if a == b {
    return Ok(0.0);
  }

  let (nodes, weights) = gauss_legendre(n);
  let xs: Vec<f64> = nodes.iter().map(|&t| (b - a) * (t + 1.0) / 2.0 + a).collect();
  let ys = sample(f, &xs)?;
  let weighted: Vec<f64> = weights.iter().zip(&ys).map(|(w, y)| w * y).collect();
  let estimate = (b - a) / 2.0 * pairwise_sum(&weighted);
  ensure_finite(estimate, "gaussian")
}

/// Gauss-Legendre estimates for every order from 1 to `max_n`.
pub fn gaussian_sweep<F: Integrand + ?Sized>(
  f: &F,
  a: f64,
  b: f64,
  max_n: usize,
) -> Result<GaussianSweep> {
  check_size("max_n", max_n, MAX_GAUSS_ORDER)?;

  let started = Instant::now();
  let mut entries = Vec::with_capacity(max_n);
  for order in 1..=max_n {
    let estimate = fixed_gauss(f, a, b, order)?;
    tracing::trace!(
      component = "quadrature",
      operation = "gaussian_sweep",
      order,
      estimate,
      "Computed Gauss-Legendre estimate"
    );
    entries.push((order, round_to(estimate, TRACE_DIGITS)));
  }

  tracing::debug!(
    component = "quadrature",
    operation = "gaussian_sweep",
    a,
    b,
    max_n,
    evaluations = max_n.saturating_mul(max_n + 1) / 2,
    duration_ms = started.elapsed().as_secs_f64() * 1000.0,
    "Finished Gauss-Legendre sweep"
  );
  Ok(GaussianSweep { entries })
}
