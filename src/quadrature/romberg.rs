//! Romberg integration: Richardson extrapolation of trapezoidal estimates.

use std::time::Instant;

use super::{ensure_finite, round_to, trapezoidal, Integrand, TRACE_DIGITS};
use crate::{Error, Result};

/// Largest accepted table order. The last row of an order-`k` table samples
/// the integrand at `2^(k-1) + 1` points.
pub const MAX_ROMBERG_ORDER: usize = 25;

/// Lower-triangular Romberg table; row `k` holds `k + 1` entries.
///
/// `R[k][0]` is the trapezoidal estimate with `2^k` subintervals and
/// `R[k][j]` extrapolates `R[k][j-1]` against `R[k-1][j-1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct RombergTable {
  rows: Vec<Vec<f64>>,
}

impl RombergTable {
  pub fn order(&self) -> usize {
    self.rows.len()
  }

  pub fn rows(&self) -> &[Vec<f64>] {
    &self.rows
  }

  pub fn get(&self, k: usize, j: usize) -> Option<f64> {
    self.rows.get(k)?.get(j).copied()
  }

  /// The most refined entry, `R[order-1][order-1]`.
  pub fn final_estimate(&self) -> f64 {
    self
      .rows
      .last()
      .and_then(|row| row.last())
      .copied()
      .unwrap_or(0.0)
  }

  /// Rows rounded to six decimals, for display.
  pub fn rounded_rows(&self) -> Vec<Vec<f64>> {
    self
      .rows
      .iter()
      .map(|row| row.iter().map(|&v| round_to(v, TRACE_DIGITS)).collect())
      .collect()
  }
}

/// Build a `max_order`-row Romberg table and return its corner entry.
///
/// The returned estimate is full precision; only [`RombergTable::rounded_rows`]
/// rounds.
pub fn romberg<F: Integrand + ?Sized>(
  f: &F,
  a: f64,
  b: f64,
  max_order: usize,
) -> Result<(f64, RombergTable)> {
  if max_order == 0 {
    return Err(Error::invalid("max_order", "must be at least 1"));
  }
  if max_order > MAX_ROMBERG_ORDER {
    return Err(Error::invalid(
      "max_order",
      format!(
        "must be at most {MAX_ROMBERG_ORDER} (the last row would need 2^{} + 1 evaluations)",
        max_order - 1
      ),
    ));
  }

  let started = Instant::now();
  let mut rows: Vec<Vec<f64>> = Vec::with_capacity(max_order);
  for k in 0..max_order {
    let mut row = Vec::with_capacity(k + 1);
    row.push(trapezoidal(f, a, b, 1 << k)?);
    if let Some(prev) = rows.last() {
      for j in 1..=k {
        let factor = 4f64.powi(j as i32);
        row.push((factor * row[j - 1] - prev[j - 1]) / (factor - 1.0));
      }
    }
    tracing::trace!(
      component = "quadrature",
      operation = "romberg",
      row = k,
      subintervals = 1u64 << k,
      best = row[k],
      "Extended Romberg table"
    );
    rows.push(row);
  }

  let table = RombergTable { rows };
  let estimate = ensure_finite(table.final_estimate(), "romberg")?;
  tracing::debug!(
    component = "quadrature",
    operation = "romberg",
    a,
    b,
    max_order,
    estimate,
    duration_ms = started.elapsed().as_secs_f64() * 1000.0,
    "Built Romberg table"
  );
  Ok((estimate, table))
}
