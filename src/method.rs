use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;

use crate::quadrature::{
  gaussian_sweep, romberg, simpsons, trapezoidal, GaussianSweep, Integrand,
  RombergTable,
};
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Method {
  #[value(alias = "trapezoid")]
  Trapezoidal,
  #[value(alias = "simpsons")]
  Simpson,
  Romberg,
  #[value(alias = "gauss")]
  Gaussian,
}

impl Method {
  pub const ALL: [Method; 4] = [
    Method::Trapezoidal,
    Method::Simpson,
    Method::Romberg,
    Method::Gaussian,
  ];

  /// Short machine-readable name, as accepted on the command line.
  pub fn name(self) -> &'static str {
    match self {
      Method::Trapezoidal => "trapezoidal",
      Method::Simpson => "simpson",
      Method::Romberg => "romberg",
      Method::Gaussian => "gaussian",
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      Method::Trapezoidal => "Trapezoidal Rule",
      Method::Simpson => "Simpson's Rule",
      Method::Romberg => "Romberg Integration",
      Method::Gaussian => "Gaussian Quadrature",
    }
  }

  /// Run this method with `n` as its single tuning parameter.
  pub fn apply<F: Integrand + ?Sized>(
    self,
    f: &F,
    a: f64,
    b: f64,
    n: usize,
  ) -> Result<Outcome> {
    Ok(match self {
      Method::Trapezoidal | Method::Simpson => {
        let value = if self == Method::Trapezoidal {
          trapezoidal(f, a, b, n)?
        } else {
          simpsons(f, a, b, n)?
        };
        Outcome::Single {
          method: self,
          value,
        }
      }
      Method::Romberg => {
        let (value, table) = romberg(f, a, b, n)?;
        Outcome::Romberg { value, table }
      }
      Method::Gaussian => Outcome::Gaussian {
        sweep: gaussian_sweep(f, a, b, n)?,
      },
    })
  }
}

impl fmt::Display for Method {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

impl FromStr for Method {
  type Err = String;

  fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
    <Method as ValueEnum>::from_str(s.trim(), true)
  }
}

/// What a method produced, with its convergence trace where it has one.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
  Single { method: Method, value: f64 },
  Romberg { value: f64, table: RombergTable },
  Gaussian { sweep: GaussianSweep },
}

impl Outcome {
  pub fn method(&self) -> Method {
    match self {
      Outcome::Single { method, .. } => *method,
      Outcome::Romberg { .. } => Method::Romberg,
      Outcome::Gaussian { .. } => Method::Gaussian,
    }
  }

  /// The reported value: full precision, except for the Gaussian sweep whose
  /// entries are already rounded.
  pub fn value(&self) -> f64 {
    match self {
      Outcome::Single { value, .. } | Outcome::Romberg { value, .. } => *value,
      Outcome::Gaussian { sweep } => sweep.last().1,
    }
  }
}
