use pest::Parser;
use pest_derive::Parser;
use thiserror::Error;

pub mod compile;
pub mod method;
pub mod quadrature;
pub mod report;
pub mod syntax;

pub use compile::{compile, CompiledFunction};
pub use method::{Method, Outcome};
pub use quadrature::{
  fixed_gauss, gaussian_sweep, romberg, simpsons, trapezoidal, GaussianSweep,
  Integrand, RombergTable,
};

#[derive(Parser)]
#[grammar = "expression.pest"]
pub struct ExpressionParser;

/// Why an expression could not be turned into a function of `x`.
#[derive(Error, Debug, Clone)]
pub enum ParseError {
  #[error("{0}")]
  Syntax(#[from] Box<pest::error::Error<Rule>>),
  #[error("empty expression")]
  Empty,
  #[error("unknown symbol `{name}` (the variable is `{variable}`)")]
  UnknownSymbol { name: String, variable: String },
  #[error("unknown function `{0}`")]
  UnknownFunction(String),
  #[error("`{name}` takes {expected} argument(s), got {got}")]
  Arity {
    name: String,
    expected: &'static str,
    got: usize,
  },
  #[error("expression has {0} components, expected a single scalar")]
  NonScalar(usize),
  #[error("expression depends on `{0}`, expected a constant")]
  NotConstant(String),
  #[error("malformed syntax tree: {0}")]
  Malformed(String),
}

#[derive(Error, Debug, Clone)]
pub enum Error {
  #[error("Parse error: {0}")]
  Parse(#[from] ParseError),
  #[error("{name} {reason}")]
  InvalidParameter { name: &'static str, reason: String },
  #[error("Evaluation error: {0}")]
  Evaluation(String),
}

impl Error {
  pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
    Error::InvalidParameter {
      name,
      reason: reason.into(),
    }
  }
}

pub type Result<T> = std::result::Result<T, Error>;

impl ExpressionParser {
  pub fn parse_expression(
    input: &str,
  ) -> std::result::Result<pest::iterators::Pairs<'_, Rule>, Box<pest::error::Error<Rule>>>
  {
    Self::parse(Rule::Program, input).map_err(Box::new)
  }
}

pub fn parse(
  input: &str,
) -> std::result::Result<pest::iterators::Pairs<'_, Rule>, Box<pest::error::Error<Rule>>>
{
  ExpressionParser::parse_expression(input)
}

/// Compile `expression` once and integrate it over `[a, b]` with `method`.
///
/// `n` is the subinterval count for the Newton-Cotes rules, the number of
/// Romberg rows, and the highest Gauss-Legendre order of the sweep.
pub fn integrate(
  expression: &str,
  a: f64,
  b: f64,
  n: usize,
  method: Method,
) -> Result<Outcome> {
  let f = compile(expression)?;
  method.apply(&f, a, b, n)
}
