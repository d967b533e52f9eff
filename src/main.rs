use std::process::ExitCode;

use anyhow::anyhow;
use clap::{Parser, Subcommand};
use numint::compile::evaluate_constant;
use numint::report::{self, format_float, Format};
use numint::{compile, Method, Outcome};

mod logging;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
  #[command(subcommand)]
  command: Commands,

  /// Log filter, e.g. `debug` or `numint=trace`
  #[arg(long, global = true, env = logging::LOG_ENV)]
  log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
  /// Integrate an expression in `x` over [a, b]
  Integrate {
    /// The integrand, e.g. `sin(x)` or `x**2 + 1`
    #[arg(default_value = "sin(x)")]
    expression: String,
    /// Lower limit; constant expressions such as `-pi/2` are accepted
    #[arg(short = 'a', long = "lower", default_value = "0", allow_hyphen_values = true)]
    lower: String,
    /// Upper limit
    #[arg(short = 'b', long = "upper", default_value = "pi", allow_hyphen_values = true)]
    upper: String,
    /// Subintervals (trapezoidal, simpson), table rows (romberg) or highest order (gaussian)
    #[arg(short, default_value_t = 6)]
    n: usize,
    #[arg(short, long, value_enum, default_value_t = Method::Trapezoidal)]
    method: Method,
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
  },
  /// Evaluate an expression in `x` at the given points
  Eval {
    expression: String,
    #[arg(allow_hyphen_values = true, required = true)]
    points: Vec<String>,
  },
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  if let Err(e) = logging::init(cli.log_level.as_deref()) {
    eprintln!("Error: {e:#}");
    return ExitCode::FAILURE;
  }

  match cli.command {
    Commands::Integrate {
      expression,
      lower,
      upper,
      n,
      method,
      format,
    } => match integrate(&expression, &lower, &upper, n, method) {
      Ok(Ok(outcome)) => {
        println!("{}", report::render(&outcome, format));
        ExitCode::SUCCESS
      }
      // Integration failures are part of the report, in the requested format.
      Ok(Err(e)) => {
        match format {
          Format::Text => eprintln!("{}", report::render_error(&e)),
          Format::Json => println!("{}", report::error_to_json(&e)),
        }
        ExitCode::FAILURE
      }
      Err(e) => {
        eprintln!("Error: {e}");
        ExitCode::FAILURE
      }
    },
    Commands::Eval { expression, points } => match eval(&expression, &points) {
      Ok(output) => {
        println!("{output}");
        ExitCode::SUCCESS
      }
      Err(e) => {
        eprintln!("Error: {e}");
        ExitCode::FAILURE
      }
    },
  }
}

fn bound(text: &str, what: &str) -> anyhow::Result<f64> {
  evaluate_constant(text)
    .map_err(|e| anyhow!("invalid {what} `{text}`: {e}"))
}

fn integrate(
  expression: &str,
  lower: &str,
  upper: &str,
  n: usize,
  method: Method,
) -> anyhow::Result<numint::Result<Outcome>> {
  let a = bound(lower, "lower limit")?;
  let b = bound(upper, "upper limit")?;
  Ok(numint::integrate(expression, a, b, n, method))
}

fn eval(expression: &str, points: &[String]) -> anyhow::Result<String> {
  let f = compile(expression)?;
  let xs = points
    .iter()
    .map(|p| bound(p, "point"))
    .collect::<anyhow::Result<Vec<f64>>>()?;
  let ys = f.eval(&xs);
  let lines: Vec<String> = xs
    .iter()
    .zip(&ys)
    .map(|(x, y)| format!("f({}) = {}", format_float(*x), format_float(*y)))
    .collect();
  Ok(lines.join("\n"))
}
