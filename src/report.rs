//! Human and machine readable renderings of an [`Outcome`].

use clap::ValueEnum;
use serde_json::{json, Value};

use crate::method::{Method, Outcome};
use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
  #[default]
  Text,
  Json,
}

pub fn render(outcome: &Outcome, format: Format) -> String {
  match format {
    Format::Text => render_text(outcome),
    Format::Json => to_json(outcome).to_string(),
  }
}

/// Result line followed by the convergence trace, one entry per line.
pub fn render_text(outcome: &Outcome) -> String {
  match outcome {
    Outcome::Single { method, value } => format!("{} Result: {value:.6}", method.label()),
    Outcome::Romberg { value, table } => {
      let mut lines = vec![
        format!("Romberg Final Result: {value:.6}"),
        "Romberg Table:".to_string(),
      ];
      for (k, row) in table.rounded_rows().iter().enumerate() {
        lines.push(format!("R[{k}]: {}", format_list(row)));
      }
      lines.join("\n")
    }
    Outcome::Gaussian { sweep } => {
      let (order, value) = sweep.last();
      let mut lines = vec![
        format!(
          "{} (n={order}) Result: {}",
          Method::Gaussian.label(),
          format_float(value)
        ),
        "All Iterations:".to_string(),
      ];
      for (n, value) in sweep.iter() {
        lines.push(format!("n = {n} → {}", format_float(*value)));
      }
      lines.join("\n")
    }
  }
}

pub fn render_error(error: &Error) -> String {
  match error {
    Error::Parse(cause) => format!("Invalid function: {cause}"),
    other => format!("Error: {other}"),
  }
}

pub fn to_json(outcome: &Outcome) -> Value {
  let method = outcome.method();
  let mut report = json!({
    "method": method.name(),
    "label": method.label(),
    "result": outcome.value(),
  });
  match outcome {
    Outcome::Single { .. } => {}
    Outcome::Romberg { table, .. } => {
      report["table"] = json!(table.rounded_rows());
    }
    Outcome::Gaussian { sweep } => {
      let iterations: Vec<Value> = sweep
        .iter()
        .map(|(n, value)| json!({ "n": n, "result": value }))
        .collect();
      report["iterations"] = Value::Array(iterations);
    }
  }
  report
}

pub fn error_to_json(error: &Error) -> Value {
  let kind = match error {
    Error::Parse(_) => "parse",
    Error::InvalidParameter { .. } => "invalid_parameter",
    Error::Evaluation(_) => "evaluation",
  };
  json!({ "error": kind, "message": error.to_string() })
}

fn format_list(values: &[f64]) -> String {
  let items: Vec<String> = values.iter().map(|v| format_float(*v)).collect();
  format!("[{}]", items.join(", "))
}

/// Shortest round-trip representation that always reads as a float:
/// `2.0`, `0.333333`, `1e-07`, `1.5e+16`.
pub fn format_float(value: f64) -> String {
  if value.is_nan() {
    return "nan".to_string();
  }
  if value.is_infinite() {
    return (if value > 0.0 { "inf" } else { "-inf" }).to_string();
  }
  if value == 0.0 {
    return (if value.is_sign_negative() { "-0.0" } else { "0.0" }).to_string();
  }

  let scientific = format!("{value:e}");
  let (mantissa, exponent) = match scientific.split_once('e') {
    Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
    None => (scientific.as_str(), 0),
  };

  if (-4..16).contains(&exponent) {
    let plain = value.to_string();
    if plain.contains('.') {
      plain
    } else {
      format!("{plain}.0")
    }
  } else {
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{mantissa}e{sign}{:02}", exponent.abs())
  }
}
