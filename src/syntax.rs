use pest::iterators::{Pair, Pairs};
use std::fmt;

use crate::{ParseError, Rule};

/// Parsed integrand, before name resolution.
///
/// Identifiers are kept as plain strings here; whether `y` or `foo(x)` mean
/// anything is decided by the compiler.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
  Number(f64),
  Identifier(String),
  Negate(Box<Expr>),
  BinaryOp {
    op: BinaryOperator,
    left: Box<Expr>,
    right: Box<Expr>,
  },
  FunctionCall {
    name: String,
    args: Vec<Expr>,
  },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
  Plus,
  Minus,
  Times,
  Divide,
  Power,
}

impl BinaryOperator {
  fn from_symbol(symbol: &str) -> Option<Self> {
    match symbol {
      "+" => Some(Self::Plus),
      "-" => Some(Self::Minus),
      "*" => Some(Self::Times),
      "/" => Some(Self::Divide),
      "**" | "^" => Some(Self::Power),
      _ => None,
    }
  }

  pub fn symbol(self) -> &'static str {
    match self {
      Self::Plus => "+",
      Self::Minus => "-",
      Self::Times => "*",
      Self::Divide => "/",
      Self::Power => "**",
    }
  }

  fn precedence(self) -> u8 {
    match self {
      Self::Plus | Self::Minus => 1,
      Self::Times | Self::Divide => 2,
      Self::Power => 4,
    }
  }
}

const NEGATE_PRECEDENCE: u8 = 3;
const ATOM_PRECEDENCE: u8 = 5;

impl Expr {
  fn precedence(&self) -> u8 {
    match self {
      Expr::BinaryOp { op, .. } => op.precedence(),
      Expr::Negate(_) => NEGATE_PRECEDENCE,
      Expr::Number(n) if *n < 0.0 => NEGATE_PRECEDENCE,
      _ => ATOM_PRECEDENCE,
    }
  }

  /// Returns true if `name` occurs anywhere as a bare identifier.
  pub fn mentions(&self, name: &str) -> bool {
    match self {
      Expr::Number(_) => false,
      Expr::Identifier(id) => id == name,
      Expr::Negate(inner) => inner.mentions(name),
      Expr::BinaryOp { left, right, .. } => {
        left.mentions(name) || right.mentions(name)
      }
      Expr::FunctionCall { args, .. } => args.iter().any(|a| a.mentions(name)),
    }
  }
}

impl fmt::Display for Expr {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Expr::Number(n) => write!(f, "{n}"),
      Expr::Identifier(name) => f.write_str(name),
      Expr::Negate(inner) => {
        if inner.precedence() <= NEGATE_PRECEDENCE {
          write!(f, "-({inner})")
        } else {
          write!(f, "-{inner}")
        }
      }
      Expr::BinaryOp { op, left, right } => {
        let prec = op.precedence();
        // Power is right-associative, everything else associates left.
        let (left_paren, right_paren) = if *op == BinaryOperator::Power {
          (left.precedence() <= prec, right.precedence() < prec)
        } else {
          (left.precedence() < prec, right.precedence() <= prec)
        };
        write_operand(f, left, left_paren)?;
        write!(f, " {} ", op.symbol())?;
        write_operand(f, right, right_paren)
      }
      Expr::FunctionCall { name, args } => {
        write!(f, "{name}(")?;
        for (i, arg) in args.iter().enumerate() {
          if i > 0 {
            f.write_str(", ")?;
          }
          write!(f, "{arg}")?;
        }
        f.write_str(")")
      }
    }
  }
}

fn write_operand(
  f: &mut fmt::Formatter<'_>,
  expr: &Expr,
  parenthesize: bool,
) -> fmt::Result {
  if parenthesize {
    write!(f, "({expr})")
  } else {
    write!(f, "{expr}")
  }
}

/// Convert the top-level `Program` pair into its component expressions.
///
/// More than one component means the input was a tuple like `x, 2`.
pub fn program_to_exprs(program: Pair<Rule>) -> Result<Vec<Expr>, ParseError> {
  program
    .into_inner()
    .filter(|pair| pair.as_rule() == Rule::Expression)
    .map(pair_to_expr)
    .collect()
}

pub fn pair_to_expr(pair: Pair<Rule>) -> Result<Expr, ParseError> {
  match pair.as_rule() {
    Rule::Expression | Rule::Term => {
      let mut inner = pair.into_inner();
      let mut acc = pair_to_expr(next_pair(&mut inner, "operand")?)?;
      while let Some(op_pair) = inner.next() {
        let op = operator(&op_pair)?;
        let rhs = pair_to_expr(next_pair(&mut inner, "right operand")?)?;
        acc = Expr::BinaryOp {
          op,
          left: Box::new(acc),
          right: Box::new(rhs),
        };
      }
      Ok(acc)
    }
    Rule::Unary => {
      let mut inner = pair.into_inner();
      let first = next_pair(&mut inner, "operand")?;
      if first.as_rule() != Rule::Sign {
        return pair_to_expr(first);
      }
      let operand = pair_to_expr(next_pair(&mut inner, "signed operand")?)?;
      Ok(match (first.as_str(), operand) {
        ("+", operand) => operand,
        (_, Expr::Number(n)) => Expr::Number(-n),
        (_, operand) => Expr::Negate(Box::new(operand)),
      })
    }
    Rule::Power => {
      let mut inner = pair.into_inner();
      let base = pair_to_expr(next_pair(&mut inner, "base")?)?;
      match inner.next() {
        Some(op_pair) => {
          let op = operator(&op_pair)?;
          let exponent = pair_to_expr(next_pair(&mut inner, "exponent")?)?;
          Ok(Expr::BinaryOp {
            op,
            left: Box::new(base),
            right: Box::new(exponent),
          })
        }
        None => Ok(base),
      }
    }
    Rule::FunctionCall => {
      let mut inner = pair.into_inner();
      let name = next_pair(&mut inner, "function name")?.as_str().to_string();
      let args = inner.map(pair_to_expr).collect::<Result<Vec<_>, _>>()?;
      Ok(Expr::FunctionCall { name, args })
    }
    Rule::Identifier => Ok(Expr::Identifier(pair.as_str().to_string())),
    Rule::Number => pair
      .as_str()
      .parse::<f64>()
      .map(Expr::Number)
      .map_err(|_| ParseError::Malformed(format!("bad number `{}`", pair.as_str()))),
    other => Err(ParseError::Malformed(format!("unexpected {other:?}"))),
  }
}

fn next_pair<'i>(
  pairs: &mut Pairs<'i, Rule>,
  what: &str,
) -> Result<Pair<'i, Rule>, ParseError> {
  pairs
    .next()
    .ok_or_else(|| ParseError::Malformed(format!("missing {what}")))
}

fn operator(pair: &Pair<Rule>) -> Result<BinaryOperator, ParseError> {
  BinaryOperator::from_symbol(pair.as_str()).ok_or_else(|| {
    ParseError::Malformed(format!("unknown operator `{}`", pair.as_str()))
  })
}
