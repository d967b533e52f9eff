//! Expression compiler.
//!
//! Turns integrand text into a [`CompiledFunction`] that evaluates a whole
//! slice of abscissae at once. Every node of the compiled tree produces a full
//! column of values, so the cost of walking the tree is paid once per call and
//! not once per point.

use std::f64::consts::{E, PI};
use std::fmt;

use crate::syntax::{self, BinaryOperator, Expr};
use crate::{parse, Error, ParseError};

/// Name of the free variable used by [`compile`].
pub const VARIABLE: &str = "x";

/// Elementary functions of one argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
  Sin,
  Cos,
  Tan,
  Cot,
  Sec,
  Csc,
  Asin,
  Acos,
  Atan,
  Sinh,
  Cosh,
  Tanh,
  Asinh,
  Acosh,
  Atanh,
  Exp,
  Log,
  Sqrt,
  Abs,
  Sign,
  Floor,
  Ceiling,
}

impl Function {
  pub fn lookup(name: &str) -> Option<Self> {
    let function = match name {
      "sin" => Self::Sin,
      "cos" => Self::Cos,
      "tan" => Self::Tan,
      "cot" => Self::Cot,
      "sec" => Self::Sec,
      "csc" => Self::Csc,
      "asin" => Self::Asin,
      "acos" => Self::Acos,
      "atan" => Self::Atan,
      "sinh" => Self::Sinh,
      "cosh" => Self::Cosh,
      "tanh" => Self::Tanh,
      "asinh" => Self::Asinh,
      "acosh" => Self::Acosh,
      "atanh" => Self::Atanh,
      "exp" => Self::Exp,
      "log" | "ln" => Self::Log,
      "sqrt" => Self::Sqrt,
      "abs" | "Abs" => Self::Abs,
      "sign" => Self::Sign,
      "floor" => Self::Floor,
      "ceiling" => Self::Ceiling,
      _ => return None,
    };
    Some(function)
  }

  pub fn apply(self, v: f64) -> f64 {
    match self {
      Self::Sin => v.sin(),
      Self::Cos => v.cos(),
      Self::Tan => v.tan(),
      Self::Cot => 1.0 / v.tan(),
      Self::Sec => 1.0 / v.cos(),
      Self::Csc => 1.0 / v.sin(),
      Self::Asin => v.asin(),
      Self::Acos => v.acos(),
      Self::Atan => v.atan(),
      Self::Sinh => v.sinh(),
      Self::Cosh => v.cosh(),
      Self::Tanh => v.tanh(),
      Self::Asinh => v.asinh(),
      Self::Acosh => v.acosh(),
      Self::Atanh => v.atanh(),
      Self::Exp => v.exp(),
      Self::Log => v.ln(),
      Self::Sqrt => v.sqrt(),
      Self::Abs => v.abs(),
      // sign(0) is 0, unlike f64::signum
      Self::Sign => {
        if v == 0.0 || v.is_nan() {
          v
        } else {
          v.signum()
        }
      }
      Self::Floor => v.floor(),
      Self::Ceiling => v.ceil(),
    }
  }
}

/// Functions of two arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dyadic {
  /// `log(x, base)`
  LogBase,
  /// `atan2(y, x)`
  Atan2,
}

impl Dyadic {
  fn apply(self, l: f64, r: f64) -> f64 {
    match self {
      Self::LogBase => l.ln() / r.ln(),
      Self::Atan2 => l.atan2(r),
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
  Const(f64),
  Var,
  Neg(Box<Node>),
  Binary(BinaryOperator, Box<Node>, Box<Node>),
  Powi(Box<Node>, i32),
  Call(Function, Box<Node>),
  Call2(Dyadic, Box<Node>, Box<Node>),
}

fn binary(op: BinaryOperator, l: f64, r: f64) -> f64 {
  match op {
    BinaryOperator::Plus => l + r,
    BinaryOperator::Minus => l - r,
    BinaryOperator::Times => l * r,
    BinaryOperator::Divide => l / r,
    BinaryOperator::Power => l.powf(r),
  }
}

/// Intermediate result of evaluating a node over a slice.
///
/// Constant subtrees stay scalar and are broadcast only when they meet a
/// column.
enum Column {
  Scalar(f64),
  Vector(Vec<f64>),
}

impl Column {
  fn map(self, f: impl Fn(f64) -> f64) -> Column {
    match self {
      Column::Scalar(v) => Column::Scalar(f(v)),
      Column::Vector(mut values) => {
        values.iter_mut().for_each(|v| *v = f(*v));
        Column::Vector(values)
      }
    }
  }

  fn zip(self, other: Column, f: impl Fn(f64, f64) -> f64) -> Column {
    match (self, other) {
      (Column::Scalar(l), Column::Scalar(r)) => Column::Scalar(f(l, r)),
      (Column::Vector(mut l), Column::Scalar(r)) => {
        l.iter_mut().for_each(|v| *v = f(*v, r));
        Column::Vector(l)
      }
      (Column::Scalar(l), Column::Vector(mut r)) => {
        r.iter_mut().for_each(|v| *v = f(l, *v));
        Column::Vector(r)
      }
      (Column::Vector(mut l), Column::Vector(r)) => {
        l.iter_mut().zip(r).for_each(|(a, b)| *a = f(*a, b));
        Column::Vector(l)
      }
    }
  }

  fn into_vec(self, len: usize) -> Vec<f64> {
    match self {
      Column::Scalar(v) => vec![v; len],
      Column::Vector(values) => values,
    }
  }
}

impl Node {
  fn eval(&self, xs: &[f64]) -> Column {
    match self {
      Node::Const(c) => Column::Scalar(*c),
      Node::Var => Column::Vector(xs.to_vec()),
      Node::Neg(inner) => inner.eval(xs).map(|v| -v),
      Node::Binary(op, l, r) => {
        let op = *op;
        l.eval(xs).zip(r.eval(xs), |a, b| binary(op, a, b))
      }
      Node::Powi(base, exp) => {
        let exp = *exp;
        base.eval(xs).map(|v| v.powi(exp))
      }
      Node::Call(function, arg) => {
        let function = *function;
        arg.eval(xs).map(|v| function.apply(v))
      }
      Node::Call2(dyadic, l, r) => {
        let dyadic = *dyadic;
        l.eval(xs).zip(r.eval(xs), |a, b| dyadic.apply(a, b))
      }
    }
  }

  fn as_const(&self) -> Option<f64> {
    match self {
      Node::Const(c) => Some(*c),
      _ => None,
    }
  }
}

/// Scoped compilation context: resolves names against one free variable.
struct Compiler<'a> {
  variable: &'a str,
}

impl Compiler<'_> {
  fn compile_expr(&self, expr: &Expr) -> Result<Node, ParseError> {
    match expr {
      Expr::Number(n) => Ok(Node::Const(*n)),
      Expr::Identifier(name) => self.resolve_symbol(name),
      Expr::Negate(inner) => {
        let inner = self.compile_expr(inner)?;
        Ok(match inner.as_const() {
          Some(c) => Node::Const(-c),
          None => Node::Neg(Box::new(inner)),
        })
      }
      Expr::BinaryOp { op, left, right } => {
        let left = self.compile_expr(left)?;
        let right = self.compile_expr(right)?;
        Ok(fold_binary(*op, left, right))
      }
      Expr::FunctionCall { name, args } => self.compile_call(name, args),
    }
  }

  fn resolve_symbol(&self, name: &str) -> Result<Node, ParseError> {
    if name == self.variable {
      return Ok(Node::Var);
    }
    match name {
      "pi" => Ok(Node::Const(PI)),
      "E" => Ok(Node::Const(E)),
      _ => Err(ParseError::UnknownSymbol {
        name: name.to_string(),
        variable: self.variable.to_string(),
      }),
    }
  }

  fn compile_call(&self, name: &str, args: &[Expr]) -> Result<Node, ParseError> {
    let compiled = args
      .iter()
      .map(|arg| self.compile_expr(arg))
      .collect::<Result<Vec<_>, _>>()?;
    let arity_error = |expected: &'static str, got: usize| ParseError::Arity {
      name: name.to_string(),
      expected,
      got,
    };

    let dyadic = match name {
      "log" if compiled.len() == 2 => Some(Dyadic::LogBase),
      "atan2" => Some(Dyadic::Atan2),
      _ => None,
    };

    if let Some(dyadic) = dyadic {
      let [left, right]: [Node; 2] = compiled
        .try_into()
        .map_err(|args: Vec<Node>| arity_error("2", args.len()))?;
      return Ok(match (left.as_const(), right.as_const()) {
        (Some(l), Some(r)) => Node::Const(dyadic.apply(l, r)),
        _ => Node::Call2(dyadic, Box::new(left), Box::new(right)),
      });
    }

    let function = Function::lookup(name)
      .ok_or_else(|| ParseError::UnknownFunction(name.to_string()))?;
    let expected = if function == Function::Log { "1 or 2" } else { "1" };
    let [arg]: [Node; 1] = compiled
      .try_into()
      .map_err(|args: Vec<Node>| arity_error(expected, args.len()))?;
    Ok(match arg.as_const() {
      Some(c) => Node::Const(function.apply(c)),
      None => Node::Call(function, Box::new(arg)),
    })
  }
}

fn fold_binary(op: BinaryOperator, left: Node, right: Node) -> Node {
  match (left.as_const(), right.as_const()) {
    (Some(l), Some(r)) => Node::Const(binary(op, l, r)),
    (_, Some(r))
      if op == BinaryOperator::Power
        && r.fract() == 0.0
        && r.abs() <= i32::MAX as f64 =>
    {
      Node::Powi(Box::new(left), r as i32)
    }
    _ => Node::Binary(op, Box::new(left), Box::new(right)),
  }
}

/// A real function of one variable, ready for vectorized evaluation.
#[derive(Debug, Clone)]
pub struct CompiledFunction {
  source: String,
  expr: Expr,
  root: Node,
}

impl CompiledFunction {
  /// Evaluate at every point of `xs`; the output is aligned with the input.
  ///
  /// Domain errors are not reported here: `log(-1.0)` yields NaN and `1/0`
  /// yields infinity, exactly as the underlying floating point kernels do.
  pub fn eval(&self, xs: &[f64]) -> Vec<f64> {
    self.root.eval(xs).into_vec(xs.len())
  }

  pub fn eval_scalar(&self, x: f64) -> f64 {
    match self.root.eval(&[x]) {
      Column::Scalar(v) => v,
      Column::Vector(values) => values.first().copied().unwrap_or(f64::NAN),
    }
  }

  /// The folded value when the expression does not depend on the variable.
  pub fn constant_value(&self) -> Option<f64> {
    self.root.as_const()
  }

  pub fn source(&self) -> &str {
    &self.source
  }

  pub fn expr(&self) -> &Expr {
    &self.expr
  }
}

impl fmt::Display for CompiledFunction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.expr)
  }
}

/// Compile `input` as a function of `x`.
pub fn compile(input: &str) -> Result<CompiledFunction, Error> {
  compile_in(input, VARIABLE)
}

/// Compile `input` as a function of `variable`.
pub fn compile_in(input: &str, variable: &str) -> Result<CompiledFunction, Error> {
  let trimmed = input.trim();
  if trimmed.is_empty() {
    return Err(ParseError::Empty.into());
  }

  let mut pairs = parse(trimmed).map_err(ParseError::from)?;
  let program = pairs.next().ok_or(ParseError::Empty)?;
  let mut exprs = syntax::program_to_exprs(program)?;
  if exprs.len() != 1 {
    return Err(ParseError::NonScalar(exprs.len()).into());
  }
  let expr = exprs.remove(0);

  let root = Compiler { variable }.compile_expr(&expr)?;
  tracing::trace!(
    component = "compile",
    source = trimmed,
    constant = root.as_const().is_some(),
    "Compiled expression"
  );

  Ok(CompiledFunction {
    source: trimmed.to_string(),
    expr,
    root,
  })
}

/// Evaluate a closed expression such as `pi/2` to a number.
pub fn evaluate_constant(input: &str) -> Result<f64, Error> {
  let compiled = compile(input)?;
  compiled
    .constant_value()
    .ok_or_else(|| ParseError::NotConstant(VARIABLE.to_string()).into())
}
