use super::*;
use numint::quadrature::{round_to, MAX_ROMBERG_ORDER};
use numint::{romberg, trapezoidal};
use std::f64::consts::PI;

mod table {
  use super::*;

  #[test]
  fn rows_are_triangular() {
    let (_, table) = romberg(&f("exp(-x**2)"), -1.0, 1.5, 6).unwrap();
    assert_eq!(table.order(), 6);
    for (k, row) in table.rows().iter().enumerate() {
      assert_eq!(row.len(), k + 1, "row {k}");
    }
  }

  #[test]
  fn first_column_is_the_trapezoid_rule() {
    let g = f("1 / (1 + x**2)");
    let (_, table) = romberg(&g, 0.0, 2.0, 5).unwrap();
    for k in 0..5 {
      let expected = trapezoidal(&g, 0.0, 2.0, 1 << k).unwrap();
      assert_eq!(table.get(k, 0), Some(expected), "row {k}");
    }
  }

  #[test]
  fn entries_follow_richardson_extrapolation() {
    let (_, table) = romberg(&f("cos(x)"), 0.0, 1.0, 4).unwrap();
    for k in 1..4 {
      for j in 1..=k {
        let factor = 4f64.powi(j as i32);
        let expected = (factor * table.get(k, j - 1).unwrap()
          - table.get(k - 1, j - 1).unwrap())
          / (factor - 1.0);
        assert_eq!(table.get(k, j), Some(expected), "R[{k}][{j}]");
      }
    }
  }

  #[test]
  fn trace_is_rounded_but_result_is_not() {
    let (value, table) = romberg(&f("exp(x)"), 0.0, 1.0, 3).unwrap();
    assert_eq!(value, table.final_estimate());
    assert_ne!(value, round_to(value, 6));
    for row in table.rounded_rows() {
      for v in row {
        assert_eq!(v, round_to(v, 6));
      }
    }
  }
}

mod accuracy {
  use super::*;

  #[test]
  fn sine_with_five_rows() {
    let (value, _) = romberg(&f("sin(x)"), 0.0, PI, 5).unwrap();
    assert_close(value, 2.0, 1e-4);
  }

  #[test]
  fn constant_and_identity() {
    assert_close(romberg(&f("4"), -2.0, 3.0, 4).unwrap().0, 20.0, 1e-12);
    assert_close(romberg(&f("x"), 0.0, 2.0, 4).unwrap().0, 2.0, 1e-12);
  }

  #[test]
  fn empty_interval_is_zero() {
    let (value, table) = romberg(&f("log(x)"), -2.0, -2.0, 3).unwrap();
    assert_eq!(value, 0.0);
    assert!(table.rows().iter().flatten().all(|&v| v == 0.0));
  }
}

mod errors {
  use super::*;

  #[test]
  fn order_must_be_positive() {
    assert!(is_invalid_parameter(romberg(&f("x"), 0.0, 1.0, 0)));
  }

  #[test]
  fn order_is_bounded() {
    assert!(romberg(&f("x"), 0.0, 1.0, MAX_ROMBERG_ORDER + 1).is_err());
  }

  #[test]
  fn order_far_beyond_the_bound_is_still_an_error() {
    for order in [64, 65, 100, usize::MAX] {
      let result = romberg(&f("x"), 0.0, 1.0, order);
      assert!(is_invalid_parameter(result), "order {order}");
    }
  }

  #[test]
  fn singular_integrand() {
    let result = romberg(&f("1/x"), 0.0, 1.0, 3);
    assert!(matches!(result, Err(Error::Evaluation(_))), "{result:?}");
  }
}
