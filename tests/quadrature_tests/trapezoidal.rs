use super::*;
use numint::quadrature::MAX_SUBINTERVALS;
use numint::trapezoidal;
use std::f64::consts::PI;

mod properties {
  use super::*;

  #[test]
  fn empty_interval_is_zero() {
    for expr in ["sin(x)", "x**2 + 1", "log(x)", "1/x"] {
      for n in [1, 2, 7, 100] {
        assert_eq!(trapezoidal(&f(expr), -1.0, -1.0, n).unwrap(), 0.0);
        assert_eq!(trapezoidal(&f(expr), 0.0, 0.0, n).unwrap(), 0.0);
      }
    }
  }

  #[test]
  fn constant_integrand() {
    let c = f("3.5");
    assert_close(trapezoidal(&c, -1.0, 2.0, 7).unwrap(), 10.5, 1e-12);
    assert_close(trapezoidal(&c, 2.0, -1.0, 1).unwrap(), -10.5, 1e-12);
  }

  #[test]
  fn identity_on_zero_to_two() {
    for n in [1, 2, 3, 10, 101] {
      assert_close(trapezoidal(&f("x"), 0.0, 2.0, n).unwrap(), 2.0, 1e-12);
    }
  }

  #[test]
  fn reversed_bounds_flip_the_sign() {
    let g = f("exp(x) * cos(x)");
    let forward = trapezoidal(&g, 0.0, 1.5, 40).unwrap();
    let backward = trapezoidal(&g, 1.5, 0.0, 40).unwrap();
    assert_close(backward, -forward, 1e-12);
  }
}

mod accuracy {
  use super::*;

  #[test]
  fn sine_over_half_period() {
    let estimate = trapezoidal(&f("sin(x)"), 0.0, PI, 6).unwrap();
    assert_close(estimate, 1.954097, 5e-7);
  }

  #[test]
  fn many_subintervals() {
    let estimate = trapezoidal(&f("exp(x)"), 0.0, 1.0, 100_000).unwrap();
    assert_close(estimate, std::f64::consts::E - 1.0, 1e-9);
  }

  #[test]
  fn odd_counts_are_allowed() {
    let estimate = trapezoidal(&f("x**2"), 0.0, 3.0, 3).unwrap();
    // h = 1: 0.5*0 + 1 + 4 + 0.5*9
    assert_close(estimate, 9.5, 1e-12);
  }
}

mod errors {
  use super::*;

  #[test]
  fn subinterval_count_is_bounded() {
    for n in [MAX_SUBINTERVALS + 2, usize::MAX - 1] {
      assert!(is_invalid_parameter(trapezoidal(&f("x"), 0.0, 1.0, n)), "n = {n}");
    }
  }

  #[test]
  fn zero_subintervals() {
    assert!(is_invalid_parameter(trapezoidal(&f("x"), 0.0, 1.0, 0)));
  }

  #[test]
  fn nan_from_domain_error_is_reported() {
    let result = trapezoidal(&f("log(x)"), -1.0, 1.0, 4);
    assert!(matches!(result, Err(Error::Evaluation(_))), "{result:?}");
  }

  #[test]
  fn pole_at_endpoint_is_reported() {
    let result = trapezoidal(&f("1/x"), 0.0, 1.0, 4);
    assert!(matches!(result, Err(Error::Evaluation(_))), "{result:?}");
  }

  #[test]
  fn failure_does_not_affect_later_calls() {
    let g = f("sqrt(x)");
    assert!(trapezoidal(&g, -1.0, 1.0, 2).is_err());
    assert_close(trapezoidal(&g, 0.0, 1.0, 1).unwrap(), 0.5, 1e-15);
  }
}
