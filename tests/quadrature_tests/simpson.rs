use super::*;
use numint::quadrature::MAX_SUBINTERVALS;
use numint::simpsons;
use std::cell::Cell;
use std::f64::consts::PI;

mod properties {
  use super::*;

  #[test]
  fn constant_integrand() {
    assert_close(simpsons(&f("-2"), 1.0, 4.0, 6).unwrap(), -6.0, 1e-12);
  }

  #[test]
  fn identity_on_zero_to_two() {
    for n in [2, 4, 10, 100] {
      assert_close(simpsons(&f("x"), 0.0, 2.0, n).unwrap(), 2.0, 1e-12);
    }
  }

  #[test]
  fn cubics_are_exact() {
    // ∫_{-1}^{2} x^3 - x dx = 15/4 - 3/2
    let estimate = simpsons(&f("x**3 - x"), -1.0, 2.0, 2).unwrap();
    assert_close(estimate, 2.25, 1e-12);
  }

  #[test]
  fn empty_interval_is_zero() {
    assert_eq!(simpsons(&f("log(x)"), -3.0, -3.0, 2).unwrap(), 0.0);
  }
}

mod accuracy {
  use super::*;

  #[test]
  fn sine_with_six_subintervals() {
    let estimate = simpsons(&f("sin(x)"), 0.0, PI, 6).unwrap();
    assert_close(estimate, 2.000863, 5e-7);
  }

  #[test]
  fn sine_converges_with_more_subintervals() {
    let estimate = simpsons(&f("sin(x)"), 0.0, PI, 12).unwrap();
    assert_close(estimate, 2.0, 1e-4);
  }
}

mod errors {
  use super::*;

  #[test]
  fn subinterval_count_is_bounded() {
    for n in [MAX_SUBINTERVALS + 2, usize::MAX - 1] {
      assert!(is_invalid_parameter(simpsons(&f("x"), 0.0, 1.0, n)), "n = {n}");
    }
  }

  #[test]
  fn odd_count_is_rejected() {
    for n in [1, 3, 5, 99] {
      let err = simpsons(&f("x"), 0.0, 1.0, n).unwrap_err();
      assert!(matches!(err, Error::InvalidParameter { name: "n", .. }));
      assert_eq!(err.to_string(), "n must be even");
    }
  }

  #[test]
  fn odd_count_performs_no_evaluation() {
    let calls = Cell::new(0usize);
    let counting = |x: f64| {
      calls.set(calls.get() + 1);
      x
    };
    assert!(simpsons(&counting, 0.0, 1.0, 7).is_err());
    assert_eq!(calls.get(), 0);
    assert!(simpsons(&counting, 0.0, 1.0, 8).is_ok());
    assert_eq!(calls.get(), 9);
  }

  #[test]
  fn zero_subintervals() {
    let err = simpsons(&f("x"), 0.0, 1.0, 0).unwrap_err();
    assert!(matches!(err, Error::InvalidParameter { name: "n", .. }));
    assert_eq!(err.to_string(), "n must be at least 1");
  }
}
