use super::*;
use numint::quadrature::MAX_GAUSS_ORDER;
use numint::{fixed_gauss, gaussian_sweep};
use std::f64::consts::{E, PI};

mod sweep {
  use super::*;

  #[test]
  fn one_entry_per_order() {
    let sweep = gaussian_sweep(&f("cos(x)"), 0.0, 1.0, 5).unwrap();
    let orders: Vec<usize> = sweep.iter().map(|(n, _)| *n).collect();
    assert_eq!(orders, vec![1, 2, 3, 4, 5]);
    assert_eq!(sweep.len(), 5);
    assert_eq!(sweep.last().0, 5);
  }

  #[test]
  fn estimates_are_rounded_to_six_digits() {
    let sweep = gaussian_sweep(&f("exp(x)"), 0.0, 1.0, 4).unwrap();
    for (_, value) in sweep.iter() {
      assert_eq!(*value, (value * 1e6).round() / 1e6);
    }
  }

  #[test]
  fn sine_settles_on_two() {
    let sweep = gaussian_sweep(&f("sin(x)"), 0.0, PI, 6).unwrap();
    assert_eq!(sweep.last(), (6, 2.0));
  }

  #[test]
  fn order_must_be_positive() {
    assert!(is_invalid_parameter(gaussian_sweep(&f("x"), 0.0, 1.0, 0)));
  }

  #[test]
  fn order_is_bounded() {
    for max_n in [MAX_GAUSS_ORDER + 1, usize::MAX] {
      assert!(is_invalid_parameter(gaussian_sweep(&f("x"), 0.0, 1.0, max_n)));
      assert!(is_invalid_parameter(fixed_gauss(&f("x"), 0.0, 1.0, max_n)));
    }
  }

  #[test]
  fn empty_interval_is_zero_without_sampling() {
    let sweep = gaussian_sweep(&f("log(x)"), -1.0, -1.0, 4).unwrap();
    assert!(sweep.iter().all(|(_, value)| *value == 0.0));
    let g = |_: f64| -> f64 { panic!("sampled") };
    assert_eq!(fixed_gauss(&g, 2.0, 2.0, 3).unwrap(), 0.0);
  }
}

mod exactness {
  use super::*;

  #[test]
  fn polynomials_up_to_degree_two_n_minus_one() {
    // ∫_{-1}^{2} x^5 - 2x^2 + 1 dx = 7.5
    let sweep = gaussian_sweep(&f("x**5 - 2*x**2 + 1"), -1.0, 2.0, 6).unwrap();
    for (n, value) in sweep.iter().filter(|(n, _)| *n >= 3) {
      assert_close(*value, 7.5, 1e-12);
      assert!(*n >= 3);
    }
    // Two points only integrate cubics exactly.
    assert!((sweep.entries()[1].1 - 7.5).abs() > 1e-3);
  }

  #[test]
  fn error_does_not_grow_with_order() {
    let g = f("exp(x)");
    let exact = E - 1.0;
    let errors: Vec<f64> = (1..=5)
      .map(|n| (fixed_gauss(&g, 0.0, 1.0, n).unwrap() - exact).abs())
      .collect();
    for pair in errors.windows(2) {
      assert!(pair[1] <= pair[0], "{errors:?}");
    }
  }

  #[test]
  fn reversed_interval_is_negative() {
    let forward = fixed_gauss(&f("x**2"), 0.0, 3.0, 2).unwrap();
    let backward = fixed_gauss(&f("x**2"), 3.0, 0.0, 2).unwrap();
    assert_close(forward, 9.0, 1e-12);
    assert_close(backward, -9.0, 1e-12);
  }

  #[test]
  fn interior_nodes_avoid_endpoint_singularities() {
    // Unlike the closed rules, Gauss-Legendre never samples x = 0.
    let estimate = fixed_gauss(&f("1/sqrt(x)"), 0.0, 1.0, 20).unwrap();
    assert_close(estimate, 2.0, 0.1);
  }
}
