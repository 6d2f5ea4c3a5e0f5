#![allow(dead_code)]

use rand::{rngs::SmallRng, SeedableRng};

pub fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn rng() -> SmallRng {
    SmallRng::seed_from_u64(0)
}

/// Central finite difference of `f` at `x`.
pub fn numeric_gradient<F: Fn(f64) -> f64>(f: F, x: f64) -> f64 {
    let h = 1e-5;
    (f(x + h) - f(x - h)) / (2. * h)
}

pub fn assert_close(expected: f64, received: f64, id: &str) {
    let tolerance = 1e-4 * f64::max(expected.abs(), 1.);
    assert!(
        (expected - received).abs() < tolerance,
        "{} is off.\nexpected: {:?}\nreceived: {:?}",
        id,
        expected,
        received
    );
}
