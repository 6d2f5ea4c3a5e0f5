mod common;

use common::{assert_close, numeric_gradient, rng};
use rand::Rng;
use rand_distr::{Normal, Uniform};
use rusty_loss::{
    Absolute, BinaryFocalLoss, BinaryLoss, Cauchy, CrossEntropy, EpsilonInsensitiveHinge, Hinge,
    Log, MultiClassLoss, Poisson, Quantile, RegressionLoss, RegressionLossFn, Squared,
};

use std::collections::{HashMap, HashSet};

const SAMPLES: usize = 1000;

#[test]
fn regression_losses_vanish_on_perfect_predictions() {
    let mut rng = rng();
    let dist = Normal::new(0., 50.).unwrap();
    let losses: Vec<RegressionLossFn> = vec![
        Absolute.into(),
        Cauchy::default().into(),
        Quantile::new(0.3).into(),
        Squared.into(),
        EpsilonInsensitiveHinge::default().into(),
    ];

    for _ in 0..SAMPLES {
        let y: f64 = rng.sample(dist);
        if y == 0. {
            continue;
        }
        for loss in &losses {
            assert_eq!(loss.eval(y, y), 0., "{} at {}", loss, y);
        }
    }
}

#[test]
fn log_loss_is_finite_and_non_negative() {
    let mut rng = rng();
    let dist = Normal::new(0., 500.).unwrap();
    let losses = [Log::default(), Log::new(5., 0.1)];

    for _ in 0..SAMPLES {
        let p: f64 = rng.sample(dist);
        let y: bool = rng.gen();
        for loss in &losses {
            let eval = loss.eval(y, p);
            let grad = loss.gradient(y, p);
            assert!(eval.is_finite() && eval >= 0., "{}: eval({}, {}) = {}", loss, y, p, eval);
            assert!(grad.is_finite(), "{}: gradient({}, {}) = {}", loss, y, p, grad);
        }
    }

    for &p in &[-1000., 1000.] {
        assert!(Log::default().eval(true, p).is_finite());
        assert!(Log::default().eval(false, p).is_finite());
    }
}

#[test]
fn hinge_is_non_negative() {
    let mut rng = rng();
    let dist = Normal::new(0., 3.).unwrap();
    for _ in 0..SAMPLES {
        let p: f64 = rng.sample(dist);
        assert!(Hinge.eval(rng.gen(), p) >= 0.);
    }
}

#[test]
fn smooth_gradients_match_finite_differences() {
    let mut rng = rng();
    let dist = Normal::new(0., 2.).unwrap();

    for _ in 0..SAMPLES {
        let y: f64 = rng.sample(dist);
        let p: f64 = rng.sample(dist);
        assert_close(
            numeric_gradient(|p| Squared.eval(y, p), p),
            Squared.gradient(y, p),
            "squared gradient",
        );

        let count = y.abs().round();
        assert_close(
            numeric_gradient(|p| Poisson.eval(count, p), p),
            Poisson.gradient(count, p),
            "poisson gradient",
        );

        let label: bool = rng.gen();
        let log = Log::new(2., 0.5);
        assert_close(
            numeric_gradient(|p| log.eval(label, p), p),
            log.gradient(label, p),
            "log gradient",
        );

        let focal = BinaryFocalLoss::default();
        assert_close(
            numeric_gradient(|p| focal.eval(label, p), p),
            focal.gradient(label, p),
            "focal gradient",
        );
    }
}

#[test]
fn piecewise_linear_gradients_away_from_kinks() {
    let mut rng = rng();
    let dist = Uniform::new(-10., 10.);
    // the quantile gradient is `[y < p] - alpha`, which is the slope of its
    // eval only for the median
    let quantile = Quantile::new(0.5);
    let hinge = EpsilonInsensitiveHinge::new(0.5);

    for _ in 0..SAMPLES {
        let y: f64 = rng.sample(dist);
        let p: f64 = rng.sample(dist);
        if (p - y).abs() < 1e-3 || ((p - y).abs() - 0.5).abs() < 1e-3 || y == 0. {
            continue;
        }
        assert_close(
            numeric_gradient(|p| quantile.eval(y, p), p),
            quantile.gradient(y, p),
            "quantile gradient",
        );
        assert_close(
            numeric_gradient(|p| Absolute.eval(y, p), p),
            Absolute.gradient(y, p),
            "absolute gradient",
        );
        assert_close(
            numeric_gradient(|p| hinge.eval(y, p), p),
            hinge.gradient(y, p),
            "epsilon insensitive gradient",
        );
    }
}

#[test]
fn cauchy_gradient_follows_the_robust_form() {
    // eval returns the absolute error, the gradient is the derivative of
    // scale^2 / 2 * ln(1 + (d / scale)^2)
    let mut rng = rng();
    let dist = Normal::new(0., 100.).unwrap();
    let loss = Cauchy::new(80.);
    let robust = |y: f64, p: f64| {
        let r = (p - y) / loss.scale();
        loss.scale() * loss.scale() / 2. * (1. + r * r).ln()
    };

    for _ in 0..SAMPLES {
        let y: f64 = rng.sample(dist);
        let p: f64 = rng.sample(dist);
        assert_close(
            numeric_gradient(|p| robust(y, p), p),
            loss.gradient(y, p),
            "cauchy gradient",
        );
        assert_eq!(loss.eval(y, p), Absolute.eval(y, p));
    }
}

#[test]
fn cross_entropy_gradient_keys() {
    let mut rng = rng();
    let loss: CrossEntropy<u8> = CrossEntropy::default();

    for _ in 0..SAMPLES {
        let n_classes = rng.gen_range(0, 6);
        let y_pred: HashMap<u8, f64> = (0..n_classes)
            .map(|label| (label, rng.gen_range(0., 1.)))
            .collect();
        let y_true: u8 = rng.gen_range(0, 8);

        let grads = loss.gradient(&y_true, &y_pred);
        let mut expected: HashSet<u8> = y_pred.keys().copied().collect();
        expected.insert(y_true);
        assert_eq!(grads.keys().copied().collect::<HashSet<_>>(), expected);
        assert!(grads.values().all(|g| g.is_finite()));
        assert!(grads[&y_true] < 0.);
        assert!(loss.eval(&y_true, &y_pred).is_finite());
    }
}

#[test]
fn cross_entropy_handles_certain_predictions() {
    let loss: CrossEntropy<u8> = CrossEntropy::default();
    for &(p0, p1) in &[(0., 1.), (1., 0.), (0., 0.), (1., 1.)] {
        let y_pred: HashMap<u8, f64> = vec![(0, p0), (1, p1)].into_iter().collect();
        for y_true in 0..2 {
            assert!(loss.eval(&y_true, &y_pred).is_finite());
            assert!(loss
                .gradient(&y_true, &y_pred)
                .values()
                .all(|g| g.is_finite()));
        }
    }
}
