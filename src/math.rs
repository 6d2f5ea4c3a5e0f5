use std::collections::HashMap;
use std::hash::Hash;

/// Smallest probability handed to a logarithm.
pub const PROBA_EPS: f64 = 1e-15;

pub fn sigmoid(x: f64) -> f64 {
    1. / (1. + (-x).exp())
}

/// `ln(1 + exp(x))` without overflow for large `|x|`.
pub fn softplus(x: f64) -> f64 {
    f64::max(x, 0.) + (-x.abs()).exp().ln_1p()
}

/// Restricts a probability to `[1e-15, 1 - 1e-15]` so that `ln` stays finite.
pub fn clamp_proba(p: f64) -> f64 {
    f64::max(f64::min(p, 1. - PROBA_EPS), PROBA_EPS)
}

/// Maps a boolean label onto the `{-1, +1}` convention used by margin based losses.
#[inline]
pub fn to_pm1(label: bool) -> f64 {
    if label {
        1.
    } else {
        -1.
    }
}

#[inline]
pub fn indicator(cond: bool) -> f64 {
    if cond {
        1.
    } else {
        0.
    }
}

/// Normalizes a map of scores into probabilities.
/// The maximum is subtracted before exponentiating so large scores don't overflow.
pub fn softmax<L>(scores: &HashMap<L, f64>) -> HashMap<L, f64>
where
    L: Eq + Hash + Clone,
{
    let max = scores
        .values()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);

    let mut out: HashMap<L, f64> = scores
        .iter()
        .map(|(label, score)| (label.clone(), (score - max).exp()))
        .collect();
    let total: f64 = out.values().sum();
    for p in out.values_mut() {
        *p /= total;
    }
    out
}
