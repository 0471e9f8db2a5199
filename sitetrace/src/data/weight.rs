use itertools::*;
use std::iter::Sum;

/// A weight kept in log-space.
#[derive(PartialEq, PartialOrd, Copy, Clone, Debug)]
pub struct LW(pub f64);
impl LW {
    pub fn val(&self) -> f64 {
        self.0
    }
    pub fn exp(&self) -> f64 {
        self.val().exp()
    }
    pub fn new(p: f64) -> Self {
        Self(p.ln())
    }
    pub fn add(&self, o: Self) -> Self {
        Self(self.0 + o.0)
    }
    pub fn sub(&self, o: Self) -> Self {
        Self(self.0 - o.0)
    }
    pub fn is_finite(&self) -> bool {
        self.0.is_finite()
    }
    pub fn render(&self) -> String {
        format!("LW(weight={:.6})", self.exp())
    }
    pub fn log_render(&self) -> String {
        format!("LW(log_weight={:.6})", self.val())
    }
}
impl Default for LW {
    fn default() -> Self {
        Self(0.0)
    }
}
impl Sum for LW {
    fn sum<I>(iter: I) -> Self
    where
        I: Iterator<Item = LW>,
    {
        iter.fold(LW::default(), |acc, w| acc.add(w))
    }
}

/// Self-normalize log-weights: shift by the maximum, exponentiate, divide by
/// the total. `None` when no weight is positive or any weight is NaN.
pub fn normalize(lws: &[LW]) -> Option<Vec<f64>> {
    if lws.iter().any(|w| w.val().is_nan()) {
        return None;
    }
    let mx = lws
        .iter()
        .map(LW::val)
        .fold(f64::NEG_INFINITY, f64::max);
    if !mx.is_finite() {
        return None;
    }
    let ws = lws.iter().map(|w| (w.val() - mx).exp()).collect_vec();
    let total: f64 = ws.iter().sum();
    Some(ws.into_iter().map(|w| w / total).collect_vec())
}

/// log ∑ exp(lw), stable under large magnitudes.
pub fn log_sum_exp(lws: &[LW]) -> LW {
    let mx = lws
        .iter()
        .map(LW::val)
        .fold(f64::NEG_INFINITY, f64::max);
    if !mx.is_finite() {
        return LW(mx);
    }
    let s: f64 = lws.iter().map(|w| (w.val() - mx).exp()).sum();
    LW(mx + s.ln())
}
