use crate::data::errors::{self, Result};
use crate::data::weight::{normalize, LW};
use crate::data::Value;
use crate::utils::render::*;
use itertools::*;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

/// Weighted empirical distribution over model results.
///
/// Weights are self-normalized: `w_i = exp(lw_i - max lw)`, divided by their
/// sum. Prior batches carry all-zero log-weights and are therefore uniform.
#[derive(Debug, Clone)]
pub struct Empirical<R> {
    values: Vec<R>,
    log_weights: Vec<LW>,
    weights: Vec<f64>,
}

impl<R> Empirical<R> {
    pub fn new(values: Vec<R>, log_weights: Vec<LW>) -> Result<Self> {
        if values.is_empty() {
            return errors::invalid_batch("empirical distribution over zero values");
        }
        if values.len() != log_weights.len() {
            return errors::invalid_batch(&format!(
                "{} values but {} weights",
                values.len(),
                log_weights.len()
            ));
        }
        if let Some(ix) = log_weights.iter().position(|w| w.val().is_nan()) {
            return errors::invalid_batch(&format!("log-weight {ix} is NaN"));
        }
        let weights = match normalize(&log_weights) {
            Some(ws) => ws,
            None => return errors::invalid_batch("every trace has zero importance weight"),
        };
        Ok(Empirical {
            values,
            log_weights,
            weights,
        })
    }
    pub fn len(&self) -> usize {
        self.values.len()
    }
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
    pub fn values(&self) -> &[R] {
        &self.values
    }
    pub fn log_weights(&self) -> &[LW] {
        &self.log_weights
    }
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }
    /// Kish's effective sample size, `1 / ∑ w_i²` over normalized weights.
    pub fn effective_sample_size(&self) -> f64 {
        1.0 / self.weights.iter().map(|w| w * w).sum::<f64>()
    }
    pub fn expectation(&self, f: impl Fn(&R) -> f64) -> f64 {
        izip!(&self.values, &self.weights)
            .map(|(v, w)| w * f(v))
            .sum()
    }
    pub fn map<S>(&self, f: impl Fn(&R) -> S) -> Empirical<S> {
        Empirical {
            values: self.values.iter().map(f).collect_vec(),
            log_weights: self.log_weights.clone(),
            weights: self.weights.clone(),
        }
    }
    /// Draw one value with probability proportional to its weight.
    pub fn resample<G: Rng + ?Sized>(&self, rng: &mut G) -> Result<&R> {
        let d = WeightedIndex::new(&self.weights)
            .or_else(|e| errors::invalid_batch(&format!("cannot resample: {e}")))?;
        Ok(&self.values[d.sample(rng)])
    }
    pub fn render(&self) -> String {
        format!(
            "Empirical(n={}, ess={:.2}, weights={})",
            self.len(),
            self.effective_sample_size(),
            renderfloats(&self.weights, false)
        )
    }
}

pub trait AsF64 {
    fn as_f64(&self) -> f64;
}
impl AsF64 for f64 {
    fn as_f64(&self) -> f64 {
        *self
    }
}
impl AsF64 for i64 {
    fn as_f64(&self) -> f64 {
        *self as f64
    }
}
impl AsF64 for bool {
    fn as_f64(&self) -> f64 {
        if *self {
            1.0
        } else {
            0.0
        }
    }
}

impl<R: AsF64> Empirical<R> {
    pub fn mean(&self) -> f64 {
        self.expectation(|v| v.as_f64())
    }
    pub fn variance(&self) -> f64 {
        let mean = self.mean();
        self.expectation(|v| (v.as_f64() - mean).powi(2))
    }
}

impl Empirical<Value> {
    /// Numeric view of dynamically typed results. Fails on the first value
    /// that is not a number.
    pub fn floats(&self) -> Result<Empirical<f64>> {
        Ok(Empirical {
            values: self.values.iter().map(Value::float).collect::<Result<Vec<_>>>()?,
            log_weights: self.log_weights.clone(),
            weights: self.weights.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn resample_reports_unusable_weights() {
        let e = Empirical {
            values: vec![1.0, 2.0],
            log_weights: vec![LW(0.0), LW(0.0)],
            weights: vec![f64::NAN, 0.5],
        };
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            e.resample(&mut rng),
            Err(crate::InferenceError::InvalidTraceBatch(_))
        ));
    }
}
