use crate::data::errors::{self, Result};
use crate::data::*;
use crate::inference::TraceBatch;
use indexmap::IndexMap;
use itertools::*;
use statrs::statistics::Statistics;
use std::collections::BTreeMap;
use tracing::warn;

/// Summary of the importance weights of a conditioned batch.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightStats {
    pub log_weight_min: f64,
    pub log_weight_max: f64,
    pub effective_sample_size: f64,
}
impl WeightStats {
    /// A batch where no trace carries positive weight still summarizes: its
    /// effective sample size is zero.
    pub fn from_log_weights(lws: &[LW]) -> Self {
        let log_weight_min = lws.iter().map(LW::val).fold(f64::INFINITY, f64::min);
        let log_weight_max = lws.iter().map(LW::val).fold(f64::NEG_INFINITY, f64::max);
        let effective_sample_size = match normalize(lws) {
            Some(ws) => 1.0 / ws.iter().map(|w| w * w).sum::<f64>(),
            None => {
                warn!(
                    "no trace of {} has positive importance weight, ess is 0",
                    lws.len()
                );
                0.0
            }
        };
        WeightStats {
            log_weight_min,
            log_weight_max,
            effective_sample_size,
        }
    }
}

/// Trace-length statistics of a batch, always over unweighted lengths: they
/// describe the sampling process, not the posterior.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceStats {
    pub num_traces: usize,
    pub skipped: usize,
    pub trace_length_mean: f64,
    pub trace_length_stddev: f64,
    pub trace_length_min: usize,
    pub trace_length_max: usize,
    pub length_counts: BTreeMap<usize, usize>,
    pub weights: Option<WeightStats>,
}

impl TraceStats {
    pub fn from_lengths(lengths: &[usize]) -> Result<Self> {
        if lengths.is_empty() {
            return errors::invalid_batch("no traces to summarize");
        }
        if let Some(ix) = lengths.iter().position(|l| *l == 0) {
            return errors::invalid_batch(&format!("trace {ix} recorded no random choices"));
        }
        let (trace_length_min, trace_length_max) = match lengths.iter().minmax() {
            MinMaxResult::OneElement(l) => (*l, *l),
            MinMaxResult::MinMax(lo, hi) => (*lo, *hi),
            MinMaxResult::NoElements => unreachable!("checked non-empty above"),
        };
        let xs = lengths.iter().map(|l| *l as f64).collect_vec();
        let trace_length_mean = xs.iter().mean();
        // sample stddev, defined as zero for a single trace and for constant lengths
        let trace_length_stddev = if lengths.len() < 2 || trace_length_min == trace_length_max {
            0.0
        } else {
            xs.iter().std_dev()
        };
        let length_counts = lengths.iter().fold(BTreeMap::new(), |mut m, l| {
            *m.entry(*l).or_insert(0) += 1;
            m
        });
        Ok(TraceStats {
            num_traces: lengths.len(),
            skipped: 0,
            trace_length_mean,
            trace_length_stddev,
            trace_length_min,
            trace_length_max,
            length_counts,
            weights: None,
        })
    }

    pub fn of_batch<R>(batch: &TraceBatch<R>, weighted: bool) -> Result<Self> {
        let mut stats = Self::from_lengths(&batch.lengths())?;
        stats.skipped = batch.skipped();
        if weighted {
            stats.weights = Some(WeightStats::from_log_weights(&batch.log_weights()));
        }
        Ok(stats)
    }

    pub fn as_map(&self) -> IndexMap<&'static str, f64> {
        let mut m = IndexMap::new();
        m.insert("num_traces", self.num_traces as f64);
        m.insert("trace_length_mean", self.trace_length_mean);
        m.insert("trace_length_stddev", self.trace_length_stddev);
        m.insert("trace_length_min", self.trace_length_min as f64);
        m.insert("trace_length_max", self.trace_length_max as f64);
        if self.skipped > 0 {
            m.insert("skipped", self.skipped as f64);
        }
        if let Some(w) = &self.weights {
            m.insert("log_weight_min", w.log_weight_min);
            m.insert("log_weight_max", w.log_weight_max);
            m.insert("effective_sample_size", w.effective_sample_size);
        }
        m
    }
}
