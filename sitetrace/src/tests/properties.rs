use crate::analysis::*;
use crate::distributions::*;
use crate::engine::*;
use crate::inference::*;
use crate::models::*;
use crate::*;

use itertools::*;
use quickcheck::{Arbitrary, Gen};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Non-empty batch of trace lengths, each at least one.
#[derive(Debug, Clone)]
struct Lengths(Vec<usize>);

impl Arbitrary for Lengths {
    fn arbitrary(g: &mut Gen) -> Self {
        let n = usize::arbitrary(g) % 50 + 1;
        Lengths((0..n).map(|_| u8::arbitrary(g) as usize + 1).collect_vec())
    }
    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        Box::new(
            self.0
                .shrink()
                .filter(|ls| !ls.is_empty() && ls.iter().all(|l| *l > 0))
                .map(Lengths),
        )
    }
}

/// Finite log-weights in a range that keeps normalization meaningful.
#[derive(Debug, Clone)]
struct Weights(Vec<LW>);

impl Arbitrary for Weights {
    fn arbitrary(g: &mut Gen) -> Self {
        let n = usize::arbitrary(g) % 30 + 1;
        Weights(
            (0..n)
                .map(|_| LW(f64::from(i16::arbitrary(g)) / 100.0))
                .collect_vec(),
        )
    }
}

#[quickcheck]
fn prop_length_stats_are_ordered(ls: Lengths) -> bool {
    let s = TraceStats::from_lengths(&ls.0).unwrap();
    s.trace_length_min as f64 <= s.trace_length_mean + 1e-9
        && s.trace_length_mean <= s.trace_length_max as f64 + 1e-9
        && s.trace_length_stddev >= 0.0
        && s.num_traces == ls.0.len()
        && s.length_counts.values().sum::<usize>() == ls.0.len()
}

#[quickcheck]
fn prop_stddev_vanishes_iff_lengths_agree(ls: Lengths) -> bool {
    let s = TraceStats::from_lengths(&ls.0).unwrap();
    let constant = ls.0.iter().all_equal();
    (s.trace_length_stddev == 0.0) == constant
}

#[quickcheck]
fn prop_normalized_weights_sum_to_one(ws: Weights) -> bool {
    let normed = normalize(&ws.0).unwrap();
    let total: f64 = normed.iter().sum();
    let lse = log_sum_exp(&ws.0);
    (total - 1.0).abs() < 1e-9
        && normed.iter().all(|w| *w > 0.0 && *w <= 1.0)
        && izip!(&ws.0, &normed).all(|(lw, w)| (lw.val() - lse.val() - w.ln()).abs() < 1e-6)
}

#[quickcheck]
fn prop_same_seed_same_trace(seed: u64) -> bool {
    let model = GaussianUnknownMeanMarsaglia::default();
    let go = || Engine::new(Mode::Prior, StdRng::seed_from_u64(seed), Budget::unbounded()).run(&model);
    go() == go()
}

#[quickcheck]
fn prop_marsaglia_traces_have_whole_iterations(seed: u64) -> bool {
    let model = GaussianUnknownMeanMarsaglia::default();
    let t = execute(&model, Mode::Prior, Budget::unbounded(), seed).unwrap();
    let uniforms = t.latent().all(|c| c.distribution().name() == "Uniform");
    t.len() >= 4 && t.len() % 2 == 0 && t.observed().count() == 2 && uniforms
}

#[quickcheck]
fn prop_bernoulli_log_probs_are_complementary(p: u8) -> bool {
    let p = f64::from(p) / 255.0;
    let d = Dist::bern(p).unwrap();
    let t = d.log_prob(&Value::Bool(true)).unwrap().exp();
    let f = d.log_prob(&Value::Bool(false)).unwrap().exp();
    (t + f - 1.0).abs() < 1e-12
}
