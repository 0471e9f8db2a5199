use crate::analysis::*;
use crate::inference::*;
use crate::models::*;
use crate::tests::checks::*;
use crate::tests::*;
use crate::*;

use itertools::*;
use tracing_test::traced_test;

const NUM_TRACES: usize = 2000;

fn observations() -> ObservationSet {
    ObservationSet::new().with("obs1", 8.0).with("obs2", 9.0)
}

#[test]
#[traced_test]
fn marsaglia_prior_statistics() {
    let model = GaussianUnknownMeanMarsaglia::default();
    let analytics = Analytics::new(&model, Options::seed(123));
    let (_, stats) = analytics.prior_graph(NUM_TRACES).unwrap();
    // reference values from 100k runs
    check_length_stats("prior", &stats, 4.543580055236816, 1.177796721458435, 4);
    assert_eq!(stats.num_traces, NUM_TRACES);
    assert!(stats.weights.is_none());
    assert!(logs_contain("2000 traces"));
}

#[test]
fn marsaglia_posterior_statistics() {
    let model = GaussianUnknownMeanMarsaglia::default();
    let analytics = Analytics::new(&model, Options::seed(123));
    let (_, stats) = analytics
        .posterior_graph(NUM_TRACES, &observations())
        .unwrap();
    // reference values from 100k runs
    check_length_stats("posterior", &stats, 4.556660175323486, 1.1909255981445312, 4);
    let w = stats.weights.as_ref().unwrap();
    assert!(w.log_weight_min.is_finite() && w.log_weight_max.is_finite());
    assert!(w.log_weight_min <= w.log_weight_max);
    assert!(w.effective_sample_size >= 1.0 && w.effective_sample_size <= NUM_TRACES as f64);
}

#[test]
fn zero_traces_is_an_invalid_batch() {
    let model = GaussianUnknownMeanMarsaglia::default();
    let analytics = Analytics::new(&model, Options::seed(0));
    assert!(matches!(
        analytics.prior_graph(0),
        Err(InferenceError::InvalidTraceBatch(_))
    ));
    assert!(matches!(
        analytics.posterior_graph(0, &observations()),
        Err(InferenceError::InvalidTraceBatch(_))
    ));
}

#[test]
fn zero_length_traces_are_an_invalid_batch() {
    let model = model_fn("deterministic", |_| Ok(1.0));
    let analytics = Analytics::new(&model, Options::seed(0));
    let r = analytics.prior_graph(10);
    assert!(matches!(r, Err(InferenceError::InvalidTraceBatch(_))));
}

#[test]
#[traced_test]
fn zero_weight_batches_still_summarize() {
    let model = model_fn("out of support", |ctx| {
        let mu = ctx.sample(&Dist::normal(0.0, 1.0)?)?.float()?;
        ctx.observe(&Dist::uniform(mu - 1.0, mu + 1.0)?, Some("y"), None)
    });
    let obs = ObservationSet::new().with("y", 100.0);
    let analytics = Analytics::new(&model, Options::seed(0));
    let (graph, stats) = analytics.posterior_graph(50, &obs).unwrap();
    assert_eq!(graph.num_traces(), 50);
    assert_eq!(graph.node_count(), 2);
    assert_eq!(stats.num_traces, 50);
    assert_eq!((stats.trace_length_min, stats.trace_length_max), (2, 2));
    assert_eq!(stats.trace_length_stddev, 0.0);

    let w = stats.weights.as_ref().unwrap();
    assert_eq!(w.effective_sample_size, 0.0);
    assert_eq!(w.log_weight_max, f64::NEG_INFINITY);
    assert!(logs_contain("no trace of 50 has positive importance weight"));
}

#[test]
fn stats_map_carries_the_length_keys() {
    let model = GaussianUnknownMeanMarsaglia::default();
    let (_, stats) = Analytics::new(&model, Options::seed(9))
        .prior_graph(100)
        .unwrap();
    let m = stats.as_map();
    for k in [
        "trace_length_mean",
        "trace_length_stddev",
        "trace_length_min",
        "trace_length_max",
    ] {
        assert!(m.contains_key(k), "missing {k}");
    }
    assert_eq!(m["trace_length_min"], stats.trace_length_min as f64);
    assert_eq!(stats.length_counts.values().sum::<usize>(), 100);
    assert!(stats.length_counts.keys().all(|l| l % 2 == 0));
}

#[test]
fn marsaglia_graph_has_the_rejection_loop() {
    let model = GaussianUnknownMeanMarsaglia::default();
    let analytics = Analytics::new(&model, Options::seed(123));
    let batch = analytics.sampler().prior_traces(NUM_TRACES).unwrap();
    let graph = analytics.graph_of(&batch).unwrap();

    let first = &batch.traces()[0];
    let base = |i: usize| first.choices()[i].address().base().to_string();
    let n = first.len();
    let (x, y, obs1, obs2) = (base(0), base(1), base(n - 2), base(n - 1));

    assert_eq!(graph.num_traces(), NUM_TRACES);
    assert_eq!(graph.node_count(), 4);
    assert_eq!(graph.edge_count(), 4);
    assert!(x.starts_with("marsaglia/"));
    assert!(!graph.node(&x).unwrap().observed);
    assert!(graph.node(&obs1).unwrap().observed);
    assert_eq!(graph.node(&obs2).unwrap().distribution, "Normal");

    let iterations = graph.node(&x).unwrap().count;
    let rejections = graph.edge_weight(&y, &x);
    assert_eq!(graph.edge_weight(&x, &y), iterations);
    assert_eq!(iterations, NUM_TRACES + rejections);
    assert_eq!(graph.edge_weight(&y, &obs1), NUM_TRACES);
    assert_eq!(graph.edge_weight(&obs1, &obs2), NUM_TRACES);
    assert_eq!(graph.edge_weight(&obs2, &x), 0);
    assert_eq!(graph.node(&x).unwrap().entries, NUM_TRACES);
    assert_eq!(graph.node(&obs2).unwrap().exits, NUM_TRACES);
    assert!(rejections > 0);
    // acceptance rate of the polar method is π/4
    check_close(
        "iterations per trace",
        4.0 / std::f64::consts::PI,
        iterations as f64 / NUM_TRACES as f64,
        0.05,
    );

    let mut successors = graph.successors(&y).map(|(to, _)| to.to_string()).collect_vec();
    successors.sort();
    let mut expected = vec![x.clone(), obs1.clone()];
    expected.sort();
    assert_eq!(successors, expected);
    assert!(format!("{}", graph).contains("ExecutionGraph(2000 traces, 4 nodes, 4 edges)"));
}

#[test]
fn full_addresses_unroll_the_loop() {
    let model = GaussianUnknownMeanMarsaglia::default();
    let analytics = Analytics::new(&model, Options::seed(123)).with_full_addresses();
    let (graph, stats) = analytics.prior_graph(500).unwrap();
    assert!(!graph.uses_address_base());
    // one node per iteration depth, plus the two observations
    assert_eq!(graph.node_count(), stats.trace_length_max);
    let starts = graph.nodes().filter(|n| n.entries > 0).collect_vec();
    assert_eq!(starts.len(), 1);
    assert_eq!(starts[0].entries, 500);
    assert!(starts[0].address.ends_with("__Uniform__0"));
    // no cycles once occurrences are part of the key
    assert!(graph
        .edges()
        .all(|(from, to, _)| from != to && to != starts[0].address));
}

#[test]
fn prior_and_posterior_share_structure() {
    let model = GaussianUnknownMeanMarsaglia::default();
    let analytics = Analytics::new(&model, Options::seed(5));
    let (prior, _) = analytics.prior_graph(500).unwrap();
    let (posterior, _) = analytics.posterior_graph(500, &observations()).unwrap();
    let names = |g: &ExecutionGraph| g.nodes().map(|n| n.address.clone()).collect_vec();
    assert_eq!(names(&prior), names(&posterior));
}

#[test]
fn manual_aggregation_matches_the_batch() {
    let model = GaussianUnknownMeanMarsaglia::default();
    let obs = observations();
    let analytics = Analytics::new(&model, Options::seed(17));
    let (graph, stats) = analytics.posterior_graph(200, &obs).unwrap();

    let sampler = analytics.sampler();
    let traces = sampler
        .seeds(200)
        .into_iter()
        .map(|s| sampler.run_one(s, Mode::Posterior(&obs)).unwrap())
        .collect_vec();
    let manual = TraceBatch::new(traces, 0);
    assert_eq!(analytics.graph_of(&manual).unwrap(), graph);
    assert_eq!(analytics.stats_of(&manual, true).unwrap(), stats);
}

#[test]
fn geometric_lengths_vary() {
    let model = geometric_model();
    let (graph, stats) = Analytics::new(&model, Options::seed(0))
        .prior_graph(1000)
        .unwrap();
    assert_eq!(graph.node_count(), 1);
    assert_eq!(stats.trace_length_min, 1);
    check_close("geometric mean", 10.0, stats.trace_length_mean, 1.0);
    assert!(stats.trace_length_stddev > 0.0);
}
