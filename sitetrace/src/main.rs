extern crate sitetrace;
extern crate tracing;

use clap::Parser;
use sitetrace::analysis::Analytics;
use sitetrace::models::GaussianUnknownMeanMarsaglia;
use sitetrace::utils::render::*;
use sitetrace::{Budget, FailurePolicy, Model, ObservationSet, Options};
use std::error::Error;
use std::time::*;
use tracing::*;
use tracing_subscriber::fmt;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[clap(short, long)]
    steps: usize,

    #[clap(short, long)]
    rng: Option<u64>,

    /// condition on NAME=VALUE (repeatable); runs the prior when absent
    #[clap(short, long, value_parser = parse_observation)]
    observe: Vec<(String, f64)>,

    /// drop up to this many failed executions instead of aborting
    #[clap(long)]
    skip: Option<usize>,

    #[clap(long)]
    max_choices: Option<usize>,

    #[clap(long)]
    parallel: bool,

    #[clap(long)]
    debug: bool,

    #[clap(long)]
    stats: bool,
}

fn parse_observation(s: &str) -> Result<(String, f64), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got {s:?}"))?;
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("{value:?} is not a number: {e}"))?;
    Ok((name.trim().to_string(), value))
}

fn setup_tracing(lvl: Level) {
    let format = fmt::format()
        .with_level(true)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .without_time()
        .compact();

    tracing_subscriber::fmt()
        .with_max_level(lvl)
        .event_format(format)
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    setup_tracing(if args.debug {
        Level::TRACE
    } else {
        Level::WARN
    });
    info!("cli arguments: {:?}", args);

    let policy = match args.skip {
        None => FailurePolicy::Abort,
        Some(max_failures) => FailurePolicy::Skip { max_failures },
    };
    let budget = Budget {
        max_choices: args.max_choices,
        ..Default::default()
    };
    let options = Options::new(args.rng, policy, budget, args.parallel);
    debug!("sampler options: {:?}", options);

    let model = GaussianUnknownMeanMarsaglia::default();
    let observe = args.observe.iter().cloned().collect::<ObservationSet>();
    let analytics = Analytics::new(&model, options.clone());

    println!("      Model: {}", model.name());
    println!("    # Steps: {}", args.steps);
    println!("       Seed: {:?}", args.rng);
    if !observe.is_empty() {
        println!("   Observed: {:?}", args.observe);
    }
    println!("---------------------------------------------------");

    let now = Instant::now();
    let (graph, stats) = if observe.is_empty() {
        analytics.prior_graph(args.steps)?
    } else {
        analytics.posterior_graph(args.steps, &observe)?
    };
    let elapsed_time = now.elapsed();

    println!("{}", render_stats(&stats));
    if args.stats {
        println!("{}", render_histogram(&stats));
        print!("{}", graph);
        let empirical = if observe.is_empty() {
            analytics.sampler().prior(args.steps)?
        } else {
            analytics.sampler().posterior(args.steps, &observe)?
        };
        println!(
            "  E[mu] = {:.4}, Var[mu] = {:.4}, ess = {:.2}",
            empirical.mean(),
            empirical.variance(),
            empirical.effective_sample_size()
        );
    }

    if elapsed_time.as_secs() > 10 {
        println!("Took {}s", elapsed_time.as_secs());
    } else {
        println!("Took {}ms", elapsed_time.as_millis());
    }
    Ok(())
}
