use crate::data::errors::{self, InferenceError, Result};
use crate::data::*;
use crate::engine::{Mode, Model};
use crate::inference::iters::*;
use crate::pipeline::{FailurePolicy, Options};
use itertools::*;
use rand::Rng;
use rayon::prelude::*;
use tracing::*;

/// The traces collected from one batch of executions, in seed order.
#[derive(Debug, Clone)]
pub struct TraceBatch<R> {
    traces: Vec<Trace<R>>,
    skipped: usize,
}
impl<R> TraceBatch<R> {
    pub fn new(traces: Vec<Trace<R>>, skipped: usize) -> Self {
        TraceBatch { traces, skipped }
    }
    pub fn len(&self) -> usize {
        self.traces.len()
    }
    pub fn is_empty(&self) -> bool {
        self.traces.is_empty()
    }
    pub fn traces(&self) -> &[Trace<R>] {
        &self.traces
    }
    pub fn into_traces(self) -> Vec<Trace<R>> {
        self.traces
    }
    /// executions dropped under [`FailurePolicy::Skip`]
    pub fn skipped(&self) -> usize {
        self.skipped
    }
    pub fn lengths(&self) -> Vec<usize> {
        self.traces.iter().map(Trace::len).collect_vec()
    }
    pub fn log_weights(&self) -> Vec<LW> {
        self.traces.iter().map(Trace::log_weight).collect_vec()
    }
}

/// Runs a model many times under one mode and collects the traces.
pub struct Sampler<'m, M: Model> {
    model: &'m M,
    opt: Options,
}

impl<'m, M: Model> Sampler<'m, M> {
    pub fn new(model: &'m M, opt: Options) -> Self {
        Sampler { model, opt }
    }
    pub fn model(&self) -> &M {
        self.model
    }
    pub fn options(&self) -> &Options {
        &self.opt
    }

    /// One seed per execution, drawn up front from the master rng so that a
    /// batch is reproducible regardless of how it is scheduled.
    pub fn seeds(&self, n: usize) -> Vec<u64> {
        let mut rng = self.opt.rng();
        (0..n).map(|_| rng.gen::<u64>()).collect_vec()
    }

    pub fn run_one(&self, seed: u64, mode: Mode<'_>) -> Result<Trace<M::Output>> {
        execute(self.model, mode, self.opt.budget, seed)
    }

    pub fn iter<'o>(&self, n: usize, mode: Mode<'o>) -> SamplingIter<'m, 'o, M> {
        SamplingIter::new(self.model, mode, self.opt.budget, self.seeds(n))
    }

    pub fn traces(&self, n: usize, mode: Mode<'_>) -> Result<TraceBatch<M::Output>> {
        if n == 0 {
            return errors::invalid_batch("requested a batch of zero traces");
        }
        let span = span!(Level::DEBUG, "batch", model = self.model.name(), n = n);
        let _enter = span.enter();
        debug!("running with options: {:?}", self.opt);

        if self.opt.parallel {
            let results = self
                .seeds(n)
                .into_par_iter()
                .map(|seed| self.run_one(seed, mode))
                .collect::<Vec<_>>();
            self.collect(results)
        } else {
            self.collect(self.iter(n, mode).map(|r| {
                if r.step % 100 == 0 {
                    trace!("step: {} ({:?})", r.step, r.duration);
                }
                r.trace
            }))
        }
    }

    pub fn prior_traces(&self, n: usize) -> Result<TraceBatch<M::Output>> {
        self.traces(n, Mode::Prior)
    }

    pub fn posterior_traces(
        &self,
        n: usize,
        observe: &ObservationSet,
    ) -> Result<TraceBatch<M::Output>> {
        self.traces(n, Mode::Posterior(observe))
    }

    fn collect<I>(&self, results: I) -> Result<TraceBatch<M::Output>>
    where
        I: IntoIterator<Item = Result<Trace<M::Output>>>,
    {
        let mut traces = vec![];
        let mut failed = 0;
        for (step, r) in results.into_iter().enumerate() {
            match r {
                Ok(t) => traces.push(t),
                Err(e) => match self.opt.policy {
                    FailurePolicy::Abort => {
                        warn!("execution {} failed, aborting batch: {}", step, e);
                        return Err(e);
                    }
                    FailurePolicy::Skip { max_failures } => {
                        failed += 1;
                        if failed > max_failures {
                            return Err(InferenceError::TooManyFailures {
                                failed,
                                limit: max_failures,
                                last: Box::new(e),
                            });
                        }
                        warn!("skipping failed execution {}: {}", step, e);
                    }
                },
            }
        }
        if failed > 0 {
            info!("{} of {} executions skipped", failed, failed + traces.len());
        }
        if traces.is_empty() {
            return errors::invalid_batch("every execution in the batch failed");
        }
        Ok(TraceBatch::new(traces, failed))
    }
}
