use crate::data::*;
use crate::engine::{Engine, Mode, Model};
use crate::pipeline::Budget;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;
use std::time::Instant;

/// Lazily runs one execution per seed, in seed order.
pub struct SamplingIter<'m, 'o, M: Model> {
    pub current_step: usize,
    model: &'m M,
    mode: Mode<'o>,
    budget: Budget,
    seeds: std::vec::IntoIter<u64>,
    start: Instant,
}
impl<'m, 'o, M: Model> SamplingIter<'m, 'o, M> {
    pub fn new(model: &'m M, mode: Mode<'o>, budget: Budget, seeds: Vec<u64>) -> Self {
        Self {
            current_step: 0,
            model,
            mode,
            budget,
            seeds: seeds.into_iter(),
            start: Instant::now(),
        }
    }
}

pub struct SamplingResult<R> {
    pub step: usize,
    pub seed: u64,
    pub trace: Result<Trace<R>>,
    /// time since the iterator was created
    pub duration: Duration,
}

pub fn execute<M: Model>(model: &M, mode: Mode<'_>, budget: Budget, seed: u64) -> Result<Trace<M::Output>> {
    Engine::new(mode, StdRng::seed_from_u64(seed), budget).run(model)
}

impl<'m, 'o, M: Model> Iterator for SamplingIter<'m, 'o, M> {
    type Item = SamplingResult<M::Output>;

    fn next(&mut self) -> Option<Self::Item> {
        let seed = self.seeds.next()?;
        let step = self.current_step;
        self.current_step += 1;
        let trace = execute(self.model, self.mode, self.budget, seed);
        let duration = Instant::now().duration_since(self.start);
        Some(SamplingResult {
            step,
            seed,
            trace,
            duration,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.seeds.size_hint()
    }
}
