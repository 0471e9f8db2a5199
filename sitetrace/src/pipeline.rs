use crate::data::*;
use crate::engine::{Engine, Mode, Model};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;

/// Per-execution limits. Exceeding either fails that execution.
///
/// Both limits are checked only on entry to `sample`/`observe`. A model that
/// loops without making random choices is never interrupted.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct Budget {
    pub max_choices: Option<usize>,
    pub timeout: Option<Duration>,
}
impl Budget {
    pub fn unbounded() -> Self {
        Default::default()
    }
    pub fn choices(mx: usize) -> Self {
        Self {
            max_choices: Some(mx),
            ..Default::default()
        }
    }
    pub fn timeout(t: Duration) -> Self {
        Self {
            timeout: Some(t),
            ..Default::default()
        }
    }
}

/// What to do when one execution of a batch fails.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    #[default]
    Abort,
    /// drop failed executions, up to `max_failures` of them
    Skip { max_failures: usize },
}

#[derive(Default, Debug, Clone)]
pub struct Options {
    pub seed: Option<u64>, // None draws from entropy
    pub policy: FailurePolicy,
    pub budget: Budget,
    pub parallel: bool,
}
impl Options {
    pub fn rng(&self) -> StdRng {
        match self.seed {
            None => SeedableRng::from_entropy(),
            Some(s) => SeedableRng::seed_from_u64(s),
        }
    }
    pub fn stoch() -> Self {
        Default::default()
    }
    pub fn seed(s: u64) -> Self {
        Self {
            seed: Some(s),
            ..Default::default()
        }
    }
    pub fn new(seed: Option<u64>, policy: FailurePolicy, budget: Budget, parallel: bool) -> Self {
        Self {
            seed,
            policy,
            budget,
            parallel,
        }
    }
    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }
    pub fn with_budget(mut self, budget: Budget) -> Self {
        self.budget = budget;
        self
    }
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// One unconditioned execution with fresh entropy.
pub fn run<M: Model>(model: &M) -> Result<Trace<M::Output>> {
    run_with(model, Mode::Prior, &Options::stoch())
}

/// One execution under `mode`, seeded from `opt`.
pub fn run_with<M: Model>(model: &M, mode: Mode<'_>, opt: &Options) -> Result<Trace<M::Output>> {
    Engine::new(mode, opt.rng(), opt.budget).run(model)
}
