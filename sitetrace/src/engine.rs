use crate::data::errors::{self, Result};
use crate::data::*;
use crate::distributions::Distribution;
use crate::pipeline::Budget;
use rand::rngs::StdRng;
use std::panic::Location;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, span, trace, warn, Level};

/// A generative model: an ordinary procedure that makes its random choices
/// through the [`Engine`] it is handed.
pub trait Model: Sync {
    type Output: Send;

    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
    fn forward(&self, ctx: &mut Engine<'_>) -> Result<Self::Output>;
}

/// Adapts a plain function into a [`Model`].
pub struct FnModel<F> {
    name: String,
    f: F,
}
pub fn model_fn<F, R>(name: &str, f: F) -> FnModel<F>
where
    F: Fn(&mut Engine<'_>) -> Result<R> + Sync,
    R: Send,
{
    FnModel {
        name: name.to_string(),
        f,
    }
}
impl<F, R> Model for FnModel<F>
where
    F: Fn(&mut Engine<'_>) -> Result<R> + Sync,
    R: Send,
{
    type Output = R;
    fn name(&self) -> &str {
        &self.name
    }
    fn forward(&self, ctx: &mut Engine<'_>) -> Result<R> {
        (self.f)(ctx)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Mode<'a> {
    /// unconditioned: observe sites are recorded, weights stay at zero
    Prior,
    /// likelihood weighting against a fixed observation set
    Posterior(&'a ObservationSet),
}
impl<'a> Mode<'a> {
    pub fn is_prior(&self) -> bool {
        matches!(self, Mode::Prior)
    }
}

/// Mediates the `sample`/`observe` calls of exactly one model execution.
///
/// An engine owns its random state and the trace under construction. It is
/// consumed by [`Engine::run`]; a fresh engine is needed for every execution.
pub struct Engine<'a> {
    mode: Mode<'a>,
    rng: StdRng,
    budget: Budget,
    started: Instant,
    frames: Vec<String>,
    occurrences: HashMap<String, usize>,
    choices: Vec<RandomChoice>,
    log_weight: LW,
}

impl<'a> Engine<'a> {
    pub fn new(mode: Mode<'a>, rng: StdRng, budget: Budget) -> Self {
        Engine {
            mode,
            rng,
            budget,
            started: Instant::now(),
            frames: vec![],
            occurrences: Default::default(),
            choices: vec![],
            log_weight: LW::default(),
        }
    }
    pub fn mode(&self) -> Mode<'a> {
        self.mode
    }
    /// number of choices recorded so far
    pub fn len(&self) -> usize {
        self.choices.len()
    }
    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }
    pub fn log_weight(&self) -> LW {
        self.log_weight
    }

    #[track_caller]
    pub fn sample<D: Distribution + Clone + 'static>(&mut self, dist: &D) -> Result<Value> {
        let site = Location::caller();
        self.sample_at(site, dist, None)
    }

    #[track_caller]
    pub fn sample_named<D: Distribution + Clone + 'static>(
        &mut self,
        dist: &D,
        name: &str,
    ) -> Result<Value> {
        let site = Location::caller();
        self.sample_at(site, dist, Some(name))
    }

    /// Record an observation site. When conditioning, the value comes from the
    /// observation set by `name`, falling back to `value`; in prior mode the
    /// given `value` is used or a fresh draw stands in for it.
    #[track_caller]
    pub fn observe<D: Distribution + Clone + 'static>(
        &mut self,
        dist: &D,
        name: Option<&str>,
        value: Option<Value>,
    ) -> Result<Value> {
        let site = Location::caller();
        self.check_budget()?;
        let dist: Arc<dyn Distribution> = Arc::new(dist.clone());
        let address = self.address(site, dist.name());

        let value = match self.mode {
            Mode::Prior => match value {
                Some(v) => v,
                None => dist.sample(&mut self.rng),
            },
            Mode::Posterior(obs) => match (name.and_then(|n| obs.get(n)), value) {
                (Some(v), _) => v.clone(),
                (None, Some(v)) => v,
                (None, None) => return errors::missing(name, &address.to_string()),
            },
        };
        let log_prob = log_prob_at(dist.as_ref(), &value, &address)?;
        if !self.mode.is_prior() {
            self.log_weight = self.log_weight.add(LW(log_prob));
        }
        trace!(
            "observe {} = {} (log_prob {:.4}, {})",
            address,
            value,
            log_prob,
            self.log_weight.log_render()
        );
        self.choices.push(RandomChoice::new(
            address,
            dist,
            value.clone(),
            log_prob,
            true,
            name.map(str::to_string),
        ));
        Ok(value)
    }

    /// Run `f` with `frame` pushed onto the address path of every choice it
    /// makes. The frame is popped on every exit path.
    pub fn scoped<T>(&mut self, frame: &str, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.frames.push(frame.to_string());
        let r = f(self);
        self.frames.pop();
        r
    }

    /// Execute `model` once, returning its finished trace. On failure the
    /// partial trace is dropped and the error is returned unchanged.
    pub fn run<M: Model + ?Sized>(mut self, model: &M) -> Result<Trace<M::Output>> {
        let span = span!(Level::DEBUG, "execution", model = model.name());
        let _enter = span.enter();
        self.started = Instant::now();
        match model.forward(&mut self) {
            Ok(result) => {
                let t = Trace::new(self.choices, self.log_weight, result);
                debug!(
                    "trace: {} choices, log_prob_sum {:.4}, {}",
                    t.len(),
                    t.log_prob_sum(),
                    t.log_weight().log_render()
                );
                Ok(t)
            }
            Err(e) => {
                debug!(
                    "discarding partial trace of {} choices: {}",
                    self.choices.len(),
                    e
                );
                Err(e)
            }
        }
    }

    fn sample_at<D: Distribution + Clone + 'static>(
        &mut self,
        site: &'static Location<'static>,
        dist: &D,
        name: Option<&str>,
    ) -> Result<Value> {
        self.check_budget()?;
        let dist: Arc<dyn Distribution> = Arc::new(dist.clone());
        let address = self.address(site, dist.name());
        let value = dist.sample(&mut self.rng);
        let log_prob = log_prob_at(dist.as_ref(), &value, &address)?;
        trace!("sample {} = {} (log_prob {:.4})", address, value, log_prob);
        self.choices.push(RandomChoice::new(
            address,
            dist,
            value.clone(),
            log_prob,
            false,
            name.map(str::to_string),
        ));
        Ok(value)
    }

    fn address(&mut self, site: &Location<'_>, dist: &str) -> Address {
        let mut base = String::new();
        for frame in &self.frames {
            base.push_str(frame);
            base.push('/');
        }
        base.push_str(&format!(
            "{}:{}:{}__{}",
            site.file(),
            site.line(),
            site.column(),
            dist
        ));
        let n = self.occurrences.entry(base.clone()).or_insert(0);
        let occurrence = *n;
        *n += 1;
        Address::new(base, occurrence)
    }

    fn check_budget(&self) -> Result<()> {
        if let Some(mx) = self.budget.max_choices {
            if self.choices.len() >= mx {
                warn!("execution hit its budget of {} choices", mx);
                return errors::budget(&format!("more than {mx} random choices"));
            }
        }
        if let Some(timeout) = self.budget.timeout {
            let elapsed = self.started.elapsed();
            if elapsed > timeout {
                warn!("execution ran past its {:?} timeout", timeout);
                return errors::budget(&format!("ran for {elapsed:?}, limit {timeout:?}"));
            }
        }
        Ok(())
    }
}

/// NaN densities would poison every weight downstream, so they fail the
/// execution at the offending site.
fn log_prob_at(dist: &dyn Distribution, value: &Value, address: &Address) -> Result<f64> {
    let lp = dist.log_prob(value)?;
    if lp.is_nan() {
        warn!("{} has a NaN log density at {}", address, value);
        return errors::generic(&format!("NaN log density of {value} at {address}"));
    }
    Ok(lp)
}
