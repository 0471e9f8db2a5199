use crate::data::*;
use crate::engine::Model;
use crate::inference::sampler::*;
use crate::pipeline::Options;
use crate::utils::render::*;
use itertools::*;
use tracing::*;

impl<R> TraceBatch<R> {
    /// Self-normalized importance-weighted distribution over the results.
    pub fn into_empirical(self) -> Result<Empirical<R>> {
        let lws = self.log_weights();
        let values = self.into_traces().into_iter().map(Trace::into_result).collect_vec();
        Empirical::new(values, lws)
    }
}

impl<'m, M: Model> Sampler<'m, M> {
    /// Unweighted draws from the prior over results.
    pub fn prior(&self, steps: usize) -> Result<Empirical<M::Output>> {
        self.prior_traces(steps)?.into_empirical()
    }

    /// Likelihood-weighted draws: latent choices come from the prior, each
    /// trace is weighted by the likelihood of the observed values.
    pub fn posterior(
        &self,
        steps: usize,
        observe: &ObservationSet,
    ) -> Result<Empirical<M::Output>> {
        let batch = self.posterior_traces(steps, observe)?;
        let lws = batch.log_weights();
        if steps < 1001 {
            trace!(
                "log_weights = {}",
                renderfloats(&lws.iter().map(LW::val).collect_vec(), false)
            );
        }
        debug!("log ∑[w]: {}", log_sum_exp(&lws).log_render());
        let e = batch.into_empirical()?;
        debug!("ess: {:.2} of {}", e.effective_sample_size(), e.len());
        Ok(e)
    }
}

pub fn importance_weighting<M: Model>(
    steps: usize,
    model: &M,
    observe: &ObservationSet,
    opt: &Options,
) -> Result<Empirical<M::Output>> {
    Sampler::new(model, opt.clone()).posterior(steps, observe)
}

pub fn prior<M: Model>(steps: usize, model: &M, opt: &Options) -> Result<Empirical<M::Output>> {
    Sampler::new(model, opt.clone()).prior(steps)
}
