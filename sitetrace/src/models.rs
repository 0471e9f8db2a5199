//! Small reference models, used by the binary, the benches and the tests.
use crate::data::*;
use crate::distributions::Dist;
use crate::engine::{Engine, Model};

/// Gaussian with unknown mean, where the prior over the mean is drawn with
/// Marsaglia's polar method: a rejection loop over pairs of uniforms.
///
/// See Wood et al., "A New Approach to Probabilistic Programming Inference"
/// (AISTATS 2014).
#[derive(Debug, Clone)]
pub struct GaussianUnknownMeanMarsaglia {
    pub prior_mean: f64,
    pub prior_stddev: f64,
    pub likelihood_stddev: f64,
}

impl Default for GaussianUnknownMeanMarsaglia {
    fn default() -> Self {
        Self {
            prior_mean: 1.0,
            prior_stddev: 5.0_f64.sqrt(),
            likelihood_stddev: 2.0_f64.sqrt(),
        }
    }
}

impl GaussianUnknownMeanMarsaglia {
    fn marsaglia(&self, ctx: &mut Engine<'_>, mean: f64, stddev: f64) -> Result<f64> {
        let uniform = Dist::uniform(-1.0, 1.0)?;
        loop {
            let x = ctx.sample(&uniform)?.float()?;
            let y = ctx.sample(&uniform)?.float()?;
            let s = x * x + y * y;
            if s < 1.0 && s > 0.0 {
                return Ok(mean + stddev * (x * (-2.0 * s.ln() / s).sqrt()));
            }
        }
    }
}

impl Model for GaussianUnknownMeanMarsaglia {
    type Output = f64;

    fn name(&self) -> &str {
        "Gaussian with unknown mean (Marsaglia)"
    }

    fn forward(&self, ctx: &mut Engine<'_>) -> Result<f64> {
        let mu = ctx.scoped("marsaglia", |ctx| {
            self.marsaglia(ctx, self.prior_mean, self.prior_stddev)
        })?;
        let likelihood = Dist::normal(mu, self.likelihood_stddev)?;
        ctx.observe(&likelihood, Some("obs1"), None)?;
        ctx.observe(&likelihood, Some("obs2"), None)?;
        Ok(mu)
    }
}

/// The same model with the prior drawn directly from a Normal.
#[derive(Debug, Clone)]
pub struct GaussianUnknownMean {
    pub prior_mean: f64,
    pub prior_stddev: f64,
    pub likelihood_stddev: f64,
}

impl Default for GaussianUnknownMean {
    fn default() -> Self {
        Self {
            prior_mean: 1.0,
            prior_stddev: 5.0_f64.sqrt(),
            likelihood_stddev: 2.0_f64.sqrt(),
        }
    }
}

impl Model for GaussianUnknownMean {
    type Output = f64;

    fn name(&self) -> &str {
        "Gaussian with unknown mean"
    }

    fn forward(&self, ctx: &mut Engine<'_>) -> Result<f64> {
        let prior = Dist::normal(self.prior_mean, self.prior_stddev)?;
        let mu = ctx.sample_named(&prior, "mu")?.float()?;
        let likelihood = Dist::normal(mu, self.likelihood_stddev)?;
        ctx.observe(&likelihood, Some("obs1"), None)?;
        ctx.observe(&likelihood, Some("obs2"), None)?;
        Ok(mu)
    }
}
