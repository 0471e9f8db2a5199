use crate::data::errors::{self, Result};
use crate::data::Value;
use rand::distributions::Distribution as RandDistribution;
use rand::rngs::StdRng;
use statrs::distribution::{Continuous, Discrete};
use std::fmt::Debug;

/// What the engine needs from a distribution: a way to draw and a density.
pub trait Distribution: Debug + Send + Sync {
    fn name(&self) -> &str;
    fn sample(&self, rng: &mut StdRng) -> Value;
    /// Log density (or mass) of `value`. Out-of-support values give `-inf`.
    fn log_prob(&self, value: &Value) -> Result<f64>;
}

/// statrs-backed distributions, validated on construction.
#[derive(Debug, Clone)]
pub enum Dist {
    Bern(statrs::distribution::Bernoulli),
    Categorical(statrs::distribution::Categorical),
    Uniform(statrs::distribution::Uniform),
    Normal(statrs::distribution::Normal),
    Beta(statrs::distribution::Beta),
    Poisson(statrs::distribution::Poisson),
}

fn checked<D>(r: std::result::Result<D, statrs::StatsError>, ctx: &str) -> Result<D> {
    r.or_else(|e| errors::invalid_dist(&format!("{ctx}: {e}")))
}

impl Dist {
    pub fn bern(p: f64) -> Result<Dist> {
        let d = statrs::distribution::Bernoulli::new(p);
        Ok(Dist::Bern(checked(d, &format!("bern({p})"))?))
    }
    pub fn categorical(ps: &[f64]) -> Result<Dist> {
        let d = statrs::distribution::Categorical::new(ps);
        Ok(Dist::Categorical(checked(d, &format!("categorical({ps:?})"))?))
    }
    pub fn uniform(lo: f64, hi: f64) -> Result<Dist> {
        let d = statrs::distribution::Uniform::new(lo, hi);
        Ok(Dist::Uniform(checked(d, &format!("uniform({lo}, {hi})"))?))
    }
    pub fn normal(mean: f64, sd: f64) -> Result<Dist> {
        let d = statrs::distribution::Normal::new(mean, sd);
        Ok(Dist::Normal(checked(d, &format!("normal({mean}, {sd})"))?))
    }
    pub fn beta(a: f64, b: f64) -> Result<Dist> {
        let d = statrs::distribution::Beta::new(a, b);
        Ok(Dist::Beta(checked(d, &format!("beta({a}, {b})"))?))
    }
    pub fn poisson(lambda: f64) -> Result<Dist> {
        let d = statrs::distribution::Poisson::new(lambda);
        Ok(Dist::Poisson(checked(d, &format!("poisson({lambda})"))?))
    }
}

fn count(value: &Value) -> Result<Option<u64>> {
    let i = value.int()?;
    Ok(u64::try_from(i).ok())
}

impl Distribution for Dist {
    fn name(&self) -> &str {
        match self {
            Dist::Bern(_) => "Bernoulli",
            Dist::Categorical(_) => "Categorical",
            Dist::Uniform(_) => "Uniform",
            Dist::Normal(_) => "Normal",
            Dist::Beta(_) => "Beta",
            Dist::Poisson(_) => "Poisson",
        }
    }

    fn sample(&self, rng: &mut StdRng) -> Value {
        match self {
            Dist::Bern(d) => Value::Bool(RandDistribution::<f64>::sample(d, rng) == 1.0),
            Dist::Categorical(d) => Value::Int(RandDistribution::<f64>::sample(d, rng) as i64),
            Dist::Poisson(d) => Value::Int(RandDistribution::<f64>::sample(d, rng) as i64),
            Dist::Uniform(d) => Value::Float(RandDistribution::<f64>::sample(d, rng)),
            Dist::Normal(d) => Value::Float(RandDistribution::<f64>::sample(d, rng)),
            Dist::Beta(d) => Value::Float(RandDistribution::<f64>::sample(d, rng)),
        }
    }

    fn log_prob(&self, value: &Value) -> Result<f64> {
        let lp = match self {
            Dist::Bern(d) => match value.bool() {
                Ok(b) => d.ln_pmf(b as u64),
                Err(_) => match count(value)? {
                    Some(k) => d.ln_pmf(k),
                    None => f64::NEG_INFINITY,
                },
            },
            Dist::Categorical(d) => match count(value)? {
                Some(k) => d.ln_pmf(k),
                None => f64::NEG_INFINITY,
            },
            Dist::Poisson(d) => match count(value)? {
                Some(k) => d.ln_pmf(k),
                None => f64::NEG_INFINITY,
            },
            Dist::Uniform(d) => d.ln_pdf(value.float()?),
            Dist::Normal(d) => d.ln_pdf(value.float()?),
            Dist::Beta(d) => d.ln_pdf(value.float()?),
        };
        Ok(lp)
    }
}
