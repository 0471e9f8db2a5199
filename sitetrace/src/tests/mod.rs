use crate::data::errors;
use crate::distributions::*;
use crate::engine::*;
use crate::inference::*;
use crate::*;

use tracing_test::*;

mod analytics;
mod properties;

/// Fails whenever a fair coin comes up heads.
pub fn flaky_model() -> FnModel<impl Fn(&mut Engine<'_>) -> Result<bool> + Sync> {
    model_fn("flaky", |ctx| {
        let coin = Dist::bern(0.5)?;
        let heads = ctx.sample(&coin)?.bool()?;
        if heads {
            errors::generic("heads")
        } else {
            Ok(heads)
        }
    })
}

/// Draws until the uniform lands under 0.1, never observing anything.
pub fn geometric_model() -> FnModel<impl Fn(&mut Engine<'_>) -> Result<usize> + Sync> {
    model_fn("geometric", |ctx| {
        let u = Dist::uniform(0.0, 1.0)?;
        let mut n = 1;
        while ctx.sample(&u)?.float()? >= 0.1 {
            n += 1;
        }
        Ok(n)
    })
}

#[test]
fn run_once_with_entropy() {
    let model = models::GaussianUnknownMean::default();
    let t = run(&model).unwrap();
    assert_eq!(t.len(), 3);
    assert_eq!(t.log_weight(), LW(0.0));
    assert_eq!(t.latent().count(), 1);
    assert_eq!(t.named("mu").count(), 1);
}

#[test]
#[traced_test]
fn failed_execution_is_logged_and_discarded() {
    let model = model_fn("fails", |ctx| {
        ctx.sample(&Dist::normal(0.0, 1.0)?)?;
        errors::generic::<()>("boom")
    });
    let r = run_with(&model, Mode::Prior, &Options::seed(0));
    assert_eq!(r, Err(InferenceError::ModelExecution("boom".to_string())));
    assert!(logs_contain("discarding partial trace of 1 choices"));
}
