use crate::data::{RandomChoice, LW};
use itertools::*;

/// The ordered record of every random choice made by one execution.
///
/// Only the engine builds traces; once handed out they are read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace<R> {
    choices: Vec<RandomChoice>,
    log_prob_sum: f64,
    log_weight: LW,
    result: R,
}

impl<R> Trace<R> {
    pub(crate) fn new(choices: Vec<RandomChoice>, log_weight: LW, result: R) -> Self {
        let log_prob_sum = choices.iter().map(RandomChoice::log_prob).sum();
        Trace {
            choices,
            log_prob_sum,
            log_weight,
            result,
        }
    }
    pub fn len(&self) -> usize {
        self.choices.len()
    }
    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }
    pub fn choices(&self) -> &[RandomChoice] {
        &self.choices
    }
    pub fn latent(&self) -> impl Iterator<Item = &RandomChoice> {
        self.choices.iter().filter(|c| !c.is_observed())
    }
    pub fn observed(&self) -> impl Iterator<Item = &RandomChoice> {
        self.choices.iter().filter(|c| c.is_observed())
    }
    pub fn named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a RandomChoice> {
        self.choices.iter().filter(move |c| c.name() == Some(name))
    }
    pub fn log_prob_sum(&self) -> f64 {
        self.log_prob_sum
    }
    pub fn log_weight(&self) -> LW {
        self.log_weight
    }
    pub fn result(&self) -> &R {
        &self.result
    }
    pub fn into_result(self) -> R {
        self.result
    }
    pub fn addresses(&self) -> Vec<String> {
        self.choices
            .iter()
            .map(|c| c.address().to_string())
            .collect_vec()
    }
}
