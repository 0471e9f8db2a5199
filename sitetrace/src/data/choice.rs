use crate::data::Value;
use crate::distributions::Distribution;
use std::fmt;
use std::sync::Arc;

/// Where in the control-flow history a choice was made.
///
/// `base` names the call site (active frames, source location and
/// distribution) and is comparable across traces. `occurrence` counts how
/// many times that base was already visited in the same trace, so the pair is
/// unique within one trace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address {
    base: String,
    occurrence: usize,
}
impl Address {
    pub fn new(base: String, occurrence: usize) -> Self {
        Address { base, occurrence }
    }
    pub fn base(&self) -> &str {
        &self.base
    }
    pub fn occurrence(&self) -> usize {
        self.occurrence
    }
}
impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}__{}", self.base, self.occurrence)
    }
}

/// One intercepted `sample` or `observe` call.
#[derive(Debug, Clone)]
pub struct RandomChoice {
    address: Address,
    distribution: Arc<dyn Distribution>,
    value: Value,
    log_prob: f64,
    is_observed: bool,
    name: Option<String>,
}

impl RandomChoice {
    pub(crate) fn new(
        address: Address,
        distribution: Arc<dyn Distribution>,
        value: Value,
        log_prob: f64,
        is_observed: bool,
        name: Option<String>,
    ) -> Self {
        RandomChoice {
            address,
            distribution,
            value,
            log_prob,
            is_observed,
            name,
        }
    }
    pub fn address(&self) -> &Address {
        &self.address
    }
    pub fn distribution(&self) -> &dyn Distribution {
        self.distribution.as_ref()
    }
    pub fn value(&self) -> &Value {
        &self.value
    }
    pub fn log_prob(&self) -> f64 {
        self.log_prob
    }
    pub fn is_observed(&self) -> bool {
        self.is_observed
    }
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl PartialEq for RandomChoice {
    /// Distributions are opaque, so they compare by name only.
    fn eq(&self, o: &Self) -> bool {
        self.address == o.address
            && self.distribution.name() == o.distribution.name()
            && self.value == o.value
            && self.log_prob.to_bits() == o.log_prob.to_bits()
            && self.is_observed == o.is_observed
            && self.name == o.name
    }
}
