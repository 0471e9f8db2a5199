use thiserror::Error;

#[derive(Clone, PartialEq, Debug, Error)]
pub enum InferenceError {
    #[error("no observed value for {name:?} at {address}")]
    MissingObservation { name: Option<String>, address: String },
    #[error("model execution failed: {0}")]
    ModelExecution(String),
    #[error("invalid trace batch: {0}")]
    InvalidTraceBatch(String),
    #[error("invalid distribution: {0}")]
    InvalidDistribution(String),
    #[error("execution budget exceeded: {0}")]
    BudgetExceeded(String),
    #[error("{failed} executions failed (limit {limit}), last error: {last}")]
    TooManyFailures {
        failed: usize,
        limit: usize,
        last: Box<InferenceError>,
    },
}
impl InferenceError {
    pub fn errtype(&self) -> &'static str {
        use InferenceError::*;
        match self {
            MissingObservation { .. } => "MissingObservationError",
            ModelExecution(_) => "ModelExecutionError",
            InvalidTraceBatch(_) => "InvalidTraceBatchError",
            InvalidDistribution(_) => "InvalidDistributionError",
            BudgetExceeded(_) => "BudgetExceededError",
            TooManyFailures { .. } => "TooManyFailuresError",
        }
    }
}

pub type Result<T> = core::result::Result<T, InferenceError>;

pub fn generic<T>(s: &str) -> Result<T> {
    Err(InferenceError::ModelExecution(s.to_string()))
}
pub fn missing<T>(name: Option<&str>, address: &str) -> Result<T> {
    Err(InferenceError::MissingObservation {
        name: name.map(str::to_string),
        address: address.to_string(),
    })
}
pub fn invalid_batch<T>(s: &str) -> Result<T> {
    Err(InferenceError::InvalidTraceBatch(s.to_string()))
}
pub fn invalid_dist<T>(s: &str) -> Result<T> {
    Err(InferenceError::InvalidDistribution(s.to_string()))
}
pub fn budget<T>(s: &str) -> Result<T> {
    Err(InferenceError::BudgetExceeded(s.to_string()))
}
pub fn kind_mismatch<T>(expected: &str, got: &crate::Value) -> Result<T> {
    Err(InferenceError::ModelExecution(format!(
        "expected a {expected} value, got {got:?}"
    )))
}
