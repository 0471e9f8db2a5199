pub mod importance_weighting;
pub mod iters;
pub mod sampler;

pub use crate::inference::importance_weighting::*;
pub use crate::inference::iters::*;
pub use crate::inference::sampler::*;
