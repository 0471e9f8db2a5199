#![allow(clippy::type_complexity)]
#![allow(clippy::too_many_arguments)]

// core types
pub mod data;
pub use data::*;

pub mod distributions;
pub use distributions::*;

// execution
pub mod engine;
pub use engine::*;

pub mod pipeline;
pub use pipeline::*;

// interface
pub mod inference;

pub mod analysis;

// extras
pub mod models;
pub mod utils;

#[cfg(test)]
mod tests;

#[cfg(test)]
extern crate quickcheck;
#[cfg(test)]
#[macro_use(quickcheck)]
extern crate quickcheck_macros;
