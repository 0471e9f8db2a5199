pub mod choice;
pub mod empirical;
pub mod errors;
pub mod observations;
pub mod trace;
pub mod value;
pub mod weight;
pub use crate::data::choice::*;
pub use crate::data::empirical::*;
pub use crate::data::errors::*;
pub use crate::data::observations::*;
pub use crate::data::trace::*;
pub use crate::data::value::*;
pub use crate::data::weight::*;

// reexports and aliases
pub use rustc_hash::{FxHashMap, FxHashSet};

pub type HashMap<K, V> = FxHashMap<K, V>;
pub type HashSet<V> = FxHashSet<V>;
