use crate::data::{HashMap, Value};

/// Fixed values for named `observe` sites, supplied once per inference run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationSet(HashMap<String, Value>);

impl ObservationSet {
    pub fn new() -> Self {
        Default::default()
    }
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }
    pub fn insert(&mut self, name: &str, value: impl Into<Value>) {
        self.0.insert(name.to_string(), value.into());
    }
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl<S: Into<String>, V: Into<Value>> FromIterator<(S, V)> for ObservationSet {
    fn from_iter<I: IntoIterator<Item = (S, V)>>(iter: I) -> Self {
        ObservationSet(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
