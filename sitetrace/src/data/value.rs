use crate::data::errors::{self, Result};
use itertools::*;
use std::fmt;

/// The realized value of one random choice.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Vec(Vec<Value>),
}

impl Value {
    pub fn float(&self) -> Result<f64> {
        match self {
            Value::Float(f) => Ok(*f),
            Value::Int(i) => Ok(*i as f64),
            Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
            v => errors::kind_mismatch("float", v),
        }
    }
    pub fn int(&self) -> Result<i64> {
        match self {
            Value::Int(i) => Ok(*i),
            Value::Bool(b) => Ok(*b as i64),
            // 2^63 is exact in f64, so the bounds are exact too
            Value::Float(f) if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 => {
                Ok(*f as i64)
            }
            v => errors::kind_mismatch("integer", v),
        }
    }
    pub fn bool(&self) -> Result<bool> {
        match self {
            Value::Bool(b) => Ok(*b),
            Value::Int(0) => Ok(false),
            Value::Int(1) => Ok(true),
            v => errors::kind_mismatch("boolean", v),
        }
    }
    pub fn floats(&self) -> Result<Vec<f64>> {
        match self {
            Value::Vec(vs) => vs.iter().map(Value::float).collect(),
            v => Ok(vec![v.float()?]),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Vec(vs) => write!(f, "[{}]", vs.iter().join(", ")),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}
impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}
impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}
impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}
impl From<Vec<f64>> for Value {
    fn from(fs: Vec<f64>) -> Self {
        Value::Vec(fs.into_iter().map(Value::Float).collect_vec())
    }
}
