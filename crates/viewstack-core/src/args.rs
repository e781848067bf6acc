//! # Argument Bag
//!
//! Opaque key-value arguments handed to controller factories.
//!
//! The navigator never inspects these. Keys are kept in a `BTreeMap` so
//! iteration (and therefore anything a controller derives from it) is
//! deterministic.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single argument value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgValue {
    Bool(bool),
    Int(i64),
    Text(String),
    List(Vec<ArgValue>),
}

impl ArgValue {
    /// Parse a value from its command-line spelling.
    ///
    /// `true`/`false` become booleans, anything that parses as `i64`
    /// becomes an integer, everything else is text.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "true" => Self::Bool(true),
            "false" => Self::Bool(false),
            _ => raw
                .parse::<i64>()
                .map(Self::Int)
                .unwrap_or_else(|_| Self::Text(raw.to_string())),
        }
    }
}

impl From<bool> for ArgValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for ArgValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for ArgValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

/// Ordered argument bag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Args {
    values: BTreeMap<String, ArgValue>,
}

impl Args {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ArgValue>) {
        self.values.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ArgValue> {
        self.values.get(key)
    }

    /// Text value for `key`, if present and textual.
    #[must_use]
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.values.get(key) {
            Some(ArgValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    /// Integer value for `key`, if present and integral.
    #[must_use]
    pub fn int(&self, key: &str) -> Option<i64> {
        match self.values.get(key) {
            Some(ArgValue::Int(n)) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn flag(&self, key: &str) -> bool {
        matches!(self.values.get(key), Some(ArgValue::Bool(true)))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ArgValue)> {
        self.values.iter()
    }
}

impl<K: Into<String>, V: Into<ArgValue>> FromIterator<(K, V)> for Args {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut args = Self::new();
        for (k, v) in iter {
            args.insert(k, v);
        }
        args
    }
}

// =============================================================================
// TESTS
// =============================================================================
