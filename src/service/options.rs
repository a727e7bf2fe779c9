//! Named, loosely typed service options
//!
//! Readers always supply a default: a missing option and an option holding
//! a value of another type both yield the default.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Zero-argument blocking function stored in an option
pub type WaitFn = Arc<dyn Fn() + Send + Sync>;

#[derive(Clone)]
pub enum OptionValue {
    Bool(bool),
    String(String),
    Func(WaitFn),
}

impl fmt::Debug for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            OptionValue::String(s) => f.debug_tuple("String").field(s).finish(),
            OptionValue::Func(_) => f.write_str("Func(..)"),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Bool(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::String(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        OptionValue::String(value)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Options {
    values: HashMap<String, OptionValue>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`Options::set`]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Builder-style setter for a function option
    pub fn with_func(self, name: impl Into<String>, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.with(name, OptionValue::Func(Arc::new(f)))
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<OptionValue>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.values.get(name)
    }

    pub fn get_bool(&self, name: &str, default: bool) -> bool {
        match self.values.get(name) {
            Some(OptionValue::Bool(b)) => *b,
            _ => default,
        }
    }

    pub fn get_string<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        match self.values.get(name) {
            Some(OptionValue::String(s)) => s.as_str(),
            _ => default,
        }
    }

    pub fn get_func(&self, name: &str, default: impl Fn() + Send + Sync + 'static) -> WaitFn {
        match self.values.get(name) {
            Some(OptionValue::Func(f)) => Arc::clone(f),
            _ => Arc::new(default),
        }
    }
}
