use std::collections::BTreeMap;

use crate::{Error, Parameters};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    /// The path was not matched by the pattern.
    Unresolved,
    Resolved,
    /// The path matched but a value could not be decoded.
    Error,
}

/// Outcome of [`UriPattern::resolve`](crate::UriPattern::resolve).
///
/// Only variables that were actually extracted are bound.
#[derive(Clone, Debug)]
pub struct ResolveResult {
    status: Status,
    bindings: BTreeMap<String, String>,
    error: Option<Error>,
}

impl ResolveResult {
    pub fn unresolved() -> Self {
        Self {
            status: Status::Unresolved,
            bindings: BTreeMap::new(),
            error: None,
        }
    }
    pub(crate) fn resolved(bindings: BTreeMap<String, String>) -> Self {
        Self {
            status: Status::Resolved,
            bindings,
            error: None,
        }
    }
    pub(crate) fn error(bindings: BTreeMap<String, String>, error: Error) -> Self {
        Self {
            status: Status::Error,
            bindings,
            error: Some(error),
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }
    pub fn is_resolved(&self) -> bool {
        self.status == Status::Resolved
    }
    /// The decoding error when the status is [`Status::Error`].
    pub fn err(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.bindings.get(name).map(String::as_str)
    }
    pub fn bindings(&self) -> &BTreeMap<String, String> {
        &self.bindings
    }
    pub fn len(&self) -> usize {
        self.bindings.len()
    }
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Bindings as expansion input for another pattern.
    pub fn to_parameters(&self) -> Parameters {
        self.iter().collect()
    }
}

impl From<ResolveResult> for Parameters {
    fn from(result: ResolveResult) -> Self {
        result.bindings.into_iter().collect()
    }
}
