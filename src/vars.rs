use std::borrow::{Borrow, Cow};
use std::cmp::Eq;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use crate::Parameters;

/// Source of variable values for expansion.
///
/// `None` means the variable is absent. `Some` with an empty slice means the
/// variable is present without values.
pub trait Vars {
    fn values(&self, name: &str) -> Option<Cow<'_, [String]>>;
}

impl<T: Vars + ?Sized> Vars for &T {
    fn values(&self, name: &str) -> Option<Cow<'_, [String]>> {
        (**self).values(name)
    }
}
impl Vars for () {
    fn values(&self, _name: &str) -> Option<Cow<'_, [String]>> {
        None
    }
}
impl Vars for Parameters {
    fn values(&self, name: &str) -> Option<Cow<'_, [String]>> {
        Some(Cow::Borrowed(self.get_values(name)?))
    }
}
impl<K, V> Vars for HashMap<K, V>
where
    K: Borrow<str> + Hash + Eq,
    V: AsRef<str>,
{
    fn values(&self, name: &str) -> Option<Cow<'_, [String]>> {
        Some(Cow::Owned(vec![self.get(name)?.as_ref().to_string()]))
    }
}
impl<K, V> Vars for BTreeMap<K, V>
where
    K: Borrow<str> + Ord,
    V: AsRef<str>,
{
    fn values(&self, name: &str) -> Option<Cow<'_, [String]>> {
        Some(Cow::Owned(vec![self.get(name)?.as_ref().to_string()]))
    }
}
impl Vars for [(&str, &str)] {
    fn values(&self, name: &str) -> Option<Cow<'_, [String]>> {
        let values: Vec<String> = self
            .iter()
            .filter(|(k, _)| *k == name)
            .map(|(_, v)| v.to_string())
            .collect();
        (!values.is_empty()).then_some(Cow::Owned(values))
    }
}
impl<const N: usize> Vars for [(&str, &str); N] {
    fn values(&self, name: &str) -> Option<Cow<'_, [String]>> {
        self.as_slice().values(name)
    }
}
