use std::collections::BTreeMap;

/// Multi-valued parameters, used as expansion input and as resolution output.
///
/// Values for one name keep their insertion order and are not deduplicated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Parameters {
    values: BTreeMap<String, Vec<String>>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces all values of `name` with a single value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values.insert(name.into(), vec![value.into()]);
        self
    }
    /// Replaces all values of `name`.
    pub fn set_values<I, V>(&mut self, name: impl Into<String>, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.values.insert(name.into(), values.into_iter().map(Into::into).collect());
        self
    }
    /// Appends a value after the existing values of `name`.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values.entry(name.into()).or_default().push(value.into());
        self
    }
    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        self.values.remove(name)
    }

    /// First value of `name`.
    pub fn get_value(&self, name: &str) -> Option<&str> {
        self.values.get(name)?.first().map(String::as_str)
    }
    pub fn get_values(&self, name: &str) -> Option<&[String]> {
        self.values.get(name).map(Vec::as_slice)
    }

    /// Returns `true` if `name` was set, even with no or empty values.
    pub fn exists(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }
    /// Returns `true` if the first value of `name` is not empty.
    pub fn has_value(&self, name: &str) -> bool {
        self.get_value(name).is_some_and(|v| !v.is_empty())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
    pub fn len(&self) -> usize {
        self.values.len()
    }
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for Parameters {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.add(k, v);
        }
    }
}
impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Parameters {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut p = Self::new();
        p.extend(iter);
        p
    }
}
