//! Request header map.
//!
//! Header names are stored exactly as they arrived on the wire. Lookups are
//! case-sensitive, so `Host` and `host` are two distinct entries; a client
//! sending both gets two keys rather than one merged value. Inserting a name
//! that is already present replaces its value (last write wins).

use std::fmt;

/// A mapping from header name to header value with unique, case-sensitive keys.
///
/// # Examples
///
/// ```
/// use httpserve::http::Headers;
///
/// let mut headers = Headers::new();
/// headers.insert("X-Test", "v1");
/// headers.insert("X-Test", "v2");
///
/// assert_eq!(headers.get("X-Test"), Some("v2"));
/// assert_eq!(headers.get("x-test"), None);
/// assert_eq!(headers.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Headers {
    inner: Vec<(String, String)>,
}

impl Headers {
    /// Creates an empty header map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a header map with pre-allocated capacity for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Vec::with_capacity(capacity),
        }
    }

    /// Sets `name` to `value`, replacing any previous value stored under the
    /// exact same name.
    ///
    /// Returns the replaced value, if there was one.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let name = name.into();
        let value = value.into();
        match self.inner.iter_mut().find(|(k, _)| *k == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.inner.push((name, value));
                None
            }
        }
    }

    /// Returns the value stored under `name`, or `None`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Removes the entry stored under `name`, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let pos = self.inner.iter().position(|(k, _)| k == name)?;
        Some(self.inner.remove(pos).1)
    }

    /// Returns `true` if the map contains an entry for `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.inner.iter().any(|(k, _)| k == name)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns an iterator over all `(name, value)` pairs.
    ///
    /// Iteration order is the order names were first inserted, but callers
    /// must not rely on it.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

// Two maps are equal when they hold the same entries, whatever the order.
impl PartialEq for Headers {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl Eq for Headers {}

impl<K, V> FromIterator<(K, V)> for Headers
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (k, v) in iter {
            headers.insert(k, v);
        }
        headers
    }
}

impl fmt::Display for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.inner {
            write!(f, "{name}: {value}\r\n")?;
        }
        Ok(())
    }
}
