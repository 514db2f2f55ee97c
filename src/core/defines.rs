//! Preprocessor define sets.
//!
//! Defines are collected from several sources (exporter defaults, modules,
//! the target kind, the user) and merged in that order. A later source
//! replaces the value of an earlier one but keeps its original position, so
//! the emitted list stays stable across exports.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A preprocessor define as written in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Define {
    /// `"FOO"` or `"FOO=bar"`
    Flag(String),
    /// `{ name = "FOO", value = "bar" }`
    KeyValue { name: String, value: String },
}

impl Define {
    /// Split into `(name, value)`; a bare flag has an empty value.
    pub fn into_pair(self) -> (String, String) {
        match self {
            Define::Flag(text) => match text.split_once('=') {
                Some((name, value)) => (name.trim().to_string(), value.trim().to_string()),
                None => (text.trim().to_string(), String::new()),
            },
            Define::KeyValue { name, value } => (name, value),
        }
    }
}

/// An ordered, last-writer-wins set of preprocessor defines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Define>", into = "Vec<Define>")]
pub struct Defines {
    entries: Vec<(String, String)>,
}

impl Defines {
    pub fn new() -> Self {
        Defines::default()
    }

    /// Set `name` to `value`, replacing any earlier value in place.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();

        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Builder-style [`Defines::set`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Look up the value of a define.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Merge `other` on top of `self`.
    pub fn merge(&mut self, other: &Defines) {
        for (name, value) in &other.entries {
            self.set(name.clone(), value.clone());
        }
    }

    /// Return `self` with `other` merged on top.
    pub fn merged(mut self, other: &Defines) -> Defines {
        self.merge(other);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render as `NAME` / `NAME=value` items joined by `separator`.
    pub fn join(&self, separator: &str) -> String {
        self.entries
            .iter()
            .map(|(name, value)| {
                if value.is_empty() {
                    name.clone()
                } else {
                    format!("{}={}", name, value)
                }
            })
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// Replace every `${NAME}` token in `text` with the value of define `NAME`.
    ///
    /// Unknown tokens are left untouched.
    pub fn replace_tokens(&self, text: &str) -> String {
        let mut result = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(start) = rest.find("${") {
            result.push_str(&rest[..start]);
            let after = &rest[start + 2..];

            match after.find('}') {
                Some(end) => {
                    let name = &after[..end];
                    match self.get(name) {
                        Some(value) => result.push_str(value),
                        None => result.push_str(&rest[start..start + 2 + end + 1]),
                    }
                    rest = &after[end + 1..];
                }
                None => {
                    result.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }

        result.push_str(rest);
        result
    }
}

impl From<Vec<Define>> for Defines {
    fn from(defines: Vec<Define>) -> Self {
        let mut set = Defines::new();
        for define in defines {
            let (name, value) = define.into_pair();
            if !name.is_empty() {
                set.set(name, value);
            }
        }
        set
    }
}

impl From<Defines> for Vec<Define> {
    fn from(defines: Defines) -> Self {
        defines
            .entries
            .into_iter()
            .map(|(name, value)| Define::KeyValue { name, value })
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Defines {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = Defines::new();
        for (name, value) in iter {
            set.set(name, value);
        }
        set
    }
}

impl fmt::Display for Defines {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.join(";"))
    }
}
