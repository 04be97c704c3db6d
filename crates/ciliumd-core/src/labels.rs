//! Labels and label sets.
//!
//! A `Label` is a selector (`key` or `key=value`) used by rules; `Labels` is
//! the concrete label set attached to an identity.
//!
//! Selectors serialize as `"key=value"` strings. A key that itself contains
//! `=` cannot be split back out of that form, so such selectors serialize as
//! `{ "key": ..., "value": ... }` instead.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CiliumError, Result};

/// Label selector. An empty value matches any value for the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "LabelRepr", into = "LabelRepr")]
pub struct Label {
    pub key: String,
    pub value: String,
}

impl Label {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Parse `key=value` or a bare `key`. Only the first `=` separates.
    pub fn parse(s: &str) -> Result<Self> {
        let (key, value) = s.split_once('=').unwrap_or((s, ""));
        if key.is_empty() {
            return Err(CiliumError::BadRequest(format!(
                "invalid label {s:?}: empty key"
            )));
        }
        Ok(Self::new(key, value))
    }

    /// Whether `labels` carries this key (and value, when one is set).
    pub fn matches(&self, labels: &Labels) -> bool {
        match labels.get(&self.key) {
            None => false,
            Some(_) if self.value.is_empty() => true,
            Some(v) => v == self.value,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.value.is_empty() {
            f.write_str(&self.key)
        } else {
            write!(f, "{}={}", self.key, self.value)
        }
    }
}

/// Wire form of a [`Label`].
#[derive(Serialize, Deserialize)]
#[serde(untagged, deny_unknown_fields)]
enum LabelRepr {
    Text(String),
    Pair {
        key: String,
        #[serde(default)]
        value: String,
    },
}

impl TryFrom<LabelRepr> for Label {
    type Error = CiliumError;

    fn try_from(repr: LabelRepr) -> Result<Self> {
        match repr {
            LabelRepr::Text(s) => Label::parse(&s),
            LabelRepr::Pair { key, .. } if key.is_empty() => Err(CiliumError::BadRequest(
                "invalid label: empty key".into(),
            )),
            LabelRepr::Pair { key, value } => Ok(Label { key, value }),
        }
    }
}

impl From<Label> for LabelRepr {
    fn from(l: Label) -> LabelRepr {
        if l.key.contains('=') {
            LabelRepr::Pair {
                key: l.key,
                value: l.value,
            }
        } else {
            LabelRepr::Text(l.to_string())
        }
    }
}

/// Label set of an identity, ordered by key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Labels(BTreeMap<String, String>);

impl Labels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Whether every selector in `selectors` matches. Empty selects everything.
    pub fn matches_all<'a>(&self, selectors: impl IntoIterator<Item = &'a Label>) -> bool {
        selectors.into_iter().all(|l| l.matches(self))
    }
}

impl<K, V> FromIterator<(K, V)> for Labels
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
