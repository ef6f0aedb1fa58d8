use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::glob::Glob;
use crate::osm::element::{Node, TagString};

/// Matches any value of a key
pub const WILDCARD: &str = "*";

/// Name under which the node id is exposed to glob predicates
pub const ID_KEY: &str = "id";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("predicate {0:?} has an empty key")]
    EmptyKey(String),

    #[error("invalid pattern {0:?}: {1}")]
    InvalidPattern(String, String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyMatch {
    /// A tag with exactly this key
    Tag(String),
    /// The node id rather than a tag
    Id,
    /// Tags whose key matches the pattern, and the node id when the
    /// pattern matches [`ID_KEY`]
    Glob(Glob),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueMatch {
    Any,
    Exact(String),
    Glob(Glob),
}

impl ValueMatch {
    #[inline]
    fn is_match(&self, value: &str) -> bool {
        match self {
            ValueMatch::Any => true,
            ValueMatch::Exact(expected) => value == expected.as_str(),
            ValueMatch::Glob(glob) => glob.is_match(value),
        }
    }
}

/// What satisfied a predicate on a particular node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matched<'n> {
    Id(i64),
    Tag(&'n TagString, &'n TagString),
}

/// A single test against a node. Plain `key=value` and `key=*` predicates
/// compare exactly and case-sensitively. Globs and the node id are only
/// matched when asked for through [`Predicate::glob`],
/// [`Predicate::parse_glob`] or [`Predicate::id`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Predicate {
    pub key: KeyMatch,
    pub value: ValueMatch,
}

impl Predicate {
    pub fn exact(key: impl Into<String>, value: impl Into<String>) -> Self {
        Predicate {
            key: KeyMatch::Tag(key.into()),
            value: ValueMatch::Exact(value.into()),
        }
    }

    pub fn any(key: impl Into<String>) -> Self {
        Predicate {
            key: KeyMatch::Tag(key.into()),
            value: ValueMatch::Any,
        }
    }

    /// Matches the node with this id.
    pub fn id(id: i64) -> Self {
        Predicate {
            key: KeyMatch::Id,
            value: ValueMatch::Exact(id.to_string()),
        }
    }

    /// Matches a tag whose key and value fit the patterns, or the node id
    /// when `key` fits [`ID_KEY`].
    pub fn glob(key: &str, value: &str) -> Result<Self, QueryError> {
        if key.is_empty() {
            return Err(QueryError::EmptyKey(format!("{key}={value}")));
        }

        Ok(Predicate {
            key: KeyMatch::Glob(Glob::new(key)?),
            value: ValueMatch::Glob(Glob::new(value)?),
        })
    }

    /// Parses `term` like [`FromStr`], but reads both sides as patterns.
    pub fn parse_glob(term: &str) -> Result<Self, QueryError> {
        let (key, value) = split(term)?;
        Predicate::glob(key, value)
    }

    #[inline]
    pub fn matches(&self, node: &Node) -> bool {
        self.find(node).is_some()
    }

    /// What satisfied this predicate, if anything. When a glob key matches
    /// several tags, the smallest key is reported.
    pub fn find<'n>(&self, node: &'n Node) -> Option<Matched<'n>> {
        match &self.key {
            KeyMatch::Tag(key) => {
                let (key, value) = node.tags.entry(key)?;
                self.value
                    .is_match(value)
                    .then_some(Matched::Tag(key, value))
            }
            KeyMatch::Id => self
                .value
                .is_match(&node.id.to_string())
                .then_some(Matched::Id(node.id)),
            KeyMatch::Glob(glob) => {
                if glob.is_match(ID_KEY) && self.value.is_match(&node.id.to_string()) {
                    return Some(Matched::Id(node.id));
                }

                node.tags
                    .iter()
                    .filter(|(key, value)| glob.is_match(key) && self.value.is_match(value))
                    .min_by_key(|(key, _)| *key)
                    .map(|(key, value)| Matched::Tag(key, value))
            }
        }
    }
}

/// Splits on the first `=`. A bare key stands for `key=*`.
fn split(term: &str) -> Result<(&str, &str), QueryError> {
    let (key, value) = term.split_once('=').unwrap_or((term, WILDCARD));

    if key.is_empty() {
        return Err(QueryError::EmptyKey(term.to_string()));
    }

    Ok((key, value))
}

impl FromStr for Predicate {
    type Err = QueryError;

    /// Accepts `key=value`, `key=*` and a bare `key`, which is the same as
    /// `key=*`. Only the first `=` separates key from value.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, value) = split(s)?;

        Ok(match value {
            WILDCARD => Predicate::any(key),
            value => Predicate::exact(key, value),
        })
    }
}

impl fmt::Display for KeyMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyMatch::Tag(key) => f.write_str(key),
            KeyMatch::Id => f.write_str(ID_KEY),
            KeyMatch::Glob(glob) => write!(f, "{glob}"),
        }
    }
}

impl fmt::Display for ValueMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueMatch::Any => f.write_str(WILDCARD),
            ValueMatch::Exact(value) => f.write_str(value),
            ValueMatch::Glob(glob) => write!(f, "{glob}"),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}
