//! Tag predicates evaluated against decoded nodes.
//!
//! A [`Query`] is a conjunction of [`Predicate`]s. Each predicate names a
//! key and either an exact value or the wildcard `*`:
//!
//! ```rust
//! use routers_pbf::Query;
//!
//! let query = Query::parse(["place=city", "name:uk=*"]).unwrap();
//! assert_eq!(query.len(), 2);
//! ```
//!
//! Shell-style patterns and the node id are opt-in, through
//! [`Query::parse_glob`] or [`Predicate::id`]:
//!
//! ```rust
//! use routers_pbf::{Predicate, Query};
//!
//! let query = Query::parse_glob(["name:*=*", "place=ci*"])
//!     .unwrap()
//!     .and(Predicate::id(42));
//! assert_eq!(query.to_string(), "name:*=* place=ci* id=42");
//! ```

pub mod glob;
pub mod predicate;

#[doc(inline)]
pub use glob::Glob;
#[doc(inline)]
pub use predicate::{ID_KEY, KeyMatch, Matched, Predicate, QueryError, ValueMatch, WILDCARD};

use std::fmt;

use crate::osm::element::Node;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    predicates: Vec<Predicate>,
}

impl Query {
    pub fn new(predicates: Vec<Predicate>) -> Self {
        Query { predicates }
    }

    /// Matches every node.
    pub fn all() -> Self {
        Query::default()
    }

    /// Parses each of `terms` as a [`Predicate`].
    pub fn parse<I, S>(terms: I) -> Result<Self, QueryError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        terms
            .into_iter()
            .map(|term| term.as_ref().parse::<Predicate>())
            .collect::<Result<Vec<_>, _>>()
            .map(Query::new)
    }

    /// Parses each of `terms` with [`Predicate::parse_glob`].
    pub fn parse_glob<I, S>(terms: I) -> Result<Self, QueryError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        terms
            .into_iter()
            .map(|term| Predicate::parse_glob(term.as_ref()))
            .collect::<Result<Vec<_>, _>>()
            .map(Query::new)
    }

    pub fn and(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Whether every predicate holds for `node`.
    #[inline]
    pub fn matches(&self, node: &Node) -> bool {
        self.predicates
            .iter()
            .all(|predicate| predicate.matches(node))
    }

    /// What satisfied each predicate, in predicate order, or `None` when
    /// the node does not match.
    pub fn matched<'n>(&self, node: &'n Node) -> Option<Vec<Matched<'n>>> {
        self.predicates
            .iter()
            .map(|predicate| predicate.find(node))
            .collect()
    }
}

impl FromIterator<Predicate> for Query {
    fn from_iter<T: IntoIterator<Item = Predicate>>(iter: T) -> Self {
        Query::new(iter.into_iter().collect())
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut predicates = self.predicates.iter();
        if let Some(first) = predicates.next() {
            write!(f, "{first}")?;
            for predicate in predicates {
                write!(f, " {predicate}")?;
            }
        }

        Ok(())
    }
}
