//! Ordered filter parameters.
//!
//! Predicates appear in the WHERE clause in the order their keys appear
//! here, so the parameter set is an explicit list of pairs rather than a hash
//! map.

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use std::fmt;

/// Reserved keys controlling ordering and pagination.
pub const ORDER: &str = "order";
pub const DIRECTION: &str = "direction";
pub const LIMIT: &str = "limit";
pub const OFFSET: &str = "offset";

/// `direction` value selecting ascending order; anything else is descending.
pub const ASCENDING: &str = "ascending";

/// Ordered key/value filter parameters, as they arrive in a query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an `application/x-www-form-urlencoded` query string (without `?`).
    ///
    /// A repeated key keeps its first position and takes the last value.
    pub fn parse(query: &str) -> Self {
        url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect()
    }

    /// Set `key`. An existing key keeps its position and gets the new value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.pairs.push((key, value)),
        }
        self
    }

    /// Chainable [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// The reserved ordering/pagination keys.
    pub fn special(&self) -> SpecialParams<'_> {
        SpecialParams {
            order: self.non_empty(ORDER),
            direction: self.non_empty(DIRECTION),
            limit: self.non_empty(LIMIT),
            offset: self.non_empty(OFFSET),
        }
    }

    /// An empty value counts as absent.
    fn non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        params.extend(iter);
        params
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for QueryParams {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<'de> Deserialize<'de> for QueryParams {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ParamsVisitor;

        impl<'de> Visitor<'de> for ParamsVisitor {
            type Value = QueryParams;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of string parameters")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<QueryParams, A::Error> {
                let mut params = QueryParams::new();
                while let Some((k, v)) = map.next_entry::<String, String>()? {
                    params.insert(k, v);
                }
                Ok(params)
            }
        }

        deserializer.deserialize_map(ParamsVisitor)
    }
}

/// Reserved parameters, each `None` when missing or empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpecialParams<'a> {
    pub order: Option<&'a str>,
    pub direction: Option<&'a str>,
    pub limit: Option<&'a str>,
    pub offset: Option<&'a str>,
}

impl SpecialParams<'_> {
    /// Whether an ORDER BY clause is emitted.
    pub fn has_ordering(&self) -> bool {
        self.order.is_some() || self.direction.is_some()
    }

    /// Column to order by; `id` unless `order` is given.
    pub fn order_column(&self) -> &str {
        self.order.unwrap_or("id")
    }

    pub fn is_ascending(&self) -> bool {
        self.direction == Some(ASCENDING)
    }
}
