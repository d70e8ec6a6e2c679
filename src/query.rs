// Query qualifier for read endpoints.
//
// Every read asks for column-name keyed values (`useColumnNames=true`) so
// callers can index row values by the names they see in the doc. Extra
// options are appended in insertion order; nothing is validated here, a bad
// option comes back from the store as a remote error.
//
// `to_qualifier` is the display form. Requests are built from `query_pairs`
// so values such as page tokens get form-encoded.

use std::fmt::Display;

const COLUMN_NAMES_PARAM: &str = "useColumnNames";

/// Ordered set of `name=value` query options.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOptions {
    pairs: Vec<(String, String)>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an option, replacing an earlier value with the same name.
    pub fn set(mut self, name: impl Into<String>, value: impl Display) -> Self {
        let name = name.into();
        let value = value.to_string();
        match self.pairs.iter_mut().find(|(n, _)| *n == name) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((name, value)),
        }
        self
    }

    pub fn limit(self, limit: u32) -> Self {
        self.set("limit", limit)
    }

    pub fn page_token(self, token: &str) -> Self {
        self.set("pageToken", token)
    }

    /// Optional limit, as passed through from `--limit`.
    pub fn with_limit(self, limit: Option<u32>) -> Self {
        match limit {
            Some(n) => self.limit(n),
            None => self,
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Every pair sent with a read, the column-name directive first.
    pub fn query_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        std::iter::once((COLUMN_NAMES_PARAM, "true"))
            .chain(self.pairs.iter().map(|(n, v)| (n.as_str(), v.as_str())))
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Render the qualifier, leading `?` included.
    pub fn to_qualifier(&self) -> String {
        let pairs: Vec<String> = self
            .query_pairs()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect();
        format!("?{}", pairs.join("&"))
    }
}

impl<K: Into<String>, V: Display> FromIterator<(K, V)> for QueryOptions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(QueryOptions::new(), |opts, (k, v)| opts.set(k, v))
    }
}
