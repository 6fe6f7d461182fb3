//! Shopify webhook header names and the header collection handed over by
//! extraction strategies.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Dot-delimited domain of the store that sent the webhook.
pub const SHOP_DOMAIN: &str = "X-Shopify-Shop-Domain";

/// HMAC signature computed by Shopify over the raw request body.
pub const HMAC_SHA256: &str = "X-Shopify-Hmac-Sha256";

/// Event topic, e.g. `orders/create`.
pub const TOPIC: &str = "X-Shopify-Topic";

/// Header name to header value mapping as received from the host framework.
///
/// Names are stored with whatever casing the strategy supplied. Host
/// frameworks disagree on casing (hyper lower-cases everything, some
/// serverless runtimes keep the sender's casing), so [`get`](Self::get)
/// first tries an exact match and then falls back to an ASCII
/// case-insensitive comparison.
///
/// When the same name was inserted with two different casings the exact
/// match wins; otherwise which of the variants is returned is unspecified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WebhookAttributes(HashMap<String, String>);

impl WebhookAttributes {
    /// Create an empty attribute collection
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Create an empty attribute collection with room for `capacity` headers
    pub fn with_capacity(capacity: usize) -> Self {
        Self(HashMap::with_capacity(capacity))
    }

    /// Look up a header value, tolerating differences in name casing.
    pub fn get(&self, name: &str) -> Option<&str> {
        if let Some(value) = self.0.get(name) {
            return Some(value.as_str());
        }

        self.0
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Check whether a header is present under any casing
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Insert a header, returning the previous value stored under exactly
    /// the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(name.into(), value.into())
    }

    /// Number of headers
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(name, value)` pairs in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Borrow the underlying map
    pub fn as_map(&self) -> &HashMap<String, String> {
        &self.0
    }

    /// Consume the collection and return the underlying map
    pub fn into_inner(self) -> HashMap<String, String> {
        self.0
    }
}

impl From<HashMap<String, String>> for WebhookAttributes {
    fn from(map: HashMap<String, String>) -> Self {
        Self(map)
    }
}

impl<K, V> FromIterator<(K, V)> for WebhookAttributes
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
#[path = "headers_tests.rs"]
mod tests;
