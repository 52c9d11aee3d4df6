//! Optional request parameters.
//!
//! Each operation that takes options has its own builder so a secret-only
//! option cannot be passed to `share`. Builders accumulate into a
//! [`FormParams`] in call order; setting a key twice keeps the last value.

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::error::ClientError;

pub(crate) const SECRET: &str = "secret";
pub(crate) const PASSPHRASE: &str = "passphrase";
pub(crate) const TTL: &str = "ttl";
pub(crate) const RECIPIENT: &str = "recipient";

/// Single-valued form parameters, encoded as
/// `application/x-www-form-urlencoded`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormParams(BTreeMap<String, String>);

impl FormParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key`, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.0.insert(key.into(), value.into());
        self
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

    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.0.iter()
    }

    /// Encode as a form body. An empty set encodes to an empty string.
    pub fn encode(&self) -> Result<String, ClientError> {
        if self.0.is_empty() {
            return Ok(String::new());
        }
        serde_qs::to_string(&self.0).map_err(ClientError::Encode)
    }

    /// Merge `other` into `self`; keys in `other` win.
    pub(crate) fn extend(&mut self, other: &FormParams) {
        for (key, value) in other.iter() {
            self.set(key.clone(), value.clone());
        }
    }

    fn set_ttl(&mut self, ttl: Duration) {
        self.set(TTL, ttl.as_secs().to_string());
    }
}

impl<'a> IntoIterator for &'a FormParams {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Options for sharing a caller-supplied secret.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShareOptions {
    params: FormParams,
}

impl ShareOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `passphrase` to reveal the secret.
    pub fn passphrase(mut self, passphrase: impl Into<String>) -> Self {
        self.params.set(PASSPHRASE, passphrase);
        self
    }

    /// Expire the secret after `ttl`, truncated to whole seconds.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.params.set_ttl(ttl);
        self
    }

    /// Have the service email the secret link to `recipient`.
    pub fn recipient(mut self, recipient: impl Into<String>) -> Self {
        self.params.set(RECIPIENT, recipient);
        self
    }

    pub fn params(&self) -> &FormParams {
        &self.params
    }
}

/// Options for having the service generate a secret.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateOptions {
    params: FormParams,
}

impl GenerateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn passphrase(mut self, passphrase: impl Into<String>) -> Self {
        self.params.set(PASSPHRASE, passphrase);
        self
    }

    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.params.set_ttl(ttl);
        self
    }

    pub fn recipient(mut self, recipient: impl Into<String>) -> Self {
        self.params.set(RECIPIENT, recipient);
        self
    }

    pub fn params(&self) -> &FormParams {
        &self.params
    }
}

/// Options for revealing a secret.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecretOptions {
    params: FormParams,
}

impl SecretOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Passphrase the secret was shared with.
    pub fn passphrase(mut self, passphrase: impl Into<String>) -> Self {
        self.params.set(PASSPHRASE, passphrase);
        self
    }

    pub fn params(&self) -> &FormParams {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(params: &FormParams) -> Vec<(&str, &str)> {
        params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }

    #[test]
    fn share_passphrase_then_ttl() {
        let opts = ShareOptions::new()
            .passphrase("x")
            .ttl(Duration::from_secs(123));
        assert_eq!(pairs(opts.params()), vec![("passphrase", "x"), ("ttl", "123")]);
    }

    #[test]
    fn disjoint_keys_are_order_independent() {
        let a = ShareOptions::new()
            .passphrase("x")
            .ttl(Duration::from_secs(123));
        let b = ShareOptions::new()
            .ttl(Duration::from_secs(123))
            .passphrase("x");
        assert_eq!(a, b);
    }

    #[test]
    fn same_key_last_write_wins() {
        let opts = GenerateOptions::new()
            .recipient("a@example.com")
            .recipient("b@example.com")
            .ttl(Duration::from_secs(10))
            .ttl(Duration::from_secs(20));
        assert_eq!(opts.params().len(), 2);
        assert_eq!(opts.params().get("recipient"), Some("b@example.com"));
        assert_eq!(opts.params().get("ttl"), Some("20"));
    }

    #[test]
    fn ttl_is_floored_to_seconds() {
        let opts = GenerateOptions::new().ttl(Duration::from_millis(59_999));
        assert_eq!(opts.params().get("ttl"), Some("59"));
    }

    #[test]
    fn secret_options_only_carry_passphrase() {
        let opts = SecretOptions::new().passphrase("open sesame");
        assert_eq!(pairs(opts.params()), vec![("passphrase", "open sesame")]);
        assert!(SecretOptions::new().params().is_empty());
    }

    #[test]
    fn extend_overwrites_existing_keys() {
        let mut base = FormParams::new();
        base.set("secret", "one").set("ttl", "1");
        base.extend(ShareOptions::new().ttl(Duration::from_secs(2)).params());
        assert_eq!(pairs(&base), vec![("secret", "one"), ("ttl", "2")]);
    }

    #[test]
    fn empty_params_encode_to_empty_body() {
        assert_eq!(FormParams::new().encode().unwrap(), "");
    }

    #[test]
    fn encoded_params_decode_back() {
        let mut params = FormParams::new();
        params
            .set("secret", "a&b=c/d")
            .set("recipient", "bob@example.com");
        let body = params.encode().unwrap();
        let decoded: BTreeMap<String, String> = serde_qs::from_str(&body).unwrap();
        assert_eq!(decoded.get("secret").map(String::as_str), Some("a&b=c/d"));
        assert_eq!(
            decoded.get("recipient").map(String::as_str),
            Some("bob@example.com")
        );
    }
}
