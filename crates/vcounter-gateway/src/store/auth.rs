//! Cosmos DB master-key request signing.
//!
//! Token = urlencode("type=master&ver=1.0&sig=" + base64(HMAC-SHA256(key, payload)))
//! where payload is `verb\nresource_type\nresource_link\ndate\n\n` with verb,
//! resource type and date lowercased. The resource link keeps its case.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use ring::hmac;

use vcounter_core::error::{CounterError, Result};

pub struct MasterKey {
    key: hmac::Key,
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MasterKey(..)")
    }
}

impl MasterKey {
    /// Decode the base64 account key.
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let raw = STANDARD
            .decode(encoded.trim())
            .map_err(|e| CounterError::Config(format!("store.key is not valid base64: {e}")))?;
        Ok(Self { key: hmac::Key::new(hmac::HMAC_SHA256, &raw) })
    }

    /// Value for the `authorization` header.
    pub fn token(&self, verb: &str, resource_type: &str, resource_link: &str, date: &str) -> String {
        let payload = format!(
            "{}\n{}\n{}\n{}\n\n",
            verb.to_lowercase(),
            resource_type.to_lowercase(),
            resource_link,
            date.to_lowercase()
        );
        let sig = STANDARD.encode(hmac::sign(&self.key, payload.as_bytes()).as_ref());
        urlencoding::encode(&format!("type=master&ver=1.0&sig={sig}")).into_owned()
    }
}

/// RFC 1123 date as the `x-ms-date` header expects.
pub fn http_date(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}
