//! Response mediation: body decoding, pagination links, rate-limit headers.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::{ClientError, Result};

/// Header carrying the remaining request quota.
pub const RATE_LIMIT_HEADER: &str = "X-RateLimit-Remaining";

/// A completed HTTP exchange, flattened into plain data.
///
/// Ephemeral: exists only for the duration of one request/response cycle and
/// is never persisted. Header names are stored lowercased.
#[derive(Debug, Clone)]
pub struct Envelope {
    pub status: u16,
    headers: HashMap<String, String>,
    pub body: String,
    /// The resource path (relative to the API prefix) that produced this
    /// response.
    pub resource: String,
}

impl Envelope {
    pub fn new(
        status: u16,
        headers: impl IntoIterator<Item = (String, String)>,
        body: impl Into<String>,
        resource: impl Into<String>,
    ) -> Self {
        Self {
            status,
            headers: headers
                .into_iter()
                .map(|(name, value)| (name.to_ascii_lowercase(), value))
                .collect(),
            body: body.into(),
            resource: resource.into(),
        }
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Whether the status is in the client-error or server-error class.
    pub fn is_error(&self) -> bool {
        (400..600).contains(&self.status)
    }
}

/// A decoded response body: structured JSON or raw passthrough text.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Json(Value),
    Text(String),
}

impl Content {
    /// The structured form, if the body decoded as JSON.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Text(_) => None,
        }
    }

    /// Consume into the structured form, mapping raw text to a JSON string.
    pub fn into_value(self) -> Value {
        match self {
            Self::Json(value) => value,
            Self::Text(text) => Value::String(text),
        }
    }
}

/// Decode a response body. Bodies that fail to parse as JSON are returned
/// as raw text unchanged; this never fails.
pub fn content(envelope: &Envelope) -> Content {
    match serde_json::from_str(&envelope.body) {
        Ok(value) => Content::Json(value),
        Err(_) => Content::Text(envelope.body.clone()),
    }
}

/// Parse an RFC5988-style `Link` header into a rel → URL mapping.
///
/// Returns `None` when the header is absent. Malformed entries are
/// silently skipped.
pub fn pagination(envelope: &Envelope) -> Option<HashMap<String, String>> {
    let header = envelope.header("Link")?;

    let mut links = HashMap::new();
    for entry in header.split(',') {
        if let Some((rel, url)) = parse_link_entry(entry.trim()) {
            links.insert(rel, url);
        }
    }
    Some(links)
}

/// One `<url>; rel="name"` entry.
fn parse_link_entry(entry: &str) -> Option<(String, String)> {
    let rest = entry.strip_prefix('<')?;
    let (url, params) = rest.split_once('>')?;
    let rel = params.trim().strip_prefix(';')?.trim();
    let rel = rel.strip_prefix("rel=\"")?.strip_suffix('"')?;
    Some((rel.to_string(), url.to_string()))
}

/// Raise [`ClientError::RateLimitExceeded`] if the remaining-calls header is
/// present and below 1.
pub fn api_limit(envelope: &Envelope) -> Result<()> {
    if let Some(remaining) = envelope
        .header(RATE_LIMIT_HEADER)
        .and_then(|value| value.trim().parse::<i64>().ok())
        && remaining < 1
    {
        return Err(ClientError::RateLimitExceeded {
            limit: remaining.max(0) as u64,
        });
    }
    Ok(())
}
