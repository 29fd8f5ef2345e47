//! Per-resource API handlers and the shared handler contract.
//!
//! Every handler borrows the [`Gateway`](crate::Gateway) it was resolved
//! from (back-reference, not ownership) and is stateless beyond its per-page
//! setting. Semantic success of a completed call is checked by the shared
//! validators in this module.

mod cache;
mod cron;
mod node;
mod term;
mod user;
mod watchdog;

pub use cache::CacheApi;
pub use cron::CronApi;
pub use node::NodeApi;
pub use term::TermApi;
pub use user::UserApi;
pub use watchdog::WatchdogApi;

use percent_encoding::{AsciiSet, CONTROLS, percent_encode};
use serde_json::Value;

use crate::Gateway;
use crate::error::{ClientError, Result};
use crate::mediator::Content;

/// Default page size for filtered collection queries.
pub const DEFAULT_PER_PAGE: u64 = 30;

/// The capability contract every sub-API handler satisfies, built in or
/// registered as an extension.
pub trait RemoteApi {
    /// The canonical resource name this handler serves.
    fn name(&self) -> &'static str;

    /// Page size used for filtered collection queries.
    fn per_page(&self) -> u64;

    fn set_per_page(&mut self, per_page: u64);
}

/// Factory signature for extension sub-APIs: constructible from a gateway,
/// producing a handler bound to it.
pub type ApiFactory = for<'g> fn(&'g Gateway) -> Box<dyn RemoteApi + 'g>;

/// Characters percent-encoded in URL path segments built from
/// caller-supplied identifiers, per RFC 3986 section 3.3 plus the
/// characters that would break path or query parsing.
const PATH_SEGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'%')
    .add(b'/')
    .add(b'?')
    .add(b'#')
    .add(b'[')
    .add(b']');

/// Percent-encode a string for safe use as a URL path segment.
pub fn encode_path_segment(segment: &str) -> String {
    percent_encode(segment.as_bytes(), PATH_SEGMENT_ENCODE_SET).to_string()
}

/// Confirm the logical response code is 200.
///
/// A body carrying an `id` is treated as success regardless of
/// `response_code`; one backend API style omits status codes entirely and
/// this quirk compensates for it. Preserved literally.
pub fn confirm_status_200(content: &Content) -> Result<()> {
    let Some(json) = content.as_json() else {
        return Ok(());
    };
    if json.get("id").is_some() {
        return Ok(());
    }
    if let Some(code) = json.get("response_code")
        && !is_code_200(code)
    {
        let message = json
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default();
        return Err(ClientError::ResponseCode(message.to_string()));
    }
    Ok(())
}

fn is_code_200(code: &Value) -> bool {
    code.as_i64() == Some(200) || code.as_str() == Some("200")
}

/// Confirm a filtered-collection response and return its entries.
///
/// Fails when the expected `list` key is absent.
pub fn confirm_filter_list(content: &Content) -> Result<Vec<Value>> {
    content
        .as_json()
        .and_then(|json| json.get("list"))
        .and_then(Value::as_array)
        .cloned()
        .ok_or_else(|| {
            ClientError::ResponseCode(format!(
                "filter list not present: {}",
                render(content)
            ))
        })
}

/// Confirm a deletion yielded an empty collection.
pub fn confirm_deletion(content: &Content) -> Result<()> {
    match content.as_json() {
        Some(Value::Array(entries)) if entries.is_empty() => Ok(()),
        _ => Err(ClientError::Deletion(render(content))),
    }
}

/// Resolve an entity id through a filtered collection query.
///
/// Issues `GET {path}?parameters[{field}]={value}&limit={per_page}` and
/// takes the id of the first matching entry.
pub(crate) fn lookup_entity_id(
    gateway: &Gateway,
    path: &str,
    field: &str,
    value: &str,
    per_page: u64,
) -> Result<String> {
    let query = vec![
        (format!("parameters[{field}]"), value.to_string()),
        ("limit".to_string(), per_page.to_string()),
    ];
    let content = gateway.request(reqwest::Method::GET, path, &query, None)?;
    let list = confirm_filter_list(&content)?;

    list.first().and_then(entity_id).ok_or_else(|| {
        ClientError::ResponseCode(format!(
            "no entity at {path} matched {field} \"{value}\""
        ))
    })
}

/// Extract an entity id from a decoded body, numeric or string form.
pub(crate) fn entity_id(value: &Value) -> Option<String> {
    match value.get("id")? {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn render(content: &Content) -> String {
    match content {
        Content::Json(value) => value.to_string(),
        Content::Text(text) => text.clone(),
    }
}
