//! Content node sub-API.

use reqwest::Method;
use serde_json::Value;

use super::{
    DEFAULT_PER_PAGE, RemoteApi, confirm_deletion, confirm_status_200, encode_path_segment,
    entity_id, lookup_entity_id,
};
use crate::Gateway;
use crate::error::{ClientError, Result};

/// Handler for node create/delete over the remote API.
pub struct NodeApi<'g> {
    gateway: &'g Gateway,
    per_page: u64,
}

impl<'g> NodeApi<'g> {
    pub fn new(gateway: &'g Gateway) -> Self {
        Self {
            gateway,
            per_page: DEFAULT_PER_PAGE,
        }
    }

    /// Create a node from a free-form field map and return the decoded
    /// response body.
    pub fn create(&self, node: &Value) -> Result<Value> {
        let content = self.gateway.request(Method::POST, "/node", &[], Some(node))?;
        confirm_status_200(&content)?;
        Ok(content.into_value())
    }

    /// Delete a node, resolving its id by title when the field map does
    /// not carry one.
    pub fn delete(&self, node: &Value) -> Result<()> {
        let id = self.resolve_id(node)?;
        let content = self.gateway.request(
            Method::DELETE,
            &format!("/node/{}", encode_path_segment(&id)),
            &[],
            None,
        )?;
        confirm_deletion(&content)
    }

    fn resolve_id(&self, node: &Value) -> Result<String> {
        if let Some(id) = entity_id(node) {
            return Ok(id);
        }
        let title = node
            .get("title")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                ClientError::ResponseCode("node carries neither an id nor a title".to_string())
            })?;
        lookup_entity_id(self.gateway, "/node", "title", title, self.per_page)
    }
}

impl RemoteApi for NodeApi<'_> {
    fn name(&self) -> &'static str {
        "node"
    }

    fn per_page(&self) -> u64 {
        self.per_page
    }

    fn set_per_page(&mut self, per_page: u64) {
        self.per_page = per_page;
    }
}
