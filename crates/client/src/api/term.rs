//! Taxonomy term sub-API.

use reqwest::Method;
use serde_json::Value;

use super::{
    DEFAULT_PER_PAGE, RemoteApi, confirm_deletion, confirm_status_200, encode_path_segment,
    entity_id, lookup_entity_id,
};
use crate::Gateway;
use crate::error::{ClientError, Result};

/// Handler for taxonomy term create/delete over the remote API.
pub struct TermApi<'g> {
    gateway: &'g Gateway,
    per_page: u64,
}

impl<'g> TermApi<'g> {
    pub fn new(gateway: &'g Gateway) -> Self {
        Self {
            gateway,
            per_page: DEFAULT_PER_PAGE,
        }
    }

    /// Create a taxonomy term from a free-form field map and return the
    /// decoded response body.
    pub fn create(&self, term: &Value) -> Result<Value> {
        let content = self
            .gateway
            .request(Method::POST, "/taxonomy_term", &[], Some(term))?;
        confirm_status_200(&content)?;
        Ok(content.into_value())
    }

    /// Delete a term, resolving its id by name when the field map does
    /// not carry one.
    pub fn delete(&self, term: &Value) -> Result<()> {
        let id = self.resolve_id(term)?;
        let content = self.gateway.request(
            Method::DELETE,
            &format!("/taxonomy_term/{}", encode_path_segment(&id)),
            &[],
            None,
        )?;
        confirm_deletion(&content)
    }

    fn resolve_id(&self, term: &Value) -> Result<String> {
        if let Some(id) = entity_id(term) {
            return Ok(id);
        }
        let name = term.get("name").and_then(Value::as_str).ok_or_else(|| {
            ClientError::ResponseCode("term carries neither an id nor a name".to_string())
        })?;
        lookup_entity_id(self.gateway, "/taxonomy_term", "name", name, self.per_page)
    }
}

impl RemoteApi for TermApi<'_> {
    fn name(&self) -> &'static str {
        "term"
    }

    fn per_page(&self) -> u64 {
        self.per_page
    }

    fn set_per_page(&mut self, per_page: u64) {
        self.per_page = per_page;
    }
}
