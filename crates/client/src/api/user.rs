//! User account sub-API.

use reqwest::Method;
use serde_json::{Value, json};

use super::{
    DEFAULT_PER_PAGE, RemoteApi, confirm_deletion, confirm_status_200, encode_path_segment,
    entity_id, lookup_entity_id,
};
use crate::Gateway;
use crate::error::{ClientError, Result};

/// Handler for user create/delete/role assignment over the remote API.
pub struct UserApi<'g> {
    gateway: &'g Gateway,
    per_page: u64,
}

impl<'g> UserApi<'g> {
    pub fn new(gateway: &'g Gateway) -> Self {
        Self {
            gateway,
            per_page: DEFAULT_PER_PAGE,
        }
    }

    /// Create a user account from a free-form field map and return the
    /// decoded response body.
    pub fn create(&self, user: &Value) -> Result<Value> {
        let content = self.gateway.request(Method::POST, "/user", &[], Some(user))?;
        confirm_status_200(&content)?;
        Ok(content.into_value())
    }

    /// Delete a user account, resolving its id by account name when the
    /// field map does not carry one.
    pub fn delete(&self, user: &Value) -> Result<()> {
        let id = self.resolve_id(user)?;
        let content = self.gateway.request(
            Method::DELETE,
            &format!("/user/{}", encode_path_segment(&id)),
            &[],
            None,
        )?;
        confirm_deletion(&content)
    }

    /// Grant a role to an existing user account.
    pub fn add_role(&self, user: &Value, role: &str) -> Result<()> {
        let id = self.resolve_id(user)?;
        let content = self.gateway.request(
            Method::PUT,
            &format!("/user/{}", encode_path_segment(&id)),
            &[],
            Some(&json!({ "roles": [role] })),
        )?;
        confirm_status_200(&content)
    }

    fn resolve_id(&self, user: &Value) -> Result<String> {
        if let Some(id) = entity_id(user) {
            return Ok(id);
        }
        let name = user.get("name").and_then(Value::as_str).ok_or_else(|| {
            ClientError::ResponseCode("user carries neither an id nor a name".to_string())
        })?;
        lookup_entity_id(self.gateway, "/user", "name", name, self.per_page)
    }
}

impl RemoteApi for UserApi<'_> {
    fn name(&self) -> &'static str {
        "user"
    }

    fn per_page(&self) -> u64 {
        self.per_page
    }

    fn set_per_page(&mut self, per_page: u64) {
        self.per_page = per_page;
    }
}
