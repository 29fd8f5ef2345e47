//! Test-harness façade over the remote Drupal API client.
//!
//! [`RemoteDriver`] adapts the typed client to the generic site-driver
//! contract a test framework calls: free-form entity field maps in,
//! uniform failures out. It bootstraps lazily on first use and is the
//! single error-translation boundary — every typed failure raised by the
//! client is re-raised as one generic failure carrying the inner message.

use anyhow::{Result, anyhow, bail};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::info;

use drupal_remote_client::{AuthMethod, ClientError, Gateway, RemoteApi};

/// Driver for a remote Drupal site, addressed purely over its HTTP API.
pub struct RemoteDriver {
    base_url: String,
    username: Option<String>,
    password: Option<SecretString>,
    cookie: Option<String>,
    gateway: Option<Gateway>,
    bootstrapped: bool,
}

impl RemoteDriver {
    /// Set the connection parameters for the remote site.
    ///
    /// Fails when `base_url` is empty; credentials are optional until an
    /// operation actually needs them.
    pub fn new(
        base_url: &str,
        username: Option<&str>,
        password: Option<&str>,
        cookie: Option<&str>,
    ) -> Result<Self> {
        if base_url.trim().is_empty() {
            bail!("A site base url is required.");
        }
        Ok(Self {
            base_url: base_url.to_string(),
            username: username.map(str::to_string),
            password: password.map(|p| SecretString::new(p.to_string().into())),
            cookie: cookie.map(str::to_string),
            gateway: None,
            bootstrapped: false,
        })
    }

    /// Inject a pre-configured gateway, bypassing the default construction
    /// and authentication during bootstrap.
    pub fn set_gateway(&mut self, gateway: Gateway) {
        self.gateway = Some(gateway);
    }

    /// Connect and authenticate. Idempotent: subsequent calls are no-ops,
    /// and every public operation bootstraps on demand.
    pub fn bootstrap(&mut self) -> Result<()> {
        if self.bootstrapped {
            return Ok(());
        }
        if self.gateway.is_none() {
            let mut gateway = Gateway::new();
            gateway
                .set_option("base_url", Value::from(self.base_url.as_str()))
                .map_err(flatten)?;
            gateway
                .authenticate(
                    self.username.as_deref().unwrap_or_default(),
                    self.password.as_ref().map(|p| p.expose_secret()),
                    Some(AuthMethod::DrupalLogin),
                    self.cookie.as_deref(),
                )
                .map_err(flatten)?;
            self.gateway = Some(gateway);
        }
        info!(base_url = %self.base_url, "remote driver bootstrapped");
        self.bootstrapped = true;
        Ok(())
    }

    pub fn is_bootstrapped(&self) -> bool {
        self.bootstrapped
    }

    /// Resolve a named sub-API on the underlying gateway.
    pub fn api(&mut self, name: &str) -> Result<Box<dyn RemoteApi + '_>> {
        self.gateway()?.api(name).map_err(flatten)
    }

    /// Create a user account from a field map.
    pub fn user_create(&mut self, user: &Value) -> Result<Value> {
        self.gateway()?.users().create(user).map_err(flatten)
    }

    /// Delete a user account.
    pub fn user_delete(&mut self, user: &Value) -> Result<()> {
        self.gateway()?.users().delete(user).map_err(flatten)
    }

    /// Grant a role to a user account.
    pub fn user_add_role(&mut self, user: &Value, role: &str) -> Result<()> {
        self.gateway()?.users().add_role(user, role).map_err(flatten)
    }

    /// Create a content node from a field map.
    pub fn create_node(&mut self, node: &Value) -> Result<Value> {
        self.gateway()?.nodes().create(node).map_err(flatten)
    }

    /// Delete a content node.
    pub fn node_delete(&mut self, node: &Value) -> Result<()> {
        self.gateway()?.nodes().delete(node).map_err(flatten)
    }

    /// Create a taxonomy term from a field map.
    pub fn create_term(&mut self, term: &Value) -> Result<Value> {
        self.gateway()?.terms().create(term).map_err(flatten)
    }

    /// Delete a taxonomy term.
    pub fn term_delete(&mut self, term: &Value) -> Result<()> {
        self.gateway()?.terms().delete(term).map_err(flatten)
    }

    /// Clear the remote site's caches. The cache type is accepted for
    /// contract compatibility but the remote endpoint clears all caches.
    pub fn clear_cache(&mut self, _cache_type: Option<&str>) -> Result<()> {
        self.gateway()?.cache().clear().map_err(flatten)
    }

    /// Trigger a cron run on the remote site.
    pub fn run_cron(&mut self) -> Result<()> {
        self.gateway()?.cron().run().map_err(flatten)
    }

    /// Fetch recent watchdog log entries.
    pub fn fetch_watchdog(
        &mut self,
        count: u64,
        message_type: Option<&str>,
        severity: Option<&str>,
    ) -> Result<Vec<Value>> {
        self.gateway()?
            .watchdog()
            .fetch(count, message_type, severity)
            .map_err(flatten)
    }

    /// No-op hook: batch processing happens server-side on each request.
    pub fn process_batch(&mut self) {}

    /// No-op hook: there are no in-process static caches to clear.
    pub fn clear_static_caches(&mut self) {}

    fn gateway(&mut self) -> Result<&Gateway> {
        self.bootstrap()?;
        self.gateway
            .as_ref()
            .ok_or_else(|| anyhow!("remote driver has no gateway after bootstrap"))
    }
}

/// The façade's single translation boundary: collapse the typed taxonomy
/// into one generic failure carrying the original message.
fn flatten(err: ClientError) -> anyhow::Error {
    anyhow!("{err}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_requires_base_url() {
        let err = RemoteDriver::new("", None, None, None).map(|_| ()).unwrap_err();
        assert!(err.to_string().contains("base url is required"));
        let err = RemoteDriver::new("   ", None, None, None).map(|_| ()).unwrap_err();
        assert!(err.to_string().contains("base url is required"));
    }

    #[test]
    fn test_not_bootstrapped_until_first_use() {
        let driver =
            RemoteDriver::new("http://d8.test", Some("admin"), Some("pw"), None).unwrap();
        assert!(!driver.is_bootstrapped());
    }

    #[test]
    fn test_bootstrap_is_idempotent() {
        let mut driver =
            RemoteDriver::new("http://d8.test", Some("admin"), Some("pw"), None).unwrap();
        driver.bootstrap().unwrap();
        assert!(driver.is_bootstrapped());
        driver.bootstrap().unwrap();
        assert!(driver.is_bootstrapped());
    }

    #[test]
    fn test_bootstrap_skips_auth_for_injected_gateway() {
        let mut driver = RemoteDriver::new("http://d8.test", None, None, None).unwrap();
        driver.set_gateway(Gateway::new());
        driver.bootstrap().unwrap();
        // The injected gateway was taken as-is, unauthenticated.
        assert!(driver.gateway.as_ref().unwrap().credential().is_none());
    }

    #[test]
    fn test_api_resolution_flattens_unknown_name() {
        let mut driver = RemoteDriver::new("http://d8.test", None, None, None).unwrap();
        driver.set_gateway(Gateway::new());
        let err = driver.api("widget").map(|_| ()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Undefined api instance called: \"widget\""
        );
        assert!(err.downcast_ref::<ClientError>().is_none());
    }
}
