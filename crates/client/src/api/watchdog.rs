//! Watchdog log sub-API.

use reqwest::Method;
use serde_json::Value;

use super::{DEFAULT_PER_PAGE, RemoteApi, confirm_filter_list};
use crate::Gateway;
use crate::error::Result;

/// Handler for reading the remote site's watchdog log.
pub struct WatchdogApi<'g> {
    gateway: &'g Gateway,
    per_page: u64,
}

impl<'g> WatchdogApi<'g> {
    pub fn new(gateway: &'g Gateway) -> Self {
        Self {
            gateway,
            per_page: DEFAULT_PER_PAGE,
        }
    }

    /// Fetch the most recent watchdog entries, optionally filtered by
    /// message type and severity.
    pub fn fetch(
        &self,
        count: u64,
        message_type: Option<&str>,
        severity: Option<&str>,
    ) -> Result<Vec<Value>> {
        let mut query = vec![("limit".to_string(), count.to_string())];
        if let Some(message_type) = message_type {
            query.push(("type".to_string(), message_type.to_string()));
        }
        if let Some(severity) = severity {
            query.push(("severity".to_string(), severity.to_string()));
        }

        let content =
            self.gateway
                .request(Method::GET, "/drupal-remote-api/watchdog", &query, None)?;
        confirm_filter_list(&content)
    }
}

impl RemoteApi for WatchdogApi<'_> {
    fn name(&self) -> &'static str {
        "watchdog"
    }

    fn per_page(&self) -> u64 {
        self.per_page
    }

    fn set_per_page(&mut self, per_page: u64) {
        self.per_page = per_page;
    }
}
