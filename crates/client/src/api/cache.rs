//! Cache maintenance sub-API.

use reqwest::Method;

use super::{DEFAULT_PER_PAGE, RemoteApi, confirm_status_200};
use crate::Gateway;
use crate::error::Result;

/// Handler for the remote cache-clear endpoint.
pub struct CacheApi<'g> {
    gateway: &'g Gateway,
    per_page: u64,
}

impl<'g> CacheApi<'g> {
    pub fn new(gateway: &'g Gateway) -> Self {
        Self {
            gateway,
            per_page: DEFAULT_PER_PAGE,
        }
    }

    /// Initiate a remote cache clear.
    pub fn clear(&self) -> Result<()> {
        let content = self
            .gateway
            .request(Method::GET, "/drupal-remote-api/cache", &[], None)?;
        confirm_status_200(&content)
    }
}

impl RemoteApi for CacheApi<'_> {
    fn name(&self) -> &'static str {
        "cache"
    }

    fn per_page(&self) -> u64 {
        self.per_page
    }

    fn set_per_page(&mut self, per_page: u64) {
        self.per_page = per_page;
    }
}
