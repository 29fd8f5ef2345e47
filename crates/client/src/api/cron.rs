//! Scheduled-maintenance sub-API.

use reqwest::Method;

use super::{DEFAULT_PER_PAGE, RemoteApi, confirm_status_200};
use crate::Gateway;
use crate::error::Result;

/// Handler for the remote cron endpoint.
pub struct CronApi<'g> {
    gateway: &'g Gateway,
    per_page: u64,
}

impl<'g> CronApi<'g> {
    pub fn new(gateway: &'g Gateway) -> Self {
        Self {
            gateway,
            per_page: DEFAULT_PER_PAGE,
        }
    }

    /// Trigger a cron run on the remote site.
    pub fn run(&self) -> Result<()> {
        let content = self
            .gateway
            .request(Method::GET, "/drupal-remote-api/cron", &[], None)?;
        confirm_status_200(&content)
    }
}

impl RemoteApi for CronApi<'_> {
    fn name(&self) -> &'static str {
        "cron"
    }

    fn per_page(&self) -> u64 {
        self.per_page
    }

    fn set_per_page(&mut self, per_page: u64) {
        self.per_page = per_page;
    }
}
