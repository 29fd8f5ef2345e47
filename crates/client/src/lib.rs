//! Remote Drupal API client.
//!
//! This crate lets an automated test harness drive a Drupal site's HTTP API
//! in place of an in-process bootstrap: creating and deleting content
//! entities, clearing caches, triggering cron, and reading the watchdog log.
//! The [`Gateway`] multiplexes named sub-APIs over a single synchronous
//! transport, applies the active authentication method to every outgoing
//! request, and classifies error responses into a typed failure taxonomy.

pub mod api;
mod auth;
pub mod classifier;
mod config;
pub mod error;
mod gateway;
pub mod mediator;

pub use api::{ApiFactory, RemoteApi};
pub use auth::{AuthMethod, Credential, DRUPAL_AUTH_HEADER};
pub use config::{Options, SUPPORTED_API_VERSIONS};
pub use error::{ClientError, Result};
pub use gateway::Gateway;
pub use mediator::{Content, Envelope};
