//! Shared helpers for the HTTP-level integration tests.
//!
//! Each suite spins up a synchronous mock server and points a gateway at
//! it; requests then travel the full path: URL building, credential
//! application, transport, classification, and mediation.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

#[allow(unused_imports)]
pub use drupal_remote_client::{AuthMethod, ClientError, Gateway, RemoteApi};
#[allow(unused_imports)]
pub use mockito::{Matcher, Server, ServerGuard};

/// A gateway whose base URL points at the mock server.
pub fn gateway_for(server: &ServerGuard) -> Gateway {
    let mut gateway = Gateway::new();
    gateway
        .set_option("base_url", serde_json::Value::from(server.url()))
        .unwrap();
    gateway
}

/// The value the Drupal-Auth header carries for a login/password pair.
#[allow(dead_code)]
pub fn drupal_auth_value(login: &str, password: &str) -> String {
    BASE64.encode(format!("{login}:{password}"))
}
