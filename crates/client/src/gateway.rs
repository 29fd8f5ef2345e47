//! The central gateway multiplexing named sub-APIs over one HTTP transport.

use std::cell::OnceCell;
use std::collections::HashMap;
use std::time::Duration;

use reqwest::Method;
use secrecy::SecretString;
use serde_json::Value;
use tracing::debug;

use crate::api::{
    ApiFactory, CacheApi, CronApi, NodeApi, RemoteApi, TermApi, UserApi, WatchdogApi,
};
use crate::auth::{AuthMethod, Credential};
use crate::classifier;
use crate::config::{Options, SUPPORTED_API_VERSIONS};
use crate::error::{ClientError, Result};
use crate::mediator::{self, Content, Envelope};

/// Client for the remote Drupal site's HTTP API.
///
/// The gateway owns the configuration, the active credential, and the
/// transport handle, and resolves named sub-APIs to handler instances. It is
/// deliberately not `Sync`: calls are synchronous with at most one request
/// in flight, and configuration or credential swaps are expected to happen
/// between operations, never concurrently with one.
#[derive(Default)]
pub struct Gateway {
    options: Options,
    credential: Option<Credential>,
    headers: Vec<(String, String)>,
    transport: OnceCell<reqwest::blocking::Client>,
    extensions: HashMap<String, ApiFactory>,
}

impl Gateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a gateway with explicit initial options.
    pub fn with_options(options: Options) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Resolve a named sub-API to a handler bound to this gateway.
    ///
    /// Built-in names (including plural aliases) resolve to the concrete
    /// handlers; anything else is looked up in the extension registry.
    /// Unknown names fail closed with [`ClientError::UnknownApi`].
    pub fn api<'g>(&'g self, name: &str) -> Result<Box<dyn RemoteApi + 'g>> {
        match name {
            "node" | "nodes" => Ok(Box::new(self.nodes())),
            "term" | "terms" => Ok(Box::new(self.terms())),
            "user" | "users" => Ok(Box::new(self.users())),
            "cache" => Ok(Box::new(self.cache())),
            "cron" => Ok(Box::new(self.cron())),
            "watchdog" => Ok(Box::new(self.watchdog())),
            _ => match self.extensions.get(name) {
                Some(factory) => Ok(factory(self)),
                None => Err(ClientError::UnknownApi(name.to_string())),
            },
        }
    }

    /// Register an extension sub-API under `name`.
    ///
    /// The factory must produce a handler bound to the gateway it is given;
    /// the [`RemoteApi`] bound is the capability contract every handler
    /// satisfies.
    pub fn register_api(&mut self, name: impl Into<String>, factory: ApiFactory) {
        self.extensions.insert(name.into(), factory);
    }

    pub fn nodes(&self) -> NodeApi<'_> {
        NodeApi::new(self)
    }

    pub fn terms(&self) -> TermApi<'_> {
        TermApi::new(self)
    }

    pub fn users(&self) -> UserApi<'_> {
        UserApi::new(self)
    }

    pub fn cache(&self) -> CacheApi<'_> {
        CacheApi::new(self)
    }

    pub fn cron(&self) -> CronApi<'_> {
        CronApi::new(self)
    }

    pub fn watchdog(&self) -> WatchdogApi<'_> {
        WatchdogApi::new(self)
    }

    /// Authenticate all subsequent requests.
    ///
    /// At least one of `secret`/`method` must be given. As a positional
    /// convenience, a `secret` equal to a known method tag with `method`
    /// unset is treated as the method (and the secret cleared). When still
    /// unset, the method defaults to HTTP basic. The previous credential,
    /// if any, is replaced wholesale.
    pub fn authenticate(
        &mut self,
        login: &str,
        secret: Option<&str>,
        method: Option<AuthMethod>,
        cookie: Option<&str>,
    ) -> Result<()> {
        if secret.is_none() && method.is_none() {
            return Err(ClientError::MissingAuthMethod);
        }

        let (secret, method) = match (secret, method) {
            (Some(tag), None) if AuthMethod::from_tag(tag).is_some() => {
                (None, AuthMethod::from_tag(tag))
            }
            (secret, method) => (secret, method),
        };
        let method = method.unwrap_or(AuthMethod::HttpBasic);

        self.credential = Some(Credential::new(
            login,
            secret.map(|s| SecretString::new(s.to_string().into())),
            Some(method),
            cookie.map(str::to_string),
        ));
        Ok(())
    }

    /// The active credential, if any.
    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    /// Look up a configuration option by name.
    pub fn get_option(&self, name: &str) -> Result<Value> {
        self.options.get(name)
    }

    /// Set a configuration option by name.
    ///
    /// Options consumed by the transport (timeout, user agent, TLS toggle)
    /// only take effect if set before the first request.
    pub fn set_option(&mut self, name: &str, value: Value) -> Result<()> {
        self.options.set(name, value)
    }

    /// Immutable view of the configuration, as exposed to handlers.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The `/api/{api_version}` prefix.
    pub fn base_path(&self) -> String {
        self.options.base_path()
    }

    /// API versions this client supports.
    pub fn supported_api_versions() -> &'static [&'static str] {
        SUPPORTED_API_VERSIONS
    }

    /// Headers attached to every outgoing request.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Replace the per-request header set.
    pub fn set_headers(&mut self, headers: Vec<(String, String)>) {
        self.headers = headers;
    }

    /// Clear the per-request header set.
    pub fn clear_headers(&mut self) {
        self.headers.clear();
    }

    /// Inject a transport handle, replacing any lazily-built one. Intended
    /// for tests.
    pub fn set_transport(&mut self, transport: reqwest::blocking::Client) {
        self.transport = OnceCell::from(transport);
    }

    /// Issue one request and mediate the result.
    ///
    /// This is the single request path all handlers (built-in and
    /// registered extensions) go through: the URL is built from
    /// `base_url + base_path + path`, default headers are attached, the
    /// credential mutates the request, and the completed response is either
    /// classified into a typed error (4xx/5xx) or decoded into [`Content`].
    pub fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<Content> {
        let url = format!("{}{}{}", self.options.base_url, self.base_path(), path);
        let transport = self.transport()?;

        let mut builder = transport.request(method.clone(), url.as_str());
        for (name, value) in &self.headers {
            builder = builder.header(name, value);
        }
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let mut request = builder
            .build()
            .map_err(|e| ClientError::InvalidUrl(format!("{url}: {e}")))?;
        if let Some(credential) = &self.credential {
            credential.apply(&mut request)?;
        }

        debug!(%method, path, "sending remote API request");
        let response = transport.execute(request)?;

        let status = response.status().as_u16();
        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.text()?;
        let envelope = Envelope::new(status, headers, body, path);

        if envelope.is_error() {
            let err = classifier::classify(&envelope, self.options.api_limit);
            debug!(status, path, error = %err, "remote API request failed");
            return Err(err);
        }

        Ok(mediator::content(&envelope))
    }

    fn transport(&self) -> Result<&reqwest::blocking::Client> {
        if let Some(transport) = self.transport.get() {
            return Ok(transport);
        }
        let built = self.build_transport()?;
        Ok(self.transport.get_or_init(|| built))
    }

    fn build_transport(&self) -> Result<reqwest::blocking::Client> {
        let mut builder = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(self.options.timeout_secs))
            .user_agent(self.options.user_agent.clone())
            .redirect(reqwest::redirect::Policy::limited(5));

        if self.options.skip_verify {
            builder = builder.danger_accept_invalid_certs(true);
        }

        Ok(builder.build()?)
    }
}
