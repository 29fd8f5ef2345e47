//! Authentication methods and credential handling.
//!
//! A [`Credential`] is constructed once at `authenticate()`-time, held by the
//! Gateway for its lifetime, and replaced wholesale on re-authentication.
//! [`Credential::apply`] mutates each outgoing request in place before send,
//! either by header injection or by URL query augmentation.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::header::{AUTHORIZATION, COOKIE, HeaderValue};
use secrecy::{ExposeSecret, SecretString};

use crate::error::{ClientError, Result};

/// Custom header carrying the Drupal login credential.
pub const DRUPAL_AUTH_HEADER: &str = "Drupal-Auth";

/// How a credential is attached to outgoing requests.
///
/// Every variant corresponds to one of the wire-level method tags the remote
/// backend understands; unknown tags are rejected by [`AuthMethod::from_tag`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMethod {
    /// Deprecated login with the token in the URL (`access_token` parameter).
    UrlToken,
    /// Unauthenticated but rate-limit-identified requests via
    /// `client_id` + `client_secret` URL parameters.
    UrlClientId,
    /// Username and password via HTTP basic authentication.
    HttpBasic,
    /// Token via the `Authorization` header.
    HttpToken,
    /// Drupal login via the custom `Drupal-Auth` header, optionally with a
    /// literal session cookie.
    DrupalLogin,
}

impl AuthMethod {
    /// The wire-level tag for this method.
    pub fn tag(self) -> &'static str {
        match self {
            Self::UrlToken => "url_token",
            Self::UrlClientId => "url_client_id",
            Self::HttpBasic => "http_password",
            Self::HttpToken => "http_token",
            Self::DrupalLogin => "http_drupal_login",
        }
    }

    /// Parse a wire-level tag. Unknown tags yield `None`; there is no
    /// "unimplemented method" at request time.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "url_token" => Some(Self::UrlToken),
            "url_client_id" => Some(Self::UrlClientId),
            "http_password" => Some(Self::HttpBasic),
            "http_token" => Some(Self::HttpToken),
            "http_drupal_login" => Some(Self::DrupalLogin),
            _ => None,
        }
    }
}

/// A credential pair plus the method used to present it.
///
/// `method: None` means requests pass through unauthenticated.
#[derive(Debug, Clone)]
pub struct Credential {
    login: String,
    secret: Option<SecretString>,
    method: Option<AuthMethod>,
    cookie: Option<String>,
}

impl Credential {
    pub fn new(
        login: impl Into<String>,
        secret: Option<SecretString>,
        method: Option<AuthMethod>,
        cookie: Option<String>,
    ) -> Self {
        Self {
            login: login.into(),
            secret,
            method,
            cookie,
        }
    }

    /// The identifier half of the credential pair.
    pub fn login(&self) -> &str {
        &self.login
    }

    /// The method this credential is presented with, if any.
    pub fn method(&self) -> Option<AuthMethod> {
        self.method
    }

    /// Mutate an outgoing request to carry this credential.
    pub fn apply(&self, request: &mut reqwest::blocking::Request) -> Result<()> {
        let Some(method) = self.method else {
            // No method: the request passes through unauthenticated.
            return Ok(());
        };

        match method {
            AuthMethod::HttpBasic => {
                let value = format!("Basic {}", BASE64.encode(self.login_secret_pair()));
                request
                    .headers_mut()
                    .insert(AUTHORIZATION, header_value(&value, "Authorization")?);
            }
            AuthMethod::HttpToken => {
                let value = format!("token {}", self.login);
                request
                    .headers_mut()
                    .insert(AUTHORIZATION, header_value(&value, "Authorization")?);
            }
            AuthMethod::UrlClientId => {
                let secret = self.exposed_secret().unwrap_or_default().to_string();
                request
                    .url_mut()
                    .query_pairs_mut()
                    .append_pair("client_id", &self.login)
                    .append_pair("client_secret", &secret);
            }
            AuthMethod::UrlToken => {
                request
                    .url_mut()
                    .query_pairs_mut()
                    .append_pair("access_token", &self.login);
            }
            AuthMethod::DrupalLogin => {
                let value = BASE64.encode(self.login_secret_pair());
                request.headers_mut().insert(
                    DRUPAL_AUTH_HEADER,
                    header_value(&value, DRUPAL_AUTH_HEADER)?,
                );
                if let Some(cookie) = &self.cookie {
                    request
                        .headers_mut()
                        .insert(COOKIE, header_value(cookie, "Cookie")?);
                }
            }
        }

        Ok(())
    }

    fn exposed_secret(&self) -> Option<&str> {
        self.secret.as_ref().map(|s| s.expose_secret())
    }

    fn login_secret_pair(&self) -> String {
        format!("{}:{}", self.login, self.exposed_secret().unwrap_or_default())
    }
}

fn header_value(value: &str, name: &'static str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|_| ClientError::InvalidHeader(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> reqwest::blocking::Request {
        reqwest::blocking::Client::new()
            .get("http://localhost/api/v1/node")
            .build()
            .unwrap()
    }

    fn secret(value: &str) -> Option<SecretString> {
        Some(SecretString::new(value.to_string().into()))
    }

    #[test]
    fn test_method_tag_round_trip() {
        for method in [
            AuthMethod::UrlToken,
            AuthMethod::UrlClientId,
            AuthMethod::HttpBasic,
            AuthMethod::HttpToken,
            AuthMethod::DrupalLogin,
        ] {
            assert_eq!(AuthMethod::from_tag(method.tag()), Some(method));
        }
        assert_eq!(AuthMethod::from_tag("oauth_dance"), None);
    }

    #[test]
    fn test_http_basic_sets_authorization_header() {
        let mut req = request();
        let cred = Credential::new("bob", secret("pw"), Some(AuthMethod::HttpBasic), None);
        cred.apply(&mut req).unwrap();

        let header = req.headers().get(AUTHORIZATION).unwrap();
        assert_eq!(
            header.to_str().unwrap(),
            format!("Basic {}", BASE64.encode("bob:pw"))
        );
    }

    #[test]
    fn test_http_token_sets_authorization_header() {
        let mut req = request();
        let cred = Credential::new("tok123", None, Some(AuthMethod::HttpToken), None);
        cred.apply(&mut req).unwrap();

        assert_eq!(
            req.headers().get(AUTHORIZATION).unwrap().to_str().unwrap(),
            "token tok123"
        );
    }

    #[test]
    fn test_drupal_login_without_cookie() {
        let mut req = request();
        let cred = Credential::new("bob", secret("pw"), Some(AuthMethod::DrupalLogin), None);
        cred.apply(&mut req).unwrap();

        assert_eq!(
            req.headers().get(DRUPAL_AUTH_HEADER).unwrap().to_str().unwrap(),
            BASE64.encode("bob:pw")
        );
        assert!(req.headers().get(COOKIE).is_none());
    }

    #[test]
    fn test_drupal_login_with_cookie() {
        let mut req = request();
        let cred = Credential::new(
            "bob",
            secret("pw"),
            Some(AuthMethod::DrupalLogin),
            Some("sid=1".to_string()),
        );
        cred.apply(&mut req).unwrap();

        assert_eq!(
            req.headers().get(COOKIE).unwrap().to_str().unwrap(),
            "sid=1"
        );
    }

    #[test]
    fn test_url_token_appends_query_parameter() {
        let mut req = request();
        let cred = Credential::new("tok123", None, Some(AuthMethod::UrlToken), None);
        cred.apply(&mut req).unwrap();

        assert_eq!(req.url().query(), Some("access_token=tok123"));
    }

    #[test]
    fn test_url_client_id_appends_both_parameters() {
        let mut req = request();
        let cred = Credential::new(
            "client-1",
            secret("shh"),
            Some(AuthMethod::UrlClientId),
            None,
        );
        cred.apply(&mut req).unwrap();

        assert_eq!(
            req.url().query(),
            Some("client_id=client-1&client_secret=shh")
        );
    }

    #[test]
    fn test_url_token_preserves_existing_query() {
        let mut req = reqwest::blocking::Client::new()
            .get("http://localhost/api/v1/node?limit=5")
            .build()
            .unwrap();
        let cred = Credential::new("tok123", None, Some(AuthMethod::UrlToken), None);
        cred.apply(&mut req).unwrap();

        assert_eq!(req.url().query(), Some("limit=5&access_token=tok123"));
    }

    #[test]
    fn test_no_method_is_a_no_op() {
        let mut req = request();
        let cred = Credential::new("bob", secret("pw"), None, None);
        cred.apply(&mut req).unwrap();

        assert!(req.headers().get(AUTHORIZATION).is_none());
        assert!(req.url().query().is_none());
    }

    #[test]
    fn test_secret_not_exposed_in_debug() {
        let cred = Credential::new(
            "bob",
            secret("super-secret-pw"),
            Some(AuthMethod::HttpBasic),
            None,
        );
        let debug_output = format!("{:?}", cred);
        assert!(
            !debug_output.contains("super-secret-pw"),
            "Debug output should not contain the secret"
        );
        assert!(debug_output.contains("bob"));
    }
}
