//! Classification of error responses into the typed failure taxonomy.
//!
//! The Gateway runs every 4xx/5xx response through [`classify`]; success
//! responses pass through untouched. The checks are ordered: rate-limit
//! exhaustion first, then the two-factor challenge, then structured
//! 400/422 bodies, and finally the generic request error.

use serde_json::Value;

use crate::error::ClientError;
use crate::mediator::{self, Content, Envelope, RATE_LIMIT_HEADER};

/// Header the backend uses to demand a second authentication factor.
pub const TWO_FACTOR_HEADER: &str = "X-Drupal-OTP";

const TWO_FACTOR_PREFIX: &str = "required;";

/// Resource prefix of the rate-limit endpoint itself, which is exempt from
/// the quota check so the quota can still be queried once exhausted.
const RATE_LIMIT_RESOURCE: &str = "rate_limit";

/// Turn an error response into the matching [`ClientError`].
///
/// `api_limit` is the configured request quota, reported when the quota is
/// exhausted.
pub fn classify(envelope: &Envelope, api_limit: u64) -> ClientError {
    let remaining = envelope
        .header(RATE_LIMIT_HEADER)
        .and_then(|value| value.trim().parse::<i64>().ok());

    if let Some(remaining) = remaining
        && remaining < 1
        && !envelope
            .resource
            .trim_start_matches('/')
            .starts_with(RATE_LIMIT_RESOURCE)
    {
        return ClientError::RateLimitExceeded { limit: api_limit };
    }

    if envelope.status == 401
        && let Some(otp) = envelope.header(TWO_FACTOR_HEADER)
        && let Some(challenge) = otp.strip_prefix(TWO_FACTOR_PREFIX)
    {
        return ClientError::TwoFactorRequired {
            challenge: challenge.to_string(),
        };
    }

    let content = mediator::content(envelope);
    if let Some(message) = content
        .as_json()
        .and_then(|json| json.get("message"))
        .and_then(Value::as_str)
    {
        if envelope.status == 400 {
            return ClientError::BadRequest(message.to_string());
        }
        if envelope.status == 422
            && let Some(errors) = content
                .as_json()
                .and_then(|json| json.get("errors"))
                .and_then(Value::as_array)
        {
            return ClientError::ValidationFailed(format!(
                "Validation Failed: {}",
                errors.iter().map(render_error).collect::<Vec<_>>().join(", ")
            ));
        }
    }

    ClientError::Request {
        status: envelope.status,
        message: generic_message(content),
    }
}

/// Render one entry of a 422 `errors` array into a human-readable sentence.
///
/// Unrecognized codes fall back to the entry's own message.
fn render_error(error: &Value) -> String {
    let field = str_field(error, "field");
    let resource = str_field(error, "resource");

    match str_field(error, "code") {
        "missing" => format!(
            "The {} {} does not exist, for resource \"{}\"",
            field,
            str_field(error, "value"),
            resource
        ),
        "missing_field" => format!(
            "Field \"{}\" is missing, for resource \"{}\"",
            field, resource
        ),
        "invalid" => format!(
            "Field \"{}\" is invalid, for resource \"{}\"",
            field, resource
        ),
        "already_exists" => format!(
            "Field \"{}\" already exists, for resource \"{}\"",
            field, resource
        ),
        _ => str_field(error, "message").to_string(),
    }
}

/// Best message for the generic request error: a nested `error` field is
/// unwrapped first, then a `message` field is preferred over the whole body.
fn generic_message(content: Content) -> String {
    let mut value = content.into_value();
    if let Some(inner) = value.get_mut("error") {
        value = inner.take();
    }

    match value.get("message").and_then(Value::as_str) {
        Some(message) => message.to_string(),
        None => match value {
            Value::String(text) => text,
            other => other.to_string(),
        },
    }
}

fn str_field<'v>(value: &'v Value, name: &str) -> &'v str {
    value.get(name).and_then(Value::as_str).unwrap_or_default()
}
