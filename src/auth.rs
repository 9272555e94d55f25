//! Bearer-token acquisition for Resource Manager requests.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::debug;

use crate::client::{ArmError, HTTP_CLIENT};

/// Tokens closer than this to expiry are refreshed before use.
const REFRESH_MARGIN: TimeDelta = TimeDelta::minutes(5);

/// Future returned by token providers.
pub type TokenFuture<'a> = Pin<Box<dyn Future<Output = Result<AccessToken, ArmError>> + Send + 'a>>;

/// Source of bearer tokens attached to every request.
pub trait TokenProvider: fmt::Debug + Send + Sync {
    /// Returns a token valid for at least the next request.
    fn token(&self) -> TokenFuture<'_>;
}

/// Bearer token with its optional expiry.
#[derive(Clone, Eq, PartialEq)]
pub struct AccessToken {
    /// Raw token value placed in the `Authorization` header.
    pub secret: String,
    /// Instant after which the token is rejected, when known.
    pub expires_on: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// Returns `true` when the token expires within `margin` of `now`.
    #[must_use]
    pub fn expires_within(&self, now: DateTime<Utc>, margin: TimeDelta) -> bool {
        self.expires_on
            .is_some_and(|expiry| expiry - margin <= now)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("secret", &"<redacted>")
            .field("expires_on", &self.expires_on)
            .finish()
    }
}

/// Provider handing out one fixed token.
#[derive(Clone)]
pub struct StaticToken {
    token: String,
}

impl StaticToken {
    /// Wraps a pre-issued token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StaticToken(<redacted>)")
    }
}

impl TokenProvider for StaticToken {
    fn token(&self) -> TokenFuture<'_> {
        Box::pin(async move {
            Ok(AccessToken {
                secret: self.token.clone(),
                expires_on: None,
            })
        })
    }
}

/// Client-credentials grant for a service principal. The issued token is
/// cached and refreshed shortly before it expires.
pub struct ServicePrincipal {
    token_url: String,
    client_id: String,
    client_secret: String,
    resource: String,
    cached: Mutex<Option<AccessToken>>,
}

impl ServicePrincipal {
    /// Creates a provider issuing tokens from `{authority}/{tenant}/oauth2/token`.
    #[must_use]
    pub fn new(
        authority: &str,
        tenant: &str,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        resource: impl Into<String>,
    ) -> Self {
        Self {
            token_url: format!("{}/{tenant}/oauth2/token", authority.trim_end_matches('/')),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            resource: resource.into(),
            cached: Mutex::new(None),
        }
    }

    async fn request_token(&self) -> Result<AccessToken, ArmError> {
        debug!(url = %self.token_url, "requesting service principal token");
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("resource", self.resource.as_str()),
        ];
        let response = HTTP_CLIENT
            .post(&self.token_url)
            .form(&form)
            .send()
            .await
            .map_err(|err| ArmError::Authentication {
                message: err.to_string(),
            })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| ArmError::Authentication {
                message: err.to_string(),
            })?;

        if !status.is_success() {
            let message = serde_json::from_slice::<TokenErrorResponse>(&body)
                .map(|err| match err.error_description {
                    Some(description) => format!("{}: {description}", err.error),
                    None => err.error,
                })
                .unwrap_or_else(|_| String::from_utf8_lossy(&body).into_owned());
            return Err(ArmError::Authentication {
                message: format!("token request returned {status}: {message}"),
            });
        }

        let parsed: TokenResponse =
            serde_json::from_slice(&body).map_err(|err| ArmError::Authentication {
                message: format!("malformed token response: {err}"),
            })?;
        Ok(AccessToken {
            secret: parsed.access_token,
            expires_on: parsed.expires_on.as_ref().and_then(parse_epoch),
        })
    }
}

impl fmt::Debug for ServicePrincipal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServicePrincipal")
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

impl TokenProvider for ServicePrincipal {
    fn token(&self) -> TokenFuture<'_> {
        Box::pin(async move {
            let mut cached = self.cached.lock().await;
            if let Some(token) = cached.as_ref()
                && !token.expires_within(Utc::now(), REFRESH_MARGIN)
            {
                return Ok(token.clone());
            }
            let fresh = self.request_token().await?;
            *cached = Some(fresh.clone());
            Ok(fresh)
        })
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_on: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// The v1 token endpoint reports `expires_on` as epoch seconds, encoded as a
/// string.
fn parse_epoch(value: &serde_json::Value) -> Option<DateTime<Utc>> {
    let seconds = match value {
        serde_json::Value::String(text) => text.trim().parse::<i64>().ok()?,
        serde_json::Value::Number(number) => number.as_i64()?,
        _ => return None,
    };
    DateTime::from_timestamp(seconds, 0)
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[test]
    fn parse_epoch_accepts_strings_and_numbers() {
        let expected = DateTime::from_timestamp(1_700_000_000, 0);
        assert_eq!(parse_epoch(&json!("1700000000")), expected);
        assert_eq!(parse_epoch(&json!(1_700_000_000)), expected);
        assert_eq!(parse_epoch(&json!("soon")), None);
    }

    #[test]
    fn token_without_expiry_never_expires() {
        let token = AccessToken {
            secret: String::from("t"),
            expires_on: None,
        };
        assert!(!token.expires_within(Utc::now(), REFRESH_MARGIN));
    }

    #[test]
    fn debug_output_redacts_secret() {
        let token = AccessToken {
            secret: String::from("very-secret"),
            expires_on: None,
        };
        assert!(!format!("{token:?}").contains("very-secret"));
    }

    async fn token_endpoint(lifetime: TimeDelta, expected_hits: u64) -> MockServer {
        let server = MockServer::start().await;
        let expires = (Utc::now() + lifetime).timestamp().to_string();
        Mock::given(method("POST"))
            .and(path("/tenant/oauth2/token"))
            .and(body_string_contains("grant_type=client_credentials"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token_type": "Bearer",
                "access_token": "issued",
                "expires_on": expires,
            })))
            .expect(expected_hits)
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn service_principal_caches_token() {
        let server = token_endpoint(TimeDelta::hours(1), 1).await;

        let provider = ServicePrincipal::new(&server.uri(), "tenant", "id", "secret", "resource");
        let first = provider.token().await.expect("first token");
        let second = provider.token().await.expect("cached token");
        assert_eq!(first.secret, "issued");
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn service_principal_refreshes_token_close_to_expiry() {
        let server = token_endpoint(TimeDelta::seconds(60), 2).await;

        let provider = ServicePrincipal::new(&server.uri(), "tenant", "id", "secret", "resource");
        provider.token().await.expect("first token");
        let refreshed = provider.token().await.expect("refreshed token");
        assert_eq!(refreshed.secret, "issued");
        server.verify().await;
    }

    #[tokio::test]
    async fn service_principal_reports_error_description() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/tenant/oauth2/token"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": "invalid_client",
                "error_description": "bad secret",
            })))
            .mount(&server)
            .await;

        let provider = ServicePrincipal::new(&server.uri(), "tenant", "id", "secret", "resource");
        let err = provider.token().await.expect_err("token should be rejected");
        let ArmError::Authentication { message } = err else {
            panic!("expected authentication error, got {err:?}");
        };
        assert!(message.contains("invalid_client: bad secret"), "{message}");
    }
}
