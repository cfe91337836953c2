use serde_json::json;

use crate::models::Credentials;
use crate::services::http::{ApiError, ApiRequest, ApiResponse, HttpTransport};

pub const REFRESH_PATH: &str = "/webapp/auth/refresh";

const TOKEN_INVALID_CODE: &str = "token_not_valid";
const TOKEN_INVALID_DETAIL: &str = "Given token not valid for any token type";

/// Outcome of one authenticated call.
#[derive(Debug, Clone)]
pub struct AuthedResponse {
    pub response: ApiResponse,
    /// The token the final attempt was sent with.
    pub access_token: Option<String>,
    pub refreshed: bool,
}

/// Attaches the bearer token and, when the backend reports it invalid,
/// refreshes once and replays the request.
///
/// Per call: sent → ok, or failed without the invalid-token signal, or
/// refresh → retried. A failed refresh returns the original response.
/// Never retries more than once and never stores the renewed token.
pub struct AuthenticatedClient {
    transport: Box<dyn HttpTransport>,
    base_url: String,
}

impl AuthenticatedClient {
    pub fn new(transport: Box<dyn HttpTransport>, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn request(
        &self,
        request: ApiRequest,
        credentials: &Credentials,
    ) -> Result<AuthedResponse, ApiError> {
        let first = request
            .clone()
            .with_bearer(credentials.access_token.as_deref());
        let response = self.transport.execute(&first).await?;

        let original = AuthedResponse {
            response,
            access_token: first.bearer.clone(),
            refreshed: false,
        };

        if original.response.is_success() {
            return Ok(original);
        }

        let Some(refresh_token) = credentials.refresh_token.as_deref().filter(|t| !t.is_empty())
        else {
            return Ok(original);
        };

        if !is_token_invalid(&original.response) {
            return Ok(original);
        }

        let Some(next_access) = self.refresh_access_token(refresh_token).await else {
            return Ok(original);
        };

        tracing::info!(url = %request.url, "access token refreshed, retrying request");

        let retry = request.with_bearer(Some(&next_access));
        let response = self.transport.execute(&retry).await?;

        Ok(AuthedResponse {
            response,
            access_token: Some(next_access),
            refreshed: true,
        })
    }

    async fn refresh_access_token(&self, refresh_token: &str) -> Option<String> {
        let request = ApiRequest::post(
            format!("{}{REFRESH_PATH}", self.base_url),
            json!({ "refresh": refresh_token }),
        );

        let response = match self.transport.execute(&request).await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!(error = %e, "token refresh request failed");
                return None;
            }
        };

        if !response.is_success() {
            tracing::warn!(status = response.status, "token refresh rejected");
            return None;
        }

        let data = response.json_value()?;
        data.get("access")
            .or_else(|| data.get("token"))
            .and_then(|v| v.as_str())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    }
}

/// Whether a failed response carries the backend's invalid-token signal.
pub fn is_token_invalid(response: &ApiResponse) -> bool {
    let Some(data) = response.json_value() else {
        return false;
    };
    data.get("code").and_then(|v| v.as_str()) == Some(TOKEN_INVALID_CODE)
        || data.get("detail").and_then(|v| v.as_str()) == Some(TOKEN_INVALID_DETAIL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::http::mock::ScriptedTransport;
    use reqwest::Method;

    const BASE: &str = "http://api.test";
    const NEXT: &str = "http://api.test/webapp/appointments/next/";
    const REFRESH: &str = "http://api.test/webapp/auth/refresh";
    const EXPIRED: &str = r#"{"code":"token_not_valid","detail":"Token is expired"}"#;

    fn client(transport: &ScriptedTransport) -> AuthenticatedClient {
        AuthenticatedClient::new(Box::new(transport.clone()), BASE)
    }

    fn creds(access: Option<&str>, refresh: Option<&str>) -> Credentials {
        Credentials::new(access.map(String::from), refresh.map(String::from))
    }

    #[tokio::test]
    async fn test_success_attaches_bearer() {
        let transport = ScriptedTransport::new();
        transport.respond(Method::GET, NEXT, 200, "{}");

        let out = client(&transport)
            .request(ApiRequest::get(NEXT), &creds(Some("a1"), Some("r1")))
            .await
            .unwrap();

        assert_eq!(out.response.status, 200);
        assert!(!out.refreshed);
        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].bearer.as_deref(), Some("a1"));
    }

    #[tokio::test]
    async fn test_no_access_token_sends_no_header() {
        let transport = ScriptedTransport::new();
        transport.respond(Method::GET, NEXT, 200, "{}");

        client(&transport)
            .request(ApiRequest::get(NEXT), &Credentials::anonymous())
            .await
            .unwrap();

        assert!(transport.calls()[0].bearer.is_none());
    }

    #[tokio::test]
    async fn test_refresh_and_retry_once() {
        let transport = ScriptedTransport::new();
        transport
            .respond(Method::GET, NEXT, 401, EXPIRED)
            .respond(Method::GET, NEXT, 200, r#"{"ok":true}"#)
            .respond(Method::POST, REFRESH, 200, r#"{"access":"a2"}"#);

        let out = client(&transport)
            .request(ApiRequest::get(NEXT), &creds(Some("a1"), Some("r1")))
            .await
            .unwrap();

        assert_eq!(out.response.status, 200);
        assert!(out.refreshed);
        assert_eq!(out.access_token.as_deref(), Some("a2"));
        assert_eq!(transport.calls_to(NEXT), 2);
        assert_eq!(transport.calls_to(REFRESH), 1);

        let calls = transport.calls();
        assert_eq!(calls[0].bearer.as_deref(), Some("a1"));
        assert_eq!(calls[1].url, REFRESH);
        assert!(calls[1].bearer.is_none());
        assert_eq!(calls[1].body, Some(json!({ "refresh": "r1" })));
        assert_eq!(calls[2].bearer.as_deref(), Some("a2"));
    }

    #[tokio::test]
    async fn test_refresh_accepts_token_field() {
        let transport = ScriptedTransport::new();
        transport
            .respond(Method::GET, NEXT, 401, r#"{"detail":"Given token not valid for any token type"}"#)
            .respond(Method::GET, NEXT, 200, "{}")
            .respond(Method::POST, REFRESH, 200, r#"{"token":"t2"}"#);

        let out = client(&transport)
            .request(ApiRequest::get(NEXT), &creds(Some("a1"), Some("r1")))
            .await
            .unwrap();

        assert_eq!(out.access_token.as_deref(), Some("t2"));
    }

    #[tokio::test]
    async fn test_failed_retry_is_not_retried_again() {
        let transport = ScriptedTransport::new();
        transport
            .respond(Method::GET, NEXT, 401, EXPIRED)
            .respond(Method::POST, REFRESH, 200, r#"{"access":"a2"}"#);

        let out = client(&transport)
            .request(ApiRequest::get(NEXT), &creds(Some("a1"), Some("r1")))
            .await
            .unwrap();

        assert_eq!(out.response.status, 401);
        assert_eq!(transport.calls_to(NEXT), 2);
        assert_eq!(transport.calls_to(REFRESH), 1);
    }

    #[tokio::test]
    async fn test_refresh_failure_returns_original_response() {
        let transport = ScriptedTransport::new();
        transport
            .respond(Method::GET, NEXT, 401, EXPIRED)
            .respond(Method::POST, REFRESH, 401, r#"{"detail":"refresh expired"}"#);

        let out = client(&transport)
            .request(ApiRequest::get(NEXT), &creds(Some("a1"), Some("r1")))
            .await
            .unwrap();

        assert_eq!(out.response, ApiResponse::new(401, EXPIRED));
        assert!(!out.refreshed);
        assert_eq!(out.access_token.as_deref(), Some("a1"));
        assert_eq!(transport.calls_to(NEXT), 1);
        assert_eq!(transport.calls_to(REFRESH), 1);
    }

    #[tokio::test]
    async fn test_refresh_transport_error_returns_original_response() {
        let transport = ScriptedTransport::new();
        transport
            .respond(Method::GET, NEXT, 401, EXPIRED)
            .time_out(Method::POST, REFRESH);

        let out = client(&transport)
            .request(ApiRequest::get(NEXT), &creds(Some("a1"), Some("r1")))
            .await
            .unwrap();

        assert_eq!(out.response.status, 401);
        assert_eq!(transport.calls_to(NEXT), 1);
    }

    #[tokio::test]
    async fn test_refresh_without_token_in_body_returns_original() {
        let transport = ScriptedTransport::new();
        transport
            .respond(Method::GET, NEXT, 401, EXPIRED)
            .respond(Method::POST, REFRESH, 200, r#"{"refresh":"r2"}"#);

        let out = client(&transport)
            .request(ApiRequest::get(NEXT), &creds(Some("a1"), Some("r1")))
            .await
            .unwrap();

        assert_eq!(out.response.status, 401);
        assert_eq!(transport.calls_to(NEXT), 1);
    }

    #[tokio::test]
    async fn test_other_failures_do_not_refresh() {
        let transport = ScriptedTransport::new();
        transport.respond(Method::GET, NEXT, 500, r#"{"detail":"server error"}"#);

        let out = client(&transport)
            .request(ApiRequest::get(NEXT), &creds(Some("a1"), Some("r1")))
            .await
            .unwrap();

        assert_eq!(out.response.status, 500);
        assert_eq!(transport.calls_to(REFRESH), 0);
    }

    #[tokio::test]
    async fn test_no_refresh_token_returns_original() {
        let transport = ScriptedTransport::new();
        transport.respond(Method::GET, NEXT, 401, EXPIRED);

        let out = client(&transport)
            .request(ApiRequest::get(NEXT), &creds(Some("a1"), None))
            .await
            .unwrap();

        assert_eq!(out.response.status, 401);
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let transport = ScriptedTransport::new();
        transport.time_out(Method::GET, NEXT);

        let err = client(&transport)
            .request(ApiRequest::get(NEXT), &creds(Some("a1"), Some("r1")))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Timeout));
    }

    #[test]
    fn test_is_token_invalid() {
        assert!(is_token_invalid(&ApiResponse::new(401, EXPIRED)));
        assert!(!is_token_invalid(&ApiResponse::new(401, r#"{"code":"other"}"#)));
        assert!(!is_token_invalid(&ApiResponse::new(401, "not json")));
        assert!(!is_token_invalid(&ApiResponse::new(401, "[]")));
    }
}
