// Microsoft identity platform client.
//
// Exchanges the application's client credentials for a Graph bearer token.
// The endpoint reports failures inside the JSON body, so the body decides
// the outcome and the HTTP status code is deliberately ignored.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::GraphSettings;
use crate::core::delivery::{DeliveryError, IdentityProvider};

const DEFAULT_LOGIN_BASE: &str = "https://login.microsoftonline.com";
const GRAPH_SCOPE: &str = "https://graph.microsoft.com/.default";

pub struct GraphIdentityClient {
    client: Client,
    login_base: String,
    tenant: String,
    app_id: String,
    app_secret: String,
}

impl GraphIdentityClient {
    pub fn new(client: Client, settings: &GraphSettings) -> Self {
        Self {
            client,
            login_base: DEFAULT_LOGIN_BASE.to_string(),
            tenant: settings.tenant.clone(),
            app_id: settings.app_id.clone(),
            app_secret: settings.app_secret.clone(),
        }
    }

    /// Point the client at a different token endpoint host. Tests use this
    /// to swap in a local server.
    pub fn with_login_base(mut self, base: impl Into<String>) -> Self {
        self.login_base = base.into();
        self
    }

    fn token_url(&self) -> String {
        format!("{}/{}/oauth2/v2.0/token", self.login_base, self.tenant)
    }
}

#[async_trait]
impl IdentityProvider for GraphIdentityClient {
    async fn authenticate(&self) -> Result<String, DeliveryError> {
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.app_id.as_str()),
            ("client_secret", self.app_secret.as_str()),
            ("scope", GRAPH_SCOPE),
        ];

        let response = self
            .client
            .post(self.token_url())
            .form(&form)
            .send()
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        let body = response
            .text()
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        parse_token_body(&body)
    }
}

/// Decode a token response body.
///
/// An `error_description` field marks an explicit rejection; otherwise the
/// body must carry `access_token`. Anything else is malformed.
fn parse_token_body(body: &str) -> Result<String, DeliveryError> {
    let parsed: ApiTokenBody =
        serde_json::from_str(body).map_err(|e| DeliveryError::Parse(e.to_string()))?;

    if let Some(description) = parsed.error_description {
        return Err(DeliveryError::Auth(description));
    }

    parsed
        .access_token
        .ok_or_else(|| DeliveryError::Parse("token response has no access_token".to_string()))
}

// ============================================================================
// API RESPONSE TYPES
// ============================================================================

/// Both the success and the rejection shape of the token endpoint decode
/// from this one struct.
#[derive(Debug, Deserialize)]
struct ApiTokenBody {
    access_token: Option<String>,
    error_description: Option<String>,
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> GraphSettings {
        GraphSettings {
            app_id: "app-id".to_string(),
            app_secret: "app-secret".to_string(),
            tenant: "my-company.onmicrosoft.com".to_string(),
            site_name: "Site01".to_string(),
            library_name: "Incoming Faxes".to_string(),
        }
    }

    #[test]
    fn token_body_with_access_token_succeeds() {
        let token =
            parse_token_body(r#"{"token_type":"Bearer","expires_in":3599,"access_token":"tok-123"}"#)
                .unwrap();
        assert_eq!(token, "tok-123");
    }

    #[test]
    fn token_body_with_error_description_is_a_rejection() {
        let err = parse_token_body(
            r#"{"error":"invalid_client","error_description":"AADSTS7000215: Invalid client secret provided."}"#,
        )
        .unwrap_err();
        assert!(matches!(err, DeliveryError::Auth(_)));
        assert!(err.to_string().contains("AADSTS7000215"));
    }

    #[test]
    fn token_body_without_either_field_is_malformed() {
        let err = parse_token_body(r#"{"token_type":"Bearer"}"#).unwrap_err();
        assert!(matches!(err, DeliveryError::Parse(_)));

        let err = parse_token_body("<html>proxy error</html>").unwrap_err();
        assert!(matches!(err, DeliveryError::Parse(_)));
    }

    #[tokio::test]
    async fn authenticate_posts_client_credentials() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/my-company.onmicrosoft.com/oauth2/v2.0/token")
            .match_body(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("grant_type".into(), "client_credentials".into()),
                mockito::Matcher::UrlEncoded("client_id".into(), "app-id".into()),
                mockito::Matcher::UrlEncoded("client_secret".into(), "app-secret".into()),
                mockito::Matcher::UrlEncoded(
                    "scope".into(),
                    "https://graph.microsoft.com/.default".into(),
                ),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"token_type":"Bearer","expires_in":3599,"access_token":"tok-123"}"#)
            .create_async()
            .await;

        let client =
            GraphIdentityClient::new(Client::new(), &settings()).with_login_base(server.url());
        let token = client.authenticate().await.unwrap();

        assert_eq!(token, "tok-123");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn rejection_wins_over_the_status_code() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/my-company.onmicrosoft.com/oauth2/v2.0/token")
            .with_status(401)
            .with_body(
                r#"{"error":"invalid_client","error_description":"AADSTS7000215: Invalid client secret provided."}"#,
            )
            .create_async()
            .await;

        let client =
            GraphIdentityClient::new(Client::new(), &settings()).with_login_base(server.url());
        let err = client.authenticate().await.unwrap_err();

        assert!(matches!(err, DeliveryError::Auth(_)));
        assert!(err.to_string().contains("AADSTS7000215"));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_transport_error() {
        // Nothing listens on the discard port.
        let client = GraphIdentityClient::new(Client::new(), &settings())
            .with_login_base("http://127.0.0.1:9");
        let err = client.authenticate().await.unwrap_err();

        assert!(matches!(err, DeliveryError::Transport(_)));
    }
}
