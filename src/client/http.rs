//! HTTP implementation of the provisioning client.

use super::{
    ClientError, OrderRequest, ProductKind, ProductRecord, ProductUpdate, ProvisioningClient,
    VxcRecord, VxcUpdate,
};
use crate::catalog::{Location, PartnerPort};
use crate::config::ApiConfig;
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Tokens are refreshed this long before the remote says they expire.
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// API credentials exchanged for a bearer token.
#[derive(Clone)]
pub struct Credentials {
    pub access_key: String,
    pub secret_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    refresh_at: Option<Instant>,
}

impl AccessToken {
    fn is_fresh(&self) -> bool {
        self.refresh_at.is_none_or(|at| Instant::now() < at)
    }
}

/// Provisioning client speaking the remote JSON API.
///
/// Handles:
/// - OAuth2 client-credentials token exchange, refreshed before expiry
/// - `{ "message": ..., "data": ... }` response envelopes
/// - Mapping of transport and HTTP failures onto [`ClientError`]
pub struct HttpProvisioningClient {
    /// Base URL (e.g., "https://api.megaport.com")
    base_url: String,
    /// Token endpoint, `None` when a static token is used
    auth_url: Option<String>,
    credentials: Option<Credentials>,
    /// Shared HTTP client for connection pooling
    client: Arc<Client>,
    timeout: Duration,
    token: Mutex<Option<AccessToken>>,
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    message: String,
    #[serde(default)]
    data: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderReceipt {
    technical_service_uid: String,
}

impl HttpProvisioningClient {
    /// Client that exchanges `credentials` at `auth_url` on first use.
    pub fn new(
        base_url: impl Into<String>,
        auth_url: impl Into<String>,
        credentials: Credentials,
        timeout: Duration,
    ) -> Self {
        Self {
            base_url: trim_base(base_url.into()),
            auth_url: Some(auth_url.into()),
            credentials: Some(credentials),
            client: Arc::new(Client::new()),
            timeout,
            token: Mutex::new(None),
        }
    }

    /// Client using a pre-issued bearer token that is never refreshed.
    pub fn with_token(base_url: impl Into<String>, token: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: trim_base(base_url.into()),
            auth_url: None,
            credentials: None,
            client: Arc::new(Client::new()),
            timeout,
            token: Mutex::new(Some(AccessToken {
                value: token.into(),
                refresh_at: None,
            })),
        }
    }

    /// Build a client from configuration, reading credentials from the
    /// environment variables it names.
    pub fn from_config(config: &ApiConfig) -> Result<Self, ClientError> {
        let read = |name: &str| {
            std::env::var(name)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| {
                    ClientError::Configuration(format!("environment variable {} is not set", name))
                })
        };
        let credentials = Credentials {
            access_key: read(&config.access_key_env)?,
            secret_key: read(&config.secret_key_env)?,
        };
        Ok(Self::new(
            config.resolved_base_url(),
            config.resolved_auth_url(),
            credentials,
            Duration::from_secs(config.request_timeout_seconds),
        ))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn bearer_token(&self) -> Result<String, ClientError> {
        let mut guard = self.token.lock().await;
        if let Some(token) = guard.as_ref().filter(|t| t.is_fresh()) {
            return Ok(token.value.clone());
        }

        let (auth_url, credentials) = match (&self.auth_url, &self.credentials) {
            (Some(url), Some(credentials)) => (url, credentials),
            _ => {
                return Err(ClientError::Authentication(
                    "static token expired and no credentials are configured".to_string(),
                ))
            }
        };

        tracing::debug!(auth_url = %auth_url, "Requesting access token");
        let response = self
            .client
            .post(auth_url)
            .basic_auth(&credentials.access_key, Some(&credentials.secret_key))
            .form(&[("grant_type", "client_credentials")])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Authentication(format!(
                "token endpoint returned {}: {}",
                status, body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| ClientError::Authentication(format!("unreadable token response: {}", e)))?;

        let refresh_at = token.expires_in.map(|secs| {
            Instant::now() + Duration::from_secs(secs).saturating_sub(TOKEN_REFRESH_MARGIN)
        });
        let value = token.access_token.clone();
        *guard = Some(AccessToken {
            value: token.access_token,
            refresh_at,
        });
        Ok(value)
    }

    async fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let token = self.bearer_token().await?;
        Ok(self
            .client
            .request(method, format!("{}{}", self.base_url, path))
            .bearer_auth(token)
            .header("accept", "application/json")
            .timeout(self.timeout))
    }

    fn transport_error(&self, e: reqwest::Error) -> ClientError {
        if e.is_timeout() {
            ClientError::Timeout(self.timeout.as_millis() as u64)
        } else {
            ClientError::Network(e.to_string())
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ClientError> {
        let response = request.send().await.map_err(|e| self.transport_error(e))?;
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::InvalidResponse(format!("Failed to read response body: {}", e)))?;
        Err(ClientError::Upstream {
            status,
            message: upstream_message(&body),
        })
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = self.send(request).await?;
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::InvalidResponse(format!("Failed to read response body: {}", e)))?;
        let envelope: Envelope<T> = serde_json::from_str(&body)
            .map_err(|e| ClientError::InvalidResponse(format!("Failed to parse response: {}", e)))?;
        Ok(envelope.data)
    }
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

/// Remote error text: the envelope message plus any detail it carries,
/// or the raw body when it is not an envelope.
fn upstream_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) if !envelope.message.is_empty() => match envelope.data {
            Some(serde_json::Value::String(detail)) if !detail.is_empty() => {
                format!("{} {}", envelope.message, detail)
            }
            _ => envelope.message,
        },
        _ => body.trim().to_string(),
    }
}

#[async_trait]
impl ProvisioningClient for HttpProvisioningClient {
    async fn list_locations(&self) -> Result<Vec<Location>, ClientError> {
        let request = self.request(Method::GET, "/v2/locations").await?;
        self.send_json(request).await
    }

    async fn list_partner_ports(&self) -> Result<Vec<PartnerPort>, ClientError> {
        let request = self
            .request(Method::GET, "/v2/dropdowns/partner/megaports")
            .await?;
        self.send_json(request).await
    }

    async fn submit_order(&self, order: &OrderRequest) -> Result<String, ClientError> {
        let request = self
            .request(Method::POST, "/v3/networkdesign/buy")
            .await?
            .json(&[order]);
        let receipts: Vec<OrderReceipt> = self.send_json(request).await?;
        let uid = receipts
            .into_iter()
            .next()
            .map(|r| r.technical_service_uid)
            .ok_or_else(|| ClientError::InvalidResponse("order accepted without a product uid".to_string()))?;

        tracing::info!(uid = %uid, kind = ?order.kind(), "Order submitted");
        Ok(uid)
    }

    async fn submit_update(&self, uid: &str, update: &VxcUpdate) -> Result<(), ClientError> {
        let request = self
            .request(Method::PUT, &format!("/v2/product/vxc/{}", uid))
            .await?
            .json(update);
        self.send(request).await?;
        tracing::info!(uid, rate_limit = update.rate_limit, "Connection update submitted");
        Ok(())
    }

    async fn submit_product_update(
        &self,
        uid: &str,
        kind: ProductKind,
        update: &ProductUpdate,
    ) -> Result<(), ClientError> {
        let request = self
            .request(Method::PUT, &format!("/v2/product/{}/{}", kind.path_segment(), uid))
            .await?
            .json(update);
        self.send(request).await?;
        tracing::info!(uid, kind = ?kind, "Product update submitted");
        Ok(())
    }

    async fn submit_delete(&self, uid: &str, destructive: bool) -> Result<(), ClientError> {
        let request = self
            .request(Method::POST, &format!("/v3/product/{}/action/CANCEL_NOW", uid))
            .await?
            .query(&[("safeDelete", (!destructive).to_string())]);
        self.send(request).await?;
        tracing::info!(uid, destructive, "Delete submitted");
        Ok(())
    }

    async fn get_vxc(&self, uid: &str) -> Result<VxcRecord, ClientError> {
        let request = self
            .request(Method::GET, &format!("/v2/product/{}", uid))
            .await?;
        self.send_json(request).await
    }

    async fn get_product(&self, uid: &str) -> Result<ProductRecord, ClientError> {
        let request = self
            .request(Method::GET, &format!("/v2/product/{}", uid))
            .await?;
        self.send_json(request).await
    }
}
