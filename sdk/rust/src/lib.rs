//! HTTP client for the charity platform API.

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

pub type SdkResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Error body returned by the API on every failure.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
}

#[derive(Debug)]
pub struct ApiFailure {
    pub status: StatusCode,
    pub message: String,
}

impl std::fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "API returned {}: {}", self.status, self.message)
    }
}

impl std::error::Error for ApiFailure {}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRegistration {
    pub wallet_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationPayload {
    pub donor_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_signature: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub is_anonymous: bool,
}

pub struct CharityClient {
    client: Client,
    base_url: String,
    admin_key: Option<String>,
}

impl CharityClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            admin_key: None,
        }
    }

    /// Send this key as a bearer token on `/admin` calls.
    pub fn with_admin_key(mut self, key: &str) -> Self {
        self.admin_key = Some(key.to_string());
        self
    }

    pub async fn health(&self) -> SdkResult<Value> {
        self.send(self.build(Method::GET, "/health")).await
    }

    pub async fn stats(&self) -> SdkResult<Value> {
        self.send(self.build(Method::GET, "/api/stats")).await
    }

    pub async fn register_user(&self, user: &UserRegistration) -> SdkResult<Value> {
        self.send(self.build(Method::POST, "/api/users").json(user)).await
    }

    pub async fn user(&self, wallet: &str) -> SdkResult<Value> {
        self.send(self.build(Method::GET, "/api/users").query(&[("wallet", wallet)]))
            .await
    }

    /// Public requests; `query` holds page, limit and filter pairs.
    pub async fn list_requests(&self, query: &[(&str, &str)]) -> SdkResult<Value> {
        self.send(self.build(Method::GET, "/api/requests").query(query))
            .await
    }

    pub async fn request(&self, id: &str) -> SdkResult<Value> {
        self.send(self.build(Method::GET, &format!("/api/requests/{id}")))
            .await
    }

    pub async fn create_request(&self, body: &Value) -> SdkResult<Value> {
        self.send(self.build(Method::POST, "/api/requests").json(body))
            .await
    }

    pub async fn list_projects(&self, query: &[(&str, &str)]) -> SdkResult<Value> {
        self.send(self.build(Method::GET, "/api/projects").query(query))
            .await
    }

    pub async fn record_donation(&self, donation: &DonationPayload) -> SdkResult<Value> {
        self.send(self.build(Method::POST, "/api/donations").json(donation))
            .await
    }

    pub async fn wallet(&self, address: &str) -> SdkResult<Value> {
        self.send(self.build(Method::GET, &format!("/api/wallet/{address}")))
            .await
    }

    pub async fn zakat_pool(&self) -> SdkResult<Value> {
        self.send(self.build(Method::GET, "/api/zakat/pool")).await
    }

    pub async fn admin_status(&self) -> SdkResult<Value> {
        self.send(self.admin(Method::GET, "/admin/status")).await
    }

    pub async fn approve_request(&self, id: &str) -> SdkResult<Value> {
        self.send(self.admin(Method::POST, &format!("/admin/requests/{id}/approve")))
            .await
    }

    pub async fn reject_request(&self, id: &str, reason: &str) -> SdkResult<Value> {
        let body = serde_json::json!({ "reason": reason });
        self.send(self.admin(Method::POST, &format!("/admin/requests/{id}/reject")).json(&body))
            .await
    }

    fn build(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, format!("{}{}", self.base_url, path))
    }

    fn admin(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.build(method, path);
        match &self.admin_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> SdkResult<T> {
        let resp = builder.send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .map(|body| body.error)
                .unwrap_or(text);
            return Err(Box::new(ApiFailure { status, message }));
        }

        Ok(serde_json::from_str(&text)?)
    }
}
