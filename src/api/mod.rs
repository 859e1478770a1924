//! Billing API HTTP client.
//!
//! A thin synchronous wrapper over `ureq` that:
//!
//! - prefixes every endpoint with the configured base URL,
//! - sends `Content-Type: application/json` and, when a token is known,
//!   `Authorization: Bearer <token>`,
//! - clears the stored token on a 401 and reports
//!   [`ApiError::AuthenticationFailed`],
//! - short-circuits the demo credential pair without touching the network.
//!
//! No retry, refresh or de-duplication of concurrent requests.

pub mod token;

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::{self, SquillConfig};
use crate::events::{Event, EventKind, EventLog};
use crate::model::{Customer, Invoice};

pub use token::{FileTokenStore, MemoryTokenStore, TokenStore};

/// Prefix of tokens minted for the demo credentials.
pub const DEMO_TOKEN_PREFIX: &str = "demo_token_";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure of a single API call.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server answered 401. The stored token has been cleared.
    #[error("Authentication failed")]
    AuthenticationFailed,
    /// Any other non-2xx answer.
    #[error("HTTP error! status: {status}")]
    Http { status: u16 },
    /// The request never produced a response (DNS, connect, timeout).
    #[error("request failed: {0}")]
    Transport(String),
    /// The response body was not the expected JSON.
    #[error("invalid response body: {0}")]
    Decode(String),
    /// The token could not be persisted or removed.
    #[error("token storage failed: {0}")]
    Storage(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub user: Option<serde_json::Value>,
}

/// Body for `POST /customers`.
#[derive(Debug, Clone, Serialize)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
    pub pricing_tier: String,
}

/// Body for `POST /invoices`.
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceRequest {
    pub customer_id: String,
    /// `current_month` or `previous_month`.
    pub billing_period: String,
}

/// Body for `POST /usage`.
#[derive(Debug, Clone, Serialize)]
pub struct UsageRecord {
    pub customer_id: String,
    pub event_type: String,
    pub quantity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Synchronous billing API client.
///
/// Generic over where the token lives so the CLI can persist it to disk
/// while tests keep it in memory.
#[derive(Debug)]
pub struct ApiClient<S: TokenStore> {
    base_url: String,
    timeout: Duration,
    demo_email: String,
    demo_password: String,
    token: Option<String>,
    store: S,
    events: EventLog,
}

impl ApiClient<FileTokenStore> {
    /// Build a client from the resolved config, persisting the token to
    /// `[auth] token_file`.
    pub fn from_config(config: &SquillConfig) -> Self {
        let store = FileTokenStore::new(config::expand_home(&config.auth.token_file));
        let mut client = Self::new(
            &config.api.base_url,
            Duration::from_millis(config.api.timeout_ms),
            store,
        )
        .with_events(EventLog::from_config(config));
        client.demo_email = config.api.demo_email.clone();
        client.demo_password = config.api.demo_password.clone();
        client
    }
}

impl<S: TokenStore> ApiClient<S> {
    /// Build a client. A token already in `store` is picked up immediately.
    pub fn new(base_url: &str, timeout: Duration, store: S) -> Self {
        let token = store.load();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            demo_email: "admin@squill.com".to_string(),
            demo_password: "demo123".to_string(),
            token,
            store,
            events: EventLog::disabled(),
        }
    }

    pub fn with_events(mut self, events: EventLog) -> Self {
        self.events = events;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // -- Session --

    /// Log in. The demo pair never reaches the network.
    pub fn login(&mut self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        if email == self.demo_email && password == self.demo_password {
            let token = format!(
                "{DEMO_TOKEN_PREFIX}{}",
                chrono::Utc::now().timestamp_millis()
            );
            self.persist_token(&token)?;
            self.events
                .record(Event::new(EventKind::Login).detail(format!("demo {email}")));
            return Ok(LoginResponse {
                token,
                user: Some(serde_json::Value::String(email.to_string())),
            });
        }

        let body = LoginRequest { email, password };
        let response: LoginResponse = self.post("/auth/login", &body)?;
        self.persist_token(&response.token)?;
        self.events
            .record(Event::new(EventKind::Login).detail(format!("remote {email}")));
        Ok(response)
    }

    /// Forget the token in memory and in the store.
    pub fn logout(&mut self) -> Result<(), ApiError> {
        self.token = None;
        self.store.clear()?;
        self.events.record(Event::new(EventKind::Logout));
        Ok(())
    }

    /// Use `token` for subsequent requests without persisting it.
    pub fn set_token(&mut self, token: &str) {
        self.token = Some(token.to_string());
    }

    /// The in-memory token, else whatever the store holds.
    pub fn token(&self) -> Option<String> {
        self.token.clone().or_else(|| self.store.load())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    fn persist_token(&mut self, token: &str) -> Result<(), ApiError> {
        self.token = Some(token.to_string());
        self.store.save(token)?;
        Ok(())
    }

    // -- Endpoints --

    /// `GET /analytics`. Returned raw: the payload may be bare or wrapped
    /// in a `data` envelope.
    pub fn get_analytics(&mut self) -> Result<serde_json::Value, ApiError> {
        self.get("/analytics")
    }

    pub fn get_customers(&mut self) -> Result<Vec<Customer>, ApiError> {
        self.get("/customers")
    }

    pub fn get_customer(&mut self, customer_id: &str) -> Result<Customer, ApiError> {
        self.get(&format!("/customers/{customer_id}"))
    }

    pub fn create_customer(&mut self, customer: &NewCustomer) -> Result<Customer, ApiError> {
        self.post("/customers", customer)
    }

    pub fn get_invoices(&mut self) -> Result<Vec<Invoice>, ApiError> {
        self.get("/invoices")
    }

    pub fn get_invoice(&mut self, invoice_id: &str) -> Result<Invoice, ApiError> {
        self.get(&format!("/invoices/{invoice_id}"))
    }

    pub fn generate_invoice(&mut self, request: &InvoiceRequest) -> Result<Invoice, ApiError> {
        self.post("/invoices", request)
    }

    pub fn get_usage(&mut self, customer_id: &str) -> Result<serde_json::Value, ApiError> {
        self.get(&format!("/usage/{customer_id}"))
    }

    pub fn record_usage(&mut self, usage: &UsageRecord) -> Result<serde_json::Value, ApiError> {
        self.post("/usage", usage)
    }

    pub fn get_pricing_tiers(&mut self) -> Result<serde_json::Value, ApiError> {
        self.get("/pricing-tiers")
    }

    // -- Transport --

    fn get<T: DeserializeOwned>(&mut self, endpoint: &str) -> Result<T, ApiError> {
        self.request("GET", endpoint, None)
    }

    fn post<B: Serialize, T: DeserializeOwned>(
        &mut self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_string(body).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.request("POST", endpoint, Some(&body))
    }

    /// Send one request and decode the JSON answer.
    pub fn request<T: DeserializeOwned>(
        &mut self,
        method: &str,
        endpoint: &str,
        body: Option<&str>,
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let mut req = ureq::request(method, &url)
            .timeout(self.timeout)
            .set("Content-Type", "application/json");
        if let Some(token) = self.token() {
            req = req.set("Authorization", &format!("Bearer {token}"));
        }

        let result = match body {
            Some(body) => req.send_string(body),
            None => req.call(),
        };

        match result {
            Ok(resp) => resp
                .into_json::<T>()
                .map_err(|e| ApiError::Decode(e.to_string())),
            Err(ureq::Error::Status(401, _)) => {
                self.token = None;
                let _ = self.store.clear();
                self.events.record(
                    Event::new(EventKind::AuthFailure).detail(format!("{method} {endpoint}")),
                );
                Err(ApiError::AuthenticationFailed)
            }
            Err(ureq::Error::Status(status, _)) => Err(ApiError::Http { status }),
            Err(ureq::Error::Transport(t)) => Err(ApiError::Transport(t.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_client() -> ApiClient<MemoryTokenStore> {
        // Port 9 (discard) on loopback is never served in test environments.
        ApiClient::new(
            "http://127.0.0.1:9/api/",
            Duration::from_millis(200),
            MemoryTokenStore::new(),
        )
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        assert_eq!(offline_client().base_url(), "http://127.0.0.1:9/api");
    }

    #[test]
    fn demo_login_mints_prefixed_token_without_network() {
        let mut client = offline_client();
        let resp = client.login("admin@squill.com", "demo123").unwrap();
        assert!(resp.token.starts_with(DEMO_TOKEN_PREFIX));
        assert_eq!(client.store().load(), Some(resp.token.clone()));
        assert!(client.is_authenticated());
    }

    #[test]
    fn non_demo_login_goes_to_network() {
        let mut client = offline_client();
        let err = client.login("admin@squill.com", "wrong").unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
        assert!(!client.is_authenticated());
    }

    #[test]
    fn logout_clears_token() {
        let mut client = offline_client();
        client.login("admin@squill.com", "demo123").unwrap();
        client.logout().unwrap();
        assert!(!client.is_authenticated());
        assert_eq!(client.store().load(), None);
    }

    #[test]
    fn token_falls_back_to_store() {
        let client = ApiClient::new(
            "http://127.0.0.1:9",
            Duration::from_millis(200),
            MemoryTokenStore::with_token("stored"),
        );
        assert_eq!(client.token().as_deref(), Some("stored"));
    }

    #[test]
    fn error_messages_match_signals() {
        assert_eq!(ApiError::AuthenticationFailed.to_string(), "Authentication failed");
        assert_eq!(
            ApiError::Http { status: 503 }.to_string(),
            "HTTP error! status: 503"
        );
    }
}
