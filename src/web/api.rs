//! JSON API handlers for the web shell.
//!
//! Each handler corresponds to an API endpoint and returns an
//! [`HttpResponse`], JSON except for the invoice document.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tiny_http::{Response, StatusCode};

use crate::api::TokenStore;
use crate::config;
use crate::dashboard::{self, AssemblyError, Variant};
use crate::events::{Event, EventKind};
use crate::invoice;
use crate::model::{DashboardData, DashboardSummary, Invoice};
use crate::pricing;

use super::{HttpResponse, Shell, content_type_json, header, json_error, query_param};

// ---------------------------------------------------------------------------
// JSON request/response types
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct LoginRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Serialize)]
struct SessionResponse {
    authenticated: bool,
    default_variant: Variant,
    variants: [Variant; 3],
}

/// Dashboard API response: the assembled payload plus its headline figures.
#[derive(Serialize)]
struct DashboardResponse {
    #[serde(flatten)]
    data: DashboardData,
    summary: DashboardSummary,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    api_base_url: String,
    authenticated: bool,
    config_exists: bool,
    event_log: Option<String>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build a JSON response with the given status.
fn json_status<T: Serialize>(status: u16, data: &T) -> Result<HttpResponse> {
    let body = serde_json::to_string(data).context("failed to serialize JSON response")?;
    Ok(Response::from_data(body.into_bytes())
        .with_header(content_type_json())
        .with_status_code(StatusCode(status)))
}

fn json_response<T: Serialize>(data: &T) -> Result<HttpResponse> {
    json_status(200, data)
}

/// Assemble `variant`, or the response to send instead.
///
/// A token cleared by a 401 during assembly answers 401 so the page returns
/// to the login screen.
fn assemble_for<S: TokenStore>(
    shell: &mut Shell<S>,
    variant: Variant,
) -> Result<DashboardData, HttpResponse> {
    let had_token = shell.client.is_authenticated();
    let result = dashboard::assemble_logged(variant, &mut shell.client, &shell.events);

    match result {
        Ok(_) if had_token && !shell.client.is_authenticated() => {
            Err(json_error(401, "Authentication failed"))
        }
        Ok(data) => Ok(data),
        Err(e @ AssemblyError::AuthenticationRequired) => Err(json_error(401, &e.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// `POST /api/auth/login`: body `{ "email": "...", "password": "..." }`.
pub fn post_login<S: TokenStore>(shell: &mut Shell<S>, body: &str) -> Result<HttpResponse> {
    let Ok(req) = serde_json::from_str::<LoginRequest>(body) else {
        return Ok(json_error(400, "invalid JSON in login request"));
    };
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Ok(json_error(400, "please enter credentials"));
    }

    match shell.client.login(req.email.trim(), &req.password) {
        Ok(resp) => json_response(&serde_json::json!({
            "token": resp.token,
            "user": resp.user,
        })),
        Err(_) => Ok(json_error(401, "invalid credentials")),
    }
}

/// `POST /api/auth/logout`.
pub fn post_logout<S: TokenStore>(shell: &mut Shell<S>) -> Result<HttpResponse> {
    shell.client.logout().context("failed to clear token")?;
    json_response(&serde_json::json!({ "success": true }))
}

/// `GET /api/session`.
pub fn get_session<S: TokenStore>(shell: &mut Shell<S>) -> Result<HttpResponse> {
    json_response(&SessionResponse {
        authenticated: shell.client.is_authenticated(),
        default_variant: shell.default_variant,
        variants: Variant::ALL,
    })
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// `GET /api/dashboard?variant=`: the assembled dashboard payload.
pub fn get_dashboard<S: TokenStore>(shell: &mut Shell<S>, url: &str) -> Result<HttpResponse> {
    let variant = match shell.variant_param(url) {
        Ok(v) => v,
        Err(e) => return Ok(json_error(400, &e.to_string())),
    };

    match assemble_for(shell, variant) {
        Ok(data) => json_response(&DashboardResponse {
            summary: data.summary(),
            data,
        }),
        Err(resp) => Ok(resp),
    }
}

/// `GET /api/invoices/{id}/pdf?variant=`: the invoice document as an
/// attachment. `latest` picks the first row shown by the variant.
pub fn get_invoice_pdf<S: TokenStore>(
    shell: &mut Shell<S>,
    invoice_id: &str,
    url: &str,
) -> Result<HttpResponse> {
    let variant = match shell.variant_param(url) {
        Ok(v) => v,
        Err(e) => return Ok(json_error(400, &e.to_string())),
    };

    let data = match assemble_for(shell, variant) {
        Ok(data) => data,
        Err(resp) => return Ok(resp),
    };

    let row = query_param(url, "row").and_then(|r| r.parse::<usize>().ok());
    let Some(record) = select_invoice(&data, invoice_id, row) else {
        return Ok(json_error(404, &format!("invoice {invoice_id} not found")));
    };

    let bytes = invoice::generate(&record);
    let file_name = invoice::file_name(&record);
    shell.events.record(
        Event::new(EventKind::InvoiceRendered)
            .detail(format!("{file_name} ({} bytes)", bytes.len()))
            .variant(variant),
    );

    Ok(Response::from_data(bytes)
        .with_header(header("Content-Type", "application/pdf"))
        .with_header(header(
            "Content-Disposition",
            &format!("attachment; filename=\"{file_name}\""),
        ))
        .with_status_code(StatusCode(200)))
}

/// The invoice a PDF link points at.
///
/// `latest` with `?row=N` is the N-th listed invoice, used for rows that
/// carry no id; bare `latest` is the first invoice.
fn select_invoice(data: &DashboardData, invoice_id: &str, row: Option<usize>) -> Option<Invoice> {
    if invoice_id != "latest" {
        return data.invoice(invoice_id).cloned();
    }
    match row {
        Some(i) => data.invoices.get(i).cloned(),
        None => Some(data.invoices.first().cloned().unwrap_or_default()),
    }
}

// ---------------------------------------------------------------------------
// Pricing and health
// ---------------------------------------------------------------------------

/// `GET /api/pricing-tiers`: the billing API's catalogue, else the
/// built-in one.
pub fn get_pricing_tiers<S: TokenStore>(shell: &mut Shell<S>) -> Result<HttpResponse> {
    match shell.client.get_pricing_tiers() {
        Ok(remote) => json_response(&serde_json::json!({
            "source": "api",
            "tiers": remote,
        })),
        Err(_) => json_response(&serde_json::json!({
            "source": "builtin",
            "tiers": pricing::tiers(),
        })),
    }
}

/// `GET /api/health`.
pub fn get_health<S: TokenStore>(shell: &mut Shell<S>) -> Result<HttpResponse> {
    let config_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);

    json_response(&HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        api_base_url: shell.client.base_url().to_string(),
        authenticated: shell.client.is_authenticated(),
        config_exists,
        event_log: shell.events.path().map(|p| p.display().to_string()),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_request_tolerates_missing_fields() {
        let req: LoginRequest = serde_json::from_str(r#"{"email": "a@b.c"}"#).unwrap();
        assert_eq!(req.email, "a@b.c");
        assert!(req.password.is_empty());
    }

    #[test]
    fn dashboard_response_flattens_payload() {
        let data = dashboard::fixture(Variant::Bento);
        let resp = DashboardResponse {
            summary: data.summary(),
            data,
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["variant"], "bento");
        assert_eq!(json["origin"], "fixture");
        assert_eq!(json["summary"]["customers"], 3);
        assert_eq!(json["analytics"]["total_revenue"], 47850.0);
    }

    #[test]
    fn pdf_link_row_selects_unnamed_invoice() {
        let mut data = dashboard::fixture(Variant::Bento);
        let unnamed = Invoice {
            invoice_id: None,
            customer_name: Some("Row Two".to_string()),
            ..Invoice::default()
        };
        data.invoices = vec![Invoice::new("INV-1", "First", 10.0), Invoice::default(), unnamed];

        let picked = select_invoice(&data, "latest", Some(2)).unwrap();
        assert_eq!(picked.customer_name.as_deref(), Some("Row Two"));
        assert_eq!(
            select_invoice(&data, "latest", None).unwrap().invoice_id.as_deref(),
            Some("INV-1")
        );
        assert!(select_invoice(&data, "latest", Some(3)).is_none());
        assert!(select_invoice(&data, "INV-9", None).is_none());
    }

    #[test]
    fn session_response_lists_variants() {
        let resp = SessionResponse {
            authenticated: false,
            default_variant: Variant::Brutalist,
            variants: Variant::ALL,
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains(r#""variants":["minimal","bento","brutalist"]"#));
    }
}
