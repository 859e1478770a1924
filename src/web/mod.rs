//! Local web shell for the squill dashboard.
//!
//! A lightweight HTTP server (sync, via `tiny_http`) that serves:
//! - the landing page, the login page and the dashboard page,
//! - a JSON API the pages call for the session, dashboard data, invoice
//!   documents and the pricing catalogue.
//!
//! The only state the shell holds is the login token, kept by the API
//! client's token store. Launched via `squill serve` (default:
//! `http://127.0.0.1:9820`).

mod api;
mod frontend;

use std::io::{Cursor, Read};

use anyhow::{Context, Result};
use tiny_http::{Header, Method, Response, Server, StatusCode};

use crate::api::{ApiClient, TokenStore};
use crate::config::SquillConfig;
use crate::dashboard::Variant;
use crate::events::EventLog;

pub(crate) type HttpResponse = Response<Cursor<Vec<u8>>>;

// ---------------------------------------------------------------------------
// Shell state
// ---------------------------------------------------------------------------

/// Everything a request handler can touch.
pub struct Shell<S: TokenStore> {
    client: ApiClient<S>,
    events: EventLog,
    default_variant: Variant,
}

impl<S: TokenStore> Shell<S> {
    pub fn new(client: ApiClient<S>, events: EventLog, default_variant: Variant) -> Self {
        Self {
            client,
            events,
            default_variant,
        }
    }

    pub fn client(&self) -> &ApiClient<S> {
        &self.client
    }

    /// Dispatch an incoming request to the appropriate handler.
    pub fn handle(&mut self, method: &Method, url: &str, body: Option<&str>) -> Result<HttpResponse> {
        // Strip query string for path matching
        let path = url.split('?').next().unwrap_or(url);

        match (method, path) {
            // Pages
            (&Method::Get, "/") | (&Method::Get, "/index.html") => {
                Ok(html(frontend::LANDING_HTML))
            }
            (&Method::Get, "/login") => Ok(html(frontend::LOGIN_HTML)),
            (&Method::Get, "/static/squill.css") => Ok(Response::from_data(
                frontend::STYLE_CSS.as_bytes().to_vec(),
            )
            .with_header(header("Content-Type", "text/css; charset=utf-8"))
            .with_status_code(StatusCode(200))),
            (&Method::Get, "/dashboard") => {
                if self.client.is_authenticated() {
                    Ok(html(frontend::DASHBOARD_HTML))
                } else {
                    Ok(redirect("/login"))
                }
            }

            // API Session
            (&Method::Post, "/api/auth/login") => api::post_login(self, body.unwrap_or("{}")),
            (&Method::Post, "/api/auth/logout") => api::post_logout(self),
            (&Method::Get, "/api/session") => api::get_session(self),

            // API Dashboard
            (&Method::Get, "/api/dashboard") => api::get_dashboard(self, url),
            (&Method::Get, p) if p.starts_with("/api/invoices/") => {
                match invoice_pdf_id(p) {
                    Some(id) => api::get_invoice_pdf(self, &id, url),
                    None => Ok(not_found()),
                }
            }

            // API Pricing and health
            (&Method::Get, "/api/pricing-tiers") => api::get_pricing_tiers(self),
            (&Method::Get, "/api/health") => api::get_health(self),

            // Unknown API routes 404; unknown pages go back to the landing page
            (_, p) if p.starts_with("/api/") => Ok(not_found()),
            (&Method::Get, _) => Ok(redirect("/")),
            _ => Ok(not_found()),
        }
    }

    /// Variant named by `?variant=`, else the configured default.
    fn variant_param(&self, url: &str) -> Result<Variant> {
        match query_param(url, "variant") {
            Some(v) => v.parse(),
            None => Ok(self.default_variant),
        }
    }
}

// ---------------------------------------------------------------------------
// Server entry point
// ---------------------------------------------------------------------------

/// Start the shell on `[web] addr` and block serving requests.
pub fn serve(config: &SquillConfig) -> Result<()> {
    let addr = &config.web.addr;
    let server = Server::http(addr.as_str())
        .map_err(|e| anyhow::anyhow!("failed to start HTTP server on {addr}: {e}"))?;

    println!("squill dashboard running at http://{addr}");
    println!("Press Ctrl+C to stop.\n");

    if config.web.open_browser {
        // Best-effort
        let _ = open_browser(&format!("http://{addr}"));
    }

    let shell = Shell::new(
        ApiClient::from_config(config),
        EventLog::from_config(config),
        config.dashboard.variant,
    );
    run(server, shell);
    Ok(())
}

/// Serve requests from `server` until it shuts down.
///
/// Handles requests sequentially. A failing handler answers 500 without
/// stopping the server.
pub fn run<S: TokenStore>(server: Server, mut shell: Shell<S>) {
    for mut request in server.incoming_requests() {
        let method = request.method().clone();
        let url = request.url().to_string();

        // Read body up-front for methods that carry one
        let body = if matches!(method, Method::Put | Method::Post | Method::Patch) {
            let mut buf = String::new();
            let _ = request.as_reader().read_to_string(&mut buf);
            Some(buf)
        } else {
            None
        };

        let response = match shell.handle(&method, &url, body.as_deref()) {
            Ok(resp) => resp,
            Err(e) => json_error(500, &format!("{e:#}")),
        };
        let _ = request.respond(response);

        // Brief access log
        println!(
            "{} {} {}",
            method,
            url,
            chrono::Local::now().format("%H:%M:%S")
        );
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Value of `key` in the URL's query string, percent-decoded.
fn query_param(url: &str, key: &str) -> Option<String> {
    url.split_once('?')?.1.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        (k == key && !v.is_empty()).then(|| percent_decode(&v.replace('+', " ")))
    })
}

/// `/api/invoices/{id}/pdf` → `{id}`.
fn invoice_pdf_id(path: &str) -> Option<String> {
    let id = path.strip_prefix("/api/invoices/")?.strip_suffix("/pdf")?;
    (!id.is_empty() && !id.contains('/')).then(|| percent_decode(id))
}

/// Percent-decode `s`; text that does not decode to UTF-8 is kept as is.
fn percent_decode(s: &str) -> String {
    urlencoding::decode(s)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| s.to_string())
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

fn html(page: &str) -> HttpResponse {
    Response::from_data(page.as_bytes().to_vec())
        .with_header(content_type_html())
        .with_status_code(StatusCode(200))
}

/// 302 to `location`.
fn redirect(location: &str) -> HttpResponse {
    Response::from_data(Vec::new())
        .with_header(header("Location", location))
        .with_status_code(StatusCode(302))
}

fn not_found() -> HttpResponse {
    json_error(404, "not found")
}

/// `{"error": message}` with the given status.
pub(crate) fn json_error(status: u16, message: &str) -> HttpResponse {
    let body = serde_json::json!({ "error": message }).to_string();
    Response::from_data(body.into_bytes())
        .with_header(content_type_json())
        .with_status_code(StatusCode(status))
}

pub(crate) fn header(name: &str, value: &str) -> Header {
    Header::from_bytes(name.as_bytes(), value.as_bytes()).unwrap()
}

/// JSON content type header.
pub(crate) fn content_type_json() -> Header {
    header("Content-Type", "application/json; charset=utf-8")
}

/// HTML content type header.
fn content_type_html() -> Header {
    header("Content-Type", "text/html; charset=utf-8")
}

/// Attempt to open a URL in the system default browser.
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", url])
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
