/// Web shell tests.
///
/// Each test serves a fresh shell on an ephemeral port, backed by an
/// in-memory token and an unreachable billing API, and talks to it over
/// HTTP with redirects disabled.
use std::io::Read;
use std::thread;
use std::time::Duration;

use squill::api::{ApiClient, MemoryTokenStore};
use squill::dashboard::Variant;
use squill::events::EventLog;
use squill::web::{self, Shell};
use tiny_http::Server;

struct Harness {
    base: String,
    agent: ureq::Agent,
}

impl Harness {
    fn start() -> Self {
        let server = Server::http("127.0.0.1:0").unwrap();
        let port = server.server_addr().to_ip().unwrap().port();
        let client = ApiClient::new(
            "http://127.0.0.1:9/api",
            Duration::from_millis(300),
            MemoryTokenStore::new(),
        );
        let shell = Shell::new(client, EventLog::disabled(), Variant::Brutalist);
        thread::spawn(move || web::run(server, shell));

        Self {
            base: format!("http://127.0.0.1:{port}"),
            agent: ureq::AgentBuilder::new()
                .redirects(0)
                .timeout(Duration::from_secs(5))
                .build(),
        }
    }

    fn get(&self, path: &str) -> ureq::Response {
        settle(self.agent.get(&format!("{}{path}", self.base)).call())
    }

    fn post(&self, path: &str, body: &str) -> ureq::Response {
        settle(
            self.agent
                .post(&format!("{}{path}", self.base))
                .set("Content-Type", "application/json")
                .send_string(body),
        )
    }

    fn json(&self, path: &str) -> (u16, serde_json::Value) {
        let resp = self.get(path);
        let status = resp.status();
        (status, resp.into_json().unwrap())
    }

    fn login_demo(&self) {
        let resp = self.post(
            "/api/auth/login",
            r#"{"email": "admin@squill.com", "password": "demo123"}"#,
        );
        assert_eq!(resp.status(), 200);
    }
}

/// Status errors are still responses here.
fn settle(result: Result<ureq::Response, ureq::Error>) -> ureq::Response {
    match result {
        Ok(resp) => resp,
        Err(ureq::Error::Status(_, resp)) => resp,
        Err(e) => panic!("request failed: {e}"),
    }
}

// ---------------------------------------------------------------------------
// Pages and routing
// ---------------------------------------------------------------------------

#[test]
fn landing_and_login_pages_are_public() {
    let h = Harness::start();

    let landing = h.get("/");
    assert_eq!(landing.status(), 200);
    assert!(landing.content_type().starts_with("text/html"));
    assert!(landing.into_string().unwrap().contains("Serverless Billing Automation"));

    assert_eq!(h.get("/login").status(), 200);
    let css = h.get("/static/squill.css");
    assert_eq!(css.status(), 200);
    assert_eq!(css.content_type(), "text/css");
}

#[test]
fn dashboard_page_redirects_until_logged_in() {
    let h = Harness::start();

    let before = h.get("/dashboard");
    assert_eq!(before.status(), 302);
    assert_eq!(before.header("Location"), Some("/login"));

    h.login_demo();
    assert_eq!(h.get("/dashboard").status(), 200);

    h.post("/api/auth/logout", "");
    assert_eq!(h.get("/dashboard").status(), 302);
}

#[test]
fn unknown_routes_redirect_or_404() {
    let h = Harness::start();

    let page = h.get("/settings/billing");
    assert_eq!(page.status(), 302);
    assert_eq!(page.header("Location"), Some("/"));

    assert_eq!(h.get("/api/nope").status(), 404);
}

// ---------------------------------------------------------------------------
// Session API
// ---------------------------------------------------------------------------

#[test]
fn login_rejects_missing_and_wrong_credentials() {
    let h = Harness::start();

    assert_eq!(h.post("/api/auth/login", "not json").status(), 400);
    assert_eq!(
        h.post("/api/auth/login", r#"{"email": "", "password": "x"}"#)
            .status(),
        400
    );

    let wrong = h.post(
        "/api/auth/login",
        r#"{"email": "admin@squill.com", "password": "nope"}"#,
    );
    assert_eq!(wrong.status(), 401);
    let body: serde_json::Value = wrong.into_json().unwrap();
    assert_eq!(body["error"], "invalid credentials");
}

#[test]
fn session_reflects_login_state() {
    let h = Harness::start();

    let (_, session) = h.json("/api/session");
    assert_eq!(session["authenticated"], false);
    assert_eq!(session["default_variant"], "brutalist");

    h.login_demo();
    let (_, session) = h.json("/api/session");
    assert_eq!(session["authenticated"], true);
}

// ---------------------------------------------------------------------------
// Dashboard API
// ---------------------------------------------------------------------------

#[test]
fn dashboard_falls_back_when_api_is_down() {
    let h = Harness::start();

    let (status, body) = h.json("/api/dashboard");
    assert_eq!(status, 200);
    assert_eq!(body["variant"], "brutalist");
    assert_eq!(body["origin"], "fallback");
    assert_eq!(body["analytics"]["total_revenue"], 127850.0);
    assert_eq!(body["summary"]["invoices"], 5);

    let (status, body) = h.json("/api/dashboard?variant=bento");
    assert_eq!(status, 200);
    assert_eq!(body["origin"], "fixture");
}

#[test]
fn minimal_dashboard_needs_login() {
    let h = Harness::start();

    let (status, _) = h.json("/api/dashboard?variant=minimal");
    assert_eq!(status, 401);

    h.login_demo();
    let (status, body) = h.json("/api/dashboard?variant=minimal");
    assert_eq!(status, 200);
    assert_eq!(body["analytics"]["total_revenue"], 47850.0);
}

#[test]
fn unknown_variant_is_a_bad_request() {
    let h = Harness::start();
    let (status, _) = h.json("/api/dashboard?variant=neon");
    assert_eq!(status, 400);
}

#[test]
fn invoice_pdf_is_an_attachment() {
    let h = Harness::start();

    let resp = h.get("/api/invoices/INV-2024-003/pdf?variant=brutalist");
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.content_type(), "application/pdf");
    assert_eq!(
        resp.header("Content-Disposition"),
        Some("attachment; filename=\"squill-invoice-INV-2024-003.pdf\"")
    );
    let mut bytes = Vec::new();
    resp.into_reader().read_to_end(&mut bytes).unwrap();
    assert!(bytes.starts_with(b"%PDF"));

    assert_eq!(h.get("/api/invoices/latest/pdf").status(), 200);
    assert_eq!(h.get("/api/invoices/INV-404/pdf").status(), 404);
}

#[test]
fn invoice_pdf_by_row_renders_that_row() {
    let h = Harness::start();

    let resp = h.get("/api/invoices/latest/pdf?variant=brutalist&row=2");
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.header("Content-Disposition"),
        Some("attachment; filename=\"squill-invoice-INV-2024-003.pdf\"")
    );

    assert_eq!(
        h.get("/api/invoices/latest/pdf?variant=brutalist&row=40").status(),
        404
    );
}

#[test]
fn pricing_tiers_fall_back_to_builtin_catalogue() {
    let h = Harness::start();

    let (status, body) = h.json("/api/pricing-tiers");
    assert_eq!(status, 200);
    assert_eq!(body["source"], "builtin");
    assert_eq!(body["tiers"].as_array().map(Vec::len), Some(3));
}
