/// Dashboard assembly tests.
///
/// Drives `dashboard::assemble` through a real `ApiClient` against scripted
/// HTTP answers, covering the live path, the fixture fallback and the
/// authentication gate of each layout.
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::Duration;

use squill::api::{ApiClient, MemoryTokenStore};
use squill::dashboard::{self, AssemblyError, Variant};
use squill::events::{EventKind, EventLog};
use squill::model::DataOrigin;
use tiny_http::{Response, Server, StatusCode};

/// Answer every request with `(status, body)` keyed by path; count hits.
fn mock(routes: Vec<(&'static str, u16, &'static str)>) -> (String, Arc<AtomicUsize>) {
    let server = Server::http("127.0.0.1:0").unwrap();
    let port = server.server_addr().to_ip().unwrap().port();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    let (ready_tx, ready_rx) = mpsc::channel();

    thread::spawn(move || {
        let _ = ready_tx.send(());
        for req in server.incoming_requests() {
            counter.fetch_add(1, Ordering::SeqCst);
            let path = req.url().to_string();
            let (status, body) = routes
                .iter()
                .find(|(p, _, _)| path.ends_with(p))
                .map(|(_, s, b)| (*s, *b))
                .unwrap_or((404, "{}"));
            let _ = req.respond(Response::from_string(body).with_status_code(StatusCode(status)));
        }
    });
    let _ = ready_rx.recv();

    (format!("http://127.0.0.1:{port}/api"), hits)
}

fn client(base: &str, token: Option<&str>) -> ApiClient<MemoryTokenStore> {
    let store = match token {
        Some(t) => MemoryTokenStore::with_token(t),
        None => MemoryTokenStore::new(),
    };
    ApiClient::new(base, Duration::from_secs(5), store)
}

fn offline(token: Option<&str>) -> ApiClient<MemoryTokenStore> {
    let store = match token {
        Some(t) => MemoryTokenStore::with_token(t),
        None => MemoryTokenStore::new(),
    };
    ApiClient::new("http://127.0.0.1:9/api", Duration::from_millis(300), store)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

#[test]
fn fixture_figures_per_layout() {
    let minimal = dashboard::fixture(Variant::Minimal);
    assert_eq!(minimal.analytics.total_revenue, 47850.0);
    assert_eq!(minimal.customers.len(), 3);
    assert_eq!(minimal.invoices[0].invoice_id.as_deref(), Some("INV-001"));

    let bento = dashboard::fixture(Variant::Bento);
    assert_eq!(bento.analytics.total_revenue, 47850.0);
    assert_eq!(bento.origin, DataOrigin::Fixture);

    let brutalist = dashboard::fixture(Variant::Brutalist);
    assert_eq!(brutalist.analytics.total_revenue, 127850.0);
    assert_eq!(brutalist.recent_activities.len(), 6);
}

#[test]
fn fixtures_are_independent_values() {
    let mut first = dashboard::fixture(Variant::Brutalist);
    first.customers.clear();
    first.analytics.total_revenue = 0.0;

    let second = dashboard::fixture(Variant::Brutalist);
    assert!(!second.customers.is_empty());
    assert_eq!(second.analytics.total_revenue, 127850.0);
}

// ---------------------------------------------------------------------------
// Minimal
// ---------------------------------------------------------------------------

#[test]
fn minimal_without_token_requires_login() {
    let (base, hits) = mock(vec![]);
    let mut api = client(&base, None);

    let err = dashboard::assemble(Variant::Minimal, &mut api).unwrap_err();
    assert!(matches!(err, AssemblyError::AuthenticationRequired));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[test]
fn minimal_reads_three_endpoints() {
    let (base, hits) = mock(vec![
        (
            "/analytics",
            200,
            r#"{"total_revenue": 5000, "monthly_revenue": [{"month": "Jan", "revenue": 5000}]}"#,
        ),
        ("/customers", 200, r#"[{"customer_id": "c1", "name": "Live Co"}]"#),
        (
            "/invoices",
            200,
            r#"[{"invoice_id": "LIVE-7", "customer_name": "Live Co", "total_amount": 12.5}]"#,
        ),
    ]);
    let mut api = client(&base, Some("tok"));

    let data = dashboard::assemble(Variant::Minimal, &mut api).unwrap();
    assert_eq!(data.origin, DataOrigin::Live);
    assert_eq!(data.analytics.total_revenue, 5000.0);
    assert_eq!(data.customers[0].name, "Live Co");
    assert_eq!(data.invoice("LIVE-7").and_then(|i| i.total_amount), Some(12.5));
    assert_eq!(hits.load(Ordering::SeqCst), 3);
}

#[test]
fn minimal_substitutes_whole_fixture_on_partial_failure() {
    let (base, _hits) = mock(vec![
        ("/analytics", 200, r#"{"total_revenue": 5000}"#),
        ("/customers", 500, "{}"),
    ]);
    let mut api = client(&base, Some("tok"));

    let data = dashboard::assemble(Variant::Minimal, &mut api).unwrap();
    assert_eq!(data.origin, DataOrigin::Fallback);
    assert_eq!(data.analytics.total_revenue, 47850.0);
    assert_eq!(data.customers.len(), 3);
}

#[test]
fn minimal_unauthorized_clears_token_and_falls_back() {
    let (base, _hits) = mock(vec![("/analytics", 401, "{}")]);
    let mut api = client(&base, Some("stale"));

    let data = dashboard::assemble(Variant::Minimal, &mut api).unwrap();
    assert_eq!(data.origin, DataOrigin::Fallback);
    assert!(!api.is_authenticated());
}

#[test]
fn fallback_is_recorded_in_event_log() {
    let log = std::env::temp_dir().join(format!(
        "squill-dashboard-{}-events.jsonl",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&log);
    let events = EventLog::at(&log);
    let mut api = offline(Some("tok"));

    let data = dashboard::assemble_logged(Variant::Minimal, &mut api, &events).unwrap();
    assert_eq!(data.origin, DataOrigin::Fallback);

    let recorded = events.read_all();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].kind, EventKind::DashboardFallback);
    assert_eq!(recorded[0].variant.as_deref(), Some("minimal"));

    let _ = std::fs::remove_file(&log);
}

// ---------------------------------------------------------------------------
// Bento and brutalist
// ---------------------------------------------------------------------------

#[test]
fn bento_works_logged_out_and_offline() {
    let mut api = offline(None);
    let data = dashboard::assemble(Variant::Bento, &mut api).unwrap();
    assert_eq!(data.origin, DataOrigin::Fixture);
    assert_eq!(data.summary().customers, 3);
}

#[test]
fn brutalist_reads_data_envelope() {
    let (base, hits) = mock(vec![(
        "/analytics",
        200,
        r#"{"success": true, "data": {"total_revenue": 99000, "monthly_revenue": []}}"#,
    )]);
    let mut api = client(&base, None);

    let data = dashboard::assemble(Variant::Brutalist, &mut api).unwrap();
    assert_eq!(data.origin, DataOrigin::Live);
    assert_eq!(data.analytics.total_revenue, 99000.0);
    // Rows absent from the envelope come from the fixture
    assert!(!data.invoices.is_empty());
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn brutalist_without_envelope_falls_back() {
    let (base, _hits) = mock(vec![("/analytics", 200, r#"{"total_revenue": 1}"#)]);
    let mut api = client(&base, None);

    let data = dashboard::assemble(Variant::Brutalist, &mut api).unwrap();
    assert_eq!(data.origin, DataOrigin::Fallback);
    assert_eq!(data.analytics.total_revenue, 127850.0);
}

#[test]
fn repeated_assembly_fetches_again() {
    let (base, hits) = mock(vec![(
        "/analytics",
        200,
        r#"{"data": {"total_revenue": 1000}}"#,
    )]);
    let mut api = client(&base, None);

    dashboard::assemble(Variant::Brutalist, &mut api).unwrap();
    dashboard::assemble(Variant::Brutalist, &mut api).unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}
