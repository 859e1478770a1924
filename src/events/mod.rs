//! Event log: one JSON line per notable action.
//!
//! Records logins, logouts, cleared tokens, dashboard fallbacks, rendered
//! invoices and deployment steps so a session can be reconstructed after
//! the fact.
//!
//! Log file: `~/.squill/events.jsonl` (see `[logging]` in the config).

use std::fs::{self, OpenOptions, create_dir_all};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::{self, SquillConfig};

// ---------------------------------------------------------------------------
// Event entry
// ---------------------------------------------------------------------------

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Login,
    Logout,
    AuthFailure,
    DashboardFallback,
    InvoiceRendered,
    DeployStep,
}

/// A single log line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub timestamp: String,
    pub kind: EventKind,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub variant: Option<String>,
}

impl Event {
    pub fn new(kind: EventKind) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            kind,
            detail: None,
            variant: None,
        }
    }

    pub fn detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn variant(mut self, variant: impl ToString) -> Self {
        self.variant = Some(variant.to_string());
        self
    }
}

// ---------------------------------------------------------------------------
// Log sink
// ---------------------------------------------------------------------------

/// Append-only JSONL sink. A disabled log drops every event.
#[derive(Debug, Clone)]
pub struct EventLog {
    path: Option<PathBuf>,
}

impl EventLog {
    /// Build from the resolved config.
    pub fn from_config(config: &SquillConfig) -> Self {
        if !config.logging.enabled {
            return Self::disabled();
        }
        Self {
            path: Some(config::expand_home(&config.logging.path)),
        }
    }

    /// Log to an explicit file.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn disabled() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Append an event. Best-effort; failures are silently ignored.
    pub fn record(&self, event: Event) {
        let _ = self.append(&event);
    }

    fn append(&self, event: &Event) -> anyhow::Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        let json = serde_json::to_string(event)?;
        writeln!(file, "{json}")?;

        Ok(())
    }

    /// Read every parseable entry. Malformed lines are skipped.
    pub fn read_all(&self) -> Vec<Event> {
        let Some(path) = &self.path else {
            return Vec::new();
        };
        let Ok(file) = fs::File::open(path) else {
            return Vec::new();
        };
        BufReader::new(file)
            .lines()
            .map_while(Result::ok)
            .filter_map(|line| serde_json::from_str(&line).ok())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_log(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "squill-events-{}-{}",
            name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir.join("events.jsonl")
    }

    #[test]
    fn record_appends_lines() {
        let path = temp_log("append");
        let log = EventLog::at(&path);
        log.record(Event::new(EventKind::Login).detail("demo"));
        log.record(
            Event::new(EventKind::DashboardFallback)
                .detail("HTTP error! status: 500")
                .variant("brutalist"),
        );

        let events = log.read_all();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind, EventKind::Login);
        assert_eq!(events[1].variant.as_deref(), Some("brutalist"));
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let path = temp_log("malformed");
        let log = EventLog::at(&path);
        log.record(Event::new(EventKind::Logout));
        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(file, "not json").unwrap();
        log.record(Event::new(EventKind::AuthFailure));

        let kinds: Vec<EventKind> = log.read_all().into_iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![EventKind::Logout, EventKind::AuthFailure]);
    }

    #[test]
    fn disabled_log_writes_nothing() {
        let log = EventLog::disabled();
        log.record(Event::new(EventKind::Login));
        assert!(log.path().is_none());
        assert!(log.read_all().is_empty());
    }

    #[test]
    fn kind_serializes_snake_case() {
        let json = serde_json::to_string(&Event::new(EventKind::InvoiceRendered)).unwrap();
        assert!(json.contains("\"kind\":\"invoice_rendered\""));
        assert!(!json.contains("detail"));
    }
}
