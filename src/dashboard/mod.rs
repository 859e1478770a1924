//! Dashboard data assembly.
//!
//! One parameterized assembly serves all three layouts. The [`Variant`]
//! decides whether the billing API is consulted, which endpoints are read,
//! and which fixture stands in when the API is unavailable:
//!
//! | Variant     | Needs token | Fetches                          | Fixture revenue |
//! |-------------|-------------|----------------------------------|-----------------|
//! | `minimal`   | yes         | analytics, customers, invoices   | 47 850          |
//! | `bento`     | no          | nothing                          | 47 850          |
//! | `brutalist` | no          | analytics (`data` envelope)      | 127 850         |
//!
//! Any fetch failure swaps in the whole fixture: no retry, no merging of
//! partial results, no caching between calls.

pub mod fixtures;

use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::api::{ApiClient, ApiError, TokenStore};
use crate::events::{Event, EventKind, EventLog};
use crate::model::{AnalyticsSnapshot, Customer, DashboardData, DataOrigin, Invoice};

// ---------------------------------------------------------------------------
// Variant
// ---------------------------------------------------------------------------

/// Dashboard layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    /// Cards and two charts; requires a login.
    Minimal,
    /// Bento grid; always shows its fixture.
    Bento,
    /// High-contrast layout with service health and an activity feed.
    Brutalist,
}

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::Minimal, Variant::Bento, Variant::Brutalist];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Minimal => "minimal",
            Self::Bento => "bento",
            Self::Brutalist => "brutalist",
        }
    }

    /// Heading shown above the dashboard.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Minimal => "Billing Overview",
            Self::Bento => "Dashboard Overview",
            Self::Brutalist => "SQUILL CONTROL CENTER",
        }
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minimal" | "minimalist" => Ok(Self::Minimal),
            "bento" | "bento-grid" | "bento_grid" => Ok(Self::Bento),
            "brutalist" | "brutal" => Ok(Self::Brutalist),
            other => anyhow::bail!(
                "unknown dashboard variant '{other}' (expected minimal, bento or brutalist)"
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Data source
// ---------------------------------------------------------------------------

/// Where live dashboard figures come from.
///
/// Methods take `&mut self` because a 401 clears the source's token.
pub trait DataSource {
    fn is_authenticated(&self) -> bool;
    fn analytics(&mut self) -> Result<serde_json::Value, ApiError>;
    fn customers(&mut self) -> Result<Vec<Customer>, ApiError>;
    fn invoices(&mut self) -> Result<Vec<Invoice>, ApiError>;
}

impl<S: TokenStore> DataSource for ApiClient<S> {
    fn is_authenticated(&self) -> bool {
        ApiClient::is_authenticated(self)
    }

    fn analytics(&mut self) -> Result<serde_json::Value, ApiError> {
        self.get_analytics()
    }

    fn customers(&mut self) -> Result<Vec<Customer>, ApiError> {
        self.get_customers()
    }

    fn invoices(&mut self) -> Result<Vec<Invoice>, ApiError> {
        self.get_invoices()
    }
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum AssemblyError {
    /// The layout needs a login and no token is present.
    #[error("Authentication required")]
    AuthenticationRequired,
}

/// Build the payload for one dashboard mount.
pub fn assemble(
    variant: Variant,
    source: &mut impl DataSource,
) -> Result<DashboardData, AssemblyError> {
    match variant {
        Variant::Minimal => assemble_minimal(source),
        Variant::Bento => Ok(fixture(Variant::Bento)),
        Variant::Brutalist => Ok(assemble_brutalist(source)),
    }
}

/// Assemble and record a `dashboard_fallback` event when a fixture was
/// substituted for a failed fetch.
pub fn assemble_logged(
    variant: Variant,
    source: &mut impl DataSource,
    events: &EventLog,
) -> Result<DashboardData, AssemblyError> {
    let data = assemble(variant, source)?;
    if data.origin == DataOrigin::Fallback {
        let reason = data.fallback_reason.clone().unwrap_or_default();
        events.record(
            Event::new(EventKind::DashboardFallback)
                .detail(reason)
                .variant(variant),
        );
    }
    Ok(data)
}

/// The offline payload for a layout. Always a fresh value.
pub fn fixture(variant: Variant) -> DashboardData {
    let (analytics, customers, invoices, recent_activities) = match variant {
        Variant::Minimal => (
            fixtures::minimal_analytics(),
            fixtures::minimal_customers(),
            fixtures::minimal_invoices(),
            Vec::new(),
        ),
        Variant::Bento => (
            fixtures::bento_analytics(),
            fixtures::bento_customers(),
            fixtures::bento_invoices(),
            Vec::new(),
        ),
        Variant::Brutalist => (
            fixtures::brutalist_analytics(),
            fixtures::brutalist_customers(),
            fixtures::brutalist_invoices(),
            fixtures::recent_activities(),
        ),
    };

    DashboardData {
        variant,
        origin: DataOrigin::Fixture,
        fallback_reason: None,
        analytics,
        customers,
        invoices,
        recent_activities,
        generated_at: Utc::now().to_rfc3339(),
    }
}

fn fallback(variant: Variant, reason: impl ToString) -> DashboardData {
    DashboardData {
        origin: DataOrigin::Fallback,
        fallback_reason: Some(reason.to_string()),
        ..fixture(variant)
    }
}

fn assemble_minimal(source: &mut impl DataSource) -> Result<DashboardData, AssemblyError> {
    if !source.is_authenticated() {
        return Err(AssemblyError::AuthenticationRequired);
    }

    match fetch_all(source) {
        Ok((analytics, customers, invoices)) => Ok(DashboardData {
            variant: Variant::Minimal,
            origin: DataOrigin::Live,
            fallback_reason: None,
            analytics,
            customers,
            invoices,
            recent_activities: Vec::new(),
            generated_at: Utc::now().to_rfc3339(),
        }),
        Err(reason) => Ok(fallback(Variant::Minimal, reason)),
    }
}

type LivePayload = (AnalyticsSnapshot, Vec<Customer>, Vec<Invoice>);

/// Read all three endpoints; the first failure wins.
fn fetch_all(source: &mut impl DataSource) -> Result<LivePayload, String> {
    let analytics = source.analytics().map_err(|e| e.to_string())?;
    let customers = source.customers().map_err(|e| e.to_string())?;
    let invoices = source.invoices().map_err(|e| e.to_string())?;
    let analytics: AnalyticsSnapshot = serde_json::from_value(analytics)
        .map_err(|e| format!("invalid analytics payload: {e}"))?;
    Ok((analytics, customers, invoices))
}

fn assemble_brutalist(source: &mut impl DataSource) -> DashboardData {
    let response = match source.analytics() {
        Ok(response) => response,
        Err(e) => return fallback(Variant::Brutalist, e),
    };

    let Some(data) = response.get("data").filter(|d| d.is_object()) else {
        return fallback(Variant::Brutalist, "analytics response carried no data");
    };

    let analytics = match serde_json::from_value::<AnalyticsSnapshot>(data.clone()) {
        Ok(analytics) => analytics,
        Err(e) => {
            return fallback(
                Variant::Brutalist,
                format!("invalid analytics payload: {e}"),
            );
        }
    };

    let customers = data
        .get("customers")
        .and_then(|v| serde_json::from_value(v.clone()).ok())
        .unwrap_or_else(fixtures::brutalist_customers);
    let invoices = data
        .get("invoices")
        .and_then(|v| serde_json::from_value(v.clone()).ok())
        .unwrap_or_else(fixtures::brutalist_invoices);

    DashboardData {
        variant: Variant::Brutalist,
        origin: DataOrigin::Live,
        fallback_reason: None,
        analytics,
        customers,
        invoices,
        recent_activities: fixtures::recent_activities(),
        generated_at: Utc::now().to_rfc3339(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
