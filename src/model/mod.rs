//! Billing records shared by the dashboard, the API client and the invoice
//! generator.
//!
//! Records are created externally (the billing API or a fixture) and are
//! only ever read afterwards. Every field that the backend may omit is an
//! `Option` so that partially populated payloads still deserialize.

use serde::{Deserialize, Serialize};

use crate::dashboard::Variant;

// ---------------------------------------------------------------------------
// Invoices and customers
// ---------------------------------------------------------------------------

/// A single invoice row.
///
/// All fields are optional: the invoice generator substitutes literal
/// defaults for whatever is missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Invoice {
    pub invoice_id: Option<String>,
    pub customer_name: Option<String>,
    pub customer_id: Option<String>,
    pub total_amount: Option<f64>,
    pub status: Option<String>,
    /// Issue date, `YYYY-MM-DD`.
    pub date: Option<String>,
    /// Due date, `YYYY-MM-DD`.
    pub due_date: Option<String>,
    pub aws_cost: Option<f64>,
}

impl Invoice {
    /// Build an invoice carrying only the identifying fields.
    pub fn new(invoice_id: &str, customer_name: &str, total_amount: f64) -> Self {
        Self {
            invoice_id: Some(invoice_id.to_string()),
            customer_name: Some(customer_name.to_string()),
            total_amount: Some(total_amount),
            ..Self::default()
        }
    }

    /// Whether the invoice status reads `paid` (any case).
    pub fn is_paid(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("paid"))
    }
}

/// A billed customer of a client company.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Customer {
    pub customer_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub pricing_tier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue: Option<f64>,
    /// Display growth figure such as `+23%`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub growth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_invoice: Option<String>,
}

// ---------------------------------------------------------------------------
// Analytics
// ---------------------------------------------------------------------------

/// Read-only analytics aggregate. Rebuilt on every fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsSnapshot {
    pub total_revenue: f64,
    pub monthly_revenue: Vec<MonthlyRevenue>,
    pub aws_services: Vec<AwsService>,
    #[serde(alias = "usage_metrics")]
    pub usage_breakdown: Vec<UsageSlice>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonthlyRevenue {
    pub month: String,
    pub revenue: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customers: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoices: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AwsService {
    pub name: String,
    pub cost: f64,
    pub usage: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Percent of provisioned capacity in use.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utilization: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UsageSlice {
    pub name: String,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// An entry in the recent-activity feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: u32,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub time: String,
    pub amount: f64,
}

// ---------------------------------------------------------------------------
// Assembled dashboard payload
// ---------------------------------------------------------------------------

/// Where the figures in a [`DashboardData`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DataOrigin {
    /// Returned by the billing API.
    Live,
    /// The API was tried and failed; the variant's fixture was substituted.
    Fallback,
    /// The variant never calls the API.
    Fixture,
}

impl std::fmt::Display for DataOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Live => write!(f, "live"),
            Self::Fallback => write!(f, "fallback"),
            Self::Fixture => write!(f, "fixture"),
        }
    }
}

/// Everything one dashboard view renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    pub variant: Variant,
    pub origin: DataOrigin,
    /// Why the fixture was substituted, for [`DataOrigin::Fallback`].
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub fallback_reason: Option<String>,
    pub analytics: AnalyticsSnapshot,
    pub customers: Vec<Customer>,
    pub invoices: Vec<Invoice>,
    pub recent_activities: Vec<Activity>,
    /// RFC 3339 timestamp of assembly ("last updated").
    pub generated_at: String,
}

impl DashboardData {
    /// Headline figures shown in the metric cards.
    pub fn summary(&self) -> DashboardSummary {
        DashboardSummary {
            total_revenue: self.analytics.total_revenue,
            customers: self.customers.len(),
            invoices: self.invoices.len(),
            paid_invoices: self.invoices.iter().filter(|i| i.is_paid()).count(),
            total_aws_cost: self.analytics.aws_services.iter().map(|s| s.cost).sum(),
        }
    }

    /// Find an invoice row by id.
    pub fn invoice(&self, invoice_id: &str) -> Option<&Invoice> {
        self.invoices
            .iter()
            .find(|inv| inv.invoice_id.as_deref() == Some(invoice_id))
    }
}

/// Headline metrics derived from a [`DashboardData`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_revenue: f64,
    pub customers: usize,
    pub invoices: usize,
    pub paid_invoices: usize,
    pub total_aws_cost: f64,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
