//! Subscription tiers and billing calculators.
//!
//! Two price lists live here:
//!
//! - what Squill charges a client company: a monthly tier fee plus overage
//!   on customers, API calls and storage beyond the tier's limits;
//! - what a client company charges its own customers: per-event rates with
//!   a free allowance per event type.
//!
//! All money is [`Decimal`]; quantities are decimals too so fractional
//! storage figures bill exactly.

use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Catalogue
// ---------------------------------------------------------------------------

/// A metered quantity limited by a subscription tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Customers,
    ApiCalls,
    StorageGb,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Customers, Metric::ApiCalls, Metric::StorageGb];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Customers => "customers",
            Self::ApiCalls => "api_calls",
            Self::StorageGb => "storage_gb",
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "customers" => Ok(Self::Customers),
            "api_calls" => Ok(Self::ApiCalls),
            "storage_gb" => Ok(Self::StorageGb),
            other => anyhow::bail!("unknown metric '{other}'"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierId {
    Basic,
    Pro,
    Enterprise,
}

impl TierId {
    pub const ALL: [TierId; 3] = [TierId::Basic, TierId::Pro, TierId::Enterprise];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Pro => "pro",
            Self::Enterprise => "enterprise",
        }
    }
}

impl std::fmt::Display for TierId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TierId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "pro" => Ok(Self::Pro),
            "enterprise" => Ok(Self::Enterprise),
            other => anyhow::bail!(
                "Invalid subscription tier: {other} (valid tiers: basic, pro, enterprise)"
            ),
        }
    }
}

/// Limit and overage price for one metric. `limit: None` is unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Allowance {
    pub metric: Metric,
    pub limit: Option<Decimal>,
    pub overage_rate: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tier {
    pub id: TierId,
    pub monthly_fee: Decimal,
    pub allowances: Vec<Allowance>,
}

impl Tier {
    pub fn allowance(&self, metric: Metric) -> Option<&Allowance> {
        self.allowances.iter().find(|a| a.metric == metric)
    }
}

fn limited(metric: Metric, limit: Decimal, overage_rate: Decimal) -> Allowance {
    Allowance {
        metric,
        limit: Some(limit),
        overage_rate,
    }
}

fn unlimited(metric: Metric) -> Allowance {
    Allowance {
        metric,
        limit: None,
        overage_rate: Decimal::ZERO,
    }
}

/// Catalogue entry for `id`.
pub fn tier(id: TierId) -> Tier {
    match id {
        TierId::Basic => Tier {
            id,
            monthly_fee: dec!(99.00),
            allowances: vec![
                limited(Metric::Customers, dec!(1000), dec!(0.10)),
                limited(Metric::ApiCalls, dec!(10000), dec!(0.001)),
                limited(Metric::StorageGb, dec!(10), dec!(1.00)),
            ],
        },
        TierId::Pro => Tier {
            id,
            monthly_fee: dec!(299.00),
            allowances: vec![
                limited(Metric::Customers, dec!(10000), dec!(0.08)),
                limited(Metric::ApiCalls, dec!(100000), dec!(0.0008)),
                limited(Metric::StorageGb, dec!(100), dec!(0.80)),
            ],
        },
        TierId::Enterprise => Tier {
            id,
            monthly_fee: dec!(999.00),
            allowances: Metric::ALL.into_iter().map(unlimited).collect(),
        },
    }
}

/// The whole catalogue, cheapest first.
pub fn tiers() -> Vec<Tier> {
    TierId::ALL.into_iter().map(tier).collect()
}

// ---------------------------------------------------------------------------
// Squill -> client billing
// ---------------------------------------------------------------------------

/// Metered usage for one billing period.
pub type Usage = BTreeMap<Metric, Decimal>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overage {
    pub metric: Metric,
    pub usage: Decimal,
    pub limit: Decimal,
    pub overage: Decimal,
    pub rate: Decimal,
    pub cost: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SquillBill {
    pub tier: TierId,
    pub monthly_fee: Decimal,
    pub overages: Vec<Overage>,
    pub total_cost: Decimal,
}

/// Usage above a limited allowance, metric by metric, with the overage
/// rate that applies.
fn over_limits(tier: &Tier, usage: &Usage) -> Vec<(Violation, Decimal)> {
    usage
        .iter()
        .filter_map(|(metric, used)| {
            let allowance = tier.allowance(*metric)?;
            let limit = allowance.limit?;
            if *used <= limit {
                return None;
            }
            let violation = Violation {
                metric: *metric,
                usage: *used,
                limit,
                overage: used - limit,
            };
            Some((violation, allowance.overage_rate))
        })
        .collect()
}

fn out_of_range() -> anyhow::Error {
    anyhow::anyhow!("amount out of range")
}

/// Sum `amounts`, failing instead of overflowing.
fn checked_sum(amounts: impl IntoIterator<Item = Decimal>) -> anyhow::Result<Decimal> {
    amounts.into_iter().try_fold(Decimal::ZERO, |acc, amount| {
        acc.checked_add(amount).ok_or_else(out_of_range)
    })
}

/// What Squill charges a client on `id` for `usage`.
///
/// Fails with "amount out of range" when a charge does not fit a
/// [`Decimal`].
pub fn squill_bill(id: TierId, usage: &Usage) -> anyhow::Result<SquillBill> {
    let tier = tier(id);
    let overages = over_limits(&tier, usage)
        .into_iter()
        .map(|(v, rate)| {
            let cost = v.overage.checked_mul(rate).ok_or_else(out_of_range)?;
            Ok(Overage {
                metric: v.metric,
                usage: v.usage,
                limit: v.limit,
                overage: v.overage,
                rate,
                cost,
            })
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    let total_cost = checked_sum(
        std::iter::once(tier.monthly_fee).chain(overages.iter().map(|o| o.cost)),
    )?;
    Ok(SquillBill {
        tier: id,
        monthly_fee: tier.monthly_fee,
        overages,
        total_cost,
    })
}

/// A usage figure above a tier limit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    pub metric: Metric,
    pub usage: Decimal,
    pub limit: Decimal,
    pub overage: Decimal,
}

/// Every limit `usage` exceeds on `id`. Empty means within limits.
pub fn check_limits(id: TierId, usage: &Usage) -> Vec<Violation> {
    over_limits(&tier(id), usage)
        .into_iter()
        .map(|(violation, _)| violation)
        .collect()
}

// ---------------------------------------------------------------------------
// Client -> customer billing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClientRule {
    pub rate: Decimal,
    #[serde(default)]
    pub free_tier: Decimal,
}

/// Rules keyed by event type.
pub type ClientRules = BTreeMap<String, ClientRule>;

pub fn default_client_rules() -> ClientRules {
    let mut rules = ClientRules::new();
    rules.insert(
        "api_call".to_string(),
        ClientRule {
            rate: dec!(0.01),
            free_tier: dec!(100),
        },
    );
    rules.insert(
        "storage_gb".to_string(),
        ClientRule {
            rate: dec!(5.00),
            free_tier: dec!(1),
        },
    );
    rules.insert(
        "transaction".to_string(),
        ClientRule {
            rate: dec!(0.30),
            free_tier: dec!(10),
        },
    );
    rules
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientLine {
    pub event_type: String,
    pub total_quantity: Decimal,
    pub free_quantity: Decimal,
    pub billable_quantity: Decimal,
    pub rate: Decimal,
    pub cost: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientBill {
    pub lines: Vec<ClientLine>,
    pub total_cost: Decimal,
}

/// What a client charges one customer for the recorded usage events.
///
/// Empty `rules` means [`default_client_rules`]. Event types without a
/// rule are not billed. Totals that overflow a [`Decimal`] are an error.
pub fn client_bill(
    rules: &ClientRules,
    events: &BTreeMap<String, Vec<Decimal>>,
) -> anyhow::Result<ClientBill> {
    let defaults;
    let rules = if rules.is_empty() {
        defaults = default_client_rules();
        &defaults
    } else {
        rules
    };

    let mut lines = Vec::new();
    for (event_type, quantities) in events {
        let Some(rule) = rules.get(event_type) else {
            continue;
        };
        let total_quantity = checked_sum(quantities.iter().copied())?;
        let billable_quantity = total_quantity
            .checked_sub(rule.free_tier)
            .ok_or_else(out_of_range)?
            .max(Decimal::ZERO);
        let cost = billable_quantity
            .checked_mul(rule.rate)
            .ok_or_else(out_of_range)?;
        lines.push(ClientLine {
            event_type: event_type.clone(),
            total_quantity,
            free_quantity: total_quantity.min(rule.free_tier),
            billable_quantity,
            rate: rule.rate,
            cost,
        });
    }

    let total_cost = checked_sum(lines.iter().map(|l| l.cost))?;
    Ok(ClientBill { lines, total_cost })
}

/// Parse `metric=value` pairs such as `api_calls=15000`.
///
/// Unknown metrics are an error; repeated metrics add up.
pub fn parse_usage<'a>(pairs: impl IntoIterator<Item = &'a str>) -> anyhow::Result<Usage> {
    let mut usage = Usage::new();
    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| anyhow::anyhow!("expected metric=value, got '{pair}'"))?;
        let metric: Metric = key.parse()?;
        let value = Decimal::from_str(value.trim())
            .map_err(|e| anyhow::anyhow!("invalid quantity for {metric}: {e}"))?;
        let total = usage.entry(metric).or_insert(Decimal::ZERO);
        *total = total.checked_add(value).ok_or_else(out_of_range)?;
    }
    Ok(usage)
}

/// Parse `event_type=quantity` pairs into recorded usage events, one
/// quantity per pair.
pub fn parse_events<'a>(
    pairs: impl IntoIterator<Item = &'a str>,
) -> anyhow::Result<BTreeMap<String, Vec<Decimal>>> {
    let mut events: BTreeMap<String, Vec<Decimal>> = BTreeMap::new();
    for pair in pairs {
        let (event_type, value) = pair
            .split_once('=')
            .ok_or_else(|| anyhow::anyhow!("expected event_type=quantity, got '{pair}'"))?;
        let event_type = event_type.trim();
        let quantity = Decimal::from_str(value.trim())
            .map_err(|e| anyhow::anyhow!("invalid quantity for {event_type}: {e}"))?;
        events.entry(event_type.to_string()).or_default().push(quantity);
    }
    Ok(events)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
