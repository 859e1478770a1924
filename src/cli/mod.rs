//! CLI command implementations for squill.
//!
//! Provides subcommand handlers for:
//! - `squill serve`: the local web dashboard
//! - `squill login|logout|status`: session management and health
//! - `squill dashboard [--variant V]`: assembled dashboard figures
//! - `squill invoice [ID]`: render an invoice document to disk
//! - `squill pricing tiers|bill|charge`: subscription catalogue and billing
//! - `squill deploy plan|frontend|backend|api-url|verify`: deployment helpers
//! - `squill config show|init|set|reset`: configuration management

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::Utc;
use colored::Colorize;

use crate::api::{ApiClient, DEMO_TOKEN_PREFIX};
use crate::config::{self, SquillConfig};
use crate::dashboard::{self, AssemblyError, Variant};
use crate::deploy::{self, DeploymentInfo, ShellRunner, Step, StepOutcome, StepStatus};
use crate::events::{Event, EventKind, EventLog};
use crate::invoice;
use crate::model::{DashboardData, DataOrigin};
use crate::pricing::{self, TierId};
use crate::web;

/// Output format for listing commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            Some("csv") => Self::Csv,
            _ => Self::Table,
        }
    }
}

// ---------------------------------------------------------------------------
// squill serve
// ---------------------------------------------------------------------------

/// Run the web shell, optionally on a different address.
pub fn run_serve(mut config: SquillConfig, addr: Option<String>, no_open: bool) -> Result<()> {
    if let Some(addr) = addr {
        config.web.addr = addr;
    }
    if no_open {
        config.web.open_browser = false;
    }
    web::serve(&config)
}

// ---------------------------------------------------------------------------
// squill login | logout | status
// ---------------------------------------------------------------------------

/// Log in with explicit credentials, or the configured demo pair.
pub fn run_login(
    config: &SquillConfig,
    email: Option<String>,
    password: Option<String>,
    demo: bool,
) -> Result<()> {
    let (email, password) = if demo {
        (config.api.demo_email.clone(), config.api.demo_password.clone())
    } else {
        match (email, password) {
            (Some(e), Some(p)) if !e.trim().is_empty() && !p.is_empty() => (e, p),
            _ => bail!("please enter credentials (--email and --password, or --demo)"),
        }
    };

    let mut client = ApiClient::from_config(config);
    match client.login(email.trim(), &password) {
        Ok(resp) => {
            let kind = if resp.token.starts_with(DEMO_TOKEN_PREFIX) {
                "demo session"
            } else {
                "session"
            };
            println!(
                "{} Logged in as {} ({kind})",
                "✓".green().bold(),
                email.trim().bold()
            );
            println!(
                "  {}",
                format!("token stored in {}", client.store().path().display()).dimmed()
            );
            Ok(())
        }
        Err(e) => {
            println!("{} invalid credentials", "✗".red().bold());
            Err(anyhow::Error::new(e).context("login failed"))
        }
    }
}

pub fn run_logout(config: &SquillConfig) -> Result<()> {
    let mut client = ApiClient::from_config(config);
    client.logout().context("failed to clear token")?;
    println!("{} Logged out", "✓".green().bold());
    Ok(())
}

/// Check session, configuration and event log state.
pub fn run_status(config: &SquillConfig) -> Result<()> {
    println!("{}", "squill status".bold().cyan());
    println!("{}", "=".repeat(50));

    // 1. Session
    let client = ApiClient::from_config(config);
    let token = client.token();
    let session = match &token {
        Some(t) if t.starts_with(DEMO_TOKEN_PREFIX) => "demo token".to_string(),
        Some(_) => "token present".to_string(),
        None => "not logged in (run `squill login`)".to_string(),
    };
    print_health_item("Session", token.is_some(), &session);

    // 2. API
    print_health_item("Billing API", true, client.base_url());

    // 3. Config
    let global = config::global_config_file();
    let global_exists = global.as_ref().is_some_and(|p| p.exists());
    print_health_item(
        "Config file",
        global_exists,
        &match global {
            Some(p) if global_exists => p.display().to_string(),
            _ => "using defaults (run `squill config init`)".to_string(),
        },
    );

    // 4. Dashboard
    print_health_item(
        "Default layout",
        true,
        config.dashboard.variant.as_str(),
    );

    // 5. Event log
    let events = EventLog::from_config(config);
    match events.path() {
        Some(path) => {
            let count = events.read_all().len();
            print_health_item(
                "Event log",
                true,
                &format!("{} ({count} entries)", path.display()),
            );
        }
        None => print_health_item("Event log", false, "disabled"),
    }

    Ok(())
}

fn print_health_item(name: &str, ok: bool, detail: &str) {
    let status = if ok {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    println!("  {} {:<25} {}", status, name, detail.dimmed());
}

// ---------------------------------------------------------------------------
// squill dashboard
// ---------------------------------------------------------------------------

/// Assemble the dashboard for `variant` using the configured client.
fn load_dashboard(config: &SquillConfig, variant: Variant) -> Result<DashboardData> {
    let mut client = ApiClient::from_config(config);
    let events = EventLog::from_config(config);
    match dashboard::assemble_logged(variant, &mut client, &events) {
        Ok(data) => Ok(data),
        Err(AssemblyError::AuthenticationRequired) => {
            bail!("the {variant} layout requires a login; run `squill login` first")
        }
    }
}

pub fn run_dashboard(
    config: &SquillConfig,
    variant: Option<Variant>,
    format: OutputFormat,
) -> Result<()> {
    let variant = variant.unwrap_or(config.dashboard.variant);
    let data = load_dashboard(config, variant)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&data)?),
        OutputFormat::Csv => print_invoices_csv(&data),
        OutputFormat::Table => print_dashboard_table(&data),
    }
    Ok(())
}

fn print_dashboard_table(data: &DashboardData) {
    let summary = data.summary();

    println!("{}", data.variant.title().bold().cyan());
    println!("{}", "=".repeat(60));
    if data.origin == DataOrigin::Fallback {
        println!(
            "{} showing demo data: {}",
            "warning:".yellow().bold(),
            data.fallback_reason.as_deref().unwrap_or("billing API unavailable")
        );
    }
    println!(
        "  Revenue: {}  Customers: {}  Invoices: {} ({} paid)  AWS cost: {}",
        format_amount(summary.total_revenue).bold(),
        summary.customers,
        summary.invoices,
        summary.paid_invoices,
        format_amount(summary.total_aws_cost),
    );
    println!(
        "  {}",
        format!("source: {}, generated {}", data.origin, data.generated_at).dimmed()
    );
    println!();

    let months = &data.analytics.monthly_revenue;
    if !months.is_empty() {
        println!("{}", "Monthly Revenue".bold().cyan());
        let max = months.iter().map(|m| m.revenue).fold(0.0_f64, f64::max);
        for m in months {
            let width = if max > 0.0 {
                ((m.revenue / max) * 30.0).round() as usize
            } else {
                0
            };
            println!(
                "  {:<5} {:>12} {}",
                m.month,
                format_amount(m.revenue),
                "█".repeat(width).cyan()
            );
        }
        println!();
    }

    if !data.analytics.aws_services.is_empty() {
        println!("{}", "AWS Services".bold().cyan());
        for s in &data.analytics.aws_services {
            let util = s
                .utilization
                .map(|u| format!("{u:>3}%"))
                .unwrap_or_default();
            println!(
                "  {:<16} {:>10} {:<20} {}",
                truncate(&s.name, 16),
                format_amount(s.cost),
                truncate(&s.usage, 20),
                util.dimmed()
            );
        }
        println!();
    }

    if !data.customers.is_empty() {
        println!("{}", "Customers".bold().cyan());
        println!("  {:<26} {:<12} {:<10} {:>10}", "Name", "Tier", "Status", "Revenue");
        println!("  {}", "-".repeat(60));
        for (i, c) in data.customers.iter().enumerate() {
            let line = format!(
                "  {:<26} {:<12} {:<10} {:>10}",
                truncate(&c.name, 26),
                c.pricing_tier.as_deref().unwrap_or("-"),
                c.status.as_deref().unwrap_or("-"),
                c.revenue.map(format_amount).unwrap_or_default(),
            );
            if i % 2 == 0 {
                println!("{line}");
            } else {
                println!("{}", line.dimmed());
            }
        }
        println!();
    }

    if !data.invoices.is_empty() {
        println!("{}", "Invoices".bold().cyan());
        println!(
            "  {:<14} {:<26} {:>10} {:<10} {}",
            "Invoice", "Customer", "Amount", "Status", "Due"
        );
        println!("  {}", "-".repeat(70));
        for inv in &data.invoices {
            let status = inv.status.as_deref().unwrap_or("-");
            let status = if inv.is_paid() {
                status.green()
            } else if status.eq_ignore_ascii_case("overdue") {
                status.red()
            } else {
                status.yellow()
            };
            println!(
                "  {:<14} {:<26} {:>10} {:<10} {}",
                inv.invoice_id.as_deref().unwrap_or("-"),
                truncate(inv.customer_name.as_deref().unwrap_or(""), 26),
                inv.total_amount.map(format_amount).unwrap_or_default(),
                status,
                inv.due_date.as_deref().unwrap_or(""),
            );
        }
        println!();
    }

    if !data.recent_activities.is_empty() {
        println!("{}", "Recent Activity".bold().cyan());
        for a in &data.recent_activities {
            println!(
                "  {:<9} {} {}",
                a.kind.bold(),
                a.description,
                format!("({})", a.time).dimmed()
            );
        }
    }
}

fn print_invoices_csv(data: &DashboardData) {
    println!("invoice_id,customer_name,total_amount,status,date,due_date");
    for inv in &data.invoices {
        println!(
            "{},{},{},{},{},{}",
            inv.invoice_id.as_deref().unwrap_or(""),
            csv_field(inv.customer_name.as_deref().unwrap_or("")),
            inv.total_amount.map(|a| a.to_string()).unwrap_or_default(),
            inv.status.as_deref().unwrap_or(""),
            inv.date.as_deref().unwrap_or(""),
            inv.due_date.as_deref().unwrap_or(""),
        );
    }
}

// ---------------------------------------------------------------------------
// squill invoice
// ---------------------------------------------------------------------------

/// Render one invoice row of `variant` to `out_dir`.
///
/// Without an id the first row is used; a variant without rows renders the
/// all-defaults document.
pub fn run_invoice(
    config: &SquillConfig,
    invoice_id: Option<&str>,
    variant: Option<Variant>,
    out_dir: &Path,
) -> Result<()> {
    let variant = variant.unwrap_or(config.dashboard.variant);
    let data = load_dashboard(config, variant)?;

    let record = match invoice_id {
        Some(id) => data
            .invoice(id)
            .cloned()
            .with_context(|| format!("invoice {id} not found in the {variant} layout"))?,
        None => data.invoices.first().cloned().unwrap_or_default(),
    };

    let path = invoice::save(&record, out_dir)?;
    let size = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
    EventLog::from_config(config).record(
        Event::new(EventKind::InvoiceRendered)
            .detail(format!("{} ({size} bytes)", invoice::file_name(&record)))
            .variant(variant),
    );

    println!(
        "{} Invoice written to {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// squill pricing tiers | bill
// ---------------------------------------------------------------------------

pub fn run_pricing_tiers(format: OutputFormat) -> Result<()> {
    let tiers = pricing::tiers();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&tiers)?),
        OutputFormat::Csv => {
            println!("tier,monthly_fee,metric,limit,overage_rate");
            for t in &tiers {
                for a in &t.allowances {
                    println!(
                        "{},{},{},{},{}",
                        t.id,
                        t.monthly_fee,
                        a.metric,
                        a.limit.map(|l| l.to_string()).unwrap_or_default(),
                        a.overage_rate
                    );
                }
            }
        }
        OutputFormat::Table => {
            println!("{}", "Subscription Tiers".bold().cyan());
            println!("{}", "=".repeat(60));
            for t in &tiers {
                println!("  {}  ${}/month", t.id.as_str().to_uppercase().bold(), t.monthly_fee);
                for a in &t.allowances {
                    match a.limit {
                        Some(limit) => println!(
                            "    {:<12} {:>10}  then ${} each",
                            a.metric.as_str(),
                            limit,
                            a.overage_rate
                        ),
                        None => println!("    {:<12} {:>10}", a.metric.as_str(), "unlimited"),
                    }
                }
            }
        }
    }
    Ok(())
}

/// Price `usage` (`metric=value` pairs) on `tier`.
pub fn run_pricing_bill(tier: &str, usage: &[String], format: OutputFormat) -> Result<()> {
    let tier: TierId = tier.parse()?;
    let usage = pricing::parse_usage(usage.iter().map(String::as_str))?;
    let bill = pricing::squill_bill(tier, &usage)?;
    let violations = pricing::check_limits(tier, &usage);

    match format {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "bill": bill,
                "within_limits": violations.is_empty(),
                "violations": violations,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Csv => {
            println!("metric,usage,limit,overage,rate,cost");
            for o in &bill.overages {
                println!(
                    "{},{},{},{},{},{}",
                    o.metric, o.usage, o.limit, o.overage, o.rate, o.cost
                );
            }
        }
        OutputFormat::Table => {
            println!(
                "{}",
                format!("Bill for the {} tier", tier.as_str().to_uppercase()).bold().cyan()
            );
            println!("{}", "=".repeat(50));
            println!("  {:<24} {:>12}", "Monthly fee", format!("${}", bill.monthly_fee));
            for o in &bill.overages {
                println!(
                    "  {:<24} {:>12}",
                    format!("{} overage ({})", o.metric, o.overage),
                    format!("${}", o.cost.round_dp(2))
                );
            }
            println!("  {}", "-".repeat(37));
            println!(
                "  {:<24} {:>12}",
                "Total".bold(),
                format!("${}", bill.total_cost.round_dp(2)).bold()
            );
            if violations.is_empty() {
                println!("\n  {} usage within tier limits", "✓".green().bold());
            } else {
                for v in &violations {
                    println!(
                        "  {} {} {} exceeds limit {}",
                        "warning:".yellow().bold(),
                        v.metric,
                        v.usage,
                        v.limit
                    );
                }
            }
        }
    }
    Ok(())
}

/// Price a client's usage events (`event_type=quantity` pairs) with the
/// default per-event rules.
pub fn run_pricing_charge(events: &[String], format: OutputFormat) -> Result<()> {
    let events = pricing::parse_events(events.iter().map(String::as_str))?;
    let bill = pricing::client_bill(&pricing::ClientRules::new(), &events)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&bill)?),
        OutputFormat::Csv => {
            println!("event_type,total,free,billable,rate,cost");
            for l in &bill.lines {
                println!(
                    "{},{},{},{},{},{}",
                    l.event_type,
                    l.total_quantity,
                    l.free_quantity,
                    l.billable_quantity,
                    l.rate,
                    l.cost
                );
            }
        }
        OutputFormat::Table => {
            println!("{}", "Usage Charges".bold().cyan());
            println!("{}", "=".repeat(64));
            println!(
                "  {:<14} {:>10} {:>8} {:>10} {:>8} {:>9}",
                "Event", "Total", "Free", "Billable", "Rate", "Cost"
            );
            println!("  {}", "-".repeat(62));
            for l in &bill.lines {
                println!(
                    "  {:<14} {:>10} {:>8} {:>10} {:>8} {:>9}",
                    l.event_type,
                    l.total_quantity,
                    l.free_quantity,
                    l.billable_quantity,
                    l.rate,
                    format!("${}", l.cost.round_dp(2))
                );
            }
            let unbilled: Vec<&String> = events
                .keys()
                .filter(|k| !bill.lines.iter().any(|l| &l.event_type == *k))
                .collect();
            for k in unbilled {
                println!("  {} no rate for '{k}', not billed", "warning:".yellow().bold());
            }
            println!("  {}", "-".repeat(62));
            println!(
                "  {:<54} {:>9}",
                "Total".bold(),
                format!("${}", bill.total_cost.round_dp(2)).bold()
            );
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// squill deploy plan | frontend | backend | api-url | verify
// ---------------------------------------------------------------------------

fn new_bucket_name(config: &SquillConfig) -> String {
    deploy::bucket_name(&config.deploy.bucket_prefix, Utc::now().timestamp_millis())
}

fn staging_dir() -> PathBuf {
    std::env::temp_dir().join("squill-deploy")
}

fn print_steps(steps: &[Step]) {
    for (i, step) in steps.iter().enumerate() {
        let kind = if step.required { "" } else { " (best-effort)" };
        println!("  {}. {}{}", i + 1, step.name.bold(), kind.dimmed());
        println!("     {}", step.command.dimmed());
    }
}

fn print_outcomes(outcomes: &[StepOutcome]) {
    for outcome in outcomes {
        match &outcome.status {
            StepStatus::Ok => println!("  {} {}", "✓".green().bold(), outcome.name),
            StepStatus::Warned(reason) => println!(
                "  {} {} {}",
                "⚠".yellow().bold(),
                outcome.name,
                format!("({reason}), continuing").dimmed()
            ),
            StepStatus::Skipped => println!("  {} {}", "·".dimmed(), outcome.name.dimmed()),
        }
    }
}

/// Print the frontend and backend steps without running anything.
pub fn run_deploy_plan(config: &SquillConfig) -> Result<()> {
    let bucket = new_bucket_name(config);
    println!("{}", "Frontend".bold().cyan());
    print_steps(&deploy::plan_frontend(&config.deploy, &bucket, &staging_dir()));
    println!();
    println!("{}", "Backend".bold().cyan());
    print_steps(&deploy::plan_backend(&config.deploy));
    Ok(())
}

/// Publish the built frontend to a new bucket and record the result.
pub fn run_deploy_frontend(config: &SquillConfig, dry_run: bool) -> Result<()> {
    let dry_run = dry_run || config.deploy.dry_run;
    let build_dir = Path::new(&config.deploy.build_dir);
    if !dry_run && !build_dir.is_dir() {
        bail!(
            "build directory {} not found; build the frontend first",
            build_dir.display()
        );
    }

    let bucket = new_bucket_name(config);
    let steps = deploy::plan_frontend(&config.deploy, &bucket, &staging_dir());
    println!("{} {}", "Deploying frontend to".bold(), bucket.cyan());
    if dry_run {
        print_steps(&steps);
    }

    let events = EventLog::from_config(config);
    let outcomes = deploy::run_steps(&steps, dry_run, &mut ShellRunner, &events)?;
    print_outcomes(&outcomes);
    if dry_run {
        return Ok(());
    }

    let cdn = deploy::cloudfront_domain(&outcomes);
    let info = DeploymentInfo::new(&bucket, &config.deploy.region, cdn);
    let info_path = PathBuf::from(&config.deploy.info_file);
    info.save(&info_path)?;

    println!();
    println!("{}", "Deployment complete".bold().green());
    println!("  S3 bucket:      {}", info.bucket_name);
    println!("  Website URL:    {}", info.s3_website_url.cyan());
    match &info.cloudfront_url {
        Some(url) => println!("  CloudFront URL: {}", url.cyan()),
        None => println!(
            "  {} no CloudFront distribution was created",
            "warning:".yellow().bold()
        ),
    }
    println!(
        "  {}",
        format!("deployment info saved to {}", info_path.display()).dimmed()
    );
    Ok(())
}

/// Deploy the serverless backend and print its production API URL.
pub fn run_deploy_backend(config: &SquillConfig, dry_run: bool) -> Result<()> {
    let dry_run = dry_run || config.deploy.dry_run;
    let steps = deploy::plan_backend(&config.deploy);
    if dry_run {
        print_steps(&steps);
    }

    let events = EventLog::from_config(config);
    let outcomes = deploy::run_steps(&steps, dry_run, &mut ShellRunner, &events)?;
    print_outcomes(&outcomes);

    let info = outcomes
        .iter()
        .rev()
        .find_map(|o| o.output.as_ref())
        .map(|out| out.stdout.as_str())
        .unwrap_or("");
    print_api_url(info);
    Ok(())
}

/// Extract the production API URL from `serverless info` output, read from
/// `file` or produced by running the command.
pub fn run_deploy_api_url(config: &SquillConfig, file: Option<&Path>) -> Result<()> {
    let text = match file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let command = format!("{} info --stage {}", deploy::SERVERLESS_CLI, config.deploy.stage);
            crate::utils::process::run_shell_command(&command)?.stdout
        }
    };
    print_api_url(&text);
    Ok(())
}

fn print_api_url(text: &str) {
    match deploy::extract_api_url(text) {
        Some(url) => {
            println!("{} API URL: {}", "✓".green().bold(), url.cyan());
            println!(
                "  {}",
                format!("set it with: squill config set api.base_url {url}").dimmed()
            );
        }
        None => println!(
            "{} no production API URL found in the output",
            "warning:".yellow().bold()
        ),
    }
}

/// Request each deployed URL once and report what answered.
pub fn run_deploy_verify(config: &SquillConfig, urls: Vec<String>) -> Result<()> {
    let urls = if urls.is_empty() {
        let path = PathBuf::from(&config.deploy.info_file);
        DeploymentInfo::load(&path)
            .context("no URLs given and no deployment info to read them from")?
            .urls()
    } else {
        urls
    };

    let checks = deploy::verify(&urls, deploy::VERIFY_TIMEOUT);
    for check in &checks {
        match (check.status, &check.error) {
            (Some(status), _) => {
                println!("{} {}", "✓".green().bold(), check.url);
                println!("   Status: {status}");
                if let Some(ct) = &check.content_type {
                    println!("   Content-Type: {ct}");
                }
            }
            (None, error) => {
                println!("{} {}", "✗".red().bold(), check.url);
                println!("   Error: {}", error.as_deref().unwrap_or("no response"));
            }
        }
    }

    let working = checks.iter().filter(|c| c.reachable()).count();
    println!();
    println!(
        "  Working URLs: {working}/{} ({}%)",
        checks.len(),
        if checks.is_empty() {
            0
        } else {
            (working * 100 + checks.len() / 2) / checks.len()
        }
    );
    if working == 0 {
        bail!("deployment verification failed");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// squill config show | init | set | reset
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective squill Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    // Show source info
    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    print_source(global_exists, "~/.squill/config.toml");
    print_source(project_exists, ".squill.toml");
    println!(
        "  {} {}",
        "·".dimmed(),
        "SQUILL_* environment variables".dimmed()
    );

    Ok(())
}

fn print_source(exists: bool, name: &str) {
    if exists {
        println!("  {} {}", "✓".green(), name.dimmed());
    } else {
        println!("  {} {}", "·".dimmed(), format!("{name} (not found)").dimmed());
    }
}

/// Initialize a default config file at `~/.squill/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!(
        "{} Config written to {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

/// Set a single configuration value in the global config file.
pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

/// Reset configuration to defaults.
pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Dollar amount with comma separators; cents only when non-zero.
fn format_amount(v: f64) -> String {
    let cents = (v.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::new();
    for (i, ch) in whole.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let whole: String = grouped.chars().rev().collect();
    let sign = if v < 0.0 { "-" } else { "" };
    match cents % 100 {
        0 => format!("{sign}${whole}"),
        frac => format!("{sign}${whole}.{frac:02}"),
    }
}

/// Truncate a string to `max_len` characters, appending "…" if truncated.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{head}…")
    }
}

/// Quote a CSV field when it contains a delimiter or quote.
fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0.0), "$0");
        assert_eq!(format_amount(999.0), "$999");
        assert_eq!(format_amount(47850.0), "$47,850");
        assert_eq!(format_amount(127850.0), "$127,850");
        assert_eq!(format_amount(79.86), "$79.86");
        assert_eq!(format_amount(1234567.5), "$1,234,567.50");
        assert_eq!(format_amount(-12.0), "-$12");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 5), "hell…");
        assert_eq!(truncate("ab", 2), "ab");
    }

    #[test]
    fn test_csv_field_quotes_delimiters() {
        assert_eq!(csv_field("Acme"), "Acme");
        assert_eq!(csv_field("Acme, Inc"), "\"Acme, Inc\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!(OutputFormat::from_str_opt(None), OutputFormat::Table);
        assert_eq!(OutputFormat::from_str_opt(Some("json")), OutputFormat::Json);
        assert_eq!(OutputFormat::from_str_opt(Some("csv")), OutputFormat::Csv);
        assert_eq!(
            OutputFormat::from_str_opt(Some("unknown")),
            OutputFormat::Table
        );
    }
}
