//! Invoice document generator.
//!
//! Lays out a fixed, single-page billing document for one [`Invoice`] and
//! serializes it with the in-crate [`pdf`] writer. The layout is a fixed
//! sequence of absolutely positioned draw calls; nothing is configurable.
//!
//! Missing fields never fail the render, they fall back to literals:
//!
//! | Field          | Fallback                                |
//! |----------------|-----------------------------------------|
//! | `invoice_id`   | `INV-2024-001`                          |
//! | `date`         | today                                   |
//! | `due_date`     | invoice date (or today) + 30 days       |
//! | `customer_id`  | `N/A`                                   |
//! | `total_amount` | `79.86`                                 |
//! | `customer_name`| empty text                              |
//!
//! The itemized service table always shows the same seven demo rows; only
//! the total box reflects the invoice's own amount.

pub mod pdf;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Duration, Local, NaiveDate};

use crate::model::Invoice;
use pdf::{Font, PdfDocument};

pub const DEFAULT_INVOICE_ID: &str = "INV-2024-001";
pub const DEFAULT_TOTAL: &str = "79.86";
/// Days between the invoice date and the computed due date.
pub const PAYMENT_TERMS_DAYS: i64 = 30;

const PLATFORM_FEE_RATE: f64 = 0.15;
const TAX_RATE: f64 = 0.085;

const SEA_GREEN: (u8, u8, u8) = (32, 178, 170);
const INK: (u8, u8, u8) = (20, 20, 20);
const PURPLE: (u8, u8, u8) = (138, 43, 226);

/// One row of the itemized service table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServiceLine {
    pub service: &'static str,
    pub usage: &'static str,
    pub rate: &'static str,
    pub cost: f64,
}

/// The fixed rows printed on every invoice.
pub const SERVICE_LINES: [ServiceLine; 7] = [
    ServiceLine { service: "API Gateway", usage: "15,000 requests", rate: "$0.001/req", cost: 15.00 },
    ServiceLine { service: "Lambda Functions", usage: "50,000 invocations", rate: "$0.0008/inv", cost: 40.00 },
    ServiceLine { service: "DynamoDB", usage: "25 GB storage", rate: "$0.25/GB", cost: 6.25 },
    ServiceLine { service: "S3 Storage", usage: "100 GB", rate: "$0.023/GB", cost: 2.30 },
    ServiceLine { service: "CloudWatch", usage: "1M metrics", rate: "$0.30/1M", cost: 0.30 },
    ServiceLine { service: "SES Email", usage: "1,000 emails", rate: "$0.10/1K", cost: 0.10 },
    ServiceLine { service: "EventBridge", usage: "500 events", rate: "$1.00/1M", cost: 0.05 },
];

/// Subtotal, platform fee and tax of the fixed service rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Charges {
    pub subtotal: f64,
    pub platform_fee: f64,
    pub tax: f64,
}

impl Charges {
    pub fn of(lines: &[ServiceLine]) -> Self {
        let subtotal = round_cents(lines.iter().map(|l| l.cost).sum());
        let platform_fee = round_cents(subtotal * PLATFORM_FEE_RATE);
        let tax = round_cents((subtotal + platform_fee) * TAX_RATE);
        Self {
            subtotal,
            platform_fee,
            tax,
        }
    }

    pub fn total(&self) -> f64 {
        round_cents(self.subtotal + self.platform_fee + self.tax)
    }
}

fn round_cents(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

// ---------------------------------------------------------------------------
// Field resolution
// ---------------------------------------------------------------------------

/// The invoice date, or `today` when absent or unparseable.
pub fn invoice_date(invoice: &Invoice, today: NaiveDate) -> NaiveDate {
    invoice
        .date
        .as_deref()
        .and_then(parse_date)
        .unwrap_or(today)
}

/// The due date printed on the document.
///
/// An explicit `due_date` is printed as given; otherwise it is the invoice
/// date plus [`PAYMENT_TERMS_DAYS`].
pub fn due_date(invoice: &Invoice, today: NaiveDate) -> String {
    match &invoice.due_date {
        Some(due) => due.clone(),
        None => format_date(invoice_date(invoice, today) + Duration::days(PAYMENT_TERMS_DAYS)),
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    // Accept full timestamps such as `2024-01-31T00:00:00`.
    let day = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

fn format_date(d: NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

/// The amount printed in the total box, without the `$`.
///
/// A missing or zero amount prints the default total.
pub fn total_label(invoice: &Invoice) -> String {
    match invoice.total_amount {
        Some(amount) if amount != 0.0 => amount.to_string(),
        _ => DEFAULT_TOTAL.to_string(),
    }
}

/// `squill-invoice-{id}.pdf`, `latest` when the id is missing.
pub fn file_name(invoice: &Invoice) -> String {
    let id = invoice.invoice_id.as_deref().unwrap_or("latest");
    let safe: String = id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("squill-invoice-{safe}.pdf")
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Lay out the document for `invoice` as of `today`.
pub fn render(invoice: &Invoice, today: NaiveDate) -> PdfDocument {
    let mut doc = PdfDocument::letter();

    // Header band and logo block
    fill(&mut doc, SEA_GREEN);
    doc.rect(0.0, 0.0, 210.0, 50.0);
    fill(&mut doc, INK);
    doc.rect(15.0, 10.0, 30.0, 30.0);
    fill(&mut doc, SEA_GREEN);
    doc.rect(17.0, 12.0, 26.0, 26.0);

    text_color(&mut doc, INK);
    doc.set_font(Font::HelveticaBold, 24.0);
    doc.text("S", 28.0, 32.0);

    doc.set_font(Font::HelveticaBold, 32.0);
    doc.text("SQUILL", 55.0, 25.0);
    doc.set_font(Font::Helvetica, 12.0);
    doc.text("SERVERLESS BILLING AUTOMATION", 55.0, 35.0);

    doc.set_font(Font::HelveticaBold, 28.0);
    doc.text("INVOICE", 150.0, 25.0);

    let invoice_id = invoice.invoice_id.as_deref().unwrap_or(DEFAULT_INVOICE_ID);
    let date = invoice
        .date
        .clone()
        .unwrap_or_else(|| format_date(today));
    doc.set_font(Font::HelveticaBold, 10.0);
    doc.text(format!("INVOICE ID: {invoice_id}"), 150.0, 35.0);
    doc.text(format!("DATE: {date}"), 150.0, 42.0);
    doc.text(format!("DUE DATE: {}", due_date(invoice, today)), 150.0, 49.0);

    // Addresses
    doc.set_font(Font::HelveticaBold, 12.0);
    doc.text("FROM:", 20.0, 65.0);
    doc.set_font(Font::Helvetica, 10.0);
    doc.text("Squill Technologies Inc.", 20.0, 73.0);
    doc.text("AWS Serverless Billing Solutions", 20.0, 78.0);
    doc.text("San Francisco, CA 94105", 20.0, 83.0);
    doc.text("billing@squill.com", 20.0, 88.0);

    doc.set_font(Font::HelveticaBold, 12.0);
    doc.text("TO:", 120.0, 65.0);
    doc.set_font(Font::Helvetica, 10.0);
    doc.text(invoice.customer_name.clone().unwrap_or_default(), 120.0, 73.0);
    doc.text(
        format!(
            "Customer ID: {}",
            invoice.customer_id.as_deref().unwrap_or("N/A")
        ),
        120.0,
        78.0,
    );
    doc.text("Billing Period: Current Month", 120.0, 83.0);

    // Service table
    doc.set_font(Font::HelveticaBold, 14.0);
    doc.text("AWS SERVICES BREAKDOWN", 20.0, 105.0);

    fill(&mut doc, (248, 249, 250));
    doc.rect(20.0, 115.0, 170.0, 12.0);
    doc.set_font(Font::HelveticaBold, 9.0);
    doc.text("AWS Service", 25.0, 123.0);
    doc.text("Usage", 90.0, 123.0);
    doc.text("Rate", 130.0, 123.0);
    doc.text("Cost", 165.0, 123.0);

    let mut y = 135.0;
    doc.set_font(Font::Helvetica, 8.0);
    for (i, line) in SERVICE_LINES.iter().enumerate() {
        if i % 2 == 0 {
            fill(&mut doc, (252, 252, 252));
            doc.rect(20.0, y - 4.0, 170.0, 8.0);
        }
        doc.text(line.service, 25.0, y);
        doc.text(line.usage, 90.0, y);
        doc.text(line.rate, 130.0, y);
        doc.text(money(line.cost), 165.0, y);
        y += 8.0;
    }

    // Charges
    let charges = Charges::of(&SERVICE_LINES);
    y += 10.0;
    doc.set_font(Font::Helvetica, 10.0);
    doc.text("Subtotal (AWS Services):", 130.0, y);
    doc.text(money(charges.subtotal), 165.0, y);
    y += 8.0;
    doc.text("Platform Fee (15%):", 130.0, y);
    doc.text(money(charges.platform_fee), 165.0, y);
    y += 8.0;
    doc.text("Tax (8.5%):", 130.0, y);
    doc.text(money(charges.tax), 165.0, y);

    // Total box
    y += 15.0;
    fill(&mut doc, PURPLE);
    doc.rect(120.0, y - 8.0, 70.0, 15.0);
    text_color(&mut doc, (255, 255, 255));
    doc.set_font(Font::HelveticaBold, 12.0);
    doc.text("TOTAL:", 125.0, y);
    doc.text(format!("${}", total_label(invoice)), 160.0, y);

    // Payment terms
    y += 25.0;
    text_color(&mut doc, (0, 0, 0));
    doc.set_font(Font::HelveticaBold, 10.0);
    doc.text("PAYMENT INFORMATION", 20.0, y);
    doc.set_font(Font::Helvetica, 8.0);
    y += 8.0;
    doc.text("Payment Method: Auto-debit from AWS account", 20.0, y);
    y += 5.0;
    doc.text("Due Date: Net 30 days from invoice date", 20.0, y);
    y += 5.0;
    doc.text("Late Fee: 1.5% per month on overdue amounts", 20.0, y);

    // Footer
    text_color(&mut doc, (100, 100, 100));
    doc.set_font(Font::Helvetica, 8.0);
    doc.text(
        "This invoice reflects your AWS resource consumption through Squill's billing platform.",
        20.0,
        270.0,
    );
    doc.text(
        "For support, contact: support@squill.com | Phone: +1 (555) 123-4567",
        20.0,
        275.0,
    );

    doc
}

fn fill(doc: &mut PdfDocument, (r, g, b): (u8, u8, u8)) {
    doc.set_fill_color(r, g, b);
}

fn text_color(doc: &mut PdfDocument, (r, g, b): (u8, u8, u8)) {
    doc.set_text_color(r, g, b);
}

fn money(v: f64) -> String {
    format!("${v:.2}")
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Render `invoice` as of the local date and return the PDF bytes.
pub fn generate(invoice: &Invoice) -> Vec<u8> {
    render(invoice, Local::now().date_naive()).to_bytes()
}

/// Write the document into `dir` and return its path.
pub fn save(invoice: &Invoice, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;
    let path = dir.join(file_name(invoice));
    fs::write(&path, generate(invoice))
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
