//! Literal demo payloads, one set per dashboard layout.
//!
//! Every function builds a fresh value; nothing here is shared or cached.
//! The figures differ between layouts and must stay as written.

use crate::model::{
    Activity, AnalyticsSnapshot, AwsService, Customer, Invoice, MonthlyRevenue, UsageSlice,
};

fn month(month: &str, revenue: f64) -> MonthlyRevenue {
    MonthlyRevenue {
        month: month.to_string(),
        revenue,
        customers: None,
        invoices: None,
    }
}

fn month_detail(month: &str, revenue: f64, customers: u32, invoices: u32) -> MonthlyRevenue {
    MonthlyRevenue {
        month: month.to_string(),
        revenue,
        customers: Some(customers),
        invoices: Some(invoices),
    }
}

fn service(name: &str, cost: f64, usage: &str) -> AwsService {
    AwsService {
        name: name.to_string(),
        cost,
        usage: usage.to_string(),
        status: None,
        utilization: None,
    }
}

fn online_service(name: &str, cost: f64, usage: &str, utilization: u32) -> AwsService {
    AwsService {
        status: Some("online".to_string()),
        utilization: Some(utilization),
        ..service(name, cost, usage)
    }
}

fn slice(name: &str, value: f64, color: Option<&str>) -> UsageSlice {
    UsageSlice {
        name: name.to_string(),
        value,
        color: color.map(str::to_string),
    }
}

fn customer(id: &str, name: &str, tier: &str) -> Customer {
    Customer {
        customer_id: id.to_string(),
        name: name.to_string(),
        pricing_tier: Some(tier.to_string()),
        ..Customer::default()
    }
}

fn invoice(id: &str, customer_name: &str, total: f64, status: &str) -> Invoice {
    Invoice {
        status: Some(status.to_string()),
        ..Invoice::new(id, customer_name, total)
    }
}

fn dated_invoice(
    id: &str,
    customer_name: &str,
    total: f64,
    status: &str,
    date: &str,
    due_date: &str,
    aws_cost: f64,
) -> Invoice {
    Invoice {
        date: Some(date.to_string()),
        due_date: Some(due_date.to_string()),
        aws_cost: Some(aws_cost),
        ..invoice(id, customer_name, total, status)
    }
}

fn first_half_revenue() -> Vec<MonthlyRevenue> {
    vec![
        month("Jan", 35000.0),
        month("Feb", 42000.0),
        month("Mar", 38000.0),
        month("Apr", 45000.0),
        month("May", 48000.0),
        month("Jun", 52000.0),
    ]
}

// ---------------------------------------------------------------------------
// Minimal
// ---------------------------------------------------------------------------

pub fn minimal_analytics() -> AnalyticsSnapshot {
    AnalyticsSnapshot {
        total_revenue: 47850.0,
        monthly_revenue: first_half_revenue(),
        aws_services: Vec::new(),
        usage_breakdown: vec![
            slice("API Calls", 2400.0, None),
            slice("Storage", 1800.0, None),
            slice("Bandwidth", 1200.0, None),
            slice("Compute", 800.0, None),
        ],
    }
}

pub fn minimal_customers() -> Vec<Customer> {
    vec![
        Customer {
            email: Some("billing@taskflow.io".to_string()),
            ..customer("1", "TaskFlow Inc", "Enterprise")
        },
        Customer {
            email: Some("finance@cloudstore.com".to_string()),
            ..customer("2", "CloudStore Corp", "Pro")
        },
        Customer {
            email: Some("accounts@fintech.io".to_string()),
            ..customer("3", "FinTech Solutions", "Basic")
        },
    ]
}

pub fn minimal_invoices() -> Vec<Invoice> {
    vec![
        invoice("INV-001", "TaskFlow Inc", 999.0, "generated"),
        invoice("INV-002", "CloudStore Corp", 299.0, "pending"),
        invoice("INV-003", "FinTech Solutions", 99.0, "generated"),
    ]
}

// ---------------------------------------------------------------------------
// Bento
// ---------------------------------------------------------------------------

pub fn bento_analytics() -> AnalyticsSnapshot {
    AnalyticsSnapshot {
        total_revenue: 47850.0,
        monthly_revenue: first_half_revenue(),
        aws_services: vec![
            service("API Gateway", 245.0, "15K requests"),
            service("Lambda", 180.0, "50K invocations"),
            service("DynamoDB", 95.0, "25GB storage"),
            service("S3", 45.0, "100GB storage"),
        ],
        usage_breakdown: Vec::new(),
    }
}

pub fn bento_customers() -> Vec<Customer> {
    let with_status = |c: Customer, status: &str| Customer {
        status: Some(status.to_string()),
        ..c
    };
    vec![
        with_status(customer("1", "TaskFlow Inc", "Enterprise"), "active"),
        with_status(customer("2", "CloudStore Corp", "Pro"), "active"),
        with_status(customer("3", "FinTech Solutions", "Basic"), "pending"),
    ]
}

pub fn bento_invoices() -> Vec<Invoice> {
    vec![
        invoice("INV-001", "TaskFlow Inc", 999.0, "paid"),
        invoice("INV-002", "CloudStore Corp", 299.0, "pending"),
    ]
}

// ---------------------------------------------------------------------------
// Brutalist
// ---------------------------------------------------------------------------

pub fn brutalist_analytics() -> AnalyticsSnapshot {
    AnalyticsSnapshot {
        total_revenue: 127850.0,
        monthly_revenue: vec![
            month_detail("JAN", 85000.0, 45, 120),
            month_detail("FEB", 92000.0, 52, 135),
            month_detail("MAR", 88000.0, 48, 128),
            month_detail("APR", 105000.0, 61, 142),
            month_detail("MAY", 118000.0, 68, 156),
            month_detail("JUN", 127850.0, 74, 168),
        ],
        aws_services: vec![
            online_service("API GATEWAY", 1245.0, "2.5M REQUESTS", 78),
            online_service("LAMBDA", 2180.0, "850K INVOCATIONS", 65),
            online_service("DYNAMODB", 895.0, "125GB STORAGE", 45),
            online_service("S3", 445.0, "500GB STORAGE", 32),
            online_service("CLOUDWATCH", 125.0, "10M METRICS", 55),
            online_service("SES", 85.0, "25K EMAILS", 28),
        ],
        usage_breakdown: vec![
            slice("API CALLS", 45.0, Some("#20B2AA")),
            slice("STORAGE", 25.0, Some("#16A34A")),
            slice("COMPUTE", 20.0, Some("#F59E0B")),
            slice("NETWORK", 10.0, Some("#EF4444")),
        ],
    }
}

pub fn brutalist_customers() -> Vec<Customer> {
    let row = |id: &str, name: &str, tier: &str, status: &str, revenue: f64, last: &str, growth: &str| {
        Customer {
            status: Some(status.to_string()),
            revenue: Some(revenue),
            last_invoice: Some(last.to_string()),
            growth: Some(growth.to_string()),
            ..customer(id, name, tier)
        }
    };
    vec![
        row("cust_001", "TECHFLOW ENTERPRISES", "ENTERPRISE", "ACTIVE", 15500.0, "2024-01-15", "+23%"),
        row("cust_002", "CLOUDSTORE DYNAMICS", "PRO", "ACTIVE", 8200.0, "2024-01-14", "+18%"),
        row("cust_003", "FINTECH SOLUTIONS", "BASIC", "PENDING", 2990.0, "2024-01-13", "+5%"),
        row("cust_004", "DATASTREAM SYSTEMS", "PRO", "ACTIVE", 12899.0, "2024-01-12", "+31%"),
        row("cust_005", "APIFORGE NETWORKS", "ENTERPRISE", "ACTIVE", 23200.0, "2024-01-11", "+42%"),
        row("cust_006", "MICROSERVICE LABS", "PRO", "ACTIVE", 6750.0, "2024-01-10", "+12%"),
    ]
}

pub fn brutalist_invoices() -> Vec<Invoice> {
    vec![
        dated_invoice("INV-2024-001", "TECHFLOW ENTERPRISES", 15500.0, "PAID", "2024-01-15", "2024-02-14", 12400.0),
        dated_invoice("INV-2024-002", "CLOUDSTORE DYNAMICS", 8200.0, "PENDING", "2024-01-14", "2024-02-13", 6560.0),
        dated_invoice("INV-2024-003", "DATASTREAM SYSTEMS", 12899.0, "PAID", "2024-01-13", "2024-02-12", 10319.0),
        dated_invoice("INV-2024-004", "APIFORGE NETWORKS", 23200.0, "PAID", "2024-01-12", "2024-02-11", 18560.0),
        dated_invoice("INV-2024-005", "MICROSERVICE LABS", 6750.0, "OVERDUE", "2024-01-10", "2024-02-09", 5400.0),
    ]
}

/// The recent-activity feed shown by the brutalist layout.
pub fn recent_activities() -> Vec<Activity> {
    let entry = |id: u32, kind: &str, description: &str, time: &str, amount: f64| Activity {
        id,
        kind: kind.to_string(),
        description: description.to_string(),
        time: time.to_string(),
        amount,
    };
    vec![
        entry(1, "PAYMENT", "PAYMENT RECEIVED: $23,200 FROM APIFORGE NETWORKS", "3 MIN AGO", 23200.0),
        entry(2, "INVOICE", "INVOICE GENERATED: INV-2024-006 FOR TECHFLOW ENTERPRISES", "18 MIN AGO", 15500.0),
        entry(3, "CUSTOMER", "NEW CUSTOMER ONBOARDED: BLOCKCHAIN DYNAMICS", "1 HOUR AGO", 0.0),
        entry(4, "SYSTEM", "AUTOMATED BILLING CYCLE COMPLETED: 168 INVOICES PROCESSED", "2 HOURS AGO", 0.0),
        entry(5, "ALERT", "HIGH USAGE DETECTED: DATASTREAM SYSTEMS (125% OF LIMIT)", "3 HOURS AGO", 0.0),
        entry(6, "PAYMENT", "PAYMENT RECEIVED: $12,899 FROM DATASTREAM SYSTEMS", "4 HOURS AGO", 12899.0),
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
