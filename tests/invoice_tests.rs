/// Invoice document tests.
///
/// Checks the serialized PDF as a whole: file structure, the figures that
/// reach the page, and writing the document to disk.
use chrono::NaiveDate;
use squill::dashboard::{self, Variant};
use squill::invoice;
use squill::model::Invoice;

fn contains(haystack: &[u8], needle: &str) -> bool {
    haystack
        .windows(needle.len())
        .any(|w| w == needle.as_bytes())
}

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[test]
fn sparse_record_renders_a_complete_pdf() {
    let record = Invoice::new("INV-9", "Sparse Co", 250.0);
    let bytes = invoice::render(&record, day("2024-05-01")).to_bytes();

    assert!(bytes.starts_with(b"%PDF-1.4"));
    assert!(bytes.ends_with(b"%%EOF\n"));
    assert!(contains(&bytes, "(INVOICE ID: INV-9) Tj"));
    assert!(contains(&bytes, "(Sparse Co) Tj"));
    assert!(contains(&bytes, "($250) Tj"));
    assert!(contains(&bytes, "(DUE DATE: 2024-05-31) Tj"));
    assert!(contains(&bytes, "/BaseFont /Helvetica-Bold"));
}

#[test]
fn xref_offsets_point_at_objects() {
    let bytes = invoice::generate(&Invoice::default());
    let text = String::from_utf8_lossy(&bytes);

    let xref_at: usize = text
        .rsplit("startxref\n")
        .next()
        .and_then(|tail| tail.lines().next())
        .and_then(|n| n.trim().parse().ok())
        .unwrap();
    assert!(bytes[xref_at..].starts_with(b"xref"));

    let table = String::from_utf8_lossy(&bytes[xref_at..]);
    let entries: Vec<usize> = table
        .lines()
        .skip(3)
        .take(6)
        .map(|l| l[..10].parse().unwrap())
        .collect();
    for (i, offset) in entries.iter().enumerate() {
        let header = format!("{} 0 obj", i + 1);
        assert!(bytes[*offset..].starts_with(header.as_bytes()));
    }
}

#[test]
fn brutalist_invoice_keeps_explicit_dates() {
    let data = dashboard::fixture(Variant::Brutalist);
    let record = data.invoice("INV-2024-005").unwrap();
    let doc = invoice::render(record, day("2030-01-01"));
    let texts: Vec<&str> = doc.texts().collect();

    assert!(texts.contains(&"DATE: 2024-01-10"));
    assert!(texts.contains(&"DUE DATE: 2024-02-09"));
    assert!(texts.contains(&"MICROSERVICE LABS"));
    assert!(texts.contains(&"$6750"));
}

#[test]
fn due_date_follows_invoice_date_across_month_ends() {
    for (date, due) in [
        ("2024-01-31", "2024-03-01"),
        ("2024-12-15", "2025-01-14"),
        ("2023-02-01", "2023-03-03"),
    ] {
        let mut record = Invoice::new("INV-1", "Acme", 1.0);
        record.date = Some(date.to_string());
        assert_eq!(invoice::due_date(&record, day("2000-01-01")), due);
    }
}

#[test]
fn save_writes_named_file() {
    let dir = std::env::temp_dir().join(format!("squill-invoice-{}", std::process::id()));
    let record = Invoice::new("INV-2024-001", "TECHFLOW ENTERPRISES", 15500.0);

    let path = invoice::save(&record, &dir).unwrap();
    assert_eq!(
        path.file_name().and_then(|n| n.to_str()),
        Some("squill-invoice-INV-2024-001.pdf")
    );
    let written = std::fs::read(&path).unwrap();
    assert!(written.starts_with(b"%PDF"));

    let _ = std::fs::remove_dir_all(&dir);
}
