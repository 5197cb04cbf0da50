//! Integration tests for donor report export.

use bloodline_report::export::{
    CollisionPolicy, DonorReportExporter, ExportOptions, MemorySink, REPORT_FILE_NAME,
};
use bloodline_report::model::{DonorRecord, FilterCriteria};
use bloodline_report::normalize::normalize_records;
use bloodline_report::render::{to_json, to_text, JsonFormat};
use bloodline_report::{parse_records, DateLocale};
use chrono::{DateTime, FixedOffset, TimeZone};
use std::fs;
use tempfile::TempDir;

fn generated_at() -> DateTime<FixedOffset> {
    FixedOffset::east_opt(6 * 3600)
        .unwrap()
        .with_ymd_and_hms(2026, 10, 17, 9, 0, 0)
        .unwrap()
}

fn sample_donors() -> Vec<DonorRecord> {
    parse_records(
        r#"[
            {"name": "Rahim Uddin", "bloodGroup": "O+", "status": "active",
             "district": "Dhaka", "upazila": "Savar", "phone": "01700000001",
             "email": "rahim@example.com", "lastDonation": "2026-05-20"},
            {"name": "Karim Mia", "bloodGroup": "O+", "status": "inactive",
             "district": "Dhaka", "upazila": "Dhamrai"},
            {"name": "Salma Akter", "bloodGroup": "O+", "status": "pending",
             "district": "Gazipur", "upazila": "Kaliakair", "phone": 1800000002}
        ]"#,
    )
    .unwrap()
}

fn many_donors(prefix: &str, n: usize) -> Vec<DonorRecord> {
    (0..n)
        .map(|i| {
            DonorRecord::new(format!("{} {}", prefix, i), "B+")
                .with_status(if i % 3 == 0 { "active" } else { "inactive" })
                .with_location("Chattogram", "Patiya")
        })
        .collect()
}

fn exporter(dir: &TempDir) -> DonorReportExporter {
    DonorReportExporter::new(
        ExportOptions::new()
            .with_output_dir(dir.path())
            .with_generated_at(generated_at()),
    )
}

#[test]
fn test_export_writes_fixed_file_name() {
    let dir = TempDir::new().unwrap();
    let artifact = exporter(&dir)
        .export(&sample_donors(), &FilterCriteria::new().with_blood_group("O+"))
        .unwrap();

    assert_eq!(artifact.path, dir.path().join(REPORT_FILE_NAME));
    assert_eq!(artifact.rows, 3);
    assert_eq!(artifact.pages, 1);

    let bytes = fs::read(&artifact.path).unwrap();
    assert_eq!(bytes.len(), artifact.size);
    assert!(bytes.starts_with(b"%PDF-1.7"));
}

#[test]
fn test_exported_pdf_page_count_matches_document() {
    let dir = TempDir::new().unwrap();
    let records = many_donors("Donor", 180);
    let exporter = exporter(&dir);

    let doc = exporter.build(&records, &FilterCriteria::new()).unwrap();
    let artifact = exporter.export(&records, &FilterCriteria::new()).unwrap();

    assert!(doc.page_count() > 1);
    assert_eq!(artifact.pages, doc.page_count());

    let parsed = lopdf::Document::load(&artifact.path).unwrap();
    assert_eq!(parsed.get_pages().len() as u32, artifact.pages);
}

#[test]
fn test_row_count_matches_record_count() {
    let dir = TempDir::new().unwrap();
    for n in [0usize, 1, 2, 64, 250] {
        let doc = exporter(&dir)
            .build(&many_donors("Row", n), &FilterCriteria::new())
            .unwrap();
        assert_eq!(doc.body_row_count(), n);
    }
}

#[test]
fn test_normalized_cells_appear_in_document() {
    let dir = TempDir::new().unwrap();
    let doc = exporter(&dir)
        .build(&sample_donors(), &FilterCriteria::new())
        .unwrap();
    let text = doc.plain_text();

    assert!(text.contains("Available"));
    assert!(text.contains("Unavailable"));
    assert!(text.contains("Dhaka, Savar"));
    assert!(text.contains("5/20/2026"));
    assert!(text.contains("First Time"));
    assert!(text.contains("1800000002"));
}

#[test]
fn test_missing_fields_use_placeholders() {
    let rows = normalize_records(&sample_donors(), DateLocale::EnUs);
    let karim = &rows[1];
    assert_eq!(karim[2], "Unavailable");
    assert_eq!(karim[4], "N/A");
    assert_eq!(karim[5], "N/A");
    assert_eq!(karim[6], "First Time");

    // "pending" is not a third state
    assert_eq!(rows[2][2], "Unavailable");
}

#[test]
fn test_criteria_summary_in_header() {
    let dir = TempDir::new().unwrap();
    let doc = exporter(&dir)
        .build(&sample_donors(), &FilterCriteria::new().with_blood_group("O+"))
        .unwrap();

    let first_page = doc.page(1).unwrap().plain_text();
    assert!(first_page.contains("Search Criteria: Blood Group: O+, District: All, Upazila: All"));
    assert!(first_page.contains("Generated on: 10/17/2026 9:00:00 AM"));
}

#[test]
fn test_successive_exports_are_independent() {
    let sink = MemorySink::new();
    let exporter = DonorReportExporter::new(ExportOptions::new().with_generated_at(generated_at()));

    let first = many_donors("Alpha", 3);
    let second = many_donors("Beta", 5);

    let a = exporter
        .export_to(&first, &FilterCriteria::new(), &sink)
        .unwrap();
    let b = exporter
        .export_to(&second, &FilterCriteria::new(), &sink)
        .unwrap();
    assert_eq!(a.rows, 3);
    assert_eq!(b.rows, 5);

    let doc_a = exporter.build(&first, &FilterCriteria::new()).unwrap();
    let doc_b = exporter.build(&second, &FilterCriteria::new()).unwrap();
    assert!(!doc_a.plain_text().contains("Beta"));
    assert!(!doc_b.plain_text().contains("Alpha"));

    let stored = sink.take();
    assert_eq!(stored.len(), 2);
    assert_ne!(stored[0].1, stored[1].1);
}

#[test]
fn test_repeat_export_overwrites_by_default() {
    let dir = TempDir::new().unwrap();
    let exporter = exporter(&dir);

    exporter
        .export(&many_donors("Old", 40), &FilterCriteria::new())
        .unwrap();
    let second = exporter
        .export(&many_donors("New", 1), &FilterCriteria::new())
        .unwrap();

    let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(fs::read(&second.path).unwrap().len(), second.size);
}

#[test]
fn test_numbered_policy_keeps_previous_export() {
    let dir = TempDir::new().unwrap();
    let exporter = DonorReportExporter::new(
        ExportOptions::new()
            .with_output_dir(dir.path())
            .with_generated_at(generated_at())
            .with_collision_policy(CollisionPolicy::Numbered),
    );

    let first = exporter.export(&sample_donors(), &FilterCriteria::new()).unwrap();
    let second = exporter.export(&sample_donors(), &FilterCriteria::new()).unwrap();

    assert_ne!(first.path, second.path);
    assert_eq!(
        second.path.file_name().unwrap().to_string_lossy(),
        "bloodline-donor-results (1).pdf"
    );
    assert!(first.path.exists() && second.path.exists());
}

#[cfg(unix)]
#[test]
fn test_unwritable_directory_fails() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let locked = dir.path().join("locked");
    fs::create_dir(&locked).unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o500)).unwrap();

    // root ignores directory permissions
    let probe = locked.join("probe");
    if fs::write(&probe, b"x").is_ok() {
        return;
    }

    let exporter = DonorReportExporter::new(ExportOptions::new().with_output_dir(&locked));
    let err = exporter
        .export(&sample_donors(), &FilterCriteria::new())
        .unwrap_err();
    assert!(matches!(err, bloodline_report::Error::Io(_)));
    assert!(!locked.join(REPORT_FILE_NAME).exists());
}

#[test]
fn test_compressed_export_is_smaller() {
    let records = many_donors("Donor", 120);
    let plain = DonorReportExporter::new(ExportOptions::new().with_generated_at(generated_at()))
        .render(&records, &FilterCriteria::new())
        .unwrap();
    let compressed = DonorReportExporter::new(
        ExportOptions::new()
            .with_generated_at(generated_at())
            .with_compression(true),
    )
    .render(&records, &FilterCriteria::new())
    .unwrap();

    assert!(compressed.len() < plain.len());
}

#[test]
fn test_layout_json_and_text_views() {
    let dir = TempDir::new().unwrap();
    let doc = exporter(&dir)
        .build(&sample_donors(), &FilterCriteria::new())
        .unwrap();

    let json = to_json(&doc, JsonFormat::Compact).unwrap();
    assert!(json.contains("\"body_rows\":3"));

    let text = to_text(&doc);
    assert!(text.starts_with("--- Page 1 ---\nBloodLine Donor Search Results\n"));
}
