use chrono::TimeZone;

use kendra_shared::types::KvkId;

use super::{OutputFormat, render};
use crate::document::{
    KvkFetchError, ReportDocument, ReportMetadata, ScopeSummary, SectionPayload, SectionRow,
};
use crate::registry::RenderFormat;

fn kvk(n: u128) -> KvkId {
    KvkId::from_uuid(uuid::Uuid::from_u128(n))
}

fn row(kvk_id: KvkId, kvk_name: &str, group: Option<&str>, cells: &[&str]) -> SectionRow {
    SectionRow {
        kvk_id,
        kvk_name: kvk_name.to_string(),
        group_key: group.map(str::to_string),
        cells: cells.iter().map(|c| (*c).to_string()).collect(),
    }
}

fn document(kvk_count: usize, sections: Vec<SectionPayload>) -> ReportDocument {
    ReportDocument {
        metadata: ReportMetadata {
            title: "KVK Comprehensive Report".to_string(),
            generated_at: chrono::Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap(),
            generated_by: "Test Caller".to_string(),
            scope: ScopeSummary {
                requested_levels: vec![],
                derived_from: None,
                kvk_count,
                failed_kvk_count: 0,
            },
        },
        sections,
    }
}

fn table_section(rows: Vec<SectionRow>) -> SectionPayload {
    SectionPayload {
        section_id: "1.3".to_string(),
        title: "Employee Details".to_string(),
        format: RenderFormat::Table,
        columns: vec!["Name".to_string(), "Designation".to_string()],
        group_label: None,
        rows,
        per_kvk_errors: vec![],
        warnings: vec![],
    }
}

fn as_text(document: &ReportDocument, format: OutputFormat) -> String {
    String::from_utf8(render(document, format).to_vec()).expect("utf-8")
}

#[test]
fn test_empty_section_renders_placeholder_not_omission() {
    let doc = document(1, vec![table_section(vec![])]);

    let html = as_text(&doc, OutputFormat::Html);
    assert!(html.contains("1.3 Employee Details"));
    assert!(html.contains("No records available."));

    let csv = as_text(&doc, OutputFormat::Csv);
    assert!(csv.contains("1.3,Employee Details"));
    assert!(csv.contains("No records available."));
}

#[test]
fn test_table_rows_get_serial_numbers() {
    let doc = document(
        1,
        vec![table_section(vec![
            row(kvk(1), "KVK A", None, &["A. Sharma", "SMS"]),
            row(kvk(1), "KVK A", None, &["B. Singh", "SMS"]),
        ])],
    );

    let html = as_text(&doc, OutputFormat::Html);
    assert!(html.contains("<th>S.No</th>"));
    assert!(html.contains("<tr><td>1</td><td>A. Sharma</td>"));
    assert!(html.contains("<tr><td>2</td><td>B. Singh</td>"));

    let csv = as_text(&doc, OutputFormat::Csv);
    assert!(csv.contains("S.No,Name,Designation"));
    assert!(csv.contains("1,A. Sharma,SMS"));
    assert!(csv.contains("2,B. Singh,SMS"));
}

#[test]
fn test_multi_kvk_documents_show_kvk_column() {
    let doc = document(
        2,
        vec![table_section(vec![
            row(kvk(1), "KVK A", None, &["A. Sharma", "SMS"]),
            row(kvk(2), "KVK B", None, &["B. Singh", "SMS"]),
        ])],
    );

    let html = as_text(&doc, OutputFormat::Html);
    assert!(html.contains("<th>KVK</th>"));
    assert!(html.contains("<td>KVK B</td>"));

    let csv = as_text(&doc, OutputFormat::Csv);
    assert!(csv.contains("S.No,KVK,Name,Designation"));
    assert!(csv.contains("2,KVK B,B. Singh,SMS"));
}

#[test]
fn test_narrative_renders_first_row_per_kvk_with_warning() {
    let section = SectionPayload {
        section_id: "1.1".to_string(),
        title: "KVK Basic Information".to_string(),
        format: RenderFormat::Narrative,
        columns: vec!["KVK Name".to_string(), "District".to_string()],
        group_label: None,
        rows: vec![
            row(kvk(1), "KVK A", None, &["KVK A", "Ludhiana"]),
            row(kvk(1), "KVK A", None, &["Duplicate", "Ludhiana"]),
        ],
        per_kvk_errors: vec![],
        warnings: vec![],
    };
    let doc = document(1, vec![section]);

    let html = as_text(&doc, OutputFormat::Html);
    assert!(html.contains("<th>KVK Name</th><td>KVK A</td>"));
    assert!(!html.contains("Duplicate"));
    assert!(html.contains("1 additional record(s) not shown."));
}

#[test]
fn test_grouped_table_sorts_groups_and_restarts_serials() {
    let section = SectionPayload {
        section_id: "2.3".to_string(),
        title: "Vehicles".to_string(),
        format: RenderFormat::GroupedTable,
        columns: vec!["Registration Number".to_string()],
        group_label: Some("Year of Purchase".to_string()),
        rows: vec![
            row(kvk(1), "KVK A", Some("2019"), &["PB-10-3"]),
            row(kvk(1), "KVK A", Some("2018"), &["PB-10-1"]),
            row(kvk(1), "KVK A", Some("2018"), &["PB-10-2"]),
        ],
        per_kvk_errors: vec![],
        warnings: vec![],
    };
    let doc = document(1, vec![section]);

    let html = as_text(&doc, OutputFormat::Html);
    let pos_2018 = html.find("Year of Purchase: 2018").expect("2018 header");
    let pos_2019 = html.find("Year of Purchase: 2019").expect("2019 header");
    assert!(pos_2018 < pos_2019);

    // Serial numbering restarts inside the 2019 group.
    let tail = &html[pos_2019..];
    assert!(tail.contains("<tr><td>1</td><td>PB-10-3</td>"));
}

#[test]
fn test_per_kvk_errors_are_rendered() {
    let mut section = table_section(vec![row(kvk(1), "KVK A", None, &["A", "SMS"])]);
    section.per_kvk_errors = vec![KvkFetchError {
        kvk_id: kvk(2),
        kvk_name: "KVK B".to_string(),
        reason: "store backend error: timeout".to_string(),
    }];
    let doc = document(2, vec![section]);

    let html = as_text(&doc, OutputFormat::Html);
    assert!(html.contains("Data unavailable for KVK B"));

    let csv = as_text(&doc, OutputFormat::Csv);
    assert!(csv.contains("Data unavailable,KVK B"));
}

#[test]
fn test_html_escapes_markup_in_cells() {
    let doc = document(
        1,
        vec![table_section(vec![row(
            kvk(1),
            "KVK A",
            None,
            &["<script>alert(1)</script>", "A & B"],
        )])],
    );

    let html = as_text(&doc, OutputFormat::Html);
    assert!(!html.contains("<script>"));
    assert!(html.contains("&lt;script&gt;"));
    assert!(html.contains("A &amp; B"));
}

#[test]
fn test_csv_quotes_cells_with_commas_and_quotes() {
    let doc = document(
        1,
        vec![table_section(vec![row(
            kvk(1),
            "KVK A",
            None,
            &["Sharma, A.", "the \"senior\" SMS"],
        )])],
    );

    let csv = as_text(&doc, OutputFormat::Csv);
    assert!(csv.contains("\"Sharma, A.\""));
    assert!(csv.contains("\"the \"\"senior\"\" SMS\""));
}

#[test]
fn test_output_format_metadata() {
    assert_eq!(OutputFormat::Html.content_type(), "text/html; charset=utf-8");
    assert_eq!(OutputFormat::Csv.extension(), "csv");
    assert_eq!("html".parse::<OutputFormat>().unwrap(), OutputFormat::Html);
    assert!("pdf".parse::<OutputFormat>().is_err());
}
