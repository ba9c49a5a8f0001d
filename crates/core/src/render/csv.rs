//! CSV rendering backend.

use std::fmt::Write as _;

use crate::document::{ReportDocument, SectionPayload, SectionRow};
use crate::registry::RenderFormat;

use super::{group_keys, narrative_blocks};

/// Renders the document as CSV, one block per section separated by a
/// blank line.
#[must_use]
pub fn render(document: &ReportDocument) -> String {
    let mut out = String::new();
    let meta = &document.metadata;

    line(&mut out, &[&meta.title]);
    line(
        &mut out,
        &[
            "Generated on",
            &meta.generated_at.format("%d-%m-%Y %H:%M UTC").to_string(),
        ],
    );
    line(&mut out, &["Generated by", &meta.generated_by]);
    line(
        &mut out,
        &["KVKs in scope", &meta.scope.kvk_count.to_string()],
    );

    let multi_kvk = meta.scope.kvk_count > 1;
    for section in &document.sections {
        out.push('\n');
        render_section(&mut out, section, multi_kvk);
    }

    out
}

fn render_section(out: &mut String, section: &SectionPayload, multi_kvk: bool) {
    line(out, &[&section.section_id, &section.title]);

    for error in &section.per_kvk_errors {
        line(
            out,
            &["Data unavailable", &error.kvk_name, &error.reason],
        );
    }
    for warning in &section.warnings {
        line(out, &["Warning", warning]);
    }

    if section.rows.is_empty() {
        line(out, &["No records available."]);
        return;
    }

    match section.format {
        RenderFormat::Narrative => render_narrative(out, section, multi_kvk),
        RenderFormat::Table => render_table(out, section, multi_kvk),
        RenderFormat::GroupedTable => render_grouped(out, section, multi_kvk),
    }
}

fn render_narrative(out: &mut String, section: &SectionPayload, multi_kvk: bool) {
    let (blocks, dropped) = narrative_blocks(section);
    if dropped > 0 {
        line(out, &["Warning", &format!("{dropped} additional record(s) not shown.")]);
    }

    for row in blocks {
        if multi_kvk {
            line(out, &["KVK", &row.kvk_name]);
        }
        for (label, value) in section.columns.iter().zip(&row.cells) {
            line(out, &[label, value]);
        }
    }
}

fn render_table(out: &mut String, section: &SectionPayload, multi_kvk: bool) {
    header(out, &section.columns, multi_kvk);
    for (serial, row) in section.rows.iter().enumerate() {
        data_row(out, serial + 1, row, multi_kvk);
    }
}

fn render_grouped(out: &mut String, section: &SectionPayload, multi_kvk: bool) {
    let label = section.group_label.as_deref().unwrap_or("Group");
    for key in group_keys(section) {
        line(out, &[label, &key]);
        header(out, &section.columns, multi_kvk);
        let mut serial = 0usize;
        for row in section
            .rows
            .iter()
            .filter(|row| row.group_key.as_deref() == Some(key.as_str()))
        {
            serial += 1;
            data_row(out, serial, row, multi_kvk);
        }
    }
}

fn header(out: &mut String, columns: &[String], multi_kvk: bool) {
    let mut cells: Vec<&str> = vec!["S.No"];
    if multi_kvk {
        cells.push("KVK");
    }
    cells.extend(columns.iter().map(String::as_str));
    line(out, &cells);
}

fn data_row(out: &mut String, serial: usize, row: &SectionRow, multi_kvk: bool) {
    let serial = serial.to_string();
    let mut cells: Vec<&str> = vec![&serial];
    if multi_kvk {
        cells.push(&row.kvk_name);
    }
    cells.extend(row.cells.iter().map(String::as_str));
    line(out, &cells);
}

fn line(out: &mut String, cells: &[&str]) {
    let mut first = true;
    for cell in cells {
        if !first {
            out.push(',');
        }
        first = false;
        let _ = write!(out, "{}", escape(cell));
    }
    out.push('\n');
}

/// Quotes a cell when it contains a comma, quote, or newline; embedded
/// quotes are doubled.
fn escape(cell: &str) -> String {
    if cell.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}
