//! HTML rendering backend.

use std::fmt::Write as _;

use crate::document::{ReportDocument, SectionPayload};
use crate::registry::RenderFormat;

use super::{group_keys, narrative_blocks};

const STYLE: &str = "\
body{font-family:serif;margin:2em}\
h1{text-align:center}\
h2{border-bottom:1px solid #333;padding-bottom:2px}\
table{border-collapse:collapse;width:100%;margin:0.5em 0}\
th,td{border:1px solid #666;padding:4px 8px;text-align:left}\
th{background:#eee}\
.meta{color:#444;text-align:center}\
.empty{font-style:italic;color:#666}\
.warning{color:#8a6d00}\
.error{color:#8a1f11}";

/// Renders the document as a self-contained HTML page.
#[must_use]
pub fn render(document: &ReportDocument) -> String {
    let mut out = String::new();
    let meta = &document.metadata;

    let _ = write!(
        out,
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{}</title><style>{STYLE}</style></head><body>",
        escape(&meta.title)
    );
    let _ = write!(out, "<h1>{}</h1>", escape(&meta.title));
    let _ = write!(
        out,
        "<p class=\"meta\">Generated on {} by {} &middot; {} KVK(s) in scope",
        meta.generated_at.format("%d-%m-%Y %H:%M UTC"),
        escape(&meta.generated_by),
        meta.scope.kvk_count
    );
    if meta.scope.failed_kvk_count > 0 {
        let included = meta.scope.kvk_count - meta.scope.failed_kvk_count;
        let _ = write!(
            out,
            " &middot; {included} of {} KVK(s) fully included",
            meta.scope.kvk_count
        );
    }
    out.push_str("</p>");

    let multi_kvk = meta.scope.kvk_count > 1;
    for section in &document.sections {
        render_section(&mut out, section, multi_kvk);
    }

    out.push_str("</body></html>");
    out
}

fn render_section(out: &mut String, section: &SectionPayload, multi_kvk: bool) {
    let _ = write!(
        out,
        "<h2>{} {}</h2>",
        escape(&section.section_id),
        escape(&section.title)
    );

    for error in &section.per_kvk_errors {
        let _ = write!(
            out,
            "<p class=\"error\">Data unavailable for {}: {}</p>",
            escape(&error.kvk_name),
            escape(&error.reason)
        );
    }
    for warning in &section.warnings {
        let _ = write!(out, "<p class=\"warning\">{}</p>", escape(warning));
    }

    if section.rows.is_empty() {
        out.push_str("<p class=\"empty\">No records available.</p>");
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
        let _ = write!(
            out,
            "<p class=\"warning\">{dropped} additional record(s) not shown.</p>"
        );
    }

    for row in blocks {
        if multi_kvk {
            let _ = write!(out, "<h3>{}</h3>", escape(&row.kvk_name));
        }
        out.push_str("<table class=\"narrative\">");
        for (label, value) in section.columns.iter().zip(&row.cells) {
            let _ = write!(
                out,
                "<tr><th>{}</th><td>{}</td></tr>",
                escape(label),
                escape(value)
            );
        }
        out.push_str("</table>");
    }
}

fn render_table(out: &mut String, section: &SectionPayload, multi_kvk: bool) {
    table_open(out, &section.columns, multi_kvk);
    for (serial, row) in section.rows.iter().enumerate() {
        table_row(out, serial + 1, row, multi_kvk);
    }
    out.push_str("</tbody></table>");
}

fn render_grouped(out: &mut String, section: &SectionPayload, multi_kvk: bool) {
    let label = section.group_label.as_deref().unwrap_or("Group");
    for key in group_keys(section) {
        let _ = write!(out, "<h3>{}: {}</h3>", escape(label), escape(&key));
        table_open(out, &section.columns, multi_kvk);
        let mut serial = 0usize;
        for row in section
            .rows
            .iter()
            .filter(|row| row.group_key.as_deref() == Some(key.as_str()))
        {
            serial += 1;
            table_row(out, serial, row, multi_kvk);
        }
        out.push_str("</tbody></table>");
    }
}

fn table_open(out: &mut String, columns: &[String], multi_kvk: bool) {
    out.push_str("<table><thead><tr><th>S.No</th>");
    if multi_kvk {
        out.push_str("<th>KVK</th>");
    }
    for column in columns {
        let _ = write!(out, "<th>{}</th>", escape(column));
    }
    out.push_str("</tr></thead><tbody>");
}

fn table_row(out: &mut String, serial: usize, row: &crate::document::SectionRow, multi_kvk: bool) {
    let _ = write!(out, "<tr><td>{serial}</td>");
    if multi_kvk {
        let _ = write!(out, "<td>{}</td>", escape(&row.kvk_name));
    }
    for cell in &row.cells {
        let _ = write!(out, "<td>{}</td>", escape(cell));
    }
    out.push_str("</tr>");
}

/// Escapes text for HTML element content and attribute values.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
