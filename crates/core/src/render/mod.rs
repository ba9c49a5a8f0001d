//! Document rendering.
//!
//! Rendering is a pure function from an assembled document to bytes; the
//! JSON wire format is the document itself, so only HTML and CSV live
//! here. Both backends are deterministic for a given document: section
//! order follows the request, rows follow canonical KVK order, and
//! grouped tables sort their groups by key.

use std::collections::BTreeSet;
use std::str::FromStr;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::document::{ReportDocument, SectionPayload, SectionRow};

mod csv;
mod html;

#[cfg(test)]
mod tests;

/// Supported render output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Self-contained HTML document (print-ready).
    Html,
    /// RFC 4180-style CSV.
    Csv,
}

impl OutputFormat {
    /// The MIME type of the rendered bytes.
    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Html => "text/html; charset=utf-8",
            Self::Csv => "text/csv; charset=utf-8",
        }
    }

    /// File extension for download names.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Csv => "csv",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "html" => Ok(Self::Html),
            "csv" => Ok(Self::Csv),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}

/// Renders a document to bytes in the requested format.
#[must_use]
pub fn render(document: &ReportDocument, format: OutputFormat) -> Bytes {
    let text = match format {
        OutputFormat::Html => html::render(document),
        OutputFormat::Csv => csv::render(document),
    };
    Bytes::from(text)
}

/// Selects the narrative rows of a section: the first row per KVK, in
/// canonical order. Returns the kept rows and the count of extra rows
/// that were dropped (each dropped row earns a rendered warning).
fn narrative_blocks(payload: &SectionPayload) -> (Vec<&SectionRow>, usize) {
    let mut seen = BTreeSet::new();
    let mut blocks = Vec::new();
    let mut dropped = 0usize;

    for row in &payload.rows {
        if seen.insert(row.kvk_id) {
            blocks.push(row);
        } else {
            dropped += 1;
        }
    }

    if dropped > 0 {
        tracing::warn!(
            section = payload.section_id.as_str(),
            dropped,
            "narrative section received more than one row per KVK"
        );
    }

    (blocks, dropped)
}

/// Sorted group keys of a grouped-table section, ascending.
fn group_keys(payload: &SectionPayload) -> Vec<String> {
    let keys: BTreeSet<String> = payload
        .rows
        .iter()
        .filter_map(|row| row.group_key.clone())
        .collect();
    keys.into_iter().collect()
}
