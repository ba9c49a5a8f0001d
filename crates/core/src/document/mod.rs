//! Assembled report documents.
//!
//! The document is the single artifact handed to the renderer: metadata
//! plus one payload per requested section, rows already formatted to
//! display scalars. Constructed fresh per request, immutable afterwards.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use kendra_shared::types::KvkId;

use crate::records::SectionRecord;
use crate::registry::{FieldValue, RenderFormat, SectionDescriptor, ValueType};
use crate::scope::{NamedNode, ScopeLevel};

#[cfg(test)]
mod tests;

/// Placeholder shown for absent optional values.
pub const MISSING_VALUE: &str = "-";

/// One formatted row of a section, tagged by its originating KVK.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRow {
    /// The KVK this row belongs to.
    pub kvk_id: KvkId,
    /// The KVK's display name.
    pub kvk_name: String,
    /// Grouping key, for grouped-table sections.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_key: Option<String>,
    /// Formatted cell values, aligned with the section's field order.
    pub cells: Vec<String>,
}

/// A recoverable per-KVK fetch failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KvkFetchError {
    /// The KVK whose fetch failed.
    pub kvk_id: KvkId,
    /// The KVK's display name.
    pub kvk_name: String,
    /// Human-readable failure reason.
    pub reason: String,
}

/// One populated report section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionPayload {
    /// Section id from the catalog.
    pub section_id: String,
    /// Section title.
    pub title: String,
    /// Render format.
    pub format: RenderFormat,
    /// Column headers, in declared field order.
    pub columns: Vec<String>,
    /// Sub-header label for grouped tables (e.g. "Year of Purchase").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_label: Option<String>,
    /// Merged rows, in canonical KVK order.
    pub rows: Vec<SectionRow>,
    /// Fetch failures, one per failed KVK. Never aborts the section.
    pub per_kvk_errors: Vec<KvkFetchError>,
    /// Data-integrity warnings (e.g. missing required fields).
    pub warnings: Vec<String>,
}

/// Summary of how the report's scope was derived.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScopeSummary {
    /// Every hierarchy level the caller populated in the request.
    pub requested_levels: Vec<ScopeLevel>,
    /// The level the KVK set was actually derived from.
    pub derived_from: Option<ScopeLevel>,
    /// Number of KVKs in the resolved scope.
    pub kvk_count: usize,
    /// Number of KVKs with at least one failed section fetch.
    pub failed_kvk_count: usize,
}

/// Report metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Document title.
    pub title: String,
    /// Generation instant.
    pub generated_at: DateTime<Utc>,
    /// Display name of the caller who generated the report.
    pub generated_by: String,
    /// Scope derivation summary.
    pub scope: ScopeSummary,
}

/// The assembled report document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportDocument {
    /// Metadata block.
    pub metadata: ReportMetadata,
    /// Populated sections, in request order.
    pub sections: Vec<SectionPayload>,
}

/// Formats an extracted field value for display.
///
/// Dates render `DD-MM-YYYY`; timestamps render in the reference
/// timezone; booleans render Yes/No; currency uses Indian digit grouping;
/// absent values render as [`MISSING_VALUE`].
#[must_use]
pub fn format_value(value: &FieldValue, value_type: ValueType, tz: Tz) -> String {
    match value {
        FieldValue::Text(s) => s.clone(),
        FieldValue::Integer(i) => i.to_string(),
        FieldValue::Decimal(d) => match value_type {
            ValueType::Currency => format_currency(*d),
            _ => d.normalize().to_string(),
        },
        FieldValue::Date(d) => d.format("%d-%m-%Y").to_string(),
        FieldValue::Timestamp(t) => t.with_timezone(&tz).format("%d-%m-%Y %H:%M").to_string(),
        FieldValue::Boolean(b) => if *b { "Yes" } else { "No" }.to_string(),
        FieldValue::Null => MISSING_VALUE.to_string(),
    }
}

/// Formats a monetary amount with Indian digit grouping
/// (e.g. `12,34,567.00`).
#[must_use]
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let text = format!("{rounded:.2}");
    let (sign, unsigned) = text
        .strip_prefix('-')
        .map_or(("", text.as_str()), |rest| ("-", rest));
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, "00"));

    let grouped = group_indian(int_part);
    format!("{sign}{grouped}.{frac_part}")
}

/// Groups integer digits per the Indian numbering system: the last three
/// digits stand alone, every pair before them is comma-separated.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut parts = Vec::new();
    let mut index = head.len();
    while index > 2 {
        parts.push(&head[index - 2..index]);
        index -= 2;
    }
    parts.push(&head[..index]);
    parts.reverse();
    format!("{},{}", parts.join(","), tail)
}

/// Builds formatted rows for one KVK's records of one section.
///
/// A missing optional field renders as the placeholder; a missing
/// required field additionally produces a data-integrity warning but the
/// row is kept.
#[must_use]
pub fn build_rows(
    kvk: &NamedNode<KvkId>,
    records: &[SectionRecord],
    descriptor: &SectionDescriptor,
    tz: Tz,
) -> (Vec<SectionRow>, Vec<String>) {
    let mut rows = Vec::with_capacity(records.len());
    let mut warnings = Vec::new();

    for record in records {
        let mut cells = Vec::with_capacity(descriptor.fields.len());
        for field in descriptor.fields {
            let value = (field.extract)(record);
            if value.is_null() && !field.optional {
                tracing::warn!(
                    section = descriptor.id,
                    kvk = %kvk.id,
                    field = field.source_field,
                    "record is missing a required field"
                );
                warnings.push(format!(
                    "{}: record from {} is missing required field '{}'",
                    descriptor.id, kvk.name, field.source_field
                ));
            }
            cells.push(format_value(&value, field.value_type, tz));
        }

        rows.push(SectionRow {
            kvk_id: kvk.id,
            kvk_name: kvk.name.clone(),
            group_key: descriptor.group_by.as_ref().map(|g| (g.key)(record)),
            cells,
        });
    }

    (rows, warnings)
}
