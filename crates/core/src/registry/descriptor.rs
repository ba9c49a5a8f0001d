//! Section descriptor types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::records::{DataSource, SectionRecord};

/// How a section is laid out when rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderFormat {
    /// One key-value block built from a single record.
    Narrative,
    /// One row per record with a serial-number column.
    Table,
    /// A table partitioned by a grouping key with a sub-header per group.
    GroupedTable,
}

/// Declared type of a section field's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// Free text.
    Text,
    /// Whole number.
    Integer,
    /// Decimal quantity (areas, counts with fractions).
    Decimal,
    /// Monetary amount, rendered with Indian digit grouping.
    Currency,
    /// Civil date.
    Date,
    /// Instant in time.
    Timestamp,
    /// Yes/No flag.
    Boolean,
}

/// A value extracted from a section record, before formatting.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Text value.
    Text(String),
    /// Integer value.
    Integer(i64),
    /// Decimal value.
    Decimal(Decimal),
    /// Date value.
    Date(NaiveDate),
    /// Timestamp value.
    Timestamp(DateTime<Utc>),
    /// Boolean value.
    Boolean(bool),
    /// The field is absent on this record.
    Null,
}

impl FieldValue {
    /// Returns true if the field is absent.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// A temporal value used for filter matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemporalValue {
    /// A civil date (compared against date-range bounds directly).
    Date(NaiveDate),
    /// A bare calendar year (compared by equality).
    Year(i32),
    /// An instant (compared against bounds in the reference timezone).
    Timestamp(DateTime<Utc>),
}

/// Extraction function bound to a section field at catalog construction.
pub type ExtractFn = fn(&SectionRecord) -> FieldValue;

/// Temporal accessor bound to a filterable field at catalog construction.
pub type TemporalFn = fn(&SectionRecord) -> Option<TemporalValue>;

/// One displayed field of a section.
#[derive(Clone)]
pub struct FieldSpec {
    /// Source field name (for configuration display and diagnostics).
    pub source_field: &'static str,
    /// Column or label text.
    pub display_name: &'static str,
    /// Declared value type.
    pub value_type: ValueType,
    /// Whether the field may legitimately be absent.
    pub optional: bool,
    /// Typed accessor replacing dotted-path lookups.
    pub extract: ExtractFn,
}

impl std::fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldSpec")
            .field("source_field", &self.source_field)
            .field("display_name", &self.display_name)
            .field("value_type", &self.value_type)
            .field("optional", &self.optional)
            .finish_non_exhaustive()
    }
}

/// One filterable temporal field of a section.
#[derive(Clone)]
pub struct TemporalSpec {
    /// Source field name.
    pub source_field: &'static str,
    /// Typed accessor for the temporal value.
    pub get: TemporalFn,
}

impl std::fmt::Debug for TemporalSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemporalSpec")
            .field("source_field", &self.source_field)
            .finish_non_exhaustive()
    }
}

/// The declared filterable fields of a section.
///
/// A section with both lists empty ignores any supplied filter.
#[derive(Debug, Clone)]
pub struct TemporalFields {
    /// Fields filterable by date range (dates or timestamps).
    pub date_fields: &'static [TemporalSpec],
    /// Fields filterable by calendar year.
    pub year_fields: &'static [TemporalSpec],
}

impl TemporalFields {
    /// A section that accepts no temporal filter at all.
    pub const NONE: Self = Self {
        date_fields: &[],
        year_fields: &[],
    };

    /// Returns true if the section declares no filterable fields.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.date_fields.is_empty() && self.year_fields.is_empty()
    }
}

/// Grouping key declared on grouped-table sections.
#[derive(Clone)]
pub struct GroupSpec {
    /// Source field the group key is taken from.
    pub source_field: &'static str,
    /// Sub-header label prefix (e.g. "Year").
    pub label: &'static str,
    /// Computes the group key for a record.
    pub key: fn(&SectionRecord) -> String,
}

impl std::fmt::Debug for GroupSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupSpec")
            .field("source_field", &self.source_field)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Immutable description of one report section.
#[derive(Debug, Clone)]
pub struct SectionDescriptor {
    /// Dotted hierarchical id (e.g. "1.3").
    pub id: &'static str,
    /// Section title.
    pub title: &'static str,
    /// Logical data source.
    pub source: DataSource,
    /// Render format.
    pub format: RenderFormat,
    /// Displayed fields, in order.
    pub fields: &'static [FieldSpec],
    /// Declared filterable temporal fields.
    pub temporal: TemporalFields,
    /// Grouping key; present iff `format` is `GroupedTable`.
    pub group_by: Option<GroupSpec>,
}

impl SectionDescriptor {
    /// Builds the serializable configuration view of this section.
    #[must_use]
    pub fn config(&self) -> SectionConfig {
        SectionConfig {
            id: self.id.to_string(),
            title: self.title.to_string(),
            source: self.source,
            format: self.format,
            fields: self
                .fields
                .iter()
                .map(|f| FieldConfig {
                    source_field: f.source_field.to_string(),
                    display_name: f.display_name.to_string(),
                    value_type: f.value_type,
                    optional: f.optional,
                })
                .collect(),
            date_fields: self
                .temporal
                .date_fields
                .iter()
                .map(|t| t.source_field.to_string())
                .collect(),
            year_fields: self
                .temporal
                .year_fields
                .iter()
                .map(|t| t.source_field.to_string())
                .collect(),
        }
    }
}

/// Serializable view of a section descriptor for the config endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionConfig {
    /// Dotted hierarchical id.
    pub id: String,
    /// Section title.
    pub title: String,
    /// Logical data source.
    pub source: DataSource,
    /// Render format.
    pub format: RenderFormat,
    /// Displayed fields.
    pub fields: Vec<FieldConfig>,
    /// Date-filterable field names.
    pub date_fields: Vec<String>,
    /// Year-filterable field names.
    pub year_fields: Vec<String>,
}

/// Serializable view of one section field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Source field name.
    pub source_field: String,
    /// Column or label text.
    pub display_name: String,
    /// Declared value type.
    pub value_type: ValueType,
    /// Whether the field may be absent.
    pub optional: bool,
}
