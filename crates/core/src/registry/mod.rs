//! Declarative catalog of report sections.
//!
//! The registry is static configuration: every section a report can carry
//! is described once, with its data source, render format, field list, and
//! filterable temporal fields. Validation, fetching, and rendering all read
//! the same descriptor, so the three can never drift apart.

pub mod catalog;
pub mod descriptor;
pub mod error;

#[cfg(test)]
mod tests;

pub use catalog::Registry;
pub use descriptor::{
    FieldSpec, FieldValue, GroupSpec, RenderFormat, SectionConfig, SectionDescriptor,
    TemporalFields, TemporalSpec, TemporalValue, ValueType,
};
pub use error::ConfigError;
