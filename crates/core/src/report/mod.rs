//! End-to-end report generation.
//!
//! Pipeline: validate section ids against the catalog, compute the
//! caller's authorized scope, expand the requested scope to a KVK set,
//! aggregate every section across that set, assemble the document.
//! Validation and authorization failures abort before any fetch; per-KVK
//! fetch failures never abort and are carried in the document instead.

use std::sync::Arc;

use chrono::Utc;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::aggregate::{AggregateError, Aggregator, DEFAULT_MAX_CONCURRENT};
use crate::document::{ReportDocument, ReportMetadata, ScopeSummary};
use crate::fetch::{SectionFetcher, SectionStore};
use crate::filter::RawReportFilter;
use crate::registry::{ConfigError, Registry};
use crate::scope::{CallerContext, HierarchyStore, ScopeError, ScopeRequest, ScopeResolver};


/// Title used when the caller does not supply one.
pub const DEFAULT_TITLE: &str = "KVK Comprehensive Report";

/// Tunables for report generation.
#[derive(Debug, Clone)]
pub struct ReportSettings {
    /// Bound on in-flight section fetches per request.
    pub max_concurrent_fetches: usize,
    /// Reference timezone for calendar-year and timestamp filtering.
    pub timezone: Tz,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT,
            timezone: chrono_tz::Asia::Kolkata,
        }
    }
}

/// A report generation request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Requested scope; empty means the caller's whole authorized scope.
    #[serde(default)]
    pub scope: ScopeRequest,
    /// Requested section ids.
    pub sections: Vec<String>,
    /// Temporal filter.
    #[serde(default)]
    pub filter: RawReportFilter,
    /// Optional document title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Errors that abort report generation with no partial document.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Invalid report configuration (unknown section ids, ...).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Scope resolution failed (out-of-scope request, store failure, ...).
    #[error(transparent)]
    Scope(#[from] ScopeError),

    /// The generation call was cancelled.
    #[error("report generation cancelled")]
    Cancelled,
}

impl From<AggregateError> for ReportError {
    fn from(err: AggregateError) -> Self {
        match err {
            AggregateError::Cancelled => Self::Cancelled,
        }
    }
}

/// Generates assembled report documents.
#[derive(Clone)]
pub struct ReportService {
    resolver: ScopeResolver,
    aggregator: Aggregator,
}

impl ReportService {
    /// Wires the service to its stores.
    #[must_use]
    pub fn new(
        hierarchy: Arc<dyn HierarchyStore>,
        sections: Arc<dyn SectionStore>,
        settings: &ReportSettings,
    ) -> Self {
        let fetcher = SectionFetcher::new(sections, settings.timezone);
        Self {
            resolver: ScopeResolver::new(hierarchy),
            aggregator: Aggregator::new(fetcher, settings.max_concurrent_fetches),
        }
    }

    /// The scope resolver, shared with the scope-option endpoints.
    #[must_use]
    pub const fn resolver(&self) -> &ScopeResolver {
        &self.resolver
    }

    /// Generates a report document.
    ///
    /// A document is always produced once validation and authorization
    /// pass, even if some KVK fetches fail; incompleteness is explicit in
    /// the metadata and the per-section error lists.
    ///
    /// # Errors
    ///
    /// `ReportError::Config` for unknown section ids, `ReportError::Scope`
    /// for unauthorized scope requests, `ReportError::Cancelled` when the
    /// token fires mid-generation.
    pub async fn generate(
        &self,
        caller: &CallerContext,
        request: GenerateRequest,
        cancel: &CancellationToken,
    ) -> Result<ReportDocument, ReportError> {
        let descriptors = Registry::validate(&request.sections)?;

        let authorized = self.resolver.authorized_scope(caller).await?;
        let resolved = self.resolver.expand(&request.scope, &authorized).await?;

        tracing::debug!(
            sections = descriptors.len(),
            kvks = resolved.kvks.len(),
            derived_from = ?resolved.derived_from,
            "generating report"
        );

        let sections = self
            .aggregator
            .aggregate(&resolved.kvks, &descriptors, &request.filter, cancel)
            .await?;

        let failed_kvk_count = {
            let mut failed: Vec<_> = sections
                .iter()
                .flat_map(|s| s.per_kvk_errors.iter().map(|e| e.kvk_id))
                .collect();
            failed.sort_unstable();
            failed.dedup();
            failed.len()
        };

        Ok(ReportDocument {
            metadata: ReportMetadata {
                title: request.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
                generated_at: Utc::now(),
                generated_by: caller.name.clone(),
                scope: ScopeSummary {
                    requested_levels: resolved.requested_levels.clone(),
                    derived_from: resolved.derived_from,
                    kvk_count: resolved.kvks.len(),
                    failed_kvk_count,
                },
            },
            sections,
        })
    }
}
