//! Multi-KVK aggregation with bounded concurrency.
//!
//! For each requested section the aggregator fans out one fetch per KVK,
//! at most `max_concurrent` in flight, and merges the results in the
//! canonical KVK order of the resolved scope. Completion timing never
//! reaches the output: `buffered` preserves input order. One KVK's
//! failure is recorded and never aborts the section for the rest of the
//! scope.

use futures::StreamExt;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use kendra_shared::types::KvkId;

use crate::document::{self, KvkFetchError, SectionPayload};
use crate::fetch::SectionFetcher;
use crate::filter::{self, RawReportFilter, SectionFilter};
use crate::records::SectionRecord;
use crate::registry::SectionDescriptor;
use crate::scope::NamedNode;
use crate::store::StoreError;

#[cfg(test)]
mod tests;

/// Default bound on in-flight fetches per report request.
pub const DEFAULT_MAX_CONCURRENT: usize = 8;

/// Errors that abort aggregation entirely.
#[derive(Debug, Clone, Error)]
pub enum AggregateError {
    /// The report-generation call was cancelled; partial payloads are
    /// discarded.
    #[error("report generation cancelled")]
    Cancelled,
}

/// Aggregates section payloads across a resolved KVK scope.
#[derive(Clone)]
pub struct Aggregator {
    fetcher: SectionFetcher,
    max_concurrent: usize,
}

impl Aggregator {
    /// Creates an aggregator with the given concurrency bound.
    #[must_use]
    pub fn new(fetcher: SectionFetcher, max_concurrent: usize) -> Self {
        Self {
            fetcher,
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Populates every requested section for every target KVK.
    ///
    /// Rows within a section are grouped by KVK in the same order as the
    /// resolved scope, so repeated calls with identical inputs produce
    /// identical row sequences regardless of fetch completion timing.
    ///
    /// # Errors
    ///
    /// Returns `AggregateError::Cancelled` when the token fires; in-flight
    /// fetches are abandoned and completed payloads are discarded.
    pub async fn aggregate(
        &self,
        kvks: &[NamedNode<KvkId>],
        sections: &[&'static SectionDescriptor],
        raw_filter: &RawReportFilter,
        cancel: &CancellationToken,
    ) -> Result<Vec<SectionPayload>, AggregateError> {
        let work = async {
            let mut payloads = Vec::with_capacity(sections.len());
            for descriptor in sections.iter().copied() {
                payloads.push(self.section_payload(descriptor, kvks, raw_filter).await);
            }
            payloads
        };

        match cancel.run_until_cancelled(work).await {
            Some(payloads) => Ok(payloads),
            None => {
                tracing::info!("aggregation cancelled, discarding partial payloads");
                Err(AggregateError::Cancelled)
            }
        }
    }

    async fn section_payload(
        &self,
        descriptor: &'static SectionDescriptor,
        kvks: &[NamedNode<KvkId>],
        raw_filter: &RawReportFilter,
    ) -> SectionPayload {
        let section_filter = filter::normalize(raw_filter, descriptor);
        let tz = self.fetcher.timezone();

        // `buffered` yields results in input order, so the fetched
        // payloads line up one-to-one with `kvks` and are re-paired by
        // `zip` below. The per-item future deliberately borrows nothing
        // tied to the individual `kvk` (only the copied `kvk.id`), so the
        // mapping closure satisfies the higher-ranked `Fn` bound required
        // when the stream is driven from a `Send` context.
        let fetched: Vec<Result<Vec<SectionRecord>, StoreError>> =
            futures::stream::iter(
                kvks.iter()
                    .map(|kvk| fetch_one(&self.fetcher, kvk.id, descriptor, &section_filter)),
            )
            .buffered(self.max_concurrent)
            .collect()
            .await;

        let mut rows = Vec::new();
        let mut per_kvk_errors = Vec::new();
        let mut warnings = Vec::new();

        for (kvk, fetched) in kvks.iter().zip(fetched) {
            match fetched {
                Ok(records) => {
                    let (mut kvk_rows, mut kvk_warnings) =
                        document::build_rows(kvk, &records, descriptor, tz);
                    rows.append(&mut kvk_rows);
                    warnings.append(&mut kvk_warnings);
                }
                Err(err) => {
                    tracing::warn!(
                        section = descriptor.id,
                        kvk = %kvk.id,
                        error = %err,
                        "section fetch failed for one KVK"
                    );
                    per_kvk_errors.push(KvkFetchError {
                        kvk_id: kvk.id,
                        kvk_name: kvk.name.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        SectionPayload {
            section_id: descriptor.id.to_string(),
            title: descriptor.title.to_string(),
            format: descriptor.format,
            columns: descriptor
                .fields
                .iter()
                .map(|f| f.display_name.to_string())
                .collect(),
            group_label: descriptor.group_by.as_ref().map(|g| g.label.to_string()),
            rows,
            per_kvk_errors,
            warnings,
        }
    }
}

/// Fetches one KVK's records for a section, pairing the result back with
/// the source node so the aggregator can keep scope order.
///
/// Defined as a free `async fn` (rather than an inline `async move`
/// closure body) so the returned future's lifetime is properly tied to
/// its borrowed arguments; an inline closure returning a future that
/// borrows its argument does not satisfy the higher-ranked `Fn`/`Send`
/// bounds required when the stream is driven from a `Send` context.
async fn fetch_one<'a>(
    fetcher: &'a SectionFetcher,
    kvk: &'a NamedNode<KvkId>,
    descriptor: &'static SectionDescriptor,
    section_filter: &'a SectionFilter,
) -> (&'a NamedNode<KvkId>, Result<Vec<SectionRecord>, StoreError>) {
    let fetched = fetcher.fetch(kvk.id, descriptor, section_filter).await;
    (kvk, fetched)
}
