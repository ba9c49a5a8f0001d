//! Per-KVK section data fetching.

use std::sync::Arc;

use async_trait::async_trait;
use chrono_tz::Tz;

use kendra_shared::types::KvkId;

use crate::filter::{self, SectionFilter};
use crate::records::{DataSource, SectionRecord};
use crate::registry::SectionDescriptor;
use crate::store::StoreError;

#[cfg(test)]
mod tests;

/// Read access to section data, one KVK and one source at a time.
///
/// Implementations only scope by KVK; temporal semantics are applied by
/// the fetcher so every section's filter behavior lives in one place.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SectionStore: Send + Sync {
    /// Fetches every record of `source` owned by `kvk`.
    async fn fetch(&self, kvk: KvkId, source: DataSource)
    -> Result<Vec<SectionRecord>, StoreError>;
}

/// Fetches one section for one KVK, applying the normalized filter.
#[derive(Clone)]
pub struct SectionFetcher {
    store: Arc<dyn SectionStore>,
    tz: Tz,
}

impl SectionFetcher {
    /// Creates a fetcher over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn SectionStore>, tz: Tz) -> Self {
        Self { store, tz }
    }

    /// The reference timezone used for timestamp filtering.
    #[must_use]
    pub const fn timezone(&self) -> Tz {
        self.tz
    }

    /// Retrieves the records for one section of one KVK, filtered by the
    /// section's declared temporal semantics.
    ///
    /// # Errors
    ///
    /// Propagates store failures; the aggregator records them per KVK
    /// without aborting the section.
    pub async fn fetch(
        &self,
        kvk: KvkId,
        descriptor: &SectionDescriptor,
        filter: &SectionFilter,
    ) -> Result<Vec<SectionRecord>, StoreError> {
        let mut records = self.store.fetch(kvk, descriptor.source).await?;
        records.retain(|record| filter::matches(record, descriptor, filter, self.tz));
        Ok(records)
    }
}
