use std::sync::Arc;

use chrono::NaiveDate;
use mockall::predicate::eq;

use kendra_shared::types::KvkId;

use super::{MockSectionStore, SectionFetcher};
use crate::filter::SectionFilter;
use crate::records::DataSource;
use crate::registry::Registry;
use crate::store::StoreError;
use crate::testutil;

const TZ: chrono_tz::Tz = chrono_tz::Asia::Kolkata;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

#[tokio::test]
async fn test_fetch_applies_date_filter() {
    let kvk = KvkId::new();
    let records = vec![
        testutil::employee("In Range", Some(date(2020, 6, 1)), None),
        testutil::employee("Out of Range", Some(date(2017, 2, 1)), None),
    ];

    let mut store = MockSectionStore::new();
    store
        .expect_fetch()
        .with(eq(kvk), eq(DataSource::Employees))
        .return_once(move |_, _| Ok(records));

    let fetcher = SectionFetcher::new(Arc::new(store), TZ);
    let employees = Registry::get("1.3").expect("section exists");
    let filter = SectionFilter::DateRange {
        start: date(2020, 1, 1),
        end: date(2020, 12, 31),
    };

    let fetched = fetcher.fetch(kvk, employees, &filter).await.expect("fetch ok");
    assert_eq!(fetched.len(), 1);
}

#[tokio::test]
async fn test_fetch_without_filter_returns_everything() {
    let kvk = KvkId::new();
    let records = vec![
        testutil::employee("A", None, None),
        testutil::employee("B", Some(date(2011, 1, 1)), None),
    ];

    let mut store = MockSectionStore::new();
    store
        .expect_fetch()
        .return_once(move |_, _| Ok(records));

    let fetcher = SectionFetcher::new(Arc::new(store), TZ);
    let employees = Registry::get("1.3").expect("section exists");

    let fetched = fetcher
        .fetch(kvk, employees, &SectionFilter::None)
        .await
        .expect("fetch ok");
    assert_eq!(fetched.len(), 2);
}

#[tokio::test]
async fn test_fetch_propagates_store_errors() {
    let kvk = KvkId::new();

    let mut store = MockSectionStore::new();
    store
        .expect_fetch()
        .return_once(move |id, _| Err(StoreError::KvkNotFound(id)));

    let fetcher = SectionFetcher::new(Arc::new(store), TZ);
    let employees = Registry::get("1.3").expect("section exists");

    let err = fetcher
        .fetch(kvk, employees, &SectionFilter::None)
        .await
        .expect_err("fetch fails");
    assert!(matches!(err, StoreError::KvkNotFound(id) if id == kvk));
}
