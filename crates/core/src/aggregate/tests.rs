use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use kendra_shared::types::KvkId;

use super::{AggregateError, Aggregator};
use crate::fetch::SectionFetcher;
use crate::filter::RawReportFilter;
use crate::records::DataSource;
use crate::registry::Registry;
use crate::scope::NamedNode;
use crate::testutil::{self, StubSectionStore};

const TZ: chrono_tz::Tz = chrono_tz::Asia::Kolkata;

fn kvk_nodes(names: &[&str]) -> Vec<NamedNode<KvkId>> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            NamedNode::new(
                KvkId::from_uuid(uuid::Uuid::from_u128(0x100 + i as u128)),
                (*name).to_string(),
            )
        })
        .collect()
}

fn aggregator(store: StubSectionStore, max_concurrent: usize) -> Aggregator {
    Aggregator::new(SectionFetcher::new(Arc::new(store), TZ), max_concurrent)
}

#[tokio::test]
async fn test_rows_follow_canonical_kvk_order_despite_completion_order() {
    let kvks = kvk_nodes(&["KVK Alpha", "KVK Beta", "KVK Gamma"]);

    // The first KVK completes last; order must still be Alpha, Beta, Gamma.
    let mut store = StubSectionStore::default()
        .with_delay_ms(kvks[0].id, 80)
        .with_delay_ms(kvks[1].id, 40)
        .with_delay_ms(kvks[2].id, 0);
    for kvk in &kvks {
        store = store.with_records(
            kvk.id,
            DataSource::Employees,
            vec![testutil::employee(&format!("{} staff", kvk.name), None, None)],
        );
    }

    let aggregator = aggregator(store, 3);
    let sections = [Registry::get("1.3").expect("section exists")];

    let first = aggregator
        .aggregate(&kvks, &sections, &RawReportFilter::default(), &CancellationToken::new())
        .await
        .expect("aggregates");
    let second = aggregator
        .aggregate(&kvks, &sections, &RawReportFilter::default(), &CancellationToken::new())
        .await
        .expect("aggregates");

    let order: Vec<KvkId> = first[0].rows.iter().map(|r| r.kvk_id).collect();
    assert_eq!(order, vec![kvks[0].id, kvks[1].id, kvks[2].id]);
    assert_eq!(
        order,
        second[0].rows.iter().map(|r| r.kvk_id).collect::<Vec<_>>()
    );
}

#[tokio::test]
async fn test_one_kvk_failure_never_aborts_the_section() {
    let kvks = kvk_nodes(&["KVK Alpha", "KVK Beta", "KVK Gamma"]);

    let store = StubSectionStore::default()
        .with_records(
            kvks[0].id,
            DataSource::Employees,
            vec![testutil::employee("First", None, None)],
        )
        .with_failure(kvks[1].id)
        .with_records(
            kvks[2].id,
            DataSource::Employees,
            vec![testutil::employee("Third", None, None)],
        );

    let aggregator = aggregator(store, 8);
    let sections = [Registry::get("1.3").expect("section exists")];

    let payloads = aggregator
        .aggregate(&kvks, &sections, &RawReportFilter::default(), &CancellationToken::new())
        .await
        .expect("aggregates");

    let payload = &payloads[0];
    assert_eq!(payload.rows.len(), 2);
    assert_eq!(payload.per_kvk_errors.len(), 1);
    assert_eq!(payload.per_kvk_errors[0].kvk_id, kvks[1].id);
    assert_eq!(payload.per_kvk_errors[0].kvk_name, "KVK Beta");
}

#[tokio::test]
async fn test_cancellation_discards_partial_payloads() {
    let kvks = kvk_nodes(&["KVK Alpha"]);
    let store = StubSectionStore::default().with_delay_ms(kvks[0].id, 5_000);
    let aggregator = aggregator(store, 8);
    let sections = [Registry::get("1.3").expect("section exists")];

    let cancel = CancellationToken::new();
    let task = {
        let cancel = cancel.clone();
        let aggregator = aggregator.clone();
        let kvks = kvks.clone();
        tokio::spawn(async move {
            aggregator
                .aggregate(&kvks, &sections, &RawReportFilter::default(), &cancel)
                .await
        })
    };

    cancel.cancel();
    let result = task.await.expect("join");
    assert!(matches!(result, Err(AggregateError::Cancelled)));
}

#[tokio::test]
async fn test_empty_scope_yields_empty_sections_without_errors() {
    let aggregator = aggregator(StubSectionStore::default(), 8);
    let sections = [
        Registry::get("1.3").expect("section exists"),
        Registry::get("2.3").expect("section exists"),
    ];

    let payloads = aggregator
        .aggregate(&[], &sections, &RawReportFilter::default(), &CancellationToken::new())
        .await
        .expect("aggregates");

    assert_eq!(payloads.len(), 2);
    for payload in &payloads {
        assert!(payload.rows.is_empty());
        assert!(payload.per_kvk_errors.is_empty());
    }
}

#[tokio::test]
async fn test_filter_is_normalized_per_section() {
    // One request filter, two sections: employees honor the date range,
    // bank accounts declare no temporal fields and ignore it.
    let kvks = kvk_nodes(&["KVK Alpha"]);
    let date = chrono::NaiveDate::from_ymd_opt(2015, 3, 1);

    let store = StubSectionStore::default()
        .with_records(
            kvks[0].id,
            DataSource::Employees,
            vec![testutil::employee("Old Timer", date, None)],
        )
        .with_records(
            kvks[0].id,
            DataSource::BankAccounts,
            vec![testutil::bank_account("State Bank of India")],
        );

    let aggregator = aggregator(store, 8);
    let sections = [
        Registry::get("1.3").expect("section exists"),
        Registry::get("1.2").expect("section exists"),
    ];
    let filter = RawReportFilter {
        start_date: chrono::NaiveDate::from_ymd_opt(2020, 1, 1),
        end_date: chrono::NaiveDate::from_ymd_opt(2020, 12, 31),
        year: None,
    };

    let payloads = aggregator
        .aggregate(&kvks, &sections, &filter, &CancellationToken::new())
        .await
        .expect("aggregates");

    assert!(payloads[0].rows.is_empty(), "employee joined 2015 filtered out");
    assert_eq!(payloads[1].rows.len(), 1, "bank section ignores the filter");
}

#[tokio::test]
async fn test_grouped_section_rows_carry_group_keys() {
    let kvks = kvk_nodes(&["KVK Alpha"]);
    let store = StubSectionStore::default().with_records(
        kvks[0].id,
        DataSource::Vehicles,
        vec![
            testutil::vehicle("PB-10-1", Some(2018)),
            testutil::vehicle("PB-10-2", None),
        ],
    );

    let aggregator = aggregator(store, 8);
    let sections = [Registry::get("2.3").expect("section exists")];

    let payloads = aggregator
        .aggregate(&kvks, &sections, &RawReportFilter::default(), &CancellationToken::new())
        .await
        .expect("aggregates");

    let payload = &payloads[0];
    assert_eq!(payload.group_label.as_deref(), Some("Year of Purchase"));
    assert_eq!(payload.rows[0].group_key.as_deref(), Some("2018"));
    assert_eq!(payload.rows[1].group_key.as_deref(), Some("Not Recorded"));
}
