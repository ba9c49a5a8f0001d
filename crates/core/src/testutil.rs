//! Shared fixtures for unit tests: a small deterministic hierarchy and a
//! programmable section store.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal_macros::dec;
use uuid::Uuid;

use kendra_shared::types::{DistrictId, KvkId, OrgId, StateId, UserId, ZoneId};

use crate::fetch::SectionStore;
use crate::records::{
    Achievement, BankAccount, Building, DataSource, Employee, Equipment, KvkProfile, LandRecord,
    SectionRecord, Training, Vehicle,
};
use crate::scope::{CallerContext, HierarchyStore, NamedNode, Role};
use crate::store::StoreError;

/// Well-known ids of the test hierarchy.
#[derive(Debug, Clone, Copy)]
pub struct TreeIds {
    pub z_north: ZoneId,
    pub z_east: ZoneId,
    pub z_empty: ZoneId,
    pub s_punjab: StateId,
    pub s_odisha: StateId,
    pub d_ludhiana: DistrictId,
    pub d_moga: DistrictId,
    pub d_puri: DistrictId,
    pub o_pau: OrgId,
    pub o_icar: OrgId,
    pub o_ouat: OrgId,
    pub k_ludhiana: KvkId,
    pub k_samrala: KvkId,
    pub k_moga: KvkId,
    pub k_puri: KvkId,
}

fn zid(n: u128) -> ZoneId {
    ZoneId::from_uuid(Uuid::from_u128(n))
}

/// In-memory hierarchy tree implementing [`HierarchyStore`].
#[derive(Debug, Clone, Default)]
pub struct TreeHierarchy {
    zones: Vec<(ZoneId, String)>,
    states: Vec<(StateId, ZoneId, String)>,
    districts: Vec<(DistrictId, StateId, String)>,
    orgs: Vec<(OrgId, DistrictId, String)>,
    kvks: Vec<(KvkId, OrgId, String)>,
}

/// Builds the standard test tree:
///
/// ```text
/// North Zone > Punjab  > Ludhiana > PAU  > {KVK Ludhiana, KVK Samrala}
///                      > Moga     > ICAR > {KVK Moga}
/// East Zone  > Odisha  > Puri     > OUAT > {KVK Puri}
/// Island Zone (no states at all)
/// ```
pub fn tree() -> (Arc<TreeHierarchy>, TreeIds) {
    let ids = TreeIds {
        z_north: zid(0x10),
        z_east: zid(0x11),
        z_empty: zid(0x19),
        s_punjab: StateId::from_uuid(Uuid::from_u128(0x20)),
        s_odisha: StateId::from_uuid(Uuid::from_u128(0x21)),
        d_ludhiana: DistrictId::from_uuid(Uuid::from_u128(0x30)),
        d_moga: DistrictId::from_uuid(Uuid::from_u128(0x31)),
        d_puri: DistrictId::from_uuid(Uuid::from_u128(0x32)),
        o_pau: OrgId::from_uuid(Uuid::from_u128(0x40)),
        o_icar: OrgId::from_uuid(Uuid::from_u128(0x41)),
        o_ouat: OrgId::from_uuid(Uuid::from_u128(0x42)),
        k_ludhiana: KvkId::from_uuid(Uuid::from_u128(0x50)),
        k_samrala: KvkId::from_uuid(Uuid::from_u128(0x51)),
        k_moga: KvkId::from_uuid(Uuid::from_u128(0x52)),
        k_puri: KvkId::from_uuid(Uuid::from_u128(0x53)),
    };

    let hierarchy = TreeHierarchy {
        zones: vec![
            (ids.z_north, "North Zone".into()),
            (ids.z_east, "East Zone".into()),
            (ids.z_empty, "Island Zone".into()),
        ],
        states: vec![
            (ids.s_punjab, ids.z_north, "Punjab".into()),
            (ids.s_odisha, ids.z_east, "Odisha".into()),
        ],
        districts: vec![
            (ids.d_ludhiana, ids.s_punjab, "Ludhiana".into()),
            (ids.d_moga, ids.s_punjab, "Moga".into()),
            (ids.d_puri, ids.s_odisha, "Puri".into()),
        ],
        orgs: vec![
            (ids.o_pau, ids.d_ludhiana, "Punjab Agricultural University".into()),
            (ids.o_icar, ids.d_moga, "ICAR Institute".into()),
            (ids.o_ouat, ids.d_puri, "OUAT".into()),
        ],
        kvks: vec![
            (ids.k_ludhiana, ids.o_pau, "KVK Ludhiana".into()),
            (ids.k_samrala, ids.o_pau, "KVK Samrala".into()),
            (ids.k_moga, ids.o_icar, "KVK Moga".into()),
            (ids.k_puri, ids.o_ouat, "KVK Puri".into()),
        ],
    };

    (Arc::new(hierarchy), ids)
}

fn nodes<Id: Copy>(rows: impl Iterator<Item = (Id, String)>) -> Vec<NamedNode<Id>> {
    let mut out: Vec<NamedNode<Id>> = rows.map(|(id, name)| NamedNode::new(id, name)).collect();
    out.sort_by(|a, b| a.name.cmp(&b.name));
    out
}

#[async_trait]
impl HierarchyStore for TreeHierarchy {
    async fn zones(&self) -> Result<Vec<NamedNode<ZoneId>>, StoreError> {
        Ok(nodes(self.zones.iter().cloned()))
    }

    async fn zones_by_ids(&self, ids: &[ZoneId]) -> Result<Vec<NamedNode<ZoneId>>, StoreError> {
        Ok(nodes(
            self.zones
                .iter()
                .filter(|(id, _)| ids.contains(id))
                .cloned(),
        ))
    }

    async fn states_in(&self, zones: &[ZoneId]) -> Result<Vec<NamedNode<StateId>>, StoreError> {
        Ok(nodes(
            self.states
                .iter()
                .filter(|(_, zone, _)| zones.contains(zone))
                .map(|(id, _, name)| (*id, name.clone())),
        ))
    }

    async fn states_by_ids(&self, ids: &[StateId]) -> Result<Vec<NamedNode<StateId>>, StoreError> {
        Ok(nodes(
            self.states
                .iter()
                .filter(|(id, _, _)| ids.contains(id))
                .map(|(id, _, name)| (*id, name.clone())),
        ))
    }

    async fn districts_in(
        &self,
        states: &[StateId],
    ) -> Result<Vec<NamedNode<DistrictId>>, StoreError> {
        Ok(nodes(
            self.districts
                .iter()
                .filter(|(_, state, _)| states.contains(state))
                .map(|(id, _, name)| (*id, name.clone())),
        ))
    }

    async fn districts_by_ids(
        &self,
        ids: &[DistrictId],
    ) -> Result<Vec<NamedNode<DistrictId>>, StoreError> {
        Ok(nodes(
            self.districts
                .iter()
                .filter(|(id, _, _)| ids.contains(id))
                .map(|(id, _, name)| (*id, name.clone())),
        ))
    }

    async fn orgs_in(
        &self,
        districts: &[DistrictId],
    ) -> Result<Vec<NamedNode<OrgId>>, StoreError> {
        Ok(nodes(
            self.orgs
                .iter()
                .filter(|(_, district, _)| districts.contains(district))
                .map(|(id, _, name)| (*id, name.clone())),
        ))
    }

    async fn orgs_by_ids(&self, ids: &[OrgId]) -> Result<Vec<NamedNode<OrgId>>, StoreError> {
        Ok(nodes(
            self.orgs
                .iter()
                .filter(|(id, _, _)| ids.contains(id))
                .map(|(id, _, name)| (*id, name.clone())),
        ))
    }

    async fn kvks_in(&self, orgs: &[OrgId]) -> Result<Vec<NamedNode<KvkId>>, StoreError> {
        Ok(nodes(
            self.kvks
                .iter()
                .filter(|(_, org, _)| orgs.contains(org))
                .map(|(id, _, name)| (*id, name.clone())),
        ))
    }

    async fn kvks_by_ids(&self, ids: &[KvkId]) -> Result<Vec<NamedNode<KvkId>>, StoreError> {
        Ok(nodes(
            self.kvks
                .iter()
                .filter(|(id, _, _)| ids.contains(id))
                .map(|(id, _, name)| (*id, name.clone())),
        ))
    }
}

/// Programmable in-memory section store.
#[derive(Debug, Clone, Default)]
pub struct StubSectionStore {
    records: HashMap<(KvkId, DataSource), Vec<SectionRecord>>,
    failing: HashSet<KvkId>,
    delays: HashMap<KvkId, u64>,
}

impl StubSectionStore {
    /// Registers records for one KVK and source.
    #[must_use]
    pub fn with_records(
        mut self,
        kvk: KvkId,
        source: DataSource,
        records: Vec<SectionRecord>,
    ) -> Self {
        self.records.insert((kvk, source), records);
        self
    }

    /// Makes every fetch for the given KVK fail.
    #[must_use]
    pub fn with_failure(mut self, kvk: KvkId) -> Self {
        self.failing.insert(kvk);
        self
    }

    /// Delays fetches for the given KVK (to exercise completion-order
    /// independence).
    #[must_use]
    pub fn with_delay_ms(mut self, kvk: KvkId, millis: u64) -> Self {
        self.delays.insert(kvk, millis);
        self
    }
}

#[async_trait]
impl SectionStore for StubSectionStore {
    async fn fetch(
        &self,
        kvk: KvkId,
        source: DataSource,
    ) -> Result<Vec<SectionRecord>, StoreError> {
        if let Some(&millis) = self.delays.get(&kvk) {
            tokio::time::sleep(Duration::from_millis(millis)).await;
        }
        if self.failing.contains(&kvk) {
            return Err(StoreError::Backend("synthetic store failure".into()));
        }
        Ok(self.records.get(&(kvk, source)).cloned().unwrap_or_default())
    }
}

/// A caller with the given role and home identifiers.
#[must_use]
pub fn caller(role: Role) -> CallerContext {
    CallerContext {
        user_id: UserId::from_uuid(Uuid::from_u128(0x1)),
        name: "Test Caller".into(),
        role,
        home_zone: None,
        home_state: None,
        home_district: None,
        home_org: None,
        home_kvk: None,
    }
}

/// A fully-populated employee record.
#[must_use]
pub fn employee(name: &str, joined: Option<NaiveDate>, born: Option<NaiveDate>) -> SectionRecord {
    SectionRecord::Employee(Employee {
        name: name.into(),
        designation: "Subject Matter Specialist".into(),
        discipline: Some("Agronomy".into()),
        pay_level: Some("Level 10".into()),
        date_of_joining: joined,
        date_of_birth: born,
        is_permanent: true,
    })
}

/// A vehicle purchased in the given year.
#[must_use]
pub fn vehicle(registration: &str, purchase_year: Option<i32>) -> SectionRecord {
    SectionRecord::Vehicle(Vehicle {
        vehicle_type: "Tractor".into(),
        registration_number: registration.into(),
        purchase_year,
        cost: Some(dec!(850000)),
        is_operational: true,
    })
}

/// A bank account record.
#[must_use]
pub fn bank_account(bank: &str) -> SectionRecord {
    SectionRecord::BankAccount(BankAccount {
        bank_name: bank.into(),
        branch: Some("Main Branch".into()),
        account_number: "000111222333".into(),
        ifsc: Some("SBIN0000123".into()),
        account_type: Some("Savings".into()),
        balance: Some(dec!(1234567.50)),
    })
}

/// A land record.
#[must_use]
pub fn land_record(survey_number: &str) -> SectionRecord {
    SectionRecord::LandRecord(LandRecord {
        survey_number: survey_number.into(),
        land_type: "Cultivable".into(),
        area_hectares: Some(dec!(12.5)),
        ownership: Some("Owned".into()),
    })
}

/// A building completed in the given year.
#[must_use]
pub fn building(name: &str, completion_year: Option<i32>) -> SectionRecord {
    SectionRecord::Building(Building {
        name: name.into(),
        building_type: "Administrative Block".into(),
        completion_year,
        plinth_area_sqm: Some(dec!(450)),
        status: Some("In Use".into()),
    })
}

/// An equipment item purchased in the given year.
#[must_use]
pub fn equipment(name: &str, purchase_year: Option<i32>) -> SectionRecord {
    SectionRecord::Equipment(Equipment {
        name: name.into(),
        category: Some("Farm Machinery".into()),
        purchase_year,
        cost: Some(dec!(125000)),
        is_functional: true,
    })
}

/// A training programme starting on the given date.
#[must_use]
pub fn training(title: &str, start: Option<NaiveDate>) -> SectionRecord {
    SectionRecord::Training(Training {
        title: title.into(),
        thematic_area: Some("Integrated Pest Management".into()),
        start_date: start,
        end_date: start.and_then(|d| d.succ_opt()),
        participants: Some(42),
    })
}

/// An achievement recorded at the given instant.
#[must_use]
pub fn achievement(title: &str, recorded_at: Option<chrono::DateTime<chrono::Utc>>) -> SectionRecord {
    SectionRecord::Achievement(Achievement {
        title: title.into(),
        description: Some("Adopted across three districts".into()),
        recorded_at,
    })
}

/// A KVK profile record.
#[must_use]
pub fn profile(kvk: KvkId, name: &str) -> SectionRecord {
    SectionRecord::KvkProfile(KvkProfile {
        kvk_id: kvk,
        name: name.into(),
        org_name: "Punjab Agricultural University".into(),
        district_name: "Ludhiana".into(),
        state_name: "Punjab".into(),
        zone_name: "North Zone".into(),
        establishment_year: Some(1982),
        address: Some("PAU Campus, Ludhiana".into()),
        email: Some("kvk.ludhiana@example.org".into()),
        phone: Some("+91-161-0000000".into()),
    })
}
