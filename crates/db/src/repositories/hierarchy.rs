//! Hierarchy repository backing the scope resolver.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use kendra_core::scope::{HierarchyStore, NamedNode};
use kendra_core::store::StoreError;
use kendra_shared::types::{DistrictId, KvkId, OrgId, StateId, ZoneId};

use super::backend;
use crate::entities::{districts, kvks, organizations, states, zones};

/// Read access to the zone → state → district → organization → KVK tree.
///
/// Every query orders by (name, id) so that repeated scope resolutions
/// produce identical node orderings.
#[derive(Debug, Clone)]
pub struct HierarchyRepository {
    db: DatabaseConnection,
}

impl HierarchyRepository {
    /// Creates a new hierarchy repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn uuids<Id: Copy + Into<Uuid>>(ids: &[Id]) -> Vec<Uuid> {
    ids.iter().map(|id| (*id).into()).collect()
}

#[async_trait]
impl HierarchyStore for HierarchyRepository {
    async fn zones(&self) -> Result<Vec<NamedNode<ZoneId>>, StoreError> {
        let rows = zones::Entity::find()
            .order_by_asc(zones::Column::Name)
            .order_by_asc(zones::Column::Id)
            .all(&self.db)
            .await
            .map_err(backend)?;
        Ok(rows
            .into_iter()
            .map(|z| NamedNode::new(ZoneId::from_uuid(z.id), z.name))
            .collect())
    }

    async fn zones_by_ids(&self, ids: &[ZoneId]) -> Result<Vec<NamedNode<ZoneId>>, StoreError> {
        let rows = zones::Entity::find()
            .filter(zones::Column::Id.is_in(uuids(ids)))
            .order_by_asc(zones::Column::Name)
            .order_by_asc(zones::Column::Id)
            .all(&self.db)
            .await
            .map_err(backend)?;
        Ok(rows
            .into_iter()
            .map(|z| NamedNode::new(ZoneId::from_uuid(z.id), z.name))
            .collect())
    }

    async fn states_in(&self, zone_ids: &[ZoneId]) -> Result<Vec<NamedNode<StateId>>, StoreError> {
        let rows = states::Entity::find()
            .filter(states::Column::ZoneId.is_in(uuids(zone_ids)))
            .order_by_asc(states::Column::Name)
            .order_by_asc(states::Column::Id)
            .all(&self.db)
            .await
            .map_err(backend)?;
        Ok(rows
            .into_iter()
            .map(|s| NamedNode::new(StateId::from_uuid(s.id), s.name))
            .collect())
    }

    async fn states_by_ids(&self, ids: &[StateId]) -> Result<Vec<NamedNode<StateId>>, StoreError> {
        let rows = states::Entity::find()
            .filter(states::Column::Id.is_in(uuids(ids)))
            .order_by_asc(states::Column::Name)
            .order_by_asc(states::Column::Id)
            .all(&self.db)
            .await
            .map_err(backend)?;
        Ok(rows
            .into_iter()
            .map(|s| NamedNode::new(StateId::from_uuid(s.id), s.name))
            .collect())
    }

    async fn districts_in(
        &self,
        state_ids: &[StateId],
    ) -> Result<Vec<NamedNode<DistrictId>>, StoreError> {
        let rows = districts::Entity::find()
            .filter(districts::Column::StateId.is_in(uuids(state_ids)))
            .order_by_asc(districts::Column::Name)
            .order_by_asc(districts::Column::Id)
            .all(&self.db)
            .await
            .map_err(backend)?;
        Ok(rows
            .into_iter()
            .map(|d| NamedNode::new(DistrictId::from_uuid(d.id), d.name))
            .collect())
    }

    async fn districts_by_ids(
        &self,
        ids: &[DistrictId],
    ) -> Result<Vec<NamedNode<DistrictId>>, StoreError> {
        let rows = districts::Entity::find()
            .filter(districts::Column::Id.is_in(uuids(ids)))
            .order_by_asc(districts::Column::Name)
            .order_by_asc(districts::Column::Id)
            .all(&self.db)
            .await
            .map_err(backend)?;
        Ok(rows
            .into_iter()
            .map(|d| NamedNode::new(DistrictId::from_uuid(d.id), d.name))
            .collect())
    }

    async fn orgs_in(
        &self,
        district_ids: &[DistrictId],
    ) -> Result<Vec<NamedNode<OrgId>>, StoreError> {
        let rows = organizations::Entity::find()
            .filter(organizations::Column::DistrictId.is_in(uuids(district_ids)))
            .order_by_asc(organizations::Column::Name)
            .order_by_asc(organizations::Column::Id)
            .all(&self.db)
            .await
            .map_err(backend)?;
        Ok(rows
            .into_iter()
            .map(|o| NamedNode::new(OrgId::from_uuid(o.id), o.name))
            .collect())
    }

    async fn orgs_by_ids(&self, ids: &[OrgId]) -> Result<Vec<NamedNode<OrgId>>, StoreError> {
        let rows = organizations::Entity::find()
            .filter(organizations::Column::Id.is_in(uuids(ids)))
            .order_by_asc(organizations::Column::Name)
            .order_by_asc(organizations::Column::Id)
            .all(&self.db)
            .await
            .map_err(backend)?;
        Ok(rows
            .into_iter()
            .map(|o| NamedNode::new(OrgId::from_uuid(o.id), o.name))
            .collect())
    }

    async fn kvks_in(&self, org_ids: &[OrgId]) -> Result<Vec<NamedNode<KvkId>>, StoreError> {
        let rows = kvks::Entity::find()
            .filter(kvks::Column::OrgId.is_in(uuids(org_ids)))
            .order_by_asc(kvks::Column::Name)
            .order_by_asc(kvks::Column::Id)
            .all(&self.db)
            .await
            .map_err(backend)?;
        Ok(rows
            .into_iter()
            .map(|k| NamedNode::new(KvkId::from_uuid(k.id), k.name))
            .collect())
    }

    async fn kvks_by_ids(&self, ids: &[KvkId]) -> Result<Vec<NamedNode<KvkId>>, StoreError> {
        let rows = kvks::Entity::find()
            .filter(kvks::Column::Id.is_in(uuids(ids)))
            .order_by_asc(kvks::Column::Name)
            .order_by_asc(kvks::Column::Id)
            .all(&self.db)
            .await
            .map_err(backend)?;
        Ok(rows
            .into_iter()
            .map(|k| NamedNode::new(KvkId::from_uuid(k.id), k.name))
            .collect())
    }
}
