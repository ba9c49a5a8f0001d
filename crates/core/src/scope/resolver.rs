//! Scope resolution over the hierarchy store.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use kendra_shared::types::{DistrictId, KvkId, OrgId, StateId, ZoneId};

use super::error::ScopeError;
use super::types::{
    AuthorizedScope, CallerContext, NamedNode, ResolvedScope, Role, ScopeLevel, ScopeRequest,
    untyped,
};
use crate::store::StoreError;

/// Read access to the organizational hierarchy.
///
/// Implementations return nodes in a stable (name, id) order so that
/// repeated resolutions of the same scope produce identical orderings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HierarchyStore: Send + Sync {
    /// Every zone.
    async fn zones(&self) -> Result<Vec<NamedNode<ZoneId>>, StoreError>;
    /// Zones by id.
    async fn zones_by_ids(&self, ids: &[ZoneId]) -> Result<Vec<NamedNode<ZoneId>>, StoreError>;
    /// States under the given zones.
    async fn states_in(&self, zones: &[ZoneId]) -> Result<Vec<NamedNode<StateId>>, StoreError>;
    /// States by id.
    async fn states_by_ids(&self, ids: &[StateId]) -> Result<Vec<NamedNode<StateId>>, StoreError>;
    /// Districts under the given states.
    async fn districts_in(
        &self,
        states: &[StateId],
    ) -> Result<Vec<NamedNode<DistrictId>>, StoreError>;
    /// Districts by id.
    async fn districts_by_ids(
        &self,
        ids: &[DistrictId],
    ) -> Result<Vec<NamedNode<DistrictId>>, StoreError>;
    /// Host organizations under the given districts.
    async fn orgs_in(&self, districts: &[DistrictId])
    -> Result<Vec<NamedNode<OrgId>>, StoreError>;
    /// Host organizations by id.
    async fn orgs_by_ids(&self, ids: &[OrgId]) -> Result<Vec<NamedNode<OrgId>>, StoreError>;
    /// KVKs under the given host organizations.
    async fn kvks_in(&self, orgs: &[OrgId]) -> Result<Vec<NamedNode<KvkId>>, StoreError>;
    /// KVKs by id.
    async fn kvks_by_ids(&self, ids: &[KvkId]) -> Result<Vec<NamedNode<KvkId>>, StoreError>;
}

/// Resolves caller authorization and expands scope requests to KVK sets.
#[derive(Clone)]
pub struct ScopeResolver {
    hierarchy: Arc<dyn HierarchyStore>,
}

impl ScopeResolver {
    /// Creates a resolver over the given hierarchy store.
    #[must_use]
    pub fn new(hierarchy: Arc<dyn HierarchyStore>) -> Self {
        Self { hierarchy }
    }

    /// Computes everything the caller may see, cascading downward from
    /// their home node. A KVK-bound role sees exactly its own KVK.
    pub async fn authorized_scope(
        &self,
        caller: &CallerContext,
    ) -> Result<AuthorizedScope, ScopeError> {
        let mut scope = AuthorizedScope::default();

        match caller.role {
            Role::SuperAdmin => {
                scope.zones = self.hierarchy.zones().await?;
                self.fill_below_zones(&mut scope).await?;
            }
            Role::ZoneAdmin => {
                let home = require(caller.home_zone, caller.role, ScopeLevel::Zone)?;
                scope.zones = self.hierarchy.zones_by_ids(&[home]).await?;
                self.fill_below_zones(&mut scope).await?;
            }
            Role::StateAdmin => {
                let home = require(caller.home_state, caller.role, ScopeLevel::State)?;
                scope.states = self.hierarchy.states_by_ids(&[home]).await?;
                self.fill_below_states(&mut scope).await?;
            }
            Role::DistrictAdmin => {
                let home = require(caller.home_district, caller.role, ScopeLevel::District)?;
                scope.districts = self.hierarchy.districts_by_ids(&[home]).await?;
                self.fill_below_districts(&mut scope).await?;
            }
            Role::OrgAdmin => {
                let home = require(caller.home_org, caller.role, ScopeLevel::Organization)?;
                scope.orgs = self.hierarchy.orgs_by_ids(&[home]).await?;
                self.fill_below_orgs(&mut scope).await?;
            }
            Role::KvkStaff => {
                let home = require(caller.home_kvk, caller.role, ScopeLevel::Kvk)?;
                scope.kvks = self.hierarchy.kvks_by_ids(&[home]).await?;
            }
        }

        Ok(scope)
    }

    async fn fill_below_zones(&self, scope: &mut AuthorizedScope) -> Result<(), ScopeError> {
        let zone_ids: Vec<ZoneId> = scope.zones.iter().map(|n| n.id).collect();
        scope.states = self.hierarchy.states_in(&zone_ids).await?;
        self.fill_below_states(scope).await
    }

    async fn fill_below_states(&self, scope: &mut AuthorizedScope) -> Result<(), ScopeError> {
        let state_ids: Vec<StateId> = scope.states.iter().map(|n| n.id).collect();
        scope.districts = self.hierarchy.districts_in(&state_ids).await?;
        self.fill_below_districts(scope).await
    }

    async fn fill_below_districts(&self, scope: &mut AuthorizedScope) -> Result<(), ScopeError> {
        let district_ids: Vec<DistrictId> = scope.districts.iter().map(|n| n.id).collect();
        scope.orgs = self.hierarchy.orgs_in(&district_ids).await?;
        self.fill_below_orgs(scope).await
    }

    async fn fill_below_orgs(&self, scope: &mut AuthorizedScope) -> Result<(), ScopeError> {
        let org_ids: Vec<OrgId> = scope.orgs.iter().map(|n| n.id).collect();
        scope.kvks = self.hierarchy.kvks_in(&org_ids).await?;
        Ok(())
    }

    /// Expands a scope request into a concrete KVK set.
    ///
    /// The most specific populated level wins; requested ids are
    /// intersected with the authorized set at that level, and every
    /// downward expansion step is intersected again, so the result can
    /// never exceed the caller's authorization. An empty request defaults
    /// to the caller's entire authorized scope.
    ///
    /// # Errors
    ///
    /// Returns `ScopeError::OutOfScope` when the winning level was
    /// populated but every requested id fell outside the authorized set.
    /// Zero resolved KVKs from an in-scope request is NOT an error.
    pub async fn expand(
        &self,
        request: &ScopeRequest,
        authorized: &AuthorizedScope,
    ) -> Result<ResolvedScope, ScopeError> {
        let requested_levels = request.populated_levels();

        if !request.kvk_ids.is_empty() {
            let allowed = authorized.kvk_ids();
            let mut seen = BTreeSet::new();
            let kvks: Vec<NamedNode<KvkId>> = request
                .kvk_ids
                .iter()
                .filter(|id| seen.insert(**id))
                .filter(|id| allowed.contains(*id))
                .filter_map(|id| authorized.kvks.iter().find(|n| n.id == *id).cloned())
                .collect();
            if kvks.is_empty() {
                return Err(ScopeError::OutOfScope {
                    level: ScopeLevel::Kvk,
                });
            }
            return Ok(ResolvedScope {
                kvks,
                derived_from: Some(ScopeLevel::Kvk),
                requested_levels,
            });
        }

        if !request.org_ids.is_empty() {
            let selected = intersect(&request.org_ids, &authorized.org_ids());
            if selected.is_empty() {
                return Err(ScopeError::OutOfScope {
                    level: ScopeLevel::Organization,
                });
            }
            let kvks = self.kvks_under_orgs(&selected, authorized).await?;
            return Ok(ResolvedScope {
                kvks,
                derived_from: Some(ScopeLevel::Organization),
                requested_levels,
            });
        }

        if !request.district_ids.is_empty() {
            let selected = intersect(&request.district_ids, &authorized.district_ids());
            if selected.is_empty() {
                return Err(ScopeError::OutOfScope {
                    level: ScopeLevel::District,
                });
            }
            let kvks = self.kvks_under_districts(&selected, authorized).await?;
            return Ok(ResolvedScope {
                kvks,
                derived_from: Some(ScopeLevel::District),
                requested_levels,
            });
        }

        if !request.state_ids.is_empty() {
            let selected = intersect(&request.state_ids, &authorized.state_ids());
            if selected.is_empty() {
                return Err(ScopeError::OutOfScope {
                    level: ScopeLevel::State,
                });
            }
            let districts = self.hierarchy.districts_in(&selected).await?;
            let district_ids = retain_authorized(&districts, &authorized.district_ids());
            let kvks = self.kvks_under_districts(&district_ids, authorized).await?;
            return Ok(ResolvedScope {
                kvks,
                derived_from: Some(ScopeLevel::State),
                requested_levels,
            });
        }

        if !request.zone_ids.is_empty() {
            let selected = intersect(&request.zone_ids, &authorized.zone_ids());
            if selected.is_empty() {
                return Err(ScopeError::OutOfScope {
                    level: ScopeLevel::Zone,
                });
            }
            let states = self.hierarchy.states_in(&selected).await?;
            let state_ids = retain_authorized(&states, &authorized.state_ids());
            let districts = self.hierarchy.districts_in(&state_ids).await?;
            let district_ids = retain_authorized(&districts, &authorized.district_ids());
            let kvks = self.kvks_under_districts(&district_ids, authorized).await?;
            return Ok(ResolvedScope {
                kvks,
                derived_from: Some(ScopeLevel::Zone),
                requested_levels,
            });
        }

        Ok(ResolvedScope {
            kvks: authorized.kvks.clone(),
            derived_from: None,
            requested_levels,
        })
    }

    async fn kvks_under_districts(
        &self,
        districts: &[DistrictId],
        authorized: &AuthorizedScope,
    ) -> Result<Vec<NamedNode<KvkId>>, ScopeError> {
        let orgs = self.hierarchy.orgs_in(districts).await?;
        let org_ids = retain_authorized(&orgs, &authorized.org_ids());
        self.kvks_under_orgs(&org_ids, authorized).await
    }

    async fn kvks_under_orgs(
        &self,
        orgs: &[OrgId],
        authorized: &AuthorizedScope,
    ) -> Result<Vec<NamedNode<KvkId>>, ScopeError> {
        let mut kvks = self.hierarchy.kvks_in(orgs).await?;
        let allowed = authorized.kvk_ids();
        kvks.retain(|n| allowed.contains(&n.id));
        Ok(kvks)
    }

    /// Lists the children of the given parent nodes, one hierarchy level
    /// down, filtered to the caller's authorized sets. Cascading-dropdown
    /// support.
    ///
    /// # Errors
    ///
    /// Returns `ScopeError::LeafLevel` when the parent level is `Kvk`.
    pub async fn children(
        &self,
        parent_level: ScopeLevel,
        parent_ids: &[Uuid],
        authorized: &AuthorizedScope,
    ) -> Result<Vec<NamedNode<Uuid>>, ScopeError> {
        match parent_level {
            ScopeLevel::Zone => {
                let parents: Vec<ZoneId> = typed(parent_ids, &authorized.zone_ids());
                let states = self.hierarchy.states_in(&parents).await?;
                let allowed = authorized.state_ids();
                Ok(untyped_filtered(states, &allowed))
            }
            ScopeLevel::State => {
                let parents: Vec<StateId> = typed(parent_ids, &authorized.state_ids());
                let districts = self.hierarchy.districts_in(&parents).await?;
                let allowed = authorized.district_ids();
                Ok(untyped_filtered(districts, &allowed))
            }
            ScopeLevel::District => {
                let parents: Vec<DistrictId> = typed(parent_ids, &authorized.district_ids());
                let orgs = self.hierarchy.orgs_in(&parents).await?;
                let allowed = authorized.org_ids();
                Ok(untyped_filtered(orgs, &allowed))
            }
            ScopeLevel::Organization => {
                let parents: Vec<OrgId> = typed(parent_ids, &authorized.org_ids());
                let kvks = self.hierarchy.kvks_in(&parents).await?;
                let allowed = authorized.kvk_ids();
                Ok(untyped_filtered(kvks, &allowed))
            }
            ScopeLevel::Kvk => Err(ScopeError::LeafLevel(ScopeLevel::Kvk)),
        }
    }
}

fn require<Id: Copy>(home: Option<Id>, role: Role, level: ScopeLevel) -> Result<Id, ScopeError> {
    home.ok_or(ScopeError::IncompleteContext { role, level })
}

/// Intersects requested ids with an authorized set, deduplicating while
/// preserving request order.
fn intersect<Id: Copy + Ord>(requested: &[Id], allowed: &BTreeSet<Id>) -> Vec<Id> {
    let mut seen = BTreeSet::new();
    requested
        .iter()
        .filter(|id| seen.insert(**id))
        .filter(|id| allowed.contains(*id))
        .copied()
        .collect()
}

fn retain_authorized<Id: Copy + Ord>(nodes: &[NamedNode<Id>], allowed: &BTreeSet<Id>) -> Vec<Id> {
    nodes
        .iter()
        .map(|n| n.id)
        .filter(|id| allowed.contains(id))
        .collect()
}

/// Narrows raw uuids to a typed id level, keeping only authorized ones.
fn typed<Id: Copy + Ord + From<Uuid>>(raw: &[Uuid], allowed: &BTreeSet<Id>) -> Vec<Id> {
    let mut seen = BTreeSet::new();
    raw.iter()
        .map(|u| Id::from(*u))
        .filter(|id| seen.insert(*id))
        .filter(|id| allowed.contains(id))
        .collect()
}

fn untyped_filtered<Id: Copy + Ord + Into<Uuid>>(
    nodes: Vec<NamedNode<Id>>,
    allowed: &BTreeSet<Id>,
) -> Vec<NamedNode<Uuid>> {
    let kept: Vec<NamedNode<Id>> = nodes
        .into_iter()
        .filter(|n| allowed.contains(&n.id))
        .collect();
    untyped(&kept)
}
