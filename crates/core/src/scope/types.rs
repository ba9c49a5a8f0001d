//! Scope data types.

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use kendra_shared::types::{DistrictId, KvkId, OrgId, StateId, UserId, ZoneId};

/// Caller roles, each bound to one hierarchy level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Sees the whole hierarchy.
    SuperAdmin,
    /// Bound to one agro-climatic zone.
    ZoneAdmin,
    /// Bound to one state.
    StateAdmin,
    /// Bound to one district.
    DistrictAdmin,
    /// Bound to one host organization.
    OrgAdmin,
    /// Bound to exactly one KVK.
    KvkStaff,
}

impl Role {
    /// Returns the wire name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::ZoneAdmin => "zone_admin",
            Self::StateAdmin => "state_admin",
            Self::DistrictAdmin => "district_admin",
            Self::OrgAdmin => "org_admin",
            Self::KvkStaff => "kvk_staff",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "super_admin" => Ok(Self::SuperAdmin),
            "zone_admin" => Ok(Self::ZoneAdmin),
            "state_admin" => Ok(Self::StateAdmin),
            "district_admin" => Ok(Self::DistrictAdmin),
            "org_admin" => Ok(Self::OrgAdmin),
            "kvk_staff" => Ok(Self::KvkStaff),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// The caller context consumed from the authentication layer.
#[derive(Debug, Clone)]
pub struct CallerContext {
    /// The caller's user id.
    pub user_id: UserId,
    /// Display name, stamped on generated reports.
    pub name: String,
    /// The caller's role.
    pub role: Role,
    /// Home zone, for zone-bound roles.
    pub home_zone: Option<ZoneId>,
    /// Home state, for state-bound roles.
    pub home_state: Option<StateId>,
    /// Home district, for district-bound roles.
    pub home_district: Option<DistrictId>,
    /// Home organization, for org-bound roles.
    pub home_org: Option<OrgId>,
    /// Home KVK, for KVK-bound roles.
    pub home_kvk: Option<KvkId>,
}

/// A hierarchy node as shown in selection dropdowns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedNode<Id> {
    /// Node identifier.
    pub id: Id,
    /// Display name.
    pub name: String,
}

impl<Id> NamedNode<Id> {
    /// Creates a node.
    pub fn new(id: Id, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// The five levels of the organizational hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeLevel {
    /// Agro-climatic zone.
    Zone,
    /// State.
    State,
    /// District.
    District,
    /// Host organization.
    Organization,
    /// Krishi Vigyan Kendra.
    Kvk,
}

impl std::fmt::Display for ScopeLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Zone => "zone",
            Self::State => "state",
            Self::District => "district",
            Self::Organization => "organization",
            Self::Kvk => "kvk",
        };
        f.write_str(name)
    }
}

impl FromStr for ScopeLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "zone" => Ok(Self::Zone),
            "state" => Ok(Self::State),
            "district" => Ok(Self::District),
            "organization" => Ok(Self::Organization),
            "kvk" => Ok(Self::Kvk),
            other => Err(format!("unknown hierarchy level: {other}")),
        }
    }
}

/// A caller-supplied scope request: any combination of hierarchy levels.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScopeRequest {
    /// Requested zones.
    #[serde(default)]
    pub zone_ids: Vec<ZoneId>,
    /// Requested states.
    #[serde(default)]
    pub state_ids: Vec<StateId>,
    /// Requested districts.
    #[serde(default)]
    pub district_ids: Vec<DistrictId>,
    /// Requested host organizations.
    #[serde(default)]
    pub org_ids: Vec<OrgId>,
    /// Requested KVKs.
    #[serde(default)]
    pub kvk_ids: Vec<KvkId>,
}

impl ScopeRequest {
    /// A request naming a single KVK.
    #[must_use]
    pub fn single_kvk(id: KvkId) -> Self {
        Self {
            kvk_ids: vec![id],
            ..Self::default()
        }
    }

    /// Returns every level the request populates, most specific first.
    #[must_use]
    pub fn populated_levels(&self) -> Vec<ScopeLevel> {
        let mut levels = Vec::new();
        if !self.kvk_ids.is_empty() {
            levels.push(ScopeLevel::Kvk);
        }
        if !self.org_ids.is_empty() {
            levels.push(ScopeLevel::Organization);
        }
        if !self.district_ids.is_empty() {
            levels.push(ScopeLevel::District);
        }
        if !self.state_ids.is_empty() {
            levels.push(ScopeLevel::State);
        }
        if !self.zone_ids.is_empty() {
            levels.push(ScopeLevel::Zone);
        }
        levels
    }

    /// Returns true if no level is populated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.populated_levels().is_empty()
    }
}

/// Everything a caller may see, fully materialized per request.
///
/// Never cached across requests; hierarchy membership can change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthorizedScope {
    /// Selectable zones.
    pub zones: Vec<NamedNode<ZoneId>>,
    /// Selectable states.
    pub states: Vec<NamedNode<StateId>>,
    /// Selectable districts.
    pub districts: Vec<NamedNode<DistrictId>>,
    /// Selectable host organizations.
    pub orgs: Vec<NamedNode<OrgId>>,
    /// Every KVK reachable by the caller, in canonical order.
    pub kvks: Vec<NamedNode<KvkId>>,
}

impl AuthorizedScope {
    /// The authorized zone id set.
    #[must_use]
    pub fn zone_ids(&self) -> BTreeSet<ZoneId> {
        self.zones.iter().map(|n| n.id).collect()
    }

    /// The authorized state id set.
    #[must_use]
    pub fn state_ids(&self) -> BTreeSet<StateId> {
        self.states.iter().map(|n| n.id).collect()
    }

    /// The authorized district id set.
    #[must_use]
    pub fn district_ids(&self) -> BTreeSet<DistrictId> {
        self.districts.iter().map(|n| n.id).collect()
    }

    /// The authorized organization id set.
    #[must_use]
    pub fn org_ids(&self) -> BTreeSet<OrgId> {
        self.orgs.iter().map(|n| n.id).collect()
    }

    /// The authorized KVK id set.
    #[must_use]
    pub fn kvk_ids(&self) -> BTreeSet<KvkId> {
        self.kvks.iter().map(|n| n.id).collect()
    }
}

/// The outcome of expanding a scope request: a concrete KVK set plus an
/// audit record of how it was derived.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedScope {
    /// The target KVKs, deduplicated, in canonical order.
    pub kvks: Vec<NamedNode<KvkId>>,
    /// The level the KVK set was derived from; `None` means the request
    /// was empty and the caller's whole authorized scope was used.
    pub derived_from: Option<ScopeLevel>,
    /// Every level the caller populated, retained for display.
    pub requested_levels: Vec<ScopeLevel>,
}

impl ResolvedScope {
    /// The resolved KVK ids in canonical order.
    #[must_use]
    pub fn kvk_ids(&self) -> Vec<KvkId> {
        self.kvks.iter().map(|n| n.id).collect()
    }
}

/// Erases the id type of a node list for wire payloads.
#[must_use]
pub fn untyped<Id: Copy + Into<Uuid>>(nodes: &[NamedNode<Id>]) -> Vec<NamedNode<Uuid>> {
    nodes
        .iter()
        .map(|n| NamedNode::new(n.id.into(), n.name.clone()))
        .collect()
}
