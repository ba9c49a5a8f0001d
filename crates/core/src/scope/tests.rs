use uuid::Uuid;

use kendra_shared::types::{KvkId, OrgId, StateId, ZoneId};

use super::resolver::{MockHierarchyStore, ScopeResolver};
use super::types::{Role, ScopeLevel, ScopeRequest};
use super::ScopeError;
use crate::testutil::{self, TreeIds};

fn resolver() -> (ScopeResolver, TreeIds) {
    let (hierarchy, ids) = testutil::tree();
    (ScopeResolver::new(hierarchy), ids)
}

fn super_admin() -> crate::scope::CallerContext {
    testutil::caller(Role::SuperAdmin)
}

#[tokio::test]
async fn test_super_admin_sees_whole_hierarchy() {
    let (resolver, ids) = resolver();
    let scope = resolver
        .authorized_scope(&super_admin())
        .await
        .expect("resolves");

    assert_eq!(scope.zones.len(), 3);
    assert_eq!(scope.states.len(), 2);
    assert_eq!(scope.districts.len(), 3);
    assert_eq!(scope.orgs.len(), 3);
    assert_eq!(scope.kvks.len(), 4);
    assert!(scope.district_ids().contains(&ids.d_puri));
    assert!(scope.kvk_ids().contains(&ids.k_puri));
}

#[tokio::test]
async fn test_zone_admin_scope_is_zone_bounded() {
    let (resolver, ids) = resolver();
    let mut caller = testutil::caller(Role::ZoneAdmin);
    caller.home_zone = Some(ids.z_north);

    let scope = resolver.authorized_scope(&caller).await.expect("resolves");

    let kvks = scope.kvk_ids();
    assert_eq!(kvks.len(), 3);
    assert!(kvks.contains(&ids.k_ludhiana));
    assert!(kvks.contains(&ids.k_samrala));
    assert!(kvks.contains(&ids.k_moga));
    assert!(!kvks.contains(&ids.k_puri));
}

#[tokio::test]
async fn test_kvk_staff_scope_is_exactly_own_kvk() {
    let (resolver, ids) = resolver();
    let mut caller = testutil::caller(Role::KvkStaff);
    caller.home_kvk = Some(ids.k_moga);

    let scope = resolver.authorized_scope(&caller).await.expect("resolves");

    assert!(scope.zones.is_empty());
    assert!(scope.orgs.is_empty());
    assert_eq!(scope.kvk_ids().into_iter().collect::<Vec<_>>(), vec![ids.k_moga]);
}

#[tokio::test]
async fn test_missing_home_id_is_incomplete_context() {
    let (resolver, _) = resolver();
    let caller = testutil::caller(Role::ZoneAdmin);

    let err = resolver.authorized_scope(&caller).await.expect_err("fails");
    assert!(matches!(
        err,
        ScopeError::IncompleteContext {
            role: Role::ZoneAdmin,
            level: ScopeLevel::Zone,
        }
    ));
}

#[tokio::test]
async fn test_kvk_staff_resolution_touches_only_kvk_lookups() {
    let mut store = MockHierarchyStore::new();
    let kvk = KvkId::new();
    store
        .expect_kvks_by_ids()
        .times(1)
        .returning(move |ids| Ok(vec![super::NamedNode::new(ids[0], "KVK Test")]));

    let resolver = ScopeResolver::new(std::sync::Arc::new(store));
    let mut caller = testutil::caller(Role::KvkStaff);
    caller.home_kvk = Some(kvk);

    let scope = resolver.authorized_scope(&caller).await.expect("resolves");
    assert_eq!(scope.kvks.len(), 1);
}

#[tokio::test]
async fn test_empty_request_defaults_to_full_authorized_scope() {
    let (resolver, ids) = resolver();
    let authorized = resolver
        .authorized_scope(&super_admin())
        .await
        .expect("resolves");

    let resolved = resolver
        .expand(&ScopeRequest::default(), &authorized)
        .await
        .expect("expands");

    assert_eq!(resolved.kvks.len(), 4);
    assert_eq!(resolved.derived_from, None);
    assert!(resolved.requested_levels.is_empty());
    assert!(resolved.kvk_ids().contains(&ids.k_samrala));
}

#[tokio::test]
async fn test_most_specific_level_wins() {
    // Request names both a state and an org that is NOT under that state;
    // the org must win and the state only appears in the audit record.
    let (resolver, ids) = resolver();
    let authorized = resolver
        .authorized_scope(&super_admin())
        .await
        .expect("resolves");

    let request = ScopeRequest {
        state_ids: vec![ids.s_odisha],
        org_ids: vec![ids.o_pau],
        ..ScopeRequest::default()
    };
    let resolved = resolver.expand(&request, &authorized).await.expect("expands");

    assert_eq!(resolved.derived_from, Some(ScopeLevel::Organization));
    assert_eq!(
        resolved.requested_levels,
        vec![ScopeLevel::Organization, ScopeLevel::State]
    );
    let kvks = resolved.kvk_ids();
    assert_eq!(kvks, vec![ids.k_ludhiana, ids.k_samrala]);
    assert!(!kvks.contains(&ids.k_puri));
}

#[tokio::test]
async fn test_expansion_never_exceeds_authorization() {
    // A zone admin asking for an org outside their zone gets nothing
    // extra: adversarial ids are dropped, valid ones survive.
    let (resolver, ids) = resolver();
    let mut caller = testutil::caller(Role::ZoneAdmin);
    caller.home_zone = Some(ids.z_north);
    let authorized = resolver.authorized_scope(&caller).await.expect("resolves");

    let request = ScopeRequest {
        org_ids: vec![ids.o_ouat, ids.o_icar],
        ..ScopeRequest::default()
    };
    let resolved = resolver.expand(&request, &authorized).await.expect("expands");

    assert_eq!(resolved.kvk_ids(), vec![ids.k_moga]);
}

#[tokio::test]
async fn test_adversarial_kvk_ids_are_dropped() {
    let (resolver, ids) = resolver();
    let mut caller = testutil::caller(Role::OrgAdmin);
    caller.home_org = Some(ids.o_pau);
    let authorized = resolver.authorized_scope(&caller).await.expect("resolves");

    let request = ScopeRequest {
        kvk_ids: vec![
            KvkId::from_uuid(Uuid::new_v4()),
            ids.k_puri,
            ids.k_samrala,
            ids.k_samrala,
        ],
        ..ScopeRequest::default()
    };
    let resolved = resolver.expand(&request, &authorized).await.expect("expands");

    assert_eq!(resolved.kvk_ids(), vec![ids.k_samrala]);
    assert_eq!(resolved.derived_from, Some(ScopeLevel::Kvk));
}

#[tokio::test]
async fn test_fully_out_of_scope_request_is_rejected() {
    let (resolver, ids) = resolver();
    let mut caller = testutil::caller(Role::KvkStaff);
    caller.home_kvk = Some(ids.k_puri);
    let authorized = resolver.authorized_scope(&caller).await.expect("resolves");

    let request = ScopeRequest {
        org_ids: vec![ids.o_pau],
        ..ScopeRequest::default()
    };
    let err = resolver.expand(&request, &authorized).await.expect_err("rejected");

    assert!(matches!(
        err,
        ScopeError::OutOfScope {
            level: ScopeLevel::Organization,
        }
    ));
}

#[tokio::test]
async fn test_foreign_zone_request_is_rejected() {
    let (resolver, ids) = resolver();
    let mut caller = testutil::caller(Role::ZoneAdmin);
    caller.home_zone = Some(ids.z_north);
    let authorized = resolver.authorized_scope(&caller).await.expect("resolves");

    let request = ScopeRequest {
        zone_ids: vec![ids.z_east],
        ..ScopeRequest::default()
    };
    let err = resolver.expand(&request, &authorized).await.expect_err("rejected");
    assert!(matches!(err, ScopeError::OutOfScope { level: ScopeLevel::Zone }));
}

#[tokio::test]
async fn test_zone_with_no_kvks_resolves_empty_without_error() {
    let (resolver, ids) = resolver();
    let authorized = resolver
        .authorized_scope(&super_admin())
        .await
        .expect("resolves");

    let request = ScopeRequest {
        zone_ids: vec![ids.z_empty],
        ..ScopeRequest::default()
    };
    let resolved = resolver.expand(&request, &authorized).await.expect("expands");

    assert!(resolved.kvks.is_empty());
    assert_eq!(resolved.derived_from, Some(ScopeLevel::Zone));
}

#[tokio::test]
async fn test_resolved_order_is_stable_name_order() {
    let (resolver, ids) = resolver();
    let authorized = resolver
        .authorized_scope(&super_admin())
        .await
        .expect("resolves");

    let request = ScopeRequest {
        org_ids: vec![ids.o_pau],
        ..ScopeRequest::default()
    };
    let first = resolver.expand(&request, &authorized).await.expect("expands");
    let second = resolver.expand(&request, &authorized).await.expect("expands");

    assert_eq!(first.kvk_ids(), second.kvk_ids());
    assert_eq!(first.kvk_ids(), vec![ids.k_ludhiana, ids.k_samrala]);
}

#[tokio::test]
async fn test_children_cascade_one_level() {
    let (resolver, ids) = resolver();
    let authorized = resolver
        .authorized_scope(&super_admin())
        .await
        .expect("resolves");

    let states = resolver
        .children(ScopeLevel::Zone, &[ids.z_north.into_inner()], &authorized)
        .await
        .expect("children");
    assert_eq!(states.len(), 1);
    assert_eq!(states[0].name, "Punjab");

    let districts = resolver
        .children(ScopeLevel::State, &[ids.s_punjab.into_inner()], &authorized)
        .await
        .expect("children");
    let district_ids: Vec<uuid::Uuid> = districts.iter().map(|d| d.id).collect();
    assert_eq!(
        district_ids,
        vec![ids.d_ludhiana.into_inner(), ids.d_moga.into_inner()]
    );

    let kvks = resolver
        .children(
            ScopeLevel::Organization,
            &[ids.o_pau.into_inner()],
            &authorized,
        )
        .await
        .expect("children");
    assert_eq!(kvks.len(), 2);
}

#[tokio::test]
async fn test_children_filtered_by_authorization() {
    let (resolver, ids) = resolver();
    let mut caller = testutil::caller(Role::StateAdmin);
    caller.home_state = Some(ids.s_punjab);
    let authorized = resolver.authorized_scope(&caller).await.expect("resolves");

    // Asking for children of a foreign zone yields nothing.
    let states = resolver
        .children(ScopeLevel::Zone, &[ids.z_east.into_inner()], &authorized)
        .await
        .expect("children");
    assert!(states.is_empty());
}

#[tokio::test]
async fn test_children_of_kvk_level_is_an_error() {
    let (resolver, ids) = resolver();
    let authorized = resolver
        .authorized_scope(&super_admin())
        .await
        .expect("resolves");

    let err = resolver
        .children(ScopeLevel::Kvk, &[ids.k_moga.into_inner()], &authorized)
        .await
        .expect_err("leaf");
    assert!(matches!(err, ScopeError::LeafLevel(ScopeLevel::Kvk)));
}

#[test]
fn test_role_round_trip() {
    for role in [
        Role::SuperAdmin,
        Role::ZoneAdmin,
        Role::StateAdmin,
        Role::DistrictAdmin,
        Role::OrgAdmin,
        Role::KvkStaff,
    ] {
        assert_eq!(role.as_str().parse::<Role>().expect("parses"), role);
    }
    assert!("gardener".parse::<Role>().is_err());
}

#[test]
fn test_populated_levels_most_specific_first() {
    let request = ScopeRequest {
        zone_ids: vec![ZoneId::new()],
        state_ids: vec![StateId::new()],
        org_ids: vec![OrgId::new()],
        ..ScopeRequest::default()
    };
    assert_eq!(
        request.populated_levels(),
        vec![ScopeLevel::Organization, ScopeLevel::State, ScopeLevel::Zone]
    );
}
