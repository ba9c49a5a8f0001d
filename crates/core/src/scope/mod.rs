//! Authorization-bound scope resolution over the organizational hierarchy.
//!
//! Callers live somewhere in the zone → state → district → organization →
//! KVK tree. The resolver computes what they may see, expands a scope
//! request into a concrete KVK set, and guarantees the result never
//! exceeds their authorization regardless of the ids they request.

pub mod error;
pub mod resolver;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::ScopeError;
pub use resolver::{HierarchyStore, ScopeResolver};
pub use types::{
    AuthorizedScope, CallerContext, NamedNode, ResolvedScope, Role, ScopeLevel, ScopeRequest,
};

#[cfg(test)]
pub use resolver::MockHierarchyStore;
