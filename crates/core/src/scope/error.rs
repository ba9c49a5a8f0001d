//! Scope resolution error types.

use thiserror::Error;

use super::types::{Role, ScopeLevel};
use crate::store::StoreError;

/// Errors that can occur during scope resolution.
#[derive(Debug, Error)]
pub enum ScopeError {
    /// The caller's token is missing the home identifier its role requires.
    #[error("caller with role {role} has no home {level} identifier")]
    IncompleteContext {
        /// The caller's role.
        role: Role,
        /// The hierarchy level the role is bound to.
        level: ScopeLevel,
    },

    /// Every id the caller requested at the winning level is outside
    /// their authorized scope.
    #[error("requested {level} scope is not reachable from the caller's authorization")]
    OutOfScope {
        /// The hierarchy level the request was made at.
        level: ScopeLevel,
    },

    /// The given level has no child level to cascade into.
    #[error("hierarchy level {0} has no child level")]
    LeafLevel(ScopeLevel),

    /// The hierarchy store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
