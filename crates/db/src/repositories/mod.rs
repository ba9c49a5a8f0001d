//! Repository implementations of the core store traits.

pub mod hierarchy;
pub mod sections;

pub use hierarchy::HierarchyRepository;
pub use sections::SectionRepository;

use sea_orm::DbErr;

use kendra_core::store::StoreError;

pub(crate) fn backend(err: DbErr) -> StoreError {
    StoreError::Backend(err.to_string())
}
