//! Service and persistence contracts consumed by [`BaseCrudResource`].
//!
//! [`BaseCrudResource`]: super::BaseCrudResource

use async_trait::async_trait;

use super::error::CrudResult;

/// Business operations for one entity type.
///
/// `update` and `delete_by_id` fail with [`CrudError::NotFound`] when the
/// identifier is unknown. Implementations set server-managed fields
/// (identifier, timestamps, status) explicitly in `save` and `update`.
///
/// [`CrudError::NotFound`]: super::CrudError::NotFound
#[async_trait]
pub trait CrudService<E, ID>: Send + Sync {
    async fn find_all(&self) -> CrudResult<Vec<E>>;

    async fn find_by_id(&self, id: &ID) -> CrudResult<Option<E>>;

    async fn save(&self, entity: E) -> CrudResult<E>;

    /// Merge the mutable fields of `entity` onto the stored record `id`.
    async fn update(&self, id: &ID, entity: E) -> CrudResult<E>;

    async fn delete_by_id(&self, id: &ID) -> CrudResult<()>;

    async fn exists_by_id(&self, id: &ID) -> CrudResult<bool>;
}

/// Minimal persistence port a backing store must provide per entity type.
///
/// `save` is insert-or-replace keyed on the entity identifier. `delete_by_id`
/// reports whether a record was removed.
#[async_trait]
pub trait Repository<E, ID>: Send + Sync {
    async fn find_all(&self) -> CrudResult<Vec<E>>;

    async fn find_by_id(&self, id: &ID) -> CrudResult<Option<E>>;

    async fn save(&self, entity: E) -> CrudResult<E>;

    async fn delete_by_id(&self, id: &ID) -> CrudResult<bool>;

    async fn exists_by_id(&self, id: &ID) -> CrudResult<bool>;
}
