use async_trait::async_trait;

use super::error::CrudResult;

/// Validation callbacks run by [`BaseCrudResource`] before each mutation.
///
/// Every hook defaults to a no-op. Returning [`CrudError::Validation`] or
/// [`CrudError::Conflict`] aborts the operation with a 400 envelope.
///
/// [`BaseCrudResource`]: super::BaseCrudResource
/// [`CrudError::Validation`]: super::CrudError::Validation
/// [`CrudError::Conflict`]: super::CrudError::Conflict
#[async_trait]
pub trait CrudHooks<D, ID>: Send + Sync
where
    D: Sync + 'static,
    ID: Sync + 'static,
{
    async fn pre_create(&self, _dto: &D) -> CrudResult<()> {
        Ok(())
    }

    async fn pre_update(&self, _id: &ID, _dto: &D) -> CrudResult<()> {
        Ok(())
    }

    async fn pre_delete(&self, _id: &ID) -> CrudResult<()> {
        Ok(())
    }
}

/// Hooks that accept everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl<D, ID> CrudHooks<D, ID> for NoHooks
where
    D: Sync + 'static,
    ID: Sync + 'static,
{
}
