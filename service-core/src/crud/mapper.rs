//! Entity <-> transfer object conversion contract.

/// Converts between a persisted entity `E` and its client-facing DTO `D`.
///
/// Implementations copy client-visible fields only. Server-managed fields
/// (identifier, timestamps, status flags) are never read from a DTO and are
/// left unset by [`Mapper::to_entity`] for the service to fill in.
///
/// The `*_opt` and `*_list` helpers propagate absence: `None` in gives `None`
/// out, never an empty value.
pub trait Mapper<E, D>: Send + Sync {
    fn to_dto(&self, entity: &E) -> D;

    fn to_entity(&self, dto: &D) -> E;

    /// Apply `dto` onto `entity` in place.
    ///
    /// Must not touch the identifier or creation timestamp. Optional fields
    /// that are blank in the DTO keep the entity's current value, except
    /// fields that are nullable end-to-end, which are always overwritten so a
    /// client can clear them.
    fn update_entity_from_dto(&self, entity: &mut E, dto: &D);

    fn to_dto_opt(&self, entity: Option<&E>) -> Option<D> {
        entity.map(|entity| self.to_dto(entity))
    }

    fn to_entity_opt(&self, dto: Option<&D>) -> Option<E> {
        dto.map(|dto| self.to_entity(dto))
    }

    fn to_dto_list(&self, entities: Option<&[E]>) -> Option<Vec<D>> {
        entities.map(|entities| entities.iter().map(|entity| self.to_dto(entity)).collect())
    }

    fn to_entity_list(&self, dtos: Option<&[D]>) -> Option<Vec<E>> {
        dtos.map(|dtos| dtos.iter().map(|dto| self.to_entity(dto)).collect())
    }
}

/// `true` when `value` is absent or only whitespace.
pub fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}
