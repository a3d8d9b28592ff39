use crate::entity::Entity;
use crate::error::DataError;
use crate::page::Pageable;
use std::future::Future;

/// Generic async repository contract for CRUD operations.
///
/// Absent inputs are passed as `None` and rejected with
/// [`DataError::InvalidArgument`] before any statement is built.
///
/// Uses RPITIT (return-position `impl Trait` in traits), no `async-trait` needed.
pub trait Repository<E: Entity>: Send + Sync {
    fn get_all(&self) -> impl Future<Output = Result<Vec<E>, DataError>> + Send;
    fn get_all_pageable(
        &self,
        pageable: &Pageable,
    ) -> impl Future<Output = Result<Vec<E>, DataError>> + Send;
    fn get_by_id(&self, id: Option<&E::Id>) -> impl Future<Output = Result<E, DataError>> + Send;
    /// Insert `entity`, omitting the identity and every unset column.
    fn insert(&self, entity: Option<&E>) -> impl Future<Output = Result<E, DataError>> + Send;
    /// Overwrite every non-identity column of the row matching `entity`'s identity.
    fn update(&self, entity: Option<&E>) -> impl Future<Output = Result<E, DataError>> + Send;
    fn delete(&self, entity: Option<&E>) -> impl Future<Output = Result<E::Id, DataError>> + Send;
    fn delete_by_id(
        &self,
        id: Option<&E::Id>,
    ) -> impl Future<Output = Result<E::Id, DataError>> + Send;
}
