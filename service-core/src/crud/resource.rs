//! Generic CRUD orchestrator.
//!
//! A [`BaseCrudResource`] composes a [`CrudService`], a [`Mapper`] and a set of
//! [`CrudHooks`] to answer list/get/create/update/delete. Every failure is
//! turned into an error [`ApiResponse`] paired with a [`CrudOutcome`]; nothing
//! is propagated past this boundary.

use std::fmt::Display;
use std::sync::Arc;

use metrics::counter;

use super::envelope::ApiResponse;
use super::error::CrudError;
use super::hooks::{CrudHooks, NoHooks};
use super::mapper::Mapper;
use super::service::CrudService;

pub const DEFAULT_ENTITY_NAME: &str = "Entity";

/// Transport-neutral status of a resource operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrudOutcome {
    Ok,
    Created,
    BadRequest,
    NotFound,
    InternalError,
}

impl CrudOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            CrudOutcome::Ok => "ok",
            CrudOutcome::Created => "created",
            CrudOutcome::BadRequest => "bad_request",
            CrudOutcome::NotFound => "not_found",
            CrudOutcome::InternalError => "internal_error",
        }
    }
}

/// Envelope plus the outcome the transport should report.
#[derive(Debug, Clone)]
pub struct CrudResponse<T> {
    pub outcome: CrudOutcome,
    pub body: ApiResponse<T>,
}

impl<T> CrudResponse<T> {
    pub fn new(outcome: CrudOutcome, body: ApiResponse<T>) -> Self {
        Self { outcome, body }
    }

    fn failure(outcome: CrudOutcome, message: impl Into<String>) -> Self {
        Self::new(outcome, ApiResponse::error(message))
    }
}

pub struct BaseCrudResource<E, D, ID>
where
    D: Sync + 'static,
    ID: Sync + 'static,
{
    service: Arc<dyn CrudService<E, ID>>,
    mapper: Arc<dyn Mapper<E, D>>,
    hooks: Arc<dyn CrudHooks<D, ID>>,
    entity_name: String,
}

impl<E, D, ID> BaseCrudResource<E, D, ID>
where
    E: Send + Sync + 'static,
    D: Send + Sync + 'static,
    ID: Display + Send + Sync + 'static,
{
    pub fn new(service: Arc<dyn CrudService<E, ID>>, mapper: Arc<dyn Mapper<E, D>>) -> Self {
        Self {
            service,
            mapper,
            hooks: Arc::new(NoHooks),
            entity_name: DEFAULT_ENTITY_NAME.to_string(),
        }
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn CrudHooks<D, ID>>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Label used in default messages, e.g. "User not found with id: 7".
    pub fn with_entity_name(mut self, name: impl Into<String>) -> Self {
        self.entity_name = name.into();
        self
    }

    pub fn not_found_message(&self, id: &ID) -> String {
        format!("{} not found with id: {}", self.entity_name, id)
    }

    pub async fn list(&self) -> CrudResponse<Vec<D>> {
        let response = match self.service.find_all().await {
            Ok(entities) => {
                let dtos = entities
                    .iter()
                    .map(|entity| self.mapper.to_dto(entity))
                    .collect();
                CrudResponse::new(CrudOutcome::Ok, ApiResponse::success(dtos))
            }
            Err(err) => {
                tracing::error!(entity = %self.entity_name, error = %err, "Failed to list records");
                CrudResponse::failure(
                    CrudOutcome::InternalError,
                    format!("Error listing {}: {}", self.label_lower(), err),
                )
            }
        };
        self.record("list", response.outcome);
        response
    }

    pub async fn get(&self, id: ID) -> CrudResponse<D> {
        let response = match self.service.find_by_id(&id).await {
            Ok(Some(entity)) => {
                CrudResponse::new(CrudOutcome::Ok, ApiResponse::success(self.mapper.to_dto(&entity)))
            }
            Ok(None) | Err(CrudError::NotFound(_)) => {
                CrudResponse::failure(CrudOutcome::NotFound, self.not_found_message(&id))
            }
            Err(err) => {
                tracing::error!(entity = %self.entity_name, id = %id, error = %err, "Failed to load record");
                CrudResponse::failure(
                    CrudOutcome::InternalError,
                    format!("Error loading {}: {}", self.label_lower(), err),
                )
            }
        };
        self.record("get", response.outcome);
        response
    }

    pub async fn create(&self, dto: D) -> CrudResponse<D> {
        let response = match self.try_create(&dto).await {
            Ok(saved) => {
                tracing::info!(entity = %self.entity_name, "Record created");
                CrudResponse::new(
                    CrudOutcome::Created,
                    ApiResponse::success_with_message(
                        format!("{} created successfully", self.entity_name),
                        saved,
                    ),
                )
            }
            Err(CrudError::Internal(err)) => {
                tracing::error!(entity = %self.entity_name, error = %err, "Failed to create record");
                CrudResponse::failure(
                    CrudOutcome::BadRequest,
                    format!("Error creating {}: {}", self.label_lower(), err),
                )
            }
            Err(err) => {
                tracing::warn!(entity = %self.entity_name, reason = %err, "Create rejected");
                CrudResponse::failure(CrudOutcome::BadRequest, err.to_string())
            }
        };
        self.record("create", response.outcome);
        response
    }

    async fn try_create(&self, dto: &D) -> Result<D, CrudError> {
        self.hooks.pre_create(dto).await?;
        let entity = self.mapper.to_entity(dto);
        let saved = self.service.save(entity).await?;
        Ok(self.mapper.to_dto(&saved))
    }

    pub async fn update(&self, id: ID, dto: D) -> CrudResponse<D> {
        let response = match self.try_update(&id, &dto).await {
            Ok(updated) => {
                tracing::info!(entity = %self.entity_name, id = %id, "Record updated");
                CrudResponse::new(
                    CrudOutcome::Ok,
                    ApiResponse::success_with_message(
                        format!("{} updated successfully", self.entity_name),
                        updated,
                    ),
                )
            }
            Err(CrudError::NotFound(_)) => {
                CrudResponse::failure(CrudOutcome::NotFound, self.not_found_message(&id))
            }
            Err(CrudError::Internal(err)) => {
                tracing::error!(entity = %self.entity_name, id = %id, error = %err, "Failed to update record");
                CrudResponse::failure(
                    CrudOutcome::BadRequest,
                    format!("Error updating {}: {}", self.label_lower(), err),
                )
            }
            Err(err) => {
                tracing::warn!(entity = %self.entity_name, id = %id, reason = %err, "Update rejected");
                CrudResponse::failure(CrudOutcome::BadRequest, err.to_string())
            }
        };
        self.record("update", response.outcome);
        response
    }

    async fn try_update(&self, id: &ID, dto: &D) -> Result<D, CrudError> {
        self.hooks.pre_update(id, dto).await?;
        let mut existing = self
            .service
            .find_by_id(id)
            .await?
            .ok_or_else(|| CrudError::not_found(self.not_found_message(id)))?;
        self.mapper.update_entity_from_dto(&mut existing, dto);
        let updated = self.service.update(id, existing).await?;
        Ok(self.mapper.to_dto(&updated))
    }

    pub async fn delete(&self, id: ID) -> CrudResponse<()> {
        let result = async {
            self.hooks.pre_delete(&id).await?;
            self.service.delete_by_id(&id).await
        }
        .await;

        let response = match result {
            Ok(()) => {
                tracing::info!(entity = %self.entity_name, id = %id, "Record deleted");
                CrudResponse::new(
                    CrudOutcome::Ok,
                    ApiResponse::success_message(format!(
                        "{} deleted successfully",
                        self.entity_name
                    )),
                )
            }
            Err(CrudError::NotFound(_)) => {
                CrudResponse::failure(CrudOutcome::NotFound, self.not_found_message(&id))
            }
            Err(CrudError::Internal(err)) => {
                tracing::error!(entity = %self.entity_name, id = %id, error = %err, "Failed to delete record");
                CrudResponse::failure(
                    CrudOutcome::InternalError,
                    format!("Error deleting {}: {}", self.label_lower(), err),
                )
            }
            Err(err) => {
                tracing::warn!(entity = %self.entity_name, id = %id, reason = %err, "Delete rejected");
                CrudResponse::failure(CrudOutcome::BadRequest, err.to_string())
            }
        };
        self.record("delete", response.outcome);
        response
    }

    fn label_lower(&self) -> String {
        self.entity_name.to_lowercase()
    }

    fn record(&self, operation: &'static str, outcome: CrudOutcome) {
        counter!(
            "crud_operations_total",
            "resource" => self.entity_name.clone(),
            "operation" => operation,
            "outcome" => outcome.as_str()
        )
        .increment(1);
    }
}
