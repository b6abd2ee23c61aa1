//! Generic CRUD building blocks: response envelope, mapper and service
//! contracts, validation hooks, and the resource that ties them to HTTP.

mod envelope;
mod error;
mod hooks;
mod mapper;
mod resource;
mod routes;
mod service;

pub use envelope::{ApiResponse, TIMESTAMP_FORMAT};
pub use error::{CrudError, CrudResult};
pub use hooks::{CrudHooks, NoHooks};
pub use mapper::{is_blank, Mapper};
pub use resource::{BaseCrudResource, CrudOutcome, CrudResponse, DEFAULT_ENTITY_NAME};
pub use routes::{crud_router, path_id};
pub use service::{CrudService, Repository};
