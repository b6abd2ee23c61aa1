pub mod database;
pub mod hooks;
pub mod metrics;
pub mod repository;
pub mod user_service;

pub use database::MongoUserRepository;
pub use hooks::UserHooks;
pub use metrics::{get_metrics, init_metrics};
pub use repository::{InMemoryUserRepository, UserRepository};
pub use user_service::UserService;
