pub mod health;
pub mod users;

pub use health::{health_check, metrics_endpoint, readiness_check};
pub use users::router as users_router;
