use crate::config::{StorageBackend, StorageConfig, UserServiceConfig};
use crate::handlers;
use crate::handlers::users::UserResource;
use crate::mapper::UserMapper;
use crate::services::{
    InMemoryUserRepository, MongoUserRepository, UserHooks, UserRepository, UserService,
};
use axum::{middleware, routing::get, Router};
use secrecy::ExposeSecret;
use service_core::error::AppError;
use service_core::middleware::{metrics_middleware, request_id_middleware};
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserService>,
}

pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
    state: AppState,
}

impl Application {
    pub async fn build(config: UserServiceConfig) -> Result<Self, AppError> {
        let repository = connect_repository(&config.storage).await?;
        let state = AppState {
            users: Arc::new(UserService::new(repository)),
        };

        let app = build_router(state.clone());

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        let server = axum::serve(listener, app);

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
            state,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}

pub async fn connect_repository(
    storage: &StorageConfig,
) -> Result<Arc<dyn UserRepository>, AppError> {
    match storage.backend {
        StorageBackend::Memory => {
            tracing::info!("Using in-memory user storage");
            Ok(Arc::new(InMemoryUserRepository::new()))
        }
        StorageBackend::Mongo => {
            let uri = storage.mongodb_uri.as_ref().ok_or_else(|| {
                AppError::ConfigError(anyhow::anyhow!(
                    "MONGODB_URI is required for the mongo storage backend"
                ))
            })?;
            let repository =
                MongoUserRepository::connect(uri.expose_secret(), &storage.mongodb_database)
                    .await?;
            repository.initialize_indexes().await?;
            Ok(Arc::new(repository))
        }
    }
}

/// The user resource: generic CRUD over [`UserService`] with the user
/// uniqueness hooks.
pub fn user_resource(users: Arc<UserService>) -> UserResource {
    UserResource::new(users.clone(), Arc::new(UserMapper))
        .with_hooks(Arc::new(UserHooks::new(users)))
        .with_entity_name("User")
}

pub fn build_router(state: AppState) -> Router {
    let resource = Arc::new(user_resource(state.users.clone()));

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .nest("/api/users", handlers::users_router(resource))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
