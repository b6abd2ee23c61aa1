use std::sync::Arc;

use async_trait::async_trait;
use service_core::crud::{is_blank, CrudError, CrudHooks, CrudResult};
use uuid::Uuid;

use super::user_service::UserService;
use crate::dtos::UserDto;

/// Uniqueness checks run before user writes.
pub struct UserHooks {
    users: Arc<UserService>,
}

impl UserHooks {
    pub fn new(users: Arc<UserService>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl CrudHooks<UserDto, Uuid> for UserHooks {
    async fn pre_create(&self, dto: &UserDto) -> CrudResult<()> {
        if self.users.exists_by_email(&dto.email).await? {
            return Err(CrudError::conflict(format!(
                "A user with email {} already exists",
                dto.email
            )));
        }

        if let Some(google_id) = dto.google_id.as_deref() {
            if !is_blank(Some(google_id)) && self.users.exists_by_google_id(google_id).await? {
                return Err(CrudError::conflict(format!(
                    "A user with Google ID {} already exists",
                    google_id
                )));
            }
        }

        Ok(())
    }

    async fn pre_update(&self, id: &Uuid, dto: &UserDto) -> CrudResult<()> {
        self.users.ensure_email_unique(&dto.email, id).await?;
        self.users
            .ensure_google_id_unique(dto.google_id.as_deref(), id)
            .await
    }
}
