use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use service_core::crud::{is_blank, CrudError, CrudResult, CrudService};
use uuid::Uuid;

use super::repository::UserRepository;
use crate::models::User;

/// Business operations on users. All persistence goes through the injected
/// [`UserRepository`]; timestamps and the active flag are set here.
#[derive(Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

fn not_found(id: &Uuid) -> CrudError {
    CrudError::not_found(format!("User not found with id: {}", id))
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &Arc<dyn UserRepository> {
        &self.repository
    }

    pub async fn find_by_email(&self, email: &str) -> CrudResult<Option<User>> {
        self.repository.find_by_email(email).await
    }

    pub async fn find_by_google_id(&self, google_id: &str) -> CrudResult<Option<User>> {
        self.repository.find_by_google_id(google_id).await
    }

    pub async fn find_active(&self) -> CrudResult<Vec<User>> {
        self.repository.find_by_active(true).await
    }

    pub async fn find_inactive(&self) -> CrudResult<Vec<User>> {
        self.repository.find_by_active(false).await
    }

    pub async fn find_recent_active(&self) -> CrudResult<Vec<User>> {
        self.repository.find_active_newest_first().await
    }

    pub async fn search_by_name(&self, name: &str, active: bool) -> CrudResult<Vec<User>> {
        self.repository
            .find_by_name_containing_and_active(name, active)
            .await
    }

    pub async fn search_by_email(&self, fragment: &str) -> CrudResult<Vec<User>> {
        self.repository.find_by_email_containing(fragment).await
    }

    pub async fn exists_by_email(&self, email: &str) -> CrudResult<bool> {
        self.repository.exists_by_email(email).await
    }

    pub async fn exists_by_google_id(&self, google_id: &str) -> CrudResult<bool> {
        self.repository.exists_by_google_id(google_id).await
    }

    pub async fn activate(&self, id: &Uuid) -> CrudResult<()> {
        self.set_active(id, true).await
    }

    pub async fn deactivate(&self, id: &Uuid) -> CrudResult<()> {
        self.set_active(id, false).await
    }

    async fn set_active(&self, id: &Uuid, active: bool) -> CrudResult<()> {
        let mut user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))?;

        user.active = Some(active);
        user.touch(Utc::now());
        self.repository.save(user).await?;

        tracing::info!(user_id = %id, active, "User activation changed");
        Ok(())
    }

    pub async fn count_active(&self) -> CrudResult<u64> {
        self.repository.count_by_active(true).await
    }

    pub async fn count_inactive(&self) -> CrudResult<u64> {
        self.repository.count_by_active(false).await
    }

    /// Fails with `Conflict` when `email` belongs to a user other than `id`.
    pub async fn ensure_email_unique(&self, email: &str, id: &Uuid) -> CrudResult<()> {
        match self.repository.find_by_email(email).await? {
            Some(existing) if existing.id.as_ref() != Some(id) => Err(CrudError::conflict(
                format!("A user with email {} already exists", email),
            )),
            _ => Ok(()),
        }
    }

    /// Like [`ensure_email_unique`](Self::ensure_email_unique); a blank or
    /// absent Google ID always passes.
    pub async fn ensure_google_id_unique(
        &self,
        google_id: Option<&str>,
        id: &Uuid,
    ) -> CrudResult<()> {
        let google_id = match google_id {
            Some(value) if !is_blank(Some(value)) => value,
            _ => return Ok(()),
        };

        match self.repository.find_by_google_id(google_id).await? {
            Some(existing) if existing.id.as_ref() != Some(id) => Err(CrudError::conflict(
                format!("A user with Google ID {} already exists", google_id),
            )),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl CrudService<User, Uuid> for UserService {
    async fn find_all(&self) -> CrudResult<Vec<User>> {
        self.repository.find_all().await
    }

    async fn find_by_id(&self, id: &Uuid) -> CrudResult<Option<User>> {
        self.repository.find_by_id(id).await
    }

    async fn save(&self, mut user: User) -> CrudResult<User> {
        user.stamp_created(Utc::now());
        let saved = self.repository.save(user).await?;
        tracing::info!(user_id = ?saved.id, "User saved");
        Ok(saved)
    }

    async fn update(&self, id: &Uuid, user: User) -> CrudResult<User> {
        let mut existing = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))?;

        existing.name = user.name;
        existing.email = user.email;
        existing.google_id = user.google_id;
        existing.image_url = user.image_url;
        existing.touch(Utc::now());

        self.repository.save(existing).await
    }

    async fn delete_by_id(&self, id: &Uuid) -> CrudResult<()> {
        if !self.repository.exists_by_id(id).await? {
            return Err(not_found(id));
        }
        self.repository.delete_by_id(id).await?;
        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }

    async fn exists_by_id(&self, id: &Uuid) -> CrudResult<bool> {
        self.repository.exists_by_id(id).await
    }
}
