use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use service_core::crud::{CrudError, CrudResult, Repository};
use uuid::Uuid;

use crate::models::User;

/// User-specific queries on top of the generic persistence port.
///
/// Email and Google ID lookups are exact matches. The `*_containing`
/// searches are substring matches ignoring case.
#[async_trait]
pub trait UserRepository: Repository<User, Uuid> {
    async fn find_by_email(&self, email: &str) -> CrudResult<Option<User>>;

    async fn find_by_google_id(&self, google_id: &str) -> CrudResult<Option<User>>;

    async fn find_by_active(&self, active: bool) -> CrudResult<Vec<User>>;

    async fn find_active_newest_first(&self) -> CrudResult<Vec<User>>;

    async fn find_by_name_containing_and_active(
        &self,
        name: &str,
        active: bool,
    ) -> CrudResult<Vec<User>>;

    async fn find_by_email_containing(&self, fragment: &str) -> CrudResult<Vec<User>>;

    async fn exists_by_email(&self, email: &str) -> CrudResult<bool>;

    async fn exists_by_google_id(&self, google_id: &str) -> CrudResult<bool>;

    async fn count_by_active(&self, active: bool) -> CrudResult<u64>;

    /// Liveness of the backing store, used by `/ready`.
    async fn health_check(&self) -> CrudResult<()> {
        Ok(())
    }
}

/// Process-local store. Lists come back oldest first.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<DashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn select(&self, predicate: impl Fn(&User) -> bool) -> Vec<User> {
        let mut users: Vec<User> = self
            .users
            .iter()
            .filter(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        users.sort_by_key(|user| user.created_at);
        users
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[async_trait]
impl Repository<User, Uuid> for InMemoryUserRepository {
    async fn find_all(&self) -> CrudResult<Vec<User>> {
        Ok(self.select(|_| true))
    }

    async fn find_by_id(&self, id: &Uuid) -> CrudResult<Option<User>> {
        Ok(self.users.get(id).map(|entry| entry.value().clone()))
    }

    async fn save(&self, user: User) -> CrudResult<User> {
        let id = user
            .id
            .ok_or_else(|| CrudError::internal("Cannot persist a user without an id"))?;

        let taken = self
            .users
            .iter()
            .any(|entry| *entry.key() != id && entry.value().email == user.email);
        if taken {
            return Err(CrudError::conflict(format!(
                "A user with email {} already exists",
                user.email
            )));
        }

        self.users.insert(id, user.clone());
        Ok(user)
    }

    async fn delete_by_id(&self, id: &Uuid) -> CrudResult<bool> {
        Ok(self.users.remove(id).is_some())
    }

    async fn exists_by_id(&self, id: &Uuid) -> CrudResult<bool> {
        Ok(self.users.contains_key(id))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> CrudResult<Option<User>> {
        Ok(self.select(|user| user.email == email).into_iter().next())
    }

    async fn find_by_google_id(&self, google_id: &str) -> CrudResult<Option<User>> {
        Ok(self
            .select(|user| user.google_id.as_deref() == Some(google_id))
            .into_iter()
            .next())
    }

    async fn find_by_active(&self, active: bool) -> CrudResult<Vec<User>> {
        Ok(self.select(|user| user.active == Some(active)))
    }

    async fn find_active_newest_first(&self) -> CrudResult<Vec<User>> {
        let mut users = self.select(|user| user.active == Some(true));
        users.reverse();
        Ok(users)
    }

    async fn find_by_name_containing_and_active(
        &self,
        name: &str,
        active: bool,
    ) -> CrudResult<Vec<User>> {
        Ok(self.select(|user| {
            user.active == Some(active) && contains_ignore_case(&user.name, name)
        }))
    }

    async fn find_by_email_containing(&self, fragment: &str) -> CrudResult<Vec<User>> {
        Ok(self.select(|user| contains_ignore_case(&user.email, fragment)))
    }

    async fn exists_by_email(&self, email: &str) -> CrudResult<bool> {
        Ok(self.users.iter().any(|entry| entry.value().email == email))
    }

    async fn exists_by_google_id(&self, google_id: &str) -> CrudResult<bool> {
        Ok(self
            .users
            .iter()
            .any(|entry| entry.value().google_id.as_deref() == Some(google_id)))
    }

    async fn count_by_active(&self, active: bool) -> CrudResult<u64> {
        Ok(self
            .users
            .iter()
            .filter(|entry| entry.value().active == Some(active))
            .count() as u64)
    }
}
