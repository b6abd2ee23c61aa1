use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A registered user.
///
/// `id`, `created_at`, `updated_at` and `active` are server-managed: they stay
/// `None` on entities built from client input until the service fills them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct User {
    pub id: Option<Uuid>,
    pub name: String,
    pub email: String,
    pub google_id: Option<String>,
    pub image_url: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub active: Option<bool>,
}

impl User {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            ..Self::default()
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.unwrap_or(false)
    }

    /// Fill server-managed fields that are still unset, as on first insert.
    pub fn stamp_created(&mut self, now: DateTime<Utc>) {
        self.id.get_or_insert_with(Uuid::new_v4);
        self.created_at.get_or_insert(now);
        self.updated_at = Some(now);
        self.active.get_or_insert(true);
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stamp_created_keeps_existing_values() {
        let id = Uuid::new_v4();
        let earlier = Utc::now() - chrono::Duration::days(1);
        let mut user = User {
            id: Some(id),
            created_at: Some(earlier),
            active: Some(false),
            ..User::new("Ana", "ana@x.com")
        };

        let now = Utc::now();
        user.stamp_created(now);

        assert_eq!(user.id, Some(id));
        assert_eq!(user.created_at, Some(earlier));
        assert_eq!(user.updated_at, Some(now));
        assert_eq!(user.active, Some(false));
    }

    #[test]
    fn stamp_created_defaults_to_active() {
        let mut user = User::new("Ana", "ana@x.com");
        user.stamp_created(Utc::now());

        assert!(user.id.is_some());
        assert!(user.is_active());
        assert_eq!(user.created_at, user.updated_at);
    }
}
