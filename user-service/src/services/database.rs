use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    error::{ErrorKind, WriteFailure},
    options::{FindOptions, IndexOptions, ReplaceOptions},
    Client as MongoClient, Collection, Database, IndexModel,
};
use serde::{Deserialize, Serialize};
use service_core::crud::{CrudError, CrudResult, Repository};
use service_core::error::AppError;
use uuid::Uuid;

use super::repository::UserRepository;
use crate::models::User;

const DUPLICATE_KEY: i32 = 11000;

/// Stored shape of a [`User`] in the `users` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub google_id: Option<String>,
    pub image_url: Option<String>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
    pub active: bool,
}

impl TryFrom<User> for UserDocument {
    type Error = CrudError;

    fn try_from(user: User) -> Result<Self, Self::Error> {
        let id = user
            .id
            .ok_or_else(|| CrudError::internal("Cannot persist a user without an id"))?;
        let created_at = user.created_at.unwrap_or_else(Utc::now);

        Ok(Self {
            id: id.to_string(),
            name: user.name,
            email: user.email,
            google_id: user.google_id,
            image_url: user.image_url,
            created_at,
            updated_at: user.updated_at.unwrap_or(created_at),
            active: user.active.unwrap_or(true),
        })
    }
}

impl TryFrom<UserDocument> for User {
    type Error = CrudError;

    fn try_from(document: UserDocument) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&document.id).map_err(|e| {
            CrudError::internal(format!("Stored user id '{}' is invalid: {}", document.id, e))
        })?;

        Ok(Self {
            id: Some(id),
            name: document.name,
            email: document.email,
            google_id: document.google_id,
            image_url: document.image_url,
            created_at: Some(document.created_at),
            updated_at: Some(document.updated_at),
            active: Some(document.active),
        })
    }
}

fn map_mongo_error(err: mongodb::error::Error) -> CrudError {
    if let ErrorKind::Write(WriteFailure::WriteError(write_error)) = err.kind.as_ref() {
        if write_error.code == DUPLICATE_KEY {
            return CrudError::conflict("A user with this email already exists");
        }
    }
    CrudError::Internal(anyhow::Error::new(err))
}

fn contains_ignore_case(fragment: &str) -> Document {
    doc! { "$regex": regex::escape(fragment), "$options": "i" }
}

#[derive(Clone)]
pub struct MongoUserRepository {
    client: MongoClient,
    db: Database,
}

impl MongoUserRepository {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!(database = %database, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB: {}", e);
            AppError::DatabaseError(anyhow::Error::new(e))
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(Self { client, db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for user-service");

        let indexes = [
            IndexModel::builder()
                .keys(doc! { "email": 1 })
                .options(
                    IndexOptions::builder()
                        .name("email_unique".to_string())
                        .unique(true)
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "google_id": 1 })
                .options(
                    IndexOptions::builder()
                        .name("google_id_lookup".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "active": 1, "created_at": -1 })
                .options(
                    IndexOptions::builder()
                        .name("active_recent".to_string())
                        .build(),
                )
                .build(),
        ];

        self.users()
            .create_indexes(indexes, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create indexes on users collection: {}", e);
                AppError::DatabaseError(anyhow::Error::new(e))
            })?;
        tracing::info!("Created indexes on users.(email, google_id, active+created_at)");

        Ok(())
    }

    pub fn users(&self) -> Collection<UserDocument> {
        self.db.collection("users")
    }

    async fn find_many(&self, filter: Document, sort: Document) -> CrudResult<Vec<User>> {
        let options = FindOptions::builder().sort(sort).build();
        let mut cursor = self
            .users()
            .find(filter, options)
            .await
            .map_err(map_mongo_error)?;

        let mut users = Vec::new();
        while let Some(document) = cursor.try_next().await.map_err(map_mongo_error)? {
            users.push(User::try_from(document)?);
        }
        Ok(users)
    }

    async fn find_first(&self, filter: Document) -> CrudResult<Option<User>> {
        self.users()
            .find_one(filter, None)
            .await
            .map_err(map_mongo_error)?
            .map(User::try_from)
            .transpose()
    }

    async fn count(&self, filter: Document) -> CrudResult<u64> {
        self.users()
            .count_documents(filter, None)
            .await
            .map_err(map_mongo_error)
    }
}

#[async_trait]
impl Repository<User, Uuid> for MongoUserRepository {
    async fn find_all(&self) -> CrudResult<Vec<User>> {
        self.find_many(doc! {}, doc! { "created_at": 1 }).await
    }

    async fn find_by_id(&self, id: &Uuid) -> CrudResult<Option<User>> {
        self.find_first(doc! { "_id": id.to_string() }).await
    }

    async fn save(&self, user: User) -> CrudResult<User> {
        let document = UserDocument::try_from(user)?;
        let options = ReplaceOptions::builder().upsert(true).build();

        self.users()
            .replace_one(doc! { "_id": &document.id }, &document, options)
            .await
            .map_err(map_mongo_error)?;

        User::try_from(document)
    }

    async fn delete_by_id(&self, id: &Uuid) -> CrudResult<bool> {
        let result = self
            .users()
            .delete_one(doc! { "_id": id.to_string() }, None)
            .await
            .map_err(map_mongo_error)?;
        Ok(result.deleted_count > 0)
    }

    async fn exists_by_id(&self, id: &Uuid) -> CrudResult<bool> {
        Ok(self.count(doc! { "_id": id.to_string() }).await? > 0)
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn find_by_email(&self, email: &str) -> CrudResult<Option<User>> {
        self.find_first(doc! { "email": email }).await
    }

    async fn find_by_google_id(&self, google_id: &str) -> CrudResult<Option<User>> {
        self.find_first(doc! { "google_id": google_id }).await
    }

    async fn find_by_active(&self, active: bool) -> CrudResult<Vec<User>> {
        self.find_many(doc! { "active": active }, doc! { "created_at": 1 })
            .await
    }

    async fn find_active_newest_first(&self) -> CrudResult<Vec<User>> {
        self.find_many(doc! { "active": true }, doc! { "created_at": -1 })
            .await
    }

    async fn find_by_name_containing_and_active(
        &self,
        name: &str,
        active: bool,
    ) -> CrudResult<Vec<User>> {
        self.find_many(
            doc! { "name": contains_ignore_case(name), "active": active },
            doc! { "created_at": 1 },
        )
        .await
    }

    async fn find_by_email_containing(&self, fragment: &str) -> CrudResult<Vec<User>> {
        self.find_many(
            doc! { "email": contains_ignore_case(fragment) },
            doc! { "created_at": 1 },
        )
        .await
    }

    async fn exists_by_email(&self, email: &str) -> CrudResult<bool> {
        Ok(self.count(doc! { "email": email }).await? > 0)
    }

    async fn exists_by_google_id(&self, google_id: &str) -> CrudResult<bool> {
        Ok(self.count(doc! { "google_id": google_id }).await? > 0)
    }

    async fn count_by_active(&self, active: bool) -> CrudResult<u64> {
        self.count(doc! { "active": active }).await
    }

    async fn health_check(&self) -> CrudResult<()> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                map_mongo_error(e)
            })?;
        Ok(())
    }
}
