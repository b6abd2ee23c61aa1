//! HTTP binding for [`BaseCrudResource`].
//!
//! ```text
//! GET    /        -> list
//! GET    /:id     -> get
//! POST   /        -> create
//! PUT    /:id     -> update
//! DELETE /:id     -> delete
//! ```
//!
//! Mount the router under the resource prefix with `Router::nest`.

use std::fmt::Display;
use std::sync::Arc;

use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{de::DeserializeOwned, Serialize};
use validator::Validate;

use super::resource::{BaseCrudResource, CrudOutcome, CrudResponse};
use crate::error::AppError;
use crate::utils::validation::ValidatedJson;

impl From<CrudOutcome> for StatusCode {
    fn from(outcome: CrudOutcome) -> Self {
        match outcome {
            CrudOutcome::Ok => StatusCode::OK,
            CrudOutcome::Created => StatusCode::CREATED,
            CrudOutcome::BadRequest => StatusCode::BAD_REQUEST,
            CrudOutcome::NotFound => StatusCode::NOT_FOUND,
            CrudOutcome::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl<T: Serialize> IntoResponse for CrudResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::from(self.outcome), Json(self.body)).into_response()
    }
}

type SharedResource<E, D, ID> = Arc<BaseCrudResource<E, D, ID>>;

pub fn crud_router<E, D, ID, S>(resource: SharedResource<E, D, ID>) -> Router<S>
where
    E: Send + Sync + 'static,
    D: Serialize + DeserializeOwned + Validate + Send + Sync + 'static,
    ID: Display + DeserializeOwned + Send + Sync + 'static,
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(list::<E, D, ID>).post(create::<E, D, ID>))
        .route(
            "/:id",
            get(get_one::<E, D, ID>)
                .put(update::<E, D, ID>)
                .delete(delete::<E, D, ID>),
        )
        .with_state(resource)
}

/// Unwrap a path identifier, turning a malformed segment into a 400 envelope.
pub fn path_id<ID>(id: Result<Path<ID>, PathRejection>) -> Result<ID, AppError> {
    id.map(|Path(id)| id)
        .map_err(|rejection| AppError::BadRequest(anyhow::anyhow!("Invalid id: {}", rejection)))
}

async fn list<E, D, ID>(State(resource): State<SharedResource<E, D, ID>>) -> CrudResponse<Vec<D>>
where
    E: Send + Sync + 'static,
    D: Send + Sync + 'static,
    ID: Display + Send + Sync + 'static,
{
    resource.list().await
}

async fn get_one<E, D, ID>(
    State(resource): State<SharedResource<E, D, ID>>,
    id: Result<Path<ID>, PathRejection>,
) -> Result<CrudResponse<D>, AppError>
where
    E: Send + Sync + 'static,
    D: Send + Sync + 'static,
    ID: Display + DeserializeOwned + Send + Sync + 'static,
{
    let id = path_id(id)?;
    Ok(resource.get(id).await)
}

async fn create<E, D, ID>(
    State(resource): State<SharedResource<E, D, ID>>,
    ValidatedJson(dto): ValidatedJson<D>,
) -> CrudResponse<D>
where
    E: Send + Sync + 'static,
    D: Send + Sync + 'static,
    ID: Display + Send + Sync + 'static,
{
    resource.create(dto).await
}

async fn update<E, D, ID>(
    State(resource): State<SharedResource<E, D, ID>>,
    id: Result<Path<ID>, PathRejection>,
    ValidatedJson(dto): ValidatedJson<D>,
) -> Result<CrudResponse<D>, AppError>
where
    E: Send + Sync + 'static,
    D: Send + Sync + 'static,
    ID: Display + DeserializeOwned + Send + Sync + 'static,
{
    let id = path_id(id)?;
    Ok(resource.update(id, dto).await)
}

async fn delete<E, D, ID>(
    State(resource): State<SharedResource<E, D, ID>>,
    id: Result<Path<ID>, PathRejection>,
) -> Result<CrudResponse<()>, AppError>
where
    E: Send + Sync + 'static,
    D: Send + Sync + 'static,
    ID: Display + DeserializeOwned + Send + Sync + 'static,
{
    let id = path_id(id)?;
    Ok(resource.delete(id).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crud::{CrudError, CrudResult, CrudService, Mapper};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use serde::Deserialize;
    use serde_json::{json, Value};
    use std::collections::BTreeMap;
    use std::sync::Mutex;
    use tower::util::ServiceExt;

    #[derive(Debug, Clone)]
    struct Label {
        id: u64,
        text: String,
    }

    #[derive(Debug, Clone, Serialize, Deserialize, Validate)]
    struct LabelDto {
        #[validate(length(min = 1, max = 10, message = "Text must be 1-10 characters"))]
        text: String,
    }

    #[derive(Default)]
    struct Labels(Mutex<BTreeMap<u64, Label>>);

    #[async_trait]
    impl CrudService<Label, u64> for Labels {
        async fn find_all(&self) -> CrudResult<Vec<Label>> {
            Ok(self.0.lock().unwrap().values().cloned().collect())
        }

        async fn find_by_id(&self, id: &u64) -> CrudResult<Option<Label>> {
            Ok(self.0.lock().unwrap().get(id).cloned())
        }

        async fn save(&self, mut entity: Label) -> CrudResult<Label> {
            let mut rows = self.0.lock().unwrap();
            entity.id = rows.len() as u64 + 1;
            rows.insert(entity.id, entity.clone());
            Ok(entity)
        }

        async fn update(&self, id: &u64, entity: Label) -> CrudResult<Label> {
            let mut rows = self.0.lock().unwrap();
            let row = rows
                .get_mut(id)
                .ok_or_else(|| CrudError::not_found("missing"))?;
            row.text = entity.text;
            Ok(row.clone())
        }

        async fn delete_by_id(&self, id: &u64) -> CrudResult<()> {
            self.0
                .lock()
                .unwrap()
                .remove(id)
                .map(|_| ())
                .ok_or_else(|| CrudError::not_found("missing"))
        }

        async fn exists_by_id(&self, id: &u64) -> CrudResult<bool> {
            Ok(self.0.lock().unwrap().contains_key(id))
        }
    }

    struct LabelMapper;

    impl Mapper<Label, LabelDto> for LabelMapper {
        fn to_dto(&self, entity: &Label) -> LabelDto {
            LabelDto {
                text: entity.text.clone(),
            }
        }

        fn to_entity(&self, dto: &LabelDto) -> Label {
            Label {
                id: 0,
                text: dto.text.clone(),
            }
        }

        fn update_entity_from_dto(&self, entity: &mut Label, dto: &LabelDto) {
            entity.text = dto.text.clone();
        }
    }

    fn app() -> Router {
        let resource = BaseCrudResource::<Label, LabelDto, u64>::new(
            Arc::new(Labels::default()),
            Arc::new(LabelMapper),
        )
        .with_entity_name("Label");
        Router::new().nest("/labels", crud_router(Arc::new(resource)))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        let request = match body {
            Some(body) => builder.body(Body::from(body.to_string())).unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn routes_map_outcomes_to_status_codes() {
        let app = app();

        let (status, body) = send(&app, "POST", "/labels", Some(json!({ "text": "urgent" }))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Label created successfully");
        assert_eq!(body["data"]["text"], "urgent");

        let (status, body) = send(&app, "GET", "/labels", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let (status, body) = send(&app, "PUT", "/labels/1", Some(json!({ "text": "later" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["text"], "later");

        let (status, body) = send(&app, "DELETE", "/labels/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], Value::Null);

        let (status, body) = send(&app, "GET", "/labels/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Label not found with id: 1");
    }

    #[tokio::test]
    async fn invalid_body_yields_field_map() {
        let app = app();

        let (status, body) = send(&app, "POST", "/labels", Some(json!({ "text": "" }))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["data"]["text"], "Text must be 1-10 characters");
    }

    #[tokio::test]
    async fn malformed_id_is_bad_request() {
        let app = app();

        let (status, body) = send(&app, "GET", "/labels/not-a-number", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().unwrap().starts_with("Invalid id"));
    }
}
