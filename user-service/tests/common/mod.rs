#![allow(dead_code)]

use reqwest::{Client, Response};
use serde_json::{json, Value};
use user_service::config::UserServiceConfig;
use user_service::startup::{AppState, Application};

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub client: Client,
    pub state: AppState,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let config = UserServiceConfig::in_memory();

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let state = app.state().clone();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to accept connections
        let client = Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            client,
            state,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/api/users{}", self.address, path)
    }

    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn put(&self, path: &str, body: Option<Value>) -> Response {
        let request = self.client.put(self.url(path));
        let request = match body {
            Some(body) => request.json(&body),
            None => request,
        };
        request.send().await.expect("Failed to execute request")
    }

    pub async fn delete(&self, path: &str) -> Response {
        self.client
            .delete(self.url(path))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn create_user(&self, body: Value) -> Response {
        self.client
            .post(self.url(""))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Create a user through the API and return its id.
    pub async fn seed_user(&self, name: &str, email: &str) -> String {
        let response = self
            .create_user(json!({ "name": name, "email": email }))
            .await;
        assert_eq!(response.status().as_u16(), 201, "seeding {} failed", email);

        self.id_of(email).await
    }

    /// DTOs carry no id, so ids are resolved through the service.
    pub async fn id_of(&self, email: &str) -> String {
        self.state
            .users
            .find_by_email(email)
            .await
            .expect("Failed to query users")
            .and_then(|user| user.id)
            .expect("User not stored")
            .to_string()
    }
}

pub async fn json_body(response: Response) -> Value {
    response.json().await.expect("Failed to parse JSON")
}
