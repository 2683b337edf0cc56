//! Shared test helpers for integration tests.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use cloudstore_api::{AppState, build_app};
use cloudstore_auth::JwtEncoder;
use cloudstore_core::config::{AppConfig, DatabaseDriver};
use cloudstore_database::Stores;
use cloudstore_service::Services;

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Services behind the router, for setup shortcuts
    pub services: Services,
    /// Signs bearer tokens with the app's secret
    encoder: JwtEncoder,
}

/// A registered user and their bearer token
pub struct TestUser {
    /// User ID as a string
    pub id: String,
    /// Bearer token
    pub token: String,
}

impl TestApp {
    /// Create a new test application over empty in-memory stores
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.database.driver = DatabaseDriver::Memory;
        config.worker.enabled = false;
        config.auth.jwt_secret = "integration-test-secret".to_string();
        config.sharing.public_base_url = "https://drive.test".to_string();

        let services = Services::new(
            Stores::memory(),
            config.sharing.clone(),
            config.trash.clone(),
        );
        let encoder = JwtEncoder::new(&config.auth);
        let router = build_app(AppState::new(config, services.clone(), None));

        Self {
            router,
            services,
            encoder,
        }
    }

    /// Register a user and sign a token for them
    pub async fn user(&self, email: &str) -> TestUser {
        let user = self
            .services
            .users
            .register(email, email)
            .await
            .expect("Failed to register user");
        let (token, _) = self
            .encoder
            .generate_access_token(user.id, &user.email)
            .expect("Failed to sign token");
        TestUser {
            id: user.id.to_string(),
            token,
        }
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// POST /api/folders, returning the new folder's id
    pub async fn create_folder(&self, user: &TestUser, name: &str, parent: Option<&str>) -> String {
        let response = self
            .request(
                "POST",
                "/api/folders",
                Some(serde_json::json!({ "name": name, "parentId": parent })),
                Some(&user.token),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.id()
    }

    /// POST /api/files, returning the new file's id
    pub async fn create_file(&self, user: &TestUser, name: &str, folder: Option<&str>) -> String {
        let response = self
            .request(
                "POST",
                "/api/files",
                Some(serde_json::json!({
                    "name": name,
                    "folderId": folder,
                    "size": 42,
                    "mimeType": "text/plain",
                })),
                Some(&user.token),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.id()
    }

    /// POST /api/{kind}/{id}/share
    pub async fn share(
        &self,
        owner: &TestUser,
        kind: &str,
        id: &str,
        email: &str,
        permission: &str,
    ) -> TestResponse {
        self.request(
            "POST",
            &format!("/api/{kind}/{id}/share"),
            Some(serde_json::json!({ "email": email, "permission": permission })),
            Some(&owner.token),
        )
        .await
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// The enveloped payload
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    /// `data.id` as a string
    pub fn id(&self) -> String {
        self.data()["id"]
            .as_str()
            .expect("response has no data.id")
            .to_string()
    }

    /// Names of the items in a `data.items` listing
    pub fn item_names(&self) -> Vec<String> {
        self.data()["items"]
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|i| i["name"].as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The error code of a failed call
    pub fn error_code(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}
