use std::net::SocketAddr;
use std::sync::Arc;

use reqwest::Client;
use sea_orm::DatabaseConnection;
use serde_json::Value;
use tempfile::TempDir;

use ideas_server::config::{
    AppConfig, AuthConfig, CorsConfig, DatabaseConfig, PaginationConfig, ServerConfig,
};
use ideas_server::identity::JwtIdentityResolver;
use ideas_server::state::AppState;
use ideas_server::utils::jwt;

pub const JWT_SECRET: &str = "test-secret-for-integration-tests";

pub mod routes {
    pub const IDEAS: &str = "/api/v1/ideas";
    pub const USER_STATS: &str = "/api/v1/users/stats";
    pub const ME: &str = "/api/v1/users/me";
    pub const OPENAPI: &str = "/api-docs/openapi.json";

    pub fn idea(id: i32) -> String {
        format!("/api/v1/ideas/{id}")
    }

    pub fn ideas_page(page: &str, limit: &str) -> String {
        format!("/api/v1/ideas?page={page}&limit={limit}")
    }

    pub fn comments(idea_id: i32) -> String {
        format!("/api/v1/ideas/{idea_id}/comments")
    }

    pub fn comment(idea_id: i32, comment_id: i32) -> String {
        format!("/api/v1/ideas/{idea_id}/comments/{comment_id}")
    }

    pub fn like(idea_id: i32) -> String {
        format!("/api/v1/ideas/{idea_id}/like")
    }
}

/// A running test server backed by a throwaway SQLite file.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub db: DatabaseConnection,
    _dir: TempDir,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_url = format!("sqlite://{}?mode=rwc", dir.path().join("ideas.db").display());

        let db = ideas_server::database::init_db(&db_url, 5)
            .await
            .expect("Failed to initialize test database");
        ideas_server::seed::ensure_indexes(&db)
            .await
            .expect("Failed to create indexes");

        let app_config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors: CorsConfig {
                    allow_origins: vec![],
                    max_age: 3600,
                },
            },
            database: DatabaseConfig {
                url: db_url,
                max_connections: 5,
            },
            auth: AuthConfig {
                jwt_secret: JWT_SECRET.to_string(),
            },
            pagination: PaginationConfig::default(),
        };

        let state = AppState {
            db: db.clone(),
            identity: Arc::new(JwtIdentityResolver::new(JWT_SECRET)),
            config: app_config,
        };

        let app = ideas_server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            db,
            _dir: dir,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// A session token for `user_id`, as the identity provider would issue it.
    pub fn token_for(&self, user_id: i32, name: &str) -> String {
        jwt::sign(
            user_id,
            Some(name),
            None,
            JWT_SECRET,
            chrono::Duration::hours(1),
        )
        .expect("Failed to sign test token")
    }

    pub async fn post_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn post_without_token(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn get_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn get_without_token(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn patch_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        let res = self
            .client
            .patch(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await
            .expect("Failed to send PATCH request");

        TestResponse::from_response(res).await
    }

    pub async fn put_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        let res = self
            .client
            .put(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await
            .expect("Failed to send PUT request");

        TestResponse::from_response(res).await
    }

    pub async fn delete_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .delete(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send DELETE request");

        TestResponse::from_response(res).await
    }

    pub async fn delete_without_token(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .delete(self.url(path))
            .send()
            .await
            .expect("Failed to send DELETE request");

        TestResponse::from_response(res).await
    }

    /// Create an idea via the API and return its `id`.
    pub async fn create_idea(&self, token: &str, title: &str) -> i32 {
        let res = self
            .post_with_token(
                routes::IDEAS,
                &serde_json::json!({
                    "title": title,
                    "description": "An idea worth building.",
                    "skills": ["rust"],
                    "industries": ["software"],
                }),
                token,
            )
            .await;
        assert_eq!(res.status, 201, "create_idea failed: {}", res.text);
        res.id()
    }

    /// Add a comment via the API and return its `id`.
    pub async fn create_comment(&self, idea_id: i32, token: &str, content: &str) -> i32 {
        let res = self
            .post_with_token(
                &routes::comments(idea_id),
                &serde_json::json!({ "content": content }),
                token,
            )
            .await;
        assert_eq!(res.status, 201, "create_comment failed: {}", res.text);
        res.id()
    }

    /// Toggle the like via the API and return the resulting state.
    pub async fn toggle_like(&self, idea_id: i32, token: &str) -> bool {
        let res = self
            .post_with_token(&routes::like(idea_id), &serde_json::json!({}), token)
            .await;
        assert_eq!(res.status, 200, "toggle_like failed: {}", res.text);
        res.body["liked"]
            .as_bool()
            .expect("toggle response should contain 'liked'")
    }
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let text = res.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self { status, text, body }
    }

    pub fn id(&self) -> i32 {
        self.body["id"]
            .as_i64()
            .expect("response body should contain 'id'") as i32
    }
}
