//! Integration tests for the site backend.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use reqwest::{Client, Method};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tempfile::TempDir;

use crate::auth::Identity;
use crate::config::Config;
use crate::db::{init_database, Repository};
use crate::{create_router, AppState};

const ADMIN_EMAIL: &str = "owner@example.com";
const ADMIN_PASSWORD: &str = "hunter22";

fn test_config(overrides: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = HashMap::from([
        ("ADMIN_EMAILS".to_string(), format!("editor@example.com,{}", ADMIN_EMAIL)),
        ("ADMIN_PASSWORDS".to_string(), format!("other-pass,{}", ADMIN_PASSWORD)),
        ("JWT_SECRET".to_string(), "test-secret".to_string()),
        ("BIND_ADDR".to_string(), "127.0.0.1:0".to_string()),
        ("LOG_LEVEL".to_string(), "warn".to_string()),
    ]);
    for (key, value) in overrides {
        vars.insert(key.to_string(), value.to_string());
    }
    Config::from_lookup(|key| vars.get(key).cloned()).unwrap()
}

/// Test fixture for integration tests.
struct TestFixture {
    client: Client,
    base_url: String,
    state: AppState,
    pool: Option<SqlitePool>,
    _temp_dir: TempDir,
}

impl TestFixture {
    async fn new() -> Self {
        Self::with_config(test_config(&[]), true).await
    }

    async fn without_database() -> Self {
        Self::with_config(test_config(&[]), false).await
    }

    async fn with_config(config: Config, with_database: bool) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");

        let pool = if with_database {
            let url = format!("sqlite:{}", temp_dir.path().join("test.sqlite").display());
            Some(init_database(&url).await.expect("Failed to init DB"))
        } else {
            None
        };
        let repo = pool
            .clone()
            .map(|pool| Repository::new(pool, config.client_id));

        let state = AppState::new(config, repo);
        let app = create_router(state.clone());

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");
        let base_url = format!("http://{}", addr);

        // Spawn server
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait for server to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        TestFixture {
            client: Client::new(),
            base_url,
            state,
            pool,
            _temp_dir: temp_dir,
        }
    }

    /// Break the schema underneath the running server.
    async fn drop_table(&self, table: &str) {
        let pool = self.pool.as_ref().expect("fixture has a database");
        sqlx::query(&format!("DROP TABLE {}", table))
            .execute(pool)
            .await
            .unwrap();
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn admin_token(&self) -> String {
        self.state
            .tokens
            .issue(&Identity {
                email: ADMIN_EMAIL.to_string(),
                user_index: 1,
            })
            .unwrap()
    }

    async fn create_project(&self, body: Value) -> Value {
        let resp = self
            .client
            .post(self.url("/api/projects"))
            .bearer_auth(self.admin_token())
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 201);
        resp.json().await.unwrap()
    }

    async fn create_post(&self, body: Value) -> Value {
        let resp = self
            .client
            .post(self.url("/api/blog"))
            .bearer_auth(self.admin_token())
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 201);
        resp.json().await.unwrap()
    }

    async fn list(&self, path: &str, token: Option<&str>) -> Vec<Value> {
        let mut request = self.client.get(self.url(path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        let resp = request.send().await.unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        body.as_array().expect("list body is an array").clone()
    }
}

fn deck() -> Value {
    json!({
        "title": "Deck",
        "type": "Deck",
        "images": ["a.jpg"],
        "tags": ["Deck"],
        "location": "X",
        "completedDate": "May 2024",
        "description": "d"
    })
}

fn parse_time(value: &Value) -> DateTime<Utc> {
    value
        .as_str()
        .expect("timestamp string")
        .parse()
        .expect("RFC 3339 timestamp")
}

#[tokio::test]
async fn test_health_check() {
    let fixture = TestFixture::new().await;

    let resp = fixture.client.get(fixture.url("/health")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "connected");
    assert_eq!(body["projects"], 0);
    assert_eq!(body["blogPosts"], 0);

    fixture.create_project(deck()).await;
    fixture
        .create_post(json!({ "title": "Draft", "content": "wip" }))
        .await;

    let resp = fixture.client.get(fixture.url("/health")).send().await.unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["projects"], 1);
    assert_eq!(body["blogPosts"], 1);
}

#[tokio::test]
async fn test_health_check_database_unavailable() {
    let fixture = TestFixture::new().await;
    fixture.drop_table("blog_posts").await;

    let resp = fixture.client.get(fixture.url("/health")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["database"], "unavailable");
    assert!(body.get("projects").is_none());
}

#[tokio::test]
async fn test_cors_headers_on_success_and_error() {
    let fixture = TestFixture::new().await;

    for (path, status) in [("/api/projects", 200), ("/api/nowhere", 404)] {
        let resp = fixture.client.get(fixture.url(path)).send().await.unwrap();
        assert_eq!(resp.status(), status);
        let headers = resp.headers();
        assert_eq!(headers["access-control-allow-origin"], "*");
        assert_eq!(
            headers["access-control-allow-headers"],
            "Content-Type, Authorization"
        );
        assert_eq!(
            headers["access-control-allow-methods"],
            "GET, POST, PUT, DELETE, OPTIONS"
        );
    }
}

#[tokio::test]
async fn test_preflight() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .request(Method::OPTIONS, fixture.url("/api/projects/5"))
        .header("Origin", "https://example.com")
        .header("Access-Control-Request-Method", "PUT")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["access-control-allow-origin"], "*");
    assert!(resp.text().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_login_and_verify() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .post(fixture.url("/api/auth"))
        .json(&json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["email"], ADMIN_EMAIL);
    assert_eq!(body["expiresIn"], "7d");
    let token = body["token"].as_str().unwrap();

    let resp = fixture
        .client
        .get(fixture.url("/api/verify"))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["valid"], true);
    assert_eq!(body["user"]["email"], ADMIN_EMAIL);
    assert_eq!(body["user"]["role"], "admin");
    assert_eq!(body["user"]["userIndex"], 1);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .post(fixture.url("/api/auth"))
        .json(&json!({ "email": ADMIN_EMAIL, "password": "other-pass" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Invalid credentials");
    assert!(body.get("token").is_none());
}

#[tokio::test]
async fn test_login_mismatched_configuration() {
    let config = test_config(&[("ADMIN_PASSWORDS", ADMIN_PASSWORD)]);
    let fixture = TestFixture::with_config(config, true).await;

    let resp = fixture
        .client
        .post(fixture.url("/api/auth"))
        .json(&json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 500);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Server configuration error");
    assert!(body.get("details").is_none());
}

#[tokio::test]
async fn test_login_with_blank_admin_variables() {
    let config = test_config(&[("ADMIN_EMAILS", ""), ("ADMIN_PASSWORDS", "")]);
    let fixture = TestFixture::with_config(config, true).await;

    for body in [json!({}), json!({ "email": "", "password": "" })] {
        let resp = fixture
            .client
            .post(fixture.url("/api/auth"))
            .json(&body)
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), 401);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["error"], "Invalid credentials");
        assert!(body.get("token").is_none());
    }

    // Blank variables fall back to the default admin
    let resp = fixture
        .client
        .post(fixture.url("/api/auth"))
        .json(&json!({ "email": "admin@example.com", "password": "changeme" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn test_login_method_not_allowed() {
    let fixture = TestFixture::new().await;

    let resp = fixture.client.get(fixture.url("/api/auth")).send().await.unwrap();
    assert_eq!(resp.status(), 405);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Method not allowed");
}

#[tokio::test]
async fn test_verify_rejects_missing_and_bad_tokens() {
    let fixture = TestFixture::new().await;

    let resp = fixture.client.get(fixture.url("/api/verify")).send().await.unwrap();
    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "No token provided");

    let foreign = crate::auth::TokenService::new("another-secret")
        .issue(&Identity {
            email: ADMIN_EMAIL.to_string(),
            user_index: 1,
        })
        .unwrap();
    for token in ["garbage", foreign.as_str()] {
        let resp = fixture
            .client
            .get(fixture.url("/api/verify"))
            .bearer_auth(token)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 401);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["error"], "Invalid token");
    }
}

#[tokio::test]
async fn test_create_project_scenario() {
    let fixture = TestFixture::new().await;
    fixture
        .create_project(json!({ "title": "Older", "type": "Kitchen", "images": ["k.jpg"] }))
        .await;

    let body = fixture.create_project(deck()).await;
    assert_eq!(body["success"], true);
    let project = &body["project"];
    assert!(project["id"].is_i64());
    for field in ["title", "type", "images", "tags", "location", "completedDate", "description"] {
        assert_eq!(project[field], deck()[field], "field {field}");
    }
    assert!(project["createdAt"].is_string());
    assert!(project["updatedAt"].is_string());

    let projects = fixture.list("/api/projects", None).await;
    assert_eq!(projects.len(), 2);
    assert_eq!(projects[0]["id"], project["id"]);
    assert_eq!(projects[0]["title"], "Deck");
}

#[tokio::test]
async fn test_project_crud() {
    let fixture = TestFixture::new().await;
    let token = fixture.admin_token();

    let created = fixture.create_project(deck()).await;
    let id = created["project"]["id"].as_i64().unwrap();

    // Get project
    let resp = fixture
        .client
        .get(fixture.url(&format!("/api/projects/{}", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["project"]["title"], "Deck");

    // Update project (tags omitted fall back to the type)
    let resp = fixture
        .client
        .put(fixture.url(&format!("/api/projects/{}", id)))
        .bearer_auth(&token)
        .json(&json!({
            "title": "Cedar deck",
            "type": "Outdoor",
            "images": ["b.jpg", "a.jpg"]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["project"]["title"], "Cedar deck");
    assert_eq!(body["project"]["tags"], json!(["Outdoor"]));
    assert_eq!(body["project"]["location"], Value::Null);
    assert_eq!(body["project"]["images"][0], "b.jpg");

    // Delete project
    let resp = fixture
        .client
        .delete(fixture.url(&format!("/api/projects/{}", id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);

    // Verify deleted
    let resp = fixture
        .client
        .get(fixture.url(&format!("/api/projects/{}", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn test_update_missing_project() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .put(fixture.url("/api/projects/999999"))
        .bearer_auth(fixture.admin_token())
        .json(&deck())
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Project not found");
}

#[tokio::test]
async fn test_delete_missing_project_keeps_collection() {
    let fixture = TestFixture::new().await;
    fixture.create_project(deck()).await;

    let resp = fixture
        .client
        .delete(fixture.url("/api/projects/999999"))
        .bearer_auth(fixture.admin_token())
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 404);
    assert_eq!(fixture.list("/api/projects", None).await.len(), 1);
}

#[tokio::test]
async fn test_project_writes_require_auth() {
    let fixture = TestFixture::new().await;
    let expired = fixture
        .state
        .tokens
        .issue_with_ttl(
            &Identity {
                email: ADMIN_EMAIL.to_string(),
                user_index: 1,
            },
            Duration::hours(-1),
        )
        .unwrap();

    // No token
    let resp = fixture
        .client
        .post(fixture.url("/api/projects"))
        .json(&deck())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);

    // Expired token
    let resp = fixture
        .client
        .post(fixture.url("/api/projects"))
        .bearer_auth(&expired)
        .json(&deck())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);

    // Auth is checked before the payload
    let resp = fixture
        .client
        .post(fixture.url("/api/projects"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);

    assert!(fixture.list("/api/projects", None).await.is_empty());
}

#[tokio::test]
async fn test_project_validation_errors() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .post(fixture.url("/api/projects"))
        .bearer_auth(fixture.admin_token())
        .json(&json!({ "title": " ", "type": "Deck", "images": [], "tags": "Deck" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Validation failed");
    assert_eq!(
        body["issues"],
        json!([
            "Title is required",
            "At least one image is required",
            "Tags must be an array of strings"
        ])
    );

    // Malformed JSON
    let resp = fixture
        .client
        .post(fixture.url("/api/projects"))
        .bearer_auth(fixture.admin_token())
        .header("Content-Type", "application/json")
        .body("{\"title\":")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    assert!(fixture.list("/api/projects", None).await.is_empty());
}

#[tokio::test]
async fn test_non_numeric_id() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/api/projects/abc"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Project id must be a number");
}

#[tokio::test]
async fn test_undecodable_path_id() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/api/projects/%FF"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    assert_eq!(resp.headers()["content-type"], "application/json");
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["code"], "BAD_REQUEST");
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_data_uri_image_upload() {
    let fixture = TestFixture::new().await;
    let photo = format!("data:image/jpeg;base64,{}", "A".repeat(3 * 1024 * 1024));

    let body = fixture
        .create_project(json!({
            "title": "Bathroom",
            "type": "Bathroom",
            "images": [photo.clone(), "b.jpg"]
        }))
        .await;

    assert_eq!(body["project"]["images"][0].as_str(), Some(photo.as_str()));
}

#[tokio::test]
async fn test_oversized_body_is_json_413() {
    let config = test_config(&[("MAX_BODY_BYTES", "1024")]);
    let fixture = TestFixture::with_config(config, true).await;

    let resp = fixture
        .client
        .post(fixture.url("/api/projects"))
        .bearer_auth(fixture.admin_token())
        .json(&json!({
            "title": "Deck",
            "type": "Deck",
            "images": ["A".repeat(4096)]
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 413);
    assert_eq!(resp.headers()["access-control-allow-origin"], "*");
    assert_eq!(resp.headers()["content-type"], "application/json");
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["code"], "PAYLOAD_TOO_LARGE");
    assert_eq!(body["error"], "Request body is too large");

    assert!(fixture.list("/api/projects", None).await.is_empty());
}

#[tokio::test]
async fn test_storage_fault_hides_detail_from_public() {
    let fixture = TestFixture::new().await;
    fixture.drop_table("projects").await;

    let resp = fixture
        .client
        .get(fixture.url("/api/projects"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 500);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Internal server error");
    assert_eq!(body["code"], "DATABASE_ERROR");
    assert!(body.get("details").is_none());
}

#[tokio::test]
async fn test_storage_fault_detail_for_admin_outside_production() {
    let fixture = TestFixture::new().await;
    fixture.drop_table("projects").await;

    let resp = fixture
        .client
        .post(fixture.url("/api/projects"))
        .bearer_auth(fixture.admin_token())
        .json(&deck())
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 500);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Internal server error");
    assert!(body["details"].as_str().unwrap().contains("projects"));
}

#[tokio::test]
async fn test_storage_fault_detail_hidden_in_production() {
    let config = test_config(&[("APP_ENV", "production")]);
    let fixture = TestFixture::with_config(config, true).await;
    fixture.drop_table("projects").await;

    let resp = fixture
        .client
        .post(fixture.url("/api/projects"))
        .bearer_auth(fixture.admin_token())
        .json(&deck())
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 500);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Internal server error");
    assert!(body.get("details").is_none());
}

#[tokio::test]
async fn test_blog_publish_on_create() {
    let fixture = TestFixture::new().await;
    let before = Utc::now() - Duration::seconds(5);

    let post = fixture
        .create_post(json!({
            "title": "We're hiring",
            "content": "Join the crew.",
            "published": true
        }))
        .await;

    assert!(post["id"].is_i64());
    assert_eq!(post["published"], true);
    assert_eq!(post["author"], "Redemption Renovations");
    let published_at = parse_time(&post["published_at"]);
    assert!(published_at >= before);
    assert!(published_at <= Utc::now() + Duration::seconds(5));
    assert!(published_at >= parse_time(&post["created_at"]));
}

#[tokio::test]
async fn test_blog_public_listing_hides_drafts() {
    let fixture = TestFixture::new().await;
    let token = fixture.admin_token();

    let draft = fixture
        .create_post(json!({ "title": "Draft", "content": "wip" }))
        .await;
    assert_eq!(draft["published"], false);
    assert_eq!(draft["published_at"], Value::Null);
    fixture
        .create_post(json!({ "title": "Live", "content": "done", "published": true }))
        .await;

    let public = fixture.list("/api/blog", None).await;
    assert_eq!(public.len(), 1);
    assert!(public.iter().all(|p| p["published"] == true));

    // An invalid token reads as anonymous
    let public = fixture.list("/api/blog", Some("garbage")).await;
    assert_eq!(public.len(), 1);

    let admin = fixture.list("/api/blog", Some(&token)).await;
    assert_eq!(admin.len(), 2);

    // Drafts are hidden individually too
    let draft_url = fixture.url(&format!("/api/blog/{}", draft["id"]));
    let resp = fixture.client.get(&draft_url).send().await.unwrap();
    assert_eq!(resp.status(), 404);
    let resp = fixture
        .client
        .get(&draft_url)
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn test_blog_published_at_survives_republish() {
    let fixture = TestFixture::new().await;
    let token = fixture.admin_token();

    let draft = fixture
        .create_post(json!({ "title": "Draft", "content": "wip" }))
        .await;
    let url = fixture.url(&format!("/api/blog/{}", draft["id"]));

    let mut stamps = Vec::new();
    for published in [true, false, true] {
        let resp = fixture
            .client
            .put(&url)
            .bearer_auth(&token)
            .json(&json!({ "title": "Draft", "content": "wip", "published": published }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["published"], published);
        stamps.push(body["published_at"].clone());
    }

    assert!(stamps[0].is_string());
    assert!(stamps.iter().all(|s| *s == stamps[0]));
}

#[tokio::test]
async fn test_blog_delete() {
    let fixture = TestFixture::new().await;
    let token = fixture.admin_token();
    let post = fixture
        .create_post(json!({ "title": "Old news", "content": "x", "published": true }))
        .await;
    let url = fixture.url(&format!("/api/blog/{}", post["id"]));

    let resp = fixture.client.delete(&url).bearer_auth(&token).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["deleted"]["title"], "Old news");

    let resp = fixture.client.delete(&url).bearer_auth(&token).send().await.unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Post not found");
}

#[tokio::test]
async fn test_blog_validation() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .post(fixture.url("/api/blog"))
        .bearer_auth(fixture.admin_token())
        .json(&json!({ "title": "No body", "images": "a.jpg" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body["issues"],
        json!(["Content is required", "Images must be an array of strings"])
    );
    assert!(fixture
        .list("/api/blog", Some(&fixture.admin_token()))
        .await
        .is_empty());
}

#[tokio::test]
async fn test_database_not_configured() {
    let fixture = TestFixture::without_database().await;

    assert!(fixture.list("/api/projects", None).await.is_empty());
    assert!(fixture.list("/api/blog", None).await.is_empty());

    let resp = fixture
        .client
        .post(fixture.url("/api/projects"))
        .bearer_auth(fixture.admin_token())
        .json(&deck())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 503);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Database not configured"));

    let resp = fixture
        .client
        .get(fixture.url("/api/projects/1"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 503);

    let resp = fixture.client.get(fixture.url("/health")).send().await.unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["database"], "not_configured");
}

#[tokio::test]
async fn test_routing_errors() {
    let fixture = TestFixture::new().await;

    let resp = fixture.client.get(fixture.url("/api/widgets")).send().await.unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Not found");

    let resp = fixture
        .client
        .patch(fixture.url("/api/projects"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 405);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Method not allowed");
}

#[tokio::test]
async fn test_legacy_prefix() {
    let fixture = TestFixture::new().await;
    fixture.create_project(deck()).await;

    let projects = fixture.list("/.netlify/functions/projects", None).await;
    assert_eq!(projects.len(), 1);
}

#[tokio::test]
async fn test_retired_cars_endpoint() {
    let fixture = TestFixture::new().await;

    let resp = fixture.client.get(fixture.url("/api/cars")).send().await.unwrap();
    assert_eq!(resp.status(), 410);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "This endpoint has been retired.");
    assert!(body["details"].as_str().unwrap().contains("/api/projects"));
}
