//! Integration test harness: runs the real router on an ephemeral port and
//! talks to it over HTTP with a cookie-keeping client.
#![allow(dead_code)]

use std::{net::TcpListener, path::PathBuf, sync::Arc, sync::Once};

use axum::Server;
use axum_rbac_todo::{
    create_app,
    model::TodoItem,
    rbac::{Rbac, RolesSpec},
    AppState,
};
use serde_json::{json, Value};

static TRACING: Once = Once::new();

fn init_tracing() {
    TRACING.call_once(|| {
        let level = if std::env::var("TEST_LOG").is_ok() {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        };
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_test_writer()
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    });
}

fn manifest_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(relative)
}

pub fn shipped_rbac() -> Rbac {
    let source = std::fs::read_to_string(manifest_path("roles.yaml")).expect("roles.yaml");
    Rbac::setup(RolesSpec::from_yaml(&source).expect("valid roles spec")).expect("valid rules")
}

pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with_state(AppState::new(shipped_rbac())).await
}

pub async fn spawn_app_with_state(state: AppState) -> TestApp {
    init_tracing();

    let app = create_app(
        Arc::new(state),
        manifest_path("www"),
        "http://localhost:3000",
    );

    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let server = Server::from_tcp(listener)
        .expect("Failed to adopt listener")
        .serve(app.into_make_service());
    tokio::spawn(async move {
        server.await.expect("server error");
    });

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        api_client: new_client(),
    }
}

pub fn new_client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .unwrap()
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// Same server, separate cookie jar.
    pub fn with_new_client(&self) -> TestApp {
        TestApp {
            address: self.address.clone(),
            api_client: new_client(),
        }
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.api_client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_signup(&self, username: &str, password: &str) -> reqwest::Response {
        self.api_client
            .post(self.url("/signup"))
            .json(&json!({"username": username, "password": password}))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_signin(&self, username: &str, password: &str) -> reqwest::Response {
        self.api_client
            .post(self.url("/signin"))
            .json(&json!({"username": username, "password": password}))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Registers and signs in, asserting both succeed.
    pub async fn sign_in_as(&self, username: &str, password: &str) {
        assert_eq!(self.post_signup(username, password).await.status(), 200);
        assert_eq!(self.post_signin(username, password).await.status(), 200);
    }

    pub async fn logout(&self) -> reqwest::Response {
        self.api_client
            .post(self.url("/logout"))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_perms(&self) -> Vec<String> {
        let body: Value = self.get("/perms").await.json().await.unwrap();
        serde_json::from_value(body["perms"].clone()).unwrap()
    }

    pub async fn get_todos(&self) -> reqwest::Response {
        self.get("/todos").await
    }

    pub async fn todo_list(&self) -> Vec<TodoItem> {
        let response = self.get_todos().await;
        assert_eq!(response.status(), 200);
        response.json().await.unwrap()
    }

    pub async fn post_todo(&self, text: &str) -> reqwest::Response {
        self.api_client
            .post(self.url("/todos"))
            .json(&json!({ "text": text }))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn put_todo(&self, id: &str, body: &Value) -> reqwest::Response {
        self.api_client
            .put(self.url(&format!("/todos/{}", id)))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn delete_todo(&self, id: &str) -> reqwest::Response {
        self.api_client
            .delete(self.url(&format!("/todos/{}", id)))
            .send()
            .await
            .expect("Failed to execute request.")
    }
}
