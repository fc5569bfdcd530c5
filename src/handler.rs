use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde_json::json;

use crate::{
    error::{AppError, AppResult},
    middleware::{identify, MemberSession, SESSION_COOKIE},
    model::{Caller, SessionToken, TodoItem},
    schema::{CreateTodoSchema, CredentialsSchema, PermsResponse, UpdateTodoSchema},
    shell::MenuResponse,
    AppState,
};

// Handler for the health checker route
pub async fn health_checker_handler() -> impl IntoResponse {
    const MESSAGE: &str = "RBAC TODO demo with Rust and Axum";

    Json(json!({
        "status": "success",
        "message": MESSAGE
    }))
}

// Permissions of the caller's current role
pub async fn get_perms(
    State(data): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
) -> Json<PermsResponse> {
    let perms = data.rbac.resolve(&caller.role).into_iter().collect();
    Json(PermsResponse { perms })
}

// Route table of the browser shell, filtered by the caller's permissions
pub async fn get_menu(
    State(data): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
) -> Json<MenuResponse> {
    Json(MenuResponse::new(data.rbac.resolve(&caller.role)))
}

pub async fn signup(
    State(data): State<Arc<AppState>>,
    body: Result<Json<CredentialsSchema>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(body) = body?;

    if body.username.is_empty() {
        return Err(AppError::bad_request("Username is required"));
    }
    if body.username.contains(':') {
        return Err(AppError::bad_request("Username must not contain ':'"));
    }
    if data.users.exists(&body.username).await {
        return Err(AppError::bad_request("User already exists"));
    }
    if body.password.is_empty() {
        return Err(AppError::bad_request("Password is required"));
    }
    data.users.register(&body.username, &body.password).await?;

    tracing::info!(username = %body.username, "user registered");
    Ok((
        StatusCode::OK,
        Json(json!({"status": "success", "message": "Registration completed"})),
    ))
}

pub async fn signin(
    State(data): State<Arc<AppState>>,
    jar: CookieJar,
    body: Result<Json<CredentialsSchema>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(body) = body?;

    if body.username.is_empty() {
        return Err(AppError::bad_request("Username is required"));
    }
    if body.password.is_empty() {
        return Err(AppError::bad_request("Password is required"));
    }
    if !data.users.verify(&body.username, &body.password).await {
        tracing::debug!(username = %body.username, "signin rejected");
        return Err(AppError::Unauthorized);
    }

    let token = SessionToken::from_credentials(&body.username, &body.password);
    if data.sessions.open(&token).await {
        tracing::info!(username = %body.username, "session opened");
    }

    let cookie = Cookie::build(SESSION_COOKIE, token.to_cookie_value())
        .path("/")
        .http_only(true)
        .finish();
    Ok((
        jar.add(cookie),
        Json(json!({"status": "success", "message": "Signed in"})),
    ))
}

// Open to every caller so that a cookie outliving its session still gets cleared
pub async fn logout(State(data): State<Arc<AppState>>, jar: CookieJar) -> impl IntoResponse {
    let caller = identify(&data, &jar).await;
    if let Some(token) = &caller.session {
        data.sessions.close(token).await;
        tracing::info!("session closed");
    }

    let mut removal = Cookie::named(SESSION_COOKIE);
    removal.set_path("/");
    (
        jar.remove(removal),
        Json(json!({"status": "success", "message": "Signed out"})),
    )
}

// Handler for getting all Todo items of the session
pub async fn get_todos(
    State(data): State<Arc<AppState>>,
    MemberSession(token): MemberSession,
) -> AppResult<Json<Vec<TodoItem>>> {
    Ok(Json(data.sessions.todos(&token).await?))
}

// Handler for appending a new Todo
pub async fn create_todo(
    State(data): State<Arc<AppState>>,
    MemberSession(token): MemberSession,
    body: Result<Json<CreateTodoSchema>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(body) = body?;
    let todos = data
        .sessions
        .with_todos(&token, |list| list.create(&body.text))
        .await?;
    Ok((StatusCode::CREATED, Json(todos)))
}

// Handler for updating a Todo by ID
pub async fn update_todo(
    State(data): State<Arc<AppState>>,
    MemberSession(token): MemberSession,
    Path(id): Path<String>,
    body: Result<Json<UpdateTodoSchema>, JsonRejection>,
) -> AppResult<Json<Vec<TodoItem>>> {
    let id = parse_id(&id)?;
    let Json(body) = body?;
    let todos = data
        .sessions
        .with_todos(&token, |list| list.update(id, body))
        .await?;
    Ok(Json(todos))
}

// Handler for deleting a Todo by ID
pub async fn delete_todo(
    State(data): State<Arc<AppState>>,
    MemberSession(token): MemberSession,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<TodoItem>>> {
    let id = parse_id(&id)?;
    let todos = data
        .sessions
        .with_todos(&token, |list| list.delete(id))
        .await?;
    Ok(Json(todos))
}

fn parse_id(raw: &str) -> AppResult<u64> {
    raw.parse()
        .map_err(|_| AppError::bad_request("Invalid item identifier"))
}
