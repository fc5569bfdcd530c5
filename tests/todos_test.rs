mod helpers;

use std::sync::Arc;

use axum_rbac_todo::{
    model::{Role, SessionToken, TodoItem},
    rbac::RoleFetcher,
    AppState,
};
use helpers::{shipped_rbac, spawn_app, spawn_app_with_state};
use serde_json::json;

#[tokio::test]
async fn signup_signin_edit_and_logout() {
    let app = spawn_app().await;

    assert_eq!(app.post_signup("alice", "pw1").await.status(), 200);
    let response = app.post_signin("alice", "pw1").await;
    assert_eq!(response.status(), 200);
    assert!(response.headers().get("set-cookie").is_some());

    let response = app.post_todo("buy milk").await;
    assert_eq!(response.status(), 201);
    let items: Vec<TodoItem> = response.json().await.unwrap();
    assert_eq!(items.len(), 5);
    assert_eq!(items[4].text, "buy milk");
    assert!(!items[4].done);

    let response = app.put_todo("4", &json!({"done": true})).await;
    assert_eq!(response.status(), 200);
    let items: Vec<TodoItem> = response.json().await.unwrap();
    assert_eq!(items[4].id, 4);
    assert!(items[4].done);
    assert_eq!(items[4].text, "buy milk");

    let former_second = items[1].clone();
    let response = app.delete_todo("0").await;
    assert_eq!(response.status(), 200);
    let items: Vec<TodoItem> = response.json().await.unwrap();
    assert_eq!(items.len(), 4);
    assert_eq!(items[0], former_second);

    assert_eq!(app.logout().await.status(), 200);
    assert_eq!(app.get_todos().await.status(), 401);
}

#[tokio::test]
async fn fresh_session_starts_with_defaults() {
    let app = spawn_app().await;
    app.sign_in_as("alice", "pw1").await;

    let items = app.todo_list().await;
    let ids: Vec<u64> = items.iter().map(|item| item.id).collect();
    assert_eq!(ids, vec![0, 1, 2, 3]);
    assert!(items.iter().all(|item| !item.done));
}

#[tokio::test]
async fn empty_text_is_rejected_without_side_effects() {
    let app = spawn_app().await;
    app.sign_in_as("alice", "pw1").await;
    let before = app.todo_list().await;

    let response = app.post_todo("").await;
    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Item text is required");

    assert_eq!(app.todo_list().await, before);
}

#[tokio::test]
async fn unknown_ids_are_rejected_without_side_effects() {
    let app = spawn_app().await;
    app.sign_in_as("alice", "pw1").await;
    let before = app.todo_list().await;

    for id in ["4", "99", "-1", "abc"] {
        assert_eq!(app.delete_todo(id).await.status(), 400, "delete {id}");
        assert_eq!(
            app.put_todo(id, &json!({"done": true})).await.status(),
            400,
            "update {id}"
        );
    }
    assert_eq!(app.todo_list().await, before);
}

#[tokio::test]
async fn deleted_id_stays_invalid_and_others_keep_theirs() {
    let app = spawn_app().await;
    app.sign_in_as("alice", "pw1").await;

    assert_eq!(app.delete_todo("1").await.status(), 200);
    assert_eq!(app.delete_todo("1").await.status(), 400);

    // id 3 now sits at position 2 but is still addressed as 3
    let response = app.put_todo("3", &json!({"text": "renamed"})).await;
    let items: Vec<TodoItem> = response.json().await.unwrap();
    assert_eq!(items[2].id, 3);
    assert_eq!(items[2].text, "renamed");
    assert!(!items[2].done);
}

#[tokio::test]
async fn sessions_do_not_share_lists() {
    let app = spawn_app().await;
    app.sign_in_as("alice", "pw1").await;

    let bob = app.with_new_client();
    bob.sign_in_as("bob", "pw2").await;

    app.post_todo("alice only").await;
    assert_eq!(app.todo_list().await.len(), 5);
    assert_eq!(bob.todo_list().await.len(), 4);
}

#[tokio::test]
async fn todo_routes_require_a_session() {
    let app = spawn_app().await;

    assert_eq!(app.get_todos().await.status(), 401);
    assert_eq!(app.post_todo("sneaky").await.status(), 401);
    assert_eq!(
        app.put_todo("0", &json!({"done": true})).await.status(),
        401
    );
    assert_eq!(app.delete_todo("0").await.status(), 401);
}

/// Grants `member` to everybody, session or not.
struct AlwaysMember;

impl RoleFetcher for AlwaysMember {
    fn role(&self, _session: Option<&SessionToken>) -> Role {
        Role::member()
    }
}

#[tokio::test]
async fn handlers_reject_callers_without_session_even_when_rules_allow() {
    let state = AppState::with_role_fetcher(shipped_rbac(), Arc::new(AlwaysMember));
    let app = spawn_app_with_state(state).await;

    // rules let the caller through
    assert!(app.get_perms().await.contains(&"reviewTodo".to_string()));

    // the handlers still insist on a live session
    assert_eq!(app.get_todos().await.status(), 401);
    assert_eq!(app.post_todo("sneaky").await.status(), 401);
}
