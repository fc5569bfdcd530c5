use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::{
    error::{AppError, AppResult},
    model::{SessionToken, TodoItem},
    schema::UpdateTodoSchema,
};

pub const DEFAULT_TODOS: [&str; 4] = [
    r#"Discover <a href="https://github.com/tokio-rs/axum">Axum</a>"#,
    r#"Discover <a href="https://mithril.js.org/">Mithril</a>"#,
    r#"Discover <a href="https://purecss.io/">Pure.css</a>"#,
    "Start a new project with role-based access control",
];

#[derive(Debug, Default)]
pub struct UserStore {
    users: RwLock<HashMap<String, String>>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(&self, username: &str, password: &str) -> AppResult<()> {
        let mut users = self.users.write().await;
        if users.contains_key(username) {
            return Err(AppError::bad_request("User already exists"));
        }
        users.insert(username.to_owned(), password.to_owned());
        Ok(())
    }

    pub async fn exists(&self, username: &str) -> bool {
        self.users.read().await.contains_key(username)
    }

    pub async fn verify(&self, username: &str, password: &str) -> bool {
        self.users
            .read()
            .await
            .get(username)
            .map_or(false, |stored| stored == password)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoList {
    items: Vec<TodoItem>,
    next_id: u64,
}

impl TodoList {
    pub fn with_defaults() -> Self {
        let mut list = TodoList {
            items: Vec::with_capacity(DEFAULT_TODOS.len()),
            next_id: 0,
        };
        for text in DEFAULT_TODOS {
            list.push(text.to_owned());
        }
        list
    }

    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    fn push(&mut self, text: String) {
        let id = self.next_id;
        self.next_id += 1;
        self.items.push(TodoItem {
            id,
            text,
            done: false,
        });
    }

    fn position(&self, id: u64) -> AppResult<usize> {
        self.items
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(|| AppError::bad_request("Invalid item identifier"))
    }

    pub fn create(&mut self, text: &str) -> AppResult<&[TodoItem]> {
        if text.is_empty() {
            return Err(AppError::bad_request("Item text is required"));
        }
        self.push(text.to_owned());
        Ok(&self.items)
    }

    pub fn update(&mut self, id: u64, patch: UpdateTodoSchema) -> AppResult<&[TodoItem]> {
        let index = self.position(id)?;
        if matches!(patch.text.as_deref(), Some("")) {
            return Err(AppError::bad_request("Item text is required"));
        }

        let item = &mut self.items[index];
        if let Some(text) = patch.text {
            item.text = text;
        }
        if let Some(done) = patch.done {
            item.done = done;
        }
        Ok(&self.items)
    }

    pub fn delete(&mut self, id: u64) -> AppResult<&[TodoItem]> {
        let index = self.position(id)?;
        self.items.remove(index);
        Ok(&self.items)
    }
}

#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<SessionToken, TodoList>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    // true when a new session was created; an existing one is left alone
    pub async fn open(&self, token: &SessionToken) -> bool {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(token) {
            return false;
        }
        sessions.insert(token.clone(), TodoList::with_defaults());
        true
    }

    pub async fn contains(&self, token: &SessionToken) -> bool {
        self.sessions.read().await.contains_key(token)
    }

    pub async fn close(&self, token: &SessionToken) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }

    pub async fn with_todos<F>(&self, token: &SessionToken, f: F) -> AppResult<Vec<TodoItem>>
    where
        F: FnOnce(&mut TodoList) -> AppResult<&[TodoItem]>,
    {
        let mut sessions = self.sessions.write().await;
        let list = sessions.get_mut(token).ok_or(AppError::Unauthorized)?;
        f(list).map(<[TodoItem]>::to_vec)
    }

    pub async fn todos(&self, token: &SessionToken) -> AppResult<Vec<TodoItem>> {
        self.sessions
            .read()
            .await
            .get(token)
            .map(|list| list.items().to_vec())
            .ok_or(AppError::Unauthorized)
    }
}
