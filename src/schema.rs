// Request body for signup and signin; missing fields read as empty
#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct CredentialsSchema {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

// Struct representing the request body for creating a new Todo
#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct CreateTodoSchema {
    #[serde(default)]
    pub text: String,
}

// Partial update of a Todo; only the provided fields are merged
#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct UpdateTodoSchema {
    pub text: Option<String>,
    pub done: Option<bool>,
}

#[derive(Debug, serde::Serialize)]
pub struct PermsResponse {
    pub perms: Vec<String>,
}
