use std::fmt;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

// Data model representing a Todo item
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TodoItem {
    pub id: u64,
    pub text: String,
    pub done: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Role(String);

impl Role {
    pub const ANONYM: &'static str = "anonym";
    pub const MEMBER: &'static str = "member";

    pub fn new(name: impl Into<String>) -> Self {
        Role(name.into())
    }

    pub fn anonym() -> Self {
        Role::new(Self::ANONYM)
    }

    pub fn member() -> Self {
        Role::new(Self::MEMBER)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_anonym(&self) -> bool {
        self.0 == Self::ANONYM
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// `username:password`, base64url-encoded when it travels as a cookie
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn from_credentials(username: &str, password: &str) -> Self {
        SessionToken(format!("{}:{}", username, password))
    }

    pub fn from_cookie_value(value: &str) -> Option<Self> {
        let bytes = URL_SAFE_NO_PAD.decode(value).ok()?;
        String::from_utf8(bytes).ok().map(SessionToken)
    }

    pub fn to_cookie_value(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.0.as_bytes())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Attached to the request by the route guard
#[derive(Debug, Clone)]
pub struct Caller {
    pub role: Role,
    pub session: Option<SessionToken>,
}
