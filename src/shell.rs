use std::collections::BTreeSet;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    Overview,
    Signup,
    Signin,
    Todo,
    Logout,
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RouteEntry {
    pub path: &'static str,
    pub label: &'static str,
    pub permission: &'static str,
    pub view: View,
}

pub const ROUTES: &[RouteEntry] = &[
    RouteEntry {
        path: "/overview",
        label: "Overview",
        permission: "overview",
        view: View::Overview,
    },
    RouteEntry {
        path: "/signup",
        label: "Sign up",
        permission: "signup",
        view: View::Signup,
    },
    RouteEntry {
        path: "/signin",
        label: "Sign in",
        permission: "signin",
        view: View::Signin,
    },
    RouteEntry {
        path: "/todo",
        label: "TODO",
        permission: "reviewTodo",
        view: View::Todo,
    },
    RouteEntry {
        path: "/logout",
        label: "Logout",
        permission: "logout",
        view: View::Logout,
    },
];

pub const TODO_PATH: &str = "/todo";
pub const OVERVIEW_PATH: &str = "/overview";

pub fn menu(perms: &BTreeSet<String>) -> Vec<RouteEntry> {
    ROUTES
        .iter()
        .filter(|entry| perms.contains(entry.permission))
        .copied()
        .collect()
}

pub fn resolve(path: &str, perms: &BTreeSet<String>) -> View {
    ROUTES
        .iter()
        .find(|entry| entry.path == path)
        .filter(|entry| perms.contains(entry.permission))
        .map_or(View::NotFound, |entry| entry.view)
}

pub fn landing(perms: &BTreeSet<String>) -> &'static str {
    if resolve(TODO_PATH, perms) == View::Todo {
        TODO_PATH
    } else {
        OVERVIEW_PATH
    }
}

#[derive(Debug, Serialize)]
pub struct MenuResponse {
    pub perms: Vec<String>,
    pub landing: &'static str,
    pub menu: Vec<RouteEntry>,
}

impl MenuResponse {
    pub fn new(perms: BTreeSet<String>) -> Self {
        MenuResponse {
            landing: landing(&perms),
            menu: menu(&perms),
            perms: perms.into_iter().collect(),
        }
    }
}
