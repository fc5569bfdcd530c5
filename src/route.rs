use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, post, put, MethodRouter},
    Router,
};

use crate::{
    handler::*,
    middleware::{mw_require_permission, Guard},
    AppState,
};

/// Puts `route` behind the access control rule named `permission`.
fn guarded(
    state: &Arc<AppState>,
    permission: &'static str,
    route: MethodRouter<Arc<AppState>>,
) -> MethodRouter<Arc<AppState>> {
    route.route_layer(from_fn_with_state(
        Guard::new(state, permission),
        mw_require_permission,
    ))
}

fn todo_router(app_state: &Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/",
            guarded(app_state, "reviewTodo", get(get_todos))
                .merge(guarded(app_state, "createTodo", post(create_todo))),
        )
        .route(
            "/:id",
            guarded(app_state, "updateTodo", put(update_todo))
                .merge(guarded(app_state, "deleteTodo", delete(delete_todo))),
        )
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/perms", guarded(&app_state, "perms", get(get_perms)))
        .route("/menu", guarded(&app_state, "perms", get(get_menu)))
        .route("/signup", guarded(&app_state, "signup", post(signup)))
        .route("/signin", guarded(&app_state, "signin", post(signin)))
        .route("/logout", get(logout).post(logout))
        .nest("/todos", todo_router(&app_state))
        .route("/health", get(health_checker_handler))
        .with_state(app_state)
}
