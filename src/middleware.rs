use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, State},
    http::{request::Parts, Request},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;

use crate::{
    error::AppError,
    model::{Caller, SessionToken},
    AppState,
};

pub const SESSION_COOKIE: &str = "sessionId";

#[derive(Clone)]
pub struct Guard {
    pub state: Arc<AppState>,
    pub permission: &'static str,
}

impl Guard {
    pub fn new(state: &Arc<AppState>, permission: &'static str) -> Self {
        Guard {
            state: state.clone(),
            permission,
        }
    }
}

// A cookie that does not match a live session counts as no session at all
pub async fn identify(state: &AppState, jar: &CookieJar) -> Caller {
    let token = jar
        .get(SESSION_COOKIE)
        .and_then(|cookie| SessionToken::from_cookie_value(cookie.value()));

    let live = match token {
        Some(token) => state.sessions.contains(&token).await.then_some(token),
        None => None,
    };
    state.roles.caller(live)
}

pub async fn mw_require_permission<B>(
    State(guard): State<Guard>,
    jar: CookieJar,
    mut request: Request<B>,
    next: Next<B>,
) -> Result<Response, AppError> {
    let caller = identify(&guard.state, &jar).await;

    if !guard.state.rbac.is_permitted(&caller.role, guard.permission) {
        tracing::debug!(
            role = %caller.role,
            permission = guard.permission,
            "access denied"
        );
        return Err(AppError::Unauthorized);
    }

    request.extensions_mut().insert(caller);
    Ok(next.run(request).await)
}

#[derive(Debug, Clone)]
pub struct MemberSession(pub SessionToken);

#[async_trait]
impl<S> FromRequestParts<S> for MemberSession
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<Caller>() {
            Some(Caller {
                role,
                session: Some(token),
            }) if !role.is_anonym() => Ok(MemberSession(token.clone())),
            _ => Err(AppError::Unauthorized),
        }
    }
}
