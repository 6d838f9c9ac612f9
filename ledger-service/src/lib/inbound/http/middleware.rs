use std::sync::Arc;

use auth::Identity;
use auth::IdentityDirectory;
use auth::TokenCodec;
use axum::async_trait;
use axum::extract::FromRef;
use axum::extract::FromRequestParts;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use crate::domain::user::models::UserId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Role granted to every authenticated caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
        }
    }
}

/// Who the caller is, attached to the request extensions once its bearer token checks out.
///
/// Handlers take it as an extractor. Extraction fails with 401 when the request
/// carried no valid token; use `Option<AuthenticationContext>` on routes where
/// authentication is optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticationContext {
    pub user_id: UserId,
    pub email: String,
    pub display_name: String,
    pub roles: Vec<Role>,
}

impl AuthenticationContext {
    fn for_identity(identity: &Identity) -> Self {
        Self {
            user_id: UserId(identity.id()),
            email: identity.email().to_string(),
            display_name: identity.display_name().to_string(),
            roles: vec![Role::User],
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticationContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticationContext>()
            .cloned()
            .ok_or_else(unauthenticated)
    }
}

/// What the interceptor needs to turn a bearer token into a context.
#[derive(Clone)]
pub struct AuthenticationState {
    pub token_codec: Arc<TokenCodec>,
    pub directory: Arc<dyn IdentityDirectory>,
}

impl FromRef<AppState> for AuthenticationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            token_codec: Arc::clone(&state.token_codec),
            directory: Arc::clone(&state.directory),
        }
    }
}

/// Middleware that resolves the bearer token into an [`AuthenticationContext`].
///
/// Never rejects: a missing, malformed, expired or tampered token, or a subject
/// the directory no longer knows, leaves the request unauthenticated and it
/// proceeds. Route policy is enforced by [`require_authentication`].
pub async fn authenticate(
    State(state): State<AuthenticationState>,
    mut req: Request,
    next: Next,
) -> Response {
    if let Some(context) = resolve_context(&state, req.headers()).await {
        req.extensions_mut().insert(context);
    }

    next.run(req).await
}

/// Route layer rejecting requests that reached it without an authentication context.
pub async fn require_authentication(req: Request, next: Next) -> Response {
    if req.extensions().get::<AuthenticationContext>().is_none() {
        return unauthenticated().into_response();
    }

    next.run(req).await
}

async fn resolve_context(
    state: &AuthenticationState,
    headers: &HeaderMap,
) -> Option<AuthenticationContext> {
    let token = bearer_token(headers)?;

    let claims = match state.token_codec.validate(token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!(error = %e, "Bearer token rejected");
            return None;
        }
    };

    match state.directory.find_by_email(&claims.sub).await {
        Ok(Some(identity)) => Some(AuthenticationContext::for_identity(&identity)),
        Ok(None) => {
            tracing::warn!(user_id = claims.user_id, "Token subject no longer registered");
            None
        }
        Err(e) => {
            tracing::error!(error = %e, "Identity lookup failed");
            None
        }
    }
}

/// Token carried by an `Authorization: Bearer <token>` header.
///
/// The header must start with `Bearer`; the token is the second field of a
/// split on single spaces.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let authorization = headers.get(header::AUTHORIZATION)?.to_str().ok()?;

    if !authorization.starts_with("Bearer") {
        return None;
    }

    authorization
        .split(' ')
        .nth(1)
        .filter(|token| !token.is_empty())
}

fn unauthenticated() -> ApiError {
    ApiError::Unauthorized("Authentication required".to_string())
}
