//! API key authentication middleware

use std::sync::Arc;

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};

use crate::app::{hash_api_key, UserService};
use crate::domain::entities::Actor;
use crate::domain::ports::UserRepository;
use crate::error::AppError;

/// Extract the API key from the Authorization header
fn extract_api_key(request: &Request<Body>) -> Option<&str> {
    request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

/// Actor resolution middleware
///
/// Runs on every route and injects an `Actor` into request extensions.
/// No Authorization header means `Actor::Anonymous`; a key that matches
/// no user is rejected outright rather than downgraded to anonymous.
pub async fn actor_middleware<UR>(
    State(users): State<Arc<UserService<UR>>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError>
where
    UR: UserRepository + 'static,
{
    let actor = match extract_api_key(&request) {
        None => Actor::Anonymous,
        Some(api_key) => {
            let key_hash = hash_api_key(api_key);
            let user = users
                .find_by_api_key(&key_hash)
                .await?
                .ok_or(AppError::Unauthorized)?;
            Actor::from(&user)
        }
    };

    request.extensions_mut().insert(actor);

    Ok(next.run(request).await)
}
