//! Route-level access gates
//!
//! Admin-only and read-mostly route groups are checked here, before the
//! handler runs. Ownership checks need the stored object and happen in
//! the services instead.

use axum::{
    body::Body,
    extract::State,
    http::{Method, Request},
    middleware::Next,
    response::Response,
};

use crate::app::access::ensure;
use crate::domain::entities::Actor;
use crate::domain::policy::{Action, Gate};
use crate::error::AppError;

/// Map an HTTP method to the action it performs. Unknown methods map to nothing.
pub fn action_for_method(method: &Method) -> Option<Action> {
    match *method {
        Method::GET | Method::HEAD | Method::OPTIONS => Some(Action::Read),
        Method::POST => Some(Action::Create),
        Method::PUT | Method::PATCH => Some(Action::Update),
        Method::DELETE => Some(Action::Delete),
        _ => None,
    }
}

/// Gate middleware, installed with `from_fn_with_state(gate, enforce_gate)`
pub async fn enforce_gate(
    State(gate): State<Gate>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let actor = request
        .extensions()
        .get::<Actor>()
        .copied()
        .unwrap_or(Actor::Anonymous);

    let Some(action) = action_for_method(request.method()) else {
        tracing::debug!(method = %request.method(), gate = ?gate, "Unmapped method denied");
        return Err(if actor.is_authenticated() {
            AppError::Forbidden
        } else {
            AppError::Unauthorized
        });
    };

    ensure(&actor, action, gate, None)?;

    Ok(next.run(request).await)
}
