//! Turns policy decisions into application errors

use crate::domain::entities::Actor;
use crate::domain::policy::{authorize, Action, Authored, Decision, Gate};
use crate::error::AppError;

/// Evaluate the policy and fail the request on deny.
///
/// Anonymous actors get `Unauthorized` (they may succeed after
/// authenticating); authenticated ones get `Forbidden`.
pub fn ensure(
    actor: &Actor,
    action: Action,
    gate: Gate,
    resource: Option<&dyn Authored>,
) -> Result<(), AppError> {
    match authorize(actor, action, gate, resource) {
        Decision::Allow => Ok(()),
        Decision::Deny => {
            tracing::debug!(
                user_id = ?actor.user_id(),
                role = ?actor.role(),
                action = %action,
                gate = ?gate,
                "Access denied"
            );
            if actor.is_authenticated() {
                Err(AppError::Forbidden)
            } else {
                Err(AppError::Unauthorized)
            }
        }
    }
}
