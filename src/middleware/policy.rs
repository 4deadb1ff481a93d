//! Per-route access policies
//!
//! Each route in the router is declared together with an [`AccessPolicy`].
//! A single middleware, [`enforce_access_policy`], evaluates it: public
//! routes pass straight through, everything else is authenticated and, when
//! the policy names roles, checked against the caller's role.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{
    error::{Error, Result},
    middleware::auth::{AuthenticatedUser, authenticate_request},
    models::users::Role,
    state::AppState,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessPolicy {
    /// No token required.
    Public,
    /// Any valid token.
    Authenticated,
    /// Valid token whose user holds one of these roles.
    Roles(&'static [Role]),
}

impl AccessPolicy {
    pub const ADMIN_ONLY: AccessPolicy = AccessPolicy::Roles(&[Role::Admin]);

    pub fn requires_authentication(&self) -> bool {
        !matches!(self, AccessPolicy::Public)
    }

    /// Checks an authenticated user's role against the policy
    ///
    /// # Errors
    /// * `Forbidden` - the role is not in the policy's allowed set
    pub fn authorize(&self, role: Role) -> Result<()> {
        match self {
            AccessPolicy::Public | AccessPolicy::Authenticated => Ok(()),
            AccessPolicy::Roles(allowed) if allowed.contains(&role) => Ok(()),
            AccessPolicy::Roles(allowed) => {
                let required = allowed
                    .iter()
                    .map(Role::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                Err(Error::Forbidden(format!(
                    "User role {} is not authorized. Required roles: {}",
                    role, required
                )))
            }
        }
    }
}

/// Middleware state: the application state plus the policy of one route.
#[derive(Clone)]
pub struct PolicyGuard {
    pub state: AppState,
    pub policy: AccessPolicy,
}

impl PolicyGuard {
    pub fn new(state: AppState, policy: AccessPolicy) -> Self {
        Self { state, policy }
    }
}

/// Enforces the route's [`AccessPolicy`]
///
/// On success for non-public routes, an [`AuthenticatedUser`] is inserted
/// into the request extensions for handlers to extract.
///
/// # Usage
/// ```ignore
/// get(handler).route_layer(middleware::from_fn_with_state(
///     PolicyGuard::new(state.clone(), AccessPolicy::Authenticated),
///     enforce_access_policy,
/// ))
/// ```
pub async fn enforce_access_policy(
    State(guard): State<PolicyGuard>,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    if !guard.policy.requires_authentication() {
        return Ok(next.run(request).await);
    }

    let user: AuthenticatedUser = authenticate_request(&guard.state, request.headers()).await?;

    if let Err(e) = guard.policy.authorize(user.role) {
        tracing::warn!(
            user_id = %user.id,
            role = %user.role,
            path = %request.uri().path(),
            "[Auth] Middleware: Role check failed"
        );
        return Err(e);
    }

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}
