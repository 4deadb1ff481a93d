pub mod auth;
pub mod policy;

pub use auth::{AuthenticatedUser, authenticate_request};
pub use policy::{AccessPolicy, PolicyGuard, enforce_access_policy};
