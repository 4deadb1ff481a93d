pub mod auth;
pub mod cart;
pub mod health;
pub mod products;

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::Error;

/// JSON body extractor whose rejections become `Error::Validation` (400)
/// and are rendered with the standard error body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct AppJson<T>(pub T);

/// Path extractor whose rejections (e.g. a malformed UUID) become
/// `Error::Validation`.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(Error))]
pub struct AppPath<T>(pub T);
