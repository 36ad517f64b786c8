use axum::extract::{FromRequest, FromRequestParts};

use crate::error::UsersServiceError;

/// JSON body whose rejection renders as a `400 INVALID_REQUEST` error body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(UsersServiceError))]
pub struct ApiJson<T>(pub T);

/// Path parameters whose rejection renders as a `400 INVALID_REQUEST` error body.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(UsersServiceError))]
pub struct ApiPath<T>(pub T);
