use async_trait::async_trait;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::IntoResponse,
};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde::Serialize;

use crate::database::{get_connection, DatabaseConnectionPool};
use crate::models::Users;
use crate::schema::{auth_tokens, users};
use crate::startup::ApplicationState;

/// Viewer identity for endpoints that require authentication.
pub struct CurrentUser(pub Users);

/// Viewer identity for endpoints that also serve anonymous readers.
pub struct MaybeUser(pub Option<Users>);

#[tracing::instrument(name = "Resolving token to a user", skip(pool, key))]
async fn user_for_token(
    pool: DatabaseConnectionPool,
    key: &str,
) -> Result<Option<Users>, anyhow::Error> {
    let mut connection = get_connection(pool).await?;
    let user = auth_tokens::table
        .inner_join(users::table)
        .filter(auth_tokens::key.eq(key))
        .select(Users::as_select())
        .first(&mut connection)
        .await
        .optional()?;
    Ok(user)
}

fn token_from_parts(parts: &Parts) -> Result<Option<&str>, AuthError> {
    let Some(header) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let value = header.to_str().map_err(|_| AuthError::InvalidToken)?;
    value
        .strip_prefix("Token ")
        .map(Some)
        .ok_or(AuthError::InvalidToken)
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    ApplicationState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let key =
            token_from_parts(parts)?.ok_or(AuthError::MissingCredentials)?;
        let state = ApplicationState::from_ref(state);
        user_for_token(state.database_pool, key)
            .await?
            .map(Self)
            .ok_or(AuthError::InvalidToken)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for MaybeUser
where
    ApplicationState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let Some(key) = token_from_parts(parts)? else {
            return Ok(Self(None));
        };
        let state = ApplicationState::from_ref(state);
        user_for_token(state.database_pool, key)
            .await?
            .map(|user| Self(Some(user)))
            .ok_or(AuthError::InvalidToken)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum AuthError {
    #[error("Authentication credentials were not provided.")]
    MissingCredentials,
    #[error("Invalid token.")]
    InvalidToken,
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> axum::response::Response {
        #[derive(Serialize)]
        struct AuthErrorResponse {
            message: String,
        }
        tracing::error!("{} Reason: {:?}", self, self);
        let (status, message) = match self {
            AuthError::MissingCredentials | AuthError::InvalidToken => {
                (StatusCode::UNAUTHORIZED, self.to_string())
            }
            AuthError::UnexpectedError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Something went wrong".to_string(),
            ),
        };
        (status, axum::Json(AuthErrorResponse { message }))
            .into_response()
    }
}
