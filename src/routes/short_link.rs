use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect},
};
use serde::Serialize;
use uuid::Uuid;

use crate::database::queries::get_recipe;
use crate::startup::ApplicationState;

/// `/s/{id}` resolves to the canonical recipe page.
#[tracing::instrument(name = "Resolving short link", skip(app_state))]
pub async fn redirect_short_link(
    State(app_state): State<ApplicationState>,
    Path(recipe_id): Path<Uuid>,
) -> Result<Redirect, ShortLinkError> {
    let mut connection =
        crate::database::get_connection(app_state.database_pool).await?;
    get_recipe(&mut connection, recipe_id)
        .await?
        .ok_or(ShortLinkError::NotFound)?;
    Ok(Redirect::to(&format!("/recipes/{}/", recipe_id)))
}

#[derive(thiserror::Error, Debug)]
pub enum ShortLinkError {
    #[error("Recipe not found.")]
    NotFound,
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
    #[error("Unknown database error.")]
    DatabaseError(#[from] diesel::result::Error),
}

impl IntoResponse for ShortLinkError {
    fn into_response(self) -> axum::response::Response {
        #[derive(Serialize)]
        struct ShortLinkErrorResponse {
            message: String,
        }
        tracing::error!("{} Reason: {:?}", self, self);
        let (status, message) = match self {
            ShortLinkError::NotFound => {
                (StatusCode::NOT_FOUND, self.to_string())
            }
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Something went wrong".to_string(),
            ),
        };
        (status, axum::Json(ShortLinkErrorResponse { message }))
            .into_response()
    }
}
