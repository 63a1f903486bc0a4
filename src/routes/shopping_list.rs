use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
};
use serde::Serialize;

use crate::authentication::CurrentUser;
use crate::database::queries::{load_shopping_list, render_shopping_list};
use crate::startup::ApplicationState;

/// Consolidated shopping list as a downloadable text file. An empty cart
/// still succeeds and yields an empty file.
#[tracing::instrument(
    name = "Downloading shopping list",
    skip(app_state, user),
    fields(user_id = %user.id)
)]
pub async fn download_shopping_cart(
    State(app_state): State<ApplicationState>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, ShoppingListError> {
    let mut connection =
        crate::database::get_connection(app_state.database_pool).await?;
    let rows = load_shopping_list(&mut connection, user.id).await?;
    let body = render_shopping_list(&rows);
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"shopping_list.txt\"",
            ),
        ],
        body,
    ))
}

#[derive(thiserror::Error, Debug)]
pub enum ShoppingListError {
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
    #[error("Unknown database error.")]
    DatabaseError(#[from] diesel::result::Error),
}

impl IntoResponse for ShoppingListError {
    fn into_response(self) -> axum::response::Response {
        #[derive(Serialize)]
        struct ShoppingListErrorResponse {
            message: String,
        }
        tracing::error!("{} Reason: {:?}", self, self);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            axum::Json(ShoppingListErrorResponse {
                message: "Something went wrong".to_string(),
            }),
        )
            .into_response()
    }
}
