use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;

use crate::database::queries::search_ingredients;
use crate::routes::views::IngredientView;
use crate::startup::ApplicationState;

#[derive(serde::Deserialize)]
pub struct IngredientSearch {
    pub name: Option<String>,
}

#[tracing::instrument(
    name = "Searching ingredients",
    skip(app_state, search),
    fields(prefix = ?search.name)
)]
pub async fn list_ingredients(
    State(app_state): State<ApplicationState>,
    Query(search): Query<IngredientSearch>,
) -> Result<Json<Vec<IngredientView>>, CatalogError> {
    let mut connection =
        crate::database::get_connection(app_state.database_pool).await?;
    let ingredients =
        search_ingredients(&mut connection, search.name.as_deref()).await?;
    Ok(Json(
        ingredients.into_iter().map(IngredientView::from).collect(),
    ))
}

#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
    #[error("Unknown database error.")]
    DatabaseError(#[from] diesel::result::Error),
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> axum::response::Response {
        #[derive(Serialize)]
        struct CatalogErrorResponse {
            message: String,
        }
        tracing::error!("{} Reason: {:?}", self, self);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            axum::Json(CatalogErrorResponse {
                message: "Something went wrong".to_string(),
            }),
        )
            .into_response()
    }
}
