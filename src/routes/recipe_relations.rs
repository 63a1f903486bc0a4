use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::result::{DatabaseErrorKind, Error};
use serde::Serialize;
use uuid::Uuid;

use crate::authentication::CurrentUser;
use crate::database::{queries, DatabaseConnection};
use crate::models::Recipes;
use crate::routes::views::RecipeShortView;
use crate::startup::ApplicationState;

// Favorites and the shopping cart share one add/remove contract: adding a
// recipe twice is a conflict the client must see, and removing an entry
// that is not there is a request error, never a silent no-op.

#[tracing::instrument(
    name = "Adding recipe to favorites",
    skip(app_state, user),
    fields(user_id = %user.id)
)]
pub async fn add_favorite(
    State(app_state): State<ApplicationState>,
    CurrentUser(user): CurrentUser,
    Path(recipe_id): Path<Uuid>,
) -> Result<(StatusCode, Json<RecipeShortView>), RelationError> {
    let mut connection =
        crate::database::get_connection(app_state.database_pool).await?;
    let recipe = get_target_recipe(&mut connection, recipe_id).await?;
    queries::insert_favorite(&mut connection, user.id, recipe_id)
        .await
        .map_err(|e| map_insert_error(e, "Recipe is already in favorites."))?;
    Ok((StatusCode::CREATED, Json(RecipeShortView::from(&recipe))))
}

#[tracing::instrument(
    name = "Removing recipe from favorites",
    skip(app_state, user),
    fields(user_id = %user.id)
)]
pub async fn remove_favorite(
    State(app_state): State<ApplicationState>,
    CurrentUser(user): CurrentUser,
    Path(recipe_id): Path<Uuid>,
) -> Result<StatusCode, RelationError> {
    let mut connection =
        crate::database::get_connection(app_state.database_pool).await?;
    get_target_recipe(&mut connection, recipe_id).await?;
    let deleted =
        queries::delete_favorite(&mut connection, user.id, recipe_id).await?;
    if deleted == 0 {
        return Err(RelationError::NotInSet(
            "Recipe is not in favorites.".to_string(),
        ));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(
    name = "Adding recipe to shopping cart",
    skip(app_state, user),
    fields(user_id = %user.id)
)]
pub async fn add_to_cart(
    State(app_state): State<ApplicationState>,
    CurrentUser(user): CurrentUser,
    Path(recipe_id): Path<Uuid>,
) -> Result<(StatusCode, Json<RecipeShortView>), RelationError> {
    let mut connection =
        crate::database::get_connection(app_state.database_pool).await?;
    let recipe = get_target_recipe(&mut connection, recipe_id).await?;
    queries::insert_cart_entry(&mut connection, user.id, recipe_id)
        .await
        .map_err(|e| {
            map_insert_error(e, "Recipe is already in the shopping cart.")
        })?;
    Ok((StatusCode::CREATED, Json(RecipeShortView::from(&recipe))))
}

#[tracing::instrument(
    name = "Removing recipe from shopping cart",
    skip(app_state, user),
    fields(user_id = %user.id)
)]
pub async fn remove_from_cart(
    State(app_state): State<ApplicationState>,
    CurrentUser(user): CurrentUser,
    Path(recipe_id): Path<Uuid>,
) -> Result<StatusCode, RelationError> {
    let mut connection =
        crate::database::get_connection(app_state.database_pool).await?;
    get_target_recipe(&mut connection, recipe_id).await?;
    let deleted =
        queries::delete_cart_entry(&mut connection, user.id, recipe_id)
            .await?;
    if deleted == 0 {
        return Err(RelationError::NotInSet(
            "Recipe is not in the shopping cart.".to_string(),
        ));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn get_target_recipe(
    connection: &mut DatabaseConnection,
    recipe_id: Uuid,
) -> Result<Recipes, RelationError> {
    queries::get_recipe(connection, recipe_id)
        .await?
        .ok_or(RelationError::RecipeNotFound)
}

fn map_insert_error(e: Error, conflict_message: &str) -> RelationError {
    match e {
        Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            RelationError::AlreadyInSet(conflict_message.to_string())
        }
        other => RelationError::DatabaseError(other),
    }
}

#[derive(thiserror::Error, Debug)]
pub enum RelationError {
    #[error("Recipe not found.")]
    RecipeNotFound,
    #[error("{0}")]
    AlreadyInSet(String),
    #[error("{0}")]
    NotInSet(String),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
    #[error("Unknown database error.")]
    DatabaseError(#[from] Error),
}

impl IntoResponse for RelationError {
    fn into_response(self) -> axum::response::Response {
        #[derive(Serialize)]
        struct RelationErrorResponse {
            message: String,
        }
        tracing::error!("{} Reason: {:?}", self, self);
        let (status, message) = match self {
            RelationError::RecipeNotFound => {
                (StatusCode::NOT_FOUND, self.to_string())
            }
            RelationError::AlreadyInSet(message) => {
                (StatusCode::CONFLICT, message)
            }
            RelationError::NotInSet(message) => {
                (StatusCode::BAD_REQUEST, message)
            }
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Something went wrong".to_string(),
            ),
        };
        (status, axum::Json(RelationErrorResponse { message }))
            .into_response()
    }
}
