use anyhow::Context;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::result::DatabaseErrorKind;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::AsyncConnection;
use serde::Serialize;
use uuid::Uuid;

use crate::authentication::{CurrentUser, MaybeUser};
use crate::database::queries;
use crate::domain::NewRecipe;
use crate::media;
use crate::models::{RecipeIngredients, Recipes, Users};
use crate::pagination::{Paginated, Pagination};
use crate::routes::views::RecipeView;
use crate::startup::ApplicationState;
use crate::telemetry::spawn_blocking_with_tracing;

#[derive(serde::Deserialize)]
pub struct RecipeData {
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
    pub image: String,
    pub ingredients: Vec<IngredientLineData>,
}

#[derive(serde::Deserialize)]
pub struct IngredientLineData {
    pub id: Uuid,
    pub amount: i32,
}

#[tracing::instrument(
    name = "Creating a recipe",
    skip(app_state, author, data),
    fields(author_id = %author.id)
)]
pub async fn create_recipe(
    State(app_state): State<ApplicationState>,
    CurrentUser(author): CurrentUser,
    Json(data): Json<RecipeData>,
) -> Result<(StatusCode, Json<RecipeView>), RecipeError> {
    let new_recipe = NewRecipe::try_from(data)
        .map_err(|e| RecipeError::InvalidRecipeData(e.to_string()))?;
    let (recipe, lines) =
        persist_image_and_assemble(&app_state, &author, new_recipe).await?;

    let mut connection =
        crate::database::get_connection(app_state.database_pool.clone())
            .await?;
    let result = connection
        .transaction::<_, RecipeError, _>(|conn| {
            async {
                queries::insert_recipe(conn, &recipe, &lines).await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await;
    if let Err(e) = result {
        media::remove_image(&app_state.media_root, &recipe.image);
        return Err(map_line_insert_error(e));
    }

    let view =
        RecipeView::load(&mut connection, &recipe, Some(author.id)).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

#[tracing::instrument(
    name = "Updating a recipe",
    skip(app_state, viewer, data),
    fields(viewer_id = %viewer.id)
)]
pub async fn update_recipe(
    State(app_state): State<ApplicationState>,
    CurrentUser(viewer): CurrentUser,
    Path(recipe_id): Path<Uuid>,
    Json(data): Json<RecipeData>,
) -> Result<Json<RecipeView>, RecipeError> {
    let mut connection =
        crate::database::get_connection(app_state.database_pool.clone())
            .await?;
    let existing = queries::get_recipe(&mut connection, recipe_id)
        .await?
        .ok_or(RecipeError::NotFound)?;
    if existing.author_id != viewer.id {
        return Err(RecipeError::Forbidden);
    }
    let new_recipe = NewRecipe::try_from(data)
        .map_err(|e| RecipeError::InvalidRecipeData(e.to_string()))?;
    let (mut recipe, lines) =
        persist_image_and_assemble(&app_state, &viewer, new_recipe).await?;
    recipe.id = existing.id;
    let lines: Vec<RecipeIngredients> = lines
        .into_iter()
        .map(|line| {
            RecipeIngredients::new(recipe.id, line.ingredient_id, line.amount)
        })
        .collect();

    let result = connection
        .transaction::<_, RecipeError, _>(|conn| {
            async {
                queries::update_recipe(conn, &recipe, &lines).await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await;
    if let Err(e) = result {
        media::remove_image(&app_state.media_root, &recipe.image);
        return Err(map_line_insert_error(e));
    }
    media::remove_image(&app_state.media_root, &existing.image);

    let view =
        RecipeView::load(&mut connection, &recipe, Some(viewer.id)).await?;
    Ok(Json(view))
}

#[tracing::instrument(name = "Reading a recipe", skip(app_state, viewer))]
pub async fn get_recipe(
    State(app_state): State<ApplicationState>,
    MaybeUser(viewer): MaybeUser,
    Path(recipe_id): Path<Uuid>,
) -> Result<Json<RecipeView>, RecipeError> {
    let mut connection =
        crate::database::get_connection(app_state.database_pool).await?;
    let recipe = queries::get_recipe(&mut connection, recipe_id)
        .await?
        .ok_or(RecipeError::NotFound)?;
    let view = RecipeView::load(
        &mut connection,
        &recipe,
        viewer.map(|user| user.id),
    )
    .await?;
    Ok(Json(view))
}

#[derive(serde::Deserialize)]
pub struct RecipeListQuery {
    #[serde(flatten)]
    pub pagination: Pagination,
    pub author: Option<Uuid>,
    pub is_favorited: Option<String>,
    pub is_in_shopping_cart: Option<String>,
}

fn flag_is_set(value: &Option<String>) -> bool {
    matches!(value.as_deref(), Some("1") | Some("true"))
}

#[tracing::instrument(name = "Listing recipes", skip(app_state, viewer, query))]
pub async fn list_recipes(
    State(app_state): State<ApplicationState>,
    MaybeUser(viewer): MaybeUser,
    Query(query): Query<RecipeListQuery>,
) -> Result<Json<Paginated<RecipeView>>, RecipeError> {
    let viewer_id = viewer.map(|user| user.id);
    // Viewer-relative filters are meaningless for anonymous readers and
    // are ignored for them.
    let filters = queries::RecipeFilters {
        author: query.author,
        favorited_by: viewer_id.filter(|_| flag_is_set(&query.is_favorited)),
        in_cart_of: viewer_id
            .filter(|_| flag_is_set(&query.is_in_shopping_cart)),
    };
    let mut connection =
        crate::database::get_connection(app_state.database_pool).await?;
    let count = queries::count_recipes(&mut connection, &filters).await?;
    let recipes = queries::list_recipes(
        &mut connection,
        &filters,
        query.pagination.offset(app_state.page_size),
        query.pagination.limit(app_state.page_size),
    )
    .await?;
    let mut results = Vec::with_capacity(recipes.len());
    for recipe in &recipes {
        results.push(RecipeView::load(&mut connection, recipe, viewer_id).await?);
    }
    Ok(Json(Paginated { count, results }))
}

#[tracing::instrument(name = "Deleting a recipe", skip(app_state, viewer))]
pub async fn delete_recipe(
    State(app_state): State<ApplicationState>,
    CurrentUser(viewer): CurrentUser,
    Path(recipe_id): Path<Uuid>,
) -> Result<StatusCode, RecipeError> {
    let mut connection =
        crate::database::get_connection(app_state.database_pool).await?;
    let recipe = queries::get_recipe(&mut connection, recipe_id)
        .await?
        .ok_or(RecipeError::NotFound)?;
    if recipe.author_id != viewer.id {
        return Err(RecipeError::Forbidden);
    }
    queries::delete_recipe(&mut connection, recipe_id).await?;
    media::remove_image(&app_state.media_root, &recipe.image);
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Serialize)]
pub struct ShortLinkResponse {
    #[serde(rename = "short-link")]
    pub short_link: String,
}

#[tracing::instrument(name = "Building a short link", skip(app_state))]
pub async fn get_short_link(
    State(app_state): State<ApplicationState>,
    Path(recipe_id): Path<Uuid>,
) -> Result<Json<ShortLinkResponse>, RecipeError> {
    let mut connection =
        crate::database::get_connection(app_state.database_pool).await?;
    queries::get_recipe(&mut connection, recipe_id)
        .await?
        .ok_or(RecipeError::NotFound)?;
    Ok(Json(ShortLinkResponse {
        short_link: format!("{}/s/{}", app_state.base_url, recipe_id),
    }))
}

/// Writes the uploaded image to disk off the async runtime and builds the
/// row structs for the recipe and its ingredient lines.
async fn persist_image_and_assemble(
    app_state: &ApplicationState,
    author: &Users,
    new_recipe: NewRecipe,
) -> Result<(Recipes, Vec<RecipeIngredients>), RecipeError> {
    let NewRecipe {
        name,
        text,
        cooking_time,
        image,
        ingredient_lines,
    } = new_recipe;
    let media_root = app_state.media_root.clone();
    let image_path = spawn_blocking_with_tracing(move || {
        media::store_image(&media_root, "recipes/images", &image)
    })
    .await
    .context("Image write task failed.")??;
    let recipe = Recipes::new(
        author.id,
        name.as_ref().to_string(),
        text,
        cooking_time.minutes(),
        image_path,
    );
    let lines = ingredient_lines
        .iter()
        .map(|line| {
            RecipeIngredients::new(
                recipe.id,
                line.ingredient_id,
                line.amount.get(),
            )
        })
        .collect();
    Ok((recipe, lines))
}

// An ingredient line pointing at a catalog id that does not exist fails
// the foreign key, which is the client's mistake, not ours.
fn map_line_insert_error(e: RecipeError) -> RecipeError {
    match e {
        RecipeError::DatabaseError(diesel::result::Error::DatabaseError(
            DatabaseErrorKind::ForeignKeyViolation,
            _,
        )) => RecipeError::UnknownIngredient,
        other => other,
    }
}

#[derive(thiserror::Error, Debug)]
pub enum RecipeError {
    #[error("{0}")]
    InvalidRecipeData(String),
    #[error("Unknown ingredient id.")]
    UnknownIngredient,
    #[error("Recipe not found.")]
    NotFound,
    #[error("Only the author may modify this recipe.")]
    Forbidden,
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
    #[error("Unknown database error.")]
    DatabaseError(#[from] diesel::result::Error),
}

impl IntoResponse for RecipeError {
    fn into_response(self) -> axum::response::Response {
        #[derive(Serialize)]
        struct RecipeErrorResponse {
            message: String,
        }
        tracing::error!("{} Reason: {:?}", self, self);
        let (status, message) = match self {
            RecipeError::InvalidRecipeData(message) => {
                (StatusCode::BAD_REQUEST, message)
            }
            RecipeError::UnknownIngredient => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            RecipeError::NotFound => {
                (StatusCode::NOT_FOUND, self.to_string())
            }
            RecipeError::Forbidden => {
                (StatusCode::FORBIDDEN, self.to_string())
            }
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Something went wrong".to_string(),
            ),
        };
        (status, axum::Json(RecipeErrorResponse { message }))
            .into_response()
    }
}
