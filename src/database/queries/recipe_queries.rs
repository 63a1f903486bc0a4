use crate::database::DatabaseConnection;
use crate::models::{Ingredients, RecipeIngredients, Recipes};
use crate::schema::{favorites, ingredients, recipe_ingredients, recipes, shopping_cart};
use diesel::prelude::*;
use diesel::result::Error;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

#[tracing::instrument(name = "Fetching recipe by id", skip(connection))]
pub async fn get_recipe(
    connection: &mut DatabaseConnection,
    recipe_id: Uuid,
) -> Result<Option<Recipes>, Error> {
    recipes::table
        .find(recipe_id)
        .select(Recipes::as_select())
        .first(connection)
        .await
        .optional()
}

/// Inserts the recipe row together with all of its ingredient lines.
/// Callers are expected to run this inside a transaction so that a
/// partially written recipe is never visible.
#[tracing::instrument(
    name = "Inserting recipe with ingredient lines",
    skip(connection, recipe, lines)
)]
pub async fn insert_recipe(
    connection: &mut DatabaseConnection,
    recipe: &Recipes,
    lines: &[RecipeIngredients],
) -> Result<(), Error> {
    diesel::insert_into(recipes::table)
        .values(recipe)
        .execute(connection)
        .await?;
    diesel::insert_into(recipe_ingredients::table)
        .values(lines)
        .execute(connection)
        .await?;
    Ok(())
}

/// Overwrites the recipe fields and replaces the full ingredient-line set.
/// Lines are never merged: the previous set is deleted and the new one
/// bulk-inserted, inside the caller's transaction.
#[tracing::instrument(
    name = "Updating recipe with ingredient lines",
    skip(connection, recipe, lines)
)]
pub async fn update_recipe(
    connection: &mut DatabaseConnection,
    recipe: &Recipes,
    lines: &[RecipeIngredients],
) -> Result<(), Error> {
    diesel::update(recipes::table.find(recipe.id))
        .set((
            recipes::name.eq(&recipe.name),
            recipes::text.eq(&recipe.text),
            recipes::cooking_time.eq(recipe.cooking_time),
            recipes::image.eq(&recipe.image),
        ))
        .execute(connection)
        .await?;
    diesel::delete(
        recipe_ingredients::table
            .filter(recipe_ingredients::recipe_id.eq(recipe.id)),
    )
    .execute(connection)
    .await?;
    diesel::insert_into(recipe_ingredients::table)
        .values(lines)
        .execute(connection)
        .await?;
    Ok(())
}

#[tracing::instrument(name = "Deleting recipe", skip(connection))]
pub async fn delete_recipe(
    connection: &mut DatabaseConnection,
    recipe_id: Uuid,
) -> Result<usize, Error> {
    diesel::delete(recipes::table.find(recipe_id))
        .execute(connection)
        .await
}

#[tracing::instrument(name = "Loading recipe ingredient lines", skip(connection))]
pub async fn recipe_lines(
    connection: &mut DatabaseConnection,
    recipe_id: Uuid,
) -> Result<Vec<(Ingredients, i32)>, Error> {
    recipe_ingredients::table
        .inner_join(ingredients::table)
        .filter(recipe_ingredients::recipe_id.eq(recipe_id))
        .order(ingredients::name.asc())
        .select((Ingredients::as_select(), recipe_ingredients::amount))
        .load(connection)
        .await
}

/// Viewer-relative filters for the recipe list.
#[derive(Debug, Default)]
pub struct RecipeFilters {
    pub author: Option<Uuid>,
    pub favorited_by: Option<Uuid>,
    pub in_cart_of: Option<Uuid>,
}

macro_rules! apply_recipe_filters {
    ($query:ident, $filters:expr) => {
        if let Some(author) = $filters.author {
            $query = $query.filter(recipes::author_id.eq(author));
        }
        if let Some(user) = $filters.favorited_by {
            $query = $query.filter(
                recipes::id.eq_any(
                    favorites::table
                        .filter(favorites::user_id.eq(user))
                        .select(favorites::recipe_id),
                ),
            );
        }
        if let Some(user) = $filters.in_cart_of {
            $query = $query.filter(
                recipes::id.eq_any(
                    shopping_cart::table
                        .filter(shopping_cart::user_id.eq(user))
                        .select(shopping_cart::recipe_id),
                ),
            );
        }
    };
}

#[tracing::instrument(name = "Listing recipes", skip(connection))]
pub async fn list_recipes(
    connection: &mut DatabaseConnection,
    filters: &RecipeFilters,
    offset: i64,
    limit: i64,
) -> Result<Vec<Recipes>, Error> {
    let mut query = recipes::table
        .select(Recipes::as_select())
        .order(recipes::created_at.desc())
        .into_boxed();
    apply_recipe_filters!(query, filters);
    query.offset(offset).limit(limit).load(connection).await
}

#[tracing::instrument(name = "Counting recipes", skip(connection))]
pub async fn count_recipes(
    connection: &mut DatabaseConnection,
    filters: &RecipeFilters,
) -> Result<i64, Error> {
    let mut query = recipes::table.count().into_boxed();
    apply_recipe_filters!(query, filters);
    query.get_result(connection).await
}

#[tracing::instrument(name = "Listing recipes by author", skip(connection))]
pub async fn recipes_by_author(
    connection: &mut DatabaseConnection,
    author_id: Uuid,
    limit: Option<i64>,
) -> Result<Vec<Recipes>, Error> {
    let mut query = recipes::table
        .select(Recipes::as_select())
        .filter(recipes::author_id.eq(author_id))
        .order(recipes::created_at.desc())
        .into_boxed();
    if let Some(limit) = limit {
        query = query.limit(limit);
    }
    query.load(connection).await
}

#[tracing::instrument(name = "Counting recipes by author", skip(connection))]
pub async fn count_recipes_by_author(
    connection: &mut DatabaseConnection,
    author_id: Uuid,
) -> Result<i64, Error> {
    recipes::table
        .filter(recipes::author_id.eq(author_id))
        .count()
        .get_result(connection)
        .await
}
