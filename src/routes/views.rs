//! Read-side response shapes. The write handlers build their success
//! responses through these same loaders, so a mutation always answers with
//! exactly what a subsequent read would return.

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::database::{queries, DatabaseConnection};
use crate::media;
use crate::models::{Ingredients, Recipes, Users};

#[derive(Serialize)]
pub struct IngredientView {
    pub id: Uuid,
    pub name: String,
    pub measurement_unit: String,
}

impl From<Ingredients> for IngredientView {
    fn from(ingredient: Ingredients) -> Self {
        Self {
            id: ingredient.id,
            name: ingredient.name,
            measurement_unit: ingredient.measurement_unit,
        }
    }
}

#[derive(Serialize)]
pub struct UserView {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar: Option<String>,
    pub is_subscribed: bool,
}

impl UserView {
    pub async fn load(
        connection: &mut DatabaseConnection,
        user: &Users,
        viewer: Option<Uuid>,
    ) -> Result<Self, anyhow::Error> {
        let is_subscribed = match viewer {
            Some(viewer) if viewer != user.id => {
                queries::is_subscribed(connection, viewer, user.id)
                    .await
                    .context("Failed to check subscription.")?
            }
            _ => false,
        };
        Ok(Self {
            id: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            avatar: user.avatar.as_deref().map(media::media_url),
            is_subscribed,
        })
    }
}

#[derive(Serialize)]
pub struct IngredientLineView {
    pub id: Uuid,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

#[derive(Serialize)]
pub struct RecipeView {
    pub id: Uuid,
    pub author: UserView,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
    pub ingredients: Vec<IngredientLineView>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub created_at: DateTime<Utc>,
}

impl RecipeView {
    pub async fn load(
        connection: &mut DatabaseConnection,
        recipe: &Recipes,
        viewer: Option<Uuid>,
    ) -> Result<Self, anyhow::Error> {
        let author = queries::get_user(connection, recipe.author_id)
            .await
            .context("Failed to fetch recipe author.")?
            .context("Recipe author row is missing.")?;
        let author = UserView::load(connection, &author, viewer).await?;
        let ingredients = queries::recipe_lines(connection, recipe.id)
            .await
            .context("Failed to fetch ingredient lines.")?
            .into_iter()
            .map(|(ingredient, amount)| IngredientLineView {
                id: ingredient.id,
                name: ingredient.name,
                measurement_unit: ingredient.measurement_unit,
                amount,
            })
            .collect();
        let (is_favorited, is_in_shopping_cart) = match viewer {
            Some(viewer) => (
                queries::is_favorited(connection, viewer, recipe.id)
                    .await
                    .context("Failed to check favorites.")?,
                queries::is_in_shopping_cart(connection, viewer, recipe.id)
                    .await
                    .context("Failed to check shopping cart.")?,
            ),
            None => (false, false),
        };
        Ok(Self {
            id: recipe.id,
            author,
            name: recipe.name.clone(),
            image: media::media_url(&recipe.image),
            text: recipe.text.clone(),
            cooking_time: recipe.cooking_time,
            ingredients,
            is_favorited,
            is_in_shopping_cart,
            created_at: recipe.created_at,
        })
    }
}

#[derive(Serialize)]
pub struct RecipeShortView {
    pub id: Uuid,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}

impl From<&Recipes> for RecipeShortView {
    fn from(recipe: &Recipes) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name.clone(),
            image: media::media_url(&recipe.image),
            cooking_time: recipe.cooking_time,
        }
    }
}

#[derive(Serialize)]
pub struct SubscriptionView {
    #[serde(flatten)]
    pub user: UserView,
    pub recipes: Vec<RecipeShortView>,
    pub recipes_count: i64,
}

impl SubscriptionView {
    pub async fn load(
        connection: &mut DatabaseConnection,
        author: &Users,
        viewer: Uuid,
        recipes_limit: Option<i64>,
    ) -> Result<Self, anyhow::Error> {
        let user = UserView::load(connection, author, Some(viewer)).await?;
        let recipes = queries::recipes_by_author(
            connection,
            author.id,
            recipes_limit,
        )
        .await
        .context("Failed to fetch author recipes.")?
        .iter()
        .map(RecipeShortView::from)
        .collect();
        let recipes_count =
            queries::count_recipes_by_author(connection, author.id)
                .await
                .context("Failed to count author recipes.")?;
        Ok(Self {
            user,
            recipes,
            recipes_count,
        })
    }
}
