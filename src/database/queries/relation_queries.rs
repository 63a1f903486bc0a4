use crate::database::DatabaseConnection;
use crate::models::{Favorites, ShoppingCart, Subscriptions};
use crate::schema::{favorites, shopping_cart, subscriptions};
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel::result::Error;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

// All three relation sets share one contract: insert surfaces the unique
// constraint violation to the caller (a duplicate add is a user-visible
// conflict, not a no-op), and delete reports how many rows matched so that
// removing an absent entry can be treated as a request error.

#[tracing::instrument(name = "Adding recipe to favorites", skip(connection))]
pub async fn insert_favorite(
    connection: &mut DatabaseConnection,
    user_id: Uuid,
    recipe_id: Uuid,
) -> Result<(), Error> {
    diesel::insert_into(favorites::table)
        .values(Favorites::new(user_id, recipe_id))
        .execute(connection)
        .await?;
    Ok(())
}

#[tracing::instrument(name = "Removing recipe from favorites", skip(connection))]
pub async fn delete_favorite(
    connection: &mut DatabaseConnection,
    user_id: Uuid,
    recipe_id: Uuid,
) -> Result<usize, Error> {
    diesel::delete(
        favorites::table
            .filter(favorites::user_id.eq(user_id))
            .filter(favorites::recipe_id.eq(recipe_id)),
    )
    .execute(connection)
    .await
}

#[tracing::instrument(name = "Checking favorite membership", skip(connection))]
pub async fn is_favorited(
    connection: &mut DatabaseConnection,
    user_id: Uuid,
    recipe_id: Uuid,
) -> Result<bool, Error> {
    diesel::select(exists(
        favorites::table
            .filter(favorites::user_id.eq(user_id))
            .filter(favorites::recipe_id.eq(recipe_id)),
    ))
    .get_result(connection)
    .await
}

#[tracing::instrument(name = "Adding recipe to shopping cart", skip(connection))]
pub async fn insert_cart_entry(
    connection: &mut DatabaseConnection,
    user_id: Uuid,
    recipe_id: Uuid,
) -> Result<(), Error> {
    diesel::insert_into(shopping_cart::table)
        .values(ShoppingCart::new(user_id, recipe_id))
        .execute(connection)
        .await?;
    Ok(())
}

#[tracing::instrument(
    name = "Removing recipe from shopping cart",
    skip(connection)
)]
pub async fn delete_cart_entry(
    connection: &mut DatabaseConnection,
    user_id: Uuid,
    recipe_id: Uuid,
) -> Result<usize, Error> {
    diesel::delete(
        shopping_cart::table
            .filter(shopping_cart::user_id.eq(user_id))
            .filter(shopping_cart::recipe_id.eq(recipe_id)),
    )
    .execute(connection)
    .await
}

#[tracing::instrument(name = "Checking cart membership", skip(connection))]
pub async fn is_in_shopping_cart(
    connection: &mut DatabaseConnection,
    user_id: Uuid,
    recipe_id: Uuid,
) -> Result<bool, Error> {
    diesel::select(exists(
        shopping_cart::table
            .filter(shopping_cart::user_id.eq(user_id))
            .filter(shopping_cart::recipe_id.eq(recipe_id)),
    ))
    .get_result(connection)
    .await
}

#[tracing::instrument(name = "Adding subscription", skip(connection))]
pub async fn insert_subscription(
    connection: &mut DatabaseConnection,
    user_id: Uuid,
    author_id: Uuid,
) -> Result<(), Error> {
    diesel::insert_into(subscriptions::table)
        .values(Subscriptions::new(user_id, author_id))
        .execute(connection)
        .await?;
    Ok(())
}

#[tracing::instrument(name = "Removing subscription", skip(connection))]
pub async fn delete_subscription(
    connection: &mut DatabaseConnection,
    user_id: Uuid,
    author_id: Uuid,
) -> Result<usize, Error> {
    diesel::delete(
        subscriptions::table
            .filter(subscriptions::user_id.eq(user_id))
            .filter(subscriptions::author_id.eq(author_id)),
    )
    .execute(connection)
    .await
}

#[tracing::instrument(name = "Checking subscription", skip(connection))]
pub async fn is_subscribed(
    connection: &mut DatabaseConnection,
    user_id: Uuid,
    author_id: Uuid,
) -> Result<bool, Error> {
    diesel::select(exists(
        subscriptions::table
            .filter(subscriptions::user_id.eq(user_id))
            .filter(subscriptions::author_id.eq(author_id)),
    ))
    .get_result(connection)
    .await
}
