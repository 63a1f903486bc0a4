use crate::database::DatabaseConnection;
use crate::schema::{ingredients, recipe_ingredients, shopping_cart};
use diesel::dsl::sum;
use diesel::prelude::*;
use diesel::result::Error;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

pub struct ShoppingListRow {
    pub name: String,
    pub measurement_unit: String,
    pub total_amount: i64,
}

/// Consolidates the user's shopping cart into one row per
/// (ingredient name, measurement unit) pair. The same ingredient measured
/// in different units stays in separate rows. Summation and ordering both
/// happen in the database; ordering follows the collation of
/// `ingredients.name`.
#[tracing::instrument(name = "Aggregating shopping list", skip(connection))]
pub async fn load_shopping_list(
    connection: &mut DatabaseConnection,
    user_id: Uuid,
) -> Result<Vec<ShoppingListRow>, Error> {
    let rows: Vec<(String, String, Option<i64>)> = recipe_ingredients::table
        .inner_join(ingredients::table)
        .filter(
            recipe_ingredients::recipe_id.eq_any(
                shopping_cart::table
                    .filter(shopping_cart::user_id.eq(user_id))
                    .select(shopping_cart::recipe_id),
            ),
        )
        .group_by((ingredients::name, ingredients::measurement_unit))
        .order(ingredients::name.asc())
        .select((
            ingredients::name,
            ingredients::measurement_unit,
            sum(recipe_ingredients::amount),
        ))
        .load(connection)
        .await?;
    Ok(rows
        .into_iter()
        .map(|(name, measurement_unit, total)| ShoppingListRow {
            name,
            measurement_unit,
            // SUM over a non-empty group of NOT NULL columns.
            total_amount: total.unwrap_or_default(),
        })
        .collect())
}

/// Renders the consolidated list as the downloadable text file body.
/// One line per row, joined with a single newline, no trailing newline.
pub fn render_shopping_list(rows: &[ShoppingListRow]) -> String {
    rows.iter()
        .map(|row| {
            format!(
                "{} —> {} {}",
                row.name, row.total_amount, row.measurement_unit
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
