use crate::database::DatabaseConnection;
use crate::models::Ingredients;
use crate::schema::ingredients;
use diesel::prelude::*;
use diesel::result::Error;
use diesel_async::RunQueryDsl;

/// Case-insensitive starts-with search over the catalog. An absent or
/// empty prefix returns the whole catalog. The result is never paginated.
#[tracing::instrument(name = "Searching ingredient catalog", skip(connection))]
pub async fn search_ingredients(
    connection: &mut DatabaseConnection,
    prefix: Option<&str>,
) -> Result<Vec<Ingredients>, Error> {
    let mut query = ingredients::table
        .select(Ingredients::as_select())
        .order(ingredients::name.asc())
        .into_boxed();
    if let Some(prefix) = prefix.filter(|p| !p.is_empty()) {
        query = query
            .filter(ingredients::name.ilike(format!("{}%", escape_like(prefix))));
    }
    query.load(connection).await
}

// LIKE metacharacters in the prefix must match literally.
fn escape_like(prefix: &str) -> String {
    prefix
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
