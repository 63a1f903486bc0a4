use crate::database::DatabaseConnection;
use crate::models::Users;
use crate::schema::{subscriptions, users};
use diesel::prelude::*;
use diesel::result::Error;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

#[tracing::instrument(name = "Fetching user by id", skip(connection))]
pub async fn get_user(
    connection: &mut DatabaseConnection,
    user_id: Uuid,
) -> Result<Option<Users>, Error> {
    users::table
        .find(user_id)
        .select(Users::as_select())
        .first(connection)
        .await
        .optional()
}

#[tracing::instrument(name = "Listing subscribed authors", skip(connection))]
pub async fn subscribed_authors(
    connection: &mut DatabaseConnection,
    user_id: Uuid,
    offset: i64,
    limit: i64,
) -> Result<Vec<Users>, Error> {
    users::table
        .filter(
            users::id.eq_any(
                subscriptions::table
                    .filter(subscriptions::user_id.eq(user_id))
                    .select(subscriptions::author_id),
            ),
        )
        .order(users::username.asc())
        .offset(offset)
        .limit(limit)
        .select(Users::as_select())
        .load(connection)
        .await
}

#[tracing::instrument(name = "Counting subscribed authors", skip(connection))]
pub async fn count_subscribed_authors(
    connection: &mut DatabaseConnection,
    user_id: Uuid,
) -> Result<i64, Error> {
    subscriptions::table
        .filter(subscriptions::user_id.eq(user_id))
        .count()
        .get_result(connection)
        .await
}

#[tracing::instrument(name = "Updating user avatar", skip(connection))]
pub async fn set_avatar(
    connection: &mut DatabaseConnection,
    user_id: Uuid,
    avatar: Option<&str>,
) -> Result<usize, Error> {
    diesel::update(users::table.find(user_id))
        .set(users::avatar.eq(avatar))
        .execute(connection)
        .await
}
