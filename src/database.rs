use anyhow::Context;
use diesel_async::pooled_connection::deadpool::Pool;
use diesel_async::{pooled_connection::deadpool::Object, AsyncPgConnection};

pub mod diesel_configuration;
pub mod queries;

pub type DatabaseConnection = Object<AsyncPgConnection>;
pub type DatabaseConnectionPool = Pool<AsyncPgConnection>;

#[tracing::instrument(
    name = "Retrieving database connection from pool.",
    skip(pool)
)]
pub async fn get_connection(
    pool: Pool<AsyncPgConnection>,
) -> Result<DatabaseConnection, anyhow::Error> {
    pool.get()
        .await
        .context("Could not get connection from pool.")
}

pub use diesel_configuration::create_connection_pool;
