use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use diesel::prelude::*;
use diesel_async::async_connection_wrapper::AsyncConnectionWrapper;
use diesel_async::pooled_connection::deadpool::Pool;
use diesel_async::AsyncConnection;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use diesel_migrations::embed_migrations;
use diesel_migrations::EmbeddedMigrations;
use diesel_migrations::MigrationHarness;
use foodgram_backend::configuration::get_configuration;
use foodgram_backend::configuration::DatabaseSettings;
use foodgram_backend::database::DatabaseConnection;
use foodgram_backend::models::{AuthTokens, Ingredients, Users};
use foodgram_backend::schema::{auth_tokens, ingredients, users};
use foodgram_backend::telemetry::setup_tracing;
use once_cell::sync::Lazy;
use rand::distributions::Alphanumeric;
use rand::thread_rng;
use rand::Rng;
use reqwest::Client;
use secrecy::ExposeSecret;
use uuid::Uuid;

const MIGRATION: EmbeddedMigrations = embed_migrations!();

static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter = "debug";
    if std::env::var("TEST_LOG").is_ok() {
        setup_tracing("test", default_filter, std::io::stdout);
    } else {
        setup_tracing("test", default_filter, std::io::sink);
    }
});

pub struct TestUser {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub token: String,
}

impl TestUser {
    pub fn generate() -> Self {
        let user_id = Uuid::now_v7();
        Self {
            user_id,
            username: user_id.to_string(),
            email: format!("{}@example.com", user_id),
            token: random_token(),
        }
    }

    pub async fn store(&self, connection: &mut DatabaseConnection) {
        let user = Users {
            id: self.user_id,
            email: self.email.clone(),
            username: self.username.clone(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            avatar: None,
        };
        diesel::insert_into(users::table)
            .values(&user)
            .execute(connection)
            .await
            .expect("Failed to add user");
        diesel::insert_into(auth_tokens::table)
            .values(AuthTokens {
                key: self.token.clone(),
                user_id: self.user_id,
            })
            .execute(connection)
            .await
            .expect("Failed to add auth token");
    }
}

fn random_token() -> String {
    let mut rng = thread_rng();
    std::iter::repeat_with(|| rng.sample(Alphanumeric))
        .map(char::from)
        .take(40)
        .collect()
}

pub fn png_data_url() -> String {
    let png_magic = [0x89u8, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    format!("data:image/png;base64,{}", STANDARD.encode(png_magic))
}

pub fn recipe_payload(
    name: &str,
    lines: &[(Uuid, i32)],
) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "text": "Cook it well.",
        "cooking_time": 30,
        "image": png_data_url(),
        "ingredients": lines
            .iter()
            .map(|(id, amount)| serde_json::json!({"id": id, "amount": amount}))
            .collect::<Vec<_>>(),
    })
}

pub struct TestApp {
    pub address: String,
    pub pool: Pool<AsyncPgConnection>,
    pub test_user: TestUser,
}

impl TestApp {
    pub async fn connection(&self) -> DatabaseConnection {
        self.pool
            .get()
            .await
            .expect("Could not retrieve database connection")
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        Client::new()
            .get(format!("{}{}", &self.address, path))
            .send()
            .await
            .expect("Request failed.")
    }

    pub async fn get_authed(
        &self,
        path: &str,
        token: &str,
    ) -> reqwest::Response {
        Client::new()
            .get(format!("{}{}", &self.address, path))
            .header("Authorization", format!("Token {}", token))
            .send()
            .await
            .expect("Request failed.")
    }

    pub async fn post_authed(
        &self,
        path: &str,
        token: &str,
    ) -> reqwest::Response {
        Client::new()
            .post(format!("{}{}", &self.address, path))
            .header("Authorization", format!("Token {}", token))
            .send()
            .await
            .expect("Request failed.")
    }

    pub async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> reqwest::Response {
        Client::new()
            .post(format!("{}{}", &self.address, path))
            .json(body)
            .send()
            .await
            .expect("Request failed.")
    }

    pub async fn post_json_authed(
        &self,
        path: &str,
        body: &serde_json::Value,
        token: &str,
    ) -> reqwest::Response {
        Client::new()
            .post(format!("{}{}", &self.address, path))
            .header("Authorization", format!("Token {}", token))
            .json(body)
            .send()
            .await
            .expect("Request failed.")
    }

    pub async fn put_json_authed(
        &self,
        path: &str,
        body: &serde_json::Value,
        token: &str,
    ) -> reqwest::Response {
        Client::new()
            .put(format!("{}{}", &self.address, path))
            .header("Authorization", format!("Token {}", token))
            .json(body)
            .send()
            .await
            .expect("Request failed.")
    }

    pub async fn patch_json_authed(
        &self,
        path: &str,
        body: &serde_json::Value,
        token: &str,
    ) -> reqwest::Response {
        Client::new()
            .patch(format!("{}{}", &self.address, path))
            .header("Authorization", format!("Token {}", token))
            .json(body)
            .send()
            .await
            .expect("Request failed.")
    }

    pub async fn delete_authed(
        &self,
        path: &str,
        token: &str,
    ) -> reqwest::Response {
        Client::new()
            .delete(format!("{}{}", &self.address, path))
            .header("Authorization", format!("Token {}", token))
            .send()
            .await
            .expect("Request failed.")
    }

    /// Catalog rows are reference data maintained administratively, so
    /// tests seed them straight into the database.
    pub async fn seed_ingredient(&self, name: &str, unit: &str) -> Uuid {
        let ingredient =
            Ingredients::new(name.to_string(), unit.to_string());
        let id = ingredient.id;
        let mut connection = self.connection().await;
        diesel::insert_into(ingredients::table)
            .values(&ingredient)
            .execute(&mut connection)
            .await
            .expect("Failed to seed ingredient");
        id
    }

    pub async fn store_additional_user(&self) -> TestUser {
        let user = TestUser::generate();
        let mut connection = self.connection().await;
        user.store(&mut connection).await;
        user
    }

    /// Creates a recipe through the public API and returns its id.
    pub async fn create_recipe(
        &self,
        token: &str,
        name: &str,
        lines: &[(Uuid, i32)],
    ) -> Uuid {
        let response = self
            .post_json_authed("/api/recipes", &recipe_payload(name, lines), token)
            .await;
        assert_eq!(201, response.status().as_u16());
        let body: serde_json::Value =
            response.json().await.expect("Invalid recipe body");
        body["id"]
            .as_str()
            .and_then(|id| Uuid::parse_str(id).ok())
            .expect("Recipe id missing from response")
    }
}

pub async fn spawn_app() -> TestApp {
    Lazy::force(&TRACING);

    let configuration = {
        let mut c = get_configuration().expect("failed to get configuration");
        c.database.database_name = Uuid::now_v7().to_string();
        c.application.port = 0;
        c.application.media_root = std::env::temp_dir()
            .join(&c.database.database_name)
            .display()
            .to_string();
        c
    };

    configure_database(&configuration.database).await;

    let application =
        foodgram_backend::startup::Application::build(configuration)
            .await
            .expect("Failed to build app.");
    let testapp = TestApp {
        address: format!("http://127.0.0.1:{}", application.port()),
        pool: application.pool(),
        test_user: TestUser::generate(),
    };
    let mut connection = testapp
        .pool
        .get()
        .await
        .expect("Could not retrieve database connection");
    testapp.test_user.store(&mut connection).await;
    tokio::spawn(application.run_until_stopped());
    testapp
}

async fn configure_database(db_settings: &DatabaseSettings) {
    let mut db_conn = AsyncPgConnection::establish(
        db_settings
            .connection_string_without_database()
            .expose_secret(),
    )
    .await
    .expect("Failed to connect");
    // The "C" collation pins the aggregator's ordering to raw codepoint
    // order, keeping the shopping-list output deterministic.
    let query = diesel::sql_query(format!(
        r#"CREATE DATABASE "{}" TEMPLATE template0 LC_COLLATE 'C' LC_CTYPE 'C';"#,
        db_settings.database_name
    ));
    query
        .execute(&mut db_conn)
        .await
        .expect("Failed to create database");
    let conn_string = db_settings.connection_string().clone();
    foodgram_backend::telemetry::spawn_blocking_with_tracing(move || {
        let mut db_conn: AsyncConnectionWrapper<AsyncPgConnection> =
            AsyncConnectionWrapper::<AsyncPgConnection>::establish(
                conn_string.expose_secret(),
            )
            .expect("Error");
        db_conn.run_pending_migrations(MIGRATION).unwrap();
    })
    .await
    .expect("thread panic");
}
