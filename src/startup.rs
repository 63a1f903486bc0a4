use std::path::PathBuf;

use crate::configuration::Settings;
use crate::database::{create_connection_pool, DatabaseConnectionPool};
use crate::routes;
use axum::{extract::Request, routing, serve::Serve, Router};
use secrecy::ExposeSecret;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info_span;
use uuid::Uuid;

#[derive(Clone)]
pub struct ApplicationState {
    pub database_pool: DatabaseConnectionPool,
    pub base_url: String,
    pub media_root: PathBuf,
    pub page_size: i64,
}

pub struct Application {
    port: u16,
    pool: DatabaseConnectionPool,
    server: Serve<Router, Router>,
}

impl Application {
    pub async fn build(configuration: Settings) -> Result<Self, std::io::Error> {
        let connection_pool = create_connection_pool(
            configuration.database.connection_string().expose_secret(),
        );
        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener = TcpListener::bind(address).await?;
        let port = listener.local_addr()?.port();
        let state = ApplicationState {
            database_pool: connection_pool,
            base_url: configuration.application.base_url,
            media_root: PathBuf::from(configuration.application.media_root),
            page_size: configuration.application.page_size,
        };
        let pool = state.database_pool.clone();
        Ok(Self {
            port,
            pool,
            server: run(listener, state),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn pool(&self) -> DatabaseConnectionPool {
        self.pool.clone()
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn run(
    listener: TcpListener,
    state: ApplicationState,
) -> Serve<Router, Router> {
    let app: Router = Router::new()
        .route("/health_check", routing::get(routes::health_check))
        .route("/api/ingredients", routing::get(routes::list_ingredients))
        .route(
            "/api/recipes",
            routing::get(routes::list_recipes).post(routes::create_recipe),
        )
        .route(
            "/api/recipes/download_shopping_cart",
            routing::get(routes::download_shopping_cart),
        )
        .route(
            "/api/recipes/:id",
            routing::get(routes::get_recipe)
                .patch(routes::update_recipe)
                .delete(routes::delete_recipe),
        )
        .route(
            "/api/recipes/:id/get-link",
            routing::get(routes::get_short_link),
        )
        .route(
            "/api/recipes/:id/favorite",
            routing::post(routes::add_favorite)
                .delete(routes::remove_favorite),
        )
        .route(
            "/api/recipes/:id/shopping_cart",
            routing::post(routes::add_to_cart)
                .delete(routes::remove_from_cart),
        )
        .route(
            "/api/users/subscriptions",
            routing::get(routes::list_subscriptions),
        )
        .route("/api/users/me", routing::get(routes::current_user))
        .route(
            "/api/users/me/avatar",
            routing::put(routes::set_avatar).delete(routes::delete_avatar),
        )
        .route("/api/users/:id", routing::get(routes::get_user))
        .route(
            "/api/users/:id/subscribe",
            routing::post(routes::subscribe).delete(routes::unsubscribe),
        )
        .route("/s/:id", routing::get(routes::redirect_short_link))
        .layer(TraceLayer::new_for_http().make_span_with(
            |request: &Request<_>| {
                let request_id = Uuid::now_v7();
                info_span!("Http Request", %request_id, request_uri = %request.uri())
            },
        ))
        .with_state(state);

    axum::serve(listener, app)
}
