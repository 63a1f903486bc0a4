pub mod authentication;
pub mod configuration;
pub mod database;
pub mod domain;
pub mod media;
pub mod models;
pub mod pagination;
pub mod routes;
pub mod schema;
pub mod startup;
pub mod telemetry;
