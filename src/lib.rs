pub mod analytics;
pub mod auth;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod presentation;
pub mod routes;
pub mod source;
pub mod templates_structs;
