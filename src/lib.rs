pub mod config;
pub mod helper;
pub mod listing;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod setup;
