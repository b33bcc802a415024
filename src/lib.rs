pub mod app;
pub mod auth;
pub mod config;
pub mod constants;
pub mod database;
pub mod error;
pub mod expenses;
pub mod models;
pub mod store;
pub mod users;
