#![allow(dead_code)]

use std::sync::Arc;

use axum_test::TestServer;
use expense_tracker_server::app::build_app;
use expense_tracker_server::auth::register_user;
use expense_tracker_server::constants::MIN_SESSION_SECRET_LENGTH;
use expense_tracker_server::database::{Db, Records};
use expense_tracker_server::models::{CreateExpensePayload, NumberInput, RegisterPayload};
use expense_tracker_server::store::JsonFileStore;
use tempfile::{TempDir, tempdir};

pub const TEST_EMAIL: &str = "ann@x.com";
pub const TEST_PASSWORD: &str = "Secret123";
pub const TEST_USERNAME: &str = "Ann";

/// Records backed by a snapshot file in a fresh temporary directory.
///
/// Keep the returned `TempDir` alive for the duration of the test.
pub fn setup_test_environment() -> (Db, JsonFileStore, TempDir) {
    let temp_dir = tempdir().expect("Failed to create temporary directory");
    let store = JsonFileStore::in_dir(temp_dir.path());
    let db = Arc::new(Records::new(Arc::new(store.clone())));

    (db, store, temp_dir)
}

pub fn test_server(db: Db) -> TestServer {
    let secret = "k".repeat(MIN_SESSION_SECRET_LENGTH);
    let app = build_app(db, &secret).expect("Failed to build app");
    TestServer::new(app)
}

pub fn register_payload(username: &str, email: &str, password: &str) -> RegisterPayload {
    RegisterPayload {
        username: Some(username.to_string()),
        email: Some(email.to_string()),
        password: Some(password.to_string()),
    }
}

pub async fn register_ann(db: &Records) -> String {
    register_user(db, register_payload(TEST_USERNAME, TEST_EMAIL, TEST_PASSWORD))
        .await
        .expect("Failed to register test user")
}

pub fn expense_payload(
    category: &str,
    amount: f64,
    description: &str,
    date: Option<&str>,
) -> CreateExpensePayload {
    CreateExpensePayload {
        category: Some(category.to_string()),
        amount: Some(NumberInput::Number(amount)),
        description: Some(description.to_string()),
        date: date.map(str::to_string),
    }
}
