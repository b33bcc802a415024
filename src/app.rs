use axum::{
    Router,
    routing::{delete, get, post},
};
use time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer, cookie::Key};

use crate::constants::*;
use crate::database::Db;
use crate::{auth, expenses, users};

pub fn api_routes() -> Router<Db> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
        .route("/user/{id}", get(users::get_user))
        .route("/user/{id}/summary", get(users::get_summary))
        .route("/salary/{id}", post(users::update_salary))
        .route("/expenses/{id}", post(expenses::create_expense))
        .route(
            "/expenses/{user_id}/{expense_id}",
            delete(expenses::delete_expense),
        )
        .route("/test", get(users::health))
}

/// Assembles the full application: `/api` routes, sessions and request tracing.
pub fn build_app(db: Db, session_secret: &str) -> anyhow::Result<Router> {
    let key = Key::try_from(session_secret.as_bytes())
        .map_err(|e| anyhow::anyhow!("invalid session secret: {}", e))?;

    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(false)
        .with_name(SESSION_NAME)
        .with_expiry(Expiry::OnInactivity(Duration::days(SESSION_EXPIRY_DAYS)))
        .with_signed(key);

    Ok(Router::new()
        .nest("/api", api_routes())
        .layer(session_layer)
        .with_state(db)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     _span: &tracing::Span| {
                        let status = res.status();
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        ))
}
