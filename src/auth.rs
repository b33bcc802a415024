use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum::{Json, extract::State, http::StatusCode};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tower_sessions::Session;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::constants::*;
use crate::database::{Db, Records};
use crate::error::{AppError, AppJson};
use crate::models::{
    AuthenticatedUser, LoginPayload, LoginResponse, PublicUser, RegisterPayload, RegisterResponse,
    User,
};

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Hashing(e.to_string()))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Hashing(format!("failed to parse password hash: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Returns the value if it is present and not blank.
pub fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default()
}

/// Creates a user with zero salary and no expenses. Returns the new id.
pub async fn register_user(db: &Records, payload: RegisterPayload) -> Result<String, AppError> {
    let (Some(username), Some(email), Some(password)) = (
        required(payload.username),
        required(payload.email),
        required(payload.password),
    ) else {
        return Err(AppError::validation(ERR_ALL_FIELDS_REQUIRED));
    };

    info!(%email, "registration attempt");

    // Fail fast before paying for the hash; re-checked under the write gate.
    if db.find_user_by_email(&email).await?.is_some() {
        return Err(AppError::DuplicateUser);
    }

    let user = User {
        id: Uuid::new_v4().to_string(),
        username,
        email,
        password: hash_password(&password)?,
        salary: 0.0,
        expenses: Vec::new(),
        created_at: now_rfc3339(),
    };

    let user_id = db
        .modify(move |users| {
            if users.iter().any(|u| u.email == user.email) {
                return Err(AppError::DuplicateUser);
            }
            let id = user.id.clone();
            users.push(user);
            Ok(id)
        })
        .await?;

    info!(%user_id, "user registered");
    Ok(user_id)
}

/// Checks an email/password pair. Unknown email and wrong password fail the
/// same way.
pub async fn authenticate(
    db: &Records,
    payload: LoginPayload,
) -> Result<AuthenticatedUser, AppError> {
    let (Some(email), Some(password)) = (required(payload.email), required(payload.password))
    else {
        return Err(AppError::validation(ERR_LOGIN_FIELDS_REQUIRED));
    };

    info!(%email, "login attempt");

    let Some(user) = db.find_user_by_email(&email).await? else {
        warn!(%email, "login for unknown email");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password(&password, &user.password)? {
        warn!(%email, "login with wrong password");
        return Err(AppError::InvalidCredentials);
    }

    Ok(AuthenticatedUser {
        user_id: user.id,
        username: user.username,
    })
}

#[instrument(skip_all)]
pub async fn register(
    State(db): State<Db>,
    AppJson(payload): AppJson<RegisterPayload>,
) -> Result<Json<RegisterResponse>, AppError> {
    let user_id = register_user(&db, payload).await?;

    Ok(Json(RegisterResponse {
        success: true,
        message: MSG_USER_CREATED.to_string(),
        user_id,
    }))
}

#[instrument(skip_all)]
pub async fn login(
    State(db): State<Db>,
    session: Session,
    AppJson(payload): AppJson<LoginPayload>,
) -> Result<Json<LoginResponse>, AppError> {
    let user = authenticate(&db, payload).await?;

    session
        .insert(SESSION_USER_ID_KEY, &user.user_id)
        .await
        .map_err(|e| AppError::Session(e.to_string()))?;
    session
        .insert(SESSION_USERNAME_KEY, &user.username)
        .await
        .map_err(|e| AppError::Session(e.to_string()))?;

    info!(user_id = %user.user_id, "login successful");
    Ok(Json(LoginResponse {
        success: true,
        message: MSG_LOGIN_SUCCESS.to_string(),
        user_id: user.user_id,
        username: user.username,
    }))
}

pub async fn get_current_user(session: &Session) -> Result<AuthenticatedUser, AppError> {
    let user_id: Option<String> = session
        .get(SESSION_USER_ID_KEY)
        .await
        .map_err(|e| AppError::Session(e.to_string()))?;
    let username: Option<String> = session
        .get(SESSION_USERNAME_KEY)
        .await
        .map_err(|e| AppError::Session(e.to_string()))?;

    match (user_id, username) {
        (Some(user_id), Some(username)) => Ok(AuthenticatedUser { user_id, username }),
        _ => Err(AppError::NotLoggedIn),
    }
}

/// Read projection of the logged-in user.
pub async fn me(State(db): State<Db>, session: Session) -> Result<Json<PublicUser>, AppError> {
    let current = get_current_user(&session).await?;
    let user = db
        .find_user_by_id(&current.user_id)
        .await?
        .ok_or(AppError::UserNotFound)?;

    Ok(Json(user.into()))
}

pub async fn logout(session: Session) -> StatusCode {
    session.clear().await;

    StatusCode::NO_CONTENT
}
