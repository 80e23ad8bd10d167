use lazy_static::lazy_static;
use regex::Regex;
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::{
    auth::{
        dto::{LoginRequest, RegisterRequest},
        jwt::JwtKeys,
        password::{hash_password_blocking, verify_password_blocking},
        repo::UserRepo,
        repo_types::User,
    },
    error::AppError,
};

lazy_static! {
    static ref EMAIL_RE: Regex =
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex compiles");
}

// Verified against when the email is unknown so both login failures cost one
// Argon2 run.
static DUMMY_HASH: OnceCell<Option<String>> = OnceCell::const_new();

/// Hash used for unknown-email logins, built on the blocking pool. Called at
/// startup so no request pays for it.
pub async fn dummy_hash() -> Option<&'static str> {
    DUMMY_HASH
        .get_or_init(|| async {
            hash_password_blocking("taskboard-dummy-password".into())
                .await
                .map_err(|e| warn!(error = %e, "dummy hash unavailable"))
                .ok()
        })
        .await
        .as_deref()
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Trimmed, lower-cased email and trimmed password.
pub(crate) fn normalize(email: &str, password: &str) -> (String, String) {
    (email.trim().to_lowercase(), password.trim().to_string())
}

pub async fn register(users: &dyn UserRepo, req: RegisterRequest) -> Result<User, AppError> {
    let (email, password) = normalize(&req.email, &req.password);

    if email.is_empty() || password.is_empty() {
        return Err(AppError::validation("Email and password are required"));
    }
    if !is_valid_email(&email) {
        warn!("registration with malformed email");
        return Err(AppError::validation("Invalid email"));
    }

    if users.find_by_email(&email).await?.is_some() {
        warn!("registration for existing email");
        return Err(AppError::Conflict);
    }

    let hash = hash_password_blocking(password).await?;
    let user = users.create(&email, &hash).await?.ok_or_else(|| {
        warn!("email registered concurrently");
        AppError::Conflict
    })?;

    info!(user_id = %user.id, "user registered");
    Ok(user)
}

/// Verifies credentials and issues a bearer token.
pub async fn login(
    users: &dyn UserRepo,
    keys: &JwtKeys,
    req: LoginRequest,
) -> Result<String, AppError> {
    let (email, password) = normalize(&req.email, &req.password);

    if email.is_empty() || password.is_empty() {
        return Err(AppError::validation("Email and password are required"));
    }

    let Some(user) = users.find_by_email(&email).await? else {
        if let Some(dummy) = dummy_hash().await {
            verify_password_blocking(password, dummy.to_string()).await?;
        }
        warn!("login for unknown email");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password_blocking(password, user.password_hash.clone()).await? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AppError::InvalidCredentials);
    }

    let token = keys.sign(user.id)?;
    info!(user_id = %user.id, "user logged in");
    Ok(token)
}
