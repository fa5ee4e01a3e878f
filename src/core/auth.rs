//! User accounts and authentication.
//!
//! Passwords are stored as Argon2id PHC strings. A successful login returns an HS256
//! JWT carrying the user's id, name and role. The role travels in the token but no
//! operation checks it.

use crate::{
    config::AuthSettings,
    entities::{User, UserRole, user},
    errors::{Error, Result},
};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use sea_orm::{PaginatorTrait, Set, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Shortest password accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Message for every failed login, so callers cannot probe for usernames.
const BAD_CREDENTIALS: &str = "invalid username or password";

/// Arguments for registering a user.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    /// Unique login name, must not be blank
    pub username: String,
    /// Plain password, at least [`MIN_PASSWORD_LEN`] characters
    pub password: String,
    /// Display name
    pub real_name: Option<String>,
    /// Contact email
    pub email: Option<String>,
    /// Contact phone
    pub phone: Option<String>,
}

/// Claims embedded in issued tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Id of the authenticated user
    pub user_id: i64,
    /// Login name at issue time
    pub username: String,
    /// Role at issue time
    pub role: UserRole,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Not valid before (unix seconds)
    pub nbf: i64,
    /// Expiry (unix seconds)
    pub exp: i64,
    /// Issuer, checked against the configured one
    pub iss: String,
}

/// Hash a password using Argon2id
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::Internal {
            message: format!("failed to hash password: {e}"),
        })
}

/// Verify a password against a stored hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| Error::Internal {
        message: format!("stored password hash is invalid: {e}"),
    })?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Registers a new account with the default role.
#[instrument(skip(db, new), fields(username = %new.username))]
pub async fn register_user(db: &DatabaseConnection, new: NewUser) -> Result<user::Model> {
    let username = new.username.trim().to_string();
    if username.is_empty() {
        return Err(Error::invalid_argument("username cannot be empty"));
    }
    if new.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(Error::invalid_argument(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let taken = User::find()
        .filter(user::Column::Username.eq(username.as_str()))
        .count(db)
        .await?;
    if taken > 0 {
        return Err(Error::Conflict {
            message: format!("username {username} already exists"),
        });
    }

    let now = Utc::now();
    let user = user::ActiveModel {
        username: Set(username),
        password_hash: Set(hash_password(&new.password)?),
        role: Set(UserRole::default()),
        real_name: Set(new.real_name),
        email: Set(new.email),
        phone: Set(new.phone),
        last_login: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let created = user.insert(db).await?;
    info!(id = created.id, "User registered");
    Ok(created)
}

/// Checks credentials and records the login time.
///
/// Unknown usernames and wrong passwords fail identically with
/// [`Error::Unauthorized`].
#[instrument(skip(db, password))]
pub async fn authenticate(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
) -> Result<user::Model> {
    let Some(found) = User::find()
        .filter(user::Column::Username.eq(username.trim()))
        .one(db)
        .await?
    else {
        debug!("Login for unknown user");
        return Err(unauthorized(BAD_CREDENTIALS));
    };

    if !verify_password(password, &found.password_hash)? {
        debug!("Login with wrong password");
        return Err(unauthorized(BAD_CREDENTIALS));
    }

    let mut active: user::ActiveModel = found.into();
    active.last_login = Set(Some(Utc::now()));
    let updated = active.update(db).await?;
    info!(user_id = updated.id, "User logged in");
    Ok(updated)
}

/// Finds a user by id, returning None if it does not exist.
pub async fn get_user_by_id(db: &DatabaseConnection, user_id: i64) -> Result<Option<user::Model>> {
    User::find_by_id(user_id).one(db).await.map_err(Into::into)
}

/// Issues a signed token for `user` valid for the configured number of hours.
pub fn issue_token(user: &user::Model, settings: &AuthSettings) -> Result<String> {
    let now = Utc::now();
    let exp = now
        .checked_add_signed(Duration::hours(settings.token_ttl_hours))
        .unwrap_or(now);
    let claims = Claims {
        user_id: user.id,
        username: user.username.clone(),
        role: user.role,
        iat: now.timestamp(),
        nbf: now.timestamp(),
        exp: exp.timestamp(),
        iss: settings.issuer.clone(),
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(settings.jwt_secret.as_bytes()),
    )
    .map_err(|e| Error::Internal {
        message: format!("failed to sign token: {e}"),
    })
}

/// Validates signature, expiry and issuer of `token` and returns its claims.
pub fn decode_token(token: &str, settings: &AuthSettings) -> Result<Claims> {
    let mut validation = Validation::default();
    validation.set_issuer(&[settings.issuer.as_str()]);
    validation.validate_nbf = true;

    jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(settings.jwt_secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        debug!("Token rejected: {}", e);
        unauthorized("invalid or expired token")
    })
}

fn unauthorized(message: &str) -> Error {
    Error::Unauthorized {
        message: message.to_string(),
    }
}
