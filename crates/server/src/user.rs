//! Administrative users: entity, session handlers and bootstrap seeding.

use api_types::user::{Login, PasswordChange};
use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{self, SaltString, rand_core::OsRng},
};
use axum::{Extension, Form, extract::State, http::StatusCode};
use axum_extra::extract::cookie::{Cookie, SameSite, SignedCookieJar};
use chrono::Utc;
use sea_orm::{ActiveValue, DatabaseConnection, entity::prelude::*};
use time::Duration;

use crate::{
    ServerError,
    server::{SESSION_COOKIE, ServerState, session_value},
};

const DEFAULT_ADMIN_USERNAME: &str = "admin";
const DEFAULT_ADMIN_PASSWORD: &str = "admin123";
const DEFAULT_ADMIN_EMAIL: &str = "admin@lavisco.com";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub(crate) fn hash_password(password: &str) -> Result<String, password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

pub(crate) fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
}

/// Creates the default admin account when the user table is empty.
///
/// Safe to call on every startup.
pub async fn seed_default_admin(db: &DatabaseConnection) -> Result<(), DbErr> {
    if Entity::find().one(db).await?.is_some() {
        return Ok(());
    }

    let password_hash = hash_password(DEFAULT_ADMIN_PASSWORD)
        .map_err(|err| DbErr::Custom(format!("failed to hash default admin password: {err}")))?;
    let admin = ActiveModel {
        username: ActiveValue::Set(DEFAULT_ADMIN_USERNAME.to_string()),
        email: ActiveValue::Set(DEFAULT_ADMIN_EMAIL.to_string()),
        password_hash: ActiveValue::Set(password_hash),
        full_name: ActiveValue::Set("System Administrator".to_string()),
        created_at: ActiveValue::Set(Utc::now()),
        ..Default::default()
    };
    admin.insert(db).await?;
    tracing::info!("seeded default admin user \"{DEFAULT_ADMIN_USERNAME}\"");
    Ok(())
}

/// Verify credentials and hand out a signed session cookie.
pub async fn login(
    State(state): State<ServerState>,
    jar: SignedCookieJar,
    Form(payload): Form<Login>,
) -> Result<(SignedCookieJar, StatusCode), ServerError> {
    let user = Entity::find()
        .filter(Column::Username.eq(payload.username.as_str()))
        .one(&state.db)
        .await?;

    let Some(user) = user else {
        return Err(ServerError::Unauthorized);
    };
    if !verify_password(&payload.password, &user.password_hash) {
        return Err(ServerError::Unauthorized);
    }

    let expires_at = Utc::now().timestamp() + state.session_hours * 3600;
    let cookie = Cookie::build((SESSION_COOKIE, session_value(&user.username, expires_at)))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::hours(state.session_hours))
        .build();

    Ok((jar.add(cookie), StatusCode::OK))
}

/// Drop the session cookie.
pub async fn logout(jar: SignedCookieJar) -> (SignedCookieJar, StatusCode) {
    let mut removal = Cookie::from(SESSION_COOKIE);
    removal.set_path("/");
    (jar.remove(removal), StatusCode::OK)
}

/// Change the signed-in user's password after verifying the current one.
pub async fn change_password(
    Extension(user): Extension<Model>,
    State(state): State<ServerState>,
    Form(payload): Form<PasswordChange>,
) -> Result<StatusCode, ServerError> {
    if !verify_password(&payload.current_password, &user.password_hash) {
        return Err(ServerError::Unauthorized);
    }
    if payload.new_password.len() < 6 {
        return Err(ServerError::Generic(
            "new password must be at least 6 characters".to_string(),
        ));
    }

    let password_hash = hash_password(&payload.new_password)
        .map_err(|err| ServerError::Generic(format!("failed to hash password: {err}")))?;
    let mut user: ActiveModel = user.into();
    user.password_hash = ActiveValue::Set(password_hash);
    user.update(&state.db).await?;

    Ok(StatusCode::OK)
}
