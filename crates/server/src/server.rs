use axum::{
    Router,
    extract::{FromRef, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::{Key, SignedCookieJar};
use chrono::Utc;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use std::sync::Arc;

use crate::{ministers, payments, reports, statistics, user};
use engine::Engine;

pub(crate) const SESSION_COOKIE: &str = "session";

/// Session behavior, taken from the application settings.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Cookie-signing secret; must be at least 32 bytes.
    pub secret_key: String,
    pub session_hours: i64,
}

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub db: DatabaseConnection,
    pub key: Key,
    pub session_hours: i64,
}

impl ServerState {
    pub fn new(
        engine: Engine,
        db: DatabaseConnection,
        session: &SessionConfig,
    ) -> Result<Self, std::io::Error> {
        // `Key::derive_from` panics below 32 bytes of input.
        if session.secret_key.len() < 32 {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "secret key must be at least 32 bytes",
            ));
        }
        Ok(Self {
            engine: Arc::new(engine),
            db,
            key: Key::derive_from(session.secret_key.as_bytes()),
            session_hours: session.session_hours,
        })
    }
}

impl FromRef<ServerState> for Key {
    fn from_ref(state: &ServerState) -> Key {
        state.key.clone()
    }
}

/// Session cookie value: `<username>:<expires_unix>`.
pub(crate) fn session_value(username: &str, expires_at: i64) -> String {
    format!("{username}:{expires_at}")
}

fn parse_session(value: &str) -> Option<(&str, i64)> {
    let (username, expires_at) = value.rsplit_once(':')?;
    Some((username, expires_at.parse().ok()?))
}

async fn auth(
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let jar = SignedCookieJar::from_headers(request.headers(), state.key.clone());
    let Some(cookie) = jar.get(SESSION_COOKIE) else {
        return Err(StatusCode::UNAUTHORIZED);
    };
    let Some((username, expires_at)) = parse_session(cookie.value()) else {
        return Err(StatusCode::UNAUTHORIZED);
    };
    if expires_at < Utc::now().timestamp() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let user: Option<user::Model> = user::Entity::find()
        .filter(user::Column::Username.eq(username))
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let Some(user) = user else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Html(
            "<!DOCTYPE html>\n<html>\n<head><title>Page Not Found</title></head>\n\
             <body><h1>404 - Page Not Found</h1>\
             <p>The page you are looking for does not exist.</p></body>\n</html>",
        ),
    )
}

pub fn router(state: ServerState) -> Router {
    let protected = Router::new()
        .route("/dashboard", get(statistics::dashboard))
        .route("/ministers", get(ministers::list))
        .route("/ministers/add", post(ministers::add))
        .route("/ministers/edit/{id}", post(ministers::edit))
        .route("/ministers/delete/{id}", post(ministers::delete))
        .route("/payments", get(payments::list))
        .route("/payments/add", post(payments::add))
        .route("/payments/edit/{id}", post(payments::edit))
        .route("/payments/delete/{id}", post(payments::delete))
        .route(
            "/reports/generate/{report_type}",
            post(reports::generate_csv),
        )
        .route("/reports/pdf/{report_type}", post(reports::generate_pdf))
        .route("/profile/password", post(user::change_password))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth));

    Router::new()
        .merge(protected)
        .route("/login", post(user::login))
        .route("/logout", get(user::logout))
        .fallback(not_found)
        .with_state(state)
}

pub async fn run(engine: Engine, db: DatabaseConnection, session: SessionConfig) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, db, session, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    session: SessionConfig,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState::new(engine, db, &session)?;

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    session: SessionConfig,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, db, session, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
