use migration::{Migrator, MigratorTrait};
use server::SessionConfig;

mod settings;

const DEFAULT_SESSION_HOURS: i64 = 2;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "lavisco={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    if let Some(mail) = &settings.mail {
        // Recognized for parity with the deployment environment; no in-scope
        // operation sends mail.
        tracing::info!(
            "outbound mail configured: host={} port={} tls={} credentials={}",
            mail.server,
            mail.port.unwrap_or(587),
            mail.use_tls.unwrap_or(true),
            mail.username.is_some() && mail.password.is_some(),
        );
    }

    let db = sea_orm::Database::connect(&settings.server.database).await?;
    Migrator::up(&db, None).await?;
    server::seed_default_admin(&db).await?;

    let engine = engine::Engine::builder().database(db.clone()).build().await?;

    let session = SessionConfig {
        secret_key: settings.server.secret_key.clone(),
        session_hours: settings
            .server
            .session_hours
            .unwrap_or(DEFAULT_SESSION_HOURS),
    };

    let bind = settings
        .server
        .bind
        .clone()
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let addr = format!("{}:{}", bind, settings.server.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    server::run_with_listener(engine, db, session, listener).await?;

    Ok(())
}
