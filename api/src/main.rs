use anyhow::Context;
use api::auth::middleware::log_request;
use api::routes::app;
use axum::{
    http::{HeaderValue, header::{AUTHORIZATION, CONTENT_DISPOSITION, CONTENT_TYPE}},
    middleware::from_fn,
};
use migration::Migrator;
use sea_orm_migration::MigratorTrait;
use services::user::UserService;
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tracing_appender::rolling;
use util::{
    config::{self, AppConfig},
    paths,
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration and initialize logging
    let _log_guard = init_logging(&config::log_file(), &config::log_level());

    AppConfig::global()
        .validate()
        .map_err(anyhow::Error::msg)
        .context("invalid configuration")?;

    // Set up dependencies
    let db = db::connect().await.context("cannot open database")?;
    Migrator::up(&db, None).await.context("migrations failed")?;
    paths::ensure_dir(paths::uploads_dir()).context("cannot create upload directory")?;

    bootstrap_admin(&db).await?;

    let app_state = AppState::new(db);

    // Build app router
    let app = app(app_state)
        .layer(from_fn(log_request))
        .layer(cors_layer()?);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config::host(), config::port())
        .parse()
        .context("invalid HOST/PORT")?;

    tracing::info!(
        "Starting {} on http://{}:{}",
        config::project_name(),
        config::host(),
        config::port()
    );

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("server crashed")?;

    Ok(())
}

/// Creates the admin named by `ADMIN_USERNAME` / `ADMIN_EMAIL` / `ADMIN_PASSWORD`
/// when the database has no admin yet.
async fn bootstrap_admin(db: &sea_orm::DatabaseConnection) -> anyhow::Result<()> {
    let (username, email, password) = {
        let cfg = AppConfig::global();
        (
            cfg.admin_username.clone(),
            cfg.admin_email.clone(),
            cfg.admin_password.clone(),
        )
    };

    let (Some(username), Some(email), Some(password)) = (username, email, password) else {
        tracing::debug!("no bootstrap admin configured");
        return Ok(());
    };

    match UserService::ensure_admin(db, &username, &email, &password).await {
        Ok(Some(admin)) => tracing::info!(user_id = %admin.id, "bootstrap admin ready"),
        Ok(None) => tracing::debug!("admin already present"),
        Err(e) => return Err(anyhow::Error::new(e).context("cannot create bootstrap admin")),
    }
    Ok(())
}

/// `CORS_ORIGIN` pins the allowed origin; otherwise any origin is accepted.
fn cors_layer() -> anyhow::Result<CorsLayer> {
    let layer = match config::cors_origin() {
        Some(origin) => CorsLayer::new()
            .allow_origin(
                origin
                    .parse::<HeaderValue>()
                    .with_context(|| format!("invalid CORS_ORIGIN '{origin}'"))?,
            )
            .allow_methods(Any)
            .allow_headers([AUTHORIZATION, CONTENT_TYPE]),
        None => CorsLayer::very_permissive(),
    };
    Ok(layer.expose_headers([CONTENT_DISPOSITION, CONTENT_TYPE]))
}

fn init_logging(log_file: &str, log_level: &str) -> tracing_appender::non_blocking::WorkerGuard {
    use std::fs;
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    fs::create_dir_all("logs").ok();

    let file_appender = rolling::daily("logs", log_file);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true);

    let stdout_layer = config::log_to_stdout().then(|| {
        fmt::layer()
            .with_writer(std::io::stdout)
            .with_ansi(true)
            .with_target(true)
    });

    let env_filter =
        EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("api=info,services=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();

    guard
}
