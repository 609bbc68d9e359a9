use oauth2::{basic::BasicClient, AuthUrl, ClientId, ClientSecret, RedirectUrl, TokenUrl};
use sea_orm::DatabaseConnection;
use time::Duration;
use tower_sessions::{cookie::SameSite, Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;

use crate::server::{
    config::Config,
    error::{config::ConfigError, AppError},
    state::OAuth2Client,
};

/// Connects to the Sqlite database and runs pending migrations.
///
/// Establishes a connection pool to the Sqlite database using the connection string from
/// configuration, then automatically runs all pending SeaORM migrations to ensure the database
/// schema is up-to-date. This function must complete successfully before the application can
/// access the database.
///
/// # Arguments
/// - `config` - Application configuration containing the database URL
///
/// # Returns
/// - `Ok(DatabaseConnection)` - Connected database with migrations applied
/// - `Err(Error)` - Failed to connect to database or run migrations
pub async fn connect_to_database(config: &Config) -> Result<DatabaseConnection, AppError> {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    let mut opt = ConnectOptions::new(&config.database_url);
    opt.sqlx_logging(false);

    let db = Database::connect(opt).await?;

    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Creates the session layer backed by the application database.
///
/// Sessions live in the same Sqlite database as identities. The session table is
/// created on first start. Sessions expire after seven days of inactivity.
///
/// # Arguments
/// - `db` - Database connection whose pool the session store shares
/// - `config` - Application configuration, used to decide whether cookies are `Secure`
///
/// # Returns
/// - `Ok(SessionManagerLayer<SqliteStore>)` - Session layer ready to wrap the router
/// - `Err(AppError::InternalError)` - Failed to create the session table
pub async fn connect_to_session(
    db: &DatabaseConnection,
    config: &Config,
) -> Result<SessionManagerLayer<SqliteStore>, AppError> {
    let pool = db.get_sqlite_connection_pool();
    let session_store = SqliteStore::new(pool.clone());

    session_store
        .migrate()
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to migrate session store: {}", e)))?;

    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(config.secure_cookies())
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(Duration::days(7)));

    Ok(session_layer)
}

/// Builds the HTTP client used for Steam and Discord requests.
///
/// Redirects are disabled so provider responses cannot bounce requests elsewhere.
pub fn setup_reqwest_client() -> Result<reqwest::Client, AppError> {
    let client = reqwest::ClientBuilder::new()
        .redirect(reqwest::redirect::Policy::none())
        .build()?;

    Ok(client)
}

/// Builds the OAuth2 client for the Discord login flow.
///
/// # Returns
/// - `Ok(OAuth2Client)` - Client with authorize, token and redirect URLs set
/// - `Err(AppError::ConfigErr(ConfigError::InvalidUrl))` - A configured URL does not parse
pub fn setup_oauth_client(config: &Config) -> Result<OAuth2Client, AppError> {
    let auth_url = AuthUrl::new(config.discord_auth_url.clone())
        .map_err(|source| invalid_url("DISCORD_AUTH_URL", source))?;
    let token_url = TokenUrl::new(config.discord_token_url.clone())
        .map_err(|source| invalid_url("DISCORD_TOKEN_URL", source))?;
    let redirect_url = RedirectUrl::new(config.discord_redirect_url.clone())
        .map_err(|source| invalid_url("DISCORD_REDIRECT_URL", source))?;

    let client = BasicClient::new(ClientId::new(config.discord_client_id.clone()))
        .set_client_secret(ClientSecret::new(config.discord_client_secret.clone()))
        .set_auth_uri(auth_url)
        .set_token_uri(token_url)
        .set_redirect_uri(redirect_url);

    Ok(client)
}

fn invalid_url(name: &str, source: url::ParseError) -> ConfigError {
    ConfigError::InvalidUrl {
        name: name.to_string(),
        source,
    }
}
