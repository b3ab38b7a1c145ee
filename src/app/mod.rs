use std::{env, fmt::Display, path::PathBuf, sync::Arc};

use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;

use crate::auth::token::TokenKeys;
use crate::database::{ContentStore, IdentityStore, ImageStore};

/// Process-wide configuration, read once at startup.
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub jwt_secret: String,
    pub admin_email: String,
    pub admin_password: String,
    pub image_dir: PathBuf,
}

impl Config {
    /// Reads configuration from the environment (`.env` supported).
    /// `DATABASE_URL`, `JWT_SECRET`, `ADMIN_EMAIL` and `ADMIN_PASSWORD`
    /// are required, the rest have defaults.
    pub fn from_env() -> Config {
        dotenv::dotenv().ok();

        Config {
            database_url: env::var("DATABASE_URL")
                .expect("Environment variable 'DATABASE_URL' not set"),
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            jwt_secret: env::var("JWT_SECRET").expect("Environment variable 'JWT_SECRET' not set"),
            admin_email: env::var("ADMIN_EMAIL")
                .expect("Environment variable 'ADMIN_EMAIL' not set"),
            admin_password: env::var("ADMIN_PASSWORD")
                .expect("Environment variable 'ADMIN_PASSWORD' not set"),
            image_dir: PathBuf::from(env::var("IMAGE_DIR").unwrap_or_else(|_| "images".to_string())),
        }
    }
}

/** Used for storing the stores and credentials when handling requests */
pub struct AppState {
    pub identity: Arc<dyn IdentityStore>,
    pub content: Arc<dyn ContentStore>,
    pub images: Arc<dyn ImageStore>,
    pub keys: TokenKeys,
    pub admin_email: String,
    pub admin_password: String,
}

impl Clone for AppState {
    fn clone(&self) -> Self {
        Self {
            identity: self.identity.clone(),
            content: self.content.clone(),
            images: self.images.clone(),
            keys: self.keys.clone(),
            admin_email: self.admin_email.clone(),
            admin_password: self.admin_password.clone(),
        }
    }
}

impl AppState {
    pub fn new(config: &Config) -> AppState {
        let pool = crate::database::db_utils::psql_connect_to_db(&config.database_url);

        AppState {
            identity: Arc::new(crate::database::users::PgIdentityStore::new(pool.clone())),
            content: Arc::new(crate::database::blogs::PgContentStore::new(pool)),
            images: Arc::new(crate::database::images::DiskImageStore::new(
                config.image_dir.clone(),
            )),
            keys: TokenKeys::from_secret(&config.jwt_secret),
            admin_email: config.admin_email.clone(),
            admin_password: config.admin_password.clone(),
        }
    }

    /// State backed by in-memory stores, used by the route tests.
    #[cfg(test)]
    pub fn test() -> AppState {
        let store = Arc::new(crate::database::memory::MemoryStore::new());

        AppState {
            identity: store.clone(),
            content: store,
            images: Arc::new(crate::database::memory::MemoryImages::new()),
            keys: TokenKeys::from_secret("test-secret"),
            admin_email: "admin@blog.test".to_string(),
            admin_password: "super-secret".to_string(),
        }
    }
}

/** Holds the errors we will use during request processing */
#[derive(Debug)]
pub enum AppError {
    /// Missing or malformed input, or bad login credentials.
    Validation(String),
    /// Missing/invalid session credential. Reported uniformly so the
    /// caller cannot tell a bad token from a deleted account.
    Unauthenticated,
    /// Authenticated but not permitted to perform the mutation.
    Forbidden,
    /// Referenced entity absent.
    NotFound(String),
    /// Store or infrastructure failure. The detail is passed through
    /// to the caller.
    Unexpected(String),
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Validation(msg) => f.write_str(msg),
            AppError::Unauthenticated => f.write_str("Invalid credentials"),
            AppError::Forbidden => f.write_str("Forbidden"),
            AppError::NotFound(what) => write!(f, "{} not found", what),
            AppError::Unexpected(_) => f.write_str("Internal server error"),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        match self {
            AppError::Validation(_) => actix_web::http::StatusCode::BAD_REQUEST,
            AppError::Unauthenticated => actix_web::http::StatusCode::UNAUTHORIZED,
            AppError::Forbidden => actix_web::http::StatusCode::FORBIDDEN,
            AppError::NotFound(_) => actix_web::http::StatusCode::NOT_FOUND,
            AppError::Unexpected(_) => actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = ErrorBody {
            message: self.to_string(),
            error: match self {
                AppError::Unexpected(detail) => Some(detail.clone()),
                _ => None,
            },
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}

impl From<diesel::result::Error> for AppError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => AppError::NotFound("Record".to_string()),
            other => AppError::Unexpected(other.to_string()),
        }
    }
}

impl From<diesel::r2d2::PoolError> for AppError {
    fn from(err: diesel::r2d2::PoolError) -> Self {
        AppError::Unexpected(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => AppError::NotFound("File".to_string()),
            _ => AppError::Unexpected(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        match err.classify() {
            serde_json::error::Category::Io => AppError::Unexpected(err.to_string()),
            _ => AppError::Validation("Malformed request body".to_string()),
        }
    }
}

impl From<actix_multipart::MultipartError> for AppError {
    fn from(_: actix_multipart::MultipartError) -> Self {
        AppError::Validation("Malformed multipart payload".to_string())
    }
}

impl std::error::Error for AppError {}
