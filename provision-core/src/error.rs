use mongodb::error::{Error as MongoError, ErrorKind};
use thiserror::Error;

/// Server code for "User already exists".
pub const DUPLICATE_USER_CODE: i32 = 51003;
/// Legacy duplicate key code, reported by older servers on user registry collisions.
pub const DUPLICATE_KEY_CODE: i32 = 11000;
pub const UNAUTHORIZED_CODE: i32 = 13;
pub const AUTHENTICATION_FAILED_CODE: i32 = 18;

#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),

    #[error("User '{user}' already exists in database '{db}'")]
    DuplicateUser { user: String, db: String },

    #[error("Unauthorized: {0}")]
    Unauthorized(anyhow::Error),

    #[error("Server unreachable: {0}")]
    Unreachable(anyhow::Error),

    #[error("Database error: {0}")]
    DatabaseError(anyhow::Error),

    #[error("Verification failed: {0}")]
    VerificationError(String),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

impl ProvisionError {
    pub fn is_duplicate_user(&self) -> bool {
        matches!(self, ProvisionError::DuplicateUser { .. })
    }
}

impl From<config::ConfigError> for ProvisionError {
    fn from(err: config::ConfigError) -> Self {
        ProvisionError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for ProvisionError {
    fn from(err: std::io::Error) -> Self {
        ProvisionError::InternalError(anyhow::Error::new(err))
    }
}

impl From<MongoError> for ProvisionError {
    fn from(err: MongoError) -> Self {
        let unauthorized = matches!(
            command_code(&err),
            Some(UNAUTHORIZED_CODE) | Some(AUTHENTICATION_FAILED_CODE)
        ) || matches!(err.kind.as_ref(), ErrorKind::Authentication { .. });

        let unreachable = matches!(
            err.kind.as_ref(),
            ErrorKind::ServerSelection { .. } | ErrorKind::Io(_) | ErrorKind::DnsResolve { .. }
        );

        if unauthorized {
            ProvisionError::Unauthorized(anyhow::Error::new(err))
        } else if unreachable {
            ProvisionError::Unreachable(anyhow::Error::new(err))
        } else {
            ProvisionError::DatabaseError(anyhow::Error::new(err))
        }
    }
}

/// Server error code carried by a failed command, if any.
pub fn command_code(err: &MongoError) -> Option<i32> {
    match err.kind.as_ref() {
        ErrorKind::Command(command_error) => Some(command_error.code),
        _ => None,
    }
}

/// Whether a `createUser` failure means the identifier is already taken.
pub fn is_duplicate_user_error(err: &MongoError) -> bool {
    matches!(
        command_code(err),
        Some(DUPLICATE_USER_CODE) | Some(DUPLICATE_KEY_CODE)
    ) || err.to_string().contains("already exists")
}

/// Classify a `createUser` failure for `user` in `db`.
pub fn classify_create_user_error(err: MongoError, user: &str, db: &str) -> ProvisionError {
    if is_duplicate_user_error(&err) {
        ProvisionError::DuplicateUser {
            user: user.to_string(),
            db: db.to_string(),
        }
    } else {
        ProvisionError::from(err)
    }
}
