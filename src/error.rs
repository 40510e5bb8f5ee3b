use thiserror::Error;

/// Coarse classification used to pick the message shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Validation,
    Auth,
    Authorization,
    Database,
    Unknown,
}

const NETWORK_MARKERS: &[&str] = &["network", "fetch", "connection refused", "timed out", "offline"];
const VALIDATION_MARKERS: &[&str] = &["validation", "invalid", "must be", "required", "format"];
const AUTHORIZATION_MARKERS: &[&str] = &[
    "permission",
    "forbidden",
    "not allowed",
    "row-level security",
    "policy",
];
const AUTH_MARKERS: &[&str] = &["auth", "jwt", "session", "login", "credentials", "token"];
const DATABASE_MARKERS: &[&str] = &["database", "sqlite", "constraint", "duplicate", "sql"];

impl ErrorCategory {
    /// Classifies a free-text error message by substring.
    ///
    /// Authorization is checked before auth so that "permission denied for
    /// authenticated user" lands in the more specific bucket.
    pub fn from_message(message: &str) -> Self {
        let lower = message.to_lowercase();
        let has_any = |markers: &[&str]| markers.iter().any(|m| lower.contains(m));

        if has_any(NETWORK_MARKERS) {
            ErrorCategory::Network
        } else if has_any(VALIDATION_MARKERS) {
            ErrorCategory::Validation
        } else if has_any(AUTHORIZATION_MARKERS) {
            ErrorCategory::Authorization
        } else if has_any(AUTH_MARKERS) {
            ErrorCategory::Auth
        } else if has_any(DATABASE_MARKERS) {
            ErrorCategory::Database
        } else {
            ErrorCategory::Unknown
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Validation => "validation",
            ErrorCategory::Auth => "auth",
            ErrorCategory::Authorization => "authorization",
            ErrorCategory::Database => "database",
            ErrorCategory::Unknown => "unknown",
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "Connection problem. Check your network and try again.",
            ErrorCategory::Validation => "Some of the values entered are not valid.",
            ErrorCategory::Auth => "Your session has expired. Please sign in again.",
            ErrorCategory::Authorization => "You do not have permission to do that.",
            ErrorCategory::Database => "The data could not be saved or loaded.",
            ErrorCategory::Unknown => "Something went wrong. Please try again.",
        }
    }
}

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("{0}")]
    Validation(String),
    #[error("unknown material '{0}': add a custom CO2 factor for it first")]
    UnknownMaterial(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("local store error: {0}")]
    Store(String),
    #[error("export failed: {0}")]
    Export(String),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

pub type DashboardResult<T> = Result<T, DashboardError>;

impl DashboardError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DashboardError::Validation(_) | DashboardError::UnknownMaterial(_) => {
                ErrorCategory::Validation
            }
            DashboardError::Database(_) | DashboardError::NotFound(_) => ErrorCategory::Database,
            DashboardError::Store(_)
            | DashboardError::Export(_)
            | DashboardError::Io(_)
            | DashboardError::Csv(_) => ErrorCategory::Unknown,
        }
    }

    /// Text for the notification shown to the user.
    ///
    /// Validation failures carry the first violated rule verbatim; everything
    /// else falls back to the category's generic wording.
    pub fn user_message(&self) -> String {
        match self.category() {
            ErrorCategory::Validation => self.to_string(),
            category => category.user_message().to_string(),
        }
    }
}
