use thiserror::Error;

#[derive(Error, Debug)]
pub enum HospitalError {
    #[error("Validation error on {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("Constraint violation: {message}")]
    Constraint { message: String },

    #[error("Hospital already exists: {name}")]
    DuplicateKey { name: String },

    #[error("Hospital not found: {name}")]
    NotFound { name: String },

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl HospitalError {
    pub fn validation(field: &str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub fn not_found(name: &str) -> Self {
        Self::NotFound {
            name: name.to_string(),
        }
    }

    /// Classifies a sqlx error. `name` is the key the failed statement touched
    /// and is reported on unique violations.
    pub fn from_sqlx(err: sqlx::Error, name: &str) -> Self {
        use sqlx::error::ErrorKind;

        if let sqlx::Error::Database(db_err) = &err {
            match db_err.kind() {
                ErrorKind::UniqueViolation => {
                    return Self::DuplicateKey {
                        name: name.to_string(),
                    }
                }
                ErrorKind::NotNullViolation
                | ErrorKind::CheckViolation
                | ErrorKind::ForeignKeyViolation => {
                    return Self::Constraint {
                        message: db_err.message().to_string(),
                    }
                }
                _ => {}
            }
        }
        Self::Database(err)
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Validation { .. } | Self::NotFound { .. } => ErrorSeverity::Low,
            Self::DuplicateKey { .. } | Self::Constraint { .. } => ErrorSeverity::Medium,
            Self::Serialization(_)
            | Self::Csv(_)
            | Self::Config { .. }
            | Self::InvalidConfigValue { .. } => ErrorSeverity::High,
            Self::Database(_) | Self::Io(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "Check required fields and maximum lengths",
            Self::Constraint { .. } => "Check the stored values against the table constraints",
            Self::DuplicateKey { .. } => "Use update, or run with --save-mode upsert",
            Self::NotFound { .. } => "Run `list` to see the stored hospital names",
            Self::Database(_) => "Check the database URL and that the file is writable",
            Self::Io(_) => "Check the file path and permissions",
            Self::Serialization(_) | Self::Csv(_) => {
                "Check the input is a JSON array of hospital objects"
            }
            Self::Config { .. } | Self::InvalidConfigValue { .. } => {
                "Fix the configuration file or command line flags"
            }
        }
    }
}

impl From<sqlx::Error> for HospitalError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err)
    }
}

pub type Result<T> = std::result::Result<T, HospitalError>;
