use crate::domain::DomainError;
use crate::error::app_error::AppError;
use crate::error::db_mapping::map_database_error;
use crate::error::validation_mapping::collect_validation_issues;

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound(msg) => AppError::NotFound(msg),
            DomainError::ValidationError(msg) => AppError::validation_error(msg),
            DomainError::BusinessRuleViolation(msg) => AppError::BadRequest(msg),
            DomainError::Conflict(msg) => AppError::Conflict(msg),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalError(err)
    }
}

fn database_unavailable(message: &str) -> AppError {
    AppError::ServiceUnavailable {
        service: "database".to_string(),
        message: message.to_string(),
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("record not found".to_string()),
            sqlx::Error::Io(_) => {
                database_unavailable("Unable to connect to database. Please try again later.")
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                database_unavailable("Service temporarily unavailable. Please try again later.")
            }
            sqlx::Error::Database(database_error) => map_database_error(
                database_error.code().as_deref(),
                database_error.constraint(),
                database_error.message(),
            )
            .unwrap_or(AppError::DatabaseError(sqlx::Error::Database(database_error))),
            other => AppError::DatabaseError(other),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut issues = Vec::new();
        collect_validation_issues(None, &err, &mut issues);
        issues.sort_by(|left, right| {
            left.field
                .cmp(&right.field)
                .then(left.code.cmp(&right.code))
        });

        let message = match issues.as_slice() {
            [issue] => issue.message.clone(),
            _ => "Request validation failed".to_string(),
        };

        AppError::ValidationError { message, issues }
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
            _ => AppError::InvalidToken,
        }
    }
}

/// A broken CSV upload is the caller's fault; a failed export write is ours.
impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        match err.kind() {
            csv::ErrorKind::Io(_) => AppError::InternalError(anyhow::Error::new(err)),
            _ => {
                let line = err
                    .position()
                    .map(|position| format!(" at line {}", position.line()))
                    .unwrap_or_default();
                AppError::BadRequest(format!("malformed CSV{line}"))
            }
        }
    }
}
