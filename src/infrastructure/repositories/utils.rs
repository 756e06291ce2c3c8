use sqlx::{Postgres, QueryBuilder};

use crate::domain::ListScope;
use crate::error::{AppError, AppResult};

pub fn escape_like_pattern(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// `%term%` with LIKE metacharacters escaped, or `None` for a blank term.
pub fn contains_pattern(term: Option<&str>) -> Option<String> {
    term.map(str::trim)
        .filter(|term| !term.is_empty())
        .map(|term| format!("%{}%", escape_like_pattern(term)))
}

/// Restricts `column` to the scope's departments. Appends nothing when unrestricted.
pub fn push_scope(builder: &mut QueryBuilder<'_, Postgres>, column: &str, scope: &ListScope) {
    if let ListScope::Departments(departments) = scope {
        builder.push(" AND ");
        builder.push(column);
        builder.push(" = ANY(");
        builder.push_bind(departments.clone());
        builder.push(")");
    }
}

pub fn ensure_deleted(rows_affected: u64, what: &str) -> AppResult<()> {
    if rows_affected == 0 {
        return Err(AppError::NotFound(format!("{what} not found")));
    }
    Ok(())
}
