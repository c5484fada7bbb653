// sqlx::Error -> AppError

use repokit_core::error::{AppError, ConstraintKind};
use sqlx::error::ErrorKind;
use tracing::warn;

/// Convert sqlx::Error to AppError, keeping the driver's code and message.
///
/// Constraint failures are classified by sqlx's `ErrorKind` first and by
/// SQLite extended result code otherwise
/// (https://www.sqlite.org/rescode.html).
pub fn map_sqlx_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) => {
            let code = db_err.code().map(|c| c.into_owned());
            let message = db_err.message().to_string();

            match constraint_kind(db_err.kind(), code.as_deref()) {
                Some(kind) => {
                    warn!(%kind, code = code.as_deref().unwrap_or("-"), %message, "constraint violation");
                    AppError::Constraint {
                        kind,
                        code,
                        message,
                    }
                }
                None => match code {
                    Some(code) => AppError::Database(format!("Database error [{}]: {}", code, message)),
                    None => AppError::Database(format!("Database error: {}", message)),
                },
            }
        }
        sqlx::Error::RowNotFound => AppError::Database("Row not found".to_string()),
        sqlx::Error::ColumnNotFound(col) => AppError::Database(format!("Column not found: {}", col)),
        // Connection, pool, protocol errors
        _ => AppError::Database(err.to_string()),
    }
}

fn constraint_kind(kind: ErrorKind, code: Option<&str>) -> Option<ConstraintKind> {
    match kind {
        ErrorKind::UniqueViolation => return Some(ConstraintKind::Unique),
        ErrorKind::ForeignKeyViolation => return Some(ConstraintKind::ForeignKey),
        ErrorKind::NotNullViolation => return Some(ConstraintKind::NotNull),
        ErrorKind::CheckViolation => return Some(ConstraintKind::Check),
        _ => {}
    }

    let code: i32 = code?.parse().ok()?;
    match code {
        // SQLITE_CONSTRAINT_UNIQUE, _PRIMARYKEY, _ROWID
        2067 | 1555 | 2579 => Some(ConstraintKind::Unique),
        // SQLITE_CONSTRAINT_FOREIGNKEY
        787 => Some(ConstraintKind::ForeignKey),
        // SQLITE_CONSTRAINT_NOTNULL
        1299 => Some(ConstraintKind::NotNull),
        // SQLITE_CONSTRAINT_CHECK
        275 => Some(ConstraintKind::Check),
        // SQLITE_MISMATCH, SQLITE_CONSTRAINT_DATATYPE
        20 | 3091 => Some(ConstraintKind::TypeMismatch),
        // any other SQLITE_CONSTRAINT_*
        c if c & 0xff == 19 => Some(ConstraintKind::Other),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extended_codes() {
        assert_eq!(constraint_kind(ErrorKind::Other, Some("2067")), Some(ConstraintKind::Unique));
        assert_eq!(constraint_kind(ErrorKind::Other, Some("1555")), Some(ConstraintKind::Unique));
        assert_eq!(constraint_kind(ErrorKind::Other, Some("787")), Some(ConstraintKind::ForeignKey));
        assert_eq!(constraint_kind(ErrorKind::Other, Some("1299")), Some(ConstraintKind::NotNull));
        assert_eq!(constraint_kind(ErrorKind::Other, Some("275")), Some(ConstraintKind::Check));
        assert_eq!(constraint_kind(ErrorKind::Other, Some("20")), Some(ConstraintKind::TypeMismatch));
        assert_eq!(constraint_kind(ErrorKind::Other, Some("1811")), Some(ConstraintKind::Other));
    }

    #[test]
    fn test_error_kind_wins() {
        assert_eq!(
            constraint_kind(ErrorKind::UniqueViolation, None),
            Some(ConstraintKind::Unique)
        );
    }

    #[test]
    fn test_non_constraint_codes() {
        // SQLITE_BUSY, SQLITE_FULL
        assert_eq!(constraint_kind(ErrorKind::Other, Some("5")), None);
        assert_eq!(constraint_kind(ErrorKind::Other, Some("13")), None);
        assert_eq!(constraint_kind(ErrorKind::Other, None), None);
    }

    #[test]
    fn test_row_not_found() {
        let err = map_sqlx_error(sqlx::Error::RowNotFound);
        assert!(matches!(err, AppError::Database(_)));
    }
}
