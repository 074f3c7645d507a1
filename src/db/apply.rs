use std::path::PathBuf;

use sqlx::{AnyConnection, Connection};
use thiserror::Error;

use crate::config::{Config, SchemaConfig};
use crate::db::statements::{is_single_statement, prepare_statement, split_statements};
use crate::db::{connect, ConnectError};

const PREVIEW_CHARS: usize = 80;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub executed: usize,
    pub skipped: usize,
}

/// Reads the schema file, connects and applies every statement in file order.
///
/// The connection is closed before returning, whether or not a statement
/// failed. Statements executed before a failure stay committed.
pub async fn apply_schema(config: &Config) -> Result<ApplyReport, ApplyError> {
    let path = &config.schema.path;
    let sql = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ApplyError::Input {
            path: path.clone(),
            source,
        })?;

    tracing::info!(
        schema = %path.display(),
        database = config.target_database(),
        "Applying schema..."
    );

    let mut conn = connect(&config.db).await.map_err(ApplyError::Connection)?;

    let result = apply_statements(
        &mut conn,
        &sql,
        &config.schema,
        config.target_database(),
    )
    .await;

    let closed = conn.close().await;
    let result = settle(result, closed);

    if let Ok(report) = &result {
        tracing::info!(
            executed = report.executed,
            skipped = report.skipped,
            "Schema applied"
        );
    }
    result
}

/// Combines the run outcome with the outcome of closing the connection.
///
/// A close failure never replaces the run outcome: every statement already
/// ran (or the run already failed), so it is only logged.
fn settle(
    result: Result<ApplyReport, ApplyError>,
    closed: Result<(), sqlx::Error>,
) -> Result<ApplyReport, ApplyError> {
    if let Err(close_err) = closed {
        tracing::warn!(
            error = %close_err,
            run_failed = result.is_err(),
            "failed to close connection"
        );
    }
    result
}

/// Splits `sql` and executes the surviving statements one at a time.
///
/// Each piece must be a single command: one that still holds several is
/// rejected before reaching the database. Stops at the first failing
/// statement.
pub async fn apply_statements(
    conn: &mut AnyConnection,
    sql: &str,
    schema: &SchemaConfig,
    database: &str,
) -> Result<ApplyReport, ApplyError> {
    let mut report = ApplyReport::default();

    for (i, statement) in split_statements(sql).enumerate() {
        let index = i + 1;
        let Some(prepared) = prepare_statement(&statement, &schema.placeholder, database) else {
            tracing::debug!(index, statement = %preview(&statement), "Skipping statement");
            report.skipped += 1;
            continue;
        };

        if !is_single_statement(&prepared) {
            tracing::error!(index, statement = %preview(&prepared), "Statement holds more than one command");
            return Err(ApplyError::MultipleStatements {
                index,
                statement: prepared,
            });
        }

        tracing::debug!(index, statement = %preview(&prepared), "Executing statement");

        sqlx::query(&prepared)
            .execute(&mut *conn)
            .await
            .map_err(|source| {
                tracing::error!(index, error = %source, "Statement failed");
                ApplyError::Execution {
                    index,
                    statement: prepared.clone(),
                    source,
                }
            })?;

        report.executed += 1;
    }

    Ok(report)
}

fn preview(statement: &str) -> String {
    if statement.chars().count() <= PREVIEW_CHARS {
        return statement.to_string();
    }
    let cut: String = statement.chars().take(PREVIEW_CHARS).collect();
    format!("{cut}...")
}

#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("Schema file not found or unreadable: {}: {source}", path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Database connection error: {0}")]
    Connection(#[source] ConnectError),
    #[error("Statement #{index} holds more than one SQL command\n  {statement}")]
    MultipleStatements { index: usize, statement: String },
    #[error("Statement #{index} failed: {source}\n  {statement}")]
    Execution {
        index: usize,
        statement: String,
        #[source]
        source: sqlx::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_truncates_long_statements() {
        let long = "x".repeat(200);
        let shown = preview(&long);

        assert_eq!(shown.len(), PREVIEW_CHARS + 3);
        assert!(shown.ends_with("..."));
        assert_eq!(preview("SELECT 1"), "SELECT 1");
    }

    #[test]
    fn close_failure_after_success_keeps_the_report() {
        let report = ApplyReport {
            executed: 7,
            skipped: 2,
        };

        let settled = settle(Ok(report), Err(sqlx::Error::PoolClosed));
        assert_eq!(settled.unwrap(), report);
    }

    #[test]
    fn close_failure_after_error_keeps_the_error() {
        let err = ApplyError::MultipleStatements {
            index: 1,
            statement: "SELECT 1; SELECT 2".to_string(),
        };

        let settled = settle(Err(err), Err(sqlx::Error::PoolClosed));
        assert!(matches!(
            settled,
            Err(ApplyError::MultipleStatements { index: 1, .. })
        ));
    }

    #[test]
    fn execution_error_names_the_statement() {
        let err = ApplyError::Execution {
            index: 3,
            statement: "DROP TABLE nope".to_string(),
            source: sqlx::Error::RowNotFound,
        };

        let message = err.to_string();
        assert!(message.starts_with("Statement #3 failed"));
        assert!(message.contains("DROP TABLE nope"));
    }
}
