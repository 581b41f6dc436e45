//! Batched relational result sink.

use super::{ClassifiedRow, ResultSink, SINK_BATCH_SIZE};
use crate::error::{Error, Result};
use crate::eval::BlockingReport;

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlDialect {
    /// MySQL-compatible connection.
    MySql,
    /// PostgreSQL-compatible connection.
    Postgres,
}

/// Connection settings for the relational sink.
///
/// Built in the usual builder style:
///
/// ```rust
/// use riddle::sink::DbConfig;
///
/// let config = DbConfig::new("postgresql://db.example/er")
///     .with_user("eval")
///     .with_password("secret")
///     .with_table("blocking_results")
///     .with_ssl(true);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct DbConfig {
    url: String,
    user: Option<String>,
    password: Option<String>,
    table: Option<String>,
    ssl: bool,
}

impl DbConfig {
    /// Create a configuration for the given connection URL. The URL
    /// scheme selects the dialect (`mysql…` or `postgresql…`).
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Set the database user.
    #[must_use]
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Set the database password.
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Set the target table.
    #[must_use]
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Require SSL on the connection.
    #[must_use]
    pub fn with_ssl(mut self, ssl: bool) -> Self {
        self.ssl = ssl;
        self
    }

    /// Connection URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Target table, if set.
    #[must_use]
    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    /// Whether SSL was requested.
    #[must_use]
    pub fn ssl(&self) -> bool {
        self.ssl
    }

    /// Dialect selected by the connection URL.
    ///
    /// # Errors
    ///
    /// Configuration error for any unsupported scheme.
    pub fn dialect(&self) -> Result<SqlDialect> {
        if self.url.starts_with("mysql") {
            Ok(SqlDialect::MySql)
        } else if self.url.starts_with("postgresql") {
            Ok(SqlDialect::Postgres)
        } else {
            Err(Error::config(
                "only MySQL and PostgreSQL are supported for the time being",
            ))
        }
    }

    /// Check the configuration is complete. Runs before any write is
    /// attempted.
    ///
    /// # Errors
    ///
    /// Configuration error naming the first unset field, or the
    /// unsupported dialect.
    pub fn validate(&self) -> Result<()> {
        if self.user.is_none() {
            return Err(Error::config("database user has not been set"));
        }
        if self.password.is_none() {
            return Err(Error::config("database password has not been set"));
        }
        if self.table.is_none() {
            return Err(Error::config("database table has not been set"));
        }
        self.dialect()?;
        Ok(())
    }
}

/// Statement executor over an established connection, injected by the
/// caller. Tests use an in-memory recorder.
pub trait SqlExecutor {
    /// Execute one SQL statement.
    fn execute(&mut self, statement: &str) -> Result<()>;
}

/// Accumulates value tuples and executes one multi-row `INSERT` per
/// [`SINK_BATCH_SIZE`] rows; [`ResultSink::finish`] flushes the final
/// partial batch.
#[derive(Debug)]
pub struct SqlSink<E: SqlExecutor> {
    executor: E,
    table: String,
    values: Vec<String>,
}

impl<E: SqlExecutor> SqlSink<E> {
    /// Validate `config` and create the sink over `executor`.
    ///
    /// # Errors
    ///
    /// Configuration errors are reported here, before any write.
    pub fn connect(config: &DbConfig, executor: E) -> Result<Self> {
        config.validate()?;
        let table = match config.table() {
            Some(table) => table.to_owned(),
            None => return Err(Error::config("database table has not been set")),
        };
        Ok(Self {
            executor,
            table,
            values: Vec::new(),
        })
    }

    /// Consume the sink and return the executor.
    pub fn into_inner(self) -> E {
        self.executor
    }

    fn flush(&mut self) -> Result<()> {
        if self.values.is_empty() {
            return Ok(());
        }
        let statement = format!(
            "INSERT INTO {} (url1, url2, pair_type, profile1, profile2) VALUES {};",
            self.table,
            self.values.join(", ")
        );
        self.executor.execute(&statement)?;
        self.values.clear();
        Ok(())
    }
}

impl<E: SqlExecutor> ResultSink for SqlSink<E> {
    fn write_row(&mut self, row: &ClassifiedRow) -> Result<()> {
        self.values.push(format!(
            "('{}', '{}', '{}', '{}', '{}')",
            quote(&row.url1),
            quote(&row.url2),
            row.label,
            quote(&row.profile1),
            quote(&row.profile2)
        ));
        if self.values.len() == SINK_BATCH_SIZE {
            self.flush()?;
        }
        Ok(())
    }

    fn write_metrics(&mut self, report: &BlockingReport) -> Result<()> {
        self.values.push(format!(
            "('{}', '{}', '{}', NULL, NULL)",
            report.pairs_quality, report.pairs_completeness, report.f_measure
        ));
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.flush()
    }
}

/// Single quotes are doubled per SQL string-literal rules.
fn quote(value: &str) -> String {
    value.replace('\'', "''")
}
