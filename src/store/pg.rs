//! PostgreSQL store and bootstrap DDL. Tables live in the schema from `SOCIAL_SCHEMA` (default `social`).

use super::{AccountStore, MessageStore};
use crate::error::{AppError, ConfigError};
use crate::model::{Account, AccountDraft, Message, MessageDraft};
use async_trait::async_trait;
use sqlx::postgres::PgConnectOptions;
use sqlx::ConnectOptions;
use sqlx::PgPool;
use std::str::FromStr;

/// Constraint violations on insert: the only UNIQUE column is `account.username` and the only
/// foreign key is `message.posted_by`.
fn write_error(e: sqlx::Error) -> AppError {
    match e {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => {
            AppError::Conflict("username already exists".into())
        }
        sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
            AppError::Validation("postedBy does not reference an account".into())
        }
        other => AppError::Db(other),
    }
}

type AccountRow = (i32, String, String);
type MessageRow = (i32, i32, String, i64);

const ACCOUNT_COLUMNS: &str = "account_id, username, password";
const MESSAGE_COLUMNS: &str = "message_id, posted_by, message_text, time_posted_epoch";

fn account_from_row((account_id, username, password): AccountRow) -> Account {
    Account {
        account_id,
        username,
        password,
    }
}

fn message_from_row((message_id, posted_by, message_text, time_posted_epoch): MessageRow) -> Message {
    Message {
        message_id,
        posted_by,
        message_text,
        time_posted_epoch,
    }
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    account_table: String,
    message_table: String,
}

impl PgStore {
    /// `schema` must already be a validated identifier (see `Settings`).
    pub fn new(pool: PgPool, schema: &str) -> Self {
        Self {
            pool,
            account_table: format!("{}.account", schema),
            message_table: format!("{}.message", schema),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl AccountStore for PgStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, AppError> {
        let sql = format!("SELECT {} FROM {} WHERE username = $1", ACCOUNT_COLUMNS, self.account_table);
        tracing::debug!(sql = %sql, "query");
        let row: Option<AccountRow> = sqlx::query_as(&sql).bind(username).fetch_optional(&self.pool).await?;
        Ok(row.map(account_from_row))
    }

    async fn find_by_username_and_password(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<Account>, AppError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE username = $1 AND password = $2",
            ACCOUNT_COLUMNS, self.account_table
        );
        tracing::debug!(sql = %sql, "query");
        let row: Option<AccountRow> = sqlx::query_as(&sql)
            .bind(username)
            .bind(password)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(account_from_row))
    }

    async fn find_by_account_id(&self, account_id: i32) -> Result<Option<Account>, AppError> {
        let sql = format!("SELECT {} FROM {} WHERE account_id = $1", ACCOUNT_COLUMNS, self.account_table);
        tracing::debug!(sql = %sql, "query");
        let row: Option<AccountRow> = sqlx::query_as(&sql).bind(account_id).fetch_optional(&self.pool).await?;
        Ok(row.map(account_from_row))
    }

    async fn save(&self, draft: AccountDraft) -> Result<Account, AppError> {
        let sql = format!(
            "INSERT INTO {} (username, password) VALUES ($1, $2) RETURNING {}",
            self.account_table, ACCOUNT_COLUMNS
        );
        tracing::debug!(sql = %sql, "query");
        let row: AccountRow = sqlx::query_as(&sql)
            .bind(&draft.username)
            .bind(&draft.password)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                let err = write_error(e);
                if matches!(err, AppError::Conflict(_)) {
                    tracing::warn!(username = %draft.username, "concurrent registration hit unique constraint");
                }
                err
            })?;
        Ok(account_from_row(row))
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl MessageStore for PgStore {
    async fn save(&self, draft: MessageDraft) -> Result<Message, AppError> {
        let sql = format!(
            "INSERT INTO {} (posted_by, message_text, time_posted_epoch) VALUES ($1, $2, $3) RETURNING {}",
            self.message_table, MESSAGE_COLUMNS
        );
        tracing::debug!(sql = %sql, "query");
        let row: MessageRow = sqlx::query_as(&sql)
            .bind(draft.posted_by)
            .bind(&draft.message_text)
            .bind(draft.time_posted_epoch)
            .fetch_one(&self.pool)
            .await
            .map_err(write_error)?;
        Ok(message_from_row(row))
    }

    async fn update_text(&self, message_id: i32, message_text: &str) -> Result<bool, AppError> {
        let sql = format!("UPDATE {} SET message_text = $1 WHERE message_id = $2", self.message_table);
        tracing::debug!(sql = %sql, "query");
        let result = sqlx::query(&sql)
            .bind(message_text)
            .bind(message_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_by_id(&self, message_id: i32) -> Result<Option<Message>, AppError> {
        let sql = format!("SELECT {} FROM {} WHERE message_id = $1", MESSAGE_COLUMNS, self.message_table);
        tracing::debug!(sql = %sql, "query");
        let row: Option<MessageRow> = sqlx::query_as(&sql).bind(message_id).fetch_optional(&self.pool).await?;
        Ok(row.map(message_from_row))
    }

    async fn exists_by_id(&self, message_id: i32) -> Result<bool, AppError> {
        let sql = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE message_id = $1)", self.message_table);
        tracing::debug!(sql = %sql, "query");
        let exists: (bool,) = sqlx::query_as(&sql).bind(message_id).fetch_one(&self.pool).await?;
        Ok(exists.0)
    }

    async fn delete_by_id(&self, message_id: i32) -> Result<u64, AppError> {
        let sql = format!("DELETE FROM {} WHERE message_id = $1", self.message_table);
        tracing::debug!(sql = %sql, "query");
        let result = sqlx::query(&sql).bind(message_id).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn find_by_posted_by(&self, account_id: i32) -> Result<Vec<Message>, AppError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE posted_by = $1 ORDER BY message_id",
            MESSAGE_COLUMNS, self.message_table
        );
        tracing::debug!(sql = %sql, "query");
        let rows: Vec<MessageRow> = sqlx::query_as(&sql).bind(account_id).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(message_from_row).collect())
    }

    async fn find_all(&self) -> Result<Vec<Message>, AppError> {
        let sql = format!("SELECT {} FROM {} ORDER BY message_id", MESSAGE_COLUMNS, self.message_table);
        tracing::debug!(sql = %sql, "query");
        let rows: Vec<MessageRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(message_from_row).collect())
    }
}

/// Create the schema and both tables if they do not exist. `username` is UNIQUE so that
/// concurrent registrations of the same name cannot both land.
pub async fn ensure_schema(pool: &PgPool, schema: &str) -> Result<(), AppError> {
    sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {}", schema))
        .execute(pool)
        .await?;

    let account_ddl = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {}.account (
            account_id SERIAL PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            password TEXT NOT NULL
        )
        "#,
        schema
    );
    sqlx::query(&account_ddl).execute(pool).await?;

    let message_ddl = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {schema}.message (
            message_id SERIAL PRIMARY KEY,
            posted_by INTEGER NOT NULL REFERENCES {schema}.account (account_id),
            message_text TEXT NOT NULL,
            time_posted_epoch BIGINT NOT NULL
        )
        "#,
        schema = schema
    );
    sqlx::query(&message_ddl).execute(pool).await?;

    sqlx::query(&format!(
        "CREATE INDEX IF NOT EXISTS message_posted_by_idx ON {}.message (posted_by)",
        schema
    ))
    .execute(pool)
    .await?;
    tracing::info!(schema = %schema, "schema ready");
    Ok(())
}

/// Connect to the `postgres` maintenance database and create the target database when missing.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin, target) = maintenance_options(database_url)?;
    let Some(target) = target else {
        return Ok(());
    };
    let mut conn: sqlx::PgConnection = admin.connect().await?;
    let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&target)
        .fetch_one(&mut conn)
        .await?;
    if !exists {
        tracing::info!(database = %target, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&target)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

/// Options pointing at the `postgres` database on the same server, plus the database named in
/// the URL when it is one we may have to create.
fn maintenance_options(database_url: &str) -> Result<(PgConnectOptions, Option<String>), AppError> {
    let opts = PgConnectOptions::from_str(database_url).map_err(|e| {
        tracing::error!(error = %e, "unparseable DATABASE_URL");
        ConfigError::Invalid {
            key: "DATABASE_URL",
            value: "<redacted>".into(),
        }
    })?;
    let target = opts
        .get_database()
        .map(str::trim)
        .filter(|name| !name.is_empty() && *name != "postgres")
        .map(str::to_string);
    Ok((opts.database("postgres"), target))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    use sqlx::error::{DatabaseError, ErrorKind};
    use std::fmt;

    #[derive(Debug)]
    struct ConstraintError(ErrorKind);

    impl fmt::Display for ConstraintError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "constraint violated: {:?}", self.0)
        }
    }

    impl std::error::Error for ConstraintError {}

    impl DatabaseError for ConstraintError {
        fn message(&self) -> &str {
            "constraint violated"
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            match self.0 {
                ErrorKind::UniqueViolation => ErrorKind::UniqueViolation,
                ErrorKind::ForeignKeyViolation => ErrorKind::ForeignKeyViolation,
                _ => ErrorKind::Other,
            }
        }
    }

    fn db_error(kind: ErrorKind) -> sqlx::Error {
        sqlx::Error::Database(Box::new(ConstraintError(kind)))
    }

    #[test]
    fn unique_violation_is_conflict() {
        let err = write_error(db_error(ErrorKind::UniqueViolation));
        assert!(matches!(err, AppError::Conflict(ref m) if m == "username already exists"));
    }

    #[test]
    fn foreign_key_violation_is_validation() {
        let err = write_error(db_error(ErrorKind::ForeignKeyViolation));
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn other_write_errors_stay_database_errors() {
        assert!(matches!(write_error(db_error(ErrorKind::Other)), AppError::Db(_)));
        assert!(matches!(write_error(sqlx::Error::PoolTimedOut), AppError::Db(_)));
    }

    #[test]
    fn maintenance_options_target_named_database() {
        let (admin, target) =
            maintenance_options("postgres://u:p@localhost:5432/social_media?sslmode=disable").unwrap();
        assert_eq!(admin.get_database(), Some("postgres"));
        assert_eq!(target.as_deref(), Some("social_media"));
    }

    #[test]
    fn maintenance_database_is_never_created() {
        let (_, target) = maintenance_options("postgres://localhost/postgres").unwrap();
        assert_eq!(target, None);
    }

    #[test]
    fn malformed_url_is_config_error() {
        assert!(matches!(
            maintenance_options("not a url"),
            Err(AppError::Config(ConfigError::Invalid { key: "DATABASE_URL", .. }))
        ));
    }

    #[test]
    fn quotes_identifiers() {
        assert_eq!(quote_ident("feed"), "\"feed\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }
}
