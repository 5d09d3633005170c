use super::*;

/// Schema metadata for PostgreSQL tables.
///
/// Provides compile-time SQL generation for table creation and indexing.
/// All methods return `&'static str` to avoid runtime allocations and
/// enable compile-time string construction via `const_format::concatcp!`.
///
/// # Design
///
/// This trait contains no I/O operations; it purely describes table
/// structure. [`migrate`] is the only place the DDL is executed.
pub trait Schema {
    /// Returns the table name in the database.
    fn name() -> &'static str;
    /// Returns `CREATE TABLE IF NOT EXISTS` DDL statement.
    fn creates() -> &'static str;
    /// Returns `CREATE INDEX IF NOT EXISTS` statements for all indices.
    fn indices() -> &'static str;
}

/// Creates the table and its indices if they are missing.
///
/// Idempotent, so it runs unconditionally at startup. Tables with foreign
/// keys must be migrated after the tables they reference.
pub async fn migrate<S: Schema>(client: &Client) -> Result<(), PgErr> {
    log::info!("migrating table {}", S::name());
    client.batch_execute(S::creates()).await?;
    client.batch_execute(S::indices()).await?;
    Ok(())
}
