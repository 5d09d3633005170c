use super::*;
use acct_core::ID;
use acct_pg::*;
use std::sync::Arc;
use tokio_postgres::Client;
use tokio_postgres::Row;

/// Creates the users and tokens tables, in dependency order.
pub async fn migrate(client: &Client) -> Result<(), PgErr> {
    acct_pg::migrate::<User>(client).await?;
    acct_pg::migrate::<TokenRecord>(client).await
}

fn hydrate(row: &Row) -> User {
    User::new(
        ID::from(row.get::<_, i64>(0)),
        row.get::<_, String>(1),
        row.get::<_, String>(2),
        row.get::<_, std::time::SystemTime>(3),
        row.get::<_, std::time::SystemTime>(4),
    )
}

impl UserRepository for Arc<Client> {
    async fn exists(&self, email: &str) -> Result<bool, Error> {
        self.query_opt(
            const_format::concatcp!("SELECT 1 FROM ", USERS, " WHERE lower(email) = lower($1)"),
            &[&email],
        )
        .await
        .map(|opt| opt.is_some())
        .map_err(Error::from)
    }

    async fn create(&self, name: &str, email: &str, hashword: &str) -> Result<ID<User>, Error> {
        self.query_one(
            const_format::concatcp!(
                "INSERT INTO ",
                USERS,
                " (name, email, hashword) VALUES ($1, $2, $3) RETURNING id"
            ),
            &[&name, &email, &hashword],
        )
        .await
        .map(|row| ID::from(row.get::<_, i64>(0)))
        .map_err(Error::from)
    }

    async fn credentials(&self, email: &str) -> Result<Option<(ID<User>, String)>, Error> {
        self.query_opt(
            const_format::concatcp!("SELECT id, hashword FROM ", USERS, " WHERE lower(email) = lower($1)"),
            &[&email],
        )
        .await
        .map(|opt| opt.map(|row| (ID::from(row.get::<_, i64>(0)), row.get::<_, String>(1))))
        .map_err(Error::from)
    }

    async fn user(&self, id: ID<User>) -> Result<Option<User>, Error> {
        self.query_opt(
            const_format::concatcp!(
                "SELECT id, name, email, created_at, updated_at FROM ",
                USERS,
                " WHERE id = $1"
            ),
            &[&id.inner()],
        )
        .await
        .map(|opt| opt.as_ref().map(hydrate))
        .map_err(Error::from)
    }

    async fn users(&self) -> Result<Vec<User>, Error> {
        self.query(
            const_format::concatcp!(
                "SELECT id, name, email, created_at, updated_at FROM ",
                USERS,
                " ORDER BY id"
            ),
            &[],
        )
        .await
        .map(|rows| rows.iter().map(hydrate).collect())
        .map_err(Error::from)
    }

    async fn update(&self, id: ID<User>, name: &str, hashword: &str) -> Result<u64, Error> {
        self.execute(
            const_format::concatcp!(
                "UPDATE ",
                USERS,
                " SET name = $1, hashword = $2, updated_at = now() WHERE id = $3"
            ),
            &[&name, &hashword, &id.inner()],
        )
        .await
        .map_err(Error::from)
    }

    async fn delete(&self, id: ID<User>) -> Result<u64, Error> {
        self.execute(
            const_format::concatcp!("DELETE FROM ", USERS, " WHERE id = $1"),
            &[&id.inner()],
        )
        .await
        .map_err(Error::from)
    }
}

impl TokenRegistry for Arc<Client> {
    async fn upsert(&self, record: &TokenRecord) -> Result<u64, Error> {
        self.execute(
            const_format::concatcp!(
                "INSERT INTO ",
                TOKENS,
                " (user_id, token_hash) VALUES ($1, $2)
                 ON CONFLICT (user_id) DO UPDATE SET token_hash = EXCLUDED.token_hash"
            ),
            &[&record.user().inner(), &record.hash()],
        )
        .await
        .map_err(Error::from)
    }

    async fn find(&self, hash: &[u8]) -> Result<Option<TokenRecord>, Error> {
        self.query_opt(
            const_format::concatcp!(
                "SELECT user_id, token_hash FROM ",
                TOKENS,
                " WHERE token_hash = $1"
            ),
            &[&hash],
        )
        .await
        .map(|opt| {
            opt.map(|row| {
                TokenRecord::new(
                    ID::from(row.get::<_, i64>(0)),
                    row.get::<_, Vec<u8>>(1),
                )
            })
        })
        .map_err(Error::from)
    }

    async fn swap(&self, old: &[u8], new: &[u8]) -> Result<u64, Error> {
        self.execute(
            const_format::concatcp!(
                "UPDATE ",
                TOKENS,
                " SET token_hash = $1 WHERE token_hash = $2"
            ),
            &[&new, &old],
        )
        .await
        .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Needs a live PostgreSQL at `DB_URL`; run with `--ignored`.
    #[tokio::test]
    #[ignore]
    async fn postgres_rotation_swaps_exactly_once() {
        let client = acct_pg::db().await;
        migrate(&client).await.unwrap();
        let email = format!("{}@rotation.test", uuid::Uuid::now_v7());
        let id = client.create("R", &email, "hash").await.unwrap();

        assert_eq!(client.record(id, "first").await.unwrap(), 1);
        assert!(client.rotate("first", "second").await.unwrap());
        assert!(!client.rotate("first", "third").await.unwrap());
        assert!(client.lookup("first").await.unwrap().is_none());
        assert!(client.lookup("third").await.unwrap().is_none());
        let record = client.lookup("second").await.unwrap().unwrap();
        assert_eq!(record.user(), id);

        assert_eq!(client.record(id, "fresh").await.unwrap(), 1);
        assert!(client.lookup("second").await.unwrap().is_none());
        assert!(!client.rotate("second", "stolen").await.unwrap());

        assert!(matches!(
            client.create("R", &email.to_uppercase(), "hash").await,
            Err(Error::DuplicateUser)
        ));
        assert!(client.exists(&email.to_uppercase()).await.unwrap());

        assert_eq!(client.delete(id).await.unwrap(), 1);
        assert!(client.lookup("fresh").await.unwrap().is_none());
    }
}
