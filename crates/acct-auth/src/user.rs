use acct_core::ID;
use acct_core::Unique;
use std::time::SystemTime;

/// Registered account. The password hash lives only in storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: ID<Self>,
    name: String,
    email: String,
    created: SystemTime,
    updated: SystemTime,
}

impl User {
    pub fn new(
        id: ID<Self>,
        name: String,
        email: String,
        created: SystemTime,
        updated: SystemTime,
    ) -> Self {
        Self {
            id,
            name,
            email,
            created,
            updated,
        }
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn email(&self) -> &str {
        &self.email
    }
    pub fn created_at(&self) -> SystemTime {
        self.created
    }
    pub fn updated_at(&self) -> SystemTime {
        self.updated
    }
}

impl Unique for User {
    fn id(&self) -> ID<Self> {
        self.id
    }
}

#[cfg(feature = "database")]
mod schema {
    use super::*;
    use acct_pg::*;

    /// Schema implementation for User (users table).
    /// Note: hashword is a database-only field, not part of User domain type.
    impl Schema for User {
        fn name() -> &'static str {
            USERS
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                USERS,
                " (
                    id          BIGSERIAL PRIMARY KEY,
                    name        VARCHAR(255) NOT NULL,
                    email       VARCHAR(255) UNIQUE NOT NULL,
                    hashword    TEXT NOT NULL,
                    created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
                    updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
                );"
            )
        }
        fn indices() -> &'static str {
            const_format::concatcp!(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_users_email_lower ON ",
                USERS,
                " (lower(email));"
            )
        }
    }
}
