use super::*;
use acct_core::ID;

/// Persisted digest of a user's currently active refresh token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRecord {
    user: ID<User>,
    hash: Vec<u8>,
}

impl TokenRecord {
    pub fn new(user: ID<User>, hash: Vec<u8>) -> Self {
        Self { user, hash }
    }
    pub fn user(&self) -> ID<User> {
        self.user
    }
    pub fn hash(&self) -> &[u8] {
        &self.hash
    }
}

#[cfg(feature = "database")]
mod schema {
    use super::*;
    use acct_pg::*;

    /// One row per user: a new login replaces the previous chain.
    impl Schema for TokenRecord {
        fn name() -> &'static str {
            TOKENS
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                TOKENS,
                " (
                    user_id     BIGINT PRIMARY KEY REFERENCES ",
                USERS,
                "(id) ON DELETE CASCADE,
                    token_hash  BYTEA NOT NULL
                );"
            )
        }
        fn indices() -> &'static str {
            const_format::concatcp!(
                "CREATE INDEX IF NOT EXISTS idx_tokens_hash ON ",
                TOKENS,
                " (token_hash);"
            )
        }
    }
}
