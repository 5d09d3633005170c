use super::*;
use acct_core::ID;

/// Credential store: user rows and their password hashes.
/// Abstracts SQL from the session flows.
#[allow(async_fn_in_trait)]
pub trait UserRepository {
    async fn exists(&self, email: &str) -> Result<bool, Error>;
    async fn create(&self, name: &str, email: &str, hashword: &str) -> Result<ID<User>, Error>;
    /// Only what a login needs: the id for claims and the hash to compare.
    async fn credentials(&self, email: &str) -> Result<Option<(ID<User>, String)>, Error>;
    async fn user(&self, id: ID<User>) -> Result<Option<User>, Error>;
    async fn users(&self) -> Result<Vec<User>, Error>;
    /// Sets name and hash and touches `updated_at`. Returns rows affected.
    async fn update(&self, id: ID<User>, name: &str, hashword: &str) -> Result<u64, Error>;
    /// Returns rows affected; zero is not an error.
    async fn delete(&self, id: ID<User>) -> Result<u64, Error>;
}

/// Refresh token registry, keyed by digest.
///
/// Implementors provide three single-statement primitives over digests;
/// the provided methods hash raw tokens so plaintext never reaches storage.
#[allow(async_fn_in_trait)]
pub trait TokenRegistry {
    /// Insert the record, replacing any previous one for the same user.
    async fn upsert(&self, record: &TokenRecord) -> Result<u64, Error>;
    async fn find(&self, hash: &[u8]) -> Result<Option<TokenRecord>, Error>;
    /// Replace `old` with `new` only where `old` is still current.
    /// This conditional update is the compare-and-swap that stops a
    /// refresh token from being spent twice.
    async fn swap(&self, old: &[u8], new: &[u8]) -> Result<u64, Error>;

    async fn record(&self, user: ID<User>, refresh: &str) -> Result<u64, Error> {
        self.upsert(&TokenRecord::new(user, Crypto::hash(refresh)))
            .await
    }
    async fn lookup(&self, refresh: &str) -> Result<Option<TokenRecord>, Error> {
        self.find(&Crypto::hash(refresh)).await
    }
    /// False when no row held `old`: already rotated, or never issued.
    async fn rotate(&self, old: &str, new: &str) -> Result<bool, Error> {
        self.swap(&Crypto::hash(old), &Crypto::hash(new))
            .await
            .map(|rows| rows > 0)
    }
}

/// Everything the session service needs from storage.
pub trait Store: UserRepository + TokenRegistry {}
impl<T> Store for T where T: UserRepository + TokenRegistry {}
