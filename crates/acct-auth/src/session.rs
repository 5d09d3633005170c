use super::*;
use acct_core::ID;
use std::sync::Arc;

/// Proof that a request passed the access-token guard.
///
/// Only [`authorize`] constructs one; every protected [`Service`]
/// operation takes one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Authorized {
    user: ID<User>,
}

impl Authorized {
    pub fn user(&self) -> ID<User> {
        self.user
    }
}

/// Extracts the credential from a `Bearer <token>` header value.
pub fn bearer(header: Option<&str>, kind: Kind) -> Result<&str, AuthError> {
    let value = header
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(AuthError::Missing(kind.header()))?;
    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::Malformed(kind.header()))
}

/// The guard applied before every protected operation.
pub fn authorize(crypto: &Crypto, header: Option<&str>) -> Result<Authorized, AuthError> {
    let token = bearer(header, Kind::Access)?;
    let user = crypto
        .verify(token, Kind::Access)
        .inspect_err(|e| log::debug!("access token rejected: {}", e))?;
    Ok(Authorized { user })
}

/// Session orchestration over a credential store and token registry.
pub struct Service<S> {
    store: S,
    crypto: Arc<Crypto>,
}

impl<S> Service<S>
where
    S: Store,
{
    pub fn new(store: S, crypto: Arc<Crypto>) -> Self {
        Self { store, crypto }
    }
    pub fn store(&self) -> &S {
        &self.store
    }
    pub fn crypto(&self) -> &Crypto {
        &self.crypto
    }

    /// Registers a user and returns the new id.
    pub async fn signup(&self, mut req: SignupRequest) -> Result<ID<User>, Error> {
        let mut errors = req.sanitize();
        if !errors.contains_key("email") && self.store.exists(&req.email).await? {
            errors.insert("email", Error::DuplicateUser.to_string());
        }
        if !errors.is_empty() {
            return Err(Error::Validation(errors));
        }
        let hashword = password::digest(req.password).await?;
        let id = self.store.create(&req.name, &req.email, &hashword).await?;
        log::info!("registered user {}", id);
        Ok(id)
    }

    /// Checks credentials, then issues a token pair and records the refresh digest.
    pub async fn login(&self, mut req: LoginRequest) -> Result<TokenPair, Error> {
        let errors = req.sanitize();
        if !errors.is_empty() {
            return Err(Error::Validation(errors));
        }
        let Some((id, hashword)) = self.store.credentials(&req.email).await? else {
            password::check(req.password, password::DECOY.to_string()).await?;
            return Err(AuthError::InvalidCredentials.into());
        };
        if !password::check(req.password, hashword).await? {
            log::debug!("password mismatch for user {}", id);
            return Err(AuthError::InvalidCredentials.into());
        }
        let pair = self.crypto.pair(id)?;
        if self.store.record(id, &pair.refresh_token).await? == 0 {
            return Err(Error::Server("failed to record refresh token"));
        }
        log::info!("user {} logged in", id);
        Ok(pair)
    }

    pub fn authorize(&self, header: Option<&str>) -> Result<Authorized, Error> {
        authorize(&self.crypto, header).map_err(Error::from)
    }

    /// Exchanges the active refresh token for a new pair, spending the old one.
    pub async fn refresh(&self, header: Option<&str>) -> Result<TokenPair, Error> {
        let old = bearer(header, Kind::Refresh)?;
        let id = self.crypto.verify(old, Kind::Refresh)?;
        let record = self
            .store
            .lookup(old)
            .await?
            .filter(|record| record.user() == id)
            .ok_or_else(|| {
                log::warn!("stale refresh token presented for user {}", id);
                AuthError::Stale
            })?;
        let pair = self.crypto.pair(record.user())?;
        if !self.store.rotate(old, &pair.refresh_token).await? {
            return Err(Error::Server("failed to rotate refresh token"));
        }
        log::info!("rotated refresh token for user {}", id);
        Ok(pair)
    }

    pub async fn user(&self, _: &Authorized, id: ID<User>) -> Result<User, Error> {
        self.store.user(id).await?.ok_or(Error::NotFound)
    }

    pub async fn users(&self, _: &Authorized) -> Result<Vec<User>, Error> {
        self.store.users().await
    }

    pub async fn delete(&self, auth: &Authorized, id: ID<User>) -> Result<u64, Error> {
        let rows = self.store.delete(id).await?;
        log::info!("user {} deleted user {} ({} rows)", auth.user(), id, rows);
        Ok(rows)
    }

    pub async fn update(&self, auth: &Authorized, mut req: UpdateRequest) -> Result<u64, Error> {
        let errors = req.sanitize();
        let id = match req.id {
            Some(id) if errors.is_empty() => id,
            _ => return Err(Error::Validation(errors)),
        };
        let hashword = password::digest(req.password).await?;
        let rows = self.store.update(id, &req.name, &hashword).await?;
        log::info!("user {} updated user {} ({} rows)", auth.user(), id, rows);
        Ok(rows)
    }
}
