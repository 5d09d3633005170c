use super::*;
use acct_core::ID;

const ACCESS_TOKEN_DURATION: std::time::Duration = std::time::Duration::from_secs(15 * 60);
const REFRESH_TOKEN_DURATION: std::time::Duration = std::time::Duration::from_secs(7 * 24 * 60 * 60);

/// Token issuer and verifier. Built once at startup and shared immutably.
pub struct Crypto {
    encoding: jsonwebtoken::EncodingKey,
    decoding: jsonwebtoken::DecodingKey,
    access: std::time::Duration,
    refresh: std::time::Duration,
}

impl Crypto {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: jsonwebtoken::EncodingKey::from_secret(secret),
            decoding: jsonwebtoken::DecodingKey::from_secret(secret),
            access: ACCESS_TOKEN_DURATION,
            refresh: REFRESH_TOKEN_DURATION,
        }
    }
    pub fn with_ttl(self, access: std::time::Duration, refresh: std::time::Duration) -> Self {
        Self {
            access,
            refresh,
            ..self
        }
    }
    /// Reads `JWT_SECRET`, and optionally `ACCESS_TOKEN_TTL` and
    /// `REFRESH_TOKEN_TTL` in the `15m` / `7d` syntax.
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is unset or empty, or a TTL does not parse.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .expect("JWT_SECRET must be set");
        let ttl = |var: &str, default: std::time::Duration| {
            std::env::var(var)
                .map(|s| acct_core::duration(&s).unwrap_or_else(|| panic!("{} is not a duration", var)))
                .unwrap_or(default)
        };
        let access = ttl("ACCESS_TOKEN_TTL", ACCESS_TOKEN_DURATION);
        let refresh = ttl("REFRESH_TOKEN_TTL", REFRESH_TOKEN_DURATION);
        log::info!("tokens live {}s (access) and {}s (refresh)", access.as_secs(), refresh.as_secs());
        Self::new(secret.as_bytes()).with_ttl(access, refresh)
    }
    pub fn ttl(&self, kind: Kind) -> std::time::Duration {
        match kind {
            Kind::Access => self.access,
            Kind::Refresh => self.refresh,
        }
    }
    pub fn issue(&self, user: ID<User>, kind: Kind) -> Result<String, Error> {
        self.encode(&Claims::new(user, kind, self.ttl(kind)))
            .map_err(Error::from)
    }
    /// Fresh access and refresh tokens for one user.
    pub fn pair(&self, user: ID<User>) -> Result<TokenPair, Error> {
        Ok(TokenPair {
            access_token: self.issue(user, Kind::Access)?,
            refresh_token: self.issue(user, Kind::Refresh)?,
        })
    }
    /// Checks signature, expiry, and that the token is of the expected kind.
    pub fn verify(&self, token: &str, kind: Kind) -> Result<ID<User>, AuthError> {
        use jsonwebtoken::errors::ErrorKind;
        let claims = self.decode(token).map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::Expired,
            ErrorKind::InvalidSignature => AuthError::InvalidSignature,
            _ => AuthError::InvalidToken,
        })?;
        if claims.kind() != kind {
            return Err(AuthError::InvalidToken);
        }
        if claims.expired() {
            return Err(AuthError::Expired);
        }
        Ok(claims.user())
    }
    pub fn encode(&self, claims: &Claims) -> Result<String, jsonwebtoken::errors::Error> {
        jsonwebtoken::encode(&jsonwebtoken::Header::default(), claims, &self.encoding)
    }
    pub fn decode(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let mut validation = jsonwebtoken::Validation::new(jsonwebtoken::Algorithm::HS256);
        validation.leeway = 0;
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation).map(|data| data.claims)
    }
    /// One-way digest under which refresh tokens are stored.
    pub fn hash(token: &str) -> Vec<u8> {
        use sha2::Digest;
        sha2::Sha256::digest(token.as_bytes()).to_vec()
    }
}
