use super::*;
use acct_core::ID;

/// Which lifetime and which check a token belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Access,
    Refresh,
}

impl Kind {
    /// Request header the token travels in.
    pub const fn header(&self) -> &'static str {
        match self {
            Self::Access => "Authorization",
            Self::Refresh => "Refresh",
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub jti: uuid::Uuid,
    pub typ: Kind,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(user: ID<User>, kind: Kind, ttl: std::time::Duration) -> Self {
        let now = acct_core::now();
        let ttl = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        Self {
            sub: user.inner(),
            jti: uuid::Uuid::now_v7(),
            typ: kind,
            iat: now,
            exp: now.saturating_add(ttl),
        }
    }
    pub fn expired(&self) -> bool {
        self.exp < acct_core::now()
    }
    pub fn user(&self) -> ID<User> {
        ID::from(self.sub)
    }
    pub fn kind(&self) -> Kind {
        self.typ
    }
}
