//! Accounts, JWT sessions, and rotating refresh tokens.
//!
//! JWT-based authentication with Argon2 password hashing. Logins hand out
//! a short-lived access token and a long-lived refresh token; only the
//! SHA-256 digest of the refresh token is persisted, and every refresh
//! swaps that digest for the new one so each refresh token works once.
//!
//! ## Identity Types
//!
//! - [`User`]: Registered account (never carries its password hash)
//! - [`TokenRecord`]: Persisted digest of a user's active refresh token
//!
//! ## Security
//!
//! - [`Crypto`]: JWT issuance and verification
//! - [`Claims`]: JWT payload structure
//! - [`password`]: Argon2 hashing and verification
//!
//! ## Orchestration
//!
//! - [`UserRepository`] / [`TokenRegistry`]: storage seams
//! - [`Service`]: signup, login, refresh, and guarded user operations
//! - [`Authorized`]: proof that the access-token guard passed
mod claims;
mod crypto;
mod dto;
mod error;
pub mod password;
mod registry;
mod session;
mod token;
mod user;

pub use claims::*;
pub use crypto::*;
pub use dto::*;
pub use error::*;
pub use registry::*;
pub use session::*;
pub use token::*;
pub use user::*;

#[cfg(feature = "database")]
mod repository;
#[cfg(feature = "database")]
pub use repository::*;

#[cfg(any(test, feature = "memory"))]
mod memory;
#[cfg(any(test, feature = "memory"))]
pub use memory::*;

#[cfg(feature = "server")]
mod handlers;
#[cfg(feature = "server")]
mod middleware;
#[cfg(feature = "server")]
pub use handlers::*;
#[cfg(feature = "server")]
pub use middleware::*;
