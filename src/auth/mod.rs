//! Credential verification and session bookkeeping used by the login flow and the
//! bearer-token guard on mutating routes.

/// Password hashing and verification.
pub mod password;
/// Session token issuing and lookup.
pub mod session;

pub use password::{PasswordVerifier, Argon2Verifier};
pub use session::{MemorySessionStore, SessionStore, SessionUser};
