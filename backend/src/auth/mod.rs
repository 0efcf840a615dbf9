//! Authentication module
//!
//! Provides JWT-based authentication with argon2 password hashing.

mod jwt;
mod middleware;
mod password;

pub use jwt::{Claims, TokenError, TokenService};
pub use middleware::{authenticate, bearer_token, require_auth, AuthUser};
pub use password::PasswordService;
