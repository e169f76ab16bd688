//! Credential hashing and session token signing.

mod password;
mod token;

pub use password::PasswordHasher;
pub use token::TokenIssuer;
