//! Domain layer - Core account entities and value objects.
//!
//! This crate contains pure domain types with no infrastructure dependencies.
//! The account service, its stores and its callers all speak these types.

pub mod account;
pub mod constants;
pub mod user;

pub use account::{
    AccountView, LoginRequest, LoginResponse, RegisterRequest, SessionClaims, UpdateRequest,
};
pub use constants::*;
pub use user::{NewUser, Role, User, UserChanges};
