//! Credential handling: password hashing and signed session tokens.
//!
//! Neither submodule touches the connection registry. The WebSocket layer
//! only consumes the [`TokenSigner::verify`] result to pick the identity a
//! connection is registered under.

pub mod password;
pub mod token;

pub use password::{hash_password, verify_password};
pub use token::{TokenError, TokenSigner};
