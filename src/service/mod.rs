//! Service layer: business logic orchestration.
//!
//! [`UserService`] coordinates account operations, delegates storage to the
//! persistence layer, and announces registrations through the
//! [`super::domain::ConnectionRegistry`].

pub mod user_service;

pub use user_service::UserService;
