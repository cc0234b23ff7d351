//! Data Transfer Objects for REST request/response serialization.

pub mod user_dto;

pub use user_dto::*;
