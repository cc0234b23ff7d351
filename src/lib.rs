//! # notify-gateway
//!
//! User registration and login service that pushes a notification over
//! WebSocket to every connected client when a new user registers.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Handlers + receive loop (ws/)
//!     │
//!     ├── UserService (service/)
//!     ├── TokenSigner, Argon2 hashing (auth/)
//!     │
//!     ├── ConnectionRegistry (domain/)
//!     │
//!     └── SQLite user store (persistence/)
//! ```

pub mod api;
pub mod app_state;
pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod server;
pub mod service;
pub mod ws;
