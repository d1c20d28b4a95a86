//! Auth module: domain, persistence ports, transaction scopes and the service.
//!
//! The HTTP layer only sees the [`AuthService`] capability; everything else
//! is here so it can be exercised without a web framework.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod store;
pub mod service;
pub mod repo;

pub use domain::{AuthRequest, User};
pub use errors::AuthError;
pub use service::{AccountService, AuthConfig, AuthService};
pub use store::{AuthStore, AuthTransaction};
