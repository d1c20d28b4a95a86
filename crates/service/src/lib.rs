//! Service layer providing account signup and login on top of models.
//! - Separates business logic from data access.
//! - Reuses validation and entity definitions in `models` crate.

pub mod auth;
#[cfg(test)]
pub mod test_support;
