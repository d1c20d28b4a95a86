pub mod routes;
pub mod startup;
pub mod errors;
pub mod openapi;

pub use routes::auth::{AuthEndpoint, AuthResponse};
pub use startup::run;
