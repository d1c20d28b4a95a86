pub mod errors;
pub mod db;
pub mod user;
pub mod user_credentials;

#[cfg(test)]
mod tests;
