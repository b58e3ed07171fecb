//! Authentication
//!
//! Shoppers authenticate with bearer session tokens. Only a SHA-256 verifier of
//! each token is stored; the raw token is shown once when it is issued.

mod errors;
mod models;
mod repository;
mod service;
mod token;

pub use errors::*;
pub use models::*;
pub use repository::PgAuthRepository;
pub use service::*;
pub use token::*;
