pub mod error;
pub mod handlers;
pub mod hashing;
pub mod interfaces;
pub mod middleware;
pub mod token;
