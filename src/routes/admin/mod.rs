pub mod handlers;
pub mod interfaces;
