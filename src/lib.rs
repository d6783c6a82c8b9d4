pub mod config;
pub mod error;
pub mod models;
pub mod policy;
pub mod repo;
pub mod routes;
pub mod state;
