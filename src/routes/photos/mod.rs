pub mod handlers;
pub mod interfaces;
pub mod storage;
