pub mod app;
pub mod config;
pub mod constants;
pub mod credentials;
pub mod engine;
pub mod keyring;
pub mod message;
pub mod session;
pub mod transcript;
