//! TCP front door for the hub

pub mod config;
pub mod listener;

pub use config::ServerConfig;
pub use listener::HubServer;
