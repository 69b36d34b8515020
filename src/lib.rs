pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod loader;
pub mod notify;
pub mod runner;
