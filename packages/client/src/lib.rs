//! Interactive command-line client for the Roomcast relay.

pub mod command;
pub mod domain;
pub mod error;
pub mod formatter;
pub mod runner;
pub mod session;
pub mod ui;

pub use runner::run_client;
