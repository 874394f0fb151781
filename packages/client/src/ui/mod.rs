//! Terminal front end.

pub mod app;
pub mod command;
pub mod formatter;
pub mod runner;

pub use app::{App, Step};
pub use runner::run_client;
