//! Sportify client core.
//!
//! Keeps the client's view of the session, the user's profile and event
//! participation consistent with the backend. A terminal front end in `ui`
//! drives it.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
