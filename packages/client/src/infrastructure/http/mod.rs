//! Backend access over HTTP.
//!
//! `ApiClient` is the request layer; the repositories translate between
//! endpoints and domain types.

pub mod auth;
pub mod client;
pub mod event;
pub mod profile;

pub use auth::HttpAuthRepository;
pub use client::{Access, ApiClient};
pub use event::HttpEventRepository;
pub use profile::HttpProfileRepository;
