//! Data Transfer Objects (DTOs) for the backend HTTP API.
//!
//! - `http`: request/response bodies as they appear on the wire
//! - `conversion`: mapping between DTOs and domain entities

pub mod conversion;
pub mod http;
