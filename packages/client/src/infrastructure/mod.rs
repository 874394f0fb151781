//! Infrastructure layer: storage backends, session persistence, the HTTP
//! request layer and its repositories, navigation.

pub mod dto;
pub mod http;
pub mod navigator;
pub mod storage;
pub mod token_store;

pub use navigator::RouteTracker;
pub use token_store::TokenStore;
