//! UseCase 層
//!
//! 画面からの操作を Repository と TokenStore の呼び出しに変換します。

pub mod auth;
pub mod event_query;
pub mod participation;
pub mod profile;
pub mod profile_gate;

pub use auth::{AuthGateway, AuthStatus, LoginOutcome};
pub use event_query::EventQueries;
pub use participation::ParticipationController;
pub use profile::ProfileService;
pub use profile_gate::{GateOutcome, GateState, PROFILE_CHECKED_KEY, ProfileGate};
