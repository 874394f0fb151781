//! Domain layer: entities, value objects, derived participation status and
//! the traits the infrastructure layer implements.

pub mod claims;
pub mod entity;
pub mod error;
pub mod navigation;
pub mod participation;
pub mod repository;
pub mod value_object;

pub use claims::{Claims, decode_claims};
pub use entity::{Event, EventDraft, Gender, Participant, Profile, Session};
pub use error::{ClientError, DecodeError, Rejection, StorageError, ValueObjectError};
pub use navigation::{Navigator, Route};
pub use participation::{JoinAffordance, JoinSignals, ParticipationView};
pub use repository::{AuthRepository, EventRepository, KeyValueStorage, ProfileRepository};
pub use value_object::{Age, EventId, MaxPlayers, UserId};

#[cfg(test)]
pub use navigation::MockNavigator;
#[cfg(test)]
pub use repository::{
    MockAuthRepository, MockEventRepository, MockKeyValueStorage, MockProfileRepository,
};
