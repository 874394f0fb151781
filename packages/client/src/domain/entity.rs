//! Domain entities: session, profile and event.

use std::{collections::BTreeSet, fmt, str::FromStr};

use chrono::{DateTime, FixedOffset};

use super::{
    error::ValueObjectError,
    value_object::{Age, EventId, MaxPlayers, UserId},
};

/// The client's belief about the current authentication.
///
/// A user id only exists together with the token it was decoded from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
    user_id: Option<UserId>,
}

impl Session {
    /// Session for a token, with the user id decoded from it (if decoding worked)
    pub fn new(token: String, user_id: Option<UserId>) -> Self {
        Self {
            token: Some(token),
            user_id,
        }
    }

    /// No token, no user
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.user_id
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

/// Gender options offered by the profile form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
    Others,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Others => "Others",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = ValueObjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Male" => Ok(Gender::Male),
            "Female" => Ok(Gender::Female),
            "Others" => Ok(Gender::Others),
            other => Err(ValueObjectError::UnknownGender(other.to_string())),
        }
    }
}

/// A user's profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub first_name: String,
    pub last_name: String,
    pub age: Age,
    pub gender: Gender,
    pub sport_preference: BTreeSet<String>,
}

/// An event participant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Participant {
    pub user_id: UserId,
}

/// A sports event as reported by the backend
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub sport: String,
    pub location_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub event_datetime: DateTime<FixedOffset>,
    pub max_players: MaxPlayers,
    pub owner_id: UserId,
    /// Display name of the owner, only present on summary rows
    pub owner_name: Option<String>,
    /// Ordered, unique by user id
    pub participants: Vec<Participant>,
}

impl Event {
    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    pub fn has_participant(&self, user_id: UserId) -> bool {
        self.participants.iter().any(|p| p.user_id == user_id)
    }

    /// Server-reported fullness
    pub fn is_full(&self) -> bool {
        self.max_players.is_reached_by(self.participant_count())
    }

    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id == user_id
    }
}

/// Payload for creating or updating an event
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    pub title: String,
    pub sport: String,
    pub location_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub event_datetime: DateTime<FixedOffset>,
    pub max_players: MaxPlayers,
}

/// Drop repeated user ids, keeping the first occurrence
pub(crate) fn dedup_participants(participants: Vec<Participant>) -> Vec<Participant> {
    let mut seen = BTreeSet::new();
    participants
        .into_iter()
        .filter(|p| seen.insert(p.user_id))
        .collect()
}
