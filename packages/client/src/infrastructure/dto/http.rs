//! HTTP API DTOs.
//!
//! Field names follow the backend's snake_case JSON. Response DTOs are lenient:
//! optional or nullable fields default instead of failing the whole payload.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /auth/signup` and `POST /auth/login`
#[derive(Debug, Serialize)]
pub struct CredentialsDto<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Every successful response wraps its payload in `data`
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

/// Participant entry of an event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantDto {
    pub user_id: i64,
}

/// Event as returned by `GET /events/all` and `GET /events/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDto {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub sport: String,
    #[serde(default)]
    pub location_name: String,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    pub event_datetime: DateTime<FixedOffset>,
    pub max_players: u32,
    pub event_owner: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_last_name: Option<String>,
    /// `null` and missing both mean "no participants"
    #[serde(default)]
    pub participants: Option<Vec<ParticipantDto>>,
}

/// Body of `POST /events` and `PUT /events/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDraftDto {
    pub title: String,
    pub sport: String,
    pub location_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub event_datetime: DateTime<FixedOffset>,
    pub max_players: u32,
}

/// Profile body, both directions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileDto {
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
    pub gender: String,
    #[serde(default)]
    pub sport_preference: Vec<String>,
}

/// First human-readable message of an error body.
///
/// The backend reports failures as `{"error": "..."}`; some handlers use
/// `message` instead.
pub fn error_message(body: &Value) -> Option<String> {
    ["error", "message"]
        .iter()
        .filter_map(|key| body.get(*key))
        .find_map(|value| match value {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            _ => None,
        })
}
