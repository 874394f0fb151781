//! Conversion logic between DTOs and domain entities.

use std::collections::BTreeSet;

use crate::domain::{
    Age, Event, EventDraft, EventId, MaxPlayers, Participant, Profile, UserId, ValueObjectError,
    entity::dedup_participants,
};
use crate::infrastructure::dto::http as dto;

// ========================================
// DTO → Domain Entity
// ========================================

impl TryFrom<dto::EventDto> for Event {
    type Error = ValueObjectError;

    fn try_from(dto: dto::EventDto) -> Result<Self, Self::Error> {
        let owner_name = match (dto.owner_first_name, dto.owner_last_name) {
            (Some(first), Some(last)) => Some(format!("{} {}", first, last)),
            (Some(first), None) => Some(first),
            (None, Some(last)) => Some(last),
            (None, None) => None,
        };

        let participants = dto
            .participants
            .unwrap_or_default()
            .into_iter()
            .map(|p| Participant {
                user_id: UserId::new(p.user_id),
            })
            .collect();

        Ok(Self {
            id: EventId::new(dto.id),
            title: dto.title,
            sport: dto.sport,
            location_name: dto.location_name,
            latitude: dto.latitude,
            longitude: dto.longitude,
            event_datetime: dto.event_datetime,
            max_players: MaxPlayers::new(dto.max_players)?,
            owner_id: UserId::new(dto.event_owner),
            owner_name,
            participants: dedup_participants(participants),
        })
    }
}

impl TryFrom<dto::ProfileDto> for Profile {
    type Error = ValueObjectError;

    fn try_from(dto: dto::ProfileDto) -> Result<Self, Self::Error> {
        Ok(Self {
            first_name: dto.first_name,
            last_name: dto.last_name,
            age: Age::new(dto.age)?,
            gender: dto.gender.parse()?,
            sport_preference: dto.sport_preference.into_iter().collect::<BTreeSet<_>>(),
        })
    }
}

// ========================================
// Domain Entity → DTO
// ========================================

impl From<&EventDraft> for dto::EventDraftDto {
    fn from(draft: &EventDraft) -> Self {
        Self {
            title: draft.title.clone(),
            sport: draft.sport.clone(),
            location_name: draft.location_name.clone(),
            latitude: draft.latitude,
            longitude: draft.longitude,
            event_datetime: draft.event_datetime,
            max_players: draft.max_players.value(),
        }
    }
}

impl From<&Profile> for dto::ProfileDto {
    fn from(profile: &Profile) -> Self {
        Self {
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            age: profile.age.value(),
            gender: profile.gender.as_str().to_string(),
            sport_preference: profile.sport_preference.iter().cloned().collect(),
        }
    }
}
