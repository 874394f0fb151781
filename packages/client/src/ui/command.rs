//! Parsing of REPL input lines into commands.

use std::{collections::BTreeSet, str::FromStr};

use chrono::DateTime;
use thiserror::Error;

use crate::domain::{Age, EventDraft, EventId, Gender, MaxPlayers, Profile};

/// Field separator of the event and profile commands
const FIELD_SEPARATOR: char = '|';

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Signup { email: String, password: String },
    Login { email: String, password: String },
    Logout,
    Home,
    Events,
    Show(EventId),
    Join(EventId),
    Leave(EventId),
    Joined,
    Created,
    Profile,
    CreateProfile(Profile),
    UpdateProfile(Profile),
    CreateEvent(EventDraft),
    UpdateEvent(EventId, EventDraft),
    DeleteEvent(EventId),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Unknown command '{0}'. Type 'help' for the list of commands.")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Invalid {field}: {reason}")]
    InvalidArgument { field: &'static str, reason: String },
}

const SIGNUP_USAGE: &str = "signup <email> <password>";
const LOGIN_USAGE: &str = "login <email> <password>";
const EVENT_ID_USAGE: &str = "<command> <event-id>";
const PROFILE_USAGE: &str = "create-profile <first name>|<last name>|<age>|<Male|Female|Others>|<sport,sport,...>";
const UPDATE_PROFILE_USAGE: &str = "update-profile <first name>|<last name>|<age>|<Male|Female|Others>|<sport,sport,...>";
const EVENT_USAGE: &str =
    "create-event <title>|<sport>|<location>|<latitude>|<longitude>|<RFC 3339 datetime>|<max players>";
const UPDATE_EVENT_USAGE: &str = "update-event <event-id> <title>|<sport>|<location>|<latitude>|<longitude>|<RFC 3339 datetime>|<max players>";

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        match name {
            "signup" => {
                let (email, password) = credentials(rest, SIGNUP_USAGE)?;
                Ok(Command::Signup { email, password })
            }
            "login" => {
                let (email, password) = credentials(rest, LOGIN_USAGE)?;
                Ok(Command::Login { email, password })
            }
            "logout" => Ok(Command::Logout),
            "home" => Ok(Command::Home),
            "events" => Ok(Command::Events),
            "show" => Ok(Command::Show(event_id(rest)?)),
            "join" => Ok(Command::Join(event_id(rest)?)),
            "leave" => Ok(Command::Leave(event_id(rest)?)),
            "joined" => Ok(Command::Joined),
            "created" => Ok(Command::Created),
            "profile" => Ok(Command::Profile),
            "create-profile" => Ok(Command::CreateProfile(profile(rest, PROFILE_USAGE)?)),
            "update-profile" => Ok(Command::UpdateProfile(profile(
                rest,
                UPDATE_PROFILE_USAGE,
            )?)),
            "create-event" => Ok(Command::CreateEvent(event_draft(rest, EVENT_USAGE)?)),
            "update-event" => {
                let (id, fields) = rest
                    .split_once(char::is_whitespace)
                    .ok_or(CommandError::Usage(UPDATE_EVENT_USAGE))?;
                Ok(Command::UpdateEvent(
                    event_id(id)?,
                    event_draft(fields, UPDATE_EVENT_USAGE)?,
                ))
            }
            "delete-event" => Ok(Command::DeleteEvent(event_id(rest)?)),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

fn credentials(rest: &str, usage: &'static str) -> Result<(String, String), CommandError> {
    let mut parts = rest.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(email), Some(password), None) => Ok((email.to_string(), password.to_string())),
        _ => Err(CommandError::Usage(usage)),
    }
}

fn event_id(rest: &str) -> Result<EventId, CommandError> {
    if rest.is_empty() {
        return Err(CommandError::Usage(EVENT_ID_USAGE));
    }
    rest.parse::<i64>()
        .map(EventId::new)
        .map_err(|e| invalid("event id", e))
}

fn fields<'a, const N: usize>(
    rest: &'a str,
    usage: &'static str,
) -> Result<[&'a str; N], CommandError> {
    let parts: Vec<&str> = rest.split(FIELD_SEPARATOR).map(str::trim).collect();
    if parts.iter().any(|p| p.is_empty()) {
        return Err(CommandError::Usage(usage));
    }
    parts.try_into().map_err(|_| CommandError::Usage(usage))
}

fn profile(rest: &str, usage: &'static str) -> Result<Profile, CommandError> {
    let [first_name, last_name, age, gender, sports] = fields::<5>(rest, usage)?;

    let age = age.parse::<u32>().map_err(|e| invalid("age", e))?;
    Ok(Profile {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        age: Age::new(age).map_err(|e| invalid("age", e))?,
        gender: gender.parse::<Gender>().map_err(|e| invalid("gender", e))?,
        sport_preference: sports
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect::<BTreeSet<_>>(),
    })
}

fn event_draft(rest: &str, usage: &'static str) -> Result<EventDraft, CommandError> {
    let [title, sport, location, latitude, longitude, datetime, max_players] =
        fields::<7>(rest, usage)?;

    let max_players = max_players
        .parse::<u32>()
        .map_err(|e| invalid("max players", e))?;
    Ok(EventDraft {
        title: title.to_string(),
        sport: sport.to_string(),
        location_name: location.to_string(),
        latitude: latitude.parse().map_err(|e| invalid("latitude", e))?,
        longitude: longitude.parse().map_err(|e| invalid("longitude", e))?,
        event_datetime: DateTime::parse_from_rfc3339(datetime)
            .map_err(|e| invalid("datetime", e))?,
        max_players: MaxPlayers::new(max_players).map_err(|e| invalid("max players", e))?,
    })
}

fn invalid(field: &'static str, reason: impl ToString) -> CommandError {
    CommandError::InvalidArgument {
        field,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_login() {
        // テスト項目: login コマンドがメールアドレスとパスワードに分解される
        // given (前提条件):
        let line = "  login alice@example.com Secret#123 ";

        // when (操作):
        let command = line.parse::<Command>();

        // then (期待する結果):
        assert_eq!(
            command,
            Ok(Command::Login {
                email: "alice@example.com".to_string(),
                password: "Secret#123".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_login_with_missing_password() {
        // テスト項目: 引数が足りない場合は使い方が返される
        // given (前提条件):
        let line = "login alice@example.com";

        // when (操作):
        let command = line.parse::<Command>();

        // then (期待する結果):
        assert_eq!(command, Err(CommandError::Usage(LOGIN_USAGE)));
    }

    #[test]
    fn test_parse_join_with_event_id() {
        // テスト項目: join コマンドのイベント ID が解釈される
        // given (前提条件):
        let line = "join 42";

        // when (操作):
        let command = line.parse::<Command>();

        // then (期待する結果):
        assert_eq!(command, Ok(Command::Join(EventId::new(42))));
    }

    #[test]
    fn test_parse_join_with_invalid_event_id() {
        // テスト項目: 数値でないイベント ID はエラー
        // given (前提条件):
        let line = "join abc";

        // when (操作):
        let command = line.parse::<Command>();

        // then (期待する結果):
        assert!(matches!(
            command,
            Err(CommandError::InvalidArgument {
                field: "event id",
                ..
            })
        ));
    }

    #[test]
    fn test_parse_create_event() {
        // テスト項目: create-event の各フィールドが EventDraft に変換される
        // given (前提条件):
        let line = "create-event Sunday match | Football | Central Park | 40.78 | -73.96 | 2026-11-01T10:00:00+09:00 | 10";

        // when (操作):
        let command = line.parse::<Command>().unwrap();

        // then (期待する結果):
        let Command::CreateEvent(draft) = command else {
            panic!("unexpected command: {:?}", command);
        };
        assert_eq!(draft.title, "Sunday match");
        assert_eq!(draft.location_name, "Central Park");
        assert_eq!(draft.max_players.value(), 10);
        assert_eq!(draft.event_datetime.to_rfc3339(), "2026-11-01T10:00:00+09:00");
    }

    #[test]
    fn test_parse_create_event_with_zero_players() {
        // テスト項目: 定員 0 のイベントは作成できない
        // given (前提条件):
        let line = "create-event Run|Running|Park|0|0|2026-11-01T10:00:00Z|0";

        // when (操作):
        let command = line.parse::<Command>();

        // then (期待する結果):
        assert!(matches!(
            command,
            Err(CommandError::InvalidArgument {
                field: "max players",
                ..
            })
        ));
    }

    #[test]
    fn test_parse_update_event() {
        // テスト項目: update-event はイベント ID とフィールドに分解される
        // given (前提条件):
        let line = "update-event 3 Run|Running|Park|1.5|2.5|2026-11-01T10:00:00Z|4";

        // when (操作):
        let command = line.parse::<Command>().unwrap();

        // then (期待する結果):
        let Command::UpdateEvent(id, draft) = command else {
            panic!("unexpected command: {:?}", command);
        };
        assert_eq!(id, EventId::new(3));
        assert_eq!(draft.latitude, 1.5);
    }

    #[test]
    fn test_parse_create_profile() {
        // テスト項目: create-profile の好きなスポーツは重複なしの集合になる
        // given (前提条件):
        let line = "create-profile Ada|Lovelace|36|Female|Tennis, Football,Tennis";

        // when (操作):
        let command = line.parse::<Command>().unwrap();

        // then (期待する結果):
        let Command::CreateProfile(profile) = command else {
            panic!("unexpected command: {:?}", command);
        };
        assert_eq!(profile.gender, Gender::Female);
        assert_eq!(profile.age.value(), 36);
        assert_eq!(
            profile.sport_preference.into_iter().collect::<Vec<_>>(),
            vec!["Football".to_string(), "Tennis".to_string()]
        );
    }

    #[test]
    fn test_parse_create_profile_with_wrong_field_count() {
        // テスト項目: フィールド数が合わない場合は使い方が返される
        // given (前提条件):
        let line = "create-profile Ada|Lovelace|36";

        // when (操作):
        let command = line.parse::<Command>();

        // then (期待する結果):
        assert_eq!(command, Err(CommandError::Usage(PROFILE_USAGE)));
    }

    #[test]
    fn test_parse_update_profile() {
        // テスト項目: update-profile は create-profile と同じ形式で解釈される
        // given (前提条件):
        let line = "update-profile Ada | Byron | 37 | Female | Chess";

        // when (操作):
        let command = line.parse::<Command>().unwrap();

        // then (期待する結果):
        let Command::UpdateProfile(profile) = command else {
            panic!("unexpected command: {:?}", command);
        };
        assert_eq!(profile.last_name, "Byron");
        assert_eq!(profile.age.value(), 37);
    }

    #[test]
    fn test_parse_update_profile_without_fields() {
        // テスト項目: 引数のない update-profile には専用の使い方が返される
        // given (前提条件):
        let line = "update-profile";

        // when (操作):
        let command = line.parse::<Command>();

        // then (期待する結果):
        assert_eq!(command, Err(CommandError::Usage(UPDATE_PROFILE_USAGE)));
    }

    #[test]
    fn test_parse_unknown_command() {
        // テスト項目: 未知のコマンドはエラー
        // given (前提条件):
        let line = "dance";

        // when (操作):
        let command = line.parse::<Command>();

        // then (期待する結果):
        assert_eq!(command, Err(CommandError::Unknown("dance".to_string())));
    }
}
