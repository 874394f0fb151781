//! Value objects: identifiers and constrained numbers.
//!
//! All of them are small `Copy` newtypes. Constructors that carry a rule
//! (`Age`, `MaxPlayers`) return `Result`; identifiers accept any integer the
//! backend hands out.

use std::fmt;

use super::error::ValueObjectError;

/// User identifier (the `sub` claim of the bearer token)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(i64);

impl UserId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Event identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventId(i64);

impl EventId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Age of a profile owner, always positive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Age(u32);

impl Age {
    pub fn new(value: u32) -> Result<Self, ValueObjectError> {
        if value == 0 {
            return Err(ValueObjectError::NotPositive("age"));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Age {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Capacity of an event, always positive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxPlayers(u32);

impl MaxPlayers {
    pub fn new(value: u32) -> Result<Self, ValueObjectError> {
        if value == 0 {
            return Err(ValueObjectError::NotPositive("max_players"));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    /// Whether `count` participants reach this capacity
    pub fn is_reached_by(&self, count: usize) -> bool {
        count >= self.0 as usize
    }
}

impl fmt::Display for MaxPlayers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
