//! Participation status derived from an event and the local session.
//!
//! Nothing here is stored. The controller recomputes these values from the
//! current event list every time the UI asks, so the three signals can never
//! drift apart from the data they describe.

use super::{
    entity::Event,
    error::Rejection,
    value_object::UserId,
};

/// Tri-state status of the current user for one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticipationView {
    NotJoined,
    Joined,
    Full,
}

impl ParticipationView {
    /// Label of the join button
    pub fn label(&self) -> &'static str {
        match self {
            ParticipationView::NotJoined => "Join Team",
            ParticipationView::Joined => "Already Joined",
            ParticipationView::Full => "Event Full",
        }
    }
}

/// The independent signals that disable joining.
///
/// `full` and `already_joined` come from the server's event data,
/// `pending_joined` from the local record of confirmed joins that the last
/// resync may not reflect yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinSignals {
    pub full: bool,
    pub already_joined: bool,
    pub pending_joined: bool,
}

impl JoinSignals {
    pub fn evaluate(event: &Event, user_id: Option<UserId>, pending_joined: bool) -> Self {
        Self {
            full: event.is_full(),
            already_joined: user_id.is_some_and(|id| event.has_participant(id)),
            pending_joined,
        }
    }

    pub fn is_join_disabled(&self) -> bool {
        self.full || self.already_joined || self.pending_joined
    }

    /// Membership wins over fullness: a participant of a full event sees
    /// "Already Joined", everyone else sees "Event Full".
    pub fn view(&self) -> ParticipationView {
        if self.already_joined || self.pending_joined {
            ParticipationView::Joined
        } else if self.full {
            ParticipationView::Full
        } else {
            ParticipationView::NotJoined
        }
    }

    /// Reason to refuse a join locally, if any
    pub fn rejection(&self) -> Option<Rejection> {
        if self.already_joined {
            Some(Rejection::AlreadyJoined)
        } else if self.pending_joined {
            Some(Rejection::PendingJoin)
        } else if self.full {
            Some(Rejection::EventFull)
        } else {
            None
        }
    }
}

/// What the UI needs to draw the join button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinAffordance {
    pub view: ParticipationView,
    pub enabled: bool,
}

impl JoinAffordance {
    /// `in_flight` disables the button while a request for the event is running
    pub fn new(signals: JoinSignals, in_flight: bool) -> Self {
        Self {
            view: signals.view(),
            enabled: !(signals.is_join_disabled() || in_flight),
        }
    }

    pub fn label(&self) -> &'static str {
        self.view.label()
    }
}
