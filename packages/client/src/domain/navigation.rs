//! Navigation targets and the navigator seam.

use std::fmt;

use super::EventId;

/// Screens of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Login entry point, target of every forced logout
    Login,
    Register,
    /// Profile creation flow, target of the profile gate
    CreateProfile,
    /// Main view (event list)
    Home,
    MyProfile,
    CreateEvent,
    EventDetails(EventId),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::CreateProfile => "/profile".to_string(),
            Route::Home => "/home".to_string(),
            Route::MyProfile => "/my-profile".to_string(),
            Route::CreateEvent => "/create-event".to_string(),
            Route::EventDetails(id) => format!("/events/{}", id),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Moves the user between screens
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}
