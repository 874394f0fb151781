//! Wiring of the client core and dispatch of REPL commands.

use std::sync::Arc;

use crate::{
    config::ClientConfig,
    domain::{ClientError, Event, EventId, KeyValueStorage, Navigator, Route},
    infrastructure::{
        RouteTracker, TokenStore,
        http::{ApiClient, HttpAuthRepository, HttpEventRepository, HttpProfileRepository},
        storage::{FileStorage, InMemoryStorage},
    },
    usecase::{
        AuthGateway, EventQueries, GateOutcome, ParticipationController, ProfileGate,
        ProfileService,
    },
};

use super::{
    command::Command,
    formatter::EventFormatter,
};

/// What the REPL does after a line was handled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Continue(String),
    Quit(String),
}

/// The client with all use cases wired to the HTTP backend
pub struct App {
    token_store: TokenStore,
    navigator: Arc<RouteTracker>,
    auth: AuthGateway,
    gate: ProfileGate,
    profiles: ProfileService,
    queries: EventQueries,
    participation: ParticipationController,
}

impl App {
    /// Persistent storage is a JSON file at `config.storage_path`, session
    /// storage lives as long as the process.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        Self::with_storage(
            config,
            Arc::new(FileStorage::open(&config.storage_path)),
            Arc::new(InMemoryStorage::new()),
        )
    }

    pub fn with_storage(
        config: &ClientConfig,
        persistent: Arc<dyn KeyValueStorage>,
        session: Arc<dyn KeyValueStorage>,
    ) -> Result<Self, ClientError> {
        let token_store = TokenStore::new(persistent);
        let navigator = Arc::new(RouteTracker::new(Route::Login));
        let api = Arc::new(ApiClient::new(
            config,
            token_store.clone(),
            navigator.clone(),
        )?);

        let profile_repository = Arc::new(HttpProfileRepository::new(api.clone()));
        let event_repository = Arc::new(HttpEventRepository::new(api.clone()));

        Ok(Self {
            auth: AuthGateway::new(
                Arc::new(HttpAuthRepository::new(api)),
                token_store.clone(),
            ),
            gate: ProfileGate::new(
                profile_repository.clone(),
                token_store.clone(),
                session,
                navigator.clone(),
            ),
            profiles: ProfileService::new(
                profile_repository,
                token_store.clone(),
                navigator.clone(),
            ),
            queries: EventQueries::new(event_repository.clone(), token_store.clone()),
            participation: ParticipationController::new(event_repository, token_store.clone()),
            token_store,
            navigator,
        })
    }

    pub fn route(&self) -> Route {
        self.navigator.current()
    }

    pub fn navigator(&self) -> &RouteTracker {
        &self.navigator
    }

    /// Initial screen: the event list for a stored session, the login hint otherwise
    pub async fn start(&self) -> String {
        if !self.token_store.get().is_authenticated() {
            return "Welcome to Sportify. Log in with 'login <email> <password>' or type 'help'.\n"
                .to_string();
        }

        match self.enter_home().await {
            Ok(output) => output,
            Err(e) => self.failure(e).await,
        }
    }

    pub async fn handle_line(&self, line: &str) -> Step {
        let line = line.trim();
        if line.is_empty() {
            return Step::Continue(String::new());
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => return Step::Continue(EventFormatter::format_error(&e.to_string())),
        };
        if command == Command::Quit {
            return Step::Quit("Bye!\n".to_string());
        }

        match self.execute(command).await {
            Ok(output) => Step::Continue(output),
            Err(e) => Step::Continue(self.failure(e).await),
        }
    }

    async fn execute(&self, command: Command) -> Result<String, ClientError> {
        match command {
            Command::Signup { email, password } => {
                self.auth.signup(&email, &password).await?;
                self.navigator.navigate(Route::Login);
                Ok(EventFormatter::format_success(
                    "Account created. Please log in.",
                ))
            }
            Command::Login { email, password } => {
                let outcome = self.auth.login(&email, &password).await?;
                // 前のセッションの状態を新しいユーザーに持ち越さない
                self.end_session().await;
                let mut output = EventFormatter::format_success("Logged in");
                if let Some(warning) = outcome.decode_warning {
                    output.push_str(&EventFormatter::format_error(&format!(
                        "Could not read your user id from the token ({}). Some views are unavailable.",
                        warning
                    )));
                }
                output.push_str(&self.enter_home().await?);
                Ok(output)
            }
            Command::Logout => {
                self.auth.logout();
                self.end_session().await;
                self.navigator.navigate(Route::Login);
                Ok(EventFormatter::format_success("Logged out"))
            }
            Command::Home | Command::Events => self.enter_home().await,
            Command::Show(event_id) => {
                self.participation.refresh_event(event_id).await?;
                self.show_event(event_id).await
            }
            Command::Join(event_id) => {
                self.participation.join_team(event_id).await?;
                let mut output = EventFormatter::format_success(&format!("Joined event {}", event_id));
                output.push_str(&self.show_card(event_id).await);
                Ok(output)
            }
            Command::Leave(event_id) => {
                self.participation.leave_team(event_id).await?;
                let mut output = EventFormatter::format_success(&format!("Left event {}", event_id));
                output.push_str(&self.show_card(event_id).await);
                Ok(output)
            }
            Command::Joined => {
                let events = self.queries.joined_by_current_user().await?;
                Ok(self.render_list("Events you joined", events).await)
            }
            Command::Created => {
                let events = self.queries.created_by_current_user().await?;
                Ok(self.render_list("Events you created", events).await)
            }
            Command::Profile => {
                self.navigator.navigate(Route::MyProfile);
                match self.profiles.mine().await? {
                    Some(profile) => Ok(EventFormatter::format_profile(&profile)),
                    None => Ok("No profile yet. Create one with 'create-profile'.\n".to_string()),
                }
            }
            Command::CreateProfile(profile) => {
                self.profiles.create(&profile).await?;
                let mut output = EventFormatter::format_success("Profile created");
                output.push_str(&self.enter_home().await?);
                Ok(output)
            }
            Command::UpdateProfile(profile) => {
                self.profiles.update(&profile).await?;
                self.navigator.navigate(Route::MyProfile);
                let mut output = EventFormatter::format_success("Profile updated");
                output.push_str(&EventFormatter::format_profile(&profile));
                Ok(output)
            }
            Command::CreateEvent(draft) => {
                self.navigator.navigate(Route::CreateEvent);
                let created = self.participation.create_event(&draft).await?;
                self.navigator.navigate(Route::Home);
                let mut output =
                    EventFormatter::format_success(&format!("Created event {}", created.id));
                output.push_str(&self.render_list("All events", self.participation.events().await).await);
                Ok(output)
            }
            Command::UpdateEvent(event_id, draft) => {
                self.participation.update_event(event_id, &draft).await?;
                let mut output =
                    EventFormatter::format_success(&format!("Updated event {}", event_id));
                output.push_str(&self.show_event(event_id).await?);
                Ok(output)
            }
            Command::DeleteEvent(event_id) => {
                self.participation.delete_event(event_id).await?;
                self.navigator.navigate(Route::Home);
                Ok(EventFormatter::format_success(&format!(
                    "Deleted event {}",
                    event_id
                )))
            }
            Command::Help => Ok(EventFormatter::format_help()),
            Command::Quit => Ok(String::new()),
        }
    }

    /// Profile gate, then the full event list
    async fn enter_home(&self) -> Result<String, ClientError> {
        match self.gate.enter_main_view().await? {
            GateOutcome::ProfileRequired => Ok(
                "You have no profile yet. Create one with \
                 'create-profile <first>|<last>|<age>|<gender>|<sports>'.\n"
                    .to_string(),
            ),
            GateOutcome::Proceed => {
                if self.route() != Route::Home {
                    self.navigator.navigate(Route::Home);
                }
                self.participation.load().await?;
                Ok(self
                    .render_list("All events", self.participation.events().await)
                    .await)
            }
        }
    }

    async fn show_event(&self, event_id: EventId) -> Result<String, ClientError> {
        let event = self
            .participation
            .event(event_id)
            .await
            .ok_or_else(|| ClientError::NotFound(format!("Event {} not found", event_id)))?;
        self.navigator.navigate(Route::EventDetails(event_id));
        Ok(EventFormatter::format_event_detail(
            &event,
            self.participation.affordance(event_id).await,
            self.token_store.get().user_id(),
        ))
    }

    async fn show_card(&self, event_id: EventId) -> String {
        match self.participation.event(event_id).await {
            Some(event) => EventFormatter::format_event_card(
                &event,
                self.participation.affordance(event_id).await,
            ),
            None => String::new(),
        }
    }

    async fn render_list(&self, title: &str, events: Vec<Event>) -> String {
        let mut cards = Vec::with_capacity(events.len());
        for event in events {
            let affordance = self.participation.affordance(event.id).await;
            cards.push((event, affordance));
        }
        EventFormatter::format_event_list(title, &cards)
    }

    /// Drop everything derived from the previous session
    async fn end_session(&self) {
        self.gate.reset();
        self.participation.reset().await;
    }

    async fn failure(&self, error: ClientError) -> String {
        tracing::debug!("Command failed: {:?}", error);
        if matches!(error, ClientError::AuthExpired) {
            self.end_session().await;
        }
        EventFormatter::format_error(&error.to_string())
    }
}
