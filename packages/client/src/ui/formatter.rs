//! Output formatting for the terminal front end.

use crate::domain::{Event, JoinAffordance, Profile, UserId};

const RULE: &str = "============================================================";
const THIN_RULE: &str = "------------------------------------------------------------";

/// Formatter for everything the REPL prints
pub struct EventFormatter;

impl EventFormatter {
    /// Format one event as a card of the event list
    ///
    /// # Arguments
    ///
    /// * `event` - The event to show
    /// * `affordance` - State of the join button, `None` when it cannot be derived
    ///
    /// # Returns
    ///
    /// A formatted card ending with a newline
    pub fn format_event_card(event: &Event, affordance: Option<JoinAffordance>) -> String {
        let mut output = format!("[{}] {} ({})\n", event.id, event.title, event.sport);
        output.push_str(&format!("    📍 {}\n", event.location_name));
        output.push_str(&format!(
            "    🕒 {}\n",
            event.event_datetime.format("%Y-%m-%d %H:%M %:z")
        ));
        if let Some(owner) = &event.owner_name {
            output.push_str(&format!("    👤 {}\n", owner));
        }
        output.push_str(&format!(
            "    👥 {}/{}",
            event.participant_count(),
            event.max_players
        ));
        if let Some(affordance) = affordance {
            output.push_str(&format!("  {}", Self::format_button(affordance)));
        }
        output.push('\n');
        output
    }

    /// Format the event list with a header
    pub fn format_event_list(title: &str, cards: &[(Event, Option<JoinAffordance>)]) -> String {
        let mut output = format!("\n{}\n{}\n", RULE, title);

        if cards.is_empty() {
            output.push_str("(No events)\n");
        } else {
            for (event, affordance) in cards {
                output.push_str(&Self::format_event_card(event, *affordance));
            }
        }

        output.push_str(RULE);
        output.push('\n');
        output
    }

    /// Format the detail view of an event, marking the current user
    ///
    /// # Arguments
    ///
    /// * `event` - The event to show
    /// * `affordance` - State of the join button
    /// * `current_user` - The logged-in user (to mark as "me")
    pub fn format_event_detail(
        event: &Event,
        affordance: Option<JoinAffordance>,
        current_user: Option<UserId>,
    ) -> String {
        let mut output = format!("\n{}\n", THIN_RULE);
        output.push_str(&Self::format_event_card(event, affordance));
        output.push_str(&format!(
            "    🗺  {:.5}, {:.5}\n",
            event.latitude, event.longitude
        ));
        output.push_str("Participants:\n");

        if event.participants.is_empty() {
            output.push_str("(No participants)\n");
        } else {
            for participant in &event.participants {
                let mut suffixes = Vec::new();
                if Some(participant.user_id) == current_user {
                    suffixes.push("me");
                }
                if event.is_owned_by(participant.user_id) {
                    suffixes.push("owner");
                }
                let suffix = if suffixes.is_empty() {
                    String::new()
                } else {
                    format!(" ({})", suffixes.join(", "))
                };
                output.push_str(&format!("  - user {}{}\n", participant.user_id, suffix));
            }
        }

        output.push_str(THIN_RULE);
        output.push('\n');
        output
    }

    /// Format the join button. Disabled buttons are shown in parentheses.
    pub fn format_button(affordance: JoinAffordance) -> String {
        if affordance.enabled {
            format!("[{}]", affordance.label())
        } else {
            format!("({})", affordance.label())
        }
    }

    pub fn format_profile(profile: &Profile) -> String {
        let sports = if profile.sport_preference.is_empty() {
            "-".to_string()
        } else {
            profile
                .sport_preference
                .iter()
                .cloned()
                .collect::<Vec<_>>()
                .join(", ")
        };
        format!(
            "\n{} {}\n  Age: {}\n  Gender: {}\n  Sports: {}\n",
            profile.first_name, profile.last_name, profile.age, profile.gender, sports
        )
    }

    pub fn format_help() -> String {
        let commands = [
            ("signup <email> <password>", "Create an account"),
            ("login <email> <password>", "Log in"),
            ("logout", "Log out"),
            ("home | events", "Show all events"),
            ("show <id>", "Show event details"),
            ("join <id>", "Join an event"),
            ("leave <id>", "Leave an event"),
            ("joined", "Events you joined"),
            ("created", "Events you created"),
            ("profile", "Show your profile"),
            ("create-profile <first>|<last>|<age>|<gender>|<sports>", "Create your profile"),
            ("update-profile <fields as create-profile>", "Update your profile"),
            ("create-event <title>|<sport>|<location>|<lat>|<lng>|<datetime>|<max>", "Create an event"),
            ("update-event <id> <fields as create-event>", "Update an event"),
            ("delete-event <id>", "Delete an event"),
            ("help", "Show this help"),
            ("quit", "Exit"),
        ];

        let mut output = String::from("\nCommands:\n");
        for (usage, description) in commands {
            output.push_str(&format!("  {:<72} {}\n", usage, description));
        }
        output
    }

    pub fn format_error(message: &str) -> String {
        format!("✗ {}\n", message)
    }

    pub fn format_success(message: &str) -> String {
        format!("✓ {}\n", message)
    }
}
