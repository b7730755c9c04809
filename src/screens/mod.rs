// src/screens/mod.rs
pub mod dashboard;
pub mod groups;
pub mod guests;
pub mod import_dialog;
pub mod messages;
pub mod onboarding;
pub mod settings;
pub mod signin;
pub mod wedding;

/// Navigation tabs of the signed-in shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Dashboard,
    Guests,
    Groups,
    Messages,
    Wedding,
    Settings,
}

impl Screen {
    pub const ALL: [Screen; 6] = [
        Screen::Dashboard,
        Screen::Guests,
        Screen::Groups,
        Screen::Messages,
        Screen::Wedding,
        Screen::Settings,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Screen::Dashboard => "Dashboard",
            Screen::Guests => "Guests",
            Screen::Groups => "Groups",
            Screen::Messages => "Messages",
            Screen::Wedding => "Wedding Details",
            Screen::Settings => "Settings",
        }
    }
}
