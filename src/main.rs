// src/main.rs
use std::time::Duration;

use iced::widget::{button, column, container, row, text, Space};
use iced::{
    executor, window, Application, Command, Element, Length, Settings, Subscription, Theme,
};
use log::error;

mod config;
mod data_types;
mod import;
mod screens;
mod store;
mod ui;
mod workspace;

use config::BackendConfig;
use screens::{
    dashboard, groups, guests, messages, onboarding, settings, signin, wedding, Screen,
};
use store::{Session, Store};
use ui::{Styles, DARK_THEME, LIGHT_THEME};
use workspace::Workspace;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const REFRESH_INTERVAL: Duration = Duration::from_secs(60);

pub fn main() -> iced::Result {
    env_logger::init();

    Knotline::run(Settings {
        window: window::Settings {
            size: (1200, 800),
            min_size: Some((960, 640)),
            resizable: true,
            ..Default::default()
        },
        ..Settings::default()
    })
}

struct Knotline {
    styles: Styles,
    is_dark_mode: bool,
    store: Store,
    session: Option<Session>,
    workspace: Option<Workspace>,
    loading_workspace: bool,
    shell_error: Option<String>,
    screen: Screen,
    signin: signin::State,
    onboarding: onboarding::State,
    dashboard: dashboard::State,
    guests: guests::State,
    groups: groups::State,
    messages: messages::State,
    wedding: wedding::State,
    settings: settings::State,
}

#[derive(Debug, Clone)]
enum Message {
    ToggleTheme,
    Navigate(Screen),
    RefreshTick,
    WorkspaceLoaded(Result<Option<Workspace>, String>),
    SignIn(signin::Event),
    Onboarding(onboarding::Event),
    Dashboard(dashboard::Event),
    Guests(guests::Event),
    Groups(groups::Event),
    Messages(messages::Event),
    Wedding(wedding::Event),
    Settings(settings::Event),
}

impl Application for Knotline {
    type Executor = executor::Default;
    type Message = Message;
    type Theme = Theme;
    type Flags = ();

    fn new(_flags: ()) -> (Self, Command<Message>) {
        let store = Store::new(&BackendConfig::from_env());
        (
            Knotline {
                styles: *LIGHT_THEME,
                is_dark_mode: false,
                store,
                session: None,
                workspace: None,
                loading_workspace: false,
                shell_error: None,
                screen: Screen::Dashboard,
                signin: signin::State::default(),
                onboarding: onboarding::State::default(),
                dashboard: dashboard::State::default(),
                guests: guests::State::default(),
                groups: groups::State::default(),
                messages: messages::State::default(),
                wedding: wedding::State::default(),
                settings: settings::State::default(),
            },
            Command::none(),
        )
    }

    fn title(&self) -> String {
        format!("Knotline v{VERSION}")
    }

    fn update(&mut self, message: Message) -> Command<Message> {
        match message {
            Message::ToggleTheme => {
                self.is_dark_mode = !self.is_dark_mode;
                self.styles = if self.is_dark_mode {
                    *DARK_THEME
                } else {
                    *LIGHT_THEME
                };
                Command::none()
            }

            Message::Navigate(screen) => {
                self.screen = screen;
                self.load_screen(screen)
            }

            Message::RefreshTick => self.load_screen(self.screen),

            Message::SignIn(event) => {
                if let signin::Event::Finished(Ok(session)) = &event {
                    self.session = Some(session.clone());
                    self.loading_workspace = true;
                    self.shell_error = None;
                    let store = self.store.clone();
                    let session = session.clone();
                    let load = Command::perform(
                        async move {
                            workspace::load(&store, &session)
                                .await
                                .map_err(|e| e.to_string())
                        },
                        Message::WorkspaceLoaded,
                    );
                    let forward = self.signin.update(event, &self.store).map(Message::SignIn);
                    return Command::batch(vec![load, forward]);
                }
                self.signin.update(event, &self.store).map(Message::SignIn)
            }

            Message::WorkspaceLoaded(result) => {
                self.loading_workspace = false;
                match result {
                    Ok(Some(workspace)) => {
                        self.workspace = Some(workspace);
                        self.screen = Screen::Dashboard;
                        self.load_screen(Screen::Dashboard)
                    }
                    // No wedding yet: the onboarding flow takes over and
                    // provisions the workspace deliberately.
                    Ok(None) => Command::none(),
                    Err(message) => {
                        error!("failed to load workspace: {message}");
                        self.shell_error = Some(message);
                        Command::none()
                    }
                }
            }

            Message::Onboarding(event) => {
                let Some(session) = self.session.clone() else {
                    return Command::none();
                };
                if let onboarding::Event::Finished(Ok(workspace)) = &event {
                    self.workspace = Some(workspace.clone());
                    self.screen = Screen::Dashboard;
                    let load = self.load_screen(Screen::Dashboard);
                    let forward = self
                        .onboarding
                        .update(event, &self.store, &session)
                        .map(Message::Onboarding);
                    return Command::batch(vec![load, forward]);
                }
                self.onboarding
                    .update(event, &self.store, &session)
                    .map(Message::Onboarding)
            }

            Message::Dashboard(dashboard::Event::Open(screen)) => {
                self.screen = screen;
                self.load_screen(screen)
            }

            Message::Dashboard(event) => {
                let (Some(session), Some(workspace)) = (&self.session, &self.workspace) else {
                    return Command::none();
                };
                self.dashboard
                    .update(event, &self.store, session, workspace)
                    .map(Message::Dashboard)
            }

            Message::Guests(event) => {
                let (Some(session), Some(workspace)) = (&self.session, &self.workspace) else {
                    return Command::none();
                };
                self.guests
                    .update(event, &self.store, session, workspace)
                    .map(Message::Guests)
            }

            Message::Groups(event) => {
                let (Some(session), Some(workspace)) = (&self.session, &self.workspace) else {
                    return Command::none();
                };
                self.groups
                    .update(event, &self.store, session, workspace)
                    .map(Message::Groups)
            }

            Message::Messages(event) => {
                let (Some(session), Some(workspace)) = (&self.session, &self.workspace) else {
                    return Command::none();
                };
                self.messages
                    .update(event, &self.store, session, workspace)
                    .map(Message::Messages)
            }

            Message::Wedding(event) => {
                if let wedding::Event::Saved(Ok(updated)) = &event {
                    if let Some(workspace) = &mut self.workspace {
                        workspace.wedding = updated.clone();
                    }
                }
                let (Some(session), Some(workspace)) = (&self.session, &self.workspace) else {
                    return Command::none();
                };
                self.wedding
                    .update(event, &self.store, session, workspace)
                    .map(Message::Wedding)
            }

            Message::Settings(settings::Event::SignOut) => {
                self.session = None;
                self.workspace = None;
                self.screen = Screen::Dashboard;
                self.signin = signin::State::default();
                self.onboarding = onboarding::State::default();
                self.dashboard = dashboard::State::default();
                self.guests = guests::State::default();
                self.groups = groups::State::default();
                self.messages = messages::State::default();
                self.wedding = wedding::State::default();
                self.settings = settings::State::default();
                Command::none()
            }

            Message::Settings(event) => {
                if let settings::Event::ProfileLoaded(Ok(user)) = &event {
                    if let Some(session) = &mut self.session {
                        session.user = user.clone();
                    }
                }
                let Some(session) = &self.session else {
                    return Command::none();
                };
                self.settings
                    .update(event, &self.store, session)
                    .map(Message::Settings)
            }
        }
    }

    fn subscription(&self) -> Subscription<Message> {
        // Re-fetch the active screen's data while the shell is open, so
        // backend-side changes (RSVP counts, replies) eventually show up.
        if self.session.is_some() && self.workspace.is_some() {
            iced::time::every(REFRESH_INTERVAL).map(|_| Message::RefreshTick)
        } else {
            Subscription::none()
        }
    }

    fn view(&self) -> Element<'_, Message> {
        let styles = &self.styles;

        let Some(session) = &self.session else {
            return self.signin.view(styles).map(Message::SignIn);
        };

        let Some(workspace) = &self.workspace else {
            if self.loading_workspace {
                return container(
                    text("Loading your workspace...")
                        .size(20)
                        .style(iced::theme::Text::Color(styles.muted)),
                )
                .width(Length::Fill)
                .height(Length::Fill)
                .center_x()
                .center_y()
                .style(ui::panel(styles.bg))
                .into();
            }
            if let Some(message) = &self.shell_error {
                return container(ui::error_text(styles, message))
                    .width(Length::Fill)
                    .height(Length::Fill)
                    .center_x()
                    .center_y()
                    .style(ui::panel(styles.bg))
                    .into();
            }
            return self.onboarding.view(styles).map(Message::Onboarding);
        };

        let content: Element<'_, Message> = match self.screen {
            Screen::Dashboard => self
                .dashboard
                .view(styles, workspace)
                .map(Message::Dashboard),
            Screen::Guests => self.guests.view(styles).map(Message::Guests),
            Screen::Groups => self.groups.view(styles).map(Message::Groups),
            Screen::Messages => self.messages.view(styles, workspace).map(Message::Messages),
            Screen::Wedding => self.wedding.view(styles).map(Message::Wedding),
            Screen::Settings => self
                .settings
                .view(styles, &session.user)
                .map(Message::Settings),
        };

        let shell = row![
            self.sidebar(styles, workspace),
            container(content)
                .width(Length::Fill)
                .height(Length::Fill)
                .style(ui::panel(styles.bg)),
        ];

        container(shell)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }
}

impl Knotline {
    fn load_screen(&mut self, screen: Screen) -> Command<Message> {
        let (Some(session), Some(workspace)) = (&self.session, &self.workspace) else {
            return Command::none();
        };
        let session = session.clone();
        let workspace = workspace.clone();
        match screen {
            Screen::Dashboard => self
                .dashboard
                .update(dashboard::Event::Load, &self.store, &session, &workspace)
                .map(Message::Dashboard),
            Screen::Guests => self
                .guests
                .update(guests::Event::Load, &self.store, &session, &workspace)
                .map(Message::Guests),
            Screen::Groups => self
                .groups
                .update(groups::Event::Load, &self.store, &session, &workspace)
                .map(Message::Groups),
            Screen::Messages => self
                .messages
                .update(messages::Event::Load, &self.store, &session, &workspace)
                .map(Message::Messages),
            Screen::Wedding => self
                .wedding
                .update(wedding::Event::Load, &self.store, &session, &workspace)
                .map(Message::Wedding),
            Screen::Settings => self
                .settings
                .update(settings::Event::Load, &self.store, &session)
                .map(Message::Settings),
        }
    }

    fn sidebar<'a>(&'a self, styles: &Styles, workspace: &'a Workspace) -> Element<'a, Message> {
        let mut nav = column![
            text("Knotline")
                .size(24)
                .style(iced::theme::Text::Color(styles.accent)),
            text(&workspace.wedding.title)
                .size(14)
                .style(iced::theme::Text::Color(styles.sidebar_fg)),
            Space::with_height(Length::Fixed(16.0)),
        ]
        .spacing(6);

        for screen in Screen::ALL {
            nav = nav.push(
                button(text(screen.label()).size(15))
                    .padding([8, 12])
                    .width(Length::Fill)
                    .style(ui::sidebar_button(styles, screen == self.screen))
                    .on_press(Message::Navigate(screen)),
            );
        }

        nav = nav.push(Space::with_height(Length::Fill));
        nav = nav.push(
            button(
                text(if self.is_dark_mode {
                    "Light mode"
                } else {
                    "Dark mode"
                })
                .size(13),
            )
            .padding([6, 12])
            .width(Length::Fill)
            .style(ui::sidebar_button(styles, false))
            .on_press(Message::ToggleTheme),
        );
        nav = nav.push(
            text(format!("v{VERSION}"))
                .size(12)
                .style(iced::theme::Text::Color(styles.sidebar_fg)),
        );

        container(nav)
            .padding(16)
            .width(Length::Fixed(220.0))
            .height(Length::Fill)
            .style(ui::panel(styles.sidebar_bg))
            .into()
    }
}
