// src/screens/dashboard.rs
use iced::widget::{button, column, container, row, scrollable, text};
use iced::{Command, Element, Length};

use crate::data_types::MessageStatus;
use crate::screens::Screen;
use crate::store::{Session, Store};
use crate::ui::{self, Styles};
use crate::workspace::{self, DashboardStats, Workspace};

#[derive(Debug, Default)]
pub struct State {
    stats: DashboardStats,
    loading: bool,
    error: Option<String>,
}

#[derive(Debug, Clone)]
pub enum Event {
    Load,
    Loaded(Result<DashboardStats, String>),
    /// Quick links into other tabs; handled by the app shell.
    Open(Screen),
}

impl State {
    pub fn update(
        &mut self,
        event: Event,
        store: &Store,
        session: &Session,
        workspace: &Workspace,
    ) -> Command<Event> {
        match event {
            Event::Load => {
                self.loading = true;
                let store = store.clone();
                let session = session.clone();
                let workspace = workspace.clone();
                Command::perform(
                    async move {
                        workspace::load_dashboard(&store, &session, &workspace)
                            .await
                            .map_err(|e| e.to_string())
                    },
                    Event::Loaded,
                )
            }
            Event::Loaded(result) => {
                self.loading = false;
                match result {
                    Ok(stats) => {
                        self.stats = stats;
                        self.error = None;
                    }
                    Err(message) => self.error = Some(message),
                }
                Command::none()
            }
            Event::Open(_) => Command::none(),
        }
    }

    pub fn view<'a>(&'a self, styles: &Styles, workspace: &'a Workspace) -> Element<'a, Event> {
        let wedding = &workspace.wedding;
        let when = wedding.wedding_date.as_deref().unwrap_or("date TBD");
        let venue = wedding.venue.as_deref().unwrap_or("venue TBD");

        let header = column![
            ui::heading(styles, &wedding.title),
            ui::subheading(styles, format!("{when} · {venue}")),
        ]
        .spacing(4);

        let stats = row![
            ui::stat_card(styles, self.stats.total_guests.to_string(), "Guests"),
            ui::stat_card(styles, self.stats.total_messages.to_string(), "Messages"),
            ui::stat_card(
                styles,
                self.stats.scheduled_messages.to_string(),
                "Scheduled"
            ),
            ui::stat_card(styles, format!("{}%", self.stats.reply_rate), "Reply rate"),
        ]
        .spacing(16);

        let quick_links = row![
            button(text("Add guests").size(14))
                .padding([8, 14])
                .style(ui::primary_button(styles))
                .on_press(Event::Open(Screen::Guests)),
            button(text("Compose a message").size(14))
                .padding([8, 14])
                .style(ui::subtle_button(styles))
                .on_press(Event::Open(Screen::Messages)),
        ]
        .spacing(12);

        let mut recent = column![ui::body(styles, "Recent messages")].spacing(8);
        if self.stats.recent_messages.is_empty() {
            recent = recent.push(ui::muted(
                styles,
                "Nothing yet. Your five most recent messages will show up here.",
            ));
        }
        for message in &self.stats.recent_messages {
            let status = message.status;
            let status_color = match status {
                MessageStatus::Sent => styles.ok,
                MessageStatus::Failed => styles.danger,
                _ => styles.muted,
            };
            recent = recent.push(
                container(
                    row![
                        ui::body(styles, &message.content),
                        iced::widget::Space::with_width(Length::Fill),
                        text(status.label())
                            .size(13)
                            .style(iced::theme::Text::Color(status_color)),
                    ]
                    .spacing(8),
                )
                .padding(12)
                .width(Length::Fill)
                .style(ui::card(styles)),
            );
        }

        let mut page = column![header, stats, quick_links, recent].spacing(20);
        if let Some(error) = &self.error {
            page = page.push(ui::error_text(styles, error));
        }
        if self.loading {
            page = page.push(ui::muted(styles, "Refreshing..."));
        }

        scrollable(container(page).padding(24).width(Length::Fill))
            .height(Length::Fill)
            .into()
    }
}
