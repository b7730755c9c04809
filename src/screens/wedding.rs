// src/screens/wedding.rs
use iced::widget::{button, column, container, row, scrollable, text, text_input};
use iced::{alignment, Command, Element, Length};
use serde_json::json;

use crate::data_types::{now_iso, Wedding};
use crate::store::{Session, Store};
use crate::ui::{self, Styles};
use crate::workspace::Workspace;

#[derive(Debug, Default)]
pub struct State {
    title: String,
    partner_one: String,
    partner_two: String,
    wedding_date: String,
    venue: String,
    description: String,
    saving: bool,
    saved: bool,
    error: Option<String>,
}

#[derive(Debug, Clone)]
pub enum Event {
    /// Fill the form from the workspace copy of the wedding.
    Load,
    TitleChanged(String),
    PartnerOneChanged(String),
    PartnerTwoChanged(String),
    DateChanged(String),
    VenueChanged(String),
    DescriptionChanged(String),
    Save,
    /// Carries the updated record so the shell can refresh its workspace.
    Saved(Result<Wedding, String>),
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
                let wedding = &workspace.wedding;
                self.title = wedding.title.clone();
                self.partner_one = wedding.partner_one.clone();
                self.partner_two = wedding.partner_two.clone();
                self.wedding_date = wedding.wedding_date.clone().unwrap_or_default();
                self.venue = wedding.venue.clone().unwrap_or_default();
                self.description = wedding.description.clone().unwrap_or_default();
                self.saved = false;
                self.error = None;
                Command::none()
            }
            Event::TitleChanged(value) => {
                self.title = value;
                self.saved = false;
                Command::none()
            }
            Event::PartnerOneChanged(value) => {
                self.partner_one = value;
                self.saved = false;
                Command::none()
            }
            Event::PartnerTwoChanged(value) => {
                self.partner_two = value;
                self.saved = false;
                Command::none()
            }
            Event::DateChanged(value) => {
                self.wedding_date = value;
                self.saved = false;
                Command::none()
            }
            Event::VenueChanged(value) => {
                self.venue = value;
                self.saved = false;
                Command::none()
            }
            Event::DescriptionChanged(value) => {
                self.description = value;
                self.saved = false;
                Command::none()
            }
            Event::Save => {
                if self.saving || self.title.trim().is_empty() {
                    return Command::none();
                }
                self.saving = true;
                self.error = None;

                let mut updated = workspace.wedding.clone();
                updated.title = self.title.trim().to_string();
                updated.partner_one = self.partner_one.trim().to_string();
                updated.partner_two = self.partner_two.trim().to_string();
                updated.wedding_date = non_blank(&self.wedding_date);
                updated.venue = non_blank(&self.venue);
                updated.description = non_blank(&self.description);
                updated.updated_at = Some(now_iso());

                let patch = json!({
                    "title": updated.title,
                    "partnerOne": updated.partner_one,
                    "partnerTwo": updated.partner_two,
                    "weddingDate": updated.wedding_date,
                    "venue": updated.venue,
                    "description": updated.description,
                    "updatedAt": updated.updated_at,
                });
                let store = store.clone();
                let session = session.clone();
                Command::perform(
                    async move {
                        store
                            .update::<Wedding>(&session, &updated.id, patch)
                            .await
                            .map(|()| updated)
                            .map_err(|e| e.to_string())
                    },
                    Event::Saved,
                )
            }
            Event::Saved(result) => {
                self.saving = false;
                match result {
                    Ok(_) => self.saved = true,
                    Err(message) => self.error = Some(message),
                }
                Command::none()
            }
        }
    }

    pub fn view(&self, styles: &Styles) -> Element<'_, Event> {
        let mut save = button(
            text(if self.saving { "Saving..." } else { "Save Changes" })
                .size(16)
                .horizontal_alignment(alignment::Horizontal::Center),
        )
        .padding(10)
        .style(ui::primary_button(styles));
        if !self.saving && !self.title.trim().is_empty() {
            save = save.on_press(Event::Save);
        }

        let mut form = column![
            ui::heading(styles, "Wedding Details"),
            ui::subheading(styles, "The basics every screen and message draws from"),
            ui::muted(styles, "Title"),
            text_input("e.g. Jane & Alex", &self.title)
                .on_input(Event::TitleChanged)
                .padding(10),
            row![
                column![
                    ui::muted(styles, "Partner"),
                    text_input("", &self.partner_one)
                        .on_input(Event::PartnerOneChanged)
                        .padding(10),
                ]
                .spacing(4)
                .width(Length::Fill),
                column![
                    ui::muted(styles, "Partner"),
                    text_input("", &self.partner_two)
                        .on_input(Event::PartnerTwoChanged)
                        .padding(10),
                ]
                .spacing(4)
                .width(Length::Fill),
            ]
            .spacing(12),
            row![
                column![
                    ui::muted(styles, "Wedding date"),
                    text_input("YYYY-MM-DD", &self.wedding_date)
                        .on_input(Event::DateChanged)
                        .padding(10),
                ]
                .spacing(4)
                .width(Length::Fill),
                column![
                    ui::muted(styles, "Venue"),
                    text_input("", &self.venue)
                        .on_input(Event::VenueChanged)
                        .padding(10),
                ]
                .spacing(4)
                .width(Length::Fill),
            ]
            .spacing(12),
            ui::muted(styles, "Description"),
            text_input("A note for yourselves", &self.description)
                .on_input(Event::DescriptionChanged)
                .padding(10),
        ]
        .spacing(10);

        if let Some(error) = &self.error {
            form = form.push(ui::error_text(styles, error));
        }
        if self.saved {
            form = form.push(
                text("Saved.")
                    .size(14)
                    .style(iced::theme::Text::Color(styles.ok)),
            );
        }
        form = form.push(row![iced::widget::Space::with_width(Length::Fill), save]);

        scrollable(
            container(
                container(form)
                    .padding(24)
                    .width(Length::Fixed(640.0))
                    .style(ui::card(styles)),
            )
            .padding(24)
            .width(Length::Fill)
            .center_x(),
        )
        .height(Length::Fill)
        .into()
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
