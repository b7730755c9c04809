// src/screens/settings.rs
use iced::widget::{button, checkbox, column, container, row, scrollable, text, text_input};
use iced::{alignment, Command, Element, Length};
use serde_json::json;

use crate::data_types::{now_iso, record_id, AccountSettings, User};
use crate::store::{ListQuery, Session, Store};
use crate::ui::{self, Styles};

#[derive(Debug, Default)]
pub struct State {
    settings: AccountSettings,
    loading: bool,
    saving: bool,
    saved: bool,
    error: Option<String>,
}

#[derive(Debug, Clone)]
pub enum Event {
    Load,
    Loaded(Result<Vec<AccountSettings>, String>),
    /// Fresh profile from the identity endpoint; the shell folds it back
    /// into the session.
    ProfileLoaded(Result<User, String>),
    SidChanged(String),
    TokenChanged(String),
    PhoneChanged(String),
    NotifyReplyToggled(bool),
    NotifyRsvpToggled(bool),
    DailyDigestToggled(bool),
    Save,
    Saved(Result<(), String>),
    /// Handled by the app shell.
    SignOut,
}

impl State {
    pub fn update(&mut self, event: Event, store: &Store, session: &Session) -> Command<Event> {
        match event {
            Event::Load => {
                self.loading = true;
                let fetch_settings = {
                    let store = store.clone();
                    let session = session.clone();
                    Command::perform(
                        async move {
                            store
                                .list::<AccountSettings>(
                                    &session,
                                    ListQuery::owned_by(&session).limit(1),
                                )
                                .await
                                .map_err(|e| e.to_string())
                        },
                        Event::Loaded,
                    )
                };
                let fetch_profile = {
                    let store = store.clone();
                    let session = session.clone();
                    Command::perform(
                        async move { store.me(&session).await.map_err(|e| e.to_string()) },
                        Event::ProfileLoaded,
                    )
                };
                Command::batch(vec![fetch_settings, fetch_profile])
            }
            Event::ProfileLoaded(_) => Command::none(),
            Event::Loaded(result) => {
                self.loading = false;
                match result {
                    Ok(list) => {
                        self.settings = list.into_iter().next().unwrap_or_default();
                        self.error = None;
                    }
                    Err(message) => self.error = Some(message),
                }
                Command::none()
            }
            Event::SidChanged(value) => {
                self.settings.twilio_account_sid = value;
                self.saved = false;
                Command::none()
            }
            Event::TokenChanged(value) => {
                self.settings.twilio_auth_token = value;
                self.saved = false;
                Command::none()
            }
            Event::PhoneChanged(value) => {
                self.settings.twilio_phone_number = value;
                self.saved = false;
                Command::none()
            }
            Event::NotifyReplyToggled(value) => {
                self.settings.notify_on_reply = value;
                self.saved = false;
                Command::none()
            }
            Event::NotifyRsvpToggled(value) => {
                self.settings.notify_on_rsvp = value;
                self.saved = false;
                Command::none()
            }
            Event::DailyDigestToggled(value) => {
                self.settings.daily_digest = value;
                self.saved = false;
                Command::none()
            }
            Event::Save => {
                if self.saving {
                    return Command::none();
                }
                self.saving = true;
                self.error = None;
                self.settings.updated_at = Some(now_iso());

                let store = store.clone();
                let session = session.clone();
                // First save creates the record; later saves patch it.
                if self.settings.id.is_empty() {
                    self.settings.id = record_id("settings");
                    self.settings.user_id = session.user_id().to_string();
                    let record = self.settings.clone();
                    Command::perform(
                        async move {
                            store
                                .create(&session, &record)
                                .await
                                .map_err(|e| e.to_string())
                        },
                        Event::Saved,
                    )
                } else {
                    let record = self.settings.clone();
                    let patch = json!({
                        "twilioAccountSid": record.twilio_account_sid,
                        "twilioAuthToken": record.twilio_auth_token,
                        "twilioPhoneNumber": record.twilio_phone_number,
                        "notifyOnReply": record.notify_on_reply,
                        "notifyOnRsvp": record.notify_on_rsvp,
                        "dailyDigest": record.daily_digest,
                        "updatedAt": record.updated_at,
                    });
                    Command::perform(
                        async move {
                            store
                                .update::<AccountSettings>(&session, &record.id, patch)
                                .await
                                .map_err(|e| e.to_string())
                        },
                        Event::Saved,
                    )
                }
            }
            Event::Saved(result) => {
                self.saving = false;
                match result {
                    Ok(()) => self.saved = true,
                    Err(message) => self.error = Some(message),
                }
                Command::none()
            }
            Event::SignOut => Command::none(),
        }
    }

    pub fn view<'a>(&'a self, styles: &Styles, user: &'a User) -> Element<'a, Event> {
        let account = container(
            column![
                ui::body(styles, "Account"),
                ui::muted(styles, format!("Signed in as {}", user.email)),
                row![
                    iced::widget::Space::with_width(Length::Fill),
                    button(text("Sign Out").size(14))
                        .padding([8, 14])
                        .style(ui::danger_button(styles))
                        .on_press(Event::SignOut),
                ],
            ]
            .spacing(8),
        )
        .padding(16)
        .width(Length::Fill)
        .style(ui::card(styles));

        // Stored only; nothing in the app dispatches SMS.
        let twilio = container(
            column![
                ui::body(styles, "Twilio Configuration"),
                ui::muted(
                    styles,
                    "Connect your Twilio account to enable SMS messaging functionality",
                ),
                ui::muted(styles, "Account SID"),
                text_input("Enter your Twilio Account SID", &self.settings.twilio_account_sid)
                    .on_input(Event::SidChanged)
                    .padding(10),
                ui::muted(styles, "Auth Token"),
                text_input("Enter your Twilio Auth Token", &self.settings.twilio_auth_token)
                    .on_input(Event::TokenChanged)
                    .password()
                    .padding(10),
                ui::muted(styles, "Phone Number"),
                text_input("Your Twilio phone number", &self.settings.twilio_phone_number)
                    .on_input(Event::PhoneChanged)
                    .padding(10),
            ]
            .spacing(8),
        )
        .padding(16)
        .width(Length::Fill)
        .style(ui::card(styles));

        let notifications = container(
            column![
                ui::body(styles, "Notifications"),
                checkbox(
                    "Notify me when a guest replies",
                    self.settings.notify_on_reply,
                    Event::NotifyReplyToggled
                ),
                checkbox(
                    "Notify me on RSVP changes",
                    self.settings.notify_on_rsvp,
                    Event::NotifyRsvpToggled
                ),
                checkbox(
                    "Send me a daily digest",
                    self.settings.daily_digest,
                    Event::DailyDigestToggled
                ),
            ]
            .spacing(8),
        )
        .padding(16)
        .width(Length::Fill)
        .style(ui::card(styles));

        let mut save = button(
            text(if self.saving { "Saving..." } else { "Save Settings" })
                .size(16)
                .horizontal_alignment(alignment::Horizontal::Center),
        )
        .padding(10)
        .style(ui::primary_button(styles));
        if !self.saving {
            save = save.on_press(Event::Save);
        }

        let mut page = column![
            ui::heading(styles, "Settings"),
            account,
            twilio,
            notifications,
        ]
        .spacing(16);

        if let Some(error) = &self.error {
            page = page.push(ui::error_text(styles, error));
        }
        if self.saved {
            page = page.push(
                text("Settings saved.")
                    .size(14)
                    .style(iced::theme::Text::Color(styles.ok)),
            );
        }
        if self.loading {
            page = page.push(ui::muted(styles, "Loading settings..."));
        }
        page = page.push(row![iced::widget::Space::with_width(Length::Fill), save]);

        scrollable(container(page).padding(24).width(Length::Fill))
            .height(Length::Fill)
            .into()
    }
}
