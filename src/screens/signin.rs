// src/screens/signin.rs
use iced::widget::{button, column, container, text, text_input};
use iced::{alignment, Command, Element, Length};

use crate::store::{Session, Store};
use crate::ui::{self, Styles};

#[derive(Debug, Default)]
pub struct State {
    email: String,
    password: String,
    busy: bool,
    error: Option<String>,
}

#[derive(Debug, Clone)]
pub enum Event {
    EmailChanged(String),
    PasswordChanged(String),
    Submit,
    Finished(Result<Session, String>),
}

impl State {
    pub fn update(&mut self, event: Event, store: &Store) -> Command<Event> {
        match event {
            Event::EmailChanged(email) => {
                self.email = email;
                Command::none()
            }
            Event::PasswordChanged(password) => {
                self.password = password;
                Command::none()
            }
            Event::Submit => {
                if self.email.trim().is_empty() || self.password.is_empty() || self.busy {
                    return Command::none();
                }
                self.busy = true;
                self.error = None;
                let store = store.clone();
                let email = self.email.trim().to_string();
                let password = self.password.clone();
                Command::perform(
                    async move {
                        store
                            .login(&email, &password)
                            .await
                            .map_err(|e| e.to_string())
                    },
                    Event::Finished,
                )
            }
            Event::Finished(result) => {
                self.busy = false;
                if let Err(message) = result {
                    self.error = Some(message);
                }
                // The successful session is picked up by the app shell.
                Command::none()
            }
        }
    }

    pub fn view(&self, styles: &Styles) -> Element<'_, Event> {
        let mut form = column![
            text("Knotline")
                .size(34)
                .style(iced::theme::Text::Color(styles.accent)),
            ui::subheading(styles, "Plan your wedding, one message at a time"),
            text_input("Email", &self.email)
                .on_input(Event::EmailChanged)
                .padding(10),
            text_input("Password", &self.password)
                .on_input(Event::PasswordChanged)
                .on_submit(Event::Submit)
                .password()
                .padding(10),
        ]
        .spacing(14)
        .width(Length::Fixed(360.0));

        if let Some(error) = &self.error {
            form = form.push(ui::error_text(styles, error));
        }

        let submit_label = if self.busy { "Signing in..." } else { "Sign In" };
        let mut submit = button(
            text(submit_label)
                .size(16)
                .horizontal_alignment(alignment::Horizontal::Center),
        )
        .padding(10)
        .width(Length::Fill)
        .style(ui::primary_button(styles));
        if !self.busy {
            submit = submit.on_press(Event::Submit);
        }
        form = form.push(submit);

        container(container(form).padding(32).style(ui::card(styles)))
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x()
            .center_y()
            .style(ui::panel(styles.bg))
            .into()
    }
}
