// src/screens/onboarding.rs
use iced::widget::{button, column, container, row, text, text_input};
use iced::{alignment, Command, Element, Length};

use crate::store::{Session, Store};
use crate::ui::{self, Styles};
use crate::workspace::{self, WeddingInput, Workspace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Welcome,
    Couple,
    Details,
}

#[derive(Debug)]
pub struct State {
    step: Step,
    partner_one: String,
    partner_two: String,
    wedding_date: String,
    venue: String,
    busy: bool,
    error: Option<String>,
}

impl Default for State {
    fn default() -> Self {
        State {
            step: Step::Welcome,
            partner_one: String::new(),
            partner_two: String::new(),
            wedding_date: String::new(),
            venue: String::new(),
            busy: false,
            error: None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Event {
    Next,
    Back,
    PartnerOneChanged(String),
    PartnerTwoChanged(String),
    DateChanged(String),
    VenueChanged(String),
    Finish,
    Finished(Result<Workspace, String>),
}

impl State {
    pub fn update(&mut self, event: Event, store: &Store, session: &Session) -> Command<Event> {
        match event {
            Event::Next => {
                self.step = match self.step {
                    Step::Welcome => Step::Couple,
                    Step::Couple | Step::Details => Step::Details,
                };
                Command::none()
            }
            Event::Back => {
                self.step = match self.step {
                    Step::Welcome | Step::Couple => Step::Welcome,
                    Step::Details => Step::Couple,
                };
                Command::none()
            }
            Event::PartnerOneChanged(value) => {
                self.partner_one = value;
                Command::none()
            }
            Event::PartnerTwoChanged(value) => {
                self.partner_two = value;
                Command::none()
            }
            Event::DateChanged(value) => {
                self.wedding_date = value;
                Command::none()
            }
            Event::VenueChanged(value) => {
                self.venue = value;
                Command::none()
            }
            Event::Finish => {
                if self.busy || !self.couple_complete() {
                    return Command::none();
                }
                self.busy = true;
                self.error = None;
                let input = WeddingInput {
                    partner_one: self.partner_one.trim().to_string(),
                    partner_two: self.partner_two.trim().to_string(),
                    wedding_date: non_blank(&self.wedding_date),
                    venue: non_blank(&self.venue),
                };
                let store = store.clone();
                let session = session.clone();
                Command::perform(
                    async move {
                        workspace::initialize(&store, &session, input)
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
                // The created workspace is picked up by the app shell.
                Command::none()
            }
        }
    }

    fn couple_complete(&self) -> bool {
        !self.partner_one.trim().is_empty() && !self.partner_two.trim().is_empty()
    }

    pub fn view(&self, styles: &Styles) -> Element<'_, Event> {
        let body: Element<'_, Event> = match self.step {
            Step::Welcome => self.welcome(styles),
            Step::Couple => self.couple(styles),
            Step::Details => self.details(styles),
        };

        container(
            container(column![self.progress(styles), body].spacing(24))
                .padding(32)
                .width(Length::Fixed(520.0))
                .style(ui::card(styles)),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x()
        .center_y()
        .style(ui::panel(styles.bg))
        .into()
    }

    fn progress(&self, styles: &Styles) -> Element<'_, Event> {
        let steps = [Step::Welcome, Step::Couple, Step::Details];
        let dots: Vec<Element<'_, Event>> = steps
            .iter()
            .map(|step| {
                let reached = *step as u8 <= self.step as u8;
                text("●")
                    .size(14)
                    .style(iced::theme::Text::Color(if reached {
                        styles.accent
                    } else {
                        styles.card_border
                    }))
                    .into()
            })
            .collect();
        row(dots).spacing(8).into()
    }

    fn welcome(&self, styles: &Styles) -> Element<'_, Event> {
        column![
            text("Congratulations on your engagement!")
                .size(24)
                .style(iced::theme::Text::Color(styles.fg)),
            ui::subheading(
                styles,
                "This quick setup creates your guest list workspace: \
                 guest management, groups, and message planning in one place.",
            ),
            button(
                text("Let's Get Started")
                    .size(16)
                    .horizontal_alignment(alignment::Horizontal::Center)
            )
            .padding(10)
            .width(Length::Fill)
            .style(ui::primary_button(styles))
            .on_press(Event::Next),
        ]
        .spacing(18)
        .into()
    }

    fn couple(&self, styles: &Styles) -> Element<'_, Event> {
        let mut next = button(
            text("Continue")
                .size(16)
                .horizontal_alignment(alignment::Horizontal::Center),
        )
        .padding(10)
        .width(Length::Fill)
        .style(ui::primary_button(styles));
        if self.couple_complete() {
            next = next.on_press(Event::Next);
        }

        column![
            text("Who's getting married?")
                .size(24)
                .style(iced::theme::Text::Color(styles.fg)),
            ui::muted(styles, "Partner"),
            text_input("e.g. Jane", &self.partner_one)
                .on_input(Event::PartnerOneChanged)
                .padding(10),
            ui::muted(styles, "Partner"),
            text_input("e.g. Alex", &self.partner_two)
                .on_input(Event::PartnerTwoChanged)
                .padding(10),
            row![
                button(text("Back").size(16))
                    .padding(10)
                    .style(ui::subtle_button(styles))
                    .on_press(Event::Back),
                next,
            ]
            .spacing(12),
        ]
        .spacing(12)
        .into()
    }

    fn details(&self, styles: &Styles) -> Element<'_, Event> {
        let mut finish = button(
            text(if self.busy {
                "Creating workspace..."
            } else {
                "Finish Setup"
            })
            .size(16)
            .horizontal_alignment(alignment::Horizontal::Center),
        )
        .padding(10)
        .width(Length::Fill)
        .style(ui::primary_button(styles));
        if !self.busy {
            finish = finish.on_press(Event::Finish);
        }

        let mut content = column![
            text("When and where?")
                .size(24)
                .style(iced::theme::Text::Color(styles.fg)),
            ui::subheading(styles, "Both are optional; you can fill them in later."),
            ui::muted(styles, "Wedding date"),
            text_input("YYYY-MM-DD", &self.wedding_date)
                .on_input(Event::DateChanged)
                .padding(10),
            ui::muted(styles, "Venue"),
            text_input("e.g. The Orchard House", &self.venue)
                .on_input(Event::VenueChanged)
                .padding(10),
        ]
        .spacing(12);

        if let Some(error) = &self.error {
            content = content.push(ui::error_text(styles, error));
        }

        content
            .push(
                row![
                    button(text("Back").size(16))
                        .padding(10)
                        .style(ui::subtle_button(styles))
                        .on_press(Event::Back),
                    finish,
                ]
                .spacing(12),
            )
            .into()
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
