// src/screens/guests.rs
use std::fmt;

use iced::widget::{button, column, container, pick_list, row, scrollable, text, text_input};
use iced::{alignment, Command, Element, Length};

use crate::data_types::{now_iso, record_id, Guest};
use crate::import;
use crate::screens::import_dialog;
use crate::store::{ListQuery, Session, Store};
use crate::ui::{self, Styles};
use crate::workspace::Workspace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmailFilter {
    #[default]
    All,
    WithEmail,
    WithoutEmail,
}

impl EmailFilter {
    pub const ALL: [EmailFilter; 3] = [
        EmailFilter::All,
        EmailFilter::WithEmail,
        EmailFilter::WithoutEmail,
    ];

    fn keeps(self, guest: &Guest) -> bool {
        match self {
            EmailFilter::All => true,
            EmailFilter::WithEmail => guest.email.is_some(),
            EmailFilter::WithoutEmail => guest.email.is_none(),
        }
    }
}

impl fmt::Display for EmailFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EmailFilter::All => "All Guests",
            EmailFilter::WithEmail => "With Email",
            EmailFilter::WithoutEmail => "Without Email",
        })
    }
}

#[derive(Debug, Default)]
struct AddForm {
    first_name: String,
    last_name: String,
    phone_number: String,
    email: String,
    notes: String,
    busy: bool,
    error: Option<String>,
}

impl AddForm {
    fn submittable(&self) -> bool {
        !self.first_name.trim().is_empty() && !self.phone_number.trim().is_empty() && !self.busy
    }
}

#[derive(Debug, Default)]
pub struct State {
    guests: Vec<Guest>,
    loading: bool,
    error: Option<String>,
    search: String,
    filter: EmailFilter,
    add_form: Option<AddForm>,
    import: Option<import_dialog::State>,
}

#[derive(Debug, Clone)]
pub enum Event {
    Load,
    Loaded(Result<Vec<Guest>, String>),
    SearchChanged(String),
    FilterChanged(EmailFilter),
    ShowAdd,
    CancelAdd,
    FirstNameChanged(String),
    LastNameChanged(String),
    PhoneChanged(String),
    EmailChanged(String),
    NotesChanged(String),
    SubmitAdd,
    Added(Result<(), String>),
    OpenImport,
    Import(import_dialog::Event),
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
                let wedding_id = workspace.wedding.id.clone();
                Command::perform(
                    async move {
                        store
                            .list::<Guest>(
                                &session,
                                ListQuery::owned_by(&session)
                                    .filter("weddingId", wedding_id.as_str())
                                    .order_desc("createdAt"),
                            )
                            .await
                            .map_err(|e| e.to_string())
                    },
                    Event::Loaded,
                )
            }
            Event::Loaded(result) => {
                self.loading = false;
                match result {
                    Ok(guests) => {
                        self.guests = guests;
                        self.error = None;
                    }
                    Err(message) => self.error = Some(message),
                }
                Command::none()
            }
            Event::SearchChanged(search) => {
                self.search = search;
                Command::none()
            }
            Event::FilterChanged(filter) => {
                self.filter = filter;
                Command::none()
            }
            Event::ShowAdd => {
                self.add_form = Some(AddForm::default());
                Command::none()
            }
            Event::CancelAdd => {
                self.add_form = None;
                Command::none()
            }
            Event::FirstNameChanged(value) => {
                if let Some(form) = &mut self.add_form {
                    form.first_name = value;
                }
                Command::none()
            }
            Event::LastNameChanged(value) => {
                if let Some(form) = &mut self.add_form {
                    form.last_name = value;
                }
                Command::none()
            }
            Event::PhoneChanged(value) => {
                if let Some(form) = &mut self.add_form {
                    form.phone_number = value;
                }
                Command::none()
            }
            Event::EmailChanged(value) => {
                if let Some(form) = &mut self.add_form {
                    form.email = value;
                }
                Command::none()
            }
            Event::NotesChanged(value) => {
                if let Some(form) = &mut self.add_form {
                    form.notes = value;
                }
                Command::none()
            }
            Event::SubmitAdd => {
                let Some(form) = &mut self.add_form else {
                    return Command::none();
                };
                if !form.submittable() {
                    return Command::none();
                }
                // Same field rules as the importer: phone must normalize,
                // email (if given) must look like an address.
                let Some(phone) = import::normalize_phone(&form.phone_number) else {
                    form.error = Some("Invalid phone number format".into());
                    return Command::none();
                };
                let email = form.email.trim().to_string();
                if !email.is_empty() && !import::is_valid_email(&email) {
                    form.error = Some("Invalid email format".into());
                    return Command::none();
                }
                form.busy = true;
                form.error = None;

                let guest = Guest {
                    id: record_id("guest"),
                    user_id: session.user_id().to_string(),
                    wedding_id: workspace.wedding.id.clone(),
                    first_name: form.first_name.trim().to_string(),
                    last_name: non_blank(&form.last_name),
                    phone_number: phone,
                    email: (!email.is_empty()).then_some(email),
                    group: None,
                    notes: non_blank(&form.notes),
                    created_at: now_iso(),
                };
                let store = store.clone();
                let session = session.clone();
                Command::perform(
                    async move {
                        store
                            .create(&session, &guest)
                            .await
                            .map_err(|e| e.to_string())
                    },
                    Event::Added,
                )
            }
            Event::Added(result) => {
                match result {
                    Ok(()) => {
                        self.add_form = None;
                        return self.update(Event::Load, store, session, workspace);
                    }
                    Err(message) => {
                        if let Some(form) = &mut self.add_form {
                            form.busy = false;
                            form.error = Some(message);
                        }
                    }
                }
                Command::none()
            }
            Event::OpenImport => {
                self.import = Some(import_dialog::State::default());
                Command::none()
            }
            Event::Import(import_dialog::Event::Close) => {
                let refresh = self
                    .import
                    .as_ref()
                    .map(import_dialog::State::finished)
                    .unwrap_or(false);
                self.import = None;
                if refresh {
                    return self.update(Event::Load, store, session, workspace);
                }
                Command::none()
            }
            Event::Import(event) => {
                let Some(dialog) = &mut self.import else {
                    return Command::none();
                };
                dialog
                    .update(event, store, session, workspace)
                    .map(Event::Import)
            }
        }
    }

    fn filtered(&self) -> Vec<&Guest> {
        let term = self.search.to_lowercase();
        self.guests
            .iter()
            .filter(|guest| self.filter.keeps(guest))
            .filter(|guest| {
                if term.is_empty() {
                    return true;
                }
                guest.first_name.to_lowercase().contains(&term)
                    || guest
                        .last_name
                        .as_deref()
                        .is_some_and(|last| last.to_lowercase().contains(&term))
                    || guest.phone_number.contains(&term)
                    || guest
                        .email
                        .as_deref()
                        .is_some_and(|email| email.to_lowercase().contains(&term))
            })
            .collect()
    }

    pub fn view(&self, styles: &Styles) -> Element<'_, Event> {
        if let Some(dialog) = &self.import {
            return dialog.view(styles).map(Event::Import);
        }
        if let Some(form) = &self.add_form {
            return self.add_modal(styles, form);
        }

        let header = row![
            column![
                ui::heading(styles, "Guests"),
                ui::subheading(styles, "Manage your guest list and contact information"),
            ]
            .spacing(4),
            iced::widget::Space::with_width(Length::Fill),
            button(text("Import Spreadsheet").size(14))
                .padding([8, 14])
                .style(ui::subtle_button(styles))
                .on_press(Event::OpenImport),
            button(text("Add Guest").size(14))
                .padding([8, 14])
                .style(ui::primary_button(styles))
                .on_press(Event::ShowAdd),
        ]
        .spacing(12);

        let controls = row![
            text_input("Search guests...", &self.search)
                .on_input(Event::SearchChanged)
                .padding(10)
                .width(Length::Fill),
            pick_list(EmailFilter::ALL.to_vec(), Some(self.filter), Event::FilterChanged).padding(8),
        ]
        .spacing(12);

        let with_email = self.guests.iter().filter(|g| g.email.is_some()).count();
        let stats = row![
            ui::stat_card(styles, self.guests.len().to_string(), "Total guests"),
            ui::stat_card(styles, with_email.to_string(), "With email"),
            ui::stat_card(
                styles,
                (self.guests.len() - with_email).to_string(),
                "Without email"
            ),
        ]
        .spacing(16);

        let mut list = column![].spacing(8);
        let filtered = self.filtered();
        if filtered.is_empty() && !self.loading {
            list = list.push(ui::muted(
                styles,
                "No guests match. Add guests one at a time or import a spreadsheet.",
            ));
        }
        for guest in filtered {
            let contact = match guest.email.as_deref() {
                Some(email) => format!("{} · {}", guest.phone_number, email),
                None => guest.phone_number.clone(),
            };
            list = list.push(
                container(
                    row![
                        column![ui::body(styles, guest.display_name()), ui::muted(styles, contact)]
                            .spacing(2),
                        iced::widget::Space::with_width(Length::Fill),
                        ui::muted(styles, guest.group.as_deref().unwrap_or("")),
                    ]
                    .spacing(8),
                )
                .padding(12)
                .width(Length::Fill)
                .style(ui::card(styles)),
            );
        }

        let mut page = column![header, controls, stats, list].spacing(20);
        if let Some(error) = &self.error {
            page = page.push(ui::error_text(styles, error));
        }
        if self.loading {
            page = page.push(ui::muted(styles, "Loading guests..."));
        }

        scrollable(container(page).padding(24).width(Length::Fill))
            .height(Length::Fill)
            .into()
    }

    fn add_modal<'a>(&'a self, styles: &Styles, form: &'a AddForm) -> Element<'a, Event> {
        let mut submit = button(
            text(if form.busy { "Adding..." } else { "Add Guest" })
                .size(16)
                .horizontal_alignment(alignment::Horizontal::Center),
        )
        .padding(10)
        .style(ui::primary_button(styles));
        if form.submittable() {
            submit = submit.on_press(Event::SubmitAdd);
        }

        let mut content = column![
            ui::heading(styles, "Add Guest"),
            row![
                column![
                    ui::muted(styles, "First Name *"),
                    text_input("", &form.first_name)
                        .on_input(Event::FirstNameChanged)
                        .padding(10),
                ]
                .spacing(4)
                .width(Length::Fill),
                column![
                    ui::muted(styles, "Last Name"),
                    text_input("", &form.last_name)
                        .on_input(Event::LastNameChanged)
                        .padding(10),
                ]
                .spacing(4)
                .width(Length::Fill),
            ]
            .spacing(12),
            ui::muted(styles, "Phone Number *"),
            text_input("+1 (555) 123-4567", &form.phone_number)
                .on_input(Event::PhoneChanged)
                .padding(10),
            ui::muted(styles, "Email"),
            text_input("", &form.email)
                .on_input(Event::EmailChanged)
                .padding(10),
            ui::muted(styles, "Notes"),
            text_input("", &form.notes)
                .on_input(Event::NotesChanged)
                .padding(10),
        ]
        .spacing(10);

        if let Some(error) = &form.error {
            content = content.push(ui::error_text(styles, error));
        }

        content = content.push(
            row![
                iced::widget::Space::with_width(Length::Fill),
                button(text("Cancel").size(16))
                    .padding(10)
                    .style(ui::subtle_button(styles))
                    .on_press(Event::CancelAdd),
                submit,
            ]
            .spacing(12),
        );

        container(
            container(content)
                .padding(24)
                .width(Length::Fixed(480.0))
                .style(ui::card(styles)),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x()
        .center_y()
        .style(ui::overlay())
        .into()
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
