// src/screens/groups.rs
use iced::widget::{button, column, container, row, scrollable, text, text_input};
use iced::{alignment, Command, Element, Length};

use crate::data_types::{now_iso, record_id, Guest, GuestGroup};
use crate::store::{ListQuery, Session, Store};
use crate::ui::{self, Styles};
use crate::workspace::Workspace;

#[derive(Debug, Default)]
struct CreateForm {
    name: String,
    description: String,
    busy: bool,
    error: Option<String>,
}

#[derive(Debug, Default)]
pub struct State {
    groups: Vec<GuestGroup>,
    guests: Vec<Guest>,
    loading: bool,
    error: Option<String>,
    create: Option<CreateForm>,
}

#[derive(Debug, Clone)]
pub enum Event {
    Load,
    Loaded(Result<(Vec<GuestGroup>, Vec<Guest>), String>),
    ShowCreate,
    CancelCreate,
    NameChanged(String),
    DescriptionChanged(String),
    SubmitCreate,
    Created(Result<(), String>),
    Delete(String),
    Deleted(Result<(), String>),
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
                        let groups = store
                            .list::<GuestGroup>(
                                &session,
                                ListQuery::owned_by(&session)
                                    .filter("weddingId", wedding_id.as_str())
                                    .order_asc("createdAt"),
                            )
                            .await
                            .map_err(|e| e.to_string())?;
                        let guests = store
                            .list::<Guest>(
                                &session,
                                ListQuery::owned_by(&session)
                                    .filter("weddingId", wedding_id.as_str()),
                            )
                            .await
                            .map_err(|e| e.to_string())?;
                        Ok((groups, guests))
                    },
                    Event::Loaded,
                )
            }
            Event::Loaded(result) => {
                self.loading = false;
                match result {
                    Ok((groups, guests)) => {
                        self.groups = groups;
                        self.guests = guests;
                        self.error = None;
                    }
                    Err(message) => self.error = Some(message),
                }
                Command::none()
            }
            Event::ShowCreate => {
                self.create = Some(CreateForm::default());
                Command::none()
            }
            Event::CancelCreate => {
                self.create = None;
                Command::none()
            }
            Event::NameChanged(value) => {
                if let Some(form) = &mut self.create {
                    form.name = value;
                }
                Command::none()
            }
            Event::DescriptionChanged(value) => {
                if let Some(form) = &mut self.create {
                    form.description = value;
                }
                Command::none()
            }
            Event::SubmitCreate => {
                let Some(form) = &mut self.create else {
                    return Command::none();
                };
                let name = form.name.trim().to_string();
                if name.is_empty() || form.busy {
                    return Command::none();
                }
                form.busy = true;
                form.error = None;

                let description = form.description.trim().to_string();
                let group = GuestGroup {
                    id: record_id("group"),
                    user_id: session.user_id().to_string(),
                    wedding_id: workspace.wedding.id.clone(),
                    name,
                    description: (!description.is_empty()).then_some(description),
                    builtin: false,
                    created_at: now_iso(),
                };
                let store = store.clone();
                let session = session.clone();
                Command::perform(
                    async move {
                        store
                            .create(&session, &group)
                            .await
                            .map_err(|e| e.to_string())
                    },
                    Event::Created,
                )
            }
            Event::Created(result) => {
                match result {
                    Ok(()) => {
                        self.create = None;
                        return self.update(Event::Load, store, session, workspace);
                    }
                    Err(message) => {
                        if let Some(form) = &mut self.create {
                            form.busy = false;
                            form.error = Some(message);
                        }
                    }
                }
                Command::none()
            }
            Event::Delete(group_id) => {
                // Built-in groups stay; only custom ones carry the button.
                let store = store.clone();
                let session = session.clone();
                Command::perform(
                    async move {
                        store
                            .delete::<GuestGroup>(&session, &group_id)
                            .await
                            .map_err(|e| e.to_string())
                    },
                    Event::Deleted,
                )
            }
            Event::Deleted(result) => {
                if let Err(message) = result {
                    self.error = Some(message);
                    return Command::none();
                }
                self.update(Event::Load, store, session, workspace)
            }
        }
    }

    fn member_count(&self, group: &GuestGroup) -> usize {
        // "All Guests" always covers the whole list.
        if group.builtin && group.name == "All Guests" {
            return self.guests.len();
        }
        self.guests
            .iter()
            .filter(|guest| guest.group.as_deref() == Some(group.name.as_str()))
            .count()
    }

    pub fn view(&self, styles: &Styles) -> Element<'_, Event> {
        if let Some(form) = &self.create {
            return self.create_modal(styles, form);
        }

        let header = row![
            column![
                ui::heading(styles, "Guest Groups"),
                ui::subheading(styles, "Organize your guests into groups for targeted messaging"),
            ]
            .spacing(4),
            iced::widget::Space::with_width(Length::Fill),
            button(text("Create Group").size(14))
                .padding([8, 14])
                .style(ui::primary_button(styles))
                .on_press(Event::ShowCreate),
        ]
        .spacing(12);

        let mut list = column![].spacing(8);
        for group in &self.groups {
            let members = self.member_count(group);
            let kind = if group.builtin { "Built-in" } else { "Custom" };
            let mut entry = row![
                column![
                    ui::body(styles, &group.name),
                    ui::muted(styles, group.description.as_deref().unwrap_or("")),
                ]
                .spacing(2),
                iced::widget::Space::with_width(Length::Fill),
                column![
                    ui::body(styles, format!("{members} members")),
                    ui::muted(styles, kind),
                ]
                .spacing(2)
                .align_items(iced::Alignment::End),
            ]
            .spacing(8);
            if !group.builtin {
                entry = entry.push(
                    button(text("Delete").size(13))
                        .padding([6, 10])
                        .style(ui::danger_button(styles))
                        .on_press(Event::Delete(group.id.clone())),
                );
            }
            list = list.push(
                container(entry)
                    .padding(14)
                    .width(Length::Fill)
                    .style(ui::card(styles)),
            );
        }

        let mut page = column![header, list].spacing(20);
        if let Some(error) = &self.error {
            page = page.push(ui::error_text(styles, error));
        }
        if self.loading {
            page = page.push(ui::muted(styles, "Loading groups..."));
        }

        scrollable(container(page).padding(24).width(Length::Fill))
            .height(Length::Fill)
            .into()
    }

    fn create_modal<'a>(&'a self, styles: &Styles, form: &'a CreateForm) -> Element<'a, Event> {
        let mut submit = button(
            text(if form.busy {
                "Creating..."
            } else {
                "Create Group"
            })
            .size(16)
            .horizontal_alignment(alignment::Horizontal::Center),
        )
        .padding(10)
        .style(ui::primary_button(styles));
        if !form.name.trim().is_empty() && !form.busy {
            submit = submit.on_press(Event::SubmitCreate);
        }

        let mut content = column![
            ui::heading(styles, "Create New Group"),
            ui::muted(styles, "Group Name"),
            text_input("e.g. College Friends", &form.name)
                .on_input(Event::NameChanged)
                .padding(10),
            ui::muted(styles, "Description (Optional)"),
            text_input("What makes this group special?", &form.description)
                .on_input(Event::DescriptionChanged)
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
                    .on_press(Event::CancelCreate),
                submit,
            ]
            .spacing(12),
        );

        container(
            container(content)
                .padding(24)
                .width(Length::Fixed(440.0))
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
