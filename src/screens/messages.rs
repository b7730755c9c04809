// src/screens/messages.rs
use std::collections::BTreeSet;
use std::fmt;

use iced::widget::{
    button, checkbox, column, container, pick_list, radio, row, scrollable, text, text_input,
};
use iced::{alignment, Command, Element, Length};

use crate::data_types::{
    now_iso, record_id, Guest, Message, MessageKind, MessageStatus, MessageTemplate,
};
use crate::store::{ListQuery, Session, Store};
use crate::ui::{self, Styles};
use crate::workspace::Workspace;

/// Status filter above the message list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusFilter(pub Option<MessageStatus>);

impl StatusFilter {
    pub const ALL: [StatusFilter; 5] = [
        StatusFilter(None),
        StatusFilter(Some(MessageStatus::Draft)),
        StatusFilter(Some(MessageStatus::Scheduled)),
        StatusFilter(Some(MessageStatus::Sent)),
        StatusFilter(Some(MessageStatus::Failed)),
    ];
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            None => f.write_str("All Messages"),
            Some(status) => f.write_str(status.label()),
        }
    }
}

#[derive(Debug)]
struct Composer {
    subject: String,
    content: String,
    kind: MessageKind,
    scheduled_at: String,
    selected_groups: BTreeSet<String>,
    templates: Vec<MessageTemplate>,
    busy: bool,
    error: Option<String>,
}

impl Composer {
    fn new() -> Self {
        Composer {
            subject: String::new(),
            content: String::new(),
            kind: MessageKind::Broadcast,
            scheduled_at: String::new(),
            selected_groups: BTreeSet::new(),
            templates: Vec::new(),
            busy: false,
            error: None,
        }
    }
}

#[derive(Debug, Default)]
pub struct State {
    messages: Vec<Message>,
    guests: Vec<Guest>,
    loading: bool,
    error: Option<String>,
    filter: StatusFilter,
    search: String,
    composer: Option<Composer>,
}

#[derive(Debug, Clone)]
pub enum Event {
    Load,
    Loaded(Result<(Vec<Message>, Vec<Guest>), String>),
    FilterChanged(StatusFilter),
    SearchChanged(String),
    OpenComposer,
    TemplatesLoaded(Result<Vec<MessageTemplate>, String>),
    CloseComposer,
    SubjectChanged(String),
    ContentChanged(String),
    KindChanged(MessageKind),
    ScheduleChanged(String),
    GroupToggled(String, bool),
    ApplyTemplate(String),
    Send,
    Sent(Result<(), String>),
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
                        let messages = store
                            .list::<Message>(
                                &session,
                                ListQuery::owned_by(&session)
                                    .filter("weddingId", wedding_id.as_str())
                                    .order_desc("createdAt"),
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
                        Ok((messages, guests))
                    },
                    Event::Loaded,
                )
            }
            Event::Loaded(result) => {
                self.loading = false;
                match result {
                    Ok((messages, guests)) => {
                        self.messages = messages;
                        self.guests = guests;
                        self.error = None;
                    }
                    Err(message) => self.error = Some(message),
                }
                Command::none()
            }
            Event::FilterChanged(filter) => {
                self.filter = filter;
                Command::none()
            }
            Event::SearchChanged(search) => {
                self.search = search;
                Command::none()
            }
            Event::OpenComposer => {
                self.composer = Some(Composer::new());
                let store = store.clone();
                let session = session.clone();
                Command::perform(
                    async move {
                        store
                            .list::<MessageTemplate>(&session, ListQuery::default())
                            .await
                            .map_err(|e| e.to_string())
                    },
                    Event::TemplatesLoaded,
                )
            }
            Event::TemplatesLoaded(result) => {
                if let (Some(composer), Ok(templates)) = (&mut self.composer, result) {
                    composer.templates = templates;
                }
                Command::none()
            }
            Event::CloseComposer => {
                self.composer = None;
                Command::none()
            }
            Event::SubjectChanged(value) => {
                if let Some(composer) = &mut self.composer {
                    composer.subject = value;
                }
                Command::none()
            }
            Event::ContentChanged(value) => {
                if let Some(composer) = &mut self.composer {
                    composer.content = value;
                }
                Command::none()
            }
            Event::KindChanged(kind) => {
                if let Some(composer) = &mut self.composer {
                    composer.kind = kind;
                }
                Command::none()
            }
            Event::ScheduleChanged(value) => {
                if let Some(composer) = &mut self.composer {
                    composer.scheduled_at = value;
                }
                Command::none()
            }
            Event::GroupToggled(group_id, selected) => {
                if let Some(composer) = &mut self.composer {
                    if selected {
                        composer.selected_groups.insert(group_id);
                    } else {
                        composer.selected_groups.remove(&group_id);
                    }
                }
                Command::none()
            }
            Event::ApplyTemplate(template_id) => {
                if let Some(composer) = &mut self.composer {
                    if let Some(template) = composer
                        .templates
                        .iter()
                        .find(|template| template.id == template_id)
                    {
                        composer.content = template.content.clone();
                    }
                }
                Command::none()
            }
            Event::Send => {
                let recipient_count = self
                    .composer
                    .as_ref()
                    .map(|composer| self.recipient_count(composer, workspace))
                    .unwrap_or(0);
                let Some(composer) = &mut self.composer else {
                    return Command::none();
                };
                if composer.content.trim().is_empty() || composer.busy {
                    return Command::none();
                }
                composer.busy = true;
                composer.error = None;

                let subject = composer.subject.trim().to_string();
                let scheduled_at = composer.scheduled_at.trim().to_string();
                let message = Message {
                    id: record_id("msg"),
                    user_id: session.user_id().to_string(),
                    wedding_id: workspace.wedding.id.clone(),
                    subject: (!subject.is_empty()).then_some(subject),
                    content: composer.content.trim().to_string(),
                    message_type: composer.kind,
                    status: match composer.kind {
                        MessageKind::Scheduled => MessageStatus::Scheduled,
                        MessageKind::Broadcast => MessageStatus::Draft,
                    },
                    scheduled_at: (!scheduled_at.is_empty()).then_some(scheduled_at),
                    sent_at: None,
                    recipient_count,
                    delivery_count: 0,
                    reply_count: 0,
                    created_at: now_iso(),
                };
                let store = store.clone();
                let session = session.clone();
                Command::perform(
                    async move {
                        store
                            .create(&session, &message)
                            .await
                            .map_err(|e| e.to_string())
                    },
                    Event::Sent,
                )
            }
            Event::Sent(result) => {
                match result {
                    Ok(()) => {
                        self.composer = None;
                        return self.update(Event::Load, store, session, workspace);
                    }
                    Err(message) => {
                        if let Some(composer) = &mut self.composer {
                            composer.busy = false;
                            composer.error = Some(message);
                        }
                    }
                }
                Command::none()
            }
        }
    }

    /// Guests covered by the selected groups; "All Guests" covers everyone.
    fn recipient_count(&self, composer: &Composer, workspace: &Workspace) -> u32 {
        let selected_names: Vec<&str> = workspace
            .groups
            .iter()
            .filter(|group| composer.selected_groups.contains(&group.id))
            .map(|group| group.name.as_str())
            .collect();
        if selected_names.is_empty() {
            return 0;
        }
        if selected_names.contains(&"All Guests") {
            return self.guests.len() as u32;
        }
        self.guests
            .iter()
            .filter(|guest| {
                guest
                    .group
                    .as_deref()
                    .is_some_and(|name| selected_names.contains(&name))
            })
            .count() as u32
    }

    fn filtered(&self) -> Vec<&Message> {
        let term = self.search.to_lowercase();
        self.messages
            .iter()
            .filter(|message| match self.filter.0 {
                None => true,
                Some(status) => message.status == status,
            })
            .filter(|message| {
                if term.is_empty() {
                    return true;
                }
                message.content.to_lowercase().contains(&term)
                    || message
                        .subject
                        .as_deref()
                        .is_some_and(|subject| subject.to_lowercase().contains(&term))
            })
            .collect()
    }

    pub fn view<'a>(&'a self, styles: &Styles, workspace: &'a Workspace) -> Element<'a, Event> {
        if let Some(composer) = &self.composer {
            return self.composer_view(styles, composer, workspace);
        }

        let header = row![
            column![
                ui::heading(styles, "Messages"),
                ui::subheading(styles, "Send broadcasts and manage your communications"),
            ]
            .spacing(4),
            iced::widget::Space::with_width(Length::Fill),
            button(text("New Message").size(14))
                .padding([8, 14])
                .style(ui::primary_button(styles))
                .on_press(Event::OpenComposer),
        ]
        .spacing(12);

        let controls = row![
            text_input("Search messages...", &self.search)
                .on_input(Event::SearchChanged)
                .padding(10)
                .width(Length::Fill),
            pick_list(StatusFilter::ALL.to_vec(), Some(self.filter), Event::FilterChanged).padding(8),
        ]
        .spacing(12);

        let mut list = column![].spacing(8);
        let filtered = self.filtered();
        if filtered.is_empty() && !self.loading {
            list = list.push(ui::muted(
                styles,
                "No messages yet. Compose one to reach your guests.",
            ));
        }
        for message in filtered {
            let status_color = match message.status {
                MessageStatus::Sent => styles.ok,
                MessageStatus::Failed => styles.danger,
                MessageStatus::Scheduled => styles.accent,
                MessageStatus::Draft => styles.muted,
            };
            let meta = match (&message.scheduled_at, &message.sent_at) {
                (_, Some(sent_at)) => format!("sent {sent_at}"),
                (Some(scheduled_at), None) => format!("scheduled for {scheduled_at}"),
                (None, None) => format!("{} recipients", message.recipient_count),
            };
            list = list.push(
                container(
                    row![
                        column![
                            ui::body(
                                styles,
                                message.subject.as_deref().unwrap_or("(no subject)")
                            ),
                            ui::muted(styles, &message.content),
                            ui::muted(styles, meta),
                        ]
                        .spacing(2),
                        iced::widget::Space::with_width(Length::Fill),
                        text(message.status.label())
                            .size(13)
                            .style(iced::theme::Text::Color(status_color)),
                    ]
                    .spacing(8),
                )
                .padding(14)
                .width(Length::Fill)
                .style(ui::card(styles)),
            );
        }

        let mut page = column![header, controls, list].spacing(20);
        if let Some(error) = &self.error {
            page = page.push(ui::error_text(styles, error));
        }
        if self.loading {
            page = page.push(ui::muted(styles, "Loading messages..."));
        }

        scrollable(container(page).padding(24).width(Length::Fill))
            .height(Length::Fill)
            .into()
    }

    fn composer_view<'a>(
        &'a self,
        styles: &Styles,
        composer: &'a Composer,
        workspace: &'a Workspace,
    ) -> Element<'a, Event> {
        let recipient_count = self.recipient_count(composer, workspace);

        let kind_picker = row![
            radio(
                "Send Now",
                MessageKind::Broadcast,
                Some(composer.kind),
                Event::KindChanged
            ),
            radio(
                "Schedule for Later",
                MessageKind::Scheduled,
                Some(composer.kind),
                Event::KindChanged
            ),
        ]
        .spacing(16);

        let mut content = column![
            ui::heading(styles, "Compose Message"),
            ui::muted(styles, "Message Type"),
            kind_picker,
        ]
        .spacing(10);

        if composer.kind == MessageKind::Scheduled {
            content = content.push(ui::muted(styles, "Schedule Date & Time"));
            content = content.push(
                text_input("YYYY-MM-DD HH:MM", &composer.scheduled_at)
                    .on_input(Event::ScheduleChanged)
                    .padding(10),
            );
        }

        content = content.push(ui::muted(styles, "Send To"));
        let mut group_boxes = column![].spacing(6);
        for group in &workspace.groups {
            let group_id = group.id.clone();
            group_boxes = group_boxes.push(checkbox(
                group.name.clone(),
                composer.selected_groups.contains(&group.id),
                move |selected| Event::GroupToggled(group_id.clone(), selected),
            ));
        }
        content = content.push(group_boxes);
        content = content.push(ui::muted(
            styles,
            format!("{recipient_count} guests will receive this message"),
        ));

        if !composer.templates.is_empty() {
            content = content.push(ui::muted(styles, "Start from a template"));
            let mut template_row = row![].spacing(8);
            for template in &composer.templates {
                template_row = template_row.push(
                    button(text(&template.name).size(13))
                        .padding([6, 10])
                        .style(ui::subtle_button(styles))
                        .on_press(Event::ApplyTemplate(template.id.clone())),
                );
            }
            content = content.push(template_row);
        }

        content = content.push(ui::muted(styles, "Subject (optional)"));
        content = content.push(
            text_input("", &composer.subject)
                .on_input(Event::SubjectChanged)
                .padding(10),
        );
        content = content.push(ui::muted(styles, "Message"));
        content = content.push(
            text_input("Write your message...", &composer.content)
                .on_input(Event::ContentChanged)
                .padding(10),
        );

        if let Some(error) = &composer.error {
            content = content.push(ui::error_text(styles, error));
        }

        let send_label = match (composer.busy, composer.kind) {
            (true, _) => "Saving...".to_string(),
            (false, MessageKind::Scheduled) => "Schedule Message".to_string(),
            (false, MessageKind::Broadcast) => "Save Draft".to_string(),
        };
        let mut send = button(
            text(send_label)
                .size(16)
                .horizontal_alignment(alignment::Horizontal::Center),
        )
        .padding(10)
        .style(ui::primary_button(styles));
        if !composer.content.trim().is_empty() && !composer.busy {
            send = send.on_press(Event::Send);
        }

        content = content.push(
            row![
                iced::widget::Space::with_width(Length::Fill),
                button(text("Cancel").size(16))
                    .padding(10)
                    .style(ui::subtle_button(styles))
                    .on_press(Event::CloseComposer),
                send,
            ]
            .spacing(12),
        );

        container(
            container(scrollable(content).height(Length::Fill))
                .padding(24)
                .width(Length::Fixed(560.0))
                .style(ui::card(styles)),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x()
        .center_y()
        .padding(32)
        .style(ui::overlay())
        .into()
    }
}
