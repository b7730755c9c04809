// src/screens/import_dialog.rs
use std::path::PathBuf;

use iced::widget::{button, column, container, row, scrollable, text};
use iced::{alignment, Command, Element, Length};
use log::warn;
use rfd::FileDialog;

use crate::import::{self, ImportResult};
use crate::store::{Session, Store};
use crate::ui::{self, Styles};
use crate::workspace::{self, Workspace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Upload,
    Preview,
    Complete,
}

#[derive(Debug)]
pub struct State {
    step: Step,
    result: Option<ImportResult>,
    imported: usize,
    busy: bool,
    error: Option<String>,
}

impl Default for State {
    fn default() -> Self {
        State {
            step: Step::Upload,
            result: None,
            imported: 0,
            busy: false,
            error: None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Event {
    PickFile,
    FilePicked(Option<PathBuf>),
    Parsed(Result<ImportResult, String>),
    DownloadTemplate,
    TemplateSaved(Result<(), String>),
    Commit,
    Committed(Result<usize, String>),
    StartOver,
    /// Close request; handled by the guests screen.
    Close,
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
            Event::PickFile => {
                if self.busy {
                    return Command::none();
                }
                self.busy = true;
                self.error = None;
                Command::perform(
                    async {
                        FileDialog::new()
                            .add_filter("Spreadsheets", &["xlsx", "xls", "csv"])
                            .pick_file()
                    },
                    Event::FilePicked,
                )
            }
            Event::FilePicked(None) => {
                self.busy = false;
                Command::none()
            }
            Event::FilePicked(Some(path)) => Command::perform(
                async move { import::parse_path(path).await.map_err(|e| e.to_string()) },
                Event::Parsed,
            ),
            Event::Parsed(result) => {
                self.busy = false;
                match result {
                    Ok(parsed) => {
                        self.result = Some(parsed);
                        self.step = Step::Preview;
                        self.error = None;
                    }
                    Err(message) => self.error = Some(message),
                }
                Command::none()
            }
            Event::DownloadTemplate => Command::perform(
                async {
                    let Some(path) = FileDialog::new()
                        .add_filter("Excel Workbook", &["xlsx"])
                        .set_file_name("wedding-guest-list-template.xlsx")
                        .save_file()
                    else {
                        return Ok(());
                    };
                    let bytes = import::template_workbook().map_err(|e| e.to_string())?;
                    std::fs::write(&path, bytes).map_err(|e| e.to_string())
                },
                Event::TemplateSaved,
            ),
            Event::TemplateSaved(result) => {
                if let Err(message) = result {
                    warn!("template download failed: {message}");
                    self.error = Some(message);
                }
                Command::none()
            }
            Event::Commit => {
                let Some(result) = self.result.clone() else {
                    return Command::none();
                };
                if self.busy || result.valid_count() == 0 {
                    return Command::none();
                }
                self.busy = true;
                let store = store.clone();
                let session = session.clone();
                let workspace = workspace.clone();
                Command::perform(
                    async move {
                        workspace::commit_import(&store, &session, &workspace, &result)
                            .await
                            .map_err(|e| e.to_string())
                    },
                    Event::Committed,
                )
            }
            Event::Committed(result) => {
                self.busy = false;
                match result {
                    Ok(imported) => {
                        self.imported = imported;
                        self.step = Step::Complete;
                    }
                    Err(message) => self.error = Some(message),
                }
                Command::none()
            }
            Event::StartOver => {
                *self = State::default();
                Command::none()
            }
            Event::Close => Command::none(),
        }
    }

    /// True once the commit has run, so the caller can refresh its list.
    pub fn finished(&self) -> bool {
        self.step == Step::Complete
    }

    pub fn view(&self, styles: &Styles) -> Element<'_, Event> {
        let body: Element<'_, Event> = match self.step {
            Step::Upload => self.upload(styles),
            Step::Preview => self.preview(styles),
            Step::Complete => self.complete(styles),
        };

        let dialog = container(
            column![
                row![
                    ui::heading(styles, "Import Guest List"),
                    iced::widget::Space::with_width(Length::Fill),
                    button(text("✕").size(16))
                        .padding([6, 10])
                        .style(ui::subtle_button(styles))
                        .on_press(Event::Close),
                ],
                body,
            ]
            .spacing(18),
        )
        .padding(24)
        .width(Length::Fixed(760.0))
        .style(ui::card(styles));

        container(dialog)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x()
            .center_y()
            .style(ui::overlay())
            .into()
    }

    fn upload(&self, styles: &Styles) -> Element<'_, Event> {
        let mut content = column![
            ui::subheading(
                styles,
                "Upload a spreadsheet (.xlsx, .xls, or .csv). Columns are matched \
                 by header name, so any column order works.",
            ),
            button(
                text("Download Excel Template")
                    .size(15)
                    .horizontal_alignment(alignment::Horizontal::Center)
            )
            .padding(10)
            .width(Length::Fill)
            .style(ui::subtle_button(styles))
            .on_press(Event::DownloadTemplate),
        ]
        .spacing(12);

        let pick_label = if self.busy {
            "Processing..."
        } else {
            "Choose File"
        };
        let mut pick = button(
            text(pick_label)
                .size(16)
                .horizontal_alignment(alignment::Horizontal::Center),
        )
        .padding(12)
        .width(Length::Fill)
        .style(ui::primary_button(styles));
        if !self.busy {
            pick = pick.on_press(Event::PickFile);
        }
        content = content.push(pick);

        content = content.push(ui::muted(
            styles,
            "Required columns: First Name and Phone Number. Optional: Last Name, \
             Email, Group. Phone numbers may use any punctuation. Files over 10 MB \
             are rejected.",
        ));

        if let Some(error) = &self.error {
            content = content.push(ui::error_text(styles, error));
        }
        content.into()
    }

    fn preview(&self, styles: &Styles) -> Element<'_, Event> {
        let Some(result) = &self.result else {
            return ui::error_text(styles, "No parsed file.").into();
        };
        let valid = result.valid_count();
        let total = result.rows.len();
        let error_count = result.errors.len();

        let summary = row![
            ui::body(styles, format!("{total} total rows")),
            text(format!("{valid} valid guests"))
                .size(15)
                .style(iced::theme::Text::Color(if valid > 0 {
                    styles.ok
                } else {
                    styles.danger
                })),
            text(format!("{error_count} errors"))
                .size(15)
                .style(iced::theme::Text::Color(if error_count > 0 {
                    styles.danger
                } else {
                    styles.muted
                })),
            iced::widget::Space::with_width(Length::Fill),
            button(text("Start Over").size(14))
                .padding([6, 12])
                .style(ui::subtle_button(styles))
                .on_press(Event::StartOver),
        ]
        .spacing(16);

        let mut content = column![summary].spacing(14);

        if error_count > 0 {
            let mut errors = column![ui::body(styles, "Please fix the following:")].spacing(4);
            for error in result.errors.iter().take(5) {
                errors = errors.push(ui::error_text(
                    styles,
                    format!(
                        "Row {}: {} ({}: \"{}\")",
                        error.row,
                        error.message(),
                        error.field.key(),
                        error.value
                    ),
                ));
            }
            if error_count > 5 {
                errors = errors.push(ui::muted(
                    styles,
                    format!("...and {} more errors", error_count - 5),
                ));
            }
            content = content.push(
                container(errors)
                    .padding(12)
                    .width(Length::Fill)
                    .style(ui::panel(styles.danger_soft)),
            );
        }

        let mut table = column![row![
            ui::muted(styles, "Name").width(Length::FillPortion(3)),
            ui::muted(styles, "Phone").width(Length::FillPortion(3)),
            ui::muted(styles, "Email").width(Length::FillPortion(3)),
            ui::muted(styles, "Group").width(Length::FillPortion(2)),
            ui::muted(styles, "Status").width(Length::FillPortion(1)),
        ]
        .spacing(8)]
        .spacing(6);

        for guest in result.rows.iter().take(20) {
            let ok = result.row_is_valid(guest.row);
            let status = if ok {
                text("Valid")
                    .size(13)
                    .style(iced::theme::Text::Color(styles.ok))
            } else {
                text("Error")
                    .size(13)
                    .style(iced::theme::Text::Color(styles.danger))
            };
            table = table.push(
                row![
                    ui::body(styles, guest.display_name()).width(Length::FillPortion(3)),
                    ui::body(styles, &guest.phone_number).width(Length::FillPortion(3)),
                    ui::body(
                        styles,
                        if guest.email.is_empty() {
                            "-"
                        } else {
                            guest.email.as_str()
                        }
                    )
                    .width(Length::FillPortion(3)),
                    ui::body(
                        styles,
                        if guest.group.is_empty() {
                            "-"
                        } else {
                            guest.group.as_str()
                        }
                    )
                    .width(Length::FillPortion(2)),
                    status.width(Length::FillPortion(1)),
                ]
                .spacing(8),
            );
        }
        if total > 20 {
            table = table.push(ui::muted(
                styles,
                format!("Showing first 20 of {total} guests"),
            ));
        }

        content = content.push(
            scrollable(table)
                .height(Length::Fixed(280.0)),
        );

        if let Some(error) = &self.error {
            content = content.push(ui::error_text(styles, error));
        }

        let commit_label = if self.busy {
            "Importing...".to_string()
        } else {
            format!("Import {valid} Guests")
        };
        let mut commit = button(
            text(commit_label)
                .size(16)
                .horizontal_alignment(alignment::Horizontal::Center),
        )
        .padding(10)
        .style(ui::primary_button(styles));
        if valid > 0 && !self.busy {
            commit = commit.on_press(Event::Commit);
        }

        content
            .push(
                row![
                    iced::widget::Space::with_width(Length::Fill),
                    button(text("Cancel").size(16))
                        .padding(10)
                        .style(ui::subtle_button(styles))
                        .on_press(Event::Close),
                    commit,
                ]
                .spacing(12),
            )
            .into()
    }

    fn complete(&self, styles: &Styles) -> Element<'_, Event> {
        column![
            text("Import Successful!")
                .size(22)
                .style(iced::theme::Text::Color(styles.ok)),
            ui::subheading(
                styles,
                format!(
                    "Successfully imported {} guests to your wedding list.",
                    self.imported
                ),
            ),
            button(
                text("Done")
                    .size(16)
                    .horizontal_alignment(alignment::Horizontal::Center)
            )
            .padding(10)
            .width(Length::Fill)
            .style(ui::primary_button(styles))
            .on_press(Event::Close),
        ]
        .spacing(16)
        .into()
    }
}
