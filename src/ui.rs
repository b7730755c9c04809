// src/ui.rs
use iced::widget::{button, container, text};
use iced::{Background, Color, Element, Length, Theme};
use once_cell::sync::Lazy;

#[derive(Debug, Clone, Copy)]
pub struct Styles {
    pub bg: Color,
    pub fg: Color,
    pub muted: Color,
    pub card: Color,
    pub card_border: Color,
    pub accent: Color,
    pub accent_hover: Color,
    pub accent_text: Color,
    pub danger: Color,
    pub danger_soft: Color,
    pub ok: Color,
    pub sidebar_bg: Color,
    pub sidebar_fg: Color,
    pub sidebar_active: Color,
}

pub static LIGHT_THEME: Lazy<Styles> = Lazy::new(|| Styles {
    bg: Color::from_rgb(0.980, 0.969, 0.949), // warm cream
    fg: Color::from_rgb(0.122, 0.137, 0.180),
    muted: Color::from_rgb(0.420, 0.447, 0.502),
    card: Color::from_rgb(1.0, 1.0, 1.0),
    card_border: Color::from_rgb(0.898, 0.886, 0.867),
    accent: Color::from_rgb(0.910, 0.365, 0.459), // #e85d75
    accent_hover: Color::from_rgb(0.820, 0.278, 0.373),
    accent_text: Color::from_rgb(1.0, 1.0, 1.0),
    danger: Color::from_rgb(0.863, 0.149, 0.149),
    danger_soft: Color::from_rgb(0.996, 0.925, 0.925),
    ok: Color::from_rgb(0.086, 0.639, 0.290),
    sidebar_bg: Color::from_rgb(0.165, 0.153, 0.188),
    sidebar_fg: Color::from_rgb(0.878, 0.867, 0.886),
    sidebar_active: Color::from_rgb(0.910, 0.365, 0.459),
});

pub static DARK_THEME: Lazy<Styles> = Lazy::new(|| Styles {
    bg: Color::from_rgb(0.094, 0.094, 0.118),
    fg: Color::from_rgb(0.925, 0.925, 0.937),
    muted: Color::from_rgb(0.612, 0.627, 0.667),
    card: Color::from_rgb(0.141, 0.141, 0.173),
    card_border: Color::from_rgb(0.227, 0.227, 0.267),
    accent: Color::from_rgb(0.910, 0.365, 0.459),
    accent_hover: Color::from_rgb(0.957, 0.478, 0.561),
    accent_text: Color::from_rgb(1.0, 1.0, 1.0),
    danger: Color::from_rgb(0.937, 0.357, 0.357),
    danger_soft: Color::from_rgb(0.231, 0.110, 0.110),
    ok: Color::from_rgb(0.290, 0.769, 0.447),
    sidebar_bg: Color::from_rgb(0.063, 0.063, 0.082),
    sidebar_fg: Color::from_rgb(0.722, 0.722, 0.761),
    sidebar_active: Color::from_rgb(0.910, 0.365, 0.459),
});

// Custom styles for containers and buttons

pub struct Panel {
    pub bg: Color,
}

impl container::StyleSheet for Panel {
    type Style = Theme;

    fn appearance(&self, _style: &Self::Style) -> container::Appearance {
        container::Appearance {
            text_color: None,
            background: Some(Background::Color(self.bg)),
            border_radius: 0.0.into(),
            border_width: 0.0,
            border_color: Color::TRANSPARENT,
        }
    }
}

pub struct CardStyle {
    pub bg: Color,
    pub border: Color,
}

impl container::StyleSheet for CardStyle {
    type Style = Theme;

    fn appearance(&self, _style: &Self::Style) -> container::Appearance {
        container::Appearance {
            text_color: None,
            background: Some(Background::Color(self.bg)),
            border_radius: 10.0.into(),
            border_width: 1.0,
            border_color: self.border,
        }
    }
}

pub struct OverlayStyle;

impl container::StyleSheet for OverlayStyle {
    type Style = Theme;

    fn appearance(&self, _style: &Self::Style) -> container::Appearance {
        container::Appearance {
            text_color: None,
            background: Some(Background::Color(Color::from_rgba(0.0, 0.0, 0.0, 0.7))),
            border_radius: 0.0.into(),
            border_width: 0.0,
            border_color: Color::TRANSPARENT,
        }
    }
}

pub struct ButtonStyle {
    pub bg: Color,
    pub fg: Color,
    pub hover_bg: Color,
}

impl button::StyleSheet for ButtonStyle {
    type Style = Theme;

    fn active(&self, _style: &Self::Style) -> button::Appearance {
        button::Appearance {
            background: Some(Background::Color(self.bg)),
            border_radius: 6.0.into(),
            text_color: self.fg,
            ..button::Appearance::default()
        }
    }

    fn hovered(&self, style: &Self::Style) -> button::Appearance {
        button::Appearance {
            background: Some(Background::Color(self.hover_bg)),
            ..self.active(style)
        }
    }
}

pub fn panel(bg: Color) -> iced::theme::Container {
    iced::theme::Container::Custom(Box::new(Panel { bg }))
}

pub fn card(styles: &Styles) -> iced::theme::Container {
    iced::theme::Container::Custom(Box::new(CardStyle {
        bg: styles.card,
        border: styles.card_border,
    }))
}

pub fn overlay() -> iced::theme::Container {
    iced::theme::Container::Custom(Box::new(OverlayStyle))
}

pub fn primary_button(styles: &Styles) -> iced::theme::Button {
    iced::theme::Button::Custom(Box::new(ButtonStyle {
        bg: styles.accent,
        fg: styles.accent_text,
        hover_bg: styles.accent_hover,
    }))
}

pub fn subtle_button(styles: &Styles) -> iced::theme::Button {
    iced::theme::Button::Custom(Box::new(ButtonStyle {
        bg: styles.card,
        fg: styles.fg,
        hover_bg: styles.card_border,
    }))
}

pub fn danger_button(styles: &Styles) -> iced::theme::Button {
    iced::theme::Button::Custom(Box::new(ButtonStyle {
        bg: styles.danger,
        fg: styles.accent_text,
        hover_bg: styles.danger,
    }))
}

pub fn sidebar_button(styles: &Styles, active: bool) -> iced::theme::Button {
    iced::theme::Button::Custom(Box::new(ButtonStyle {
        bg: if active {
            styles.sidebar_active
        } else {
            styles.sidebar_bg
        },
        fg: if active {
            styles.accent_text
        } else {
            styles.sidebar_fg
        },
        hover_bg: styles.sidebar_active,
    }))
}

pub fn heading<'a>(styles: &Styles, label: impl ToString) -> iced::widget::Text<'a> {
    text(label)
        .size(26)
        .style(iced::theme::Text::Color(styles.fg))
}

pub fn subheading<'a>(styles: &Styles, label: impl ToString) -> iced::widget::Text<'a> {
    text(label)
        .size(15)
        .style(iced::theme::Text::Color(styles.muted))
}

pub fn body<'a>(styles: &Styles, label: impl ToString) -> iced::widget::Text<'a> {
    text(label)
        .size(15)
        .style(iced::theme::Text::Color(styles.fg))
}

pub fn muted<'a>(styles: &Styles, label: impl ToString) -> iced::widget::Text<'a> {
    text(label)
        .size(13)
        .style(iced::theme::Text::Color(styles.muted))
}

pub fn error_text<'a>(styles: &Styles, label: impl ToString) -> iced::widget::Text<'a> {
    text(label)
        .size(14)
        .style(iced::theme::Text::Color(styles.danger))
}

/// A big-number card for the dashboard and list headers.
pub fn stat_card<'a, Message: 'a>(
    styles: &Styles,
    value: String,
    label: &str,
) -> Element<'a, Message> {
    container(
        iced::widget::column![
            text(value)
                .size(28)
                .style(iced::theme::Text::Color(styles.fg)),
            muted(styles, label),
        ]
        .spacing(4),
    )
    .padding(16)
    .width(Length::Fill)
    .style(card(styles))
    .into()
}
