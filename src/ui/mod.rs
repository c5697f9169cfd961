pub mod format;
pub mod gesture;
pub mod modal;
pub mod nav;
pub mod storage;
pub mod terminal;
pub mod theme;

#[cfg(test)]
pub(crate) mod testing;

use crate::models::chat::{ ChatMessage, Sender };
use format::Inline;
use log::info;
use modal::{ Modal, ModalKind };
use serde::{ Deserialize, Serialize };
use std::fmt;
use theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl NotificationLevel {
    /// Unrecognised levels fall back to `Info`.
    pub fn parse(level: Option<&str>) -> Self {
        match level.map(|l| l.to_lowercase()).as_deref() {
            Some("success") => NotificationLevel::Success,
            Some("warning") => NotificationLevel::Warning,
            Some("error") => NotificationLevel::Error,
            _ => NotificationLevel::Info,
        }
    }

    pub fn icon_class(&self) -> &'static str {
        match self {
            NotificationLevel::Success => "fas fa-check",
            NotificationLevel::Error => "fas fa-times",
            _ => "fas fa-info",
        }
    }
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NotificationLevel::Info => "info",
            NotificationLevel::Success => "success",
            NotificationLevel::Warning => "warning",
            NotificationLevel::Error => "error",
        };
        write!(f, "{}", name)
    }
}

/// A chat message prepared for display.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedMessage {
    pub sender: Sender,
    pub spans: Vec<Inline>,
    pub html: String,
    pub time: String,
}

impl RenderedMessage {
    pub fn from_message(message: &ChatMessage) -> Self {
        let spans = format::parse(&message.text);
        Self {
            sender: message.sender,
            html: format::to_html(&spans),
            spans,
            time: format::format_time(&message.timestamp),
        }
    }

    pub fn css_class(&self) -> String {
        format!("message {}-message", self.sender)
    }

    pub fn avatar_icon(&self) -> &'static str {
        match self.sender {
            Sender::User => "fas fa-user",
            Sender::Bot => "fas fa-shield-alt",
        }
    }
}

/// Everything the client does to the page goes through a `Surface`.
/// Implementations must be cheap to call from any task.
pub trait Surface: Send + Sync {
    /// Appends one message to the visible history and scrolls to it.
    fn append_message(&self, message: &RenderedMessage);

    fn show_typing_placeholder(&self);

    /// Returns whether a placeholder was present.
    fn remove_typing_placeholder(&self) -> bool;

    fn show_notification(&self, message: &str, level: NotificationLevel);

    fn navigate(&self, url: &str);

    fn apply_theme(&self, theme: Theme, icon_class: &str);

    fn open_modal(&self, modal: &Modal);

    fn close_modal(&self, kind: ModalKind);

    fn set_menu_icon(&self, icon_class: &str);

    fn set_dropdown_visible(&self, index: usize, visible: bool);

    fn open_chat(&self);
}

pub fn track_service_click(service_name: &str) {
    info!("Service clicked: {}", service_name);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_level_parse() {
        assert_eq!(NotificationLevel::parse(None), NotificationLevel::Info);
        assert_eq!(NotificationLevel::parse(Some("SUCCESS")), NotificationLevel::Success);
        assert_eq!(NotificationLevel::parse(Some("loud")), NotificationLevel::Info);
        assert_eq!(NotificationLevel::Error.icon_class(), "fas fa-times");
    }

    #[test]
    fn test_rendered_message_layout() {
        let msg = ChatMessage::new("**hi**\nthere", Sender::Bot);
        let rendered = RenderedMessage::from_message(&msg);
        assert_eq!(rendered.html, "<strong>hi</strong><br>there");
        assert_eq!(rendered.css_class(), "message bot-message");
        assert_eq!(rendered.avatar_icon(), "fas fa-shield-alt");
    }
}
