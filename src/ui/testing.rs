use super::modal::{ Modal, ModalKind };
use super::theme::Theme;
use super::{ NotificationLevel, RenderedMessage, Surface };
use crate::models::chat::Sender;
use std::sync::Mutex;

#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceEvent {
    Message(RenderedMessage),
    TypingShown,
    TypingRemoved,
    Notification(String, NotificationLevel),
    Navigate(String),
    Theme(Theme, String),
    ModalOpened(ModalKind),
    ModalClosed(ModalKind),
    MenuIcon(String),
    Dropdown(usize, bool),
    ChatOpened,
}

/// Records every call so tests can assert on what the page would show.
#[derive(Default)]
pub struct RecordingSurface {
    events: Mutex<Vec<SurfaceEvent>>,
    typing_nodes: Mutex<usize>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, event: SurfaceEvent) {
        self.events.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<SurfaceEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn typing_nodes(&self) -> usize {
        *self.typing_nodes.lock().unwrap()
    }

    pub fn messages(&self) -> Vec<(Sender, String)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SurfaceEvent::Message(m) => Some((m.sender, m.html)),
                _ => None,
            })
            .collect()
    }

    pub fn notifications(&self) -> Vec<(String, NotificationLevel)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SurfaceEvent::Notification(text, level) => Some((text, level)),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn append_message(&self, message: &RenderedMessage) {
        self.record(SurfaceEvent::Message(message.clone()));
    }

    fn show_typing_placeholder(&self) {
        *self.typing_nodes.lock().unwrap() += 1;
        self.record(SurfaceEvent::TypingShown);
    }

    fn remove_typing_placeholder(&self) -> bool {
        let mut nodes = self.typing_nodes.lock().unwrap();
        if *nodes == 0 {
            return false;
        }
        *nodes -= 1;
        drop(nodes);
        self.record(SurfaceEvent::TypingRemoved);
        true
    }

    fn show_notification(&self, message: &str, level: NotificationLevel) {
        self.record(SurfaceEvent::Notification(message.to_string(), level));
    }

    fn navigate(&self, url: &str) {
        self.record(SurfaceEvent::Navigate(url.to_string()));
    }

    fn apply_theme(&self, theme: Theme, icon_class: &str) {
        self.record(SurfaceEvent::Theme(theme, icon_class.to_string()));
    }

    fn open_modal(&self, modal: &Modal) {
        self.record(SurfaceEvent::ModalOpened(modal.kind));
    }

    fn close_modal(&self, kind: ModalKind) {
        self.record(SurfaceEvent::ModalClosed(kind));
    }

    fn set_menu_icon(&self, icon_class: &str) {
        self.record(SurfaceEvent::MenuIcon(icon_class.to_string()));
    }

    fn set_dropdown_visible(&self, index: usize, visible: bool) {
        self.record(SurfaceEvent::Dropdown(index, visible));
    }

    fn open_chat(&self) {
        self.record(SurfaceEvent::ChatOpened);
    }
}
