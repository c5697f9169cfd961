use super::format;
use super::modal::{ Modal, ModalBody, ModalKind };
use super::theme::Theme;
use super::{ NotificationLevel, RenderedMessage, Surface };
use crate::models::chat::Sender;
use std::io::{ self, Write };
use std::sync::Mutex;

/// Renders the page onto a terminal.
pub struct TerminalSurface {
    typing: Mutex<bool>,
    color: bool,
}

impl TerminalSurface {
    pub fn new(color: bool) -> Self {
        Self {
            typing: Mutex::new(false),
            color,
        }
    }

    fn print(&self, line: &str) {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        // A closed stdout leaves nothing useful to report to.
        let _ = writeln!(out, "{}", line);
        let _ = out.flush();
    }
}

impl Surface for TerminalSurface {
    fn append_message(&self, message: &RenderedMessage) {
        let body = if self.color {
            format::to_ansi(&message.spans)
        } else {
            format::to_plain(&message.spans)
        };
        let who = match message.sender {
            Sender::User => "You",
            Sender::Bot => "SafeNest",
        };
        self.print(&format!("[{}] {}: {}", message.time, who, body));
    }

    fn show_typing_placeholder(&self) {
        *self.typing.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = true;
        self.print("SafeNest is typing...");
    }

    fn remove_typing_placeholder(&self) -> bool {
        let mut typing = self.typing.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        std::mem::replace(&mut *typing, false)
    }

    fn show_notification(&self, message: &str, level: NotificationLevel) {
        self.print(&format!("({}) {}", level, message));
    }

    fn navigate(&self, url: &str) {
        self.print(&format!("-> {}", url));
    }

    fn apply_theme(&self, theme: Theme, _icon_class: &str) {
        self.print(&format!("Theme: {}", theme));
    }

    fn open_modal(&self, modal: &Modal) {
        self.print(&format!("== {} ==", modal.title));
        match &modal.body {
            ModalBody::PathOptions(options) => {
                for option in options.iter() {
                    self.print(
                        &format!("  /path {:<10} {}: {}", option.key, option.title, option.description)
                    );
                }
            }
            ModalBody::ConsultationForm => {
                self.print("  /consult name | email | service | message");
                self.print("  services: smart-home, security, architecture, energy");
            }
        }
    }

    fn close_modal(&self, kind: ModalKind) {
        self.print(&format!("(closed {:?})", kind));
    }

    fn set_menu_icon(&self, icon_class: &str) {
        let state = if icon_class.ends_with("fa-times") { "open" } else { "closed" };
        self.print(&format!("Menu {}", state));
    }

    fn set_dropdown_visible(&self, index: usize, visible: bool) {
        self.print(&format!("Dropdown {} {}", index, if visible { "shown" } else { "hidden" }));
    }

    fn open_chat(&self) {
        self.print("Chat opened");
    }
}
