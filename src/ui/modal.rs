use super::{ NotificationLevel, Surface };
use log::debug;
use std::collections::BTreeSet;
use std::sync::{ Arc, Mutex };
use std::time::Duration;
use tokio::task::JoinHandle;

pub const REDIRECT_DELAY: Duration = Duration::from_millis(1500);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ModalKind {
    GetStarted,
    Consultation,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathOption {
    pub key: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

pub const PATH_OPTIONS: &[PathOption] = &[
    PathOption {
        key: "homeowner",
        title: "Homeowner",
        description: "Smart home automation and security",
        icon: "fas fa-home",
    },
    PathOption {
        key: "architect",
        title: "Architect",
        description: "AI-powered design tools and consultation",
        icon: "fas fa-drafting-compass",
    },
    PathOption {
        key: "developer",
        title: "Developer",
        description: "IoT integration and API access",
        icon: "fas fa-code",
    },
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModalBody {
    PathOptions(&'static [PathOption]),
    ConsultationForm,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Modal {
    pub kind: ModalKind,
    pub title: &'static str,
    pub body: ModalBody,
}

pub fn path_url(path: &str) -> &'static str {
    match path {
        "homeowner" => "/smart-home/",
        "architect" => "/architecture/",
        "developer" => "/api-docs/",
        _ => "/",
    }
}

pub struct Modals {
    open: Mutex<BTreeSet<ModalKind>>,
    surface: Arc<dyn Surface>,
}

impl Modals {
    pub fn new(surface: Arc<dyn Surface>) -> Self {
        Self {
            open: Mutex::new(BTreeSet::new()),
            surface,
        }
    }

    fn show(&self, modal: Modal) {
        self.open
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(modal.kind);
        self.surface.open_modal(&modal);
    }

    pub fn show_get_started(&self) {
        self.show(Modal {
            kind: ModalKind::GetStarted,
            title: "Get Started with SafeNest",
            body: ModalBody::PathOptions(PATH_OPTIONS),
        });
    }

    pub fn show_consultation(&self) {
        self.show(Modal {
            kind: ModalKind::Consultation,
            title: "Schedule Consultation",
            body: ModalBody::ConsultationForm,
        });
    }

    pub fn is_open(&self, kind: ModalKind) -> bool {
        self.open
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains(&kind)
    }

    /// Closing a modal that is not open does nothing.
    pub fn close(&self, kind: ModalKind) {
        let removed = self.open
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(&kind);
        if removed {
            self.surface.close_modal(kind);
        } else {
            debug!("Ignoring close for {:?}, not open", kind);
        }
    }

    /// Greets the visitor and redirects to the chosen section after
    /// [`REDIRECT_DELAY`].
    pub fn select_path(&self, path: &str) -> JoinHandle<()> {
        self.surface.show_notification(
            &format!("Welcome! Redirecting to {} section...", path),
            NotificationLevel::Success
        );
        let surface = self.surface.clone();
        let url = path_url(path);
        tokio::spawn(async move {
            tokio::time::sleep(REDIRECT_DELAY).await;
            surface.navigate(url);
        })
    }
}
