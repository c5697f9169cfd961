use crate::api::{ ApiClient, CONSULTATION_SUBMIT_ROUTE };
use crate::models::api::SubmitResponse;
use crate::ui::modal::{ ModalKind, Modals };
use crate::ui::{ NotificationLevel, Surface };
use log::{ error, info, warn };
use serde::{ Deserialize, Serialize };
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Service {
    SmartHome,
    Security,
    Architecture,
    Energy,
}

impl Service {
    pub const ALL: [Service; 4] = [
        Service::SmartHome,
        Service::Security,
        Service::Architecture,
        Service::Energy,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Service::SmartHome => "smart-home",
            Service::Security => "security",
            Service::Architecture => "architecture",
            Service::Energy => "energy",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Service::SmartHome => "Smart Home Setup",
            Service::Security => "Security Systems",
            Service::Architecture => "AI Architecture Design",
            Service::Energy => "Energy Optimization",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Service {
    type Err = ConsultationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Service::ALL
            .into_iter()
            .find(|service| service.as_str() == s)
            .ok_or_else(|| ConsultationError::UnknownService(s.to_string()))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConsultationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("invalid email address: {0}")]
    InvalidEmail(String),
    #[error("unknown service: {0}")]
    UnknownService(String),
}

impl ConsultationError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConsultationError::MissingField(_) => "Please fill in all required fields.",
            ConsultationError::InvalidEmail(_) => "Please enter a valid email address.",
            ConsultationError::UnknownService(_) => "Please select a valid service.",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ConsultationRequest {
    pub name: String,
    pub email: String,
    pub service: Service,
    pub message: String,
}

impl ConsultationRequest {
    /// Validates raw form fields. The message is optional.
    pub fn from_form(
        name: &str,
        email: &str,
        service: &str,
        message: &str
    ) -> Result<Self, ConsultationError> {
        let name = name.trim();
        let email = email.trim();
        let service = service.trim();
        if name.is_empty() {
            return Err(ConsultationError::MissingField("name"));
        }
        if email.is_empty() {
            return Err(ConsultationError::MissingField("email"));
        }
        if service.is_empty() {
            return Err(ConsultationError::MissingField("service"));
        }
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {}
            _ => {
                return Err(ConsultationError::InvalidEmail(email.to_string()));
            }
        }
        Ok(Self {
            name: name.to_string(),
            email: email.to_string(),
            service: service.parse()?,
            message: message.trim().to_string(),
        })
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    Submitted,
    Rejected,
    Failed,
    Invalid,
}

pub struct ConsultationClient {
    api: Arc<ApiClient>,
    surface: Arc<dyn Surface>,
    modals: Arc<Modals>,
}

impl ConsultationClient {
    pub fn new(api: Arc<ApiClient>, surface: Arc<dyn Surface>, modals: Arc<Modals>) -> Self {
        Self { api, surface, modals }
    }

    pub async fn submit_form(
        &self,
        name: &str,
        email: &str,
        service: &str,
        message: &str
    ) -> SubmitOutcome {
        match ConsultationRequest::from_form(name, email, service, message) {
            Ok(request) => self.submit(&request).await,
            Err(e) => {
                warn!("Consultation form rejected: {}", e);
                self.surface.show_notification(e.user_message(), NotificationLevel::Error);
                SubmitOutcome::Invalid
            }
        }
    }

    pub async fn submit(&self, request: &ConsultationRequest) -> SubmitOutcome {
        info!("Submitting consultation request for {}", request.service);
        match self.api.post_json_any_status::<_, SubmitResponse>(CONSULTATION_SUBMIT_ROUTE, request).await {
            Ok(resp) if resp.success => {
                self.surface.show_notification(
                    "Consultation request submitted successfully!",
                    NotificationLevel::Success
                );
                self.modals.close(ModalKind::Consultation);
                SubmitOutcome::Submitted
            }
            Ok(_) => {
                self.surface.show_notification(
                    "Failed to submit request. Please try again.",
                    NotificationLevel::Error
                );
                SubmitOutcome::Rejected
            }
            Err(e) => {
                error!("Consultation submission error: {}", e);
                self.surface.show_notification(
                    "Network error. Please try again.",
                    NotificationLevel::Error
                );
                SubmitOutcome::Failed
            }
        }
    }
}
