pub mod actions;

use crate::api::ApiClient;
use crate::devices::DeviceClient;
use crate::models::api::ChatRequest;
use crate::models::chat::{ ChatHistory, ChatMessage, Sender };
use crate::ui::{ NotificationLevel, RenderedMessage, Surface };
use actions::ActionDispatcher;
use log::{ error, info, warn };
use std::sync::{ Arc, Mutex, MutexGuard };
use std::time::Duration;
use tokio::task::JoinHandle;
use uuid::Uuid;

pub const ERROR_REPLY: &str = "Sorry, I encountered an error. Please try again.";
pub const CONNECTION_REPLY: &str =
    "Sorry, I'm having trouble connecting. Please check your internet connection.";
pub const DEMO_PROMPT: &str = "Start demo mode";
pub const DEMO_DELAY: Duration = Duration::from_millis(500);

pub const WELCOME_MESSAGE: &str =
    "Hello! I'm your SafeNest AI Assistant. I can help you with:

🏠 **Smart Home Control**
• Control lights, temperature, and devices
• Monitor energy usage and optimization
• Manage security systems and alerts

🏗️ **Architecture & Design**
• Generate floor plans and 3D models
• Recommend materials and layouts
• Building code compliance assistance

🤖 **Automation & Intelligence**
• Set up automated routines
• Voice and gesture commands
• Predictive analytics and suggestions

How can I assist you today?";

/// Canned prompt behind a quick-action button.
pub fn quick_action_message(key: &str) -> Option<&'static str> {
    match key {
        "lights" => Some("Toggle all lights"),
        "security" => Some("Show security status"),
        "temperature" => Some("What's the current temperature?"),
        "energy" => Some("Show energy usage and optimization"),
        "design" => Some("Help me design a modern kitchen"),
        _ => None,
    }
}

#[derive(Debug)]
pub enum SendOutcome {
    /// Nothing to send.
    Ignored,
    /// The assistant answered; spawned device calls are returned.
    Answered {
        actions: Vec<JoinHandle<bool>>,
    },
    /// The assistant replied with `success: false`.
    Declined,
    /// Transport or decode failure.
    Unreachable,
}

#[derive(Default)]
struct ChatState {
    history: ChatHistory,
    is_typing: bool,
    input: String,
}

pub struct ChatController {
    id: Uuid,
    state: Mutex<ChatState>,
    api: Arc<ApiClient>,
    dispatcher: ActionDispatcher,
    surface: Arc<dyn Surface>,
}

impl ChatController {
    pub fn new(api: Arc<ApiClient>, devices: Arc<DeviceClient>, surface: Arc<dyn Surface>) -> Self {
        let id = Uuid::new_v4();
        info!("Chat session {} started", id);
        Self {
            id,
            state: Mutex::new(ChatState::default()),
            api,
            dispatcher: ActionDispatcher::new(devices, surface.clone()),
            surface,
        }
    }

    // Guards are never held across an await.
    fn state(&self) -> MutexGuard<'_, ChatState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn set_input(&self, text: &str) {
        self.state().input = text.to_string();
    }

    pub fn input(&self) -> String {
        self.state().input.clone()
    }

    pub fn history(&self) -> Vec<ChatMessage> {
        self.state().history.iter().cloned().collect()
    }

    pub fn is_typing(&self) -> bool {
        self.state().is_typing
    }

    /// Sends the current input. Failures are reported in the chat and never
    /// returned as errors; there is no retry.
    pub async fn send_message(&self) -> SendOutcome {
        match self.begin_send() {
            Some(request) => self.finish_send(request).await,
            None => SendOutcome::Ignored,
        }
    }

    /// Takes the trimmed input, records and renders it, clears the input and
    /// shows the typing indicator. Returns `None` for blank input.
    pub fn begin_send(&self) -> Option<ChatRequest> {
        let message = {
            let mut state = self.state();
            let trimmed = state.input.trim().to_string();
            if trimmed.is_empty() {
                return None;
            }
            state.input.clear();
            trimmed
        };

        self.add_message_to_chat(&message, Sender::User);
        self.show_typing_indicator();

        Some(ChatRequest {
            message,
            history: self.state().history.context(),
        })
    }

    /// Posts a request prepared by [`begin_send`](Self::begin_send) and
    /// renders the reply.
    pub async fn finish_send(&self, request: ChatRequest) -> SendOutcome {
        let result = self.api.chat(&request).await;
        self.remove_typing_indicator();

        match result {
            Ok(resp) if resp.success => {
                self.add_message_to_chat(resp.response.as_deref().unwrap_or_default(), Sender::Bot);
                let actions = match resp.actions {
                    Some(descriptors) => self.dispatcher.dispatch_descriptors(descriptors),
                    None => Vec::new(),
                };
                SendOutcome::Answered { actions }
            }
            Ok(_) => {
                warn!("Chat session {}: assistant reported failure", self.id);
                self.add_message_to_chat(ERROR_REPLY, Sender::Bot);
                SendOutcome::Declined
            }
            Err(e) => {
                error!("Chat session {}: chat error: {}", self.id, e);
                self.add_message_to_chat(CONNECTION_REPLY, Sender::Bot);
                SendOutcome::Unreachable
            }
        }
    }

    /// Renders `text` and records it in the history.
    pub fn add_message_to_chat(&self, text: &str, sender: Sender) -> ChatMessage {
        let message = ChatMessage::new(text, sender);
        self.surface.append_message(&RenderedMessage::from_message(&message));
        self.state().history.push(message.clone());
        message
    }

    pub fn show_typing_indicator(&self) {
        {
            let mut state = self.state();
            if state.is_typing {
                return;
            }
            state.is_typing = true;
        }
        self.surface.show_typing_placeholder();
    }

    pub fn remove_typing_indicator(&self) {
        self.state().is_typing = false;
        self.surface.remove_typing_placeholder();
    }

    /// Unknown keys do nothing.
    pub async fn quick_action(&self, key: &str) -> SendOutcome {
        match quick_action_message(key) {
            Some(message) => {
                self.set_input(message);
                self.send_message().await
            }
            None => SendOutcome::Ignored,
        }
    }

    pub fn add_welcome_message(&self) {
        self.add_message_to_chat(WELCOME_MESSAGE, Sender::Bot);
    }

    pub async fn start_demo(&self) -> SendOutcome {
        self.surface.show_notification("Starting SafeNest demo...", NotificationLevel::Info);
        self.surface.open_chat();
        tokio::time::sleep(DEMO_DELAY).await;
        self.set_input(DEMO_PROMPT);
        self.send_message().await
    }
}
