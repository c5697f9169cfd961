use crate::api::ApiClient;
use crate::chat::{ quick_action_message, ChatController };
use crate::cli::Args;
use crate::consultation::ConsultationClient;
use crate::devices::DeviceClient;
use crate::models::chat::Sender;
use crate::ui::gesture::{ self, Gesture, Point };
use crate::ui::modal::{ ModalKind, Modals };
use crate::ui::nav::{ Dropdowns, MobileMenu };
use crate::ui::storage::LocalStorage;
use crate::ui::theme::ThemeController;
use crate::ui::{ self, Surface };
use futures::future::join_all;
use log::{ debug, info, warn };
use std::error::Error;
use std::ops::ControlFlow;
use std::sync::Arc;
use tokio::io::{ AsyncBufReadExt, BufReader };
use tokio::task::JoinHandle;

pub const HELP: &str = "\
Type a message to chat with the assistant, or use a command:
  /quick <lights|security|temperature|energy|design>
  /lights  /security  /temp <celsius>
  /theme  /menu  /dropdown <n>
  /start  /path <homeowner|architect|developer>  /close
  /consult  /consult <name> | <email> | <service> | <message>
  /demo  /swipe <dx> <dy>  /service <name>
  /history  /help  /quit";

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Chat(String),
    Quick(String),
    Lights,
    Security,
    Temperature(String),
    Theme,
    Menu,
    Dropdown(usize),
    GetStarted,
    Path(String),
    Close,
    ConsultOpen,
    ConsultSubmit {
        name: String,
        email: String,
        service: String,
        message: String,
    },
    Demo,
    Swipe(f64, f64),
    Service(String),
    History,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Command {
        let Some(rest) = line.trim_start().strip_prefix('/') else {
            return Command::Chat(line.to_string());
        };
        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest.trim(), ""),
        };
        match name {
            "quick" => Command::Quick(arg.to_string()),
            "lights" => Command::Lights,
            "security" => Command::Security,
            "temp" => Command::Temperature(arg.to_string()),
            "theme" => Command::Theme,
            "menu" => Command::Menu,
            "dropdown" => match arg.parse() {
                Ok(index) => Command::Dropdown(index),
                Err(_) => Command::Unknown(line.trim().to_string()),
            },
            "start" => Command::GetStarted,
            "path" => Command::Path(arg.to_string()),
            "close" => Command::Close,
            "consult" if arg.is_empty() => Command::ConsultOpen,
            "consult" => {
                let mut fields = arg.splitn(4, '|').map(|f| f.trim().to_string());
                Command::ConsultSubmit {
                    name: fields.next().unwrap_or_default(),
                    email: fields.next().unwrap_or_default(),
                    service: fields.next().unwrap_or_default(),
                    message: fields.next().unwrap_or_default(),
                }
            }
            "demo" => Command::Demo,
            "swipe" => {
                let deltas: Vec<f64> = arg
                    .split_whitespace()
                    .filter_map(|d| d.parse().ok())
                    .collect();
                match deltas.as_slice() {
                    [dx, dy] => Command::Swipe(*dx, *dy),
                    _ => Command::Unknown(line.trim().to_string()),
                }
            }
            "service" => Command::Service(arg.to_string()),
            "history" => Command::History,
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            _ => Command::Unknown(line.trim().to_string()),
        }
    }
}

pub struct Session {
    surface: Arc<dyn Surface>,
    devices: Arc<DeviceClient>,
    chat: Arc<ChatController>,
    consultation: Arc<ConsultationClient>,
    theme: ThemeController,
    menu: MobileMenu,
    dropdowns: Dropdowns,
    modals: Arc<Modals>,
    in_flight: Vec<JoinHandle<()>>,
}

impl Session {
    pub fn new(
        args: &Args,
        api: Arc<ApiClient>,
        surface: Arc<dyn Surface>
    ) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let storage = Arc::new(LocalStorage::open(&args.state_path)?);
        let devices = Arc::new(DeviceClient::new(api.clone(), surface.clone()));
        let modals = Arc::new(Modals::new(surface.clone()));
        Ok(Self {
            chat: Arc::new(ChatController::new(api.clone(), devices.clone(), surface.clone())),
            consultation: Arc::new(ConsultationClient::new(api, surface.clone(), modals.clone())),
            theme: ThemeController::load(storage, surface.clone()),
            menu: MobileMenu::new(surface.clone()),
            dropdowns: Dropdowns::new(args.dropdowns, args.viewport_width, surface.clone()),
            modals,
            devices,
            surface,
            in_flight: Vec::new(),
        })
    }

    pub fn chat(&self) -> &Arc<ChatController> {
        &self.chat
    }

    fn track(&mut self, handle: JoinHandle<()>) {
        self.in_flight.retain(|h| !h.is_finished());
        self.in_flight.push(handle);
    }

    fn spawn_device<F, Fut>(&mut self, call: F)
        where F: FnOnce(Arc<DeviceClient>) -> Fut, Fut: std::future::Future<Output = bool> + Send + 'static
    {
        let fut = call(self.devices.clone());
        self.track(
            tokio::spawn(async move {
                fut.await;
            })
        );
    }

    /// Captures the input now and spawns only the request, so a later line
    /// cannot overwrite it.
    fn spawn_send(&mut self) {
        if let Some(request) = self.chat.begin_send() {
            let chat = self.chat.clone();
            self.track(
                tokio::spawn(async move {
                    chat.finish_send(request).await;
                })
            );
        }
    }

    pub fn handle(&mut self, command: Command) -> ControlFlow<()> {
        debug!("Handling {:?}", command);
        match command {
            Command::Chat(text) => {
                self.chat.set_input(&text);
                self.spawn_send();
            }
            Command::Quick(key) => match quick_action_message(&key) {
                Some(message) => {
                    self.chat.set_input(message);
                    self.spawn_send();
                }
                None => debug!("Ignoring unknown quick action '{}'", key),
            },
            Command::Lights => self.spawn_device(|d| async move { d.toggle_all_lights().await }),
            Command::Security => self.spawn_device(|d| async move { d.activate_security().await }),
            Command::Temperature(raw) => {
                self.spawn_device(|d| async move { d.adjust_temperature(&raw).await.unwrap_or(false) })
            }
            Command::Theme => {
                if let Err(e) = self.theme.toggle() {
                    debug!("Theme kept for this run only: {}", e);
                }
            }
            Command::Menu => {
                self.menu.toggle();
            }
            Command::Dropdown(index) => {
                if !self.dropdowns.click(index) {
                    if self.dropdowns.is_visible(index) {
                        self.dropdowns.mouse_leave(index);
                    } else {
                        self.dropdowns.mouse_enter(index);
                    }
                }
            }
            Command::GetStarted => self.modals.show_get_started(),
            Command::Path(path) => {
                let handle = self.modals.select_path(&path);
                self.track(handle);
            }
            Command::Close => {
                self.modals.close(ModalKind::GetStarted);
                self.modals.close(ModalKind::Consultation);
            }
            Command::ConsultOpen => self.modals.show_consultation(),
            Command::ConsultSubmit { name, email, service, message } => {
                let consultation = self.consultation.clone();
                self.track(
                    tokio::spawn(async move {
                        consultation.submit_form(&name, &email, &service, &message).await;
                    })
                );
            }
            Command::Demo => {
                let chat = self.chat.clone();
                self.track(
                    tokio::spawn(async move {
                        chat.start_demo().await;
                    })
                );
            }
            Command::Swipe(dx, dy) => {
                let start = Point { x: 0.0, y: 0.0 };
                for gesture in gesture::classify(start, Point { x: dx, y: dy }) {
                    match gesture {
                        Gesture::SwipeRight => {
                            self.spawn_device(|d| async move { d.toggle_all_lights().await })
                        }
                        Gesture::SwipeLeft => {
                            self.spawn_device(|d| async move { d.activate_security().await })
                        }
                        Gesture::SwipeUp => self.surface.open_chat(),
                    }
                }
            }
            Command::Service(name) => ui::track_service_click(&name),
            Command::History => {
                for message in self.chat.history() {
                    let who = match message.sender {
                        Sender::User => "You",
                        Sender::Bot => "SafeNest",
                    };
                    println!("{} {}: {}", message.timestamp.to_rfc3339(), who, message.text);
                }
            }
            Command::Help => println!("{}", HELP),
            Command::Quit => {
                return ControlFlow::Break(());
            }
            Command::Unknown(line) => {
                warn!("Unknown command: {}", line);
                println!("Unknown command. Type /help for the list.");
            }
        }
        ControlFlow::Continue(())
    }

    /// Waits for every spawned request to settle.
    pub async fn drain(&mut self) {
        let pending = std::mem::take(&mut self.in_flight);
        if !pending.is_empty() {
            info!("Waiting for {} in-flight request(s)", pending.len());
        }
        join_all(pending).await;
    }

    /// Reads commands from stdin until `/quit` or end of input.
    pub async fn run(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            if self.handle(Command::parse(&line)).is_break() {
                break;
            }
        }
        self.drain().await;
        Ok(())
    }
}
