use crate::devices::DeviceClient;
use crate::ui::{ NotificationLevel, Surface };
use log::debug;
use serde::{ Deserialize, Deserializer };
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// A side effect the assistant asks the page to perform.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    ToggleLights,
    ActivateSecurity,
    SetTemperature {
        #[serde(default, deserialize_with = "lenient_number")]
        value: Option<f64>,
    },
    ShowNotification {
        #[serde(default)]
        message: Option<String>,
        #[serde(default)]
        level: Option<String>,
    },
    Navigate {
        #[serde(default)]
        url: Option<String>,
    },
    /// Unknown or malformed descriptors.
    #[serde(other)]
    Unrecognized,
}

impl Action {
    pub fn from_descriptor(descriptor: JsonValue) -> Self {
        serde_json::from_value(descriptor).unwrap_or_else(|e| {
            debug!("Treating malformed action descriptor as unrecognized: {}", e);
            Action::Unrecognized
        })
    }
}

fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let raw = Option::<JsonValue>::deserialize(deserializer)?;
    Ok(match raw {
        Some(JsonValue::Number(n)) => n.as_f64(),
        Some(JsonValue::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

pub struct ActionDispatcher {
    devices: Arc<DeviceClient>,
    surface: Arc<dyn Surface>,
}

impl ActionDispatcher {
    pub fn new(devices: Arc<DeviceClient>, surface: Arc<dyn Surface>) -> Self {
        Self { devices, surface }
    }

    /// Runs the actions in order. Device calls are spawned and not awaited;
    /// their handles are returned for callers that care.
    pub fn dispatch(&self, actions: Vec<Action>) -> Vec<JoinHandle<bool>> {
        let mut pending = Vec::new();
        for action in actions {
            match action {
                Action::ToggleLights => {
                    let devices = self.devices.clone();
                    pending.push(tokio::spawn(async move { devices.toggle_all_lights().await }));
                }
                Action::ActivateSecurity => {
                    let devices = self.devices.clone();
                    pending.push(tokio::spawn(async move { devices.activate_security().await }));
                }
                Action::SetTemperature { value: Some(value) } => {
                    let devices = self.devices.clone();
                    pending.push(tokio::spawn(async move { devices.set_temperature(value).await }));
                }
                Action::ShowNotification { message: Some(message), level } => {
                    self.surface.show_notification(
                        &message,
                        NotificationLevel::parse(level.as_deref())
                    );
                }
                Action::Navigate { url: Some(url) } => {
                    self.surface.navigate(&url);
                }
                incomplete @ (Action::SetTemperature { value: None } |
                Action::ShowNotification { message: None, .. } |
                Action::Navigate { url: None }) => {
                    debug!("Dropping action with missing value: {:?}", incomplete);
                }
                Action::Unrecognized => {}
            }
        }
        pending
    }

    pub fn dispatch_descriptors(&self, descriptors: Vec<JsonValue>) -> Vec<JoinHandle<bool>> {
        self.dispatch(descriptors.into_iter().map(Action::from_descriptor).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ ApiClient, DEFAULT_CSRF_COOKIE, LIGHTS_TOGGLE_ALL_ROUTE, THERMOSTAT_SET_ROUTE };
    use crate::test_server::{ StubBackend, StubReply };
    use crate::ui::testing::{ RecordingSurface, SurfaceEvent };
    use serde_json::json;

    #[test]
    fn test_descriptor_parsing() {
        assert_eq!(Action::from_descriptor(json!({"type": "toggle_lights"})), Action::ToggleLights);
        assert_eq!(
            Action::from_descriptor(json!({"type": "toggle_lights", "room": "kitchen"})),
            Action::ToggleLights
        );
        assert_eq!(
            Action::from_descriptor(json!({"type": "set_temperature", "value": "23"})),
            Action::SetTemperature { value: Some(23.0) }
        );
        assert_eq!(
            Action::from_descriptor(json!({"type": "set_temperature"})),
            Action::SetTemperature { value: None }
        );
        assert_eq!(Action::from_descriptor(json!({"type": "launch_rocket"})), Action::Unrecognized);
        assert_eq!(Action::from_descriptor(json!({"value": 3})), Action::Unrecognized);
        assert_eq!(
            Action::from_descriptor(json!({"type": "navigate", "url": 42})),
            Action::Unrecognized
        );
    }

    #[tokio::test]
    async fn test_dispatch_runs_each_action() {
        let backend = StubBackend::start().await;
        backend.reply(LIGHTS_TOGGLE_ALL_ROUTE, StubReply::json(json!({})));
        backend.reply(THERMOSTAT_SET_ROUTE, StubReply::json(json!({})));
        let api = Arc::new(ApiClient::new(&backend.base_url, DEFAULT_CSRF_COOKIE, None).unwrap());
        let surface = Arc::new(RecordingSurface::new());
        let devices = Arc::new(DeviceClient::new(api, surface.clone()));
        let dispatcher = ActionDispatcher::new(devices, surface.clone());

        let pending = dispatcher.dispatch_descriptors(
            vec![
                json!({"type": "toggle_lights"}),
                json!({"type": "set_temperature", "value": 20}),
                json!({"type": "set_temperature"}),
                json!({"type": "show_notification", "message": "Heads up"}),
                json!({"type": "show_notification", "message": "Done", "level": "success"}),
                json!({"type": "navigate"}),
                json!({"type": "navigate", "url": "/energy/"}),
                json!({"type": "dance"})
            ]
        );
        assert_eq!(pending.len(), 2);
        for handle in pending {
            assert!(handle.await.unwrap());
        }

        assert_eq!(backend.requests_to(LIGHTS_TOGGLE_ALL_ROUTE).len(), 1);
        assert_eq!(backend.requests_to(THERMOSTAT_SET_ROUTE)[0].body, json!({"temperature": 20.0}));

        let events = surface.events();
        assert!(events.contains(&SurfaceEvent::Notification("Heads up".into(), NotificationLevel::Info)));
        assert!(events.contains(&SurfaceEvent::Notification("Done".into(), NotificationLevel::Success)));
        let navigations: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, SurfaceEvent::Navigate(_)))
            .collect();
        assert_eq!(navigations, vec![&SurfaceEvent::Navigate("/energy/".into())]);
    }
}
