use crate::api::{
    ApiClient,
    LIGHTS_TOGGLE_ALL_ROUTE,
    SECURITY_ACTIVATE_ROUTE,
    THERMOSTAT_SET_ROUTE,
};
use crate::models::api::{ EmptyRequest, TemperatureRequest };
use crate::ui::{ NotificationLevel, Surface };
use log::{ debug, error, info };
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::sync::Arc;

/// Device-control calls. Every call reports its own outcome through a
/// notification and returns whether it succeeded; none of them fail.
pub struct DeviceClient {
    api: Arc<ApiClient>,
    surface: Arc<dyn Surface>,
}

impl DeviceClient {
    pub fn new(api: Arc<ApiClient>, surface: Arc<dyn Surface>) -> Self {
        Self { api, surface }
    }

    async fn control<B: Serialize + ?Sized>(
        &self,
        route: &str,
        body: &B,
        success: &str,
        failure: &str
    ) -> bool {
        match self.api.post_json::<_, JsonValue>(route, body).await {
            Ok(reply) => {
                debug!("{} replied: {}", route, reply);
                self.surface.show_notification(success, NotificationLevel::Success);
                true
            }
            Err(e) => {
                error!("Device control error on {}: {}", route, e);
                self.surface.show_notification(failure, NotificationLevel::Error);
                false
            }
        }
    }

    pub async fn toggle_all_lights(&self) -> bool {
        info!("Toggling all lights");
        self.control(
            LIGHTS_TOGGLE_ALL_ROUTE,
            &EmptyRequest::default(),
            "All lights toggled",
            "Failed to control lights"
        ).await
    }

    pub async fn activate_security(&self) -> bool {
        info!("Activating security mode");
        self.control(
            SECURITY_ACTIVATE_ROUTE,
            &EmptyRequest::default(),
            "Security mode activated",
            "Failed to activate security mode"
        ).await
    }

    pub async fn set_temperature(&self, temperature: f64) -> bool {
        info!("Setting thermostat to {}°C", temperature);
        self.control(
            THERMOSTAT_SET_ROUTE,
            &TemperatureRequest { temperature },
            &format!("Temperature set to {}°C", temperature),
            "Failed to set temperature"
        ).await
    }

    /// Takes a typed-in value. Blank or non-numeric input is dropped and
    /// `None` is returned.
    pub async fn adjust_temperature(&self, raw: &str) -> Option<bool> {
        match parse_temperature(raw) {
            Some(temperature) => Some(self.set_temperature(temperature as f64).await),
            None => {
                debug!("Ignoring temperature input {:?}", raw);
                None
            }
        }
    }
}

/// Leading integer of `raw`, ignoring surrounding whitespace and trailing
/// junk ("21°C" reads as 21).
pub fn parse_temperature(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    let end = trimmed
        .char_indices()
        .find(|(i, c)| !(c.is_ascii_digit() || (*i == 0 && (*c == '-' || *c == '+'))))
        .map(|(i, _)| i)
        .unwrap_or(trimmed.len());
    trimmed[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::DEFAULT_CSRF_COOKIE;
    use crate::test_server::{ StubBackend, StubReply };
    use crate::ui::testing::RecordingSurface;
    use serde_json::json;

    fn client(base_url: &str) -> (DeviceClient, Arc<RecordingSurface>) {
        let api = Arc::new(ApiClient::new(base_url, DEFAULT_CSRF_COOKIE, Some("csrftoken=t")).unwrap());
        let surface = Arc::new(RecordingSurface::new());
        (DeviceClient::new(api, surface.clone()), surface)
    }

    #[test]
    fn test_parse_temperature() {
        assert_eq!(parse_temperature("21"), Some(21));
        assert_eq!(parse_temperature(" 19°C "), Some(19));
        assert_eq!(parse_temperature("-4"), Some(-4));
        assert_eq!(parse_temperature(""), None);
        assert_eq!(parse_temperature("warm"), None);
    }

    #[tokio::test]
    async fn test_successful_calls_notify() {
        let backend = StubBackend::start().await;
        backend.reply(LIGHTS_TOGGLE_ALL_ROUTE, StubReply::json(json!({"toggled": 4})));
        backend.reply(THERMOSTAT_SET_ROUTE, StubReply::json(json!({})));
        let (devices, surface) = client(&backend.base_url);

        assert!(devices.toggle_all_lights().await);
        assert!(devices.set_temperature(21.5).await);

        assert_eq!(
            surface.notifications(),
            vec![
                ("All lights toggled".to_string(), NotificationLevel::Success),
                ("Temperature set to 21.5°C".to_string(), NotificationLevel::Success)
            ]
        );
        let sent = backend.requests_to(THERMOSTAT_SET_ROUTE);
        assert_eq!(sent[0].body, json!({"temperature": 21.5}));
        assert_eq!(sent[0].csrf.as_deref(), Some("t"));
    }

    #[tokio::test]
    async fn test_failures_notify_and_do_not_retry() {
        let backend = StubBackend::start().await;
        backend.reply(SECURITY_ACTIVATE_ROUTE, StubReply::raw(503, "{}"));
        backend.reply(LIGHTS_TOGGLE_ALL_ROUTE, StubReply::raw(200, "not json"));
        let (devices, surface) = client(&backend.base_url);

        assert!(!devices.activate_security().await);
        assert!(!devices.toggle_all_lights().await);

        assert_eq!(
            surface.notifications(),
            vec![
                ("Failed to activate security mode".to_string(), NotificationLevel::Error),
                ("Failed to control lights".to_string(), NotificationLevel::Error)
            ]
        );
        assert_eq!(backend.request_count(), 2);
    }

    #[tokio::test]
    async fn test_adjust_temperature_drops_invalid_input() {
        let backend = StubBackend::start().await;
        backend.reply(THERMOSTAT_SET_ROUTE, StubReply::json(json!({})));
        let (devices, surface) = client(&backend.base_url);

        assert_eq!(devices.adjust_temperature("   ").await, None);
        assert_eq!(devices.adjust_temperature("22").await, Some(true));
        assert_eq!(backend.request_count(), 1);
        assert_eq!(surface.notifications()[0].0, "Temperature set to 22°C");
    }
}
