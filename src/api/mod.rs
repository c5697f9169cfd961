use crate::cli::Args;
use crate::models::api::{ ChatRequest, ChatResponse };
use log::{ debug, info, warn };
use reqwest::cookie::{ CookieStore, Jar };
use reqwest::header::{ HeaderValue, ACCEPT, CONTENT_TYPE };
use reqwest::{ Client as HttpClient, StatusCode };
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use url::Url;

pub const CHAT_ROUTE: &str = "/api/ai/chat/";
pub const SECURITY_ACTIVATE_ROUTE: &str = "/api/security/activate/";
pub const THERMOSTAT_SET_ROUTE: &str = "/api/devices/thermostat/set/";
pub const LIGHTS_TOGGLE_ALL_ROUTE: &str = "/api/devices/lights/toggle-all/";
pub const CONSULTATION_SUBMIT_ROUTE: &str = "/api/consultation/submit/";

pub const CSRF_HEADER: &str = "X-CSRFToken";
pub const DEFAULT_CSRF_COOKIE: &str = "csrftoken";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{route} returned HTTP {status}")]
    Status {
        route: String,
        status: StatusCode,
    },
    #[error("malformed JSON from {route}: {source}")]
    Decode {
        route: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Looks up `name` in a `Cookie` header style string (`a=1; b=2`) and
/// percent-decodes its value.
pub fn get_cookie(cookies: &str, name: &str) -> Option<String> {
    let prefix = format!("{}=", name);
    cookies
        .split(';')
        .map(str::trim)
        .find_map(|cookie| cookie.strip_prefix(prefix.as_str()))
        .map(|value| {
            urlencoding
                ::decode(value)
                .map(|decoded| decoded.into_owned())
                .unwrap_or_else(|_| value.to_string())
        })
}

/// JSON-over-HTTP client for the site's same-origin API.
pub struct ApiClient {
    http: HttpClient,
    jar: Arc<Jar>,
    base_url: Url,
    csrf_cookie: String,
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        csrf_cookie: &str,
        cookies: Option<&str>
    ) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)?;
        let jar = Arc::new(Jar::default());
        if let Some(cookies) = cookies {
            for cookie in cookies.split(';').map(str::trim).filter(|c| !c.is_empty()) {
                jar.add_cookie_str(cookie, &base_url);
            }
        }
        let http = HttpClient::builder().cookie_provider(jar.clone()).build()?;
        Ok(Self {
            http,
            jar,
            base_url,
            csrf_cookie: csrf_cookie.to_string(),
        })
    }

    pub fn from_args(args: &Args) -> Result<Self, ApiError> {
        Self::new(&args.base_url, &args.csrf_cookie, args.cookies.as_deref())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn csrf_token(&self) -> Option<String> {
        let cookies = self.jar.cookies(&self.base_url)?;
        let cookies = cookies.to_str().ok()?;
        get_cookie(cookies, &self.csrf_cookie)
    }

    /// Fetches the landing page so the server can hand out its CSRF cookie.
    pub async fn prime_csrf(&self) -> Result<bool, ApiError> {
        let resp = self.http.get(self.base_url.clone()).send().await?;
        debug!("Priming request returned {}", resp.status());
        let primed = self.csrf_token().is_some();
        if primed {
            info!("CSRF cookie '{}' acquired", self.csrf_cookie);
        } else {
            warn!("Server did not set CSRF cookie '{}'", self.csrf_cookie);
        }
        Ok(primed)
    }

    async fn send_post<B>(&self, route: &str, body: &B) -> Result<reqwest::Response, ApiError>
        where B: Serialize + ?Sized
    {
        let url = self.base_url.join(route)?;
        let mut req = self.http
            .post(url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .json(body);

        match self.csrf_token() {
            Some(token) => {
                req = req.header(CSRF_HEADER, token);
            }
            None => warn!("No '{}' cookie available; posting {} without CSRF token", self.csrf_cookie, route),
        }

        Ok(req.send().await?)
    }

    /// Posts `body` and decodes the reply. Any non-2xx status is an error.
    pub async fn post_json<B, R>(&self, route: &str, body: &B) -> Result<R, ApiError>
        where B: Serialize + ?Sized, R: DeserializeOwned
    {
        let resp = self.send_post(route, body).await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                route: route.to_string(),
                status,
            });
        }
        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|source| ApiError::Decode {
            route: route.to_string(),
            source,
        })
    }

    /// Posts `body` and decodes the reply whatever the status, for endpoints
    /// that report application failures as JSON on 4xx/5xx. A non-2xx reply
    /// that is not JSON is still an `ApiError::Status`.
    pub async fn post_json_any_status<B, R>(&self, route: &str, body: &B) -> Result<R, ApiError>
        where B: Serialize + ?Sized, R: DeserializeOwned
    {
        let resp = self.send_post(route, body).await?;
        let status = resp.status();
        let bytes = resp.bytes().await?;
        match serde_json::from_slice(&bytes) {
            Ok(decoded) => {
                if !status.is_success() {
                    debug!("{} returned HTTP {} with a JSON body", route, status);
                }
                Ok(decoded)
            }
            Err(_) if !status.is_success() => {
                Err(ApiError::Status {
                    route: route.to_string(),
                    status,
                })
            }
            Err(source) => {
                Err(ApiError::Decode {
                    route: route.to_string(),
                    source,
                })
            }
        }
    }

    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ApiError> {
        debug!("Sending chat message with {} context entries", request.history.len());
        self.post_json_any_status(CHAT_ROUTE, request).await
    }
}
