use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Site Connection Args ---
    /// Base URL of the SafeNest site (all API calls are same-origin to it)
    #[arg(long, env = "SAFENEST_BASE_URL", default_value = "http://127.0.0.1:8000")]
    pub base_url: String,

    /// Initial cookies in `Cookie` header form (e.g., "sessionid=...; csrftoken=...")
    #[arg(long, env = "SAFENEST_COOKIES")]
    pub cookies: Option<String>,

    /// Name of the cookie carrying the CSRF token
    #[arg(long, env = "SAFENEST_CSRF_COOKIE", default_value = "csrftoken")]
    pub csrf_cookie: String,

    /// Fetch the landing page on startup so the server can set the CSRF cookie
    #[arg(long, env = "SAFENEST_PRIME_CSRF", default_value = "false")]
    pub prime_csrf: bool,

    // --- Local State Args ---
    /// JSON file holding persisted client state such as the theme
    #[arg(long, env = "SAFENEST_STATE_PATH", default_value = ".safenest/state.json")]
    pub state_path: String,

    // --- Presentation Args ---
    /// Viewport width in pixels; at 768 or below menus behave like the mobile layout
    #[arg(long, env = "SAFENEST_VIEWPORT_WIDTH", default_value = "1280")]
    pub viewport_width: u32,

    /// Number of navigation dropdowns on the page
    #[arg(long, env = "SAFENEST_DROPDOWNS", default_value = "3")]
    pub dropdowns: usize,

    /// Skip the assistant's welcome message
    #[arg(long, env = "SAFENEST_NO_WELCOME", default_value = "false")]
    pub no_welcome: bool,

    /// Disable ANSI styling of chat messages
    #[arg(long, env = "SAFENEST_NO_COLOR", default_value = "false")]
    pub no_color: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["safenest"]).unwrap();
        assert_eq!(args.csrf_cookie, "csrftoken");
        assert_eq!(args.viewport_width, 1280);
        assert!(!args.prime_csrf);
    }

    #[test]
    fn test_overrides() {
        let args = Args::try_parse_from([
            "safenest",
            "--base-url",
            "https://safenest.example",
            "--cookies",
            "csrftoken=abc",
            "--viewport-width",
            "600",
        ]).unwrap();
        assert_eq!(args.base_url, "https://safenest.example");
        assert_eq!(args.cookies.as_deref(), Some("csrftoken=abc"));
        assert_eq!(args.viewport_width, 600);
    }
}
