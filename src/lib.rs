pub mod api;
pub mod chat;
pub mod cli;
pub mod consultation;
pub mod devices;
pub mod models;
pub mod session;
pub mod ui;

#[cfg(test)]
mod test_server;

use api::ApiClient;
use cli::Args;
use log::{ info, warn };
use session::Session;
use std::error::Error;
use std::sync::Arc;
use ui::terminal::TerminalSurface;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Client Configuration ---");
    info!("Site Base URL: {}", args.base_url);
    info!("Initial Cookies Provided: {}", args.cookies.is_some());
    info!("CSRF Cookie Name: {}", args.csrf_cookie);
    info!("Prime CSRF: {}", args.prime_csrf);
    info!("State Path: {}", args.state_path);
    info!("Viewport Width: {}", args.viewport_width);
    info!("Welcome Message: {}", !args.no_welcome);
    info!("----------------------------");

    let api = Arc::new(ApiClient::from_args(&args)?);
    if args.prime_csrf {
        if let Err(e) = api.prime_csrf().await {
            warn!("Could not prime CSRF cookie from {}: {}", api.base_url(), e);
        }
    }

    let surface = Arc::new(TerminalSurface::new(!args.no_color));
    let mut session = Session::new(&args, api, surface)?;
    if !args.no_welcome {
        session.chat().add_welcome_message();
    }
    println!("{}", session::HELP);
    session.run().await
}
