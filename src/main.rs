use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use dotenvy::dotenv;
use quickchat_client::codec::DataUriCodec;
use quickchat_client::config;
use quickchat_client::network::{BackendClient, HttpBackend, Services};
use quickchat_client::ui::ChatApp;
use tokio::sync::mpsc;

#[derive(Parser)]
#[command(name = "quickchat", version, about = "Desktop client for the QuickChat service")]
struct Cli {
    /// Path to JSON config file
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH, value_name = "FILE")]
    config: String,
    /// Overrides `server_url` from the config file
    #[arg(long, value_name = "URL")]
    server_url: Option<String>,
    /// Session token; overrides `token` from the config file
    #[arg(long, env = "QUICKCHAT_TOKEN", hide_env_values = true)]
    token: Option<String>,
    /// Write the effective settings back to the config file
    #[arg(long)]
    save_config: bool,
}

#[tokio::main]
async fn main() -> Result<(), eframe::Error> {
    dotenv().ok();
    // Khởi tạo Logger để debug
    env_logger::init();

    let cli = Cli::parse();
    let config_path = Path::new(&cli.config);
    let mut app_config = config::AppConfig::load(config_path);
    app_config.apply_overrides(cli.server_url, cli.token);
    if cli.save_config {
        if let Err(err) = app_config.save(config_path) {
            log::error!("Failed to write config {}: {err}", config_path.display());
        }
    }

    run_client(app_config).await
}

async fn run_client(app_config: config::AppConfig) -> Result<(), eframe::Error> {
    let token = app_config.token.unwrap_or_else(|| {
        log::warn!("No session token configured; requests will be rejected");
        String::new()
    });
    let backend = Arc::new(HttpBackend::new(&app_config.server_url, token));
    let services = Services {
        messages: backend.clone(),
        profile: backend.clone(),
        presence: backend,
        codec: Arc::new(DataUriCodec::new(app_config.max_image_bytes)),
    };

    // UI -> Backend
    let (cmd_tx, cmd_rx) = mpsc::channel(100);
    // Backend -> UI
    let (event_tx, event_rx) = mpsc::channel(100);

    // Backend chạy ngầm
    tokio::spawn(BackendClient::new(services, event_tx, cmd_rx).run());

    // UI chạy trên Main Thread
    let options = eframe::NativeOptions::default();
    let mut event_rx = Some(event_rx);
    let server_url = app_config.server_url.clone();

    eframe::run_native(
        "QuickChat",
        options,
        Box::new(move |cc| {
            let event_receiver = event_rx
                .take()
                .ok_or("ChatApp should only be initialized once")?;

            log::info!("Client started against {server_url}");

            Ok(Box::new(ChatApp::new(cc, cmd_tx.clone(), event_receiver)))
        }),
    )
}
