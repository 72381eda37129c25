use std::time::Duration;

use reqwest::Client;
use tokio::time::{MissedTickBehavior, interval};

pub mod config;
use config::load_config;
pub mod cycle;
use cycle::run_cycle;
pub mod display;
pub mod health;
pub mod ping;
use ping::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    };

    let client = match Client::builder()
        .timeout(Duration::from_secs(config.display.timeout_seconds))
        .user_agent(concat!("pingbox/", env!("CARGO_PKG_VERSION")))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            log::error!("Failed to create HTTP client: {e}");
            std::process::exit(1);
        }
    };

    let runner = SystemPing::new(
        config.probe.packet_count,
        Duration::from_secs(config.probe.timeout_seconds),
    );

    log::info!(
        "Probing {} every {}s, reporting to {}",
        config.probe.host,
        config.probe.polling_interval_seconds,
        config.display.endpoint
    );

    let mut ticker = interval(Duration::from_secs(config.probe.polling_interval_seconds));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        if let Err(e) = run_cycle(&runner, &client, &config).await {
            println!("[{}] Failed to update display: {e}", config.probe.host);
        }
    }
}
