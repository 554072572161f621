use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod api;
mod commands;
mod models;
mod services;
mod utils;

use api::telegram::TelegramClient;
use api::yahoo::YahooClient;
use services::watchlist_service::WatchlistStore;

/// Shared, request-independent resources; everything request-scoped lives
/// inside the handler tasks.
pub struct BotContext {
    pub telegram: TelegramClient,
    pub market: YahooClient,
    pub watchlist: WatchlistStore,
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("candlegram=debug".parse().unwrap())
                .add_directive("reqwest=warn".parse().unwrap()),
        )
        .with_target(true)
        .init();

    info!("📈 Starting candlegram bot...");

    let token = std::env::var("TELEGRAM_BOT_TOKEN").expect("TELEGRAM_BOT_TOKEN not set");

    let telegram = match TelegramClient::new(token) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create Telegram client: {}", e);
            return;
        }
    };
    let market = match YahooClient::new() {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create market data client: {}", e);
            return;
        }
    };

    let watchlist_path =
        std::env::var("WATCHLIST_FILE").unwrap_or_else(|_| "watchlist.json".to_string());
    let watchlist = WatchlistStore::load(PathBuf::from(watchlist_path));

    let ctx = Arc::new(BotContext {
        telegram,
        market,
        watchlist,
    });

    info!("Bot is running, long-polling for updates");

    let mut offset: i64 = 0;
    loop {
        match ctx.telegram.get_updates(offset).await {
            Ok(updates) => {
                for update in updates {
                    offset = offset.max(update.update_id + 1);
                    let ctx = Arc::clone(&ctx);
                    // Each update is an independent unit of work
                    tokio::spawn(async move {
                        commands::handle_update(ctx, update).await;
                    });
                }
            }
            Err(e) => {
                error!("getUpdates failed: {}", e);
                tokio::time::sleep(Duration::from_secs(5)).await;
            }
        }
    }
}
