pub mod chart;
pub mod help;
pub mod watchlist;

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::api::telegram::{CallbackQuery, Message, Update};
use crate::models::ChartRequest;
use crate::utils::{self, BotError};
use crate::BotContext;

/// Entry point for one update; every update runs in its own task
pub async fn handle_update(ctx: Arc<BotContext>, update: Update) {
    if let Some(message) = update.message {
        handle_message(&ctx, message).await;
    } else if let Some(query) = update.callback_query {
        handle_callback(&ctx, query).await;
    }
}

async fn handle_message(ctx: &BotContext, msg: Message) {
    if msg.from.as_ref().map(|u| u.is_bot).unwrap_or(false) {
        return;
    }
    let text = match &msg.text {
        Some(text) => text.clone(),
        None => return,
    };
    let chat_id = msg.chat.id;

    let parts: Vec<&str> = text.split_whitespace().collect();
    let first = match parts.first() {
        Some(first) => *first,
        None => return,
    };
    let command = normalize_command(first);
    if !command.starts_with('/') {
        return;
    }

    // Check rate limit before processing command
    if let Err((remaining, should_warn)) = utils::check_cooldown(chat_id, &command).await {
        if should_warn {
            let _ = ctx
                .telegram
                .send_message(
                    chat_id,
                    &format!(
                        "⏳ Please wait {} seconds before using this command again.",
                        remaining
                    ),
                )
                .await;
        }
        return;
    }

    let args = &parts[1..];
    let result = match command.as_str() {
        "/chart" => chart::execute(ctx, chat_id, args).await,
        "/watchlist" => watchlist::execute_list(ctx, chat_id).await,
        "/addwatch" => watchlist::execute_add(ctx, chat_id, args).await,
        "/removewatch" => watchlist::execute_remove(ctx, chat_id, args).await,
        "/bulkwatch" => watchlist::execute_bulk(ctx, chat_id, &text).await,
        "/help" | "/start" => help::execute(ctx, chat_id).await,
        _ => return,
    };

    if let Err(e) = result {
        report_error(ctx, chat_id, &command, e).await;
    }
}

/// Watchlist button press: acknowledge, then chart the selected symbol
/// with the default lookback.
async fn handle_callback(ctx: &BotContext, query: CallbackQuery) {
    let chat_id = match query.message.as_ref().map(|m| m.chat.id) {
        Some(chat_id) => chat_id,
        None => return,
    };

    if let Err(e) = ctx.telegram.answer_callback_query(&query.id).await {
        warn!("Failed to answer callback query {}: {}", query.id, e);
    }

    let symbol = match query.data {
        Some(symbol) if !symbol.is_empty() => symbol,
        _ => return,
    };
    info!("Watchlist selection '{}' from chat {}", symbol, chat_id);

    let result = match ChartRequest::parse(&[symbol.as_str()]) {
        Ok(request) => chart::send_chart(ctx, chat_id, &request).await,
        Err(e) => Err(e),
    };
    if let Err(e) = result {
        report_error(ctx, chat_id, "/watchlist", e).await;
    }
}

/// Log the failure and, when possible, tell the chat what went wrong.
/// Delivery failures stay in the log only.
async fn report_error(ctx: &BotContext, chat_id: i64, command: &str, e: BotError) {
    error!("❌ Error executing {} for chat {}: {}", command, chat_id, e);
    if matches!(e, BotError::Delivery(_)) {
        return;
    }
    if let Err(send_err) = ctx.telegram.send_message(chat_id, &e.user_message()).await {
        error!("Failed to report error to chat {}: {}", chat_id, send_err);
    }
}

/// Strip the `@BotName` suffix Telegram appends to commands in group chats
fn normalize_command(raw: &str) -> String {
    raw.split('@').next().unwrap_or(raw).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_plain_command() {
        assert_eq!(normalize_command("/chart"), "/chart");
    }

    #[test]
    fn test_normalize_strips_bot_mention() {
        assert_eq!(normalize_command("/chart@candlegram_bot"), "/chart");
    }

    #[test]
    fn test_normalize_keeps_non_commands() {
        assert_eq!(normalize_command("hello"), "hello");
    }
}
