use tracing::info;

use crate::api::telegram::{InlineKeyboardButton, InlineKeyboardMarkup};
use crate::utils::BotError;
use crate::BotContext;

/// `/watchlist`: present the saved symbols as an inline keyboard;
/// pressing a button charts that symbol.
pub async fn execute_list(ctx: &BotContext, chat_id: i64) -> Result<(), BotError> {
    let entries = ctx.watchlist.entries().await;
    if entries.is_empty() {
        ctx.telegram
            .send_message(chat_id, "Watchlist is empty. Add one with /addwatch Name SYMBOL")
            .await
            .map_err(|e| BotError::Delivery(e.to_string()))?;
        return Ok(());
    }

    let markup = InlineKeyboardMarkup {
        inline_keyboard: entries
            .into_iter()
            .map(|(name, symbol)| {
                vec![InlineKeyboardButton {
                    text: format!("{} ({})", name, symbol),
                    callback_data: Some(symbol),
                }]
            })
            .collect(),
    };

    ctx.telegram
        .send_message_with_keyboard(chat_id, "📊 Select a symbol:", &markup)
        .await
        .map_err(|e| BotError::Delivery(e.to_string()))
}

/// `/addwatch <Name> <SYMBOL>`
pub async fn execute_add(ctx: &BotContext, chat_id: i64, args: &[&str]) -> Result<(), BotError> {
    let (name, symbol) = match args {
        [name, symbol] => (*name, *symbol),
        _ => {
            return Err(BotError::InvalidArgument(
                "Usage: /addwatch Name SYMBOL".to_string(),
            ))
        }
    };

    ctx.watchlist.add(name, symbol).await?;
    info!("Watchlist add from chat {}: {} -> {}", chat_id, name, symbol);

    ctx.telegram
        .send_message(
            chat_id,
            &format!("✅ Added {} -> {} to watchlist", name, symbol.to_uppercase()),
        )
        .await
        .map_err(|e| BotError::Delivery(e.to_string()))
}

/// `/removewatch <Name>`
pub async fn execute_remove(ctx: &BotContext, chat_id: i64, args: &[&str]) -> Result<(), BotError> {
    let name = match args {
        [name] => *name,
        _ => {
            return Err(BotError::InvalidArgument(
                "Usage: /removewatch Name".to_string(),
            ))
        }
    };

    let text = if ctx.watchlist.remove(name).await? {
        format!("❌ Removed {} from watchlist", name)
    } else {
        format!("{} not found in watchlist", name)
    };

    ctx.telegram
        .send_message(chat_id, &text)
        .await
        .map_err(|e| BotError::Delivery(e.to_string()))
}

/// `/bulkwatch`: every following line is a `NAME SYMBOL` pair;
/// malformed lines are skipped and counted.
pub async fn execute_bulk(ctx: &BotContext, chat_id: i64, full_text: &str) -> Result<(), BotError> {
    // Everything after the command line
    let body = full_text
        .split_once('\n')
        .map(|(_, rest)| rest)
        .unwrap_or("");

    let (added, skipped) = ctx.watchlist.bulk_add(body).await?;

    let text = if added.is_empty() {
        "⚠️ No valid entries found.\nFormat: NAME SYMBOL".to_string()
    } else {
        let listing: Vec<String> = added
            .iter()
            .map(|(name, symbol)| format!("{} -> {}", name, symbol))
            .collect();
        let mut text = format!("✅ Bulk upload successful:\n{}", listing.join("\n"));
        if skipped > 0 {
            text.push_str(&format!("\n({} invalid line(s) skipped)", skipped));
        }
        text
    };

    ctx.telegram
        .send_message(chat_id, &text)
        .await
        .map_err(|e| BotError::Delivery(e.to_string()))
}
