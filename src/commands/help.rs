use crate::models::DEFAULT_LOOKBACK_DAYS;
use crate::utils::{get_cooldown_seconds, BotError};
use crate::BotContext;

pub async fn execute(ctx: &BotContext, chat_id: i64) -> Result<(), BotError> {
    let text = format!(
        "📖 candlegram commands\n\
         \n\
         📊 Charts\n\
         /chart <SYMBOL> [DAYS] - Candlestick chart with RSI, Donchian bands and volume\n\
         Examples: /chart AAPL 180, /chart TSLA, /chart BTC-USD 30\n\
         Default lookback: {} days\n\
         \n\
         ⭐ Watchlist\n\
         /watchlist - Pick a saved symbol to chart\n\
         /addwatch Name SYMBOL - Save a symbol under a name\n\
         /removewatch Name - Drop a saved symbol\n\
         /bulkwatch - Add several, one NAME SYMBOL pair per line\n\
         \n\
         ⚡ {}-second cooldown per command per chat",
        DEFAULT_LOOKBACK_DAYS,
        get_cooldown_seconds()
    );

    ctx.telegram
        .send_message(chat_id, &text)
        .await
        .map_err(|e| BotError::Delivery(e.to_string()))
}
