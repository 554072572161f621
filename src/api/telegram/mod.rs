pub mod client;
pub mod models;

pub use client::TelegramClient;
pub use models::{
    ApiError, CallbackQuery, Chat, InlineKeyboardButton, InlineKeyboardMarkup, Message, Update,
};
